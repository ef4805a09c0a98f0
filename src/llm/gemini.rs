// src/llm/gemini.rs
// Gemini generateContent provider. Non-streaming, single call per
// classification request.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{CompletionProvider, CompletionRequest, CompletionResponse, MessageRole, Usage};
use crate::config::CONFIG;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiProvider {
    client: HttpClient,
    api_key: String,
    model: String,
    temperature: f32,
    timeout: Duration,
}

impl GeminiProvider {
    pub fn new(api_key: String, model: String, temperature: f32, timeout: Duration) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            model,
            temperature,
            timeout,
        }
    }

    /// Create from GEMINI_API_KEY plus the process configuration.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY not set"))?;
        Ok(Self::new(
            api_key,
            CONFIG.model.clone(),
            CONFIG.temperature,
            Duration::from_secs(CONFIG.llm_timeout_secs),
        ))
    }

    /// Build Gemini contents: prior turns in order, then the current
    /// user input.
    fn build_contents(request: &CompletionRequest) -> Vec<GeminiContent> {
        let mut contents = Vec::new();

        for msg in &request.messages {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
            };
            contents.push(GeminiContent {
                role: role.to_string(),
                parts: vec![GeminiPart { text: msg.content.clone() }],
            });
        }

        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart { text: request.input.clone() }],
        });

        contents
    }

    fn parse_response(response: GeminiResponse) -> Result<CompletionResponse> {
        let mut text = String::new();
        if let Some(candidates) = response.candidates {
            if let Some(candidate) = candidates.into_iter().next() {
                for part in candidate.content.parts {
                    if let Some(t) = part.text {
                        text.push_str(&t);
                    }
                }
            }
        }

        if text.is_empty() {
            anyhow::bail!("Gemini returned an empty completion");
        }

        let usage = response.usage_metadata.map(|u| Usage {
            input_tokens: u.prompt_token_count.unwrap_or(0),
            output_tokens: u.candidates_token_count.unwrap_or(0),
        });

        Ok(CompletionResponse { text, usage })
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_request = GeminiRequest {
            contents: Self::build_contents(&request),
            system_instruction: Some(GeminiSystemInstruction {
                parts: vec![GeminiPart { text: request.system.clone() }],
            }),
            generation_config: Some(GeminiGenerationConfig {
                temperature: self.temperature,
            }),
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&api_request)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error: {} - {}", status, body);
        }

        let api_response: GeminiResponse = response.json().await?;

        if let Some(error) = &api_response.error {
            anyhow::bail!("Gemini error: {}", error.message);
        }

        Self::parse_response(api_response)
    }

    fn name(&self) -> &'static str {
        "Gemini"
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Clone)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Clone)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContentResponse,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount")]
    prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    #[test]
    fn test_build_contents() {
        let request = CompletionRequest {
            system: "You are an expert at classifying IT support tickets.".into(),
            messages: vec![
                Message { role: MessageRole::User, content: "Printer jammed".into() },
                Message { role: MessageRole::Assistant, content: "Category: Hardware".into() },
            ],
            input: "VPN keeps dropping".into(),
        };

        let contents = GeminiProvider::build_contents(&request);
        assert_eq!(contents.len(), 3); // 2 history + 1 current
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[2].role, "user");
        assert_eq!(contents[2].parts[0].text, "VPN keeps dropping");
    }

    #[test]
    fn test_parse_response_extracts_text_and_usage() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{
                "candidates": [{"content": {"parts": [{"text": "Category: Hardware\nSubcategory: Mice"}]}}],
                "usageMetadata": {"promptTokenCount": 412, "candidatesTokenCount": 11}
            }"#,
        )
        .unwrap();

        let parsed = GeminiProvider::parse_response(response).unwrap();
        assert!(parsed.text.starts_with("Category: Hardware"));
        let usage = parsed.usage.unwrap();
        assert_eq!(usage.input_tokens, 412);
        assert_eq!(usage.output_tokens, 11);
    }

    #[test]
    fn test_parse_response_rejects_empty_completion() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(GeminiProvider::parse_response(response).is_err());
    }
}
