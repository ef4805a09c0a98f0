// src/pipeline/mod.rs
// The one shared classification pipeline. Every entry point (CLI,
// HTTP raw, HTTP extracted) goes through Classifier::classify; only
// what each adapter surfaces from the outcome differs.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{Result, TriageError};
use crate::extract::{Classification, Extractor, LinePrefixExtractor};
use crate::llm::{CompletionProvider, CompletionRequest, Usage};
use crate::session::SessionContext;
use crate::taxonomy::Taxonomy;

/// Build the system instruction: role framing, the full category
/// list, the full category-subcategory list, and the two-line output
/// format directive. Rebuilt whenever the taxonomy changes, never
/// per-line of it.
pub fn build_instruction(taxonomy: &Taxonomy) -> String {
    format!(
        "You are an expert at classifying IT support tickets.\n\
         Classify each ticket into one of the following categories and subcategories.\n\
         \n\
         Categories:\n{}\n\
         \n\
         Subcategories:\n{}\n\
         \n\
         Respond in this format:\n\
         Category: <category>\n\
         Subcategory: <subcategory>\n\
         Use only the provided values.\n",
        taxonomy.category_block(),
        taxonomy.pair_block(),
    )
}

/// Everything one classification produced: the extracted pair, the
/// raw completion text it came from, and token usage when the
/// provider reported it.
#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    pub classification: Classification,
    pub raw: String,
    pub usage: Option<Usage>,
}

pub struct Classifier {
    provider: Arc<dyn CompletionProvider>,
    extractor: Box<dyn Extractor>,
}

impl Classifier {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            extractor: Box::new(LinePrefixExtractor),
        }
    }

    pub fn with_extractor(
        provider: Arc<dyn CompletionProvider>,
        extractor: Box<dyn Extractor>,
    ) -> Self {
        Self { provider, extractor }
    }

    /// Classify one ticket description. One blocking provider call,
    /// no retries. The session is appended to only after the call
    /// succeeds; on failure it is left exactly as it was.
    pub async fn classify(
        &self,
        taxonomy: &Taxonomy,
        session: &mut SessionContext,
        description: &str,
    ) -> Result<ClassifyOutcome> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TriageError::ClassificationFailed(anyhow::anyhow!(
                "ticket description is empty"
            )));
        }
        if taxonomy.is_empty() {
            warn!("taxonomy has no rows; the model is effectively unconstrained");
        }

        let request = CompletionRequest {
            system: build_instruction(taxonomy),
            messages: session.as_messages(),
            input: description.to_string(),
        };

        info!(
            provider = self.provider.name(),
            history_turns = session.len(),
            chars = description.len(),
            "classifying ticket"
        );

        let response = self
            .provider
            .complete(request)
            .await
            .map_err(TriageError::ClassificationFailed)?;

        session.record(description.to_string(), response.text.clone());

        let classification = self.extractor.extract(&response.text);
        if let Some(usage) = response.usage {
            info!(
                category = %classification.category,
                subcategory = %classification.subcategory,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "classification complete"
            );
        } else {
            info!(
                category = %classification.category,
                subcategory = %classification.subcategory,
                "classification complete"
            );
        }

        Ok(ClassifyOutcome {
            classification,
            raw: response.text,
            usage: response.usage,
        })
    }
}
