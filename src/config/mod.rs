// src/config/mod.rs
// All tunables come from the environment (.env supported), one default each.

use once_cell::sync::Lazy;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct TriageConfig {
    // ── LLM Configuration
    pub model: String,
    pub temperature: f32,
    pub llm_timeout_secs: u64,

    // ── Taxonomy Configuration
    pub taxonomy_path: String,

    // ── Server Configuration
    pub host: String,
    pub port: u16,

    // ── Logging Configuration
    pub log_level: String,
}

// Handles values with trailing comments and extra whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl TriageConfig {
    pub fn from_env() -> Self {
        if dotenvy::dotenv().is_err() {
            eprintln!("Warning: .env file not found. Using environment variables and defaults.");
        }

        Self {
            model: env_var_or("TRIAGE_MODEL", "gemini-1.5-flash".to_string()),
            temperature: env_var_or("TRIAGE_TEMPERATURE", 0.3),
            // The upstream client default is not relied upon: the request
            // timeout is always set explicitly from this value.
            llm_timeout_secs: env_var_or("TRIAGE_LLM_TIMEOUT_SECS", 60),
            taxonomy_path: env_var_or("TRIAGE_TAXONOMY_PATH", "categories.csv".to_string()),
            host: env_var_or("TRIAGE_HOST", "0.0.0.0".to_string()),
            port: env_var_or("TRIAGE_PORT", 8080),
            log_level: env_var_or("TRIAGE_LOG_LEVEL", "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<TriageConfig> = Lazy::new(TriageConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_var_or_strips_comments() {
        std::env::set_var("TRIAGE_TEST_PORT", "9090 # staging");
        let port: u16 = env_var_or("TRIAGE_TEST_PORT", 8080);
        assert_eq!(port, 9090);
        std::env::remove_var("TRIAGE_TEST_PORT");
    }

    #[test]
    fn env_var_or_falls_back_on_garbage() {
        std::env::set_var("TRIAGE_TEST_TEMP", "not-a-number");
        let temp: f32 = env_var_or("TRIAGE_TEST_TEMP", 0.3);
        assert_eq!(temp, 0.3);
        std::env::remove_var("TRIAGE_TEST_TEMP");
    }
}
