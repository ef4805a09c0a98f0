// src/error.rs
// The four halting error kinds. None of these are retried; a
// classification failure aborts the current request only.

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("taxonomy file not found at '{path}'; upload a replacement before classifying")]
    ConfigurationMissing { path: String },

    #[error("taxonomy is missing required column(s): {}", missing.join(", "))]
    SchemaInvalid { missing: Vec<String> },

    #[error("taxonomy file could not be read: {0}")]
    SourceUnreadable(#[source] anyhow::Error),

    #[error("classification failed: {0}")]
    ClassificationFailed(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TriageError>;
