// src/extract/mod.rs
// Recovers the two labeled fields from free-text model output. The
// parser is deliberately strict: it trusts the format directive in the
// instruction rather than repairing non-conforming output.

use serde::{Deserialize, Serialize};

/// Extracted (category, subcategory) pair. Either field is the empty
/// string when the response never produced its labeled line. Not
/// validated against the taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub subcategory: String,
}

/// Extraction strategy seam. Swapping in a stricter strategy must not
/// change the pipeline's external contract.
pub trait Extractor: Send + Sync {
    fn extract(&self, response_text: &str) -> Classification;
}

/// Line-prefix extraction: case-insensitive match on `category:` and
/// `subcategory:` at line start, value is everything after the first
/// colon, trimmed. First occurrence of each label wins; all other
/// lines are skipped silently. Garbled output yields empty fields,
/// never an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinePrefixExtractor;

impl Extractor for LinePrefixExtractor {
    fn extract(&self, response_text: &str) -> Classification {
        let mut category = String::new();
        let mut subcategory = String::new();

        for line in response_text.lines() {
            let lower = line.to_lowercase();
            // subcategory first: "subcategory:" would otherwise never
            // be reachable once a line matched the shorter label.
            if lower.starts_with("subcategory:") {
                if subcategory.is_empty() {
                    subcategory = value_after_colon(line);
                }
            } else if lower.starts_with("category:") {
                if category.is_empty() {
                    category = value_after_colon(line);
                }
            }
        }

        Classification { category, subcategory }
    }
}

fn value_after_colon(line: &str) -> String {
    match line.split_once(':') {
        Some((_, value)) => value.trim().to_string(),
        None => String::new(),
    }
}
