// src/taxonomy/mod.rs
// Operator-supplied category/subcategory table, loaded wholesale and
// flattened into the two text blocks the prompt embeds.

pub mod store;

use std::collections::BTreeSet;
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

pub const REQUIRED_COLUMNS: [&str; 2] = ["category", "subcategory"];

/// One row of the taxonomy table. Duplicate pairs are tolerated and
/// repeated verbatim in the prompt text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyEntry {
    pub category: String,
    pub subcategory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Taxonomy {
    pub entries: Vec<TaxonomyEntry>,
}

impl Taxonomy {
    /// Parse a CSV taxonomy. Headers are matched case-insensitively
    /// after trimming, so `" Category "` and `category` are the same
    /// column. Rows whose category or subcategory is empty after
    /// trimming are dropped; everything else is kept in source order.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| TriageError::SourceUnreadable(e.into()))?
            .clone();

        let columns = resolve_columns(&headers)?;

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(|e| TriageError::SourceUnreadable(e.into()))?;
            let category = field(&record, columns.category);
            let subcategory = field(&record, columns.subcategory);
            if category.is_empty() || subcategory.is_empty() {
                continue;
            }
            let examples = columns
                .examples
                .map(|idx| field(&record, idx))
                .filter(|s| !s.is_empty());
            entries.push(TaxonomyEntry {
                category,
                subcategory,
                examples,
            });
        }

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sorted, deduplicated distinct category names, newline-joined.
    pub fn category_block(&self) -> String {
        let distinct: BTreeSet<&str> = self
            .entries
            .iter()
            .map(|e| e.category.as_str())
            .collect();
        distinct.into_iter().collect::<Vec<_>>().join("\n")
    }

    /// "`category` - `subcategory`" per row, source row order, not
    /// deduplicated, newline-joined.
    pub fn pair_block(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} - {}", e.category, e.subcategory))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

struct ColumnIndices {
    category: usize,
    subcategory: usize,
    examples: Option<usize>,
}

fn resolve_columns(headers: &csv::StringRecord) -> Result<ColumnIndices> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let find = |name: &str| normalized.iter().position(|h| h == name);

    let category = find("category");
    let subcategory = find("subcategory");

    let missing: Vec<String> = [("category", category), ("subcategory", subcategory)]
        .iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(TriageError::SchemaInvalid { missing });
    }

    Ok(ColumnIndices {
        // Both present when missing is empty
        category: category.unwrap(),
        subcategory: subcategory.unwrap(),
        examples: find("examples"),
    })
}

fn field(record: &csv::StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").trim().to_string()
}
