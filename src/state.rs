// src/state.rs

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::error::{Result, TriageError};
use crate::llm::CompletionProvider;
use crate::pipeline::Classifier;
use crate::taxonomy::store::TaxonomyStore;
use crate::taxonomy::Taxonomy;

/// Shared server state. The taxonomy is `None` until a file exists;
/// classification is refused in that state but uploads still work, so
/// a fresh deployment can be bootstrapped over HTTP. On upload or
/// reload the value is swapped wholesale; requests already in flight
/// keep the instruction they were built with. No versioning,
/// single-operator assumption.
pub struct AppState {
    pub classifier: Classifier,
    pub store: TaxonomyStore,
    pub taxonomy: RwLock<Option<Taxonomy>>,
}

impl AppState {
    /// Load the persisted taxonomy and assemble the shared state. A
    /// missing file starts the server degraded (upload required
    /// before classifying); an unreadable or schema-invalid file is
    /// still a startup failure.
    pub fn new(provider: Arc<dyn CompletionProvider>, store: TaxonomyStore) -> Result<Arc<Self>> {
        let taxonomy = match store.load() {
            Ok(taxonomy) => Some(taxonomy),
            Err(TriageError::ConfigurationMissing { path }) => {
                tracing::warn!(
                    %path,
                    "no taxonomy file; classification disabled until one is uploaded"
                );
                None
            }
            Err(err) => return Err(err),
        };
        Ok(Arc::new(Self {
            classifier: Classifier::new(provider),
            store,
            taxonomy: RwLock::new(taxonomy),
        }))
    }
}
