// src/api/handlers.rs

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::ApiResult;
use crate::error::TriageError;
use crate::session::SessionContext;
use crate::state::AppState;
use crate::taxonomy::{Taxonomy, TaxonomyEntry};

#[derive(Deserialize)]
pub struct ClassifyRequest {
    pub description: String,
}

/// Raw-text response shape: the full model output under a single
/// `category` key, with no extraction applied. This mirrors the
/// stateless deployment endpoint of the reference system verbatim;
/// use /classify/extracted for the structured pair.
#[derive(Serialize)]
pub struct RawClassifyResponse {
    pub category: String,
}

#[derive(Serialize)]
pub struct ExtractedClassifyResponse {
    pub category: String,
    pub subcategory: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_tokens: Option<u32>,
}

#[derive(Serialize)]
pub struct TaxonomyResponse {
    pub rows: usize,
    pub entries: Vec<TaxonomyEntry>,
    pub category_block: String,
    pub pair_block: String,
}

#[derive(Serialize)]
pub struct TaxonomyUpdateResponse {
    pub rows: usize,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Snapshot the current taxonomy, or refuse with the 503 mapping
/// while the server is waiting for its first upload.
async fn current_taxonomy(state: &AppState) -> ApiResult<Taxonomy> {
    match state.taxonomy.read().await.as_ref() {
        Some(taxonomy) => Ok(taxonomy.clone()),
        None => Err(TriageError::ConfigurationMissing {
            path: state.store.path().display().to_string(),
        }
        .into()),
    }
}

/// POST /classify — one stateless classification, raw model text out.
pub async fn classify_raw(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<Json<RawClassifyResponse>> {
    let taxonomy = current_taxonomy(&state).await?;
    // HTTP requests carry no history; each starts a fresh session.
    let mut session = SessionContext::new();
    let outcome = state
        .classifier
        .classify(&taxonomy, &mut session, &request.description)
        .await?;
    Ok(Json(RawClassifyResponse { category: outcome.raw }))
}

/// POST /classify/extracted — same pipeline, extracted pair plus
/// token readouts.
pub async fn classify_extracted(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<Json<ExtractedClassifyResponse>> {
    let taxonomy = current_taxonomy(&state).await?;
    let mut session = SessionContext::new();
    let outcome = state
        .classifier
        .classify(&taxonomy, &mut session, &request.description)
        .await?;
    Ok(Json(ExtractedClassifyResponse {
        category: outcome.classification.category,
        subcategory: outcome.classification.subcategory,
        input_tokens: outcome.usage.map(|u| u.input_tokens),
        output_tokens: outcome.usage.map(|u| u.output_tokens),
    }))
}

/// GET /taxonomy — current entries plus the two prompt blocks.
pub async fn get_taxonomy(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TaxonomyResponse>> {
    let taxonomy = current_taxonomy(&state).await?;
    Ok(Json(TaxonomyResponse {
        rows: taxonomy.len(),
        category_block: taxonomy.category_block(),
        pair_block: taxonomy.pair_block(),
        entries: taxonomy.entries,
    }))
}

/// PUT /taxonomy — CSV body. Validated in full before the stored
/// file is overwritten; a rejected upload changes nothing.
pub async fn put_taxonomy(
    State(state): State<Arc<AppState>>,
    body: String,
) -> ApiResult<Json<TaxonomyUpdateResponse>> {
    let replaced = state.store.replace(body.as_bytes())?;
    let rows = replaced.len();
    *state.taxonomy.write().await = Some(replaced);
    info!(rows, "taxonomy updated via upload");
    Ok(Json(TaxonomyUpdateResponse { rows }))
}

/// POST /taxonomy/reload — explicit re-read of the persisted file.
pub async fn reload_taxonomy(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TaxonomyUpdateResponse>> {
    let reloaded = state.store.load()?;
    let rows = reloaded.len();
    *state.taxonomy.write().await = Some(reloaded);
    info!(rows, "taxonomy reloaded from disk");
    Ok(Json(TaxonomyUpdateResponse { rows }))
}
