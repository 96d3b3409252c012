//! Translation route - dispatch one request to its provider.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use lingua_dispatch_core::TranslationRequest;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::helpers::RouteResult;
use crate::state::AppState;

/// Successful translation payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
    /// Present when the translation could not be recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
}

/// Translate a message with the requested model.
///
/// A storage fault after a successful translation still answers 200, with
/// `storageError` set.
pub async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslationRequest>, JsonRejection>,
) -> RouteResult<Json<TranslateResponse>> {
    let Json(request) = payload?;
    debug!(
        "translate: language={:?}, model={:?}",
        request.target_language, request.model_id
    );

    let result = state.dispatcher.handle(&request).await?;

    let storage_error = result.persisted.storage_error().map(str::to_string);
    if storage_error.is_some() {
        warn!("Returning translation that was not recorded");
    }

    Ok(Json(TranslateResponse {
        translated_text: result.translated_text,
        storage_error,
    }))
}
