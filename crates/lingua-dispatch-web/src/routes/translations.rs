//! Translation history routes - list, insert and aggregate stored records.

use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use lingua_dispatch_core::{LanguageUsage, NewTranslation, TranslationRecord};
use std::sync::Arc;
use tracing::error;

use super::{HistoryQuery, RecordForm};
use crate::helpers::RouteResult;
use crate::state::AppState;

/// All stored translations, newest first.
pub async fn list_translations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HistoryQuery>,
) -> RouteResult<Json<Vec<TranslationRecord>>> {
    let records = state
        .dispatcher
        .history(query.limit)
        .await
        .inspect_err(|e| error!("Error fetching translations: {}", e))?;
    Ok(Json(records))
}

/// Store a translation produced elsewhere - 201 with the created row.
pub async fn create_translation(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecordForm>, JsonRejection>,
) -> RouteResult<(StatusCode, Json<TranslationRecord>)> {
    let Json(form) = payload?;
    let entry = NewTranslation::new(
        form.original_message,
        form.translated_message,
        form.language,
        form.model,
    );

    let record = state
        .dispatcher
        .record(entry)
        .await
        .inspect_err(|e| error!("Database insertion error: {}", e))?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Request counts per target language.
pub async fn language_usage(
    State(state): State<Arc<AppState>>,
) -> RouteResult<Json<Vec<LanguageUsage>>> {
    Ok(Json(state.dispatcher.language_usage().await?))
}
