//! Static catalog routes for UI pickers.

use axum::{Json, extract::State};
use lingua_dispatch_core::{LanguageOption, ModelOption, target_languages};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::state::AppState;

pub async fn models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelOption>> {
    Json(state.dispatcher.models())
}

pub async fn languages() -> Json<Vec<LanguageOption>> {
    Json(target_languages())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
