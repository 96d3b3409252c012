//! HTTP route handlers for the translation service.
//!
//! All routes speak JSON. Errors are `{ "error": ... }` bodies built by
//! `helpers::ApiError`.

mod catalog;
mod translate;
mod translations;

pub use catalog::{health, languages, models};
pub use translate::translate;
pub use translations::{create_translation, language_usage, list_translations};

use axum::{
    Router,
    routing::{get, post},
};
use lingua_dispatch_core::util::null_as_empty;
use serde::Deserialize as SerdeDeserialize;
use std::sync::Arc;

use crate::state::AppState;

/// Query params for the history listing.
#[derive(SerdeDeserialize, Default)]
pub struct HistoryQuery {
    /// Only return the newest `limit` records
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Body of the record-insert endpoint. Missing or null fields are blank
/// and rejected by validation with 400.
#[derive(SerdeDeserialize, Default)]
#[serde(default)]
pub struct RecordForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub original_message: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub translated_message: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub language: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub model: String,
}

/// All API routes, without middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/translate", post(translate))
        // Path used by the browser client
        .route("/api/translate", post(translate))
        .route("/api/translations", get(list_translations).post(create_translation))
        .route("/api/translations/languages", get(language_usage))
        .route("/api/models", get(models))
        .route("/api/languages", get(languages))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use lingua_dispatch_core::{
        AdapterResolver, Dispatcher, Error, Lang, ModelOption, NewTranslation, ProviderFailure, Result,
        SledStore, TranslationRecord, TranslationStore, Translator, TranslatorInfo,
        translator::ProviderFamily,
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct EchoTranslator {
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl Translator for EchoTranslator {
        fn info(&self) -> TranslatorInfo {
            TranslatorInfo {
                name: "echo",
                family: ProviderFamily::ChatCompletion,
                model: "echo".to_string(),
            }
        }

        async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
            if let Some(status) = self.fail_with {
                return Err(Error::Provider {
                    provider: "echo",
                    kind: ProviderFailure::Status {
                        status,
                        body: json!({"message": "upstream says no"}),
                    },
                });
            }
            Ok(format!("{text} ({target})"))
        }
    }

    struct EchoResolver {
        configured: bool,
        fail_with: Option<u16>,
    }

    impl AdapterResolver for EchoResolver {
        fn has_any_credential(&self) -> bool {
            self.configured
        }

        fn resolve(&self, model_id: &str) -> Result<Arc<dyn Translator>> {
            if model_id == "gemini-1.5-unknown" {
                return Err(Error::UnsupportedModel(model_id.to_string()));
            }
            Ok(Arc::new(EchoTranslator {
                fail_with: self.fail_with,
            }))
        }

        fn catalog(&self) -> Vec<ModelOption> {
            vec![ModelOption {
                id: "echo",
                label: "Echo",
                family: ProviderFamily::ChatCompletion,
                available: self.configured,
            }]
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl TranslationStore for BrokenStore {
        async fn record(&self, _entry: NewTranslation) -> Result<TranslationRecord> {
            Err(Error::Storage("store unreachable".to_string()))
        }

        async fn list(&self) -> Result<Vec<TranslationRecord>> {
            Err(Error::Storage("store unreachable".to_string()))
        }
    }

    fn app_with(resolver: EchoResolver, store: Arc<dyn TranslationStore>) -> Router {
        let dispatcher = Dispatcher::new(Arc::new(resolver), store);
        router(Arc::new(AppState::with_dispatcher(dispatcher)))
    }

    fn app() -> Router {
        let store = SledStore::temporary().unwrap();
        app_with(
            EchoResolver {
                configured: true,
                fail_with: None,
            },
            Arc::new(store),
        )
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_translate_then_list() {
        let app = app();

        let (status, body) = send(
            &app,
            post_json(
                "/translate",
                &json!({"language": "fr", "message": "Hello", "model": "gpt-3.5-turbo"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"translatedText": "Hello (fr)"}));

        let (status, body) = send(&app, Request::get("/api/translations").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["original_message"], "Hello");
        assert_eq!(rows[0]["language"], "fr");
        assert_eq!(rows[0]["model"], "gpt-3.5-turbo");
        assert!(rows[0]["id"].is_u64());
        assert!(rows[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_translate_missing_field_is_400() {
        let (status, body) = send(
            &app(),
            post_json("/api/translate", &json!({"language": "fr", "model": "gpt-4"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required field: message");
    }

    #[tokio::test]
    async fn test_translate_null_field_is_400() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/translate",
                &json!({"language": "fr", "message": null, "model": "deepl"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required field: message");

        let (_, body) = send(&app, Request::get("/api/translations").body(Body::empty()).unwrap()).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unreadable_body_is_400_json() {
        let app = app();
        for body in [
            json!({"language": "fr", "message": 42, "model": "deepl"}),
            json!(["not", "an", "object"]),
        ] {
            let (status, reply) = send(&app, post_json("/translate", &body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(reply["error"].is_string());
        }

        let request = Request::post("/api/translate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, reply) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(reply["error"].is_string());
    }

    #[tokio::test]
    async fn test_unsupported_model_is_400() {
        let (status, _) = send(
            &app(),
            post_json(
                "/translate",
                &json!({"language": "fr", "message": "Hi", "model": "gemini-1.5-unknown"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_no_credentials_is_500() {
        let app = app_with(
            EchoResolver {
                configured: false,
                fail_with: None,
            },
            Arc::new(SledStore::temporary().unwrap()),
        );
        let (status, body) = send(
            &app,
            post_json("/translate", &json!({"language": "fr", "message": "Hi", "model": "deepl"})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("API keys are missing"));
    }

    #[tokio::test]
    async fn test_upstream_status_is_relayed() {
        let app = app_with(
            EchoResolver {
                configured: true,
                fail_with: Some(401),
            },
            Arc::new(SledStore::temporary().unwrap()),
        );
        let (status, body) = send(
            &app,
            post_json("/translate", &json!({"language": "fr", "message": "Hi", "model": "gpt-4"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"error": {"message": "upstream says no"}}));
    }

    #[tokio::test]
    async fn test_storage_fault_still_returns_translation() {
        let app = app_with(
            EchoResolver {
                configured: true,
                fail_with: None,
            },
            Arc::new(BrokenStore),
        );
        let (status, body) = send(
            &app,
            post_json("/translate", &json!({"language": "es", "message": "Hi", "model": "deepl"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translatedText"], "Hi (es)");
        assert!(body["storageError"].as_str().unwrap().contains("store unreachable"));

        let (status, body) = send(&app, Request::get("/api/translations").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_create_translation() {
        let app = app();

        let (status, body) = send(
            &app,
            post_json(
                "/api/translations",
                &json!({
                    "original_message": "Thanks",
                    "translated_message": "Danke",
                    "language": "de",
                    "model": "deepl"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["translated_message"], "Danke");
        assert!(body["id"].is_u64());

        let (status, body) = send(
            &app,
            post_json("/api/translations", &json!({"original_message": "Thanks", "language": "de"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required field: translated_message");

        let (status, body) = send(
            &app,
            post_json(
                "/api/translations",
                &json!({
                    "original_message": "Thanks",
                    "translated_message": null,
                    "language": "de",
                    "model": "deepl"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing required field: translated_message");
    }

    #[tokio::test]
    async fn test_history_limit_and_language_usage() {
        let app = app();
        for lang in ["fr", "it", "fr"] {
            let (status, _) = send(
                &app,
                post_json("/translate", &json!({"language": lang, "message": "Hi", "model": "gpt-4"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, body) = send(
            &app,
            Request::get("/api/translations?limit=1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["language"], "fr");

        let (status, body) = send(
            &app,
            Request::get("/api/translations/languages").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"language": "fr", "count": 2}, {"language": "it", "count": 1}])
        );
    }

    #[tokio::test]
    async fn test_catalog_routes() {
        let app = app();

        let (status, body) = send(&app, Request::get("/api/languages").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 31);

        let (status, body) = send(&app, Request::get("/api/models").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([{"id": "echo", "label": "Echo", "family": "chat_completion", "available": true}]));

        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
