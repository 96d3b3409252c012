use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{AppConfig, Lang};
use crate::error::{Error, ProviderFailure, Result};
use crate::history::{self, LanguageUsage};
use crate::registry::{AdapterResolver, ModelOption, ModelRegistry};
use crate::store::{NewTranslation, SledStore, TranslationRecord, TranslationStore};
use crate::util::{is_blank, null_as_empty};

/// Source language of every inbound message
pub const SOURCE_LANGUAGE: &str = "en";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An inbound translation request.
///
/// Missing or null fields deserialize as empty strings so they fail
/// validation rather than parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    #[serde(default, rename = "language", deserialize_with = "null_as_empty")]
    pub target_language: String,
    #[serde(default, rename = "model", deserialize_with = "null_as_empty")]
    pub model_id: String,
}

impl TranslationRequest {
    pub fn new(
        message: impl Into<String>,
        target_language: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            target_language: target_language.into(),
            model_id: model_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.message) {
            return Err(Error::Validation { field: "message" });
        }
        if is_blank(&self.target_language) {
            return Err(Error::Validation { field: "language" });
        }
        if is_blank(&self.model_id) {
            return Err(Error::Validation { field: "model" });
        }
        Ok(())
    }
}

/// What happened to the record of a successful translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Stored(TranslationRecord),
    /// The translation succeeded but could not be stored
    Failed(String),
}

impl PersistOutcome {
    pub const fn record(&self) -> Option<&TranslationRecord> {
        match self {
            Self::Stored(record) => Some(record),
            Self::Failed(_) => None,
        }
    }

    pub fn storage_error(&self) -> Option<&str> {
        match self {
            Self::Stored(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// Result of one successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub translated_text: String,
    pub source_language: Lang,
    pub target_language: Lang,
    pub model_id: String,
    /// Provider that served the request
    pub provider: &'static str,
    pub persisted: PersistOutcome,
}

/// Single entry point: validate, resolve, translate, persist.
pub struct Dispatcher {
    resolver: Arc<dyn AdapterResolver>,
    store: Arc<dyn TranslationStore>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(resolver: Arc<dyn AdapterResolver>, store: Arc<dyn TranslationStore>) -> Self {
        Self {
            resolver,
            store,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build the production dispatcher: provider registry plus on-disk store.
    ///
    /// Opening the store ensures its schema, so call this once at startup.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let registry = ModelRegistry::from_config(config)?;
        let store = SledStore::open(config.storage.resolved_path())?;

        Ok(Self::new(Arc::new(registry), Arc::new(store))
            .with_timeout(Duration::from_secs(config.request_timeout_secs)))
    }

    /// Bound each provider call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Translate a request and record the outcome.
    ///
    /// Validation and the credential precondition run before any network
    /// or storage call. A storage fault after a successful translation is
    /// reported in [`TranslationResult::persisted`], not as an error.
    pub async fn handle(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        request.validate()?;

        if !self.resolver.has_any_credential() {
            return Err(Error::Configuration(
                "API keys are missing. Set OPENAI_API_KEY, GEMINI_API_KEY or DEEPL_API_KEY"
                    .to_string(),
            ));
        }

        let model_id = request.model_id.trim();
        let adapter = self.resolver.resolve(model_id)?;
        let provider = adapter.name();
        let target = Lang::new(request.target_language.trim());

        info!(
            "Translating {} chars into {} with {} ({})",
            request.message.chars().count(),
            target,
            provider,
            model_id
        );

        let translated_text = tokio::time::timeout(
            self.timeout,
            adapter.translate(&request.message, &target),
        )
        .await
        .map_err(|_| Error::Provider {
            provider,
            kind: ProviderFailure::Timeout,
        })
        .and_then(|result| result)
        .inspect_err(|e| warn!("Translation with {} failed: {}", provider, e))?;

        let entry = NewTranslation::new(
            request.message.clone(),
            translated_text.clone(),
            target.as_str(),
            model_id,
        );

        let persisted = match self.store.record(entry).await {
            Ok(record) => {
                debug!("Recorded translation {}", record.id);
                PersistOutcome::Stored(record)
            }
            Err(e) => {
                error!("Failed to persist translation: {}", e);
                PersistOutcome::Failed(e.to_string())
            }
        };

        Ok(TranslationResult {
            translated_text,
            source_language: Lang::new(SOURCE_LANGUAGE),
            target_language: target,
            model_id: model_id.to_string(),
            provider,
            persisted,
        })
    }

    /// Models offered by the resolver, flagged by availability.
    pub fn models(&self) -> Vec<ModelOption> {
        self.resolver.catalog()
    }

    /// Store a translation produced elsewhere.
    pub async fn record(&self, entry: NewTranslation) -> Result<TranslationRecord> {
        entry.validate()?;
        self.store.record(entry).await
    }

    /// Stored translations, newest first, optionally limited.
    pub async fn history(&self, limit: Option<usize>) -> Result<Vec<TranslationRecord>> {
        let records = self.store.list().await?;
        Ok(match limit {
            Some(n) => history::recent(records, n),
            None => records,
        })
    }

    /// Per-language request counts derived from stored translations.
    pub async fn language_usage(&self) -> Result<Vec<LanguageUsage>> {
        let records = self.store.list().await?;
        Ok(history::language_usage(&records))
    }
}
