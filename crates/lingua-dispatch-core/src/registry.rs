//! Model identifier routing.
//!
//! A model id is parsed into a [`ModelRoute`], then paired with the provider
//! endpoint configured at startup to produce a [`ProviderAdapter`].

use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::{
    AppConfig, DEFAULT_GEMINI_API_BASE, DEFAULT_OPENAI_API_BASE, ProviderConfig, deepl_api_base,
};
use crate::error::{Error, ProviderFailure, Result};
use crate::translator::{
    ChatCompletionTranslator, DEFAULT_CHAT_MODEL, DeepLTranslator, GenerativeModel,
    GenerativeTranslator, ProviderAdapter, ProviderFamily, Translator,
};

/// Model ids starting with this go to the generative-model provider
pub const GENERATIVE_PREFIX: &str = "gemini";
/// Model ids starting with this go to the dedicated translation service
pub const DEDICATED_PREFIX: &str = "deepl";

/// Where a model identifier routes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRoute {
    ChatCompletion { model: String },
    GenerativeModel(GenerativeModel),
    DedicatedTranslation,
}

impl ModelRoute {
    /// Parse a model identifier.
    ///
    /// An empty id selects [`DEFAULT_CHAT_MODEL`]. Unknown generative
    /// sub-models are rejected; anything without a known prefix is
    /// handed to the chat-completion provider as-is.
    pub fn parse(model_id: &str) -> Result<Self> {
        let model_id = model_id.trim();

        if model_id.is_empty() {
            return Ok(Self::ChatCompletion {
                model: DEFAULT_CHAT_MODEL.to_string(),
            });
        }

        if model_id.starts_with(GENERATIVE_PREFIX) {
            return GenerativeModel::from_id(model_id)
                .map(Self::GenerativeModel)
                .ok_or_else(|| Error::UnsupportedModel(model_id.to_string()));
        }

        if model_id.starts_with(DEDICATED_PREFIX) {
            return Ok(Self::DedicatedTranslation);
        }

        Ok(Self::ChatCompletion {
            model: model_id.to_string(),
        })
    }

    pub const fn family(&self) -> ProviderFamily {
        match self {
            Self::ChatCompletion { .. } => ProviderFamily::ChatCompletion,
            Self::GenerativeModel(_) => ProviderFamily::GenerativeModel,
            Self::DedicatedTranslation => ProviderFamily::DedicatedTranslation,
        }
    }
}

/// Source of adapters for the dispatcher.
pub trait AdapterResolver: Send + Sync {
    /// True when at least one provider family can be used at all
    fn has_any_credential(&self) -> bool;

    /// Resolve the adapter responsible for `model_id`
    fn resolve(&self, model_id: &str) -> Result<Arc<dyn Translator>>;

    /// Models offered to users
    fn catalog(&self) -> Vec<ModelOption> {
        Vec::new()
    }
}

/// An entry of the model picker
#[derive(Debug, Clone, Serialize)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
    pub family: ProviderFamily,
    /// Whether the family has a credential configured
    pub available: bool,
}

const CATALOG: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "GPT-3.5 Turbo"),
    ("gpt-4", "GPT-4"),
    ("gpt-4-turbo", "GPT-4 Turbo"),
    ("gemini-1.5-pro", "Gemini 1.5 Pro"),
    ("gemini-1.5-flash", "Gemini 1.5 Flash"),
    ("gemini-1.5-pro-002", "Gemini 1.5 Pro 002"),
    ("gemini-1.5-flash-002", "Gemini 1.5 Flash 002"),
    ("deepl", "DeepL"),
];

/// Registry of provider endpoints configured at startup
#[derive(Clone)]
pub struct ModelRegistry {
    client: Client,
    openai: ProviderConfig,
    gemini: ProviderConfig,
    deepl: ProviderConfig,
}

impl ModelRegistry {
    /// Build the registry, sharing one HTTP client bounded by the request timeout.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            openai: config.openai.clone(),
            gemini: config.gemini.clone(),
            deepl: config.deepl.clone(),
        })
    }

    const fn endpoint(&self, family: ProviderFamily) -> &ProviderConfig {
        match family {
            ProviderFamily::ChatCompletion => &self.openai,
            ProviderFamily::GenerativeModel => &self.gemini,
            ProviderFamily::DedicatedTranslation => &self.deepl,
        }
    }

    pub fn is_available(&self, family: ProviderFamily) -> bool {
        self.endpoint(family).is_configured()
    }

    /// Base URL for a family: the configured one, else the family default.
    /// DeepL's default depends on whether the key is a free-tier key.
    fn api_base(&self, family: ProviderFamily, key: &str) -> String {
        let endpoint = self.endpoint(family);
        match family {
            ProviderFamily::ChatCompletion => endpoint.api_base_or(DEFAULT_OPENAI_API_BASE),
            ProviderFamily::GenerativeModel => endpoint.api_base_or(DEFAULT_GEMINI_API_BASE),
            ProviderFamily::DedicatedTranslation => endpoint.api_base_or(deepl_api_base(key)),
        }
        .to_string()
    }

    /// Resolve a model id to its adapter.
    ///
    /// Fails with [`ProviderFailure::MissingCredential`] when the selected
    /// family has no key, before any network call.
    pub fn resolve_adapter(&self, model_id: &str) -> Result<ProviderAdapter> {
        let route = ModelRoute::parse(model_id)?;
        let family = route.family();
        let endpoint = self.endpoint(family);

        let Some(key) = endpoint.credential() else {
            return Err(Error::Provider {
                provider: family.provider_name(),
                kind: ProviderFailure::MissingCredential,
            });
        };

        debug!("Resolved model '{}' to {:?}", model_id, route);

        let client = self.client.clone();
        let base = self.api_base(family, key);

        Ok(match route {
            ModelRoute::ChatCompletion { model } => {
                ProviderAdapter::ChatCompletion(ChatCompletionTranslator::new(client, base, key, model))
            }
            ModelRoute::GenerativeModel(model) => {
                ProviderAdapter::GenerativeModel(GenerativeTranslator::new(client, base, key, model))
            }
            ModelRoute::DedicatedTranslation => {
                ProviderAdapter::DedicatedTranslation(DeepLTranslator::new(client, base, key))
            }
        })
    }

    /// Models offered to users, flagged by availability
    pub fn catalog(&self) -> Vec<ModelOption> {
        CATALOG
            .iter()
            .filter_map(|&(id, label)| {
                let family = ModelRoute::parse(id).ok()?.family();
                Some(ModelOption {
                    id,
                    label,
                    family,
                    available: self.is_available(family),
                })
            })
            .collect()
    }
}

impl AdapterResolver for ModelRegistry {
    fn has_any_credential(&self) -> bool {
        [
            ProviderFamily::ChatCompletion,
            ProviderFamily::GenerativeModel,
            ProviderFamily::DedicatedTranslation,
        ]
        .into_iter()
        .any(|family| self.is_available(family))
    }

    fn resolve(&self, model_id: &str) -> Result<Arc<dyn Translator>> {
        Ok(Arc::new(self.resolve_adapter(model_id)?))
    }

    fn catalog(&self) -> Vec<ModelOption> {
        Self::catalog(self)
    }
}
