mod deepl;
mod gemini;
mod openai;
mod traits;

pub use deepl::DeepLTranslator;
pub use gemini::{GenerativeModel, GenerativeTranslator};
pub use openai::{ChatCompletionTranslator, DEFAULT_CHAT_MODEL};
pub use traits::{ProviderFamily, Translator, TranslatorInfo};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::Lang;
use crate::error::{Error, ProviderFailure, Result};

/// Closed set of provider adapters, built by the registry at resolution time
#[derive(Debug)]
pub enum ProviderAdapter {
    ChatCompletion(ChatCompletionTranslator),
    GenerativeModel(GenerativeTranslator),
    DedicatedTranslation(DeepLTranslator),
}

impl ProviderAdapter {
    pub const fn family(&self) -> ProviderFamily {
        match self {
            Self::ChatCompletion(_) => ProviderFamily::ChatCompletion,
            Self::GenerativeModel(_) => ProviderFamily::GenerativeModel,
            Self::DedicatedTranslation(_) => ProviderFamily::DedicatedTranslation,
        }
    }

    fn inner(&self) -> &dyn Translator {
        match self {
            Self::ChatCompletion(t) => t,
            Self::GenerativeModel(t) => t,
            Self::DedicatedTranslation(t) => t,
        }
    }
}

#[async_trait]
impl Translator for ProviderAdapter {
    fn info(&self) -> TranslatorInfo {
        self.inner().info()
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        self.inner().translate(text, target).await
    }
}

/// Decode a successful JSON body, or turn a non-2xx answer into
/// [`ProviderFailure::Status`] carrying the upstream payload.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!("{} API error: {} - {}", provider, status, text);
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
        return Err(Error::provider(
            provider,
            ProviderFailure::Status {
                status: status.as_u16(),
                body,
            },
        ));
    }

    response.json::<T>().await.map_err(|e| {
        warn!("Failed to parse {} response: {}", provider, e);
        Error::provider(provider, ProviderFailure::InvalidResponse(e.to_string()))
    })
}
