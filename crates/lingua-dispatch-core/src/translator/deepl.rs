use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::decode_response;
use super::traits::{ProviderFamily, Translator, TranslatorInfo};
use crate::config::Lang;
use crate::error::{Error, ProviderFailure, Result};

const PROVIDER: &str = ProviderFamily::DedicatedTranslation.provider_name();

/// DeepL translator.
///
/// Failures are logged with full detail but reported to callers only as
/// [`ProviderFailure::Unavailable`].
pub struct DeepLTranslator {
    client: Client,
    api_base: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: [&'a str; 1],
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl std::fmt::Debug for DeepLTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepLTranslator")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl DeepLTranslator {
    pub fn new(client: Client, api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    fn build_request<'a>(text: &'a str, target: &Lang) -> TranslateRequest<'a> {
        TranslateRequest {
            text: [text],
            target_lang: target.to_uppercase(),
        }
    }

    async fn request(&self, text: &str, target: &Lang) -> Result<String> {
        let url = format!("{}/translate", self.api_base.trim_end_matches('/'));
        let request = Self::build_request(text, target);

        debug!("DeepL request to {} (target {})", url, request.target_lang);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::from_reqwest(PROVIDER, &e))?;

        let translated: TranslateResponse = decode_response(PROVIDER, response).await?;

        translated
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| {
                Error::provider(
                    PROVIDER,
                    ProviderFailure::InvalidResponse("No translations in response".to_string()),
                )
            })
    }
}

#[async_trait]
impl Translator for DeepLTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: PROVIDER,
            family: ProviderFamily::DedicatedTranslation,
            model: PROVIDER.to_string(),
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        self.request(text, target).await.map_err(|e| {
            warn!("DeepL translation failed: {}", e);
            match e {
                // Timeouts keep their kind so callers can answer 504
                Error::Provider {
                    kind: ProviderFailure::Timeout,
                    ..
                } => e,
                _ => Error::provider(PROVIDER, ProviderFailure::Unavailable),
            }
        })
    }
}
