use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::decode_response;
use super::traits::{ProviderFamily, Translator, TranslatorInfo};
use crate::config::Lang;
use crate::error::{Error, ProviderFailure, Result};

const PROVIDER: &str = ProviderFamily::GenerativeModel.provider_name();

/// Generative sub-models this service is allowed to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerativeModel {
    Flash15,
    Pro15,
    Pro15V002,
    Flash15V002,
}

impl GenerativeModel {
    pub const ALL: [Self; 4] = [Self::Flash15, Self::Pro15, Self::Pro15V002, Self::Flash15V002];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flash15 => "gemini-1.5-flash",
            Self::Pro15 => "gemini-1.5-pro",
            Self::Pro15V002 => "gemini-1.5-pro-002",
            Self::Flash15V002 => "gemini-1.5-flash-002",
        }
    }

    /// Exact-name lookup; no prefix or case folding.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == id)
    }
}

impl std::fmt::Display for GenerativeModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gemini `generateContent` translator for one sub-model
pub struct GenerativeTranslator {
    client: Client,
    api_base: String,
    api_key: String,
    model: GenerativeModel,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl std::fmt::Debug for GenerativeTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerativeTranslator")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GenerativeTranslator {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: GenerativeModel,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model,
        }
    }

    fn create_prompt(text: &str, target: &Lang) -> String {
        format!(
            "You are a translator app, so NO LONG PARAGRAPHS, if there is no specific translation \
             just give one of the most accurate, translate the following text accordingly from \
             English to {target}: {text}"
        )
    }
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined, untouched otherwise.
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl Translator for GenerativeTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: PROVIDER,
            family: ProviderFamily::GenerativeModel,
            model: self.model.as_str().to_string(),
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );
        let prompt = Self::create_prompt(text, target);

        let request = GenerateRequest {
            contents: [Content {
                role: "user",
                parts: [Part { text: &prompt }],
            }],
        };

        debug!("generateContent request to {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed: {}", e);
                Error::from_reqwest(PROVIDER, &e)
            })?;

        let generated: GenerateResponse = decode_response(PROVIDER, response).await?;

        generated.into_text().ok_or_else(|| {
            Error::provider(
                PROVIDER,
                ProviderFailure::InvalidResponse("No candidate text in response".to_string()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_exact_names_only() {
        assert_eq!(GenerativeModel::from_id("gemini-1.5-pro"), Some(GenerativeModel::Pro15));
        assert_eq!(
            GenerativeModel::from_id("gemini-1.5-flash-002"),
            Some(GenerativeModel::Flash15V002)
        );
        assert_eq!(GenerativeModel::from_id("gemini-1.5-unknown"), None);
        assert_eq!(GenerativeModel::from_id("GEMINI-1.5-PRO"), None);
    }

    #[test]
    fn test_prompt_embeds_language_and_text() {
        let prompt = GenerativeTranslator::create_prompt("Good morning", &Lang::new("de"));
        assert!(prompt.contains("NO LONG PARAGRAPHS"));
        assert!(prompt.ends_with("from English to de: Good morning"));
    }

    #[test]
    fn test_response_text_is_not_trimmed() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Bonjour "}, {"text": "\n"}]}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().as_deref(), Some("Bonjour \n"));
    }

    #[test]
    fn test_blocked_response_has_no_text() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        assert!(response.into_text().is_none());
    }
}
