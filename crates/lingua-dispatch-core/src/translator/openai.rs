use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::traits::{ProviderFamily, Translator, TranslatorInfo};
use super::decode_response;
use crate::config::Lang;
use crate::error::{Error, ProviderFailure, Result};

/// Model used when the caller does not name one
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 100;
const TOP_P: f32 = 1.0;

const PROVIDER: &str = ProviderFamily::ChatCompletion.provider_name();

/// OpenAI chat-completion translator
pub struct ChatCompletionTranslator {
    client: Client,
    /// Base URL for the API (e.g., "https://api.openai.com/v1")
    api_base: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl std::fmt::Debug for ChatCompletionTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionTranslator")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatCompletionTranslator {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// System instruction naming the destination language
    fn system_prompt(target: &Lang) -> String {
        format!("You are a translator that translates text into {target}")
    }
}

#[async_trait]
impl Translator for ChatCompletionTranslator {
    fn info(&self) -> TranslatorInfo {
        TranslatorInfo {
            name: PROVIDER,
            family: ProviderFamily::ChatCompletion,
            model: self.model.clone(),
        }
    }

    async fn translate(&self, text: &str, target: &Lang) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let system = Self::system_prompt(target);

        let request = ChatRequest {
            model: &self.model,
            messages: [
                Message {
                    role: "system",
                    content: &system,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        };

        debug!("Chat completion request to {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Request failed: {}", e);
                Error::from_reqwest(PROVIDER, &e)
            })?;

        let chat: ChatResponse = decode_response(PROVIDER, response).await?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| {
                Error::provider(
                    PROVIDER,
                    ProviderFailure::InvalidResponse("No choices in response".to_string()),
                )
            })
    }
}
