use async_trait::async_trait;
use serde::Serialize;

use crate::config::Lang;
use crate::error::Result;

/// The three provider families a model identifier can route to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    /// Large-language-model chat completion
    ChatCompletion,
    /// Generative-model content API
    GenerativeModel,
    /// Dedicated machine translation service
    DedicatedTranslation,
}

impl ProviderFamily {
    /// Short provider name used in logs and errors
    pub const fn provider_name(self) -> &'static str {
        match self {
            Self::ChatCompletion => "openai",
            Self::GenerativeModel => "gemini",
            Self::DedicatedTranslation => "deepl",
        }
    }
}

/// Information about a translator backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatorInfo {
    /// Provider name
    pub name: &'static str,
    pub family: ProviderFamily,
    /// Underlying model the provider is asked to use
    pub model: String,
}

/// Trait for translation backends
///
/// Source language is implicit (English); adapters only receive the target.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Get information about this translator
    fn info(&self) -> TranslatorInfo;

    /// Get the translator name (convenience method)
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Translate text into the target language
    async fn translate(&self, text: &str, target: &Lang) -> Result<String>;
}
