use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Language codes following ISO 639-1 with regional variants
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lang(pub String);

impl Lang {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercased tag, as expected by the dedicated translation service
    pub fn to_uppercase(&self) -> String {
        self.0.to_uppercase()
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Lang {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Lang {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Endpoint and credential for one provider family.
///
/// Both fields are optional so a section may set only a key; a missing base
/// URL falls back to the family default when the adapter is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_base: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ProviderConfig {
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_base: Some(api_base.into()),
            api_key,
        }
    }

    /// The configured key, treating a blank value as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn is_configured(&self) -> bool {
        self.credential().is_some()
    }

    /// Apply command line or environment values on top of the file.
    pub fn override_with(&mut self, api_base: Option<String>, api_key: Option<String>) {
        if api_base.is_some() {
            self.api_base = api_base;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
    }

    /// The configured base URL, or `default` when unset or blank.
    pub fn api_base_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.api_base
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .unwrap_or(default)
    }
}

/// Default chat-completion endpoint
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Default generative-model endpoint
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Dedicated translation endpoint for free-tier keys
pub const DEEPL_FREE_API_BASE: &str = "https://api-free.deepl.com/v2";
/// Dedicated translation endpoint for paid keys
pub const DEEPL_PRO_API_BASE: &str = "https://api.deepl.com/v2";

/// DeepL endpoint matching a key: free-tier keys end in `:fx`.
pub fn deepl_api_base(api_key: &str) -> &'static str {
    if api_key.trim().ends_with(":fx") {
        DEEPL_FREE_API_BASE
    } else {
        DEEPL_PRO_API_BASE
    }
}

/// Store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory (defaults to $XDG_DATA_HOME/lingua-dispatch)
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(crate::util::default_store_path)
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat-completion provider
    #[serde(default)]
    pub openai: ProviderConfig,

    /// Generative-model provider
    #[serde(default)]
    pub gemini: ProviderConfig,

    /// Dedicated translation provider
    #[serde(default)]
    pub deepl: ProviderConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Upper bound for a single provider call, in seconds (must be positive)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai: ProviderConfig::default(),
            gemini: ProviderConfig::default(),
            deepl: ProviderConfig::default(),
            storage: StorageConfig::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::error::Error> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::error::Error::Configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::Error::Configuration(format!("Failed to parse config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no provider call could work with.
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.request_timeout_secs == 0 {
            return Err(crate::error::Error::Configuration(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from default locations (~/.config/lingua-dispatch/config.toml, ./config.toml)
    pub fn load() -> Self {
        if let Some(config_dir) = crate::util::config_dir() {
            let user_config = config_dir.join("lingua-dispatch").join("config.toml");
            if user_config.exists() {
                match Self::from_file(&user_config) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {}", user_config.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// True when at least one provider family has a credential.
    pub fn has_any_credential(&self) -> bool {
        self.openai.is_configured() || self.gemini.is_configured() || self.deepl.is_configured()
    }
}

/// A language option for UI dropdowns
#[derive(Debug, Clone, Serialize)]
pub struct LanguageOption {
    /// Language tag (e.g., "fr", "pt-BR")
    pub code: &'static str,
    /// Display name (e.g., "French")
    pub label: &'static str,
}

/// Target languages offered to users.
pub fn target_languages() -> Vec<LanguageOption> {
    LANGUAGES
        .iter()
        .map(|&(code, label)| LanguageOption { code, label })
        .collect()
}

/// Display name for a language code, or the code itself when unknown.
pub fn label_for(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map_or(code, |&(_, label)| label)
}

const LANGUAGES: &[(&str, &str)] = &[
    ("bg", "Bulgarian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("nl", "Dutch"),
    ("en-US", "English (American)"),
    ("en-GB", "English (British)"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("de", "German"),
    ("el", "Greek"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("pl", "Polish"),
    ("pt-PT", "Portuguese (European)"),
    ("pt-BR", "Portuguese (Brazilian)"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("es", "Spanish"),
    ("sv", "Swedish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("zh", "Chinese (Simplified)"),
    ("hi", "Hindi"),
];
