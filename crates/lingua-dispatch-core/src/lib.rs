//! Lingua Dispatch Core Library
//!
//! Routes translation requests to one of several providers and records the results:
//! - Model registry mapping model identifiers to provider adapters
//! - Adapters for chat-completion, generative-model and dedicated translation APIs
//! - Dispatcher enforcing validation, credential checks and timeouts
//! - Append-only translation store with derived history views

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod registry;
pub mod store;
pub mod translator;
pub mod util;

pub use config::{AppConfig, Lang, LanguageOption, ProviderConfig, label_for, target_languages};
pub use dispatcher::{Dispatcher, PersistOutcome, TranslationRequest, TranslationResult};
pub use error::{Error, ProviderFailure, Result};
pub use history::LanguageUsage;
pub use registry::{AdapterResolver, ModelOption, ModelRegistry, ModelRoute};
pub use store::{NewTranslation, SledStore, TranslationRecord, TranslationStore};
pub use translator::{ProviderAdapter, ProviderFamily, Translator, TranslatorInfo};
