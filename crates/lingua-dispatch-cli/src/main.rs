//! Lingua Dispatch CLI - translate from the command line and inspect history.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use lingua_dispatch_core::{
    AppConfig, Dispatcher, ModelRegistry, TranslationRecord, TranslationRequest, label_for,
    target_languages,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lingua")]
#[command(author, version, about = "Translate text with chat, generative or dedicated providers", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Chat-completion API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    openai_api_key: Option<String>,

    /// Chat-completion API base URL
    #[arg(long, env = "OPENAI_API_BASE", global = true)]
    openai_api_base: Option<String>,

    /// Generative-model API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    gemini_api_key: Option<String>,

    /// Generative-model API base URL
    #[arg(long, env = "GEMINI_API_BASE", global = true)]
    gemini_api_base: Option<String>,

    /// Dedicated translation API key
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true, global = true)]
    deepl_api_key: Option<String>,

    /// Dedicated translation API base URL
    #[arg(long, env = "DEEPL_API_BASE", global = true)]
    deepl_api_base: Option<String>,

    /// Translation store directory
    #[arg(long, env = "LINGUA_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Per-provider request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Translate a message from English
    Translate {
        /// Text to translate
        #[arg(required = true)]
        message: Vec<String>,

        /// Target language code
        #[arg(short = 't', long)]
        language: String,

        /// Model identifier (gpt-*, gemini-1.5-*, deepl)
        #[arg(short, long, default_value = "gpt-3.5-turbo")]
        model: String,
    },

    /// List stored translations, newest first
    History {
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show how often each target language was used
    Usage,

    /// List selectable models and whether they are configured
    Models,

    /// List supported target languages
    Languages,
}

impl Args {
    fn to_config(&self) -> Result<AppConfig> {
        let mut config = if let Some(path) = &self.config {
            AppConfig::from_file(path).context("Failed to load config file")?
        } else {
            AppConfig::load()
        };

        config
            .openai
            .override_with(self.openai_api_base.clone(), self.openai_api_key.clone());
        config
            .gemini
            .override_with(self.gemini_api_base.clone(), self.gemini_api_key.clone());
        config
            .deepl
            .override_with(self.deepl_api_base.clone(), self.deepl_api_key.clone());

        if let Some(path) = &self.db_path {
            config.storage.path = Some(path.clone());
        }
        if let Some(secs) = self.timeout {
            config.request_timeout_secs = secs;
        }

        config.validate()?;
        Ok(config)
    }
}

fn print_record(record: &TranslationRecord) {
    // CLI output is intentional
    #[allow(clippy::print_stdout)]
    {
        println!(
            "#{} {} [{} -> {}] {}\n    {}\n    {}",
            record.id,
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.model,
            label_for(&record.language),
            record.language,
            record.original_message,
            record.translated_message,
        );
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = args.to_config()?;

    // Catalog commands never touch the store
    match &args.command {
        Command::Models => {
            let registry = ModelRegistry::from_config(&config)?;
            #[allow(clippy::print_stdout)]
            for model in registry.catalog() {
                let mark = if model.available { "*" } else { " " };
                println!("{mark} {:<22} {}", model.id, model.label);
            }
            return Ok(());
        }
        Command::Languages => {
            #[allow(clippy::print_stdout)]
            for lang in target_languages() {
                println!("{:<6} {}", lang.code, lang.label);
            }
            return Ok(());
        }
        _ => {}
    }

    let dispatcher = Dispatcher::from_config(&config).context("Failed to open translation store")?;

    match args.command {
        Command::Translate {
            message,
            language,
            model,
        } => {
            let request = TranslationRequest::new(message.join(" "), language, model);
            info!("Translating with {}", request.model_id);

            let pb = spinner(&format!("Translating with {}", request.model_id));
            let result = dispatcher.handle(&request).await;
            pb.finish_and_clear();

            let result = result.context("Translation failed")?;

            if let Some(reason) = result.persisted.storage_error() {
                tracing::error!("Translation was not recorded: {}", reason);
            }

            #[allow(clippy::print_stdout)]
            {
                println!("{}", result.translated_text);
            }
        }
        Command::History { limit } => {
            for record in dispatcher.history(Some(limit)).await? {
                print_record(&record);
            }
        }
        Command::Usage => {
            #[allow(clippy::print_stdout)]
            for usage in dispatcher.language_usage().await? {
                println!("{:>5}  {} ({})", usage.count, label_for(&usage.language), usage.language);
            }
        }
        Command::Models | Command::Languages => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_args() {
        let args = Args::try_parse_from([
            "lingua", "translate", "-t", "fr", "-m", "deepl", "Good", "morning",
        ])
        .unwrap();
        match args.command {
            Command::Translate {
                message,
                language,
                model,
            } => {
                assert_eq!(message.join(" "), "Good morning");
                assert_eq!(language, "fr");
                assert_eq!(model, "deepl");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_key_overrides_config() {
        let args = Args::try_parse_from([
            "lingua",
            "--deepl-api-key",
            "dl-cli",
            "--db-path",
            "/tmp/lingua-test",
            "history",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.deepl.credential(), Some("dl-cli"));
        assert_eq!(config.storage.path, Some(PathBuf::from("/tmp/lingua-test")));
    }

    #[test]
    fn test_cli_base_and_timeout_overrides() {
        let args = Args::try_parse_from([
            "lingua",
            "--deepl-api-base",
            "http://localhost:9000/v2",
            "--gemini-api-base",
            "http://localhost:9001/v1beta",
            "--timeout",
            "7",
            "models",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.deepl.api_base.as_deref(), Some("http://localhost:9000/v2"));
        assert_eq!(config.gemini.api_base.as_deref(), Some("http://localhost:9001/v1beta"));
        assert_eq!(config.request_timeout_secs, 7);
    }

    #[test]
    fn test_cli_zero_timeout_is_rejected() {
        let args = Args::try_parse_from(["lingua", "--timeout", "0", "models"]).unwrap();
        assert!(args.to_config().is_err());
    }
}
