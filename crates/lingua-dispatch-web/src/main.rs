//! Lingua Dispatch Web - HTTP server dispatching translation requests to providers.

mod helpers;
mod routes;
mod state;

use anyhow::{Context, Result};
use clap::Parser;
use lingua_dispatch_core::AppConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "lingua-dispatch-web")]
#[command(author, version, about = "Lingua Dispatch Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat-completion API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// Chat-completion API base URL
    #[arg(long, env = "OPENAI_API_BASE")]
    openai_api_base: Option<String>,

    /// Generative-model API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Generative-model API base URL
    #[arg(long, env = "GEMINI_API_BASE")]
    gemini_api_base: Option<String>,

    /// Dedicated translation API key
    #[arg(long, env = "DEEPL_API_KEY", hide_env_values = true)]
    deepl_api_key: Option<String>,

    /// Dedicated translation API base URL
    #[arg(long, env = "DEEPL_API_BASE")]
    deepl_api_base: Option<String>,

    /// Translation store directory
    #[arg(long, env = "LINGUA_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Per-provider request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    /// File config first, then command line and environment on top.
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

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},hyper=warn,sled=warn")));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = args.to_config()?;

    if !config.has_any_credential() {
        warn!("No provider API key configured; translation requests will fail");
    }

    // Opens the store and ensures its schema (fails fast if locked)
    let state = Arc::new(AppState::new(&config).context("Failed to initialize application state")?);

    for model in state.dispatcher.models().iter().filter(|m| m.available) {
        info!("Model available: {}", model.id);
    }

    let app = routes::router(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Backend is running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
