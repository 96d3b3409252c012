use anyhow::{Context, Result};
use lingua_dispatch_core::{AppConfig, Dispatcher};

/// Global application state
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Build the dispatcher and open the store. Fails fast when the store is locked.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let dispatcher =
            Dispatcher::from_config(config).context("Failed to initialize dispatcher")?;

        Ok(Self { dispatcher })
    }

    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }
}
