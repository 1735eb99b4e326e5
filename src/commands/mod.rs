pub mod analytics;
pub mod analyze;
pub mod chat;
pub mod db;
pub mod eval;
pub mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use medscope::config::{self, AppConfig, GenerationSettings};
use medscope::gateway::{GeminiGateway, ModelId};
use medscope::{Dashboard, RecordStore};

/// Flags shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub model: Option<ModelId>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Resolved configuration for one invocation
pub struct Invocation {
    pub config: AppConfig,
    pub settings: GenerationSettings,
    pub db_path: PathBuf,
}

impl Invocation {
    pub fn load(options: &GlobalOptions) -> Result<Self> {
        let config = match &options.config {
            Some(path) => config::load_from_path(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => {
                let cwd = std::env::current_dir()?;
                let (config, source) = config::load(&cwd).context("failed to load config")?;
                if let Some(path) = source {
                    info!("loaded config (path={})", path.display());
                }
                config
            }
        };

        let mut model = config.model.clone();
        if let Some(name) = options.model {
            model.name = name;
        }
        if let Some(temperature) = options.temperature {
            model.temperature = temperature;
        }
        if let Some(max_tokens) = options.max_tokens {
            model.max_tokens = max_tokens;
        }

        let db_path = options
            .db
            .clone()
            .unwrap_or_else(|| config.storage.database_path());

        Ok(Self {
            settings: model.settings(),
            config,
            db_path,
        })
    }

    pub fn open_store(&self) -> Result<RecordStore> {
        RecordStore::open(&self.db_path)
            .with_context(|| format!("failed to open record store {}", self.db_path.display()))
    }

    /// Store plus a live gateway. Fails when the API key is missing.
    pub fn open_dashboard(&self) -> Result<Dashboard> {
        let store = self.open_store()?;
        let gateway = GeminiGateway::from_env(
            &self.config.gateway.api_key_env,
            self.config.gateway.base_url.clone(),
            self.settings.timeout,
        )
        .context("failed to set up the generation gateway")?;
        Ok(Dashboard::new(store, Box::new(gateway), self.settings))
    }
}

/// Shorten `text` to at most `max` characters for table cells
pub fn truncate(text: &str, max: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max {
        flat
    } else {
        let cut: String = flat.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Latency cell: seconds with 2 decimals, or a dash when absent
pub fn format_latency(latency: Option<f64>) -> String {
    match latency {
        Some(seconds) => format!("{:.2}", seconds),
        None => "-".to_string(),
    }
}
