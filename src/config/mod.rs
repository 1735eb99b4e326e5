//! Config module - model, gateway, storage and analytics settings
//!
//! Resolves `.medscope/config.toml`, then `~/.medscope/config.toml`, then
//! built-in defaults. CLI flags override individual fields afterwards.
//!
//! # Example
//!
//! ```no_run
//! use medscope::config;
//! use std::path::Path;
//!
//! let (config, source) = config::load(Path::new("."))?;
//! if let Some(path) = source {
//!     println!("Using {}", path.display());
//! }
//! let settings = config.model.settings();
//! println!("Model: {} (temperature {})", settings.model, settings.temperature);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

pub use internal::{
    load, load_from_path, AnalyticsSection, AppConfig, GatewaySection, GenerationSettings,
    ModelSection, StorageSection,
};
