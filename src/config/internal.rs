//! Internal implementation for config module
//!
//! Handles `.medscope/config.toml` (project) and `~/.medscope/config.toml` (user).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gateway::gemini::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL};
use crate::gateway::{clamp_max_tokens, clamp_temperature, GenerationParams, ModelId};
use crate::paths;

// =============================================================================
// Config Types
// =============================================================================

/// Medscope configuration. All sections are optional with defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub gateway: GatewaySection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub analytics: AnalyticsSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    /// Hosted model to call
    #[serde(default)]
    pub name: ModelId,
    /// Sampling temperature for chat and report analysis
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Output-token budget per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Bounded wait for one generation call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f32 {
    0.3
}
fn default_max_tokens() -> u32 {
    400
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            name: ModelId::default(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewaySection {
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// REST endpoint root
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// Record store path, relative to the working directory unless absolute or `~/`
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    paths::project::db_path(Path::new(""))
        .to_string_lossy()
        .into_owned()
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            database: default_database(),
        }
    }
}

impl StorageSection {
    /// Database path with `~` and `$VAR` expanded
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::full(&self.database)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| self.database.clone());
        PathBuf::from(expanded)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSection {
    /// How many distinct user queries to rank
    #[serde(default = "default_top_queries")]
    pub top_queries: usize,
    /// Bucket count of the latency histogram
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

fn default_top_queries() -> usize {
    5
}
fn default_histogram_bins() -> usize {
    10
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        Self {
            top_queries: default_top_queries(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

// =============================================================================
// Generation settings
// =============================================================================

/// Clamped interactive generation settings, read on every action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub model: ModelId,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl GenerationSettings {
    pub fn new(model: ModelId, temperature: f32, max_tokens: u32, timeout: Duration) -> Self {
        Self {
            model,
            temperature: clamp_temperature(temperature),
            max_tokens: clamp_max_tokens(max_tokens),
            timeout,
        }
    }

    /// Params for an interactive call (chat, report analysis)
    pub fn params(&self) -> GenerationParams {
        GenerationParams::new(self.model, self.temperature, self.max_tokens)
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        ModelSection::default().settings()
    }
}

impl ModelSection {
    pub fn settings(&self) -> GenerationSettings {
        GenerationSettings::new(
            self.name,
            self.temperature,
            self.max_tokens,
            Duration::from_secs(self.timeout_secs),
        )
    }
}

// =============================================================================
// Load
// =============================================================================

/// Load config from an explicit file
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &contents)
}

fn parse(path: &Path, contents: &str) -> Result<AppConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve config: project file, then user file, then defaults
pub fn load(project_root: &Path) -> Result<(AppConfig, Option<PathBuf>), ConfigError> {
    for candidate in [paths::project::config_path(project_root), paths::config_path()] {
        if candidate.exists() {
            let config = load_from_path(&candidate)?;
            return Ok((config, Some(candidate)));
        }
    }
    Ok((AppConfig::default(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_dashboard_controls() {
        let config = AppConfig::default();
        assert_eq!(config.model.name, ModelId::Gemini15Flash);
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.model.max_tokens, 400);
        assert_eq!(config.analytics.top_queries, 5);
        assert_eq!(config.analytics.histogram_bins, 10);
        assert_eq!(config.gateway.api_key_env, "GEMINI_API_KEY");
        assert!(config.storage.database.ends_with("medscope.db"));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse(
            Path::new("inline.toml"),
            r#"
            [model]
            name = "gemini-1.5-pro"
            max_tokens = 800
            "#,
        )
        .unwrap();
        assert_eq!(config.model.name, ModelId::Gemini15Pro);
        assert_eq!(config.model.max_tokens, 800);
        assert_eq!(config.model.temperature, 0.3);
        assert_eq!(config.storage, StorageSection::default());
    }

    #[test]
    fn test_unknown_model_is_a_parse_error() {
        let err = parse(Path::new("bad.toml"), "[model]\nname = \"gpt-4\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_settings_are_clamped() {
        let section = ModelSection {
            name: ModelId::Gemini15Flash,
            temperature: 3.0,
            max_tokens: 1234,
            timeout_secs: 5,
        };
        let settings = section.settings();
        assert_eq!(settings.temperature, 1.0);
        assert_eq!(settings.max_tokens, 1000);
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.params().max_tokens, 1000);
    }

    #[test]
    fn test_project_config_is_found_first() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let mut config = AppConfig::default();
        config.analytics.top_queries = 3;
        config.storage.database = "/var/lib/medscope/log.db".to_string();

        let path = paths::project::config_path(temp.path());
        fs::create_dir_all(paths::project::medscope_dir(temp.path()))?;
        fs::write(&path, toml::to_string_pretty(&config)?)?;

        let (loaded, source) = load(temp.path())?;
        assert_eq!(loaded, config);
        assert_eq!(source, Some(path));
        assert_eq!(
            loaded.storage.database_path(),
            PathBuf::from("/var/lib/medscope/log.db")
        );
        Ok(())
    }
}
