//! Single source of truth for medscope filesystem layout.
//!
//! This module defines WHERE data lives. It has no I/O, no validation,
//! no business logic.
//!
//! # User-Level Paths (~/.medscope/)
//!
//! ```text
//! ~/.medscope/
//! └── config.toml              # Global config (fallback)
//! ```
//!
//! # Project-Level Paths (project/.medscope/)
//!
//! ```text
//! project/.medscope/
//! ├── config.toml              # Project config
//! └── data/                    # Durable log (gitignored)
//!     └── medscope.db          # interactions + evaluations
//! ```

use std::path::{Path, PathBuf};

// =============================================================================
// User Level (~/.medscope/)
// =============================================================================

/// User's medscope home directory: `~/.medscope/`
pub fn medscope_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".medscope")
}

/// Global config file: `~/.medscope/config.toml`
pub fn config_path() -> PathBuf {
    medscope_home().join("config.toml")
}

// =============================================================================
// Project Level (project/.medscope/)
// =============================================================================

pub mod project {
    use super::*;

    /// Project's medscope directory: `.medscope/`
    pub fn medscope_dir(root: &Path) -> PathBuf {
        root.join(".medscope")
    }

    /// Project config: `.medscope/config.toml`
    pub fn config_path(root: &Path) -> PathBuf {
        medscope_dir(root).join("config.toml")
    }

    /// Data directory: `.medscope/data/`
    pub fn data_dir(root: &Path) -> PathBuf {
        medscope_dir(root).join("data")
    }

    /// Record store database: `.medscope/data/medscope.db`
    pub fn db_path(root: &Path) -> PathBuf {
        data_dir(root).join("medscope.db")
    }
}

/// Conventional export file names offered by the CLI
pub mod exports {
    /// Results of one evaluation run
    pub const EVALUATION_RESULTS: &str = "evaluation_results.csv";

    /// Full evaluation log (test report)
    pub const TEST_REPORT: &str = "test_report.csv";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medscope_home() {
        let home = medscope_home();
        assert!(home.ends_with(".medscope"));
        assert!(config_path().starts_with(&home));
    }

    #[test]
    fn test_project_paths() {
        let root = Path::new("/work/clinic");
        assert_eq!(
            project::config_path(root),
            PathBuf::from("/work/clinic/.medscope/config.toml")
        );
        assert_eq!(
            project::db_path(root),
            PathBuf::from("/work/clinic/.medscope/data/medscope.db")
        );
        let data = project::data_dir(root);
        assert!(project::db_path(root).starts_with(&data));
        assert!(data.starts_with(project::medscope_dir(root)));
    }
}
