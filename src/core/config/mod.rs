//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! repotree has two configuration scopes:
//! - **Global**: User-level settings (font, tree defaults)
//! - **Repo**: Repository-level overrides of the tree defaults
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Example
//!
//! ```no_run
//! use repotree::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo"))).unwrap();
//! println!("font: {}", config.font());
//! println!("group branches: {}", config.group_branches());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig, TreeDefaults};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Font used when none is configured.
pub const DEFAULT_FONT: &str = "monospace";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply precedence automatically: repo overrides global,
/// global overrides built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo and present)
    pub repo: Option<RepoConfig>,
    global_path: Option<PathBuf>,
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `repo_path` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be read or parsed.
    /// Missing config files are not an error (defaults are used).
    pub fn load(repo_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(Self::find_global(), repo_path)
    }

    fn load_from(
        global_path: Option<PathBuf>,
        repo_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global = match &global_path {
            Some(path) => read_toml::<GlobalConfig>(path)?,
            None => GlobalConfig::default(),
        };
        global.validate()?;

        let repo_file = repo_path
            .map(Self::repo_config_path)
            .filter(|path| path.exists());
        let repo = match &repo_file {
            Some(path) => Some(read_toml::<RepoConfig>(path)?),
            None => None,
        };

        if let Some(path) = &global_path {
            log::debug!("loaded global config from {}", path.display());
        }
        if let Some(path) = &repo_file {
            log::debug!("loaded repo config from {}", path.display());
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path: repo_file,
        })
    }

    /// Locate the global config file, if any.
    fn find_global() -> Option<PathBuf> {
        // 1. $REPOTREE_CONFIG
        if let Ok(path) = std::env::var("REPOTREE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/repotree/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("repotree/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.repotree/config.toml
        dirs::home_dir()
            .map(|home| home.join(".repotree/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for repo config.
    ///
    /// Returns `.git/repotree/config.toml` relative to the given repo path.
    pub fn repo_config_path(repo_path: &Path) -> PathBuf {
        repo_path.join(".git/repotree/config.toml")
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Font applied to the roots. Defaults to [`DEFAULT_FONT`].
    pub fn font(&self) -> &str {
        self.global.font.as_deref().unwrap_or(DEFAULT_FONT)
    }

    /// Whether branches are grouped into folders by `/` segment.
    ///
    /// Defaults to `true`.
    pub fn group_branches(&self) -> bool {
        self.tree_setting(|t| t.group_branches).unwrap_or(true)
    }

    /// Whether an in-flight fetch is abandoned once superseded.
    ///
    /// Defaults to `true`.
    pub fn cancel_superseded(&self) -> bool {
        self.tree_setting(|t| t.cancel_superseded).unwrap_or(true)
    }

    fn tree_setting(&self, pick: impl Fn(&TreeDefaults) -> Option<bool>) -> Option<bool> {
        self.repo
            .as_ref()
            .and_then(|r| r.tree.as_ref())
            .and_then(&pick)
            .or_else(|| self.global.tree.as_ref().and_then(&pick))
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
