//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$REPOTREE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/repotree/config.toml`
//! 3. `~/.repotree/config.toml`
//!
//! # Repo Config
//!
//! Located at `.git/repotree/config.toml`.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// font = "Fira Code"
///
/// [tree]
/// group_branches = true
/// cancel_superseded = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Font applied to the root nodes and inherited by their children
    pub font: Option<String>,

    /// Tree behaviour defaults
    pub tree: Option<TreeDefaults>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(font) = &self.font {
            if font.trim().is_empty() {
                return Err(ConfigError::InvalidValue("font cannot be empty".to_string()));
            }
        }
        Ok(())
    }
}

/// Repository configuration. Overrides the global `[tree]` table key by key.
///
/// # Example
///
/// ```toml
/// [tree]
/// group_branches = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Tree behaviour overrides for this repository
    pub tree: Option<TreeDefaults>,
}

/// Tree behaviour settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TreeDefaults {
    /// Nest `a/b/c` branches under `a` and `b` folder nodes
    pub group_branches: Option<bool>,

    /// Stop waiting on a fetch as soon as a newer reload of the same set is issued
    pub cancel_superseded: Option<bool>,
}
