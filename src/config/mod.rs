//! Configuration system for workflowlens.
//!
//! Settings live in `~/.config/workflowlens/config.toml`. Every field has a
//! default, so the file may set only the keys it cares about, and a missing
//! or unreadable file simply means "all defaults".
//!
//! # Example
//!
//! ```
//! use workflowlens::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.enable_path, "jobs.*.steps.run");
//! assert_eq!(config.language_id, "github-actions-workflow");
//!
//! let custom: Config = toml::from_str("enable_path = \"jobs.*.steps.shell\"").unwrap();
//! assert_eq!(custom.enable_path, "jobs.*.steps.shell");
//! assert_eq!(custom.workflow_globs.len(), 2);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::selector::{WorkflowSelector, DEFAULT_WORKFLOW_GLOBS};
use crate::runner::bridge::WorkflowCommandProvider;
use crate::yamlpath::{KeyPath, Parser, YamlPathError};

/// Errors from reading, writing or interpreting the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid enable_path: {0}")]
    EnablePath(#[from] YamlPathError),

    #[error("invalid workflow glob: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Configuration for workflowlens.
///
/// * `enable_path` - Key-path of values that hold runnable commands (default: "jobs.*.steps.run")
/// * `workflow_globs` - Glob patterns selecting workflow files
/// * `language_id` - Language id registered with the command runner (default: "github-actions-workflow")
/// * `diagnostics_source` - Source label on emitted diagnostics (default: "workflowlens")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Key-path of command values
    #[serde(default = "default_enable_path")]
    pub enable_path: String,

    /// Glob patterns selecting workflow files
    #[serde(default = "default_workflow_globs")]
    pub workflow_globs: Vec<String>,

    /// Language id for command-runner registration
    #[serde(default = "default_language_id")]
    pub language_id: String,

    /// Source label on diagnostics
    #[serde(default = "default_diagnostics_source")]
    pub diagnostics_source: String,
}

fn default_enable_path() -> String {
    "jobs.*.steps.run".to_string()
}

fn default_workflow_globs() -> Vec<String> {
    DEFAULT_WORKFLOW_GLOBS.iter().map(|g| g.to_string()).collect()
}

fn default_language_id() -> String {
    "github-actions-workflow".to_string()
}

fn default_diagnostics_source() -> String {
    "workflowlens".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_path: default_enable_path(),
            workflow_globs: default_workflow_globs(),
            language_id: default_language_id(),
            diagnostics_source: default_diagnostics_source(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/workflowlens/config.toml` on all platforms.
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("workflowlens");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        let Some(config_path) = Self::config_path() else {
            return Self::default();
        };
        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// Loads configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&config_path)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string).map_err(io_err)?;
        Ok(())
    }

    /// Parses `enable_path` into a key-path pattern.
    pub fn enable_path(&self) -> Result<KeyPath, ConfigError> {
        Ok(Parser::parse(&self.enable_path)?)
    }

    /// Compiles `workflow_globs` into a selector.
    pub fn selector(&self) -> Result<WorkflowSelector, ConfigError> {
        Ok(WorkflowSelector::new(&self.workflow_globs)?)
    }

    /// Builds the command-runner provider described by this configuration.
    pub fn command_provider(&self) -> Result<WorkflowCommandProvider, ConfigError> {
        Ok(WorkflowCommandProvider::new(
            self.enable_path()?,
            self.selector()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.enable_path, "jobs.*.steps.run");
        assert_eq!(
            config.workflow_globs,
            vec![
                "**/.github/workflows/**/*.yml",
                "**/.github/workflows/**/*.yaml"
            ]
        );
        assert_eq!(config.diagnostics_source, "workflowlens");
    }

    #[test]
    fn test_enable_path_is_parsed() {
        let path = Config::default().enable_path().unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.to_string(), "jobs.*.steps.run");
    }

    #[test]
    fn test_invalid_enable_path() {
        let config = Config {
            enable_path: "jobs..run".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.enable_path(),
            Err(ConfigError::EnablePath(_))
        ));
        assert!(config.command_provider().is_err());
    }

    #[test]
    fn test_invalid_glob() {
        let config = Config {
            workflow_globs: vec!["[".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.selector(), Err(ConfigError::Glob(_))));
    }
}
