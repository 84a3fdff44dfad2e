//! Parse options with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/xmldom/xmldom.toml`
//! 3. Explicit config file passed by the caller
//! 4. Environment variables: `XMLDOM_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;

/// Options controlling how input is turned into a tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParseOptions {
    /// Fail when the input ends while elements are still open
    pub require_closed_root: bool,
    /// Drop whitespace-only text before and after the root element
    pub skip_outer_whitespace: bool,
    /// Trim leading and trailing whitespace of text events
    pub trim_text: bool,
    /// Resolve entity and character references in text
    pub unescape_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            require_closed_root: true,
            skip_outer_whitespace: true,
            trim_text: false,
            unescape_text: true,
        }
    }
}

/// Raw options for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawParseOptions {
    pub require_closed_root: Option<bool>,
    pub skip_outer_whitespace: Option<bool>,
    pub trim_text: Option<bool>,
    pub unescape_text: Option<bool>,
}

/// Get the XDG config directory for xmldom.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "xmldom").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("xmldom.toml"))
}

/// Load a TOML file into RawParseOptions for manual merging.
fn load_raw_options(path: &Path) -> Result<RawParseOptions, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl ParseOptions {
    /// Merge overlay onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawParseOptions) -> Self {
        Self {
            require_closed_root: overlay.require_closed_root.unwrap_or(self.require_closed_root),
            skip_outer_whitespace: overlay
                .skip_outer_whitespace
                .unwrap_or(self.skip_outer_whitespace),
            trim_text: overlay.trim_text.unwrap_or(self.trim_text),
            unescape_text: overlay.unescape_text.unwrap_or(self.unescape_text),
        }
    }

    /// Load options with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional caller-supplied TOML file; must exist if given
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/xmldom/xmldom.toml` (if present)
    /// 3. `config_file`
    /// 4. Environment variables: `XMLDOM_*` prefix
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, silently skipped when absent
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("Loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_options(&global_path)?);
            }
        }

        // 3. Explicit file, an error when missing
        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_options(path)?);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current, Environment::with_prefix("XMLDOM"))
    }

    /// Apply environment overrides from `source` (normally `XMLDOM_*`).
    ///
    /// Env vars replace values - they are explicit user overrides.
    pub fn apply_env_overrides(mut options: Self, source: Environment) -> Result<Self, ApplicationError> {
        let config = Config::builder().add_source(source).build().map_err(config_err)?;

        if let Some(val) = env_bool(&config, "require_closed_root")? {
            options.require_closed_root = val;
        }
        if let Some(val) = env_bool(&config, "skip_outer_whitespace")? {
            options.skip_outer_whitespace = val;
        }
        if let Some(val) = env_bool(&config, "trim_text")? {
            options.trim_text = val;
        }
        if let Some(val) = env_bool(&config, "unescape_text")? {
            options.unescape_text = val;
        }

        Ok(options)
    }

    /// Serialize the effective options to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize: {}", e),
        })
    }
}

/// Boolean override for `key`; None when unset, an error when unparsable.
fn env_bool(config: &Config, key: &str) -> Result<Option<bool>, ApplicationError> {
    match config.get_bool(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
