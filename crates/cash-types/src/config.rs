//! Shell configuration loaded from TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, ShellError};

/// Top-level configuration for a shell front end.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    /// JSON file used to persist `wd`/`fs` between runs. In-memory when unset.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
    /// `env_logger` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Print plain text instead of markup.
    #[serde(default)]
    pub plain: bool,
    /// Overrides for entries of the `COLORS` palette, keyed by style name.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            state_file: None,
            log_filter: default_log_filter(),
            plain: false,
            colors: BTreeMap::new(),
        }
    }
}

impl ShellConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: ShellConfig = toml::from_str(toml_str)?;
        for (key, value) in &config.colors {
            if !is_hex_color(value) {
                return Err(ShellError::Config(format!(
                    "colors.{key}: expected a hex color, got '{value}'"
                )));
            }
        }
        Ok(config)
    }

    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ShellError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }
}

/// `#rgb` or `#rrggbb`.
fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
