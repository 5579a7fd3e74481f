//! Environment variable store.
//!
//! Variables keep their insertion order so listings and pretty-printed maps
//! come out the way they were defined.

use std::collections::BTreeMap;

use cash_types::error::{Result, ShellError};

/// Name of the structured palette variable consulted by the markup engine.
pub const COLORS: &str = "COLORS";

/// Keys of the `COLORS` variable with their default values.
pub const DEFAULT_COLORS: [(&str, &str); 7] = [
    ("text", "#cdd6f4"),
    ("error", "#f38ba8"),
    ("warning", "#f9e2af"),
    ("success", "#a6e3a1"),
    ("heading", "#cba6f7"),
    ("link", "#89b4fa"),
    ("command", "#f5e0dc"),
];

/// Value of an environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    Scalar(String),
    /// Ordered sub-keys, e.g. a color palette.
    Map(Vec<(String, String)>),
}

impl VarValue {
    /// Human-readable form: scalars as-is, maps as `key: value` lines.
    pub fn pretty(&self) -> String {
        match self {
            VarValue::Scalar(value) => value.clone(),
            VarValue::Map(entries) => entries
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Look up a sub-key of a map value.
    pub fn get(&self, key: &str) -> Option<&str> {
        match self {
            VarValue::Scalar(_) => None,
            VarValue::Map(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
        }
    }
}

impl From<&str> for VarValue {
    fn from(value: &str) -> Self {
        VarValue::Scalar(value.to_string())
    }
}

/// Mapping from variable name to value.
#[derive(Debug, Clone, Default)]
pub struct EnvStore {
    vars: Vec<(String, VarValue)>,
}

impl EnvStore {
    /// An empty store with no variables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store holding the default `COLORS` palette.
    pub fn with_defaults() -> Self {
        let mut store = Self::empty();
        let palette = DEFAULT_COLORS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        store.set(COLORS, VarValue::Map(palette));
        store
    }

    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.vars.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Set `name`, keeping its position if it already exists.
    pub fn set(&mut self, name: &str, value: VarValue) {
        match self.vars.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.vars.push((name.to_string(), value)),
        }
    }

    /// Variable names in definition order.
    pub fn names(&self) -> Vec<&str> {
        self.vars.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Pretty-printed value of `name`.
    pub fn pretty(&self, name: &str) -> Option<String> {
        self.get(name).map(VarValue::pretty)
    }

    /// Replace individual palette entries of `COLORS`.
    ///
    /// Unknown palette keys are rejected so a typo in a config file does not
    /// silently do nothing.
    pub fn apply_color_overrides(&mut self, overrides: &BTreeMap<String, String>) -> Result<()> {
        if overrides.is_empty() {
            return Ok(());
        }
        let mut palette = match self.get(COLORS) {
            Some(VarValue::Map(entries)) => entries.clone(),
            _ => Vec::new(),
        };
        for (key, value) in overrides {
            if !DEFAULT_COLORS.iter().any(|(k, _)| k == key) {
                return Err(ShellError::Config(format!("unknown palette key '{key}'")));
            }
            match palette.iter_mut().find(|(k, _)| k == key) {
                Some((_, slot)) => *slot = value.clone(),
                None => palette.push((key.clone(), value.clone())),
            }
            log::debug!("COLORS.{key} = {value}");
        }
        self.set(COLORS, VarValue::Map(palette));
        Ok(())
    }
}
