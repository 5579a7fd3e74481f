//! Output styles and the palette they resolve through.

use crate::env::{COLORS, DEFAULT_COLORS, EnvStore, VarValue};

/// A named output style. Each maps to one key of the `COLORS` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Text,
    Error,
    Warning,
    Success,
    Heading,
    Link,
    Command,
}

impl Style {
    pub const ALL: [Style; 7] = [
        Style::Text,
        Style::Error,
        Style::Warning,
        Style::Success,
        Style::Heading,
        Style::Link,
        Style::Command,
    ];

    /// Key of this style inside `COLORS`.
    pub fn key(self) -> &'static str {
        match self {
            Style::Text => "text",
            Style::Error => "error",
            Style::Warning => "warning",
            Style::Success => "success",
            Style::Heading => "heading",
            Style::Link => "link",
            Style::Command => "command",
        }
    }

    fn default_color(self) -> &'static str {
        DEFAULT_COLORS
            .iter()
            .find(|(k, _)| *k == self.key())
            .map_or("inherit", |(_, v)| *v)
    }
}

/// Colors resolved from the environment at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [String; 7],
}

impl Palette {
    /// Read `COLORS` from `env`, falling back to the default for any key
    /// that is missing.
    pub fn from_env(env: &EnvStore) -> Self {
        let var = env.get(COLORS);
        if !matches!(var, Some(VarValue::Map(_))) {
            log::warn!("{COLORS} is not a palette map, using default colors");
        }
        let colors = Style::ALL.map(|style| {
            match var.and_then(|v| v.get(style.key())) {
                Some(color) => color.to_string(),
                None => style.default_color().to_string(),
            }
        });
        Self { colors }
    }

    pub fn color(&self, style: Style) -> &str {
        &self.colors[style as usize]
    }

    /// Wrap already-escaped markup in a colored span.
    pub fn span(&self, style: Style, inner: &str) -> String {
        format!("<span style=\"color: {}\">{inner}</span>", self.color(style))
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_env(&EnvStore::with_defaults())
    }
}
