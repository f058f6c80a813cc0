use serde::{Deserialize, Serialize};

use crate::error::{TextError, TextResult};

/// Lexical settings for the indented text format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Spaces that make up one indent level.
    pub indent_width: usize,
    /// Whether a tab counts as one indent level.
    pub allow_tabs: bool,
    /// Maximum nesting depth; a line at level `max_depth` is rejected.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            allow_tabs: true,
            max_depth: 64,
        }
    }
}

impl ParserConfig {
    /// Parse from TOML. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> TextResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| TextError::Config(format!("failed to parse parser config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TextResult<()> {
        if self.indent_width == 0 {
            return Err(TextError::Config("indent_width must be at least 1".into()));
        }
        if self.max_depth == 0 {
            return Err(TextError::Config("max_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// One indent level as emitted by the re-serialiser.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}
