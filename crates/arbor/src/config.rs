use std::path::Path;

use arbor_text::ParserConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ArborError, ArborResult};

/// Configuration for an [`Arbor`](crate::Arbor) tree.
///
/// ```toml
/// fallback_to_text = true
///
/// [parser]
/// indent_width = 2
/// allow_tabs = false
/// max_depth = 16
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArborConfig {
    /// Lexical settings for loaded text.
    pub parser: ParserConfig,
    /// Whether untyped values no other parser claims are stored as text.
    /// When `false` they are left unwritten.
    pub fallback_to_text: bool,
}

impl Default for ArborConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            fallback_to_text: true,
        }
    }
}

impl ArborConfig {
    /// Parse from TOML and validate.
    pub fn from_toml_str(text: &str) -> ArborResult<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|e| ArborError::Config(format!("failed to parse arbor config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. A missing file yields the default configuration.
    pub fn load(path: &Path) -> ArborResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> ArborResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ArborError::Config(format!("failed to serialize arbor config: {e}")))
    }

    pub fn validate(&self) -> ArborResult<()> {
        self.parser.validate()?;
        Ok(())
    }
}
