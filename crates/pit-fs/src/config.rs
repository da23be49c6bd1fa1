//! Format-agnostic configuration loading and saving

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Structured file formats understood by [`ConfigStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }

    /// Parse `content`; `origin` only labels error messages.
    pub fn parse<T: DeserializeOwned>(self, content: &str, origin: &Path) -> Result<T> {
        let parsed = match self {
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::ConfigParse {
            path: origin.to_path_buf(),
            format: self.name().into(),
            message,
        })
    }

    /// Serialize `value` in pretty form, keeping struct field order.
    pub fn render<T: Serialize>(self, value: &T, origin: &Path) -> Result<String> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| Error::ConfigSerialize {
            path: origin.to_path_buf(),
            format: self.name().into(),
            message,
        })
    }
}

/// Format-agnostic configuration store.
///
/// Detects format from file extension and handles
/// serialization/deserialization transparently.
#[derive(Debug, Default)]
pub struct ConfigStore {
    robustness: io::RobustnessConfig,
}

impl ConfigStore {
    /// Create a new ConfigStore with default robustness settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a value from a `.json` or `.toml` file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = ConfigFormat::from_path(path)?;
        let content = io::read_text(path)?;
        format.parse(&content, &path.to_native())
    }

    /// Save a value, replacing the file atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = ConfigFormat::from_path(path)?;
        let content = format.render(value, &path.to_native())?;
        io::write_atomic(path, content.as_bytes(), self.robustness)
    }
}
