//! Structured files keyed by extension
//!
//! Loader settings are TOML, package metadata and its cache are JSON, and
//! YAML is accepted for hosts that prefer it. [`ConfigStore`] picks the
//! codec from the file extension.

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, NormalizedPath, Result, io};

/// Serialization formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Pick the format for `path` from its extension, case-insensitively.
    pub fn for_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or_default();
        match extension.to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    fn decode<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// JSON is written compactly; the cache artifact is never hand-edited.
    fn encode<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string(value).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }
}

/// Reads and writes serde types in the format implied by the path.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Read and decode `path`.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::for_path(path)?;
        let content = io::read_text(path)?;
        decode_at(format, path, &content)
    }

    /// Decode `content` as if it had been read from `path`.
    pub fn parse<T: DeserializeOwned>(&self, path: &NormalizedPath, content: &str) -> Result<T> {
        decode_at(Format::for_path(path)?, path, content)
    }

    /// Encode `value` and replace `path` atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = Format::for_path(path)?;
        let content = format
            .encode(value)
            .map_err(|message| Error::ConfigSerialize {
                path: path.to_native(),
                format: format.label(),
                message,
            })?;
        io::write_atomic(path, content.as_bytes())
    }
}

fn decode_at<T: DeserializeOwned>(
    format: Format,
    path: &NormalizedPath,
    content: &str,
) -> Result<T> {
    format.decode(content).map_err(|message| Error::ConfigParse {
        path: path.to_native(),
        format: format.label(),
        message,
    })
}
