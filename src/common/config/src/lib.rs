//! Configuration management for sift.
//!
//! Provides runtime configuration for selection vector allocation and memory
//! accounting.

use serde::{Deserialize, Serialize};

use common_error::SiftResult;

/// Global sift configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiftConfig {
    /// Selection vector configuration.
    pub selection: SelectionConfig,
    /// Memory accounting configuration.
    pub memory: MemoryConfig,
}

impl SiftConfig {
    /// Load a configuration from a JSON document. Missing sections fall back
    /// to their defaults.
    pub fn from_json(json: &str) -> SiftResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this configuration as pretty-printed JSON.
    pub fn to_json(&self) -> SiftResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Selection vector allocation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Index width used when a vector is allocated from config.
    pub index_width: IndexWidth,
}

/// Integer width of the indices stored in a selection vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IndexWidth {
    /// Narrowest width able to address the requested capacity.
    #[default]
    Auto,
    /// 16-bit unsigned indices.
    Int16,
    /// 32-bit unsigned indices.
    Int32,
    /// 64-bit unsigned indices.
    Int64,
}

/// Memory accounting settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Memory limit in bytes. `None` means unlimited.
    pub limit: Option<usize>,
}
