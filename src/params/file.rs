//! TOML file format for parameter overrides
//!
//! Deployments that share a set of overrides keep them in a small TOML file:
//!
//! ```toml
//! [metadata]
//! name = "staging"
//!
//! [parameters]
//! IMAGE_TAG = "v1.4.0"
//! MCP_HOST = "jira-mcp.staging.example.com"
//! ```
//!
//! Unknown parameter names are accepted at load time and rejected at merge
//! time, so the error points at the offending name rather than the file.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::Overrides;

/// Errors that can occur when loading or parsing a parameter file
#[derive(Error, Debug)]
pub enum ParamFileError {
    #[error("Failed to read parameter file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse parameter file TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// TOML structure for deserializing parameter files
///
/// A `[metadata]` table (name, description) is accepted and ignored; only
/// `[parameters]` feeds the expansion.
#[derive(Deserialize)]
struct TomlParamFile {
    #[serde(default)]
    parameters: BTreeMap<String, String>,
}

impl Overrides {
    /// Load overrides from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ParamFileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load overrides from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ParamFileError> {
        let parsed: TomlParamFile = toml::from_str(content)?;
        let mut overrides = Overrides::new();
        for (name, value) in parsed.parameters {
            overrides.insert(name, value);
        }
        Ok(overrides)
    }
}
