//! Parameter declarations, strict override merging, and typed value access
//!
//! Every substitution site in the manifest skeleton is backed by a declared
//! parameter with a default value and an expected kind. Overrides are merged
//! over the defaults in strict mode: a key that does not name a declared
//! parameter is an error, never silently ignored.

mod file;
mod value;

use std::collections::BTreeMap;

use thiserror::Error;

pub use file::ParamFileError;

/// Parameter name constants, so builders and tests never spell names inline.
pub mod names {
    pub const IMAGE: &str = "IMAGE";
    pub const IMAGE_TAG: &str = "IMAGE_TAG";
    pub const MCP_TRANSPORT: &str = "MCP_TRANSPORT";
    pub const FASTMCP_HOST: &str = "FASTMCP_HOST";
    pub const CERT_MANAGER_ISSUER_NAME: &str = "CERT_MANAGER_ISSUER_NAME";
    pub const MCP_HOST: &str = "MCP_HOST";
    pub const SNOWFLAKE_BASE_URL: &str = "SNOWFLAKE_BASE_URL";
    pub const SNOWFLAKE_DATABASE: &str = "SNOWFLAKE_DATABASE";
    pub const SNOWFLAKE_SCHEMA: &str = "SNOWFLAKE_SCHEMA";
    pub const ENABLE_METRICS: &str = "ENABLE_METRICS";
    pub const METRICS_PORT: &str = "METRICS_PORT";
}

/// Errors that can occur while merging or reading parameters
#[derive(Debug, Error)]
pub enum ParamError {
    /// Override key does not name a declared parameter
    #[error("unknown parameter override: {name}")]
    UnknownOverride { name: String },

    /// A builder requested a name no declared parameter backs
    #[error("undeclared parameter: {name}")]
    Undeclared { name: String },

    /// A value was requested through the wrong typed accessor
    #[error("type mismatch for parameter {name}: expected {expected} value")]
    TypeMismatch {
        name: String,
        expected: &'static str,
    },

    /// Value does not satisfy the parameter's declared kind
    #[error("malformed value for parameter {name}: {reason}")]
    MalformedValue { name: String, reason: String },
}

/// Expected shape of a parameter's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Any non-empty string
    Str,
    /// Integer in `[1, 65535]`, consumed by numeric port fields
    Port,
    /// DNS-1123 hostname
    Hostname,
    /// `http://` or `https://` URL
    Url,
    /// Image repository reference without tag
    ImageRepo,
}

impl ParamKind {
    /// Human-readable label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            ParamKind::Str => "string",
            ParamKind::Port => "port number",
            ParamKind::Hostname => "hostname",
            ParamKind::Url => "URL",
            ParamKind::ImageRepo => "image repository",
        }
    }
}

/// A declared parameter: name, default, expected kind, documentation
#[derive(Debug, Clone, Copy)]
pub struct Parameter {
    pub name: &'static str,
    pub default: &'static str,
    pub kind: ParamKind,
    pub description: &'static str,
}

/// The declared parameter table. Process-wide constant data; order is
/// documentation order only.
pub const DECLARED: &[Parameter] = &[
    Parameter {
        name: names::IMAGE,
        default: "quay.io/redhat-ai-tools/jira-mcp-snowflake",
        kind: ParamKind::ImageRepo,
        description: "Container image repository",
    },
    Parameter {
        name: names::IMAGE_TAG,
        default: "latest",
        kind: ParamKind::Str,
        description: "Container image tag",
    },
    Parameter {
        name: names::MCP_TRANSPORT,
        default: "sse",
        kind: ParamKind::Str,
        description: "MCP transport mode passed to the service",
    },
    Parameter {
        name: names::FASTMCP_HOST,
        default: "0.0.0.0",
        kind: ParamKind::Str,
        description: "Bind address passed to the service",
    },
    Parameter {
        name: names::CERT_MANAGER_ISSUER_NAME,
        default: "letsencrypt-dns",
        kind: ParamKind::Str,
        description: "cert-manager issuer selected by the Route annotation",
    },
    Parameter {
        name: names::MCP_HOST,
        default: "jira-mcp-snowflake.example.com",
        kind: ParamKind::Hostname,
        description: "External hostname of the Route",
    },
    Parameter {
        name: names::SNOWFLAKE_BASE_URL,
        default: "https://example.snowflakecomputing.com/api/v2",
        kind: ParamKind::Url,
        description: "Snowflake API base URL passed to the service",
    },
    Parameter {
        name: names::SNOWFLAKE_DATABASE,
        default: "YOUR_DB",
        kind: ParamKind::Str,
        description: "Snowflake database name passed to the service",
    },
    Parameter {
        name: names::SNOWFLAKE_SCHEMA,
        default: "YOUR_SCHEMA",
        kind: ParamKind::Str,
        description: "Snowflake schema name passed to the service",
    },
    Parameter {
        name: names::ENABLE_METRICS,
        default: "true",
        kind: ParamKind::Str,
        description: "Whether the service exposes Prometheus metrics",
    },
    Parameter {
        name: names::METRICS_PORT,
        default: "8001",
        kind: ParamKind::Port,
        description: "Metrics listener port; also the metrics Service port",
    },
];

/// Look up a declared parameter by name
pub fn declared(name: &str) -> Option<&'static Parameter> {
    DECLARED.iter().find(|p| p.name == name)
}

/// Caller-supplied parameter overrides
///
/// Built programmatically or loaded from a TOML file (see
/// [`Overrides::from_file`]). Values are always strings; they are checked
/// against the declared parameter kinds when resolved.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    /// Create an empty override set (expansion uses all defaults)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an override, consuming and returning self for chaining
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Insert an override in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Overlay another override set on top of this one (other wins)
    pub fn overlay(&mut self, other: &Overrides) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    /// Whether no overrides are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the overrides in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The merged and validated parameter mapping for one expansion
#[derive(Debug, Clone)]
pub struct ResolvedParams {
    values: BTreeMap<&'static str, String>,
}

/// Merge overrides over the declared defaults in strict mode
///
/// Every override key must name a declared parameter, and every merged value
/// must satisfy its parameter's declared kind. Both checks happen here, so a
/// `ResolvedParams` always holds well-formed values.
pub fn resolve(overrides: &Overrides) -> Result<ResolvedParams, ParamError> {
    let mut values: BTreeMap<&'static str, String> = BTreeMap::new();
    for param in DECLARED {
        values.insert(param.name, param.default.to_string());
    }

    for (name, value) in overrides.iter() {
        let param = declared(name).ok_or_else(|| ParamError::UnknownOverride {
            name: name.to_string(),
        })?;
        values.insert(param.name, value.to_string());
    }

    for param in DECLARED {
        // Defaults are validated too, guarding edits to the declared table.
        value::validate(param.kind, param.name, &values[param.name])?;
    }

    Ok(ResolvedParams { values })
}

impl ResolvedParams {
    /// Read a string-kinded parameter
    ///
    /// Port-kinded parameters must go through [`ResolvedParams::get_port`];
    /// reading one as a string is a type mismatch.
    pub fn get_str(&self, name: &str) -> Result<&str, ParamError> {
        let param = self.lookup(name)?;
        if param.kind == ParamKind::Port {
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: ParamKind::Port.label(),
            });
        }
        Ok(&self.values[param.name])
    }

    /// Read a port-kinded parameter as a number
    pub fn get_port(&self, name: &str) -> Result<u16, ParamError> {
        let param = self.lookup(name)?;
        if param.kind != ParamKind::Port {
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: param.kind.label(),
            });
        }
        value::parse_port(name, &self.values[param.name])
    }

    fn lookup(&self, name: &str) -> Result<&'static Parameter, ParamError> {
        declared(name).ok_or_else(|| ParamError::Undeclared {
            name: name.to_string(),
        })
    }
}
