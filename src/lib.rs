//! Deployment manifest expander for the Jira MCP Snowflake service
//!
//! This library expands a parameter mapping into the four OpenShift resources
//! that deploy the service: a Deployment, an application Service (port 8000),
//! a metrics Service (port = METRICS_PORT), and an edge-TLS Route. Expansion
//! is a pure function: strict override merging, typed substitution sites, and
//! a cross-resource consistency check, with no cluster I/O.
//!
//! # Example
//!
//! ```rust
//! use jira_mcp_deploy::{expand, Overrides};
//!
//! let resources = expand(&Overrides::new().set("METRICS_PORT", "9100")).unwrap();
//! assert_eq!(resources.len(), 4);
//! ```

pub mod expander;
pub mod manifest;
pub mod params;

pub use expander::consistency::ConsistencyError;
pub use expander::{APP_NAME, APP_PORT, METRICS_SERVICE_NAME};
pub use manifest::Resource;
pub use params::{Overrides, ParamError, ParamFileError, Parameter, ResolvedParams};

use params::names;
use thiserror::Error;

/// Errors that can occur during expansion
#[derive(Debug, Error)]
pub enum ExpandError {
    /// Error merging or reading parameters
    #[error("parameter error: {0}")]
    Param(#[from] ParamError),

    /// A cross-resource invariant was violated
    #[error("consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    /// Error serializing the output stream
    #[error("serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Expand the template with the given overrides
///
/// Returns the resources in their fixed emission order: Deployment,
/// application Service, metrics Service, Route. Expansion is all-or-nothing;
/// any parameter or consistency violation fails the whole call.
pub fn expand(overrides: &Overrides) -> Result<Vec<Resource>, ExpandError> {
    let params = params::resolve(overrides)?;
    let resources = expander::build_all(&params)?;

    let metrics_port = params.get_port(names::METRICS_PORT)?;
    let metrics_enabled = params.get_str(names::ENABLE_METRICS)? == "true";
    expander::consistency::check(&resources, metrics_port, metrics_enabled)?;

    Ok(resources)
}

/// Expand the template and serialize it as a multi-document YAML stream
pub fn expand_yaml(overrides: &Overrides) -> Result<String, ExpandError> {
    let resources = expand(overrides)?;
    Ok(manifest::to_yaml(&resources)?)
}
