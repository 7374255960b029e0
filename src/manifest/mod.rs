//! Cluster resource object model
//!
//! A hand-rolled subset of the Kubernetes/OpenShift API types, covering only
//! the fields this template emits. Pulling in the full generated API surface
//! would dwarf the crate for no benefit; what matters here is that numeric
//! fields are numeric types and serialization is camelCase and deterministic.

mod deployment;
mod meta;
mod route;
mod service;

pub use deployment::{
    Container, ContainerPort, Deployment, DeploymentSpec, DeploymentStrategy, EnvVar,
    LabelSelector, PodSpec, PodTemplateSpec, ResourceList, ResourceRequirements, RollingUpdate,
};
pub use meta::ObjectMeta;
pub use route::{Route, RoutePort, RouteSpec, RouteTarget, RouteTls, CERT_MANAGER_ISSUER_ANNOTATION};
pub use service::{Service, ServicePort, ServiceSpec};

use serde::Serialize;

/// One expanded cluster resource
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Resource {
    Deployment(Deployment),
    Service(Service),
    Route(Route),
}

impl Resource {
    /// The resource's `kind` field
    pub fn kind(&self) -> &str {
        match self {
            Resource::Deployment(d) => &d.kind,
            Resource::Service(s) => &s.kind,
            Resource::Route(r) => &r.kind,
        }
    }

    /// The resource's metadata
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Resource::Deployment(d) => &d.metadata,
            Resource::Service(s) => &s.metadata,
            Resource::Route(r) => &r.metadata,
        }
    }

    /// The resource's metadata name, `""` if unset
    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or("")
    }
}

/// Serialize resources as a multi-document YAML stream
///
/// Each resource becomes its own `---`-prefixed document, in slice order.
pub fn to_yaml(resources: &[Resource]) -> Result<String, serde_yaml::Error> {
    let mut out = String::new();
    for resource in resources {
        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(resource)?);
    }
    Ok(out)
}
