//! OpenShift `route.openshift.io/v1` Route, reduced to the fields this
//! template emits

use serde::{Deserialize, Serialize};

use super::meta::ObjectMeta;

/// Annotation key cert-manager watches for Route certificate issuance
pub const CERT_MANAGER_ISSUER_ANNOTATION: &str = "cert-manager.io/cluster-issuer";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: RouteSpec,
}

impl Route {
    /// Wrap a spec with the fixed apiVersion/kind pair
    pub fn new(metadata: ObjectMeta, spec: RouteSpec) -> Self {
        Self {
            api_version: "route.openshift.io/v1".to_string(),
            kind: "Route".to_string(),
            metadata,
            spec,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    pub host: String,
    pub to: RouteTarget,
    pub port: RoutePort,
    pub tls: RouteTls,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTarget {
    pub kind: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: u16,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTls {
    pub termination: String,
    pub insecure_edge_termination_policy: String,
}
