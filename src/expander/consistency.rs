//! Post-build consistency validation
//!
//! The four resources are listed independently, so nothing in the type system
//! forces their ports, selectors, and target names to agree. This pass checks
//! the cross-resource contract after building and fails the whole expansion
//! on the first violation, naming the offending field path. A malformed
//! descriptor rejected here is far cheaper than one rejected by a cluster.

use std::collections::BTreeMap;

use serde_yaml::Value;
use thiserror::Error;

use crate::manifest::{Deployment, Resource, Route, Service};

use super::{APP_NAME, APP_PORT, METRICS_SERVICE_NAME};

/// A violated cross-resource invariant, with the offending field path
#[derive(Debug, Error)]
pub enum ConsistencyError {
    /// Expansion did not produce the expected resource
    #[error("missing expected resource: {kind} {name}")]
    MissingResource { kind: &'static str, name: String },

    /// A Service selector does not equal the Deployment's pod labels
    #[error("selector at {path} does not equal the deployment pod labels")]
    SelectorMismatch { path: String },

    /// The Route does not target the application Service
    #[error("route target at {path}: expected {expected}, found {found}")]
    RouteTargetMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// An application-traffic port differs from the fixed port
    #[error("application port at {path}: expected {expected}, found {found}")]
    AppPortMismatch {
        path: String,
        expected: u16,
        found: u16,
    },

    /// Metrics wiring disagrees with the resolved METRICS_PORT
    #[error("metrics port at {path}: expected {expected}, found {found}")]
    MetricsPortMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// A serialized string still carries a substitution marker
    #[error("unresolved placeholder at {path}: {value}")]
    UnresolvedPlaceholder { path: String, value: String },

    /// A port field is outside `[1, 65535]`
    #[error("port at {path} is outside [1, 65535]: {port}")]
    PortOutOfRange { path: String, port: u16 },

    /// A resource list has no port entry to check
    #[error("no ports defined at {path}")]
    MissingPort { path: String },

    #[error("serialization failed during validation: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

/// Check all cross-resource invariants over an expanded sequence
///
/// `metrics_port` is the resolved METRICS_PORT value; `metrics_enabled`
/// gates the env/port cross-check (the metrics wiring itself is emitted
/// either way).
pub fn check(
    resources: &[Resource],
    metrics_port: u16,
    metrics_enabled: bool,
) -> Result<(), ConsistencyError> {
    let deployment = find_deployment(resources)?;
    let app_service = find_service(resources, APP_NAME)?;
    let metrics_service = find_service(resources, METRICS_SERVICE_NAME)?;
    let route = find_route(resources)?;

    check_selectors(deployment, app_service, metrics_service)?;
    check_route_target(route, app_service)?;
    check_app_port(route, app_service)?;
    check_metrics_port(metrics_service, deployment, metrics_port, metrics_enabled)?;
    check_port_ranges(resources)?;
    check_no_placeholders(resources)?;
    Ok(())
}

fn find_deployment(resources: &[Resource]) -> Result<&Deployment, ConsistencyError> {
    resources
        .iter()
        .find_map(|r| match r {
            Resource::Deployment(d) => Some(d),
            _ => None,
        })
        .ok_or_else(|| ConsistencyError::MissingResource {
            kind: "Deployment",
            name: APP_NAME.to_string(),
        })
}

fn find_service<'a>(
    resources: &'a [Resource],
    name: &str,
) -> Result<&'a Service, ConsistencyError> {
    resources
        .iter()
        .find_map(|r| match r {
            Resource::Service(s) if s.metadata.name.as_deref() == Some(name) => Some(s),
            _ => None,
        })
        .ok_or_else(|| ConsistencyError::MissingResource {
            kind: "Service",
            name: name.to_string(),
        })
}

fn find_route(resources: &[Resource]) -> Result<&Route, ConsistencyError> {
    resources
        .iter()
        .find_map(|r| match r {
            Resource::Route(route) => Some(route),
            _ => None,
        })
        .ok_or_else(|| ConsistencyError::MissingResource {
            kind: "Route",
            name: APP_NAME.to_string(),
        })
}

/// Both Services select exactly the Deployment's pod labels,
/// and the Deployment's own selector agrees with them.
fn check_selectors(
    deployment: &Deployment,
    app_service: &Service,
    metrics_service: &Service,
) -> Result<(), ConsistencyError> {
    let pod_labels = deployment.pod_labels();

    let selector_sites: [(&str, &BTreeMap<String, String>); 3] = [
        (
            "deployment/jira-mcp-snowflake/spec/selector/matchLabels",
            &deployment.spec.selector.match_labels,
        ),
        (
            "service/jira-mcp-snowflake/spec/selector",
            &app_service.spec.selector,
        ),
        (
            "service/jira-mcp-snowflake-metrics/spec/selector",
            &metrics_service.spec.selector,
        ),
    ];

    for (path, selector) in selector_sites {
        if *selector != *pod_labels {
            return Err(ConsistencyError::SelectorMismatch {
                path: path.to_string(),
            });
        }
    }
    Ok(())
}

/// The Route targets the application Service, never the
/// metrics Service.
fn check_route_target(route: &Route, app_service: &Service) -> Result<(), ConsistencyError> {
    let expected = app_service.metadata.name.as_deref().unwrap_or("");
    if route.spec.to.kind != "Service" || route.spec.to.name != expected {
        return Err(ConsistencyError::RouteTargetMismatch {
            path: "route/jira-mcp-snowflake/spec/to/name".to_string(),
            expected: expected.to_string(),
            found: format!("{} {}", route.spec.to.kind, route.spec.to.name),
        });
    }
    Ok(())
}

/// Route target port and both app Service port fields are the
/// fixed application port.
fn check_app_port(route: &Route, app_service: &Service) -> Result<(), ConsistencyError> {
    let app_port =
        app_service
            .spec
            .ports
            .first()
            .ok_or_else(|| ConsistencyError::MissingPort {
                path: "service/jira-mcp-snowflake/spec/ports".to_string(),
            })?;

    let port_sites = [
        (
            "service/jira-mcp-snowflake/spec/ports[0]/port",
            app_port.port,
        ),
        (
            "service/jira-mcp-snowflake/spec/ports[0]/targetPort",
            app_port.target_port,
        ),
        (
            "route/jira-mcp-snowflake/spec/port/targetPort",
            route.spec.port.target_port,
        ),
    ];

    for (path, found) in port_sites {
        if found != APP_PORT {
            return Err(ConsistencyError::AppPortMismatch {
                path: path.to_string(),
                expected: APP_PORT,
                found,
            });
        }
    }
    Ok(())
}

/// The metrics Service's port and targetPort equal the resolved
/// METRICS_PORT, and when metrics are enabled the container's METRICS_PORT
/// env binding agrees.
fn check_metrics_port(
    metrics_service: &Service,
    deployment: &Deployment,
    metrics_port: u16,
    metrics_enabled: bool,
) -> Result<(), ConsistencyError> {
    let port = metrics_service
        .spec
        .ports
        .first()
        .ok_or_else(|| ConsistencyError::MissingPort {
            path: "service/jira-mcp-snowflake-metrics/spec/ports".to_string(),
        })?;

    for (path, found) in [
        ("service/jira-mcp-snowflake-metrics/spec/ports[0]/port", port.port),
        (
            "service/jira-mcp-snowflake-metrics/spec/ports[0]/targetPort",
            port.target_port,
        ),
    ] {
        if found != metrics_port {
            return Err(ConsistencyError::MetricsPortMismatch {
                path: path.to_string(),
                expected: metrics_port.to_string(),
                found: found.to_string(),
            });
        }
    }

    if metrics_enabled {
        let env_value = deployment
            .container()
            .and_then(|c| c.env_value("METRICS_PORT"))
            .unwrap_or("");
        if env_value != metrics_port.to_string() {
            return Err(ConsistencyError::MetricsPortMismatch {
                path: "deployment/jira-mcp-snowflake/spec/template/spec/containers[0]/env/METRICS_PORT"
                    .to_string(),
                expected: metrics_port.to_string(),
                found: env_value.to_string(),
            });
        }
    }
    Ok(())
}

/// Every port field is in `[1, 65535]`. The field types cap the
/// upper bound; zero is the value that could still slip through.
fn check_port_ranges(resources: &[Resource]) -> Result<(), ConsistencyError> {
    for resource in resources {
        match resource {
            Resource::Deployment(d) => {
                for (i, container) in d.spec.template.spec.containers.iter().enumerate() {
                    for (j, port) in container.ports.iter().enumerate() {
                        if port.container_port == 0 {
                            return Err(ConsistencyError::PortOutOfRange {
                                path: format!(
                                    "deployment/{}/spec/template/spec/containers[{}]/ports[{}]",
                                    d.metadata.name.as_deref().unwrap_or(""),
                                    i,
                                    j
                                ),
                                port: 0,
                            });
                        }
                    }
                }
            }
            Resource::Service(s) => {
                for (i, port) in s.spec.ports.iter().enumerate() {
                    if port.port == 0 || port.target_port == 0 {
                        return Err(ConsistencyError::PortOutOfRange {
                            path: format!(
                                "service/{}/spec/ports[{}]",
                                s.metadata.name.as_deref().unwrap_or(""),
                                i
                            ),
                            port: 0,
                        });
                    }
                }
            }
            Resource::Route(r) => {
                if r.spec.port.target_port == 0 {
                    return Err(ConsistencyError::PortOutOfRange {
                        path: format!(
                            "route/{}/spec/port/targetPort",
                            r.metadata.name.as_deref().unwrap_or("")
                        ),
                        port: 0,
                    });
                }
            }
        }
    }
    Ok(())
}

/// No string field anywhere in the serialized output still
/// carries a `${` substitution marker.
fn check_no_placeholders(resources: &[Resource]) -> Result<(), ConsistencyError> {
    for resource in resources {
        let value = serde_yaml::to_value(resource)?;
        let root = format!("{}/{}", resource.kind().to_lowercase(), resource.name());
        scan_value(&root, &value)?;
    }
    Ok(())
}

fn scan_value(path: &str, value: &Value) -> Result<(), ConsistencyError> {
    match value {
        Value::String(s) => {
            if s.contains("${") {
                return Err(ConsistencyError::UnresolvedPlaceholder {
                    path: path.to_string(),
                    value: s.clone(),
                });
            }
            Ok(())
        }
        Value::Mapping(map) => {
            for (key, child) in map {
                let key = key.as_str().unwrap_or("?");
                scan_value(&format!("{}/{}", path, key), child)?;
            }
            Ok(())
        }
        Value::Sequence(seq) => {
            for (i, child) in seq.iter().enumerate() {
                scan_value(&format!("{}[{}]", path, i), child)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}
