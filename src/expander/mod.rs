//! Template expansion - builds the concrete resource descriptors
//!
//! Each resource kind has its own builder taking the resolved parameters.
//! The substitution sites are typed: string parameters flow through
//! [`ResolvedParams::get_str`] into string fields, the port parameter through
//! [`ResolvedParams::get_port`] into numeric fields, so a wrongly-typed value
//! is an error at the site instead of a silently mistyped field.

pub mod consistency;

use std::collections::BTreeMap;

use crate::manifest::{
    Container, ContainerPort, Deployment, DeploymentSpec, DeploymentStrategy, EnvVar,
    LabelSelector, ObjectMeta, PodSpec, PodTemplateSpec, Resource, ResourceList,
    ResourceRequirements, RollingUpdate, Route, RoutePort, RouteSpec, RouteTarget, RouteTls,
    Service, ServicePort, ServiceSpec, CERT_MANAGER_ISSUER_ANNOTATION,
};
use crate::params::{names, ParamError, ResolvedParams};

/// Name shared by the Deployment, the application Service, and the Route
pub const APP_NAME: &str = "jira-mcp-snowflake";

/// Name of the metrics Service
pub const METRICS_SERVICE_NAME: &str = "jira-mcp-snowflake-metrics";

/// Fixed application port; not a substitution site
pub const APP_PORT: u16 = 8000;

fn app_labels() -> BTreeMap<String, String> {
    BTreeMap::from([("app".to_string(), APP_NAME.to_string())])
}

/// Build all four resources in their fixed emission order:
/// Deployment, application Service, metrics Service, Route.
///
/// Downstream tooling diffs successive expansions, so the order must be
/// stable for identical input.
pub fn build_all(params: &ResolvedParams) -> Result<Vec<Resource>, ParamError> {
    Ok(vec![
        Resource::Deployment(build_deployment(params)?),
        Resource::Service(build_app_service(params)?),
        Resource::Service(build_metrics_service(params)?),
        Resource::Route(build_route(params)?),
    ])
}

/// The workload: one replica of the service container
pub fn build_deployment(params: &ResolvedParams) -> Result<Deployment, ParamError> {
    let image = format!(
        "{}:{}",
        params.get_str(names::IMAGE)?,
        params.get_str(names::IMAGE_TAG)?
    );

    // Order matters only for diff stability; it mirrors the service's
    // config.py read order.
    let env = vec![
        EnvVar::new("MCP_TRANSPORT", params.get_str(names::MCP_TRANSPORT)?),
        EnvVar::new("FASTMCP_HOST", params.get_str(names::FASTMCP_HOST)?),
        EnvVar::new(
            "SNOWFLAKE_BASE_URL",
            params.get_str(names::SNOWFLAKE_BASE_URL)?,
        ),
        EnvVar::new(
            "SNOWFLAKE_DATABASE",
            params.get_str(names::SNOWFLAKE_DATABASE)?,
        ),
        EnvVar::new(
            "SNOWFLAKE_SCHEMA",
            params.get_str(names::SNOWFLAKE_SCHEMA)?,
        ),
        EnvVar::new("ENABLE_METRICS", params.get_str(names::ENABLE_METRICS)?),
        EnvVar::new(
            "METRICS_PORT",
            params.get_port(names::METRICS_PORT)?.to_string(),
        ),
    ];

    let container = Container {
        name: APP_NAME.to_string(),
        image,
        env,
        ports: vec![ContainerPort {
            container_port: APP_PORT,
            protocol: "TCP".to_string(),
        }],
        resources: ResourceRequirements {
            requests: ResourceList {
                cpu: "50m".to_string(),
                memory: "64Mi".to_string(),
            },
            limits: ResourceList {
                cpu: "100m".to_string(),
                memory: "128Mi".to_string(),
            },
        },
    };

    Ok(Deployment::new(
        ObjectMeta::named(APP_NAME).with_label("app", APP_NAME),
        DeploymentSpec {
            replicas: 1,
            progress_deadline_seconds: 600,
            revision_history_limit: 10,
            selector: LabelSelector {
                match_labels: app_labels(),
            },
            strategy: DeploymentStrategy {
                strategy_type: "RollingUpdate".to_string(),
                rolling_update: RollingUpdate {
                    max_surge: "25%".to_string(),
                    max_unavailable: "25%".to_string(),
                },
            },
            template: PodTemplateSpec {
                metadata: ObjectMeta {
                    name: None,
                    labels: app_labels(),
                    annotations: BTreeMap::new(),
                },
                spec: PodSpec {
                    containers: vec![container],
                    restart_policy: "Always".to_string(),
                    termination_grace_period_seconds: 30,
                },
            },
        },
    ))
}

/// Application traffic Service on the fixed port
pub fn build_app_service(_params: &ResolvedParams) -> Result<Service, ParamError> {
    Ok(Service::new(
        ObjectMeta::named(APP_NAME).with_label("app", APP_NAME),
        ServiceSpec {
            selector: app_labels(),
            ports: vec![ServicePort {
                name: None,
                port: APP_PORT,
                target_port: APP_PORT,
                protocol: "TCP".to_string(),
            }],
        },
    ))
}

/// Metrics traffic Service on the parameterized port
///
/// Emitted regardless of ENABLE_METRICS; the flag is advisory to the
/// container process, not to the template (see DESIGN.md).
pub fn build_metrics_service(params: &ResolvedParams) -> Result<Service, ParamError> {
    let port = params.get_port(names::METRICS_PORT)?;
    Ok(Service::new(
        ObjectMeta::named(METRICS_SERVICE_NAME).with_label("app", APP_NAME),
        ServiceSpec {
            selector: app_labels(),
            ports: vec![ServicePort {
                name: Some("metrics".to_string()),
                port,
                target_port: port,
                protocol: "TCP".to_string(),
            }],
        },
    ))
}

/// Externally routable HTTPS endpoint, edge TLS terminated, targeting the
/// application Service
pub fn build_route(params: &ResolvedParams) -> Result<Route, ParamError> {
    Ok(Route::new(
        ObjectMeta::named(APP_NAME)
            .with_label("app", APP_NAME)
            .with_annotation(
                CERT_MANAGER_ISSUER_ANNOTATION,
                params.get_str(names::CERT_MANAGER_ISSUER_NAME)?,
            ),
        RouteSpec {
            host: params.get_str(names::MCP_HOST)?.to_string(),
            to: RouteTarget {
                kind: "Service".to_string(),
                name: APP_NAME.to_string(),
            },
            port: RoutePort {
                target_port: APP_PORT,
            },
            tls: RouteTls {
                termination: "edge".to_string(),
                insecure_edge_termination_policy: "Redirect".to_string(),
            },
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{resolve, Overrides};

    fn default_params() -> ResolvedParams {
        resolve(&Overrides::new()).expect("Defaults should resolve")
    }

    #[test]
    fn test_deployment_image_joins_repo_and_tag() {
        let deployment = build_deployment(&default_params()).expect("Should build");
        let container = deployment.container().expect("One container");
        assert_eq!(
            container.image,
            "quay.io/redhat-ai-tools/jira-mcp-snowflake:latest"
        );
    }

    #[test]
    fn test_deployment_env_order_is_stable() {
        let deployment = build_deployment(&default_params()).expect("Should build");
        let names: Vec<&str> = deployment
            .container()
            .expect("One container")
            .env
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "MCP_TRANSPORT",
                "FASTMCP_HOST",
                "SNOWFLAKE_BASE_URL",
                "SNOWFLAKE_DATABASE",
                "SNOWFLAKE_SCHEMA",
                "ENABLE_METRICS",
                "METRICS_PORT",
            ]
        );
    }

    #[test]
    fn test_metrics_port_env_is_string_service_port_is_numeric() {
        let params = resolve(&Overrides::new().set(names::METRICS_PORT, "9100")).unwrap();
        let deployment = build_deployment(&params).expect("Should build");
        assert_eq!(
            deployment.container().unwrap().env_value("METRICS_PORT"),
            Some("9100")
        );
        let metrics = build_metrics_service(&params).expect("Should build");
        assert_eq!(metrics.spec.ports[0].port, 9100);
        assert_eq!(metrics.spec.ports[0].target_port, 9100);
    }

    #[test]
    fn test_route_targets_app_service_on_fixed_port() {
        let route = build_route(&default_params()).expect("Should build");
        assert_eq!(route.spec.to.name, APP_NAME);
        assert_eq!(route.spec.to.kind, "Service");
        assert_eq!(route.spec.port.target_port, APP_PORT);
    }

    #[test]
    fn test_route_issuer_annotation() {
        let route = build_route(&default_params()).expect("Should build");
        assert_eq!(
            route
                .metadata
                .annotations
                .get(CERT_MANAGER_ISSUER_ANNOTATION)
                .map(String::as_str),
            Some("letsencrypt-dns")
        );
    }

    #[test]
    fn test_build_all_emission_order() {
        let resources = build_all(&default_params()).expect("Should build");
        let kinds: Vec<&str> = resources.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, ["Deployment", "Service", "Service", "Route"]);
        assert_eq!(resources[1].name(), APP_NAME);
        assert_eq!(resources[2].name(), METRICS_SERVICE_NAME);
    }
}
