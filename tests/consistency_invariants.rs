//! Cross-resource invariants under overrides, and behavior the expander
//! must preserve verbatim (static values, ENABLE_METRICS pass-through)

use jira_mcp_deploy::manifest::{Deployment, Resource, Route, Service};
use jira_mcp_deploy::params::names;
use jira_mcp_deploy::{expand, expand_yaml, Overrides, APP_NAME};
use pretty_assertions::assert_eq;

fn deployment(resources: &[Resource]) -> &Deployment {
    match &resources[0] {
        Resource::Deployment(d) => d,
        other => panic!("expected Deployment, got {}", other.kind()),
    }
}

fn service(resources: &[Resource], index: usize) -> &Service {
    match &resources[index] {
        Resource::Service(s) => s,
        other => panic!("expected Service, got {}", other.kind()),
    }
}

fn route(resources: &[Resource]) -> &Route {
    match &resources[3] {
        Resource::Route(r) => r,
        other => panic!("expected Route, got {}", other.kind()),
    }
}

fn override_sets() -> Vec<Overrides> {
    vec![
        Overrides::new(),
        Overrides::new().set(names::METRICS_PORT, "9100"),
        Overrides::new()
            .set(names::IMAGE, "registry.example.com/ai/jira-mcp")
            .set(names::IMAGE_TAG, "v3"),
        Overrides::new()
            .set(names::MCP_HOST, "mcp.internal.example.org")
            .set(names::ENABLE_METRICS, "false"),
        Overrides::new()
            .set(names::MCP_TRANSPORT, "stdio")
            .set(names::FASTMCP_HOST, "127.0.0.1")
            .set(names::SNOWFLAKE_DATABASE, "JIRA")
            .set(names::SNOWFLAKE_SCHEMA, "MARTS"),
    ]
}

#[test]
fn test_selectors_match_pod_labels_for_all_overrides() {
    for overrides in override_sets() {
        let resources = expand(&overrides).expect("Should expand");
        let pod_labels = deployment(&resources).pod_labels().clone();

        assert_eq!(service(&resources, 1).spec.selector, pod_labels);
        assert_eq!(service(&resources, 2).spec.selector, pod_labels);
        assert_eq!(
            deployment(&resources).spec.selector.match_labels,
            pod_labels
        );
    }
}

#[test]
fn test_route_targets_app_service_for_all_overrides() {
    for overrides in override_sets() {
        let resources = expand(&overrides).expect("Should expand");
        let r = route(&resources);
        let app = service(&resources, 1);

        assert_eq!(r.spec.to.kind, "Service");
        assert_eq!(r.spec.to.name.as_str(), app.metadata.name.as_deref().unwrap());
        assert_eq!(r.spec.to.name, APP_NAME);
        assert_eq!(r.spec.port.target_port, 8000);
        assert_eq!(app.spec.ports[0].port, 8000);
    }
}

#[test]
fn test_metrics_service_port_tracks_parameter() {
    let resources =
        expand(&Overrides::new().set(names::METRICS_PORT, "9100")).expect("Should expand");
    let metrics = service(&resources, 2);
    assert_eq!(metrics.spec.ports[0].port, 9100);
    assert_eq!(metrics.spec.ports[0].target_port, 9100);
    assert_eq!(
        deployment(&resources)
            .container()
            .unwrap()
            .env_value("METRICS_PORT"),
        Some("9100")
    );
}

#[test]
fn test_disabling_metrics_keeps_service_wiring() {
    // The flag is advisory to the container; the template still emits the
    // metrics Service and its port wiring.
    let resources =
        expand(&Overrides::new().set(names::ENABLE_METRICS, "false")).expect("Should expand");
    assert_eq!(resources.len(), 4);

    let metrics = service(&resources, 2);
    assert_eq!(metrics.spec.ports[0].port, 8001);
    assert_eq!(
        deployment(&resources)
            .container()
            .unwrap()
            .env_value("ENABLE_METRICS"),
        Some("false")
    );
}

#[test]
fn test_static_values_are_not_substitution_sites() {
    // Override every parameter with a distinctive value and confirm the
    // static fields come through untouched.
    let overrides = Overrides::new()
        .set(names::IMAGE, "registry.example.com/x/y")
        .set(names::IMAGE_TAG, "t")
        .set(names::MCP_TRANSPORT, "streamable-http")
        .set(names::FASTMCP_HOST, "::")
        .set(names::CERT_MANAGER_ISSUER_NAME, "internal-ca")
        .set(names::MCP_HOST, "m.example.net")
        .set(names::SNOWFLAKE_BASE_URL, "https://s.example.net/api/v2")
        .set(names::SNOWFLAKE_DATABASE, "D")
        .set(names::SNOWFLAKE_SCHEMA, "S")
        .set(names::ENABLE_METRICS, "false")
        .set(names::METRICS_PORT, "19100");

    let resources = expand(&overrides).expect("Should expand");
    let d = deployment(&resources);
    assert_eq!(d.spec.replicas, 1);
    assert_eq!(d.spec.progress_deadline_seconds, 600);
    assert_eq!(d.spec.revision_history_limit, 10);
    assert_eq!(d.spec.strategy.rolling_update.max_surge, "25%");
    assert_eq!(d.spec.strategy.rolling_update.max_unavailable, "25%");
    assert_eq!(d.spec.template.spec.termination_grace_period_seconds, 30);

    let container = d.container().unwrap();
    assert_eq!(container.ports[0].container_port, 8000);
    assert_eq!(container.resources.requests.cpu, "50m");
    assert_eq!(container.resources.requests.memory, "64Mi");
    assert_eq!(container.resources.limits.cpu, "100m");
    assert_eq!(container.resources.limits.memory, "128Mi");

    let r = route(&resources);
    assert_eq!(r.spec.tls.termination, "edge");
    assert_eq!(r.spec.tls.insecure_edge_termination_policy, "Redirect");
}

#[test]
fn test_no_placeholder_markers_in_output() {
    for overrides in override_sets() {
        let yaml = expand_yaml(&overrides).expect("Should expand");
        assert!(!yaml.contains("${"), "placeholder marker left in:\n{yaml}");
    }
}
