//! `apps/v1` Deployment, reduced to the fields this template emits

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::meta::ObjectMeta;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: DeploymentSpec,
}

impl Deployment {
    /// Wrap a spec with the fixed apiVersion/kind pair
    pub fn new(metadata: ObjectMeta, spec: DeploymentSpec) -> Self {
        Self {
            api_version: "apps/v1".to_string(),
            kind: "Deployment".to_string(),
            metadata,
            spec,
        }
    }

    /// The single container in the pod template
    ///
    /// The template always emits exactly one container; `None` only if the
    /// object was built some other way.
    pub fn container(&self) -> Option<&Container> {
        self.spec.template.spec.containers.first()
    }

    /// Pod labels the Services' selectors must match
    pub fn pod_labels(&self) -> &BTreeMap<String, String> {
        &self.spec.template.metadata.labels
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    pub replicas: i32,
    pub progress_deadline_seconds: i32,
    pub revision_history_limit: i32,
    pub selector: LabelSelector,
    pub strategy: DeploymentStrategy,
    pub template: PodTemplateSpec,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LabelSelector {
    pub match_labels: BTreeMap<String, String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStrategy {
    #[serde(rename = "type")]
    pub strategy_type: String,
    pub rolling_update: RollingUpdate,
}

/// Rolling-update percentages are percent strings, not integers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollingUpdate {
    pub max_surge: String,
    pub max_unavailable: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplateSpec {
    pub metadata: ObjectMeta,
    pub spec: PodSpec,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    pub restart_policy: String,
    pub termination_grace_period_seconds: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    pub env: Vec<EnvVar>,
    pub ports: Vec<ContainerPort>,
    pub resources: ResourceRequirements,
}

impl Container {
    /// Look up an env binding by name
    pub fn env_value(&self, name: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.value.as_str())
    }
}

/// Env values are always strings, even for numeric-looking parameters
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    pub container_port: u16,
    pub protocol: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRequirements {
    pub requests: ResourceList,
    pub limits: ResourceList,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResourceList {
    pub cpu: String,
    pub memory: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_type_field_renamed() {
        let strategy = DeploymentStrategy {
            strategy_type: "RollingUpdate".to_string(),
            rolling_update: RollingUpdate {
                max_surge: "25%".to_string(),
                max_unavailable: "25%".to_string(),
            },
        };
        let yaml = serde_yaml::to_string(&strategy).expect("Should serialize");
        assert!(yaml.contains("type: RollingUpdate"));
        assert!(yaml.contains("maxSurge: 25%"));
        assert!(yaml.contains("maxUnavailable: 25%"));
    }

    #[test]
    fn test_env_value_lookup() {
        let container = Container {
            name: "c".to_string(),
            image: "img:latest".to_string(),
            env: vec![EnvVar::new("A", "1"), EnvVar::new("B", "2")],
            ports: vec![],
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
        assert_eq!(container.env_value("B"), Some("2"));
        assert_eq!(container.env_value("C"), None);
    }
}
