//! Schema of the ECS params file (`ecs-params.yml`).
//!
//! ```yaml
//! version: 1
//! task_definition:
//!   ecs_network_mode: awsvpc
//!   task_role_arn: arn:aws:iam::123456789012:role/app
//!   task_execution_role: ecsTaskExecutionRole
//!   task_size:
//!     cpu_limit: "256"
//!     mem_limit: 0.5GB
//!   services:
//!     web:
//!       essential: true
//!       cpu_shares: 100
//!       mem_limit: 512m
//!       healthcheck:
//!         test: curl -f http://localhost
//! run_params:
//!   network_configuration:
//!     awsvpc_configuration:
//!       subnets: [subnet-1]
//!       security_groups: [sg-1]
//!       assign_public_ip: ENABLED
//! ```
//!
//! The file is deserialized into private `Raw*` structs first; normalisation
//! turns those into the public types, so a successfully loaded document never
//! holds unparsed union values.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ParamsError;
use crate::healthcheck::{HealthCheck, HealthCheckSpec};
use crate::network::{self, NetworkConfiguration};
use crate::units::{bytes_to_mib, MemoryValue};
use crate::NetworkConfigError;

/// Network mode that requires an explicit network configuration.
pub const AWSVPC_NETWORK_MODE: &str = "awsvpc";

/// Fully normalised params document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskParameterDocument {
    pub version: String,
    pub task_definition: TaskDefinition,
    pub run_params: RunParams,
}

impl TaskParameterDocument {
    /// See [`network::extract_network_configuration`].
    pub fn network_configuration(&self) -> Result<Option<NetworkConfiguration>, NetworkConfigError> {
        network::extract_network_configuration(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    pub network_mode: Option<String>,
    pub task_role_arn: Option<String>,
    pub execution_role: Option<String>,
    /// Keyed by the service name declared in the compose file.
    pub container_definitions: BTreeMap<String, ContainerDefinition>,
    pub task_size: TaskSize,
}

impl TaskDefinition {
    pub fn is_awsvpc(&self) -> bool {
        self.network_mode.as_deref() == Some(AWSVPC_NETWORK_MODE)
    }
}

/// Container fields the compose file has no place for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerDefinition {
    pub essential: bool,
    pub cpu_shares: Option<i64>,
    /// Hard memory limit in bytes.
    pub memory: Option<i64>,
    /// Soft memory limit in bytes.
    pub memory_reservation: Option<i64>,
    pub health_check: Option<HealthCheck>,
}

impl Default for ContainerDefinition {
    fn default() -> Self {
        Self {
            essential: true,
            cpu_shares: None,
            memory: None,
            memory_reservation: None,
            health_check: None,
        }
    }
}

impl ContainerDefinition {
    pub fn memory_mib(&self) -> Option<i64> {
        self.memory.map(bytes_to_mib)
    }

    pub fn memory_reservation_mib(&self) -> Option<i64> {
        self.memory_reservation.map(bytes_to_mib)
    }
}

/// Task-level sizing, required for serverless launches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSize {
    #[serde(default, deserialize_with = "scalar_string")]
    pub cpu_limit: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub mem_limit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_configuration: NetworkConfigurationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfigurationSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub awsvpc_configuration: AwsVpcConfigurationSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwsVpcConfigurationSpec {
    #[serde(default, deserialize_with = "null_as_default")]
    pub subnets: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub security_groups: Vec<String>,
    #[serde(default, deserialize_with = "network::deserialize_assign_public_ip")]
    pub assign_public_ip: Option<network::AssignPublicIp>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default, deserialize_with = "scalar_string")]
    version: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    task_definition: RawTaskDefinition,
    #[serde(default, deserialize_with = "null_as_default")]
    run_params: RunParams,
}

#[derive(Debug, Default, Deserialize)]
struct RawTaskDefinition {
    #[serde(default, rename = "ecs_network_mode", deserialize_with = "scalar_string")]
    network_mode: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    task_role_arn: Option<String>,
    #[serde(default, rename = "task_execution_role", deserialize_with = "scalar_string")]
    execution_role: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    services: BTreeMap<String, Option<RawContainerDefinition>>,
    #[serde(default, deserialize_with = "null_as_default")]
    task_size: TaskSize,
}

#[derive(Debug, Default, Deserialize)]
struct RawContainerDefinition {
    #[serde(default)]
    essential: Option<bool>,
    #[serde(default)]
    cpu_shares: Option<i64>,
    #[serde(default)]
    mem_limit: Option<MemoryValue>,
    #[serde(default)]
    mem_reservation: Option<MemoryValue>,
    #[serde(default)]
    healthcheck: Option<HealthCheckSpec>,
}

impl RawDocument {
    /// Normalises every union field. `origin` is only used for error context.
    pub(crate) fn normalize(self, origin: &Path) -> Result<TaskParameterDocument, ParamsError> {
        let raw = self.task_definition;
        let mut container_definitions = BTreeMap::new();
        for (service, def) in raw.services {
            // `web:` with no body is a container with every default.
            let container = def.unwrap_or_default().normalize(origin, &service)?;
            container_definitions.insert(service, container);
        }

        Ok(TaskParameterDocument {
            version: self.version.unwrap_or_default(),
            task_definition: TaskDefinition {
                network_mode: raw.network_mode,
                task_role_arn: raw.task_role_arn,
                execution_role: raw.execution_role,
                container_definitions,
                task_size: raw.task_size,
            },
            run_params: self.run_params,
        })
    }
}

impl RawContainerDefinition {
    fn normalize(self, origin: &Path, service: &str) -> Result<ContainerDefinition, ParamsError> {
        let memory = |field: &str, value: Option<MemoryValue>| match value {
            None => Ok(None),
            Some(v) => v.to_bytes().map_err(|detail| ParamsError::Format {
                path: origin.to_path_buf(),
                field: format!("services.{}.{}", service, field),
                detail,
            }),
        };

        let health_check = match self.healthcheck {
            None => None,
            Some(spec) => Some(spec.normalize().map_err(|source| ParamsError::HealthCheck {
                path: origin.to_path_buf(),
                service: service.to_string(),
                source,
            })?),
        };

        if let Some(shares) = self.cpu_shares.filter(|shares| *shares < 0) {
            return Err(ParamsError::Format {
                path: origin.to_path_buf(),
                field: format!("services.{}.cpu_shares", service),
                detail: format!("cpu_shares must not be negative, got {}", shares),
            });
        }

        Ok(ContainerDefinition {
            // Containers are essential unless the file says otherwise.
            essential: self.essential.unwrap_or(true),
            cpu_shares: self.cpu_shares,
            memory: memory("mem_limit", self.mem_limit)?,
            memory_reservation: memory("mem_reservation", self.mem_reservation)?,
            health_check,
        })
    }
}

/// Treats an explicit `null` (e.g. a key whose value expanded to nothing) like
/// a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts any YAML scalar as a string, so `version: 1` and `cpu_limit: 256`
/// work unquoted. Empty and null values become `None`.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    let text = match value {
        None | Some(serde_yaml::Value::Null) => return Ok(None),
        Some(serde_yaml::Value::String(s)) => s,
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        Some(serde_yaml::Value::Bool(b)) => b.to_string(),
        Some(other) => {
            return Err(D::Error::custom(format!(
                "expected a scalar value, found {:?}",
                other
            )))
        }
    };
    Ok(Some(text).filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(yaml: &str) -> Result<TaskParameterDocument, ParamsError> {
        serde_yaml::from_str::<RawDocument>(yaml)
            .unwrap()
            .normalize(Path::new("ecs-params.yml"))
    }

    #[test]
    fn essential_defaults_to_true() {
        let doc = normalize(
            "version: 1\ntask_definition:\n  services:\n    web:\n      cpu_shares: 10\n    log:\n      essential: false\n",
        )
        .unwrap();
        let defs = &doc.task_definition.container_definitions;
        assert!(defs["web"].essential);
        assert_eq!(defs["web"].cpu_shares, Some(10));
        assert!(!defs["log"].essential);
        assert_eq!(doc.version, "1");
    }

    #[test]
    fn empty_service_body_takes_defaults() {
        let doc = normalize("task_definition:\n  services:\n    web:\n").unwrap();
        assert_eq!(
            doc.task_definition.container_definitions["web"],
            ContainerDefinition::default()
        );
    }

    #[test]
    fn memory_strings_become_bytes() {
        let doc = normalize(
            "task_definition:\n  services:\n    web:\n      mem_limit: 512m\n      mem_reservation: 268435456\n",
        )
        .unwrap();
        let web = &doc.task_definition.container_definitions["web"];
        assert_eq!(web.memory_mib(), Some(512));
        assert_eq!(web.memory_reservation_mib(), Some(256));
    }

    #[test]
    fn bad_memory_names_the_field() {
        let err = normalize("task_definition:\n  services:\n    web:\n      mem_limit: plenty\n")
            .unwrap_err();
        match err {
            ParamsError::Format { field, .. } => assert_eq!(field, "services.web.mem_limit"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_sizes_are_format_errors() {
        let err = normalize("task_definition:\n  services:\n    web:\n      cpu_shares: -1\n").unwrap_err();
        match err {
            ParamsError::Format { field, .. } => assert_eq!(field, "services.web.cpu_shares"),
            other => panic!("unexpected error: {other}"),
        }

        let err = normalize("task_definition:\n  services:\n    web:\n      mem_limit: -1024\n").unwrap_err();
        match err {
            ParamsError::Format { field, .. } => assert_eq!(field, "services.web.mem_limit"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn health_check_error_names_the_service() {
        let err = normalize(
            "task_definition:\n  services:\n    api:\n      healthcheck:\n        command: [a]\n        test: [b]\n",
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Conflict);
        assert!(err.to_string().contains("'api'"));
    }

    #[test]
    fn unquoted_scalars_are_strings() {
        let doc = normalize(
            "task_definition:\n  ecs_network_mode: awsvpc\n  task_size:\n    cpu_limit: 256\n    mem_limit: 0.5GB\n",
        )
        .unwrap();
        assert!(doc.task_definition.is_awsvpc());
        assert_eq!(doc.task_definition.task_size.cpu_limit.as_deref(), Some("256"));
        assert_eq!(doc.task_definition.task_size.mem_limit.as_deref(), Some("0.5GB"));
    }

    #[test]
    fn null_sections_are_empty() {
        let doc = normalize("version: '1'\ntask_definition:\nrun_params:\n").unwrap();
        assert!(doc.task_definition.container_definitions.is_empty());
        assert!(doc
            .run_params
            .network_configuration
            .awsvpc_configuration
            .subnets
            .is_empty());
    }
}
