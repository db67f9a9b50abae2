//! # ecsctl task parameters
//!
//! Parses the ECS params file that sits next to a compose file and carries
//! the ECS-only settings compose has no room for: task roles, sizing,
//! per-container essentials, health checks and awsvpc network configuration.
//!
//! Environment references in the file are expanded before parsing, and every
//! field that accepts more than one syntax is normalised into one canonical
//! form.

#![deny(rustdoc::broken_intra_doc_links)]

mod document;
mod env;
mod error;
mod healthcheck;
mod network;
mod parser;
mod units;

pub use document::{
    AwsVpcConfigurationSpec, ContainerDefinition, NetworkConfigurationSpec, RunParams,
    TaskDefinition, TaskParameterDocument, TaskSize, AWSVPC_NETWORK_MODE,
};
pub use env::{expand, Environment};
pub use error::{ErrorKind, HealthCheckError, NetworkConfigError, ParamsError};
pub use healthcheck::{CommandSpec, HealthCheck, HealthCheckSpec, CMD_SHELL, DEFAULT_RETRIES};
pub use network::{extract_network_configuration, AssignPublicIp, NetworkConfiguration};
pub use parser::{read_ecs_params, TaskParamsLoader, DEFAULT_PARAMS_FILE};
pub use units::{bytes_to_mib, parse_bytes, parse_seconds, MemoryValue, TimeValue};
