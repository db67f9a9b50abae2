//! Network configuration for tasks in awsvpc mode.

use serde::{Deserialize, Deserializer, Serialize};

use crate::document::TaskParameterDocument;
use crate::error::NetworkConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssignPublicIp {
    Enabled,
    Disabled,
}

/// `ENABLED`, `DISABLED`, or empty/null for unset.
pub(crate) fn deserialize_assign_public_ip<'de, D>(
    deserializer: D,
) -> Result<Option<AssignPublicIp>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some("ENABLED") => Ok(Some(AssignPublicIp::Enabled)),
        Some("DISABLED") => Ok(Some(AssignPublicIp::Disabled)),
        Some(other) => Err(D::Error::custom(format!(
            "invalid assign_public_ip '{}', expected ENABLED or DISABLED",
            other
        ))),
    }
}

/// Network configuration in the shape the task launch API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfiguration {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
    /// Left unset when absent: launch types without public IP support reject
    /// the field outright.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign_public_ip: Option<AssignPublicIp>,
}

/// Returns `Ok(None)` unless the task uses awsvpc networking, in which case
/// at least one subnet is required.
pub fn extract_network_configuration(
    doc: &TaskParameterDocument,
) -> Result<Option<NetworkConfiguration>, NetworkConfigError> {
    if !doc.task_definition.is_awsvpc() {
        return Ok(None);
    }

    let awsvpc = &doc.run_params.network_configuration.awsvpc_configuration;
    if awsvpc.subnets.is_empty() {
        return Err(NetworkConfigError::MissingSubnet);
    }

    Ok(Some(NetworkConfiguration {
        subnets: awsvpc.subnets.clone(),
        security_groups: awsvpc.security_groups.clone(),
        assign_public_ip: awsvpc.assign_public_ip,
    }))
}
