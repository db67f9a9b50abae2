use std::fmt;

use serde::Serialize;

use crate::document::{ClusterEntry, ProfileEntry};

/// Merged view of one profile and one cluster entry.
///
/// Built fresh on every resolution and never written back to disk.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub cluster: String,
    pub region: String,
    /// Named AWS credentials profile; only the legacy format carries this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(skip)]
    pub secret_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_project_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compose_service_name_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfn_stack_name_prefix: Option<String>,
}

impl ResolvedConfig {
    pub(crate) fn merge(profile: &ProfileEntry, cluster: &ClusterEntry) -> Self {
        Self {
            cluster: cluster.cluster.clone(),
            region: cluster.region.clone(),
            aws_profile: None,
            access_key: Some(profile.access_key.clone()),
            secret_key: Some(profile.secret_key.clone()),
            compose_project_name_prefix: cluster.compose_project_name_prefix.clone(),
            compose_service_name_prefix: cluster.compose_service_name_prefix.clone(),
            cfn_stack_name_prefix: cluster.cfn_stack_name_prefix.clone(),
        }
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("cluster", &self.cluster)
            .field("region", &self.region)
            .field("aws_profile", &self.aws_profile)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("compose_project_name_prefix", &self.compose_project_name_prefix)
            .field("compose_service_name_prefix", &self.compose_service_name_prefix)
            .field("cfn_stack_name_prefix", &self.cfn_stack_name_prefix)
            .finish()
    }
}
