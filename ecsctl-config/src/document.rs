//! Typed schema of the profile and cluster documents.
//!
//! Both documents share one layout: a `default` pointer naming one entry and a
//! mapping of entry name to entry fields. [`EntryDocument`] captures that
//! shared layout so the store and resolver handle both the same way.
//!
//! Keys the schema does not name are kept in `extra` on every level, so a
//! read-modify-write by this tool never drops what a newer tool wrote.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::destination::{Destination, CLUSTER_CONFIG_FILE, PROFILE_CONFIG_FILE};

/// Keys carried through unchanged on read-modify-write.
pub type ExtraKeys = BTreeMap<String, serde_yaml::Value>;

/// Credentials stored under one name in the profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileEntry {
    #[serde(rename = "aws_access_key_id")]
    #[validate(length(min = 1, message = "access key must not be empty"))]
    pub access_key: String,

    #[serde(rename = "aws_secret_access_key")]
    #[validate(length(min = 1, message = "secret key must not be empty"))]
    pub secret_key: String,

    #[serde(flatten)]
    pub extra: ExtraKeys,
}

impl ProfileEntry {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            extra: ExtraKeys::new(),
        }
    }
}

/// Target cluster settings stored under one name in the cluster document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClusterEntry {
    #[validate(length(min = 1, message = "cluster must not be empty"))]
    pub cluster: String,

    #[validate(length(min = 1, message = "region must not be empty"))]
    pub region: String,

    #[serde(
        rename = "compose-project-name-prefix",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compose_project_name_prefix: Option<String>,

    #[serde(
        rename = "compose-service-name-prefix",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub compose_service_name_prefix: Option<String>,

    #[serde(
        rename = "cfn-stack-name-prefix",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cfn_stack_name_prefix: Option<String>,

    #[serde(flatten)]
    pub extra: ExtraKeys,
}

impl ClusterEntry {
    pub fn new(cluster: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            region: region.into(),
            compose_project_name_prefix: None,
            compose_service_name_prefix: None,
            cfn_stack_name_prefix: None,
            extra: ExtraKeys::new(),
        }
    }
}

/// `profile.yml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub ecs_profiles: BTreeMap<String, ProfileEntry>,

    #[serde(flatten)]
    pub extra: ExtraKeys,
}

/// `config.yml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default)]
    pub clusters: BTreeMap<String, ClusterEntry>,

    #[serde(flatten)]
    pub extra: ExtraKeys,
}

/// A document holding named entries plus a pointer to the default one.
pub trait EntryDocument: Default + Serialize + DeserializeOwned {
    type Entry: Clone + Serialize + Validate;

    /// Human name used in error messages ("profile", "cluster").
    const KIND: &'static str;
    /// File name inside the destination directory.
    const FILE_NAME: &'static str;

    fn default_name(&self) -> Option<&str>;
    fn set_default_name(&mut self, name: String);
    fn entries(&self) -> &BTreeMap<String, Self::Entry>;
    fn entries_mut(&mut self) -> &mut BTreeMap<String, Self::Entry>;

    fn path_in(destination: &Destination) -> std::path::PathBuf {
        destination.path.join(Self::FILE_NAME)
    }
}

impl EntryDocument for ProfileDocument {
    type Entry = ProfileEntry;

    const KIND: &'static str = "profile";
    const FILE_NAME: &'static str = PROFILE_CONFIG_FILE;

    fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    fn set_default_name(&mut self, name: String) {
        self.default = Some(name);
    }

    fn entries(&self) -> &BTreeMap<String, ProfileEntry> {
        &self.ecs_profiles
    }

    fn entries_mut(&mut self) -> &mut BTreeMap<String, ProfileEntry> {
        &mut self.ecs_profiles
    }
}

impl EntryDocument for ClusterDocument {
    type Entry = ClusterEntry;

    const KIND: &'static str = "cluster";
    const FILE_NAME: &'static str = CLUSTER_CONFIG_FILE;

    fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    fn set_default_name(&mut self, name: String) {
        self.default = Some(name);
    }

    fn entries(&self) -> &BTreeMap<String, ClusterEntry> {
        &self.clusters
    }

    fn entries_mut(&mut self) -> &mut BTreeMap<String, ClusterEntry> {
        &mut self.clusters
    }
}
