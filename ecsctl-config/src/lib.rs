//! # ecsctl configuration
//!
//! Storage and resolution of operator configuration: named credential
//! profiles and named cluster targets, kept in two YAML documents under one
//! destination directory, plus read-only support for the older single-file
//! format.
//!
//! ## Layout
//! - `config.yml`: `default` pointer and `clusters` mapping
//! - `profile.yml`: `default` pointer and `ecs_profiles` mapping
//! - `config`: legacy INI file, read only when `config.yml` is absent

#![deny(rustdoc::broken_intra_doc_links)]

mod destination;
mod document;
mod error;
mod legacy;
mod migration;
mod resolved;
mod resolver;
mod settings;
mod store;

pub use destination::{
    Destination, CLUSTER_CONFIG_FILE, CONFIG_FILE_MODE, LEGACY_CONFIG_FILE, PROFILE_CONFIG_FILE,
};
pub use document::{
    ClusterDocument, ClusterEntry, EntryDocument, ExtraKeys, ProfileDocument, ProfileEntry,
};
pub use error::{ConfigError, ErrorKind};
pub use legacy::{parse_legacy_config, read_legacy_config};
pub use migration::{select_format, ConfigFormat, FilePresence};
pub use resolved::ResolvedConfig;
pub use resolver::ConfigResolver;
pub use settings::ToolSettings;
pub use store::ConfigStore;
