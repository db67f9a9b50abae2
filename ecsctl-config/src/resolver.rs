//! Produces one [`ResolvedConfig`] from whichever format is on disk.

use std::path::Path;

use tracing::debug;

use crate::destination::Destination;
use crate::document::{ClusterDocument, EntryDocument, ProfileDocument};
use crate::legacy::read_legacy_config;
use crate::migration::{select_format, ConfigFormat, FilePresence};
use crate::resolved::ResolvedConfig;
use crate::store::ConfigStore;
use crate::ConfigError;

#[derive(Debug, Clone)]
pub struct ConfigResolver {
    store: ConfigStore,
}

impl ConfigResolver {
    pub fn new(destination: Destination) -> Self {
        Self {
            store: ConfigStore::new(destination),
        }
    }

    pub fn destination(&self) -> &Destination {
        self.store.destination()
    }

    /// Resolves the named cluster and profile entries.
    ///
    /// `None` or an empty selector means "use the document's default". When
    /// only the legacy file exists the selectors are ignored and the legacy
    /// file is returned as is.
    pub fn resolve(
        &self,
        cluster_selector: Option<&str>,
        profile_selector: Option<&str>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let destination = self.store.destination();
        let presence = FilePresence::detect(destination);

        match select_format(presence) {
            ConfigFormat::Legacy => {
                debug!(path = %destination.legacy_config_path().display(), "reading legacy config");
                read_legacy_config(&destination.legacy_config_path())
            }
            ConfigFormat::Current => {
                let clusters: ClusterDocument = self.store.read_document()?;
                let profiles: ProfileDocument = self.store.read_document()?;

                let profile = select_entry(&profiles, profile_selector, &destination.profile_config_path())?;
                let cluster = select_entry(&clusters, cluster_selector, &destination.cluster_config_path())?;
                debug!(profile = profile.0, cluster = cluster.0, "resolved configuration entries");

                Ok(ResolvedConfig::merge(profile.1, cluster.1))
            }
        }
    }
}

/// Picks the entry named by `selector`, or the document default.
fn select_entry<'a, D: EntryDocument>(
    document: &'a D,
    selector: Option<&'a str>,
    path: &Path,
) -> Result<(&'a str, &'a D::Entry), ConfigError>
where
    D::Entry: 'a,
{
    let name = match selector.filter(|s| !s.is_empty()) {
        Some(name) => name,
        None => document
            .default_name()
            .ok_or_else(|| ConfigError::format(D::KIND, path, "expected key 'default' not found"))?,
    };

    let entry = document.entries().get(name).ok_or_else(|| {
        ConfigError::format(D::KIND, path, format!("no {} named '{}'", D::KIND, name))
    })?;
    Ok((name, entry))
}
