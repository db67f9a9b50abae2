//! Read-modify-write access to the profile and cluster documents.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{debug, error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::destination::{Destination, CONFIG_FILE_MODE};
use crate::document::{ClusterDocument, ClusterEntry, EntryDocument, ProfileDocument, ProfileEntry};
use crate::ConfigError;

/// Owns a [`Destination`] and persists entries into its documents.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    destination: Destination,
}

impl ConfigStore {
    pub fn new(destination: Destination) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Inserts or replaces a profile. The first profile saved becomes the default.
    pub fn save_profile(&self, name: &str, profile: &ProfileEntry) -> Result<(), ConfigError> {
        self.save_entry::<ProfileDocument>(name, profile)
    }

    /// Inserts or replaces a cluster. The first cluster saved becomes the default.
    pub fn save_cluster(&self, name: &str, cluster: &ClusterEntry) -> Result<(), ConfigError> {
        self.save_entry::<ClusterDocument>(name, cluster)
    }

    pub fn set_default_profile(&self, name: &str) -> Result<(), ConfigError> {
        self.set_default::<ProfileDocument>(name)
    }

    pub fn set_default_cluster(&self, name: &str) -> Result<(), ConfigError> {
        self.set_default::<ClusterDocument>(name)
    }

    pub fn read_profiles(&self) -> Result<ProfileDocument, ConfigError> {
        self.read_document()
    }

    pub fn read_clusters(&self) -> Result<ClusterDocument, ConfigError> {
        self.read_document()
    }

    /// Reads a document, failing with [`ConfigError::NotFound`] if it is missing.
    pub fn read_document<D: EntryDocument>(&self) -> Result<D, ConfigError> {
        let path = D::path_in(&self.destination);
        let text = fs::read_to_string(&path).map_err(|e| ConfigError::from_read(&path, e))?;
        parse_document(&path, &text)
    }

    fn save_entry<D: EntryDocument>(&self, name: &str, entry: &D::Entry) -> Result<(), ConfigError> {
        validate_entry(D::KIND, name, entry)?;

        let mut document: D = self.read_or_empty()?;
        if document.entries().is_empty() {
            debug!(kind = D::KIND, entry = name, "first entry becomes the default");
            document.set_default_name(name.to_string());
        }
        document.entries_mut().insert(name.to_string(), entry.clone());

        self.write_document(&document)
    }

    fn set_default<D: EntryDocument>(&self, name: &str) -> Result<(), ConfigError> {
        let mut document: D = self.read_document()?;
        if !document.entries().contains_key(name) {
            warn!(kind = D::KIND, entry = name, "default points at an entry that is not configured");
        }
        document.set_default_name(name.to_string());
        self.write_document(&document)
    }

    /// Like [`Self::read_document`], but a missing file yields an empty document
    /// so the first save can create it.
    fn read_or_empty<D: EntryDocument>(&self) -> Result<D, ConfigError> {
        match self.read_document() {
            Err(ConfigError::NotFound(path)) => {
                debug!(path = %path.display(), "document missing, starting empty");
                Ok(D::default())
            }
            other => other,
        }
    }

    fn write_document<D: EntryDocument>(&self, document: &D) -> Result<(), ConfigError> {
        let path = D::path_in(&self.destination);
        create_dir(&self.destination)?;

        let legacy = self.destination.legacy_config_path();
        if legacy.is_file() {
            warn!(
                "Writing yaml formatted config to {}. Ini formatted config still exists in {}.",
                self.destination.path.display(),
                legacy.display()
            );
        }

        // Tighten an existing file first: the new contents may hold credentials.
        if path.exists() {
            if let Err(e) = set_owner_only(&path) {
                error!(path = %path.display(), "unable to chmod config file to {:o}", CONFIG_FILE_MODE);
                return Err(ConfigError::io(&path, e));
            }
        }

        let data = serde_yaml::to_string(document)
            .map_err(|e| ConfigError::format(D::KIND, &path, e.to_string()))?;
        write_atomic(&path, data.as_bytes()).map_err(|e| {
            error!(path = %path.display(), "unable to write config");
            ConfigError::io(&path, e)
        })?;

        info!(kind = D::KIND, path = %path.display(), "saved configuration");
        Ok(())
    }
}

fn parse_document<D: EntryDocument>(path: &Path, text: &str) -> Result<D, ConfigError> {
    if text.trim().is_empty() {
        return Ok(D::default());
    }
    serde_yaml::from_str(text).map_err(|e| ConfigError::format(D::KIND, path, e.to_string()))
}

fn validate_entry<E: Validate>(kind: &'static str, name: &str, entry: &E) -> Result<(), ConfigError> {
    let subject = format!("{} '{}'", kind, name);
    if name.trim().is_empty() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("length").with_message(Cow::Borrowed("name must not be empty")),
        );
        return Err(ConfigError::Validation { subject, errors });
    }
    entry
        .validate()
        .map_err(|errors| ConfigError::Validation { subject, errors })
}

fn create_dir(destination: &Destination) -> Result<(), ConfigError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(destination.mode);
    }
    builder
        .create(&destination.path)
        .map_err(|e| ConfigError::io(&destination.path, e))
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(CONFIG_FILE_MODE))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Writes to a sibling temp file and renames it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp_name);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(CONFIG_FILE_MODE);
    }

    let result = options
        .open(&tmp)
        .and_then(|mut file| {
            file.write_all(data)?;
            file.sync_all()
        })
        // The temp file may predate this write with looser bits.
        .and_then(|()| set_owner_only(&tmp))
        .and_then(|()| fs::rename(&tmp, path));
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
