//! Where configuration lives on disk and with which permissions.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Directory under the home directory holding every configuration file.
pub const CONFIG_DIR_NAME: &str = ".ecs";
/// Cluster document file name.
pub const CLUSTER_CONFIG_FILE: &str = "config.yml";
/// Profile document file name.
pub const PROFILE_CONFIG_FILE: &str = "profile.yml";
/// Legacy single-file configuration name.
pub const LEGACY_CONFIG_FILE: &str = "config";

/// Mode applied to every configuration file, since they may hold credentials.
pub const CONFIG_FILE_MODE: u32 = 0o600;
/// Directory mode used when the home directory's mode can't be read.
pub const FALLBACK_DIR_MODE: u32 = 0o755;

/// Configuration directory together with the mode used to create it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub path: PathBuf,
    pub mode: u32,
}

impl Destination {
    /// `$HOME/.ecs`, created with the same permission bits as `$HOME`.
    pub fn from_home() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or_else(|| ConfigError::NotFound(PathBuf::from("$HOME")))?;
        let mode = dir_mode(&home);
        Ok(Self {
            path: home.join(CONFIG_DIR_NAME),
            mode,
        })
    }

    /// Explicit directory, e.g. from `ECSCTL_CONFIG_DIR` or a test fixture.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mode = path.parent().map(dir_mode).unwrap_or(FALLBACK_DIR_MODE);
        Self { path, mode }
    }

    /// Uses `override_dir` when given, otherwise the home directory default.
    pub fn resolve(override_dir: Option<&Path>) -> Result<Self, ConfigError> {
        match override_dir {
            Some(dir) => Ok(Self::at(dir)),
            None => Self::from_home(),
        }
    }

    pub fn cluster_config_path(&self) -> PathBuf {
        self.path.join(CLUSTER_CONFIG_FILE)
    }

    pub fn profile_config_path(&self) -> PathBuf {
        self.path.join(PROFILE_CONFIG_FILE)
    }

    pub fn legacy_config_path(&self) -> PathBuf {
        self.path.join(LEGACY_CONFIG_FILE)
    }
}

#[cfg(unix)]
fn dir_mode(dir: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(dir)
        .map(|meta| meta.permissions().mode() & 0o777)
        .unwrap_or(FALLBACK_DIR_MODE)
}

#[cfg(not(unix))]
fn dir_mode(_dir: &Path) -> u32 {
    FALLBACK_DIR_MODE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_paths_live_under_destination() {
        let dest = Destination {
            path: PathBuf::from("/home/op/.ecs"),
            mode: 0o700,
        };
        assert_eq!(dest.cluster_config_path(), Path::new("/home/op/.ecs/config.yml"));
        assert_eq!(dest.profile_config_path(), Path::new("/home/op/.ecs/profile.yml"));
        assert_eq!(dest.legacy_config_path(), Path::new("/home/op/.ecs/config"));
    }

    #[cfg(unix)]
    #[test]
    fn mode_follows_parent_directory() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(0o750)).unwrap();
        let dest = Destination::at(tmp.path().join(".ecs"));
        assert_eq!(dest.mode, 0o750);
    }

    #[test]
    fn override_wins_over_home() {
        let dest = Destination::resolve(Some(Path::new("/srv/ecs"))).unwrap();
        assert_eq!(dest.path, Path::new("/srv/ecs"));
    }
}
