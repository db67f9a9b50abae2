//! Settings for the tool itself, as opposed to the operator's profiles and
//! clusters.
//!
//! Hierarchy:
//! 1. Default values
//! 2. Optional YAML settings file
//! 3. `ECSCTL_*` environment variables

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::destination::Destination;
use crate::ConfigError;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "ECSCTL_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Overrides `$HOME/.ecs`.
    #[serde(default)]
    pub config_dir: Option<PathBuf>,

    /// Task parameter document used when none is passed explicitly.
    #[serde(default)]
    pub params_file: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `info` or `ecsctl_config=debug`.
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_log() -> String {
    "info".into()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            config_dir: None,
            params_file: None,
            log: default_log(),
        }
    }
}

impl ToolSettings {
    /// Defaults overlaid with `ECSCTL_*` variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(None).extract().map_err(ConfigError::from)
    }

    /// Like [`Self::load`], with a settings file between defaults and environment.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::figment(Some(path)).extract().map_err(ConfigError::from)
    }

    fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ToolSettings::default()));
        if let Some(file) = file {
            figment = figment.merge(Yaml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn destination(&self) -> Result<Destination, ConfigError> {
        Destination::resolve(self.config_dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        figment::Jail::expect_with(|_jail| {
            let settings = ToolSettings::load().unwrap();
            assert_eq!(settings, ToolSettings::default());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("ecsctl.yml", "config_dir: /from/file\nlog: debug\n")?;
            jail.set_env("ECSCTL_CONFIG_DIR", "/from/env");

            let settings = ToolSettings::load_from_path("ecsctl.yml").unwrap();
            assert_eq!(settings.config_dir.as_deref(), Some(Path::new("/from/env")));
            assert_eq!(settings.log, "debug");
            assert_eq!(settings.destination().unwrap().path, Path::new("/from/env"));
            Ok(())
        });
    }

    #[test]
    fn missing_settings_file_is_not_found() {
        let err = ToolSettings::load_from_path("/definitely/not/here.yml").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::NotFound);
    }
}
