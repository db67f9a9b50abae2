//! Error types for task parameter parsing

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification shared by every error this crate returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Conflict,
    Validation,
    Io,
}

/// Failure normalising one `healthcheck` block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthCheckError {
    #[error("healthcheck.test and healthcheck.command can not both be specified")]
    Conflict,

    #[error("could not parse healthcheck.{field} '{value}' either as an integer or a duration (ex: 1m30s)")]
    InvalidTime { field: &'static str, value: String },
}

impl HealthCheckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HealthCheckError::Conflict => ErrorKind::Conflict,
            HealthCheckError::InvalidTime { .. } => ErrorKind::Format,
        }
    }
}

/// Failure deriving the awsvpc network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkConfigError {
    #[error("at least one subnet is required in the network configuration")]
    MissingSubnet,
}

impl NetworkConfigError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Failure loading an ECS params file.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("ECS params file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error unmarshalling yaml data from ECS params file '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid {field} in ECS params file '{}': {detail}", path.display())]
    Format {
        path: PathBuf,
        field: String,
        detail: String,
    },

    #[error("Invalid healthcheck for service '{service}' in ECS params file '{}': {source}", path.display())]
    HealthCheck {
        path: PathBuf,
        service: String,
        #[source]
        source: HealthCheckError,
    },
}

impl ParamsError {
    /// Maps a failed read of `path`, keeping a missing file distinct from
    /// other I/O failures.
    pub(crate) fn from_read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ParamsError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ParamsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParamsError::NotFound { .. } => ErrorKind::NotFound,
            ParamsError::Io { .. } => ErrorKind::Io,
            ParamsError::Yaml { .. } | ParamsError::Format { .. } => ErrorKind::Format,
            ParamsError::HealthCheck { source, .. } => source.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_kind_passes_through() {
        let err = ParamsError::HealthCheck {
            path: "ecs-params.yml".into(),
            service: "web".into(),
            source: HealthCheckError::Conflict,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("'web'"));
        assert!(err.to_string().contains("ecs-params.yml"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        let err = ParamsError::from_read(std::path::Path::new("a.yml"), missing);
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = ParamsError::from_read(std::path::Path::new("a.yml"), denied);
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("a.yml"));
    }
}
