//! Error types for configuration storage and resolution

use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::ValidationErrors;

/// Coarse classification shared by every error this crate returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Validation,
    Io,
}

/// Unified configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file that must exist for this operation is missing.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A key is absent or has the wrong shape.
    #[error("Format issue with {document} config file '{}': {detail}", path.display())]
    Format {
        document: &'static str,
        path: PathBuf,
        detail: String,
    },

    /// An entry failed validation before it was written.
    #[error("Invalid {subject}:\n{}", format_validation_errors(.errors))]
    Validation {
        subject: String,
        #[source]
        errors: ValidationErrors,
    },

    /// Filesystem read, write or permission failure.
    #[error("Configuration I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tool settings could not be extracted.
    #[error("Settings error: {0}")]
    Settings(#[from] figment::Error),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::NotFound(_) => ErrorKind::NotFound,
            ConfigError::Format { .. } | ConfigError::Settings(_) => ErrorKind::Format,
            ConfigError::Validation { .. } => ErrorKind::Validation,
            ConfigError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn format(
        document: &'static str,
        path: impl Into<PathBuf>,
        detail: impl Into<String>,
    ) -> Self {
        ConfigError::Format {
            document,
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Maps a failed read, turning a missing file into [`ConfigError::NotFound`].
    pub(crate) fn from_read(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::io(path, source)
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn format_validation_errors(errors: &ValidationErrors) -> String {
    use std::fmt::Write;

    let mut output = String::new();
    for (field, errors) in errors.field_errors() {
        let _ = writeln!(output, "Field '{}':", field);
        for error in errors {
            let message = match &error.message {
                Some(msg) => msg.to_string(),
                None => error.code.to_string(),
            };
            let _ = writeln!(output, "  - {}", message);
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = ConfigError::from_read(
            Path::new("/nowhere/config.yml"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("/nowhere/config.yml"));
    }

    #[test]
    fn other_read_failures_stay_io() {
        let err = ConfigError::from_read(
            Path::new("profile.yml"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn format_message_names_document_and_path() {
        let err = ConfigError::format("cluster", "/tmp/config.yml", "expected key not found");
        assert_eq!(
            err.to_string(),
            "Format issue with cluster config file '/tmp/config.yml': expected key not found"
        );
    }
}
