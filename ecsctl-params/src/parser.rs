//! Loading `ecs-params.yml` from disk.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{RawDocument, TaskParameterDocument};
use crate::env::{expand, Environment};
use crate::error::ParamsError;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_PARAMS_FILE: &str = "ecs-params.yml";

/// Loads params files with a fixed environment snapshot.
#[derive(Debug, Clone)]
pub struct TaskParamsLoader {
    env: Environment,
    working_dir: Option<PathBuf>,
}

impl TaskParamsLoader {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            working_dir: None,
        }
    }

    /// Resolves relative paths, including the default file, against `dir`
    /// instead of the process working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Loads `path`, or the default file when `path` is `None` or empty.
    ///
    /// A missing default file is not an error: it yields `Ok(None)`. A missing
    /// explicit file is.
    pub fn load(&self, path: Option<&Path>) -> Result<Option<TaskParameterDocument>, ParamsError> {
        let path = match path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => self.in_working_dir(path),
            None => {
                let default = self.in_working_dir(Path::new(DEFAULT_PARAMS_FILE));
                if !default.is_file() {
                    debug!(path = %default.display(), "no ECS params file");
                    return Ok(None);
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|e| ParamsError::from_read(&path, e))?;
        debug!(path = %path.display(), "loading ECS params");
        self.parse(&text, &path).map(Some)
    }

    /// Expands and parses `text`; `origin` is used for error context.
    pub fn parse(&self, text: &str, origin: &Path) -> Result<TaskParameterDocument, ParamsError> {
        let expanded = expand(text, &self.env);
        let raw: RawDocument = if expanded.trim().is_empty() {
            RawDocument::default()
        } else {
            serde_yaml::from_str(&expanded).map_err(|source| ParamsError::Yaml {
                path: origin.to_path_buf(),
                source,
            })?
        };
        raw.normalize(origin)
    }

    fn in_working_dir(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Loads params with a snapshot of the current process environment.
pub fn read_ecs_params(path: Option<&Path>) -> Result<Option<TaskParameterDocument>, ParamsError> {
    TaskParamsLoader::new(Environment::from_process()).load(path)
}
