//! Container health check normalisation.
//!
//! Three mutually exclusive shapes are accepted in a `healthcheck` block:
//!
//! ```yaml
//! healthcheck:            # current shape
//!   command: ["CMD", "curl", "-f", "http://localhost"]
//! healthcheck:            # compose-compatible shape
//!   test: ["CMD", "curl", "-f", "http://localhost"]
//! healthcheck:            # shorthand, run through the shell
//!   test: curl -f http://localhost
//! ```
//!
//! All of them collapse into one [`HealthCheck`].

use serde::{Deserialize, Serialize};

use crate::error::HealthCheckError;
use crate::units::TimeValue;

/// Retries used when the field is absent or zero.
pub const DEFAULT_RETRIES: i64 = 3;
/// First element of a shell-wrapped command.
pub const CMD_SHELL: &str = "CMD-SHELL";

/// A `command` or `test` value as written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    /// Shorthand string, wrapped as `["CMD-SHELL", <string>]`.
    Shell(String),
    /// Literal command, used as is even with a single element.
    Exec(Vec<String>),
}

impl CommandSpec {
    fn is_empty(&self) -> bool {
        match self {
            CommandSpec::Shell(s) => s.is_empty(),
            CommandSpec::Exec(v) => v.is_empty(),
        }
    }

    fn into_command(self) -> Vec<String> {
        match self {
            CommandSpec::Shell(s) => vec![CMD_SHELL.to_string(), s],
            CommandSpec::Exec(v) => v,
        }
    }
}

/// A `healthcheck` block as written in the params file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HealthCheckSpec {
    #[serde(default)]
    pub command: Option<CommandSpec>,
    #[serde(default)]
    pub test: Option<CommandSpec>,
    #[serde(default)]
    pub interval: Option<TimeValue>,
    #[serde(default)]
    pub timeout: Option<TimeValue>,
    #[serde(default)]
    pub retries: Option<i64>,
    #[serde(default)]
    pub start_period: Option<TimeValue>,
}

/// Canonical health check. Time fields are seconds; unset fields are left to
/// the remote API's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub command: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    pub retries: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_period: Option<i64>,
}

impl HealthCheckSpec {
    pub fn normalize(self) -> Result<HealthCheck, HealthCheckError> {
        let command = self.command.filter(|c| !c.is_empty());
        let test = self.test.filter(|c| !c.is_empty());
        let command = match (command, test) {
            (Some(_), Some(_)) => return Err(HealthCheckError::Conflict),
            (Some(spec), None) | (None, Some(spec)) => spec.into_command(),
            (None, None) => Vec::new(),
        };

        Ok(HealthCheck {
            command,
            interval: time_field("interval", self.interval.as_ref())?,
            timeout: time_field("timeout", self.timeout.as_ref())?,
            retries: match self.retries {
                None | Some(0) => DEFAULT_RETRIES,
                Some(n) => n,
            },
            start_period: time_field("start_period", self.start_period.as_ref())?,
        })
    }
}

fn time_field(field: &'static str, value: Option<&TimeValue>) -> Result<Option<i64>, HealthCheckError> {
    match value {
        None => Ok(None),
        Some(v) => v
            .to_seconds()
            .map_err(|value| HealthCheckError::InvalidTime { field, value }),
    }
}
