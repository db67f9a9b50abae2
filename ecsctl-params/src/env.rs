//! Shell-style `$VAR` / `${VAR}` expansion over raw document text.
//!
//! Expansion runs against an explicit [`Environment`] snapshot so callers and
//! tests never depend on the live process environment.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // `${...}` (any name up to the brace), an unterminated `${`, a plain
    // identifier, or a single special character (`$1`, `$?`, ...).
    static ref VAR_RE: Regex =
        Regex::new(r"\$(?:\{([^}]*)\}|(\{)|([A-Za-z_][A-Za-z0-9_]*)|([*#$@!?0-9-]))").unwrap();
}

/// Snapshot of environment variables used for expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the current process environment. Variables whose name or value
    /// is not valid unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Replaces every variable reference in `text`. Unset variables expand to the
/// empty string; a `$` that does not start a reference is kept.
pub fn expand(text: &str, env: &Environment) -> String {
    VAR_RE
        .replace_all(text, |caps: &Captures| {
            if caps.get(2).is_some() {
                return String::new();
            }
            let name = caps
                .get(1)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or("", |m| m.as_str());
            env.get(name).unwrap_or_default().to_string()
        })
        .into_owned()
}
