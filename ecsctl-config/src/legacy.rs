//! Reader for the single-file configuration format that predates the
//! profile/cluster split.
//!
//! The file is INI style with one `[ecs]` section:
//!
//! ```text
//! [ecs]
//! cluster = test
//! aws_profile =
//! region = us-west-2
//! aws_access_key_id =
//! aws_secret_access_key =
//! compose-project-name-prefix = ecscompose-
//! compose-service-name-prefix =
//! cfn-stack-name-prefix = ecs-cli-
//! ```
//!
//! It is only ever read; writes always go to the current format.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::resolved::ResolvedConfig;
use crate::ConfigError;

const DOCUMENT: &str = "legacy";
const ECS_SECTION: &str = "ecs";

const CLUSTER_KEY: &str = "cluster";
const REGION_KEY: &str = "region";
const AWS_PROFILE_KEY: &str = "aws_profile";
const ACCESS_KEY_KEY: &str = "aws_access_key_id";
const SECRET_KEY_KEY: &str = "aws_secret_access_key";
const COMPOSE_PROJECT_PREFIX_KEY: &str = "compose-project-name-prefix";
const COMPOSE_SERVICE_PREFIX_KEY: &str = "compose-service-name-prefix";
const CFN_STACK_PREFIX_KEY: &str = "cfn-stack-name-prefix";

/// Prefixes legacy files fall back to when the key is missing entirely.
pub const DEFAULT_COMPOSE_PROJECT_PREFIX: &str = "ecscompose-";
pub const DEFAULT_COMPOSE_SERVICE_PREFIX: &str = "ecscompose-service-";
pub const DEFAULT_CFN_STACK_PREFIX: &str = "amazon-ecs-cli-setup-";

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^\[\s*([^\]]+?)\s*\]$").unwrap();
    static ref KEY_VALUE_RE: Regex = Regex::new(r"^([^=:]+?)\s*[=:]\s*(.*)$").unwrap();
}

type Sections = HashMap<String, HashMap<String, String>>;

/// Reads the legacy file at `path` into a [`ResolvedConfig`].
pub fn read_legacy_config(path: &Path) -> Result<ResolvedConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::from_read(path, e))?;
    parse_legacy_config(&text).map_err(|detail| ConfigError::format(DOCUMENT, path, detail))
}

/// Parses legacy file contents. Errors are returned as bare details so the
/// caller can attach the path.
pub fn parse_legacy_config(text: &str) -> Result<ResolvedConfig, String> {
    let sections = parse_sections(text)?;
    let ecs = sections
        .get(ECS_SECTION)
        .ok_or_else(|| format!("section '[{}]' not found", ECS_SECTION))?;

    let cluster = ecs
        .get(CLUSTER_KEY)
        .cloned()
        .ok_or_else(|| format!("expected key '{}' not found", CLUSTER_KEY))?;

    let optional = |key: &str| ecs.get(key).filter(|v| !v.is_empty()).cloned();
    // A prefix key that is present but blank means "no prefix", not "use the default".
    let prefix = |key: &str, fallback: &str| {
        Some(ecs.get(key).cloned().unwrap_or_else(|| fallback.to_string()))
    };

    Ok(ResolvedConfig {
        cluster,
        region: ecs.get(REGION_KEY).cloned().unwrap_or_default(),
        aws_profile: optional(AWS_PROFILE_KEY),
        access_key: optional(ACCESS_KEY_KEY),
        secret_key: optional(SECRET_KEY_KEY),
        compose_project_name_prefix: prefix(
            COMPOSE_PROJECT_PREFIX_KEY,
            DEFAULT_COMPOSE_PROJECT_PREFIX,
        ),
        compose_service_name_prefix: prefix(
            COMPOSE_SERVICE_PREFIX_KEY,
            DEFAULT_COMPOSE_SERVICE_PREFIX,
        ),
        cfn_stack_name_prefix: prefix(CFN_STACK_PREFIX_KEY, DEFAULT_CFN_STACK_PREFIX),
    })
}

fn parse_sections(text: &str) -> Result<Sections, String> {
    let mut sections = Sections::new();
    let mut current: Option<String> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(caps) = SECTION_RE.captures(line) {
            let name = caps[1].to_string();
            sections.entry(name.clone()).or_default();
            current = Some(name);
            continue;
        }
        let caps = KEY_VALUE_RE
            .captures(line)
            .ok_or_else(|| format!("line {}: expected 'key = value'", idx + 1))?;
        let section = current
            .as_ref()
            .ok_or_else(|| format!("line {}: key outside of any section", idx + 1))?;
        sections
            .entry(section.clone())
            .or_default()
            .insert(caps[1].to_string(), caps[2].trim().to_string());
    }

    Ok(sections)
}
