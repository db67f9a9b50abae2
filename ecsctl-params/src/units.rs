//! Scalar values that accept either a number or a human-friendly string.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

/// A time field given as integer seconds or as a duration string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Seconds(i64),
    Text(String),
}

impl TimeValue {
    /// Seconds, or `None` for an empty string.
    pub fn to_seconds(&self) -> Result<Option<i64>, String> {
        match self {
            TimeValue::Seconds(secs) => Ok(Some(*secs)),
            TimeValue::Text(text) if text.trim().is_empty() => Ok(None),
            TimeValue::Text(text) => parse_seconds(text).map(Some),
        }
    }
}

/// Parses `"1m30s"`-style durations first, then plain integers.
pub fn parse_seconds(text: &str) -> Result<i64, String> {
    let text = text.trim();
    if let Ok(duration) = humantime::parse_duration(text) {
        return i64::try_from(duration.as_secs()).map_err(|_| text.to_string());
    }
    text.parse::<i64>().map_err(|_| text.to_string())
}

/// A memory size given as integer bytes or as a string such as `512m`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MemoryValue {
    Bytes(i64),
    Text(String),
}

impl MemoryValue {
    /// Bytes, or `None` for an empty string. Negative sizes are rejected.
    pub fn to_bytes(&self) -> Result<Option<i64>, String> {
        match self {
            MemoryValue::Bytes(bytes) if *bytes < 0 => Err(format!("invalid size '{}'", bytes)),
            MemoryValue::Bytes(bytes) => Ok(Some(*bytes)),
            MemoryValue::Text(text) if text.trim().is_empty() => Ok(None),
            MemoryValue::Text(text) => parse_bytes(text).map(Some),
        }
    }
}

lazy_static! {
    static ref SIZE_RE: Regex =
        Regex::new(r"^(\d+(?:\.\d+)?)\s?([kKmMgGtTpP])?[iI]?[bB]?$").unwrap();
}

/// Parses a 1024-based size string (`2048`, `512m`, `1.5g`, `64MiB`) into bytes.
pub fn parse_bytes(text: &str) -> Result<i64, String> {
    let text = text.trim();
    let caps = SIZE_RE
        .captures(text)
        .ok_or_else(|| format!("invalid size '{}'", text))?;
    let number: f64 = caps[1]
        .parse()
        .map_err(|_| format!("invalid size '{}'", text))?;
    let multiplier = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
        None => 1.0,
        Some(unit) => match unit.as_str() {
            "k" => 1024.0,
            "m" => 1024.0 * 1024.0,
            "g" => 1024.0 * 1024.0 * 1024.0,
            "t" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
            _ => 1024.0 * 1024.0 * 1024.0 * 1024.0 * 1024.0,
        },
    };
    let bytes = number * multiplier;
    // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
    if !bytes.is_finite() || bytes >= i64::MAX as f64 {
        return Err(format!("size '{}' is too large", text));
    }
    Ok(bytes as i64)
}

/// Whole MiB in `bytes`, rounded down.
pub fn bytes_to_mib(bytes: i64) -> i64 {
    bytes / (1024 * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn duration_strings() {
        assert_eq!(parse_seconds("1m30s"), Ok(90));
        assert_eq!(parse_seconds("2m"), Ok(120));
        assert_eq!(parse_seconds("1h"), Ok(3600));
        assert_eq!(parse_seconds("1500ms"), Ok(1));
    }

    #[test]
    fn integer_strings() {
        assert_eq!(parse_seconds("45"), Ok(45));
        assert_eq!(parse_seconds(" 10 "), Ok(10));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_seconds("abc"), Err("abc".to_string()));
        assert!(parse_seconds("10 parsecs").is_err());
    }

    #[test]
    fn time_value_from_yaml() {
        let number: TimeValue = serde_yaml::from_str("30").unwrap();
        assert_eq!(number.to_seconds(), Ok(Some(30)));
        let text: TimeValue = serde_yaml::from_str("\"1m\"").unwrap();
        assert_eq!(text.to_seconds(), Ok(Some(60)));
        let empty: TimeValue = serde_yaml::from_str("\"\"").unwrap();
        assert_eq!(empty.to_seconds(), Ok(None));
    }

    #[test]
    fn sizes() {
        assert_eq!(parse_bytes("2048"), Ok(2048));
        assert_eq!(parse_bytes("512m"), Ok(512 * 1024 * 1024));
        assert_eq!(parse_bytes("1g"), Ok(1024 * 1024 * 1024));
        assert_eq!(parse_bytes("64MiB"), Ok(64 * 1024 * 1024));
        assert_eq!(parse_bytes("1.5k"), Ok(1536));
        assert_eq!(parse_bytes("100 kb"), Ok(100 * 1024));
        assert!(parse_bytes("lots").is_err());
        assert!(parse_bytes("-5m").is_err());
    }

    #[test]
    fn out_of_range_sizes_are_rejected() {
        assert!(parse_bytes("99999999999p").is_err());
        assert!(parse_bytes("8388608t").is_err());
        assert_eq!(parse_bytes("8388607t"), Ok(8_388_607 * 1024_i64.pow(4)));

        let negative: MemoryValue = serde_yaml::from_str("-1").unwrap();
        assert!(negative.to_bytes().is_err());
        let zero: MemoryValue = serde_yaml::from_str("0").unwrap();
        assert_eq!(zero.to_bytes(), Ok(Some(0)));
    }

    #[test]
    fn mib_rounds_down() {
        assert_eq!(bytes_to_mib(512 * 1024 * 1024), 512);
        assert_eq!(bytes_to_mib(1024 * 1024 + 1), 1);
    }

    proptest! {
        #[test]
        fn plain_integers_are_seconds(n in 0i64..1_000_000) {
            prop_assert_eq!(parse_seconds(&n.to_string()), Ok(n));
        }
    }
}
