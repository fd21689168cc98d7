//! TOML configuration plumbing
//!
//! Domain-service configuration lives under `config/domain_service/**`.
//! Every loader follows the same layering rule, strictly
//! `runtime overrides > file > defaults`, expressed as builder-on-default:
//! the file value is applied over the `Default` record, then the non-`None`
//! override fields are applied over that. Nothing is mutated in place.

use std::path::Path;

use anyhow::{Context, Result};
use toml::Value;

/// Read a TOML file into a [`Value`]. A missing file is not an error: it
/// yields an empty table so the caller falls through to defaults.
pub fn read_toml(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Table(toml::map::Map::new()));
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    raw.parse::<Value>()
        .with_context(|| format!("parsing config file {}", path.display()))
}

/// Fetch a nested `[section] key` from a TOML document, if present.
#[must_use]
pub fn section_key<'a>(doc: &'a Value, section: &str, key: &str) -> Option<&'a Value> {
    doc.get(section)?.get(key)
}

/// `[section] key` as f64, accepting integer literals.
#[must_use]
pub fn get_f64(doc: &Value, section: &str, key: &str) -> Option<f64> {
    match section_key(doc, section, key)? {
        Value::Float(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

/// `[section] key` as i64.
#[must_use]
pub fn get_i64(doc: &Value, section: &str, key: &str) -> Option<i64> {
    section_key(doc, section, key)?.as_integer()
}

/// `[section] key` as string.
#[must_use]
pub fn get_str<'a>(doc: &'a Value, section: &str, key: &str) -> Option<&'a str> {
    section_key(doc, section, key)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_empty_table() {
        let doc = read_toml(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(section_key(&doc, "any", "key").is_none());
    }

    #[test]
    fn section_accessors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[filter]\nstrike_level = 2\nmin_bid_price = 12.5").unwrap();
        let doc = read_toml(file.path()).unwrap();

        assert_eq!(get_i64(&doc, "filter", "strike_level"), Some(2));
        assert_eq!(get_f64(&doc, "filter", "min_bid_price"), Some(12.5));
        // Integer literals are accepted where a float is expected.
        assert_eq!(get_f64(&doc, "filter", "strike_level"), Some(2.0));
        assert_eq!(get_i64(&doc, "filter", "missing"), None);
    }
}
