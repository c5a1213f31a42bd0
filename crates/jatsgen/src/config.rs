//! Configuration file loading.
//!
//! A configuration file is TOML. Keys at the top level are defaults for
//! every section; a named table overrides them:
//!
//! ```toml
//! generator = "jatsgen"
//! xml_filename_pattern = "elife-{manuscript}.xml"
//!
//! [elife]
//! journal_title = "eLife"
//! contrib_types = ["author"]
//! ```
//!
//! List keys ([`LIST_KEYS`]) accept either a TOML array or a string
//! holding a JSON array.

use std::fs;
use std::path::{Path, PathBuf};

use jatsgen_core::{Config, ConfigValue, LIST_KEYS};
use toml::{Table, Value};
use tracing::warn;

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}

/// Read `path` and resolve `section` over the top-level defaults.
pub fn load_config(path: impl AsRef<Path>, section: Option<&str>) -> Result<Config, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text, section)
}

/// Parse configuration text and resolve `section` over the top-level
/// defaults.
///
/// A section that does not exist resolves to the defaults alone.
pub fn parse_config(text: &str, section: Option<&str>) -> Result<Config, LoadError> {
    let table: Table = text.parse()?;

    let mut config = Config::new();
    for (key, value) in &table {
        if value.is_table() {
            continue;
        }
        config.set(key.as_str(), convert(key, value)?);
    }

    if let Some(name) = section {
        match table.get(name) {
            Some(Value::Table(overrides)) => {
                for (key, value) in overrides {
                    if value.is_table() {
                        continue;
                    }
                    config.set(key.as_str(), convert(key, value)?);
                }
            }
            Some(_) => {
                return Err(LoadError::InvalidValue {
                    key: name.to_string(),
                    message: "expected a table".to_string(),
                });
            }
            None => warn!(section = name, "configuration section not found, using defaults"),
        }
    }

    Ok(config)
}

fn convert(key: &str, value: &Value) -> Result<ConfigValue, LoadError> {
    let invalid = |message: String| LoadError::InvalidValue {
        key: key.to_string(),
        message,
    };

    if LIST_KEYS.contains(&key) {
        return match value {
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(invalid(format!("expected strings, found {}", other.type_str()))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ConfigValue::List),
            Value::String(json) => serde_json::from_str::<Vec<String>>(json)
                .map(ConfigValue::List)
                .map_err(|e| invalid(format!("expected a JSON list of strings: {e}"))),
            other => Err(invalid(format!("expected a list, found {}", other.type_str()))),
        };
    }

    Ok(match value {
        Value::String(s) => ConfigValue::String(s.clone()),
        Value::Integer(i) => ConfigValue::Int(*i),
        Value::Boolean(b) => ConfigValue::Bool(*b),
        Value::Float(f) => ConfigValue::String(f.to_string()),
        Value::Datetime(d) => ConfigValue::String(d.to_string()),
        Value::Array(items) => ConfigValue::List(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        Value::Table(_) => return Err(invalid("nested tables are not supported".to_string())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jatsgen_core::key;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
generator = "jatsgen"
journal_title = "Default Journal"
xml_filename_pattern = "article-{manuscript}.xml"
history_date_types = '["received", "accepted"]'

[elife]
journal_title = "eLife"
journal_id_types = ["nlm-ta", "publisher-id"]
contrib_types = '["author"]'
max_content_depth = 3
institution_wrap = true
"#;

    #[test]
    fn test_section_overrides_defaults() {
        let config = parse_config(SAMPLE, Some("elife")).unwrap();
        assert_eq!(config.get_str(key::JOURNAL_TITLE), Some("eLife"));
        assert_eq!(config.get_str(key::GENERATOR), Some("jatsgen"));
        assert_eq!(config.get_int(key::MAX_CONTENT_DEPTH), Some(3));
        assert_eq!(config.get_bool(key::INSTITUTION_WRAP), Some(true));
        assert_eq!(config.contrib_types(), ["author"]);
        assert_eq!(config.history_date_types(), ["received", "accepted"]);
        assert_eq!(
            config.get_list(key::JOURNAL_ID_TYPES),
            ["nlm-ta", "publisher-id"]
        );
    }

    #[test]
    fn test_defaults_only() {
        let config = parse_config(SAMPLE, None).unwrap();
        assert_eq!(config.get_str(key::JOURNAL_TITLE), Some("Default Journal"));
        assert!(config.contrib_types().is_empty());
        assert!(!config.contains("elife"));
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let config = parse_config(SAMPLE, Some("nope")).unwrap();
        assert_eq!(config, parse_config(SAMPLE, None).unwrap());
    }

    #[test]
    fn test_invalid_list() {
        let err = parse_config("contrib_types = 'author'", None).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { ref key, .. } if key == "contrib_types"));

        let err = parse_config("contrib_types = [1, 2]", None).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            parse_config("journal_title = ", None),
            Err(LoadError::Toml(_))
        ));
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/jatsgen.toml", None).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
