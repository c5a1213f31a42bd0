//! Resolved configuration - a key-value lookup table.

use std::collections::HashMap;

/// Recognized configuration keys.
pub mod key {
    /// Generator name written into the provenance comment.
    pub const GENERATOR: &str = "generator";
    /// Ordered journal-id types; each value lives under `journal_id_<type>`.
    pub const JOURNAL_ID_TYPES: &str = "journal_id_types";
    /// Prefix of the per-type journal-id value keys.
    pub const JOURNAL_ID_PREFIX: &str = "journal_id_";
    pub const JOURNAL_TITLE: &str = "journal_title";
    pub const JOURNAL_ISSN: &str = "journal_issn";
    pub const PUBLISHER_NAME: &str = "publisher_name";
    /// Ordered contributor types, one contrib-group each.
    pub const CONTRIB_TYPES: &str = "contrib_types";
    /// Ordered date types emitted under history.
    pub const HISTORY_DATE_TYPES: &str = "history_date_types";
    /// Output file name with a `{manuscript}` placeholder.
    pub const XML_FILENAME_PATTERN: &str = "xml_filename_pattern";
    pub const TARGET_OUTPUT_DIR: &str = "target_output_dir";
    /// Source revision written into the provenance comment.
    pub const SOURCE_REVISION: &str = "source_revision";
    /// Maximum content block nesting depth.
    pub const MAX_CONTENT_DEPTH: &str = "max_content_depth";
    /// `element-citation` or `related-object`.
    pub const DATASET_CITATION_STYLE: &str = "dataset_citation_style";
    /// Separator written after affiliation parts.
    pub const AFF_SEPARATOR: &str = "aff_separator";
    /// Group institution fields inside `institution-wrap`.
    pub const INSTITUTION_WRAP: &str = "institution_wrap";
    /// Emit the author keywords group.
    pub const AUTHOR_KEYWORDS: &str = "author_keywords";
}

/// Keys whose values are lists.
pub const LIST_KEYS: [&str; 3] = [
    key::JOURNAL_ID_TYPES,
    key::CONTRIB_TYPES,
    key::HISTORY_DATE_TYPES,
];

/// A resolved configuration table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config(HashMap<String, ConfigValue>);

/// A configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Bool(bool),
    List(Vec<String>),
}

/// Error reading a typed value out of the table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {message}")]
    InvalidValue { key: String, message: String },
}

impl Config {
    /// Create an empty table.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Set a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Get a string value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ConfigValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Get an integer value, accepting numeric strings.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ConfigValue::Int(i)) => Some(*i),
            Some(ConfigValue::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get a boolean value, accepting the usual string spellings.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(ConfigValue::Bool(b)) => Some(*b),
            Some(ConfigValue::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Get a list value; missing keys read as an empty list.
    pub fn get_list(&self, key: &str) -> &[String] {
        match self.0.get(key) {
            Some(ConfigValue::List(items)) => items,
            _ => &[],
        }
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy every entry of `other` over this table.
    pub fn merge(&mut self, other: Config) {
        self.0.extend(other.0);
    }

    /// Iterate over entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contrib_types(&self) -> &[String] {
        self.get_list(key::CONTRIB_TYPES)
    }

    pub fn history_date_types(&self) -> &[String] {
        self.get_list(key::HISTORY_DATE_TYPES)
    }

    /// Configured journal ids as `(type, value)` pairs, skipping types
    /// without a value.
    pub fn journal_ids(&self) -> impl Iterator<Item = (&str, &str)> {
        self.get_list(key::JOURNAL_ID_TYPES).iter().filter_map(|id_type| {
            self.get_str(&format!("{}{id_type}", key::JOURNAL_ID_PREFIX))
                .filter(|value| !value.is_empty())
                .map(|value| (id_type.as_str(), value))
        })
    }
}

// Conversions
impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(i: i64) -> Self {
        ConfigValue::Int(i)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(items: Vec<String>) -> Self {
        ConfigValue::List(items)
    }
}

impl From<&[&str]> for ConfigValue {
    fn from(items: &[&str]) -> Self {
        ConfigValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConfigValue {
    fn from(items: [&str; N]) -> Self {
        ConfigValue::List(items.iter().map(|s| s.to_string()).collect())
    }
}
