//! Build options resolved from configuration.

use jatsgen_core::{Config, ConfigError, key};

/// Deepest content block nesting accepted by default.
pub const DEFAULT_MAX_CONTENT_DEPTH: usize = 5;

/// Separator written between affiliation parts by default.
pub const DEFAULT_AFF_SEPARATOR: &str = ", ";

/// How dataset citations are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetStyle {
    /// `element-citation publication-type="data"`.
    #[default]
    ElementCitation,
    /// Legacy `related-object` with comma-joined children.
    RelatedObject,
}

impl DatasetStyle {
    /// Look up a style by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "element-citation" => Some(DatasetStyle::ElementCitation),
            "related-object" => Some(DatasetStyle::RelatedObject),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DatasetStyle::ElementCitation => "element-citation",
            DatasetStyle::RelatedObject => "related-object",
        }
    }
}

/// Where and when a document was generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub generator: String,
    pub timestamp: String,
    pub revision: String,
}

impl Provenance {
    /// Text of the leading provenance comment.
    pub fn comment(&self) -> String {
        format!(
            "generated by {} at {} from version {}",
            self.generator, self.timestamp, self.revision
        )
    }
}

/// Options controlling a document build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOptions {
    pub max_content_depth: usize,
    pub dataset_style: DatasetStyle,
    pub aff_separator: String,
    /// Group institution fields inside `institution-wrap`.
    pub institution_wrap: bool,
    /// Emit the author keywords group.
    pub author_keywords: bool,
    /// Leading comment; none means no comment.
    pub provenance: Option<Provenance>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            max_content_depth: DEFAULT_MAX_CONTENT_DEPTH,
            dataset_style: DatasetStyle::default(),
            aff_separator: DEFAULT_AFF_SEPARATOR.to_string(),
            institution_wrap: false,
            author_keywords: false,
            provenance: None,
        }
    }
}

impl BuildOptions {
    /// Resolve options from a configuration table.
    ///
    /// Missing keys keep their defaults; present but unusable values are
    /// an error.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if config.contains(key::MAX_CONTENT_DEPTH) {
            options.max_content_depth = config
                .get_int(key::MAX_CONTENT_DEPTH)
                .and_then(|depth| usize::try_from(depth).ok())
                .filter(|depth| *depth > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: key::MAX_CONTENT_DEPTH.to_string(),
                    message: "expected a positive integer".to_string(),
                })?;
        }

        if let Some(style) = config.get_str(key::DATASET_CITATION_STYLE) {
            options.dataset_style =
                DatasetStyle::from_name(style).ok_or_else(|| ConfigError::InvalidValue {
                    key: key::DATASET_CITATION_STYLE.to_string(),
                    message: format!(
                        "unknown style `{style}`, expected `element-citation` or `related-object`"
                    ),
                })?;
        }

        if let Some(separator) = config.get_str(key::AFF_SEPARATOR) {
            options.aff_separator = separator.to_string();
        }
        options.institution_wrap = config.get_bool(key::INSTITUTION_WRAP).unwrap_or(false);
        options.author_keywords = config.get_bool(key::AUTHOR_KEYWORDS).unwrap_or(false);

        Ok(options)
    }

    /// Set the provenance comment.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = Some(provenance);
        self
    }
}
