//! Datasets cited in the data availability section.

/// Whether a dataset was produced by the article or reused by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DatasetKind {
    /// Generated for this article.
    #[default]
    Generated,
    /// Previously published and used by this article.
    PreviouslyPublished,
}

/// A dataset citation.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Dataset {
    pub kind: DatasetKind,
    /// Author names, rendered as collaboration entries.
    pub authors: Vec<String>,
    pub year: Option<String>,
    pub title: Option<String>,
    /// Repository URI of the dataset.
    pub source_id: Option<String>,
    pub license_info: Option<String>,
}

impl Dataset {
    pub fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}
