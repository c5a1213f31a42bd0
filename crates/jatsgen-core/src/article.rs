//! Article type - the root record handed to a document build.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{ContentBlock, Contributor, Dataset, DatasetKind, FundingAward};

/// A publication record with its metadata, contributors and content.
///
/// Optional fields are omitted from the output when absent; the builders
/// never mutate the record.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Article {
    /// JATS `article-type` (e.g. "research-article", "editor-report").
    pub article_type: Option<String>,
    /// Element id, used by sub-articles (e.g. "sa0").
    pub id: Option<String>,
    /// Manuscript number; rendered zero-padded to five digits.
    pub manuscript: Option<u32>,
    pub doi: Option<String>,
    /// Title, may carry whitelisted inline markup.
    pub title: String,
    /// Abstract, may carry whitelisted inline markup.
    #[cfg_attr(feature = "serde", serde(rename = "abstract"))]
    pub abstract_text: String,
    pub volume: Option<u32>,
    pub license: Option<License>,
    /// Dates keyed by date type ("pub", "received", "accepted", "license", ...).
    pub dates: BTreeMap<String, NaiveDate>,
    /// Contributors in source order.
    pub contributors: Vec<Contributor>,
    pub funding_awards: Vec<FundingAward>,
    pub funding_note: Option<String>,
    pub datasets: Vec<Dataset>,
    pub data_availability: Option<String>,
    pub research_organisms: Vec<String>,
    pub author_keywords: Vec<String>,
    pub display_channel: Option<String>,
    pub article_categories: Vec<String>,
    /// Document-level competing interest statement for contributors
    /// without a personal one.
    pub conflict_default: Option<String>,
    pub ethics: Vec<String>,
    pub publication_history: Vec<HistoryEvent>,
    pub related_articles: Vec<RelatedArticle>,
    pub content_blocks: Vec<ContentBlock>,
    /// Nested peer-review reports.
    pub sub_articles: Vec<Article>,
}

/// License terms attached to an article.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct License {
    pub href: String,
    pub name: String,
    /// Text preceding the license link.
    pub paragraph1: String,
    /// Text following the license link.
    pub paragraph2: String,
    /// Whether a copyright statement accompanies the license.
    pub copyright: bool,
}

/// A link from a sub-article to an external object.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RelatedArticle {
    pub ext_link_type: String,
    pub xlink_href: String,
}

/// One entry of an article's publication history.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct HistoryEvent {
    /// Date type, e.g. "preprint" or "reviewed-preprint".
    pub event_type: String,
    pub event_desc: Option<String>,
    pub date: Option<NaiveDate>,
    pub uri: Option<String>,
}

impl Article {
    /// Create an article with a DOI and title.
    pub fn new(doi: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            doi: Some(doi.into()),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the article type.
    pub fn with_type(mut self, article_type: impl Into<String>) -> Self {
        self.article_type = Some(article_type.into());
        self
    }

    /// Set the manuscript number.
    pub fn with_manuscript(mut self, manuscript: u32) -> Self {
        self.manuscript = Some(manuscript);
        self
    }

    /// Append a contributor.
    pub fn with_contributor(mut self, contributor: Contributor) -> Self {
        self.contributors.push(contributor);
        self
    }

    /// Add or replace a date of the given type.
    pub fn with_date(mut self, date_type: impl Into<String>, date: NaiveDate) -> Self {
        self.dates.insert(date_type.into(), date);
        self
    }

    /// Look up a date by type.
    pub fn get_date(&self, date_type: &str) -> Option<NaiveDate> {
        self.dates.get(date_type).copied()
    }

    /// Whether any contributor declares a personal competing interest.
    pub fn has_contributor_conflict(&self) -> bool {
        self.contributors.iter().any(|c| !c.conflict.is_empty())
    }

    /// Whether any contributor is flagged as corresponding author.
    pub fn has_corresponding_author(&self) -> bool {
        self.contributors.iter().any(|c| c.corresp)
    }

    /// Datasets of one kind, in source order.
    pub fn get_datasets(&self, kind: DatasetKind) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().filter(move |d| d.kind == kind)
    }

    /// The display channel, if present and not blank.
    pub fn display_channel(&self) -> Option<&str> {
        self.display_channel
            .as_deref()
            .filter(|channel| !channel.trim().is_empty())
    }

    /// Article categories that are not blank.
    pub fn subject_headings(&self) -> impl Iterator<Item = &str> {
        self.article_categories
            .iter()
            .map(String::as_str)
            .filter(|heading| !heading.trim().is_empty())
    }

    /// Reasons this record cannot be turned into a document.
    ///
    /// An empty list means the record is buildable.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut reasons = Vec::new();
        if self
            .article_type
            .as_deref()
            .is_none_or(|t| t.trim().is_empty())
        {
            reasons.push("article type is missing".to_string());
        }
        if self.manuscript.is_none() && self.doi.is_none() && self.id.is_none() {
            reasons.push("article has no manuscript number, DOI or id".to_string());
        }
        reasons
    }

    /// Manuscript number zero-padded to five digits.
    pub fn padded_manuscript(&self) -> Option<String> {
        self.manuscript.map(|m| format!("{m:05}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let article = Article::default();
        assert_eq!(article.missing_fields().len(), 2);

        let article = Article::new("10.7554/eLife.00666", "Title").with_type("research-article");
        assert!(article.missing_fields().is_empty());

        let article = Article::new("10.7554/eLife.00666", "Title").with_type("  ");
        assert_eq!(
            article.missing_fields(),
            vec!["article type is missing".to_string()]
        );
    }

    #[test]
    fn test_padded_manuscript() {
        let article = Article::default().with_manuscript(7);
        assert_eq!(article.padded_manuscript().as_deref(), Some("00007"));
        assert_eq!(Article::default().padded_manuscript(), None);
    }

    #[test]
    fn test_display_channel_blank() {
        let mut article = Article::default();
        article.display_channel = Some("   ".to_string());
        assert_eq!(article.display_channel(), None);
        article.display_channel = Some("Research Article".to_string());
        assert_eq!(article.display_channel(), Some("Research Article"));
    }

    #[test]
    fn test_subject_headings_skip_blank() {
        let mut article = Article::default();
        article.article_categories = vec![
            "Cell Biology".to_string(),
            " ".to_string(),
            "Neuroscience".to_string(),
        ];
        let headings: Vec<_> = article.subject_headings().collect();
        assert_eq!(headings, vec!["Cell Biology", "Neuroscience"]);
    }

    #[test]
    fn test_get_date() {
        let date = NaiveDate::from_ymd_opt(2012, 11, 13).unwrap();
        let article = Article::default().with_date("pub", date);
        assert_eq!(article.get_date("pub"), Some(date));
        assert_eq!(article.get_date("accepted"), None);
    }
}
