//! Journal and article metadata builders.

use std::sync::LazyLock;

use jatsgen_core::{Article, Config, key};
use jatsgen_xml::{Element, markup_element, reinject};
use regex::Regex;

use crate::BuildError;

static DOI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"10\.\d+/.*").expect("valid regex"));

/// Build `journal-meta` from configuration.
///
/// Each part is left out when its configuration key is missing.
pub fn journal_meta_element(config: &Config) -> Element {
    let mut journal_meta = Element::new("journal-meta");

    for (id_type, value) in config.journal_ids() {
        journal_meta
            .text_element("journal-id", value)
            .set_attr("journal-id-type", id_type);
    }

    if let Some(title) = config.get_str(key::JOURNAL_TITLE) {
        journal_meta
            .sub_element("journal-title-group")
            .text_element("journal-title", title);
    }

    if let Some(issn) = config.get_str(key::JOURNAL_ISSN) {
        journal_meta
            .text_element("issn", issn)
            .set_attr("publication-format", "electronic");
    }

    if let Some(publisher) = config.get_str(key::PUBLISHER_NAME) {
        journal_meta
            .sub_element("publisher")
            .text_element("publisher-name", publisher);
    }

    journal_meta
}

/// Build the publisher id and DOI `article-id` elements.
pub fn article_id_elements(article: &Article) -> Vec<Element> {
    let mut ids = Vec::new();
    if let Some(manuscript) = article.padded_manuscript() {
        ids.push(
            Element::new("article-id")
                .attr("pub-id-type", "publisher-id")
                .text(manuscript),
        );
    }
    if let Some(doi) = &article.doi {
        ids.push(doi_article_id(doi));
    }
    ids
}

/// Build a DOI `article-id`.
pub fn doi_article_id(doi: &str) -> Element {
    Element::new("article-id")
        .attr("pub-id-type", "doi")
        .text(doi)
}

/// Build `article-categories`, if there is a display channel or a
/// non-blank category.
pub fn article_categories_element(article: &Article) -> Option<Element> {
    let channel = article.display_channel();
    let mut headings = article.subject_headings().peekable();
    if channel.is_none() && headings.peek().is_none() {
        return None;
    }

    let mut categories = Element::new("article-categories");
    if let Some(channel) = channel {
        subj_group(&mut categories, "display-channel", channel);
    }
    for heading in headings {
        subj_group(&mut categories, "heading", heading);
    }
    Some(categories)
}

fn subj_group(parent: &mut Element, group_type: &str, subject: &str) {
    let group = parent.sub_element("subj-group");
    group.set_attr("subj-group-type", group_type);
    group.text_element("subject", subject);
}

/// Build `title-group` with the reinjected article title.
pub fn title_group_element(article: &Article) -> Result<Element, BuildError> {
    let mut group = Element::new("title-group");
    reinject(&mut group, "article-title", &article.title)?;
    Ok(group)
}

/// Build `abstract` with the reinjected abstract paragraph.
pub fn abstract_element(article: &Article) -> Result<Element, BuildError> {
    let mut element = Element::new("abstract");
    reinject(&mut element, "p", &article.abstract_text)?;
    Ok(element)
}

/// Build `volume`, if the article has one.
pub fn volume_element(article: &Article) -> Option<Element> {
    article
        .volume
        .map(|volume| Element::new("volume").text(volume.to_string()))
}

/// Build `elocation-id` ("e" + padded manuscript number).
pub fn elocation_id_element(article: &Article) -> Option<Element> {
    article
        .padded_manuscript()
        .map(|manuscript| Element::new("elocation-id").text(format!("e{manuscript}")))
}

/// Build the research organism `kwd-group`, if there are any.
pub fn research_organism_element(article: &Article) -> Result<Option<Element>, BuildError> {
    if article.research_organisms.is_empty() {
        return Ok(None);
    }
    let mut group = Element::new("kwd-group").attr("kwd-group-type", "research-organism");
    group.text_element("title", "Research organism");
    for organism in &article.research_organisms {
        group.push(markup_element("kwd", organism)?);
    }
    Ok(Some(group))
}

/// Build the author keywords `kwd-group`, if there are any.
pub fn author_keywords_element(article: &Article) -> Option<Element> {
    if article.author_keywords.is_empty() {
        return None;
    }
    let mut group = Element::new("kwd-group").attr("kwd-group-type", "author-keywords");
    group.text_element("title", "Author keywords");
    for keyword in &article.author_keywords {
        group.text_element("kwd", keyword.as_str());
    }
    Some(group)
}

/// The DOI embedded in a URI, or the URI itself when it has none.
pub fn object_id_from_uri(uri: Option<&str>) -> Option<String> {
    let uri = uri?;
    Some(
        DOI.find(uri)
            .map_or(uri, |doi| doi.as_str())
            .to_string(),
    )
}

/// Build one `related-object` per related article, with ids
/// "<article id>ro1", "<article id>ro2", ...
pub fn related_object_elements(article: &Article) -> Vec<Element> {
    let prefix = article.id.as_deref().unwrap_or_default();
    article
        .related_articles
        .iter()
        .enumerate()
        .map(|(index, related)| {
            let mut object = Element::new("related-object")
                .attr("id", format!("{prefix}ro{}", index + 1))
                .attr("object-id-type", "id");
            if let Some(object_id) = object_id_from_uri(Some(&related.xlink_href)) {
                object.set_attr("object-id", object_id);
            }
            object
                .attr("link-type", related.ext_link_type.as_str())
                .attr("xlink:href", related.xlink_href.as_str())
        })
        .collect()
}
