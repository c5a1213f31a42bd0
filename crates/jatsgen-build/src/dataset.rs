//! Dataset citations and the data availability section.

use jatsgen_core::{Article, Dataset, DatasetKind};
use jatsgen_xml::{Element, reinject};

use crate::{BuildContext, BuildError, DatasetStyle};

/// Lead paragraph introducing each dataset kind.
pub fn dataset_heading(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Generated => "The following datasets were generated:",
        DatasetKind::PreviouslyPublished => {
            "The following previously published datasets were used:"
        }
    }
}

/// `specific-use` of element citations of each kind.
pub fn dataset_specific_use(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Generated => "isSupplementedBy",
        DatasetKind::PreviouslyPublished => "references",
    }
}

/// `content-type` of related-object citations of each kind.
pub fn dataset_content_type(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Generated => "generated-dataset",
        DatasetKind::PreviouslyPublished => "existing-dataset",
    }
}

/// Build one dataset citation in the configured style.
pub fn dataset_element(dataset: &Dataset, number: u32, style: DatasetStyle) -> Element {
    match style {
        DatasetStyle::ElementCitation => element_citation(dataset, number),
        DatasetStyle::RelatedObject => related_object(dataset, number),
    }
}

/// The optional citation fields, in output order.
fn citation_parts(dataset: &Dataset) -> Vec<Element> {
    let mut parts = Vec::new();
    if let Some(year) = &dataset.year {
        parts.push(
            Element::new("year")
                .attr("iso-8601-date", year.as_str())
                .text(year.as_str()),
        );
    }
    if let Some(title) = &dataset.title {
        parts.push(Element::new("source").text(title.as_str()));
    }
    if let Some(source_id) = &dataset.source_id {
        parts.push(
            Element::new("ext-link")
                .attr("ext-link-type", "uri")
                .attr("xlink:href", source_id.as_str())
                .text(source_id.as_str()),
        );
    }
    if let Some(license_info) = &dataset.license_info {
        parts.push(Element::new("comment").text(license_info.as_str()));
    }
    parts
}

fn element_citation(dataset: &Dataset, number: u32) -> Element {
    let mut citation = Element::new("element-citation")
        .attr("id", format!("dataset{number}"))
        .attr("publication-type", "data")
        .attr("specific-use", dataset_specific_use(dataset.kind));

    if !dataset.authors.is_empty() {
        let group = citation.sub_element("person-group");
        group.set_attr("person-group-type", "author");
        for author in &dataset.authors {
            group.text_element("collab", author.as_str());
        }
    }
    for part in citation_parts(dataset) {
        citation.push(part);
    }
    citation
}

fn related_object(dataset: &Dataset, number: u32) -> Element {
    let mut object = Element::new("related-object")
        .attr("id", format!("dataro{number}"))
        .attr("content-type", dataset_content_type(dataset.kind));
    if let Some(source_id) = &dataset.source_id {
        object.set_attr("source-id", source_id.as_str());
        object.set_attr("source-id-type", "uri");
    }

    let authors = dataset
        .authors
        .iter()
        .map(|author| Element::new("collab").text(author.as_str()));
    for (i, part) in authors.chain(citation_parts(dataset)).enumerate() {
        if i > 0 {
            object.push_text(", ");
        }
        object.push(part);
    }
    object
}

/// Fill the data availability section: title, availability statement and
/// one labelled list per dataset kind present.
pub fn set_article_datasets(
    section: &mut Element,
    article: &Article,
    context: &mut BuildContext,
    style: DatasetStyle,
) -> Result<(), BuildError> {
    section.text_element("title", "Data availability");
    if let Some(statement) = &article.data_availability {
        reinject(section, "p", statement)?;
    }

    for kind in [DatasetKind::Generated, DatasetKind::PreviouslyPublished] {
        let datasets: Vec<_> = article.get_datasets(kind).collect();
        if datasets.is_empty() {
            continue;
        }
        section.text_element("p", dataset_heading(kind));
        let list = section.sub_element("p");
        for dataset in datasets {
            list.push(dataset_element(dataset, context.next_dataset_number(), style));
        }
    }
    Ok(())
}
