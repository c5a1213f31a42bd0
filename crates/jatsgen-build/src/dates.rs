//! Date, history and publication history builders.

use chrono::{Datelike, NaiveDate};
use jatsgen_core::{Article, HistoryEvent};
use jatsgen_xml::Element;

/// Append zero-padded `day`, `month` and `year` elements.
pub fn set_dmy(parent: &mut Element, date: NaiveDate) {
    parent.text_element("day", format!("{:02}", date.day()));
    parent.text_element("month", format!("{:02}", date.month()));
    parent.text_element("year", date.year().to_string());
}

/// Build a `date` element of the given type.
pub fn date_element(date_type: &str, date: NaiveDate) -> Element {
    let mut element = Element::new("date").attr("date-type", date_type);
    set_dmy(&mut element, date);
    element
}

/// Build the electronic publication `pub-date`, if the article has a
/// "pub" date.
pub fn pub_date_element(article: &Article) -> Option<Element> {
    let date = article.get_date("pub")?;
    let mut element = Element::new("pub-date")
        .attr("date-type", "pub")
        .attr("publication-format", "electronic");
    set_dmy(&mut element, date);
    Some(element)
}

/// Build `history` from the configured date types present on the
/// article, in configured order.
pub fn history_element(article: &Article, date_types: &[String]) -> Option<Element> {
    let dates: Vec<_> = date_types
        .iter()
        .filter_map(|date_type| Some(date_element(date_type, article.get_date(date_type)?)))
        .collect();
    if dates.is_empty() {
        return None;
    }
    let mut history = Element::new("history");
    for date in dates {
        history.push(date);
    }
    Some(history)
}

/// Build one publication history `event`.
pub fn event_element(event: &HistoryEvent) -> Element {
    let mut element = Element::new("event");
    if let Some(desc) = &event.event_desc {
        element.text_element("event-desc", desc.as_str());
    }
    if let Some(date) = event.date {
        let mut date_tag = Element::new("date")
            .attr("date-type", event.event_type.as_str())
            .attr("iso-8601-date", date.format("%Y-%m-%d").to_string());
        set_dmy(&mut date_tag, date);
        element.push(date_tag);
    }
    if let Some(uri) = &event.uri {
        element.push(
            Element::new("self-uri")
                .attr("content-type", event.event_type.as_str())
                .attr("xlink:href", uri.as_str()),
        );
    }
    element
}

/// Build `pub-history`, if the article has any history events.
pub fn pub_history_element(article: &Article) -> Option<Element> {
    if article.publication_history.is_empty() {
        return None;
    }
    let mut pub_history = Element::new("pub-history");
    for event in &article.publication_history {
        pub_history.push(event_element(event));
    }
    Some(pub_history)
}
