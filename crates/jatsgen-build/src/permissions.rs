//! Copyright and license builders.

use chrono::Datelike;
use jatsgen_core::{Article, License};
use jatsgen_xml::Element;

/// Copyright holder derived from the non-editor contributors.
///
/// No authors give an empty holder, one gives their surname, two are
/// joined with " & " and three or more collapse to "<first> et al".
pub fn copyright_holder(article: &Article) -> String {
    let authors: Vec<_> = article
        .contributors
        .iter()
        .filter(|c| !c.is_editor())
        .collect();
    match authors.as_slice() {
        [] => String::new(),
        [only] => only.display_surname().to_string(),
        [first, second] => format!("{} & {}", first.display_surname(), second.display_surname()),
        [first, ..] => format!("{} et al", first.display_surname()),
    }
}

/// Copyright year: the license date's year, else the accepted date's.
pub fn copyright_year(article: &Article) -> Option<i32> {
    article
        .get_date("license")
        .or_else(|| article.get_date("accepted"))
        .map(|date| date.year())
}

/// Append the copyright statement, year and holder.
pub fn set_copyright(parent: &mut Element, article: &Article) {
    let year = copyright_year(article).map(|y| y.to_string()).unwrap_or_default();
    let holder = copyright_holder(article);
    parent.text_element("copyright-statement", format!("\u{a9} {year}, {holder}"));
    parent.text_element("copyright-year", year);
    parent.text_element("copyright-holder", holder);
}

/// Build a `license` element.
pub fn license_element(license: &License) -> Element {
    let mut license_p = Element::new("license-p").text(license.paragraph1.as_str());
    license_p.push(
        Element::new("ext-link")
            .attr("ext-link-type", "uri")
            .attr("xlink:href", license.href.as_str())
            .text(license.name.as_str()),
    );
    license_p.push_text(license.paragraph2.as_str());

    Element::new("license")
        .attr("xlink:href", license.href.as_str())
        .child(license_p)
}

/// Build `permissions`, if the article has a license.
pub fn permissions_element(article: &Article) -> Option<Element> {
    let license = article.license.as_ref()?;
    let mut permissions = Element::new("permissions");
    if license.copyright {
        set_copyright(&mut permissions, article);
    }
    permissions.push(license_element(license));
    Some(permissions)
}
