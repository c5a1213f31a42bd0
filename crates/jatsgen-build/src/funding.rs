//! Funding group builders.

use std::borrow::Cow;
use std::sync::LazyLock;

use jatsgen_core::{Article, FundingAward};
use jatsgen_xml::Element;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::{Captures, Regex};

use crate::name_element;

/// URI prefix of FundRef funder identifiers.
pub const FUNDREF_URI: &str = "http://dx.doi.org/10.13039/";

static ENTITY_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").expect("valid regex"));

/// Id of the award group at zero-based `index` ("par-1", "par-2", ...).
pub fn award_group_id(index: usize) -> String {
    format!("par-{}", index + 1)
}

/// Award group ids of every award listing `auth_id` as a principal
/// recipient.
pub fn contrib_award_ids(awards: &[FundingAward], auth_id: Option<&str>) -> Vec<String> {
    let Some(auth_id) = auth_id else {
        return Vec::new();
    };
    awards
        .iter()
        .enumerate()
        .filter(|(_, award)| award.has_recipient(auth_id))
        .map(|(index, _)| award_group_id(index))
        .collect()
}

/// Decode character references and HTML named entities. References
/// that do not resolve are left as written.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    ENTITY_REF.replace_all(text, |caps: &Captures<'_>| {
        let reference = &caps[0];
        unescape_with(reference, resolve_html5_entity)
            .map_or_else(|_| reference.to_string(), Cow::into_owned)
    })
}

/// Build the `funding-source` of an award, if it names a funder.
pub fn funding_source_element(award: &FundingAward) -> Option<Element> {
    if !award.has_funding_source() {
        return None;
    }
    let mut wrap = Element::new("institution-wrap");
    if let Some(institution_id) = &award.institution_id {
        wrap.text_element("institution-id", format!("{FUNDREF_URI}{institution_id}"))
            .set_attr("institution-id-type", "FundRef");
    }
    if let Some(institution_name) = &award.institution_name {
        wrap.text_element("institution", decode_entities(institution_name).into_owned());
    }
    Some(Element::new("funding-source").child(wrap))
}

/// Build an `award-group` element.
pub fn award_group_element(award: &FundingAward, id: &str) -> Element {
    let mut group = Element::new("award-group").attr("id", id);
    if let Some(source) = funding_source_element(award) {
        group.push(source);
    }
    for award_id in &award.award_ids {
        group.text_element("award-id", award_id.as_str());
    }
    if !award.principal_award_recipients.is_empty() {
        let recipients = group.sub_element("principal-award-recipient");
        for recipient in &award.principal_award_recipients {
            recipients.push(name_element(recipient));
        }
    }
    group
}

/// Build the `funding-group`, if the article has awards or a funding note.
pub fn funding_group_element(article: &Article) -> Option<Element> {
    if article.funding_awards.is_empty() && article.funding_note.is_none() {
        return None;
    }
    let mut group = Element::new("funding-group");
    for (index, award) in article.funding_awards.iter().enumerate() {
        group.push(award_group_element(award, &award_group_id(index)));
    }
    if let Some(note) = &article.funding_note {
        group.text_element("funding-statement", note.as_str());
    }
    Some(group)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jatsgen_core::{AUTHOR, Contributor};
    use jatsgen_xml::to_string;
    use pretty_assertions::assert_eq;

    fn recipient(auth_id: &str) -> Contributor {
        let mut contributor = Contributor::person(AUTHOR, "Schuman", "Erin");
        contributor.auth_id = Some(auth_id.into());
        contributor
    }

    fn award() -> FundingAward {
        FundingAward {
            institution_id: Some("501100000780".into()),
            institution_name: Some("European Commission &amp; Partners".into()),
            award_ids: vec!["ERC-2012".into()],
            principal_award_recipients: vec![recipient("1399")],
        }
    }

    #[test]
    fn test_award_group() {
        let xml = to_string(&award_group_element(&award(), "par-1")).unwrap();
        assert_eq!(
            xml,
            "<award-group id=\"par-1\"><funding-source><institution-wrap>\
             <institution-id institution-id-type=\"FundRef\">http://dx.doi.org/10.13039/501100000780</institution-id>\
             <institution>European Commission &amp; Partners</institution>\
             </institution-wrap></funding-source>\
             <award-id>ERC-2012</award-id>\
             <principal-award-recipient><name><surname>Schuman</surname><given-names>Erin</given-names></name></principal-award-recipient>\
             </award-group>"
        );
    }

    #[test]
    fn test_award_without_funder() {
        let award = FundingAward {
            award_ids: vec!["123".into()],
            ..FundingAward::default()
        };
        let xml = to_string(&award_group_element(&award, "par-2")).unwrap();
        assert_eq!(xml, "<award-group id=\"par-2\"><award-id>123</award-id></award-group>");
    }

    #[test]
    fn test_contrib_award_ids() {
        let other = FundingAward {
            principal_award_recipients: vec![recipient("7")],
            ..FundingAward::default()
        };
        let awards = vec![award(), other, award()];
        assert_eq!(contrib_award_ids(&awards, Some("1399")), vec!["par-1", "par-3"]);
        assert_eq!(contrib_award_ids(&awards, Some("7")), vec!["par-2"]);
        assert!(contrib_award_ids(&awards, None).is_empty());
    }

    #[test]
    fn test_funding_group() {
        let mut article = Article::default();
        assert!(funding_group_element(&article).is_none());

        article.funding_note = Some("The funders had no role in study design.".into());
        assert_eq!(
            to_string(&funding_group_element(&article).unwrap()).unwrap(),
            "<funding-group><funding-statement>The funders had no role in study design.</funding-statement></funding-group>"
        );

        article.funding_awards = vec![award(), award()];
        let xml = to_string(&funding_group_element(&article).unwrap()).unwrap();
        assert!(xml.contains("<award-group id=\"par-1\">"));
        assert!(xml.contains("<award-group id=\"par-2\">"));
        assert!(xml.ends_with("<funding-statement>The funders had no role in study design.</funding-statement></funding-group>"));
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Wellcome &amp; Trust"), "Wellcome & Trust");
        assert_eq!(decode_entities("Fondation d&#x27;entreprise"), "Fondation d'entreprise");
        assert_eq!(decode_entities("R&D"), "R&D");
        assert_eq!(
            decode_entities("Fondation M&eacute;decins &amp; Co"),
            "Fondation Médecins & Co"
        );
        assert_eq!(decode_entities("A &bogus; &amp; B"), "A &bogus; & B");
        assert!(matches!(decode_entities("Plain name"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_funding_source_decodes_html_entities() {
        let award = FundingAward {
            institution_name: Some("Fondation M&eacute;decins &amp; Co".into()),
            ..FundingAward::default()
        };
        let xml = to_string(&funding_source_element(&award).unwrap()).unwrap();
        assert_eq!(
            xml,
            "<funding-source><institution-wrap><institution>Fondation Médecins &amp; Co</institution>\
             </institution-wrap></funding-source>"
        );
    }
}
