//! Contributor builders: names, roles, ORCIDs and the `contrib` element.

use jatsgen_core::{Contributor, ContributorName, PersonName};
use jatsgen_xml::Element;

use crate::{BuildOptions, aff_element};

/// URI base prepended to bare ORCID identifiers.
pub const ORCID_URI: &str = "http://orcid.org/";

/// Role given to editors that carry no explicit roles.
pub const REVIEWING_EDITOR_ROLE: &str = "Reviewing editor";

/// Cross-references attached to a `contrib` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContribLinks {
    /// Render affiliations inline instead of as `xref`s.
    pub inline_affiliations: bool,
    pub aff_ids: Vec<u32>,
    pub corresp_id: Option<u32>,
    /// Award group ids ("par-N").
    pub award_ids: Vec<String>,
    pub conflict_ids: Vec<u32>,
}

/// Build the name element of a contributor.
///
/// Collaborations render as `collab`, anonymous contributors as an empty
/// `anonymous` marker and everyone else as a structured `name`.
pub fn name_element(contributor: &Contributor) -> Element {
    match &contributor.name {
        ContributorName::Personal(name) => person_name_element(name),
        ContributorName::Collab(collab) => Element::new("collab").text(collab.as_str()),
        ContributorName::Anonymous => Element::new("anonymous"),
    }
}

/// Build a `name` element.
pub fn person_name_element(name: &PersonName) -> Element {
    let mut element = Element::new("name");
    element.text_element("surname", name.surname.as_str());
    if let Some(given_names) = &name.given_names {
        element.text_element("given-names", given_names.as_str());
    }
    if let Some(suffix) = name.suffix.as_deref().filter(|s| !s.is_empty()) {
        element.text_element("suffix", suffix);
    }
    element
}

/// Build the `role` elements of a contributor.
///
/// Explicit roles win; editors without any get the reviewing editor role.
pub fn role_elements(contributor: &Contributor) -> Vec<Element> {
    if !contributor.roles.is_empty() {
        return contributor
            .roles
            .iter()
            .map(|role| {
                let mut element = Element::new("role").text(role.text.as_str());
                if let Some(specific_use) = &role.specific_use {
                    element.set_attr("specific-use", specific_use.as_str());
                }
                element
            })
            .collect();
    }
    if contributor.is_editor() {
        return vec![Element::new("role").text(REVIEWING_EDITOR_ROLE)];
    }
    Vec::new()
}

/// Strip any orcid.org URI prefix, leaving the bare identifier.
pub fn normalize_orcid(orcid: &str) -> &str {
    let orcid = orcid.trim();
    ["https://orcid.org/", "http://orcid.org/"]
        .iter()
        .find_map(|prefix| orcid.strip_prefix(prefix))
        .unwrap_or(orcid)
}

/// Build the ORCID `contrib-id`, if the contributor has one.
pub fn orcid_element(contributor: &Contributor) -> Option<Element> {
    let orcid = contributor
        .orcid
        .as_deref()
        .map(normalize_orcid)
        .filter(|orcid| !orcid.is_empty())?;
    let mut element = Element::new("contrib-id");
    if contributor.orcid_authenticated {
        element.set_attr("authenticated", "true");
    }
    element.set_attr("contrib-id-type", "orcid");
    element.push_text(format!("{ORCID_URI}{orcid}"));
    Some(element)
}

/// Build a `contrib` element.
pub fn contrib_element(
    contributor: &Contributor,
    links: &ContribLinks,
    options: &BuildOptions,
) -> Element {
    let mut contrib = Element::new("contrib").attr("contrib-type", contributor.contrib_type.as_str());
    if contributor.corresp {
        contrib.set_attr("corresp", "yes");
    }
    if contributor.equal_contrib {
        contrib.set_attr("equal_contrib", "yes");
    }
    if let Some(auth_id) = &contributor.auth_id {
        contrib.set_attr("id", format!("author-{auth_id}"));
    }

    contrib.push(name_element(contributor));
    for role in role_elements(contributor) {
        contrib.push(role);
    }
    if let Some(orcid) = orcid_element(contributor) {
        contrib.push(orcid);
    }

    if links.inline_affiliations {
        for affiliation in &contributor.affiliations {
            contrib.push(aff_element(affiliation, None, contributor.is_editor(), options));
        }
    } else {
        for aff_id in &links.aff_ids {
            contrib.push(xref("aff", format!("aff{aff_id}")).text(aff_id.to_string()));
        }
    }

    if let Some(corresp_id) = links.corresp_id {
        contrib.push(xref("corresp", format!("cor{corresp_id}")).text("*"));
    }
    for award_id in &links.award_ids {
        contrib.push(xref("other", award_id.as_str()));
    }
    for conflict_id in &links.conflict_ids {
        contrib.push(xref("fn", format!("conf{conflict_id}")));
    }

    contrib
}

fn xref(ref_type: &str, rid: impl Into<String>) -> Element {
    Element::new("xref").attr("ref-type", ref_type).attr("rid", rid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jatsgen_core::{AUTHOR, Affiliation, EDITOR, Role};
    use jatsgen_xml::to_string;
    use pretty_assertions::assert_eq;

    fn render(element: &Element) -> String {
        to_string(element).unwrap()
    }

    #[test]
    fn test_name_variants() {
        let person = Contributor::person(AUTHOR, "Surname", "Given");
        assert_eq!(
            render(&name_element(&person)),
            "<name><surname>Surname</surname><given-names>Given</given-names></name>"
        );

        let collab = Contributor::collab(AUTHOR, "Orgname");
        assert_eq!(render(&name_element(&collab)), "<collab>Orgname</collab>");

        let anonymous = Contributor::anonymous(AUTHOR);
        assert_eq!(render(&name_element(&anonymous)), "<anonymous/>");
    }

    #[test]
    fn test_name_suffix() {
        let name = PersonName {
            surname: "Davis".into(),
            given_names: Some("Sammy".into()),
            suffix: Some("Jr".into()),
        };
        assert_eq!(
            render(&person_name_element(&name)),
            "<name><surname>Davis</surname><given-names>Sammy</given-names><suffix>Jr</suffix></name>"
        );
    }

    #[test]
    fn test_roles() {
        let mut author = Contributor::person(AUTHOR, "Surname", "Given");
        assert!(role_elements(&author).is_empty());

        author.roles = vec![Role::new("Reviewer").with_specific_use("referee")];
        let roles: Vec<_> = role_elements(&author).iter().map(render).collect();
        assert_eq!(roles, vec!["<role specific-use=\"referee\">Reviewer</role>"]);

        let editor = Contributor::person(EDITOR, "Eisen", "Michael");
        let roles: Vec<_> = role_elements(&editor).iter().map(render).collect();
        assert_eq!(roles, vec!["<role>Reviewing editor</role>"]);

        let mut senior = Contributor::person(EDITOR, "Eisen", "Michael");
        senior.roles = vec![Role::new("Senior Editor")];
        let roles: Vec<_> = role_elements(&senior).iter().map(render).collect();
        assert_eq!(roles, vec!["<role>Senior Editor</role>"]);
    }

    #[test]
    fn test_orcid() {
        let mut contributor = Contributor::person(AUTHOR, "Surname", "Given");
        assert!(orcid_element(&contributor).is_none());

        contributor.orcid = Some("0000-00000-0000-0000".into());
        assert_eq!(
            render(&orcid_element(&contributor).unwrap()),
            "<contrib-id contrib-id-type=\"orcid\">http://orcid.org/0000-00000-0000-0000</contrib-id>"
        );

        contributor.orcid = Some("https://orcid.org/0000-00000-0000-0000".into());
        contributor.orcid_authenticated = true;
        assert_eq!(
            render(&orcid_element(&contributor).unwrap()),
            "<contrib-id authenticated=\"true\" contrib-id-type=\"orcid\">\
             http://orcid.org/0000-00000-0000-0000</contrib-id>"
        );
    }

    #[test]
    fn test_contrib_with_links() {
        let mut contributor = Contributor::person(AUTHOR, "Schuman", "Erin");
        contributor.corresp = true;
        contributor.equal_contrib = true;
        contributor.auth_id = Some("1399".into());
        let links = ContribLinks {
            aff_ids: vec![1, 2],
            corresp_id: Some(1),
            award_ids: vec!["par-1".into()],
            conflict_ids: vec![2],
            ..ContribLinks::default()
        };
        let xml = render(&contrib_element(&contributor, &links, &BuildOptions::default()));
        assert_eq!(
            xml,
            "<contrib contrib-type=\"author\" corresp=\"yes\" equal_contrib=\"yes\" id=\"author-1399\">\
             <name><surname>Schuman</surname><given-names>Erin</given-names></name>\
             <xref ref-type=\"aff\" rid=\"aff1\">1</xref>\
             <xref ref-type=\"aff\" rid=\"aff2\">2</xref>\
             <xref ref-type=\"corresp\" rid=\"cor1\">*</xref>\
             <xref ref-type=\"other\" rid=\"par-1\"/>\
             <xref ref-type=\"fn\" rid=\"conf2\"/>\
             </contrib>"
        );
    }

    #[test]
    fn test_contrib_inline_affiliations() {
        let mut editor = Contributor::person(EDITOR, "Eisen", "Michael");
        editor.affiliations = vec![Affiliation {
            department: Some("Department of Molecular and Cell Biology".into()),
            institution: Some("University of California, Berkeley".into()),
            ..Affiliation::default()
        }];
        let links = ContribLinks {
            inline_affiliations: true,
            ..ContribLinks::default()
        };
        let xml = render(&contrib_element(&editor, &links, &BuildOptions::default()));
        assert!(xml.contains("<role>Reviewing editor</role>"));
        assert!(xml.contains("<aff><institution>University of California, Berkeley</institution></aff>"));
        assert!(!xml.contains("xref"));
    }
}
