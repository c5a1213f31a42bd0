//! Affiliation builder.

use jatsgen_core::Affiliation;
use jatsgen_xml::Element;

use crate::BuildOptions;

/// Build an `aff` element.
///
/// A text-only affiliation renders its text and nothing else. Otherwise
/// the parts are rendered in order (ROR id, department, institution,
/// city, country, phone, fax) with `options.aff_separator` between the
/// address parts. Departments are left out for editors.
pub fn aff_element(
    affiliation: &Affiliation,
    id: Option<&str>,
    editor: bool,
    options: &BuildOptions,
) -> Element {
    let mut aff = Element::new("aff");
    if let Some(id) = id {
        aff.set_attr("id", id);
    }

    if affiliation.is_text_only() {
        if let Some(text) = &affiliation.text {
            aff.push_text(text.as_str());
        }
        return aff;
    }

    let separator = options.aff_separator.as_str();
    let mut parts = Parts::new(separator);

    let ror = present(&affiliation.ror);
    let department = present(&affiliation.department).filter(|_| !editor);
    let institution = present(&affiliation.institution);

    if ror.is_some() || options.institution_wrap {
        let mut wrap = Element::new("institution-wrap");
        if let Some(ror) = ror {
            wrap.text_element("institution-id", ror)
                .set_attr("institution-id-type", "ror");
        }
        let mut inner = Parts::new(separator);
        if let Some(department) = department {
            inner.push(&mut wrap, dept_element(department));
        }
        if let Some(institution) = institution {
            inner.push(&mut wrap, Element::new("institution").text(institution));
        }
        if !wrap.is_empty() {
            parts.push(&mut aff, wrap);
        }
    } else {
        if let Some(department) = department {
            parts.push(&mut aff, dept_element(department));
        }
        if let Some(institution) = institution {
            parts.push(&mut aff, Element::new("institution").text(institution));
        }
    }

    if let Some(city) = present(&affiliation.city) {
        let addr_line = Element::new("addr-line").child(
            Element::new("named-content")
                .attr("content-type", "city")
                .text(city),
        );
        parts.push(&mut aff, addr_line);
    }

    if let Some(country) = present(&affiliation.country) {
        parts.push(&mut aff, Element::new("country").text(country));
    }

    if let Some(phone) = present(&affiliation.phone) {
        aff.text_element("phone", phone);
    }
    if let Some(fax) = present(&affiliation.fax) {
        aff.text_element("fax", fax);
    }

    aff
}

fn dept_element(department: &str) -> Element {
    Element::new("institution")
        .attr("content-type", "dept")
        .text(department)
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Appends elements with a separator between consecutive ones.
struct Parts<'a> {
    separator: &'a str,
    started: bool,
}

impl<'a> Parts<'a> {
    fn new(separator: &'a str) -> Self {
        Self {
            separator,
            started: false,
        }
    }

    fn push(&mut self, parent: &mut Element, element: Element) {
        if self.started {
            parent.push_text(self.separator);
        }
        parent.push(element);
        self.started = true;
    }
}
