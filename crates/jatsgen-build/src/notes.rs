//! Author notes and back matter footnote groups.

use jatsgen_core::{Article, Contributor};
use jatsgen_xml::{Element, reinject};

use crate::{BuildContext, BuildError, DEFAULT_CONFLICT_ID};

/// Default statement used once some authors declared their own interests.
pub const OTHER_AUTHORS_NO_CONFLICT: &str =
    "The other authors declare that no competing interests exist.";

/// Build a `corresp` note.
///
/// The email is the first one found among the contributor's
/// affiliations; without one the note carries only its label. Initials
/// follow the email when the contributor has any.
pub fn corresp_element(contributor: &Contributor, id: u32) -> Element {
    let mut corresp = Element::new("corresp").attr("id", format!("cor{id}"));
    corresp.text_element("label", "*");
    if let Some(email) = contributor.first_email() {
        corresp.push_text("For correspondence: ");
        corresp.text_element("email", email);
        let initials = contributor.initials();
        if initials.is_empty() {
            corresp.push_text(";");
        } else {
            corresp.push_text(format!(" ({initials});"));
        }
    }
    corresp
}

/// Build `author-notes`, if any contributor is corresponding.
pub fn author_notes_element(article: &Article, context: &BuildContext) -> Option<Element> {
    let notes: Vec<_> = article
        .contributors
        .iter()
        .enumerate()
        .filter_map(|(index, contributor)| {
            context
                .corresp_id(index)
                .map(|id| corresp_element(contributor, id))
        })
        .collect();
    if notes.is_empty() {
        return None;
    }
    let mut author_notes = Element::new("author-notes");
    for note in notes {
        author_notes.push(note);
    }
    Some(author_notes)
}

/// Build the competing interest `fn-group`, if any contributor declared
/// an interest or a default statement exists.
pub fn competing_interest_element(
    article: &Article,
    context: &BuildContext,
) -> Result<Option<Element>, BuildError> {
    let has_personal = article.has_contributor_conflict();
    if !has_personal && article.conflict_default.is_none() {
        return Ok(None);
    }

    let mut group = Element::new("fn-group").attr("content-type", "competing-interest");
    group.text_element("title", "Competing interest");

    for (index, contributor) in article.contributors.iter().enumerate() {
        for (statement, id) in contributor.conflict.iter().zip(context.conflict_ids(index)) {
            let text = format!("{}, {statement}.", contributor.full_name());
            let note = group.push(conflict_fn(*id));
            reinject(note, "p", &text)?;
        }
    }

    if let Some(default) = &article.conflict_default {
        let text = if has_personal {
            OTHER_AUTHORS_NO_CONFLICT
        } else {
            default.as_str()
        };
        let note = group.push(conflict_fn(DEFAULT_CONFLICT_ID));
        reinject(note, "p", text)?;
    }

    Ok(Some(group))
}

fn conflict_fn(id: u32) -> Element {
    Element::new("fn")
        .attr("fn-type", "conflict")
        .attr("id", format!("conf{id}"))
}

/// Build the ethics `fn-group`, if the article has ethics statements.
pub fn ethics_element(article: &Article) -> Result<Option<Element>, BuildError> {
    if article.ethics.is_empty() {
        return Ok(None);
    }
    let mut group = Element::new("fn-group").attr("content-type", "ethics-information");
    group.text_element("title", "Ethics");
    for statement in &article.ethics {
        let note = group.sub_element("fn");
        note.set_attr("fn-type", "other");
        reinject(note, "p", statement)?;
    }
    Ok(Some(group))
}
