//! Inline markup reinjection.
//!
//! Free-text fields (titles, abstracts, conflict statements, ...) may
//! already carry a small set of inline JATS tags such as `<italic>` or
//! `<inline-formula>`. Reinjection escapes everything else, wraps the text
//! in the target tag, parses the result as an XML fragment and grafts it
//! into the tree being built:
//!
//! 1. bare `&` not starting an entity become `&amp;`
//! 2. `<` and `>` not part of a whitelisted tag become `&lt;` / `&gt;`
//! 3. the text is wrapped in `<tag xmlns:..>` so prefixed tags resolve
//! 4. the fragment is parsed; malformed input is an error, never a
//!    partially grafted subtree

use std::borrow::Cow;
use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;

use crate::{DEFAULT_NAMESPACES, Element, find_illegal_char};

/// Tag names that pass through unescaped. Any `mml:` tag is also allowed.
pub const ALLOWED_TAGS: &[&str] = &[
    "bold",
    "break",
    "caption",
    "disp-formula",
    "disp-quote",
    "email",
    "ext-link",
    "graphic",
    "inline-formula",
    "inline-graphic",
    "italic",
    "label",
    "list",
    "list-item",
    "monospace",
    "named-content",
    "p",
    "sc",
    "strike",
    "sub",
    "sup",
    "table",
    "table-wrap",
    "tbody",
    "td",
    "tex-math",
    "th",
    "thead",
    "title",
    "tr",
    "underline",
    "uri",
    "xref",
];

const MATHML_PREFIX: &str = "mml:";

/// Deepest element nesting accepted inside one fragment, wrapper included.
pub const MAX_MARKUP_DEPTH: usize = 256;

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#[0-9]+|#[xX][0-9a-fA-F]+|lt|gt|amp|quot|apos);").expect("valid regex")
});

static TAG_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<>]*>").expect("valid regex"));

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</?([A-Za-z_][\w.\-]*(?::[A-Za-z_][\w.\-]*)?)(?:\s[^<>]*)?/?>$")
        .expect("valid regex")
});

/// Error turning a free-text field into an embeddable fragment.
#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("malformed markup in <{tag}>: {message}")]
    Malformed { tag: String, message: String },
    #[error("unbound namespace prefix `{prefix}` in <{tag}>")]
    UnboundPrefix { tag: String, prefix: String },
}

/// Options for [`reinject_with`].
#[derive(Debug, Clone)]
pub struct ReinjectOptions<'a> {
    /// Prefix declarations rendered on the wrapper while parsing.
    pub namespaces: &'a [(&'a str, &'a str)],
    /// Attributes set on the grafted wrapper element.
    pub attributes: Vec<(String, String)>,
    /// Raw attribute text placed inside the wrapper's start tag.
    pub attributes_text: Option<&'a str>,
}

impl Default for ReinjectOptions<'_> {
    fn default() -> Self {
        Self {
            namespaces: &DEFAULT_NAMESPACES,
            attributes: Vec::new(),
            attributes_text: None,
        }
    }
}

impl<'a> ReinjectOptions<'a> {
    /// Set an attribute on the wrapper element.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// Escape `&` characters that do not start a character or predefined
/// entity reference.
pub fn escape_ampersand(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for (i, piece) in text.split('&').enumerate() {
        if i > 0 {
            if ENTITY.is_match(piece) {
                escaped.push('&');
            } else {
                escaped.push_str("&amp;");
            }
        }
        escaped.push_str(piece);
    }
    Cow::Owned(escaped)
}

/// Escape angle brackets that do not belong to a whitelisted tag.
pub fn escape_unmatched_angle_brackets(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for tag in TAG_LIKE.find_iter(text) {
        escaped.push_str(&escape_brackets(&text[last..tag.start()]));
        if is_allowed_tag(tag.as_str()) {
            escaped.push_str(tag.as_str());
        } else {
            escaped.push_str(&escape_brackets(tag.as_str()));
        }
        last = tag.end();
    }
    escaped.push_str(&escape_brackets(&text[last..]));
    Cow::Owned(escaped)
}

/// Apply both escaping passes.
pub fn escape_markup(text: &str) -> String {
    let text = escape_ampersand(text);
    escape_unmatched_angle_brackets(&text).into_owned()
}

fn escape_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

fn is_allowed_tag(tag: &str) -> bool {
    TAG.captures(tag)
        .and_then(|caps| caps.get(1))
        .is_some_and(|name| {
            let name = name.as_str();
            ALLOWED_TAGS.contains(&name) || name.starts_with(MATHML_PREFIX)
        })
}

/// Build a `tag_name` element from text that may carry inline markup,
/// using the default namespaces.
pub fn markup_element(tag_name: &str, text: &str) -> Result<Element, MarkupError> {
    markup_element_with(tag_name, text, &ReinjectOptions::default())
}

/// Build a `tag_name` element from text that may carry inline markup.
pub fn markup_element_with(
    tag_name: &str,
    text: &str,
    options: &ReinjectOptions<'_>,
) -> Result<Element, MarkupError> {
    let mut source = format!("<{tag_name}");
    for (prefix, uri) in options.namespaces {
        source.push_str(&format!(r#" xmlns:{prefix}="{uri}""#));
    }
    if let Some(attributes) = options.attributes_text {
        source.push(' ');
        source.push_str(attributes);
    }
    source.push('>');
    source.push_str(&escape_markup(text));
    source.push_str(&format!("</{tag_name}>"));

    let mut element = parse_fragment(tag_name, &source, options.namespaces)?;
    for (prefix, _) in options.namespaces {
        element.remove_attr(&format!("xmlns:{prefix}"));
    }
    for (key, value) in &options.attributes {
        check_chars(tag_name, value)?;
        element.set_attr(key.as_str(), value.as_str());
    }
    Ok(element)
}

/// Reinject `text` as a new `tag_name` child of `parent`.
///
/// An empty string still produces an (empty) element.
pub fn reinject<'p>(
    parent: &'p mut Element,
    tag_name: &str,
    text: &str,
) -> Result<&'p mut Element, MarkupError> {
    reinject_with(parent, tag_name, text, &ReinjectOptions::default())
}

/// Reinject `text` as a new `tag_name` child of `parent` with options.
pub fn reinject_with<'p>(
    parent: &'p mut Element,
    tag_name: &str,
    text: &str,
    options: &ReinjectOptions<'_>,
) -> Result<&'p mut Element, MarkupError> {
    let element = markup_element_with(tag_name, text, options)?;
    Ok(parent.push(element))
}

/// Parse an escaped, wrapped fragment into a single element.
fn parse_fragment(
    tag: &str,
    source: &str,
    namespaces: &[(&str, &str)],
) -> Result<Element, MarkupError> {
    let malformed = |message: String| MarkupError::Malformed {
        tag: tag.to_string(),
        message,
    };

    let mut reader = Reader::from_str(source);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if stack.len() >= MAX_MARKUP_DEPTH {
                    return Err(malformed(format!(
                        "elements nested deeper than {MAX_MARKUP_DEPTH} levels"
                    )));
                }
                let element = start_element(tag, &e, &stack, namespaces)?;
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(tag, &e, &stack, namespaces)?;
                attach(tag, &mut stack, &mut root, element)?;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(format!("unexpected closing tag </{name}>")))?;
                if element.name != name {
                    return Err(malformed(format!(
                        "expected </{}>, found </{name}>",
                        element.name
                    )));
                }
                attach(tag, &mut stack, &mut root, element)?;
            }
            Ok(Event::Text(e)) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                let text = unescape(&raw).map_err(|err| malformed(err.to_string()))?;
                push_text(tag, &mut stack, &text)?;
            }
            Ok(Event::CData(e)) => {
                push_text(tag, &mut stack, &String::from_utf8_lossy(e.as_ref()))?;
            }
            Ok(Event::GeneralRef(e)) => {
                let name = String::from_utf8_lossy(&e);
                let reference = format!("&{name};");
                let text = unescape(&reference).map_err(|err| malformed(err.to_string()))?;
                push_text(tag, &mut stack, &text)?;
            }
            Ok(Event::Comment(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.push_comment(String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(e.to_string())),
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(format!("unclosed tag <{}>", open.name)));
    }
    root.ok_or_else(|| malformed("no element found".to_string()))
}

fn start_element(
    tag: &str,
    start: &BytesStart<'_>,
    ancestors: &[Element],
    namespaces: &[(&str, &str)],
) -> Result<Element, MarkupError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError::Malformed {
            tag: tag.to_string(),
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape(&raw).map_err(|e| MarkupError::Malformed {
            tag: tag.to_string(),
            message: e.to_string(),
        })?;
        check_chars(tag, &value)?;
        element.attributes.push((key, value.into_owned()));
    }

    let bound = |prefix: &str| {
        matches!(prefix, "xml" | "xmlns")
            || namespaces.iter().any(|(p, _)| *p == prefix)
            || declares(&element, prefix)
            || ancestors.iter().any(|a| declares(a, prefix))
    };
    let names =
        std::iter::once(element.name.as_str()).chain(element.attributes.iter().map(|(k, _)| k.as_str()));
    for name in names {
        if let Some((prefix, _)) = name.split_once(':')
            && !bound(prefix)
        {
            return Err(MarkupError::UnboundPrefix {
                tag: tag.to_string(),
                prefix: prefix.to_string(),
            });
        }
    }

    Ok(element)
}

fn declares(element: &Element, prefix: &str) -> bool {
    element
        .attributes
        .iter()
        .any(|(k, _)| k.strip_prefix("xmlns:") == Some(prefix))
}

fn attach(
    tag: &str,
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), MarkupError> {
    if let Some(parent) = stack.last_mut() {
        parent.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(MarkupError::Malformed {
            tag: tag.to_string(),
            message: "content after the fragment's root element".to_string(),
        });
    }
    *root = Some(element);
    Ok(())
}

fn check_chars(tag: &str, text: &str) -> Result<(), MarkupError> {
    match find_illegal_char(text) {
        Some(c) => Err(MarkupError::Malformed {
            tag: tag.to_string(),
            message: format!("character U+{:04X} is not allowed in XML", u32::from(c)),
        }),
        None => Ok(()),
    }
}

fn push_text(tag: &str, stack: &mut [Element], text: &str) -> Result<(), MarkupError> {
    check_chars(tag, text)?;
    match stack.last_mut() {
        Some(top) => {
            top.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(MarkupError::Malformed {
            tag: tag.to_string(),
            message: "text outside the fragment's root element".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::to_string;
    use pretty_assertions::assert_eq;

    fn render(tag: &str, text: &str) -> String {
        to_string(&markup_element(tag, text).unwrap()).unwrap()
    }

    #[test]
    fn test_escape_ampersand() {
        assert_eq!(escape_ampersand("Schuman & Barthel"), "Schuman &amp; Barthel");
        assert_eq!(escape_ampersand("A &amp; B"), "A &amp; B");
        assert_eq!(escape_ampersand("&#x00E9;&#233;&lt;&gt;"), "&#x00E9;&#233;&lt;&gt;");
        assert_eq!(escape_ampersand("&nbsp;"), "&amp;nbsp;");
        assert_eq!(escape_ampersand("trailing &"), "trailing &amp;");
        assert!(matches!(escape_ampersand("no entities"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_unmatched_angle_brackets() {
        assert_eq!(
            escape_unmatched_angle_brackets("1 < 2 and <italic>x</italic> > 0"),
            "1 &lt; 2 and <italic>x</italic> &gt; 0"
        );
        assert_eq!(
            escape_unmatched_angle_brackets("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(
            escape_unmatched_angle_brackets(r#"<ext-link ext-link-type="uri">a</ext-link>"#),
            r#"<ext-link ext-link-type="uri">a</ext-link>"#
        );
        assert_eq!(escape_unmatched_angle_brackets("<break/>"), "<break/>");
        assert_eq!(escape_unmatched_angle_brackets("<mml:mi>x</mml:mi>"), "<mml:mi>x</mml:mi>");
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(render("article-title", "Title"), "<article-title>Title</article-title>");
    }

    #[test]
    fn test_empty_text_keeps_element() {
        assert_eq!(render("p", ""), "<p/>");
    }

    #[test]
    fn test_ampersands_escaped_once() {
        assert_eq!(
            render("p", "Schuman & Barthel &amp; co"),
            "<p>Schuman &amp; Barthel &amp; co</p>"
        );
    }

    #[test]
    fn test_character_references_resolve() {
        assert_eq!(render("p", "caf&#x00E9; &lt;3"), "<p>café &lt;3</p>");
    }

    #[test]
    fn test_inline_tags_preserved() {
        assert_eq!(
            render("p", "The <italic>C. elegans</italic> & <bold>fly</bold> genomes"),
            "<p>The <italic>C. elegans</italic> &amp; <bold>fly</bold> genomes</p>"
        );
    }

    #[test]
    fn test_unknown_tags_escaped() {
        assert_eq!(
            render("p", "<script>alert(1)</script> <i>x</i>"),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt; &lt;i&gt;x&lt;/i&gt;</p>"
        );
    }

    #[test]
    fn test_prefixed_markup_grafts_without_declarations() {
        let element = markup_element(
            "p",
            r#"<inline-formula><mml:math><mml:mi>x</mml:mi></mml:math></inline-formula> and <ext-link ext-link-type="uri" xlink:href="https://example.org">link</ext-link>"#,
        )
        .unwrap();
        assert!(element.attributes.is_empty());
        assert_eq!(
            to_string(&element).unwrap(),
            r#"<p><inline-formula><mml:math><mml:mi>x</mml:mi></mml:math></inline-formula> and <ext-link ext-link-type="uri" xlink:href="https://example.org">link</ext-link></p>"#
        );
    }

    #[test]
    fn test_unclosed_tag_is_an_error() {
        let err = markup_element("p", "<italic>unterminated").unwrap_err();
        assert!(matches!(err, MarkupError::Malformed { ref tag, .. } if tag == "p"));
    }

    #[test]
    fn test_misnested_tags_are_an_error() {
        assert!(markup_element("p", "<italic><bold>x</italic></bold>").is_err());
        assert!(markup_element("p", "stray </italic> close").is_err());
    }

    #[test]
    fn test_unbound_prefix_is_an_error() {
        let options = ReinjectOptions {
            namespaces: &[],
            ..ReinjectOptions::default()
        };
        let err = markup_element_with("p", "<mml:mi>x</mml:mi>", &options).unwrap_err();
        assert!(matches!(err, MarkupError::UnboundPrefix { ref prefix, .. } if prefix == "mml"));
    }

    #[test]
    fn test_attributes_applied_to_wrapper() {
        let options = ReinjectOptions {
            attributes_text: Some(r#"specific-use="print""#),
            ..ReinjectOptions::default()
        }
        .attr("content-type", "summary");
        let element = markup_element_with("p", "Text", &options).unwrap();
        assert_eq!(
            to_string(&element).unwrap(),
            r#"<p specific-use="print" content-type="summary">Text</p>"#
        );
    }

    #[test]
    fn test_reinject_grafts_into_parent() {
        let mut group = Element::new("title-group");
        reinject(&mut group, "article-title", "A <italic>B</italic>").unwrap();
        assert_eq!(
            to_string(&group).unwrap(),
            "<title-group><article-title>A <italic>B</italic></article-title></title-group>"
        );
    }

    #[test]
    fn test_control_characters_are_an_error() {
        let err = markup_element("article-title", "Form\u{c}feed title").unwrap_err();
        assert!(matches!(err, MarkupError::Malformed { ref tag, .. } if tag == "article-title"));
        assert!(markup_element("p", "start\u{1}end").is_err());
        assert!(markup_element("p", "by reference &#1;").is_err());
        assert!(markup_element("p", "<xref rid=\"a\u{b}\">x</xref>").is_err());
        let options = ReinjectOptions::default().attr("id", "bad\u{0}id");
        assert!(markup_element_with("p", "Text", &options).is_err());
    }

    #[test]
    fn test_whitespace_controls_are_allowed() {
        assert_eq!(render("p", "a\tb\nc"), "<p>a\tb\nc</p>");
    }

    #[test]
    fn test_nesting_limit() {
        let deep = |levels: usize| {
            format!("{}x{}", "<italic>".repeat(levels), "</italic>".repeat(levels))
        };
        let err = markup_element("p", &deep(300)).unwrap_err();
        assert!(matches!(err, MarkupError::Malformed { ref message, .. } if message.contains("nested")));
        let element = markup_element("p", &deep(MAX_MARKUP_DEPTH - 1)).unwrap();
        assert_eq!(element.text_content(), "x");
    }

    #[test]
    fn test_failed_reinject_leaves_parent_untouched() {
        let mut parent = Element::new("abstract");
        assert!(reinject(&mut parent, "p", "<bold>open").is_err());
        assert!(parent.is_empty());
    }
}
