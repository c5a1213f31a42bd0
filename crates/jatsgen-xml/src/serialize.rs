//! Terminal serialization of an element tree.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::{Element, XmlNode, find_illegal_char};

/// Error during serialization.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("character {character:?} in <{element}> is not allowed in XML")]
    IllegalChar { element: String, character: char },
}

/// A document type declaration with public and system identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub name: String,
    pub public_id: String,
    pub system_id: String,
}

/// Options for [`to_bytes`].
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Write the `<?xml ...?>` declaration.
    pub declaration: bool,
    pub doctype: Option<Doctype>,
    /// Indent nested elements.
    pub pretty: bool,
    pub indent_char: u8,
    pub indent_size: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            declaration: true,
            doctype: None,
            pretty: false,
            indent_char: b'\t',
            indent_size: 1,
        }
    }
}

/// Serialize a tree to UTF-8 bytes.
///
/// Compact and pretty output differ only in whitespace between tags.
/// Elements holding text are written inline even when pretty, so
/// indentation never changes their content. Text, attribute values and
/// comments carrying characters XML 1.0 forbids are an error.
pub fn to_bytes(root: &Element, options: &SerializeOptions) -> Result<Vec<u8>, EmitError> {
    let mut writer = if options.pretty {
        Writer::new_with_indent(
            Cursor::new(Vec::new()),
            options.indent_char,
            options.indent_size,
        )
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    if options.declaration {
        write(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)),
        )?;
    }

    if let Some(doctype) = &options.doctype {
        let declaration = format!(
            r#"{} PUBLIC "{}" "{}""#,
            doctype.name, doctype.public_id, doctype.system_id
        );
        write(
            &mut writer,
            Event::DocType(BytesText::from_escaped(declaration)),
        )?;
    }

    write_element(&mut writer, root, options.pretty)?;

    Ok(writer.into_inner().into_inner())
}

/// Serialize a single element compactly, without a declaration.
pub fn to_string(element: &Element) -> Result<String, EmitError> {
    let options = SerializeOptions {
        declaration: false,
        ..SerializeOptions::default()
    };
    Ok(String::from_utf8(to_bytes(element, &options)?)?)
}

fn write(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), EmitError> {
    writer
        .write_event(event)
        .map_err(|e| EmitError::Io(std::io::Error::other(format!("XML error: {}", e))))
}

fn write_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    element: &Element,
    pretty: bool,
) -> Result<(), EmitError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        check_chars(element, value)?;
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    let mixed = element
        .children
        .iter()
        .any(|child| matches!(child, XmlNode::Text(_)));
    if pretty && mixed {
        let mut inline = Writer::new(Cursor::new(Vec::new()));
        for child in &element.children {
            write_node(&mut inline, element, child, false)?;
        }
        let content = String::from_utf8(inline.into_inner().into_inner())?;
        write(writer, Event::Text(BytesText::from_escaped(content)))?;
    } else {
        for child in &element.children {
            write_node(writer, element, child, pretty)?;
        }
    }
    write(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_node(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    parent: &Element,
    node: &XmlNode,
    pretty: bool,
) -> Result<(), EmitError> {
    match node {
        XmlNode::Element(e) => write_element(writer, e, pretty),
        XmlNode::Text(text) => {
            check_chars(parent, text)?;
            write(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))
        }
        XmlNode::Comment(comment) => {
            check_chars(parent, comment)?;
            // "--" may not appear inside a comment, nor may it end in "-"
            let mut comment = comment.clone();
            while comment.contains("--") {
                comment = comment.replace("--", "- -");
            }
            if comment.ends_with('-') {
                comment.push(' ');
            }
            write(writer, Event::Comment(BytesText::from_escaped(comment)))
        }
    }
}

fn check_chars(element: &Element, text: &str) -> Result<(), EmitError> {
    match find_illegal_char(text) {
        Some(character) => Err(EmitError::IllegalChar {
            element: element.name.clone(),
            character,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Element {
        Element::new("root")
            .attr("xmlns:xlink", crate::XLINK_NS)
            .child(
                Element::new("p")
                    .text("Schuman & Barthel ")
                    .child(Element::new("italic").text("in vivo"))
                    .text(" <done>"),
            )
            .child(Element::new("break").attr("type", "x\"y"))
    }

    #[test]
    fn test_compact_output() {
        let xml = to_string(&sample()).unwrap();
        assert_eq!(
            xml,
            "<root xmlns:xlink=\"http://www.w3.org/1999/xlink\">\
             <p>Schuman &amp; Barthel <italic>in vivo</italic> &lt;done&gt;</p>\
             <break type=\"x&quot;y\"/></root>"
        );
    }

    #[test]
    fn test_apostrophes_stay_literal_in_text() {
        let xml = to_string(&Element::new("surname").text("O'Brien")).unwrap();
        assert_eq!(xml, "<surname>O'Brien</surname>");
    }

    #[test]
    fn test_declaration_and_doctype() {
        let options = SerializeOptions {
            doctype: Some(Doctype {
                name: "article".into(),
                public_id: "-//TEST//DTD//EN".into(),
                system_id: "test.dtd".into(),
            }),
            ..SerializeOptions::default()
        };
        let xml = String::from_utf8(to_bytes(&Element::new("article"), &options).unwrap()).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
             <!DOCTYPE article PUBLIC \"-//TEST//DTD//EN\" \"test.dtd\"><article/>"
        );
    }

    #[test]
    fn test_pretty_differs_only_in_whitespace() {
        let compact = to_string(&sample()).unwrap();
        let options = SerializeOptions {
            declaration: false,
            pretty: true,
            ..SerializeOptions::default()
        };
        let pretty = String::from_utf8(to_bytes(&sample(), &options).unwrap()).unwrap();
        assert_ne!(compact, pretty);

        assert!(pretty.contains("\n\t<p>Schuman &amp; Barthel <italic>in vivo</italic> &lt;done&gt;</p>\n"));
        assert_eq!(pretty.replace("\n\t", "").replace('\n', ""), compact);
    }

    #[test]
    fn test_pretty_keeps_mixed_content_inline() {
        let root = Element::new("title-group").child(
            Element::new("article-title")
                .child(Element::new("italic").text("A"))
                .child(Element::new("bold").text("B"))
                .text(" tail"),
        );
        let options = SerializeOptions {
            declaration: false,
            pretty: true,
            ..SerializeOptions::default()
        };
        let pretty = String::from_utf8(to_bytes(&root, &options).unwrap()).unwrap();
        assert_eq!(
            pretty,
            "<title-group>\n\t<article-title><italic>A</italic><bold>B</bold> tail</article-title>\n</title-group>"
        );
    }

    #[test]
    fn test_illegal_characters_are_an_error() {
        let err = to_string(&Element::new("surname").text("a\u{1}b")).unwrap_err();
        assert!(
            matches!(err, EmitError::IllegalChar { ref element, character: '\u{1}' } if element == "surname")
        );
        assert!(to_string(&Element::new("xref").attr("rid", "x\u{c}")).is_err());
        let mut root = Element::new("article");
        root.push_comment("bad\u{0}");
        assert!(to_string(&root).is_err());
        assert!(to_string(&Element::new("p").text("tab\tnewline\n")).is_ok());
    }

    #[test]
    fn test_comment_is_sanitized() {
        let mut root = Element::new("article");
        root.push_comment("generated by a--b");
        assert_eq!(
            to_string(&root).unwrap(),
            "<article><!--generated by a- -b--></article>"
        );
    }
}
