//! Element tree and XML plumbing for jatsgen.
//!
//! - [`Element`] is the in-memory tree the builders assemble.
//! - [`reinject`] turns free text carrying whitelisted inline tags into a
//!   safely embeddable subtree.
//! - [`to_bytes`] is the terminal serialization step.

mod element;
mod reinject;
mod serialize;

pub use element::*;
pub use reinject::*;
pub use serialize::*;

/// MathML namespace, bound to the `mml` prefix.
pub const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// XLink namespace, bound to the `xlink` prefix.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Namespace prefixes declared on the document root.
pub const DEFAULT_NAMESPACES: [(&str, &str); 2] = [("mml", MATHML_NS), ("xlink", XLINK_NS)];

/// Whether `c` may appear in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// First character of `text` that may not appear in an XML 1.0 document.
pub fn find_illegal_char(text: &str) -> Option<char> {
    text.chars().find(|c| !is_xml_char(*c))
}
