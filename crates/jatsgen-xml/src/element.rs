//! Element tree with mixed content.

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An XML element.
///
/// Text that follows a child element (its "tail") is simply the next
/// `XmlNode::Text` in `children`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, including any namespace prefix.
    pub name: String,
    /// Attributes in insertion order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Add text content.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Add a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Set an attribute, replacing an existing value with the same key.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Get an attribute value.
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Remove an attribute and return its value.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(index).1)
    }

    /// Append a child element and return a reference to it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(XmlNode::Element(child));
        match self.children.last_mut() {
            Some(XmlNode::Element(element)) => element,
            _ => unreachable!("an element was just pushed"),
        }
    }

    /// Append an empty child element and return a reference to it.
    pub fn sub_element(&mut self, name: impl Into<String>) -> &mut Element {
        self.push(Element::new(name))
    }

    /// Append a child element holding only text.
    pub fn text_element(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut Element {
        self.push(Element::new(name).text(text))
    }

    /// Append text, merging with a directly preceding text node.
    ///
    /// Empty strings are ignored.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.children.last_mut() {
            Some(XmlNode::Text(existing)) => existing.push_str(&text),
            _ => self.children.push(XmlNode::Text(text)),
        }
    }

    /// Append a comment.
    pub fn push_comment(&mut self, comment: impl Into<String>) {
        self.children.push(XmlNode::Comment(comment.into()));
    }

    /// Whether the element has no children at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    /// All child elements with the given name.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// First element with the given name anywhere below this one,
    /// depth first.
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.elements()
            .find_map(|e| if e.name == name { Some(e) } else { e.find_descendant(name) })
    }

    /// Concatenated text of this element and all descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for child in &element.children {
        match child {
            XmlNode::Text(text) => out.push_str(text),
            XmlNode::Element(e) => collect_text(e, out),
            XmlNode::Comment(_) => {}
        }
    }
}
