//! Content blocks - the recursive body content of an article.

use std::collections::BTreeMap;

/// A block of body content.
///
/// `content` may carry whitelisted inline markup. Child blocks are rendered
/// inside this block, after its content.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ContentBlock {
    /// Block type, spelled as its JATS tag name (e.g. "p", "fig").
    pub block_type: String,
    pub content: String,
    pub attributes: BTreeMap<String, String>,
    pub content_blocks: Vec<ContentBlock>,
}

/// The block kinds that can be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Figure,
    Table,
    Quote,
    List,
    Media,
    Formula,
}

impl BlockKind {
    /// All renderable kinds.
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Paragraph,
        BlockKind::Figure,
        BlockKind::Table,
        BlockKind::Quote,
        BlockKind::List,
        BlockKind::Media,
        BlockKind::Formula,
    ];

    /// Look up a kind by its tag name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag_name() == tag)
    }

    /// The JATS tag name for this kind.
    pub fn tag_name(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Figure => "fig",
            BlockKind::Table => "table-wrap",
            BlockKind::Quote => "disp-quote",
            BlockKind::List => "list",
            BlockKind::Media => "media",
            BlockKind::Formula => "disp-formula",
        }
    }
}

impl ContentBlock {
    /// Create a block of the given type.
    pub fn new(block_type: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            block_type: block_type.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a child block.
    pub fn child(mut self, child: ContentBlock) -> Self {
        self.content_blocks.push(child);
        self
    }

    /// Add multiple child blocks.
    pub fn children(mut self, children: impl IntoIterator<Item = ContentBlock>) -> Self {
        self.content_blocks.extend(children);
        self
    }

    /// The renderable kind, if the block type is one.
    pub fn kind(&self) -> Option<BlockKind> {
        BlockKind::from_tag(&self.block_type)
    }

    /// Nesting depth of this block, counting itself as level 1.
    pub fn depth(&self) -> usize {
        1 + self
            .content_blocks
            .iter()
            .map(ContentBlock::depth)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_lookup() {
        assert_eq!(ContentBlock::new("p", "").kind(), Some(BlockKind::Paragraph));
        assert_eq!(
            ContentBlock::new("table-wrap", "").kind(),
            Some(BlockKind::Table)
        );
        assert_eq!(ContentBlock::new("script", "").kind(), None);
    }

    #[test]
    fn test_tag_names_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_tag(kind.tag_name()), Some(kind));
        }
    }

    #[test]
    fn test_depth() {
        let block = ContentBlock::new("p", "one")
            .child(ContentBlock::new("p", "two").child(ContentBlock::new("p", "three")))
            .child(ContentBlock::new("p", "two again"));
        assert_eq!(block.depth(), 3);
        assert_eq!(ContentBlock::new("p", "").depth(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_block_tree() {
        let block: ContentBlock = serde_json::from_str(
            r#"{
                "block_type": "p",
                "content": "First level paragraph.",
                "content_blocks": [
                    {"block_type": "p", "attributes": {"type": "empty"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(block.content_blocks[0].content, "");
        assert_eq!(
            block.content_blocks[0].attributes.get("type").map(String::as_str),
            Some("empty")
        );
    }
}
