//! Content block rendering.

use jatsgen_core::{Article, ContentBlock};
use jatsgen_xml::{Element, ReinjectOptions, reinject_with};
use tracing::warn;

use crate::BuildError;

/// Render `blocks` into `parent`, top level blocks counting as level 1.
///
/// Blocks of an unknown type are skipped together with their children.
/// Nesting past `max_depth` fails with [`BuildError::DepthExceeded`].
pub fn set_content_blocks(
    parent: &mut Element,
    blocks: &[ContentBlock],
    max_depth: usize,
) -> Result<(), BuildError> {
    set_level(parent, blocks, 1, max_depth)
}

fn set_level(
    parent: &mut Element,
    blocks: &[ContentBlock],
    level: usize,
    max_depth: usize,
) -> Result<(), BuildError> {
    if blocks.is_empty() {
        return Ok(());
    }
    if level > max_depth {
        return Err(BuildError::DepthExceeded { max: max_depth });
    }
    for block in blocks {
        let Some(kind) = block.kind() else {
            // A skipped subtree still counts against the depth limit
            if level + block.depth() - 1 > max_depth {
                return Err(BuildError::DepthExceeded { max: max_depth });
            }
            warn!(block_type = %block.block_type, "skipping content block of unknown type");
            continue;
        };
        let options = ReinjectOptions {
            attributes: block
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            ..ReinjectOptions::default()
        };
        let element = reinject_with(parent, kind.tag_name(), &block.content, &options)?;
        set_level(element, &block.content_blocks, level + 1, max_depth)?;
    }
    Ok(())
}

/// Build `body`, if the article has content blocks.
pub fn body_element(article: &Article, max_depth: usize) -> Result<Option<Element>, BuildError> {
    if article.content_blocks.is_empty() {
        return Ok(None);
    }
    let mut body = Element::new("body");
    set_content_blocks(&mut body, &article.content_blocks, max_depth)?;
    Ok(Some(body))
}
