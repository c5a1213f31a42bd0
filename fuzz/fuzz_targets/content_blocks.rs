#![no_main]

use arbitrary::Arbitrary;
use jatsgen_build::{BuildError, set_content_blocks};
use jatsgen_core::ContentBlock;
use jatsgen_xml::Element;
use libfuzzer_sys::fuzz_target;

const MAX_DEPTH: usize = 3;

#[derive(Debug, Arbitrary)]
struct Block {
    block_type: String,
    content: String,
    attributes: Vec<(String, String)>,
    children: Vec<Block>,
}

impl Block {
    fn into_content_block(self) -> ContentBlock {
        let mut block = ContentBlock::new(self.block_type, self.content);
        for (key, value) in self.attributes {
            block = block.attr(key, value);
        }
        block.children(self.children.into_iter().map(Block::into_content_block))
    }
}

fuzz_target!(|blocks: Vec<Block>| {
    let blocks: Vec<_> = blocks.into_iter().map(Block::into_content_block).collect();
    let deepest = blocks.iter().map(ContentBlock::depth).max().unwrap_or(0);

    let mut body = Element::new("body");
    match set_content_blocks(&mut body, &blocks, MAX_DEPTH) {
        Ok(()) => {
            let _ = jatsgen_xml::to_string(&body);
        }
        Err(BuildError::DepthExceeded { max }) => {
            assert_eq!(max, MAX_DEPTH);
            assert!(deepest > MAX_DEPTH);
        }
        Err(_) => {}
    }
});
