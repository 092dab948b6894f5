//! Block tree measurement for user-facing progress messages.

use super::Block;
use std::collections::BTreeMap;

/// Summary of a converted block sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStats {
    /// Blocks at the top of the sequence (what gets appended to the page)
    pub top_level: usize,
    /// All blocks, including list children and table rows
    pub total: usize,
    /// 1 for a flat sequence, 2 when any block has children, and so on
    pub deepest_nesting: usize,
    pub by_type: BTreeMap<&'static str, usize>,
}

/// Measures a block sequence recursively.
pub fn measure_blocks(blocks: &[Block]) -> BlockStats {
    let mut stats = BlockStats {
        top_level: blocks.len(),
        ..BlockStats::default()
    };
    walk(&mut stats, blocks, 1);
    stats
}

fn walk(stats: &mut BlockStats, blocks: &[Block], depth: usize) {
    if !blocks.is_empty() {
        stats.deepest_nesting = stats.deepest_nesting.max(depth);
    }
    for block in blocks {
        stats.total += 1;
        *stats.by_type.entry(block.block_type()).or_insert(0) += 1;
        walk(stats, block.children(), depth + 1);
    }
}
