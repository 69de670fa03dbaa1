
use std::num::NonZeroUsize;

use crate::{
    mv::MotionVector,
    params::{BlockFlags, Subpel},
};

/// The match chosen for one block of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMotion {
    /// Top-left corner of the block in the current frame.
    pub block_x: usize,
    pub block_y: usize,
    /// Smaller than the block size only for clipped edge blocks.
    pub width: usize,
    pub height: usize,
    /// In units of `1 / pel` pixels.
    pub vector: MotionVector,
    pub cost: u64,
    /// Index into the reference frames the estimator was configured with.
    pub reference_index: usize,
    pub flags: BlockFlags,
}

/// Result of one estimation call: one entry per retained block, in raster
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionField {
    entries: Vec<BlockMotion>,
    block_size: NonZeroUsize,
    blocks_x: usize,
    blocks_y: usize,
    pel: Subpel,
}

impl MotionField {
    pub(crate) fn new(
        entries: Vec<BlockMotion>,
        block_size: NonZeroUsize,
        blocks_x: usize,
        blocks_y: usize,
        pel: Subpel,
    ) -> Self {
        debug_assert!(entries.is_sorted_by_key(|e| (e.block_y, e.block_x)));
        MotionField {
            entries,
            block_size,
            blocks_x,
            blocks_y,
            pel,
        }
    }

    #[must_use]
    pub fn block_size(&self) -> NonZeroUsize {
        self.block_size
    }

    /// Number of block columns of the grid, including omitted blocks.
    #[must_use]
    pub fn blocks_x(&self) -> usize {
        self.blocks_x
    }

    /// Number of block rows of the grid, including omitted blocks.
    #[must_use]
    pub fn blocks_y(&self) -> usize {
        self.blocks_y
    }

    #[must_use]
    pub fn pel(&self) -> Subpel {
        self.pel
    }

    #[must_use]
    pub fn entries(&self) -> &[BlockMotion] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockMotion> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry of the block in grid column `col` and row `row`, or `None`
    /// if that block was omitted or lies outside the grid.
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<&BlockMotion> {
        if col >= self.blocks_x || row >= self.blocks_y {
            return None;
        }
        let key = (row * self.block_size.get(), col * self.block_size.get());
        self.entries
            .binary_search_by_key(&key, |e| (e.block_y, e.block_x))
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Sum of the costs of all entries.
    #[must_use]
    pub fn total_cost(&self) -> u64 {
        self.entries.iter().map(|e| e.cost).sum()
    }
}

impl<'a> IntoIterator for &'a MotionField {
    type Item = &'a BlockMotion;
    type IntoIter = std::slice::Iter<'a, BlockMotion>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for MotionField {
    type Item = BlockMotion;
    type IntoIter = std::vec::IntoIter<BlockMotion>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
