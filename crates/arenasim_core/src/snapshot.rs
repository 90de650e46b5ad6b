//! # Snapshots
//!
//! Read-only views of an arena, taken after each operation. They carry
//! everything a renderer needs and nothing that would let it mutate the
//! strategy.

use crate::block::{BlockState, Span};
use crate::word::Word;

/// Classification of a single usable unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Not handed out.
    Free,
    /// Part of a used block.
    Used,
}

impl From<BlockState> for CellState {
    fn from(state: BlockState) -> Self {
        match state {
            BlockState::Free => Self::Free,
            BlockState::Used => Self::Used,
        }
    }
}

/// One boundary-tagged block, as read back from the arena bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedBlock<W: Word> {
    /// Header address.
    pub address: W,
    /// Leading size field.
    pub size: W,
    /// Decoded flag field.
    pub state: BlockState,
    /// One entry per usable unit.
    pub usable: Vec<CellState>,
    /// Trailing size field (the footer).
    pub trailing_size: W,
}

/// Strategy-specific arena layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Layout<W: Word> {
    /// Per-address classification, used by strategies with side tables.
    Cells {
        /// One entry per arena unit.
        cells: Vec<CellState>,
        /// Number of free blocks.
        free_blocks: usize,
        /// Number of used blocks.
        used_blocks: usize,
    },
    /// Ordered headers/usable/footers, used by the boundary-tag strategy.
    Tagged(Vec<TaggedBlock<W>>),
}

/// A view of the arena after the most recent operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot<W: Word> {
    /// Strategy name.
    pub strategy: &'static str,
    /// Arena capacity.
    pub capacity: W,
    /// Range touched by the last successful mutating call.
    pub touched: Span<W>,
    /// The arena contents.
    pub layout: Layout<W>,
}

impl<W: Word> Snapshot<W> {
    /// Number of free blocks.
    #[must_use]
    pub fn free_blocks(&self) -> usize {
        match &self.layout {
            Layout::Cells { free_blocks, .. } => *free_blocks,
            Layout::Tagged(blocks) => blocks.iter().filter(|b| b.state.is_free()).count(),
        }
    }

    /// Number of used blocks.
    #[must_use]
    pub fn used_blocks(&self) -> usize {
        match &self.layout {
            Layout::Cells { used_blocks, .. } => *used_blocks,
            Layout::Tagged(blocks) => blocks.iter().filter(|b| !b.state.is_free()).count(),
        }
    }

    /// Number of units classified as used.
    #[must_use]
    pub fn used_units(&self) -> usize {
        let count = |cells: &[CellState]| cells.iter().filter(|&&c| c == CellState::Used).count();
        match &self.layout {
            Layout::Cells { cells, .. } => count(cells),
            Layout::Tagged(blocks) => blocks.iter().map(|b| count(&b.usable)).sum(),
        }
    }
}
