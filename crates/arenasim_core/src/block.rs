//! # Blocks
//!
//! A block is a contiguous region of the arena, either free or used. Blocks
//! have no identity of their own: splitting, merging or flipping state
//! destroys the old block and creates a new one.

use serde::{Deserialize, Serialize};

use crate::word::Word;

/// Whether a block is available for placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    /// Available to `allocate`.
    Free,
    /// Handed out to a caller.
    Used,
}

impl BlockState {
    /// Returns `true` for [`BlockState::Free`].
    #[inline]
    #[must_use]
    pub const fn is_free(self) -> bool {
        matches!(self, Self::Free)
    }
}

/// A block as seen from outside the strategy.
///
/// `address` is where the block's footprint starts (its header, if the
/// strategy has one). `size` counts usable units only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block<W: Word> {
    /// First unit of the footprint.
    pub address: W,
    /// Usable units.
    pub size: W,
    /// Free or used.
    pub state: BlockState,
}

impl<W: Word> Block<W> {
    /// Creates a block.
    #[inline]
    #[must_use]
    pub const fn new(address: W, size: W, state: BlockState) -> Self {
        Self {
            address,
            size,
            state,
        }
    }

    /// Units covered by header, usable region and footer together.
    #[inline]
    #[must_use]
    pub fn footprint(&self, overhead: W) -> W {
        self.size + overhead
    }

    /// One past the last unit of the footprint.
    #[inline]
    #[must_use]
    pub fn end(&self, overhead: W) -> W {
        self.address + self.footprint(overhead)
    }

    /// The usable region, given the strategy's header width.
    #[inline]
    #[must_use]
    pub fn usable(&self, header_width: W) -> Span<W> {
        let start = self.address + header_width;
        Span::new(start, start + self.size)
    }
}

/// A half-open address range `[start, end)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span<W: Word> {
    /// First address in the range.
    pub start: W,
    /// One past the last address.
    pub end: W,
}

impl<W: Word> Span<W> {
    /// Creates a span.
    #[inline]
    #[must_use]
    pub const fn new(start: W, end: W) -> Self {
        Self { start, end }
    }

    /// The empty span at address zero.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            start: W::ZERO,
            end: W::ZERO,
        }
    }

    /// Whether `address` lies inside the span.
    #[inline]
    #[must_use]
    pub fn contains(&self, address: W) -> bool {
        self.start <= address && address < self.end
    }

    /// Whether the span covers no address.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_geometry() {
        let block = Block::new(10u8, 2, BlockState::Used);
        assert_eq!(block.footprint(3), 5);
        assert_eq!(block.end(3), 15);
        assert_eq!(block.usable(2), Span::new(12, 14));
    }

    #[test]
    fn test_span_contains_is_half_open() {
        let span = Span::new(2u8, 9);
        assert!(span.contains(2));
        assert!(span.contains(8));
        assert!(!span.contains(9));
        assert!(Span::<u8>::empty().is_empty());
    }
}
