//! # Linear Allocator
//!
//! A bump-pointer strategy. Allocation moves a pointer forward; nothing is
//! ever given back. It exists as the contrast case for the reclaiming
//! strategies.

use tracing::debug;

use crate::block::{Block, BlockState, Span};
use crate::error::{AllocError, AllocResult};
use crate::snapshot::{CellState, Layout, Snapshot};
use crate::strategy::{validate_capacity, validate_request, Strategy};
use crate::word::Word;

/// A bump allocator over `capacity` units.
///
/// ```text
///   ┌────┬────┬─────┬──────────────────────┐
///   │ A1 │ A2 │ A3  │      free space      │
///   └────┴────┴─────┴──────────────────────┘
///              ▲     ▲
///          previous  next
/// ```
#[derive(Clone, Debug)]
pub struct LinearAllocator<W: Word = u8> {
    /// Total capacity.
    capacity: W,
    /// Start of the most recent allocation.
    previous: W,
    /// Next address to hand out.
    next: W,
    /// Number of successful allocations.
    allocations: usize,
}

impl<W: Word> LinearAllocator<W> {
    /// Strategy name.
    pub const NAME: &'static str = "linear";

    /// Creates an initialised allocator.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidCapacity`] for an empty arena.
    pub fn new(capacity: W) -> AllocResult<Self> {
        let mut allocator = Self {
            capacity: W::ZERO,
            previous: W::ZERO,
            next: W::ZERO,
            allocations: 0,
        };
        allocator.init(capacity)?;
        Ok(allocator)
    }

    /// The next address `allocate` would return.
    #[inline]
    #[must_use]
    pub const fn next_free_address(&self) -> W {
        self.next
    }

    /// Number of successful allocations since `init`.
    #[inline]
    #[must_use]
    pub const fn allocations(&self) -> usize {
        self.allocations
    }
}

impl<W: Word> Strategy<W> for LinearAllocator<W> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, capacity: W) -> AllocResult<()> {
        validate_capacity(capacity, W::ONE)?;

        self.capacity = capacity;
        self.previous = W::ZERO;
        self.next = W::ZERO;
        self.allocations = 0;
        Ok(())
    }

    fn allocate(&mut self, size: W) -> AllocResult<W> {
        validate_request(size)?;

        if self.capacity - self.next < size {
            return Err(AllocError::OutOfMemory {
                requested: size.to_u64(),
            });
        }

        self.allocations += 1;
        self.previous = self.next;
        self.next = self.next + size;

        debug!(address = %self.previous, %size, "bumped");
        Ok(self.previous)
    }

    fn release(&mut self, _address: W) -> AllocResult<()> {
        Err(AllocError::UnsupportedOperation {
            strategy: Self::NAME,
            operation: "release",
        })
    }

    fn snapshot(&self) -> Snapshot<W> {
        let used = self.next.to_usize();
        let cells = (0..self.capacity.to_usize())
            .map(|address| {
                if address < used {
                    CellState::Used
                } else {
                    CellState::Free
                }
            })
            .collect();

        Snapshot {
            strategy: Self::NAME,
            capacity: self.capacity,
            touched: Span::new(self.previous, self.next),
            layout: Layout::Cells {
                cells,
                free_blocks: usize::from(self.next != self.capacity),
                used_blocks: self.allocations,
            },
        }
    }

    fn blocks(&self) -> Vec<Block<W>> {
        let mut blocks = Vec::with_capacity(2);
        if self.next > W::ZERO {
            blocks.push(Block::new(W::ZERO, self.next, BlockState::Used));
        }
        if self.next < self.capacity {
            blocks.push(Block::new(self.next, self.capacity - self.next, BlockState::Free));
        }
        blocks
    }

    fn capacity(&self) -> W {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_addresses() {
        let mut linear: LinearAllocator = LinearAllocator::new(32).unwrap();

        assert_eq!(linear.allocate(7), Ok(0));
        assert_eq!(linear.allocate(2), Ok(7));
        assert_eq!(linear.allocate(3), Ok(9));
        assert_eq!(linear.allocate(5), Ok(12));
        assert_eq!(linear.next_free_address(), 17);
        assert_eq!(linear.allocations(), 4);
    }

    #[test]
    fn test_exact_fill_then_out_of_memory() {
        let mut linear: LinearAllocator = LinearAllocator::new(8).unwrap();

        assert_eq!(linear.allocate(8), Ok(0));
        assert_eq!(linear.allocate(1), Err(AllocError::OutOfMemory { requested: 1 }));

        let snapshot = linear.snapshot();
        assert_eq!(snapshot.free_blocks(), 0);
        assert_eq!(snapshot.used_blocks(), 1);
    }

    #[test]
    fn test_release_is_unsupported() {
        let mut linear: LinearAllocator = LinearAllocator::new(16).unwrap();
        linear.allocate(4).unwrap();

        let err = linear.release(0).unwrap_err();
        assert!(matches!(err, AllocError::UnsupportedOperation { .. }));
        assert_eq!(linear.next_free_address(), 4);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut linear: LinearAllocator = LinearAllocator::new(16).unwrap();
        assert_eq!(linear.allocate(0), Err(AllocError::zero_size()));
        assert_eq!(linear.allocations(), 0);
    }

    #[test]
    fn test_snapshot_highlights_last_allocation() {
        let mut linear: LinearAllocator = LinearAllocator::new(16).unwrap();
        linear.allocate(3).unwrap();
        linear.allocate(2).unwrap();

        let snapshot = linear.snapshot();
        assert_eq!(snapshot.touched, Span::new(3, 5));
        assert_eq!(snapshot.used_units(), 5);
        assert_eq!(snapshot.free_blocks(), 1);
        assert_eq!(snapshot.used_blocks(), 2);
    }

    #[test]
    fn test_init_resets() {
        let mut linear: LinearAllocator = LinearAllocator::new(16).unwrap();
        linear.allocate(10).unwrap();
        linear.init(16).unwrap();

        assert_eq!(linear.next_free_address(), 0);
        assert_eq!(linear.blocks(), vec![Block::new(0, 16, BlockState::Free)]);
        assert!(linear.init(0).is_err());
    }
}
