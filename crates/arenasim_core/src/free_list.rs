//! # Free List Allocator
//!
//! Keeps its bookkeeping out of band: one address-ordered map of free
//! regions and one of used regions. The managed memory itself carries no
//! metadata, so the header width and overhead are both zero.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::block::{Block, BlockState, Span};
use crate::error::{AllocError, AllocResult};
use crate::snapshot::{CellState, Layout, Snapshot};
use crate::strategy::{validate_capacity, validate_request, Strategy};
use crate::word::Word;

/// A first-fit allocator with side tables.
///
/// The two maps are disjoint in keys and their ranges never overlap. Both
/// are ordered by address, so first-fit is reproducible.
#[derive(Clone, Debug)]
pub struct FreeListAllocator<W: Word = u8> {
    /// Total capacity.
    capacity: W,
    /// Free regions, address to size.
    free: BTreeMap<W, W>,
    /// Used regions, address to size.
    used: BTreeMap<W, W>,
    /// Range touched by the last successful mutation.
    touched: Span<W>,
}

impl<W: Word> FreeListAllocator<W> {
    /// Strategy name.
    pub const NAME: &'static str = "free list";

    /// Creates an initialised allocator.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidCapacity`] for an empty arena.
    pub fn new(capacity: W) -> AllocResult<Self> {
        let mut allocator = Self {
            capacity: W::ZERO,
            free: BTreeMap::new(),
            used: BTreeMap::new(),
            touched: Span::empty(),
        };
        allocator.init(capacity)?;
        Ok(allocator)
    }

    /// Free regions in address order.
    pub fn free_regions(&self) -> impl Iterator<Item = (W, W)> + '_ {
        self.free.iter().map(|(&address, &size)| (address, size))
    }

    /// Used regions in address order.
    pub fn used_regions(&self) -> impl Iterator<Item = (W, W)> + '_ {
        self.used.iter().map(|(&address, &size)| (address, size))
    }

    /// Lowest-addressed free region holding at least `size` units.
    fn first_fit(&self, size: W) -> Option<(W, W)> {
        self.free_regions().find(|&(_, available)| available >= size)
    }
}

impl<W: Word> Strategy<W> for FreeListAllocator<W> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, capacity: W) -> AllocResult<()> {
        validate_capacity(capacity, W::ONE)?;

        self.capacity = capacity;
        self.free.clear();
        self.used.clear();
        self.free.insert(W::ZERO, capacity);
        self.touched = Span::empty();
        Ok(())
    }

    fn allocate(&mut self, size: W) -> AllocResult<W> {
        validate_request(size)?;

        let (address, available) = self.first_fit(size).ok_or(AllocError::OutOfMemory {
            requested: size.to_u64(),
        })?;

        self.free.remove(&address);
        self.used.insert(address, size);
        self.touched = Span::new(address, address + size);

        let leftover = available - size;
        if leftover > W::ZERO {
            trace!(address = %(address + size), size = %leftover, "split");
            self.free.insert(address + size, leftover);
        }

        debug!(%address, %size, "placed");
        Ok(address)
    }

    fn release(&mut self, address: W) -> AllocResult<()> {
        let mut size = self.used.remove(&address).ok_or(AllocError::InvalidAddress {
            address: address.to_u64(),
        })?;
        self.touched = Span::new(address, address + size);

        let mut start = address;

        let right = address + size;
        if let Some(right_size) = self.free.remove(&right) {
            trace!(neighbour = %right, "merged right");
            size = size + right_size;
        }

        let left = self
            .free
            .range(..start)
            .next_back()
            .filter(|&(&left, &left_size)| left + left_size == start)
            .map(|(&left, &left_size)| (left, left_size));
        if let Some((left, left_size)) = left {
            trace!(neighbour = %left, "merged left");
            self.free.remove(&left);
            start = left;
            size = size + left_size;
        }

        self.free.insert(start, size);
        debug!(%address, merged_start = %start, merged_size = %size, "released");
        Ok(())
    }

    fn snapshot(&self) -> Snapshot<W> {
        let mut cells = vec![CellState::Free; self.capacity.to_usize()];
        for (address, size) in self.used_regions() {
            let start = address.to_usize();
            cells[start..start + size.to_usize()].fill(CellState::Used);
        }

        Snapshot {
            strategy: Self::NAME,
            capacity: self.capacity,
            touched: self.touched,
            layout: Layout::Cells {
                cells,
                free_blocks: self.free.len(),
                used_blocks: self.used.len(),
            },
        }
    }

    fn blocks(&self) -> Vec<Block<W>> {
        let free = self
            .free_regions()
            .map(|(address, size)| Block::new(address, size, BlockState::Free));
        let used = self
            .used_regions()
            .map(|(address, size)| Block::new(address, size, BlockState::Used));

        let mut blocks: Vec<_> = free.chain(used).collect();
        blocks.sort_by_key(|block| block.address);
        blocks
    }

    fn capacity(&self) -> W {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_arena() -> FreeListAllocator {
        let mut list = FreeListAllocator::new(32).unwrap();
        for size in [7, 2, 3, 5] {
            list.allocate(size).unwrap();
        }
        list
    }

    #[test]
    fn test_first_fit_in_address_order() {
        let list = demo_arena();
        let used: Vec<_> = list.used_regions().collect();
        assert_eq!(used, vec![(0, 7), (7, 2), (9, 3), (12, 5)]);
        assert_eq!(list.free_regions().collect::<Vec<_>>(), vec![(17, 15)]);
    }

    #[test]
    fn test_first_fit_prefers_lowest_address() {
        let mut list = demo_arena();
        list.release(0).unwrap();
        list.release(9).unwrap();

        // Both 0..7 and 9..12 fit; the lower one wins.
        assert_eq!(list.allocate(3), Ok(0));
        assert_eq!(list.allocate(3), Ok(3));
        assert_eq!(list.allocate(3), Ok(9));
    }

    #[test]
    fn test_release_merges_both_neighbours() {
        let mut list = demo_arena();

        list.release(0x07).unwrap();
        list.release(0x0c).unwrap();
        assert_eq!(list.free_regions().collect::<Vec<_>>(), vec![(7, 2), (12, 20)]);

        list.release(0x09).unwrap();
        assert_eq!(list.free_regions().collect::<Vec<_>>(), vec![(7, 25)]);

        list.release(0x00).unwrap();
        assert_eq!(list.free_regions().collect::<Vec<_>>(), vec![(0, 32)]);
        assert_eq!(list.used_regions().count(), 0);
    }

    #[test]
    fn test_exact_fit_leaves_no_empty_region() {
        let mut list: FreeListAllocator = FreeListAllocator::new(8).unwrap();
        assert_eq!(list.allocate(8), Ok(0));
        assert_eq!(list.free_regions().count(), 0);
        assert_eq!(list.allocate(1), Err(AllocError::OutOfMemory { requested: 1 }));
    }

    #[test]
    fn test_invalid_release_leaves_state() {
        let mut list = demo_arena();
        let before = list.snapshot();

        assert_eq!(
            list.release(3),
            Err(AllocError::InvalidAddress { address: 3 })
        );
        assert_eq!(list.snapshot(), before);
    }

    #[test]
    fn test_snapshot_counts_blocks() {
        let mut list = demo_arena();
        list.release(7).unwrap();

        let snapshot = list.snapshot();
        assert_eq!(snapshot.free_blocks(), 2);
        assert_eq!(snapshot.used_blocks(), 3);
        assert_eq!(snapshot.used_units(), 15);
        assert_eq!(snapshot.touched, Span::new(7, 9));
    }
}
