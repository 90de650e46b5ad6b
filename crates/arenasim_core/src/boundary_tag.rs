//! # Boundary Tag Allocator
//!
//! Keeps all bookkeeping inside the managed memory. Every block carries its
//! size at both ends, so a release can find either neighbour without a side
//! table.
//!
//! ## Block Layout
//!
//! ```text
//!   address + 0          size
//!   address + 1          flag (1 = free, 2 = used)
//!   address + 2 ..       usable units (size of them)
//!   address + 2 + size   size again (footer)
//!
//!   ┌──────┬──────┬───────────────────────┬──────┐
//!   │ size │ flag │     usable × size     │ size │
//!   └──────┴──────┴───────────────────────┴──────┘
//!   ▲             ▲                              ▲
//!   header        pointer returned to caller     footer
//! ```
//!
//! The footer is what makes leftward coalescing cheap: the unit just before a
//! header is the size of the block to its left, and from there the left
//! header is `size + 3` units further back.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::block::{Block, BlockState, Span};
use crate::error::{AllocError, AllocResult};
use crate::snapshot::{CellState, Layout, Snapshot, TaggedBlock};
use crate::strategy::{validate_capacity, validate_request, Strategy};
use crate::word::{small, Word};

/// Flag value of a free block.
pub const FLAG_FREE: u8 = 1;
/// Flag value of a used block.
pub const FLAG_USED: u8 = 2;
/// Units before the usable region (size + flag).
pub const HEADER_WIDTH: u8 = 2;
/// Units after the usable region (size).
pub const FOOTER_WIDTH: u8 = 1;
/// Total bookkeeping units per block.
pub const METADATA_OVERHEAD: u8 = HEADER_WIDTH + FOOTER_WIDTH;

/// A first-fit allocator that stores headers and footers in the arena.
#[derive(Clone, Debug)]
pub struct BoundaryTagAllocator<W: Word = u8> {
    /// The managed memory, metadata included.
    arena: Arena<W>,
    /// Usable span touched by the last successful mutation.
    touched: Span<W>,
}

impl<W: Word> BoundaryTagAllocator<W> {
    /// Strategy name.
    pub const NAME: &'static str = "boundary tag";

    /// Creates an initialised allocator.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidCapacity`] if the arena cannot hold one block's
    /// metadata.
    pub fn new(capacity: W) -> AllocResult<Self> {
        let mut allocator = Self {
            arena: Arena::new(W::ZERO),
            touched: Span::empty(),
        };
        allocator.init(capacity)?;
        Ok(allocator)
    }

    /// The raw arena, metadata included.
    #[inline]
    #[must_use]
    pub const fn arena(&self) -> &Arena<W> {
        &self.arena
    }

    #[inline]
    fn tag_overhead() -> W {
        small(METADATA_OVERHEAD)
    }

    #[inline]
    fn tag_header() -> W {
        small(HEADER_WIDTH)
    }

    /// Decodes the block whose header starts at `address`.
    fn read_block(&self, address: W) -> Block<W> {
        let state = if self.arena.read(address + W::ONE) == small(FLAG_USED) {
            BlockState::Used
        } else {
            BlockState::Free
        };
        Block::new(address, self.arena.read(address), state)
    }

    /// Writes header and footer, zeroing the whole footprint first so no unit
    /// keeps a meaning from a previous occupant.
    fn write_block(&mut self, block: Block<W>) {
        let footprint = Span::new(block.address, block.end(Self::tag_overhead()));
        self.arena.zero(footprint);

        let flag = match block.state {
            BlockState::Free => FLAG_FREE,
            BlockState::Used => FLAG_USED,
        };
        self.arena.write(block.address, block.size);
        self.arena.write(block.address + W::ONE, small(flag));
        self.arena.write(block.address + Self::tag_header() + block.size, block.size);
    }

    /// The block directly after `block`, unless `block` is the last one.
    fn following_block(&self, block: &Block<W>) -> Option<Block<W>> {
        let next = block.address.checked_add(block.size)?.checked_add(Self::tag_overhead())?;
        (next < self.arena.capacity()).then(|| self.read_block(next))
    }

    /// The block directly before the header at `address`, found through its
    /// footer. `None` for the first block.
    pub fn preceding_block(&self, address: W) -> Option<Block<W>> {
        let footer = address.checked_sub(W::ONE)?;
        let size = self.arena.get(footer)?;
        let header = footer.checked_sub(size)?.checked_sub(Self::tag_header())?;
        Some(self.read_block(header))
    }

    /// Walks the block chain from address zero.
    fn walk(&self) -> impl Iterator<Item = Block<W>> + '_ {
        std::iter::successors(Some(self.read_block(W::ZERO)), |block| {
            self.following_block(block)
        })
    }

    /// Finds the used block whose header is at `header`, walking the chain
    /// so that addresses in the middle of a block are never mistaken for one.
    fn used_block_at(&self, header: W) -> Option<Block<W>> {
        self.walk()
            .take_while(|block| block.address <= header)
            .find(|block| block.address == header)
            .filter(|block| block.state == BlockState::Used)
    }
}

impl<W: Word> Strategy<W> for BoundaryTagAllocator<W> {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&mut self, capacity: W) -> AllocResult<()> {
        validate_capacity(capacity, Self::tag_overhead())?;

        self.arena = Arena::new(capacity);
        self.touched = Span::empty();
        self.write_block(Block::new(
            W::ZERO,
            capacity - Self::tag_overhead(),
            BlockState::Free,
        ));
        Ok(())
    }

    fn allocate(&mut self, size: W) -> AllocResult<W> {
        validate_request(size)?;

        let out_of_memory = || AllocError::OutOfMemory {
            requested: size.to_u64(),
        };
        let overhead = Self::tag_overhead();
        // A candidate must also fit the metadata of the leftover block.
        let needed = size.checked_add(overhead).ok_or_else(out_of_memory)?;

        let candidate = self
            .walk()
            .inspect(|block| trace!(address = %block.address, size = %block.size, state = ?block.state, "visit"))
            .find(|block| block.state.is_free() && block.size >= needed)
            .ok_or_else(out_of_memory)?;

        self.write_block(Block::new(candidate.address, size, BlockState::Used));

        let leftover = candidate.size - size;
        if leftover > W::ZERO {
            let remainder = Block::new(
                candidate.address + size + overhead,
                leftover - overhead,
                BlockState::Free,
            );
            trace!(address = %remainder.address, size = %remainder.size, "split");
            self.write_block(remainder);
        }

        let placed = Block::new(candidate.address, size, BlockState::Used);
        self.touched = placed.usable(Self::tag_header());

        debug!(header = %candidate.address, %size, "placed");
        Ok(self.touched.start)
    }

    fn release(&mut self, address: W) -> AllocResult<()> {
        let invalid = || AllocError::InvalidAddress {
            address: address.to_u64(),
        };
        let overhead = Self::tag_overhead();

        let header = address.checked_sub(Self::tag_header()).ok_or_else(invalid)?;
        let mut block = self.used_block_at(header).ok_or_else(invalid)?;
        self.touched = block.usable(Self::tag_header());

        if let Some(right) = self.following_block(&block) {
            if right.state.is_free() {
                trace!(neighbour = %right.address, "merged right");
                block.size = block.size + right.size + overhead;
            }
        }

        if let Some(left) = self.preceding_block(block.address) {
            if left.state.is_free() {
                trace!(neighbour = %left.address, "merged left");
                block.address = left.address;
                block.size = block.size + left.size + overhead;
            }
        }

        block.state = BlockState::Free;
        self.write_block(block);

        debug!(%address, merged_header = %block.address, merged_size = %block.size, "released");
        Ok(())
    }

    fn snapshot(&self) -> Snapshot<W> {
        let blocks = self
            .walk()
            .map(|block| {
                let footer = block.end(Self::tag_overhead()) - W::ONE;
                TaggedBlock {
                    address: block.address,
                    size: block.size,
                    state: block.state,
                    usable: vec![CellState::from(block.state); block.size.to_usize()],
                    trailing_size: self.arena.read(footer),
                }
            })
            .collect();

        Snapshot {
            strategy: Self::NAME,
            capacity: self.arena.capacity(),
            touched: self.touched,
            layout: Layout::Tagged(blocks),
        }
    }

    fn blocks(&self) -> Vec<Block<W>> {
        self.walk().collect()
    }

    fn capacity(&self) -> W {
        self.arena.capacity()
    }

    fn overhead(&self) -> W {
        Self::tag_overhead()
    }

    fn header_width(&self) -> W {
        Self::tag_header()
    }
}
