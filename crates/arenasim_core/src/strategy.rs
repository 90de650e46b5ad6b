//! # Strategy Contract
//!
//! The capability set every allocator exposes to the harness. Each
//! implementation owns its arena outright; nothing is shared between them.

use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::boundary_tag::BoundaryTagAllocator;
use crate::error::{AllocError, AllocResult};
use crate::free_list::FreeListAllocator;
use crate::linear::LinearAllocator;
use crate::snapshot::Snapshot;
use crate::word::Word;

/// An allocation strategy over a fixed-size arena.
///
/// Every method either commits its whole mutation or returns an error with
/// the arena untouched.
pub trait Strategy<W: Word = u8>: Send {
    /// Human-readable strategy name.
    fn name(&self) -> &'static str;

    /// (Re)initialises the arena to a single free block.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidCapacity`] if the arena cannot hold its own
    /// metadata.
    fn init(&mut self, capacity: W) -> AllocResult<()>;

    /// Places a block of `size` usable units and returns its usable address.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidRequest`] for zero, [`AllocError::OutOfMemory`]
    /// when no block qualifies.
    fn allocate(&mut self, size: W) -> AllocResult<W>;

    /// Returns a block to the arena, coalescing with free neighbours.
    ///
    /// # Errors
    ///
    /// [`AllocError::InvalidAddress`] if `address` is not a used block,
    /// [`AllocError::UnsupportedOperation`] if the strategy never frees.
    fn release(&mut self, address: W) -> AllocResult<()>;

    /// Read-only view for rendering.
    fn snapshot(&self) -> Snapshot<W>;

    /// All blocks in address order, footprints included.
    fn blocks(&self) -> Vec<Block<W>>;

    /// Arena capacity.
    fn capacity(&self) -> W;

    /// Metadata units per block (header plus footer).
    fn overhead(&self) -> W {
        W::ZERO
    }

    /// Units between a block's address and its usable region.
    fn header_width(&self) -> W {
        W::ZERO
    }
}

/// Rejects the degenerate zero-size request.
#[inline]
pub(crate) fn validate_request<W: Word>(size: W) -> AllocResult<()> {
    if size == W::ZERO {
        return Err(AllocError::zero_size());
    }
    Ok(())
}

/// Rejects an empty arena.
#[inline]
pub(crate) fn validate_capacity<W: Word>(capacity: W, minimum: W) -> AllocResult<()> {
    if capacity < minimum {
        return Err(AllocError::InvalidCapacity {
            capacity: capacity.to_u64(),
            minimum: minimum.to_u64(),
        });
    }
    Ok(())
}

/// Selects one of the built-in strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// [`LinearAllocator`].
    Linear,
    /// [`FreeListAllocator`].
    FreeList,
    /// [`BoundaryTagAllocator`].
    BoundaryTag,
}

impl StrategyKind {
    /// All kinds, in the order the demos present them.
    pub const ALL: [Self; 3] = [Self::Linear, Self::FreeList, Self::BoundaryTag];

    /// Builds and initialises a strategy of this kind.
    ///
    /// # Errors
    ///
    /// Propagates the strategy's `init` error.
    pub fn build<W: Word>(self, capacity: W) -> AllocResult<Box<dyn Strategy<W>>> {
        Ok(match self {
            Self::Linear => Box::new(LinearAllocator::new(capacity)?),
            Self::FreeList => Box::new(FreeListAllocator::new(capacity)?),
            Self::BoundaryTag => Box::new(BoundaryTagAllocator::new(capacity)?),
        })
    }

    /// The name the built strategy reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => LinearAllocator::<u8>::NAME,
            Self::FreeList => FreeListAllocator::<u8>::NAME,
            Self::BoundaryTag => BoundaryTagAllocator::<u8>::NAME,
        }
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "linear" => Ok(Self::Linear),
            "free_list" => Ok(Self::FreeList),
            "boundary_tag" => Ok(Self::BoundaryTag),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}
