//! # Arena
//!
//! The fixed-length buffer a strategy manages. Strategies that keep their
//! bookkeeping inside the managed memory (boundary tags) read and write it
//! unit by unit; the others only need its capacity.

use crate::block::Span;
use crate::word::Word;

/// A fixed-capacity run of storage units.
///
/// Allocated once by `init` and never resized. Every unit starts zeroed.
///
/// # Example
///
/// ```rust
/// use arenasim_core::Arena;
///
/// let mut arena: Arena<u8> = Arena::new(32);
/// arena.write(0, 29);
/// assert_eq!(arena.read(0), 29);
/// assert_eq!(arena.capacity(), 32);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Arena<W: Word> {
    /// The backing storage.
    storage: Box<[W]>,
    /// Total capacity, kept in the domain type.
    capacity: W,
}

impl<W: Word> Arena<W> {
    /// Creates a zeroed arena with the specified capacity in units.
    #[must_use]
    pub fn new(capacity: W) -> Self {
        let storage = vec![W::ZERO; capacity.to_usize()].into_boxed_slice();
        Self { storage, capacity }
    }

    /// Returns the total capacity in units.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> W {
        self.capacity
    }

    /// Reads the unit at `address`.
    ///
    /// # Panics
    ///
    /// Panics if `address` is outside the arena. Strategies only read
    /// addresses derived from the block chain.
    #[inline]
    #[must_use]
    pub fn read(&self, address: W) -> W {
        self.storage[address.to_usize()]
    }

    /// Reads the unit at `address`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn get(&self, address: W) -> Option<W> {
        self.storage.get(address.to_usize()).copied()
    }

    /// Writes `value` at `address`.
    ///
    /// # Panics
    ///
    /// Panics if `address` is outside the arena.
    #[inline]
    pub fn write(&mut self, address: W, value: W) {
        self.storage[address.to_usize()] = value;
    }

    /// Zeroes every unit in `span`.
    #[inline]
    pub fn zero(&mut self, span: Span<W>) {
        self.storage[span.start.to_usize()..span.end.to_usize()].fill(W::ZERO);
    }

    /// Raw view of the storage, for snapshots and tests.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[W] {
        &self.storage
    }
}
