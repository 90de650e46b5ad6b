//! # Address Domain
//!
//! Every address, size and arena storage unit is a [`Word`]. The reference
//! domain is `u8` (0-255), which keeps a whole arena on one terminal line.
//! Wider domains are available for larger arenas; the discipline is the same:
//! any sum that leaves the domain is rejected.

use std::fmt::{Debug, Display, LowerHex};
use std::hash::Hash;
use std::ops::{Add, Sub};

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer type used as the allocator's address domain.
///
/// Plain `+` and `-` are only used where a block invariant already bounds the
/// result by the arena capacity. Anything driven by caller input goes through
/// the checked methods.
pub trait Word:
    sealed::Sealed
    + Copy
    + Default
    + Ord
    + Hash
    + Debug
    + Display
    + LowerHex
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + 'static
{
    /// Zero.
    const ZERO: Self;
    /// One.
    const ONE: Self;
    /// Largest representable address or size.
    const MAX: Self;
    /// Width of the domain in bits.
    const BITS: u32;

    /// Addition that fails instead of leaving the domain.
    fn checked_add(self, rhs: Self) -> Option<Self>;

    /// Subtraction that fails instead of going below zero.
    fn checked_sub(self, rhs: Self) -> Option<Self>;

    /// Converts from a small constant or an index known to fit.
    fn from_usize(value: usize) -> Option<Self>;

    /// Converts from a raw `u64` (scenario files, CLI input).
    fn from_u64(value: u64) -> Option<Self>;

    /// Index into an arena buffer.
    fn to_usize(self) -> usize;

    /// Lossless widening, used for error reporting.
    fn to_u64(self) -> u64;
}

macro_rules! impl_word {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl Word for $t {
                const ZERO: Self = 0;
                const ONE: Self = 1;
                const MAX: Self = <$t>::MAX;
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn checked_add(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_add(self, rhs)
                }

                #[inline]
                fn checked_sub(self, rhs: Self) -> Option<Self> {
                    <$t>::checked_sub(self, rhs)
                }

                #[inline]
                fn from_usize(value: usize) -> Option<Self> {
                    <$t>::try_from(value).ok()
                }

                #[inline]
                fn from_u64(value: u64) -> Option<Self> {
                    <$t>::try_from(value).ok()
                }

                #[inline]
                fn to_usize(self) -> usize {
                    // Arena buffers live in memory, so any valid address fits.
                    usize::try_from(self).unwrap_or(usize::MAX)
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    u64::from(self)
                }
            }
        )*
    };
}

impl_word!(u8, u16, u32, u64);

/// Converts a small strategy constant into the domain.
///
/// Every supported domain holds at least 0-255, so constants below that
/// always convert.
#[inline]
pub(crate) fn small<W: Word>(value: u8) -> W {
    W::from_u64(u64::from(value)).unwrap_or(W::MAX)
}
