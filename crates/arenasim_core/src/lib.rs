//! # ARENASIM Core
//!
//! Step-by-step models of three memory-allocation strategies over a fixed-size
//! arena. Each strategy implements the same [`Strategy`] contract; callers
//! observe the arena through a [`Snapshot`] after every operation.
//!
//! ## Strategies
//!
//! | Strategy                 | Bookkeeping            | Reclaims | Overhead |
//! |--------------------------|------------------------|----------|----------|
//! | [`LinearAllocator`]      | one bump pointer       | never    | 0        |
//! | [`FreeListAllocator`]    | two side maps          | yes      | 0        |
//! | [`BoundaryTagAllocator`] | headers/footers inline | yes      | 3        |
//!
//! ## Address Domain
//!
//! Addresses, sizes and arena units share one unsigned type, `W: Word`,
//! defaulting to `u8`. Anything that would leave the domain is rejected.
//!
//! ## Example
//!
//! ```rust
//! use arenasim_core::{BoundaryTagAllocator, Strategy};
//!
//! let mut tags: BoundaryTagAllocator = BoundaryTagAllocator::new(32)?;
//! let a = tags.allocate(7)?;
//! let b = tags.allocate(2)?;
//! assert_eq!((a, b), (0x02, 0x0c));
//!
//! tags.release(b)?;
//! tags.release(a)?;
//! assert_eq!(tags.blocks().len(), 1);
//! # Ok::<(), arenasim_core::AllocError>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod arena;
pub mod block;
pub mod boundary_tag;
pub mod error;
pub mod free_list;
pub mod linear;
pub mod shared;
pub mod snapshot;
pub mod strategy;
pub mod word;

pub use arena::Arena;
pub use block::{Block, BlockState, Span};
pub use boundary_tag::BoundaryTagAllocator;
pub use error::{AllocError, AllocResult};
pub use free_list::FreeListAllocator;
pub use linear::LinearAllocator;
pub use shared::SharedStrategy;
pub use snapshot::{CellState, Layout, Snapshot, TaggedBlock};
pub use strategy::{Strategy, StrategyKind};
pub use word::Word;
