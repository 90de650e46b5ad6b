//! # Shared Strategy
//!
//! The strategies are single-threaded: block layout invariants do not hold
//! under interleaved mutation. Callers that need one arena on several threads
//! go through this handle, which serializes every call behind one lock.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::block::Block;
use crate::error::AllocResult;
use crate::snapshot::Snapshot;
use crate::strategy::Strategy;
use crate::word::Word;

/// A cloneable, lock-guarded handle to one strategy instance.
///
/// # Example
///
/// ```rust
/// use arenasim_core::{SharedStrategy, StrategyKind};
///
/// let shared = SharedStrategy::new(StrategyKind::FreeList.build(32u8)?);
/// let worker = shared.clone();
/// let address = std::thread::spawn(move || worker.allocate(4))
///     .join()
///     .expect("worker panicked")?;
/// shared.release(address)?;
/// # Ok::<(), arenasim_core::AllocError>(())
/// ```
pub struct SharedStrategy<W: Word = u8> {
    inner: Arc<Mutex<Box<dyn Strategy<W>>>>,
}

impl<W: Word> Clone for SharedStrategy<W> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<W: Word> SharedStrategy<W> {
    /// Wraps an initialised strategy.
    #[must_use]
    pub fn new(strategy: Box<dyn Strategy<W>>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(strategy)),
        }
    }

    /// Strategy name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.lock().name()
    }

    /// See [`Strategy::init`].
    ///
    /// # Errors
    ///
    /// Propagates the strategy's error.
    pub fn init(&self, capacity: W) -> AllocResult<()> {
        self.inner.lock().init(capacity)
    }

    /// See [`Strategy::allocate`].
    ///
    /// # Errors
    ///
    /// Propagates the strategy's error.
    pub fn allocate(&self, size: W) -> AllocResult<W> {
        self.inner.lock().allocate(size)
    }

    /// See [`Strategy::release`].
    ///
    /// # Errors
    ///
    /// Propagates the strategy's error.
    pub fn release(&self, address: W) -> AllocResult<()> {
        self.inner.lock().release(address)
    }

    /// See [`Strategy::snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<W> {
        self.inner.lock().snapshot()
    }

    /// See [`Strategy::blocks`].
    #[must_use]
    pub fn blocks(&self) -> Vec<Block<W>> {
        self.inner.lock().blocks()
    }

    /// Runs `f` with exclusive access, for multi-step sequences that must
    /// not interleave with other callers.
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn Strategy<W>) -> R) -> R {
        let mut guard = self.inner.lock();
        f(guard.as_mut())
    }
}
