//! # Allocator Error Types
//!
//! All errors a strategy can report. None of them is retried internally and
//! none of them leaves a partially mutated arena behind.

use thiserror::Error;

/// Errors that can occur while operating on an arena.
///
/// Addresses and sizes are widened to `u64` so the error type does not depend
/// on the address domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// No block can satisfy the placement request.
    #[error("out of memory: no block can hold {requested} units")]
    OutOfMemory {
        /// The requested usable size.
        requested: u64,
    },

    /// The address does not name a currently used block.
    #[error("invalid address {address:#04x}: not the start of a used block")]
    InvalidAddress {
        /// The address passed by the caller.
        address: u64,
    },

    /// The strategy has no model for this operation.
    #[error("the {strategy} allocator does not support {operation}")]
    UnsupportedOperation {
        /// Name of the strategy.
        strategy: &'static str,
        /// Name of the rejected operation.
        operation: &'static str,
    },

    /// The request is degenerate (zero-sized).
    #[error("invalid request: {reason}")]
    InvalidRequest {
        /// Why the request was rejected.
        reason: &'static str,
    },

    /// The arena cannot be initialised with this capacity.
    #[error("invalid capacity {capacity}: at least {minimum} units are required")]
    InvalidCapacity {
        /// The capacity passed to `init`.
        capacity: u64,
        /// Smallest capacity the strategy accepts.
        minimum: u64,
    },
}

impl AllocError {
    /// Shorthand for the zero-size rejection every strategy shares.
    #[inline]
    #[must_use]
    pub const fn zero_size() -> Self {
        Self::InvalidRequest {
            reason: "zero-sized allocation",
        }
    }
}

/// Result type for allocator operations.
pub type AllocResult<T> = Result<T, AllocError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render_hex_addresses() {
        let err = AllocError::InvalidAddress { address: 0x0c };
        assert_eq!(
            err.to_string(),
            "invalid address 0x0c: not the start of a used block"
        );
    }

    #[test]
    fn test_unsupported_names_strategy() {
        let err = AllocError::UnsupportedOperation {
            strategy: "linear",
            operation: "release",
        };
        assert_eq!(err.to_string(), "the linear allocator does not support release");
    }
}
