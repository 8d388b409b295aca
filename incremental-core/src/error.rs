//! Error Types
//!
//! The propagation path has no recoverable failures: there is no I/O and
//! nothing to retry. What remains are programming errors, which the engine
//! reports by panicking with the error's message. [`Runtime::check_same`]
//! exposes the one check callers may want to make up front.
//!
//! [`Runtime::check_same`]: crate::reactive::Runtime::check_same

use thiserror::Error;

/// Programming errors detected by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A write reached a constant cell.
    #[error("attempted to write to a constant cell")]
    ConstantWrite,

    /// Cells owned by two different runtimes were combined.
    #[error("cells belong to different runtimes and cannot be combined")]
    RuntimeMismatch,
}

/// Result alias for fallible engine checks.
pub type Result<T> = std::result::Result<T, Error>;
