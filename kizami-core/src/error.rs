//! Error types for splitter construction
//!
//! All variants are surfaced synchronously from configuration builders and
//! constructors; `split_text` itself never fails (degenerate conditions are
//! reported through [`crate::SplitReport`] and `tracing` instead).

use thiserror::Error;

/// Errors raised while building a splitter configuration
#[derive(Error, Debug)]
pub enum SplitterError {
    /// Overlap window larger than the chunk ceiling
    #[error("chunk overlap ({chunk_overlap}) must not exceed chunk size ({chunk_size})")]
    OverlapExceedsChunkSize {
        /// The configured overlap in measured units
        chunk_overlap: usize,
        /// The configured chunk ceiling in measured units
        chunk_size: usize,
    },

    /// Chunk ceiling of zero
    #[error("chunk size must be greater than 0")]
    ZeroChunkSize,

    /// A protected or header pattern failed to compile
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type for splitter construction
pub type Result<T> = std::result::Result<T, SplitterError>;
