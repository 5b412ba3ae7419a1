//! Structure-aware recursive text chunking
//!
//! kizami splits arbitrarily long text into bounded-size, overlapping chunks
//! without ever cutting through protected spans (math, images, links, table
//! blocks, code fence openers) and re-injects active structural headers into
//! follow-on chunks so each chunk keeps its context.
//!
//! The pipeline per [`TextSplitter::split_text`] call:
//!
//! 1. recursive separator-ladder splitting into fragments at most
//!    `chunk_size` units long,
//! 2. protected-span extraction over the raw text,
//! 3. reconciliation, re-emitting each protected span as one indivisible
//!    fragment,
//! 4. merging fragments into chunks with a sliding overlap window and header
//!    injection.
//!
//! The pipeline performs no I/O, never suspends, and keeps no state across
//! calls; a `&TextSplitter` is freely shareable across threads.
//!
//! ```
//! use kizami_core::TextSplitter;
//!
//! let splitter = TextSplitter::new(64, 16)?;
//! let chunks = splitter.split_text("some long markdown document ...");
//! for chunk in &chunks {
//!     println!("[{}..{}] {}", chunk.start, chunk.end, chunk.content);
//! }
//! # Ok::<(), kizami_core::SplitterError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod header;

mod merge;
mod protected;
mod reconcile;
mod split;

use tracing::warn;

// Re-export key types
pub use config::{
    default_length_fn, LengthFn, SplitterConfig, SplitterConfigBuilder, DEFAULT_CHUNK_OVERLAP,
    DEFAULT_CHUNK_SIZE, DEFAULT_PROTECTED_PATTERNS, DEFAULT_SEPARATORS,
};
pub use error::{Result, SplitterError};
pub use header::{HeaderRule, HeaderTracker};
pub use merge::Chunk;
pub use protected::ProtectedSpan;

/// Per-call observability counters.
///
/// Degenerate-size conditions never abort a split; they are absorbed locally,
/// logged through `tracing`, and tallied here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplitReport {
    /// Fragments no separator strategy could shrink below the ceiling
    pub unsplittable_fragments: usize,
    /// Fragments that reached the merge stage above the ceiling
    pub oversized_fragments: usize,
    /// Protected spans dropped because they measure at or above the ceiling
    pub dropped_spans: usize,
    /// Header injections skipped because the header text exceeds the ceiling
    pub oversized_headers: usize,
    /// Whether the reconciled fragments re-concatenated to the source text
    /// byte-for-byte; `false` indicates a programming defect, not bad input
    pub round_trip_ok: bool,
}

impl SplitReport {
    pub(crate) fn new() -> Self {
        Self {
            unsplittable_fragments: 0,
            oversized_fragments: 0,
            dropped_spans: 0,
            oversized_headers: 0,
            round_trip_ok: true,
        }
    }
}

/// Recursive, structure-aware text splitter.
///
/// Owns an immutable [`SplitterConfig`]; every call runs the full pipeline
/// with call-scoped state only.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: SplitterConfig,
}

impl TextSplitter {
    /// Create a splitter with the given sizes and default separators,
    /// protected patterns, and header rules.
    ///
    /// Fails if `chunk_overlap > chunk_size` or `chunk_size == 0`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Ok(Self {
            config: SplitterConfig::new(chunk_size, chunk_overlap)?,
        })
    }

    /// Create a splitter from a prebuilt configuration
    pub fn with_config(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Split `text` into ordered, overlapping, size-bounded chunks.
    ///
    /// Never fails: degenerate sizes are logged and the affected chunks are
    /// still emitted. Use [`split_text_with_report`](Self::split_text_with_report)
    /// to observe them.
    pub fn split_text(&self, text: &str) -> Vec<Chunk> {
        self.split_text_with_report(text).0
    }

    /// Split `text` and return the diagnostics gathered along the way
    pub fn split_text_with_report(&self, text: &str) -> (Vec<Chunk>, SplitReport) {
        let mut report = SplitReport::new();
        if text.is_empty() {
            return (Vec::new(), report);
        }

        let fragments = split::recursive_split(text, &self.config, &mut report);
        let spans = protected::extract_protected(text, &self.config, &mut report);
        let fragments = reconcile::reconcile(fragments, &spans);

        if fragments.concat() != text {
            warn!("reconciled fragments do not reproduce the source text");
            report.round_trip_ok = false;
        }

        // Header state is scoped to this call.
        let mut tracker = HeaderTracker::new(&self.config.header_rules);
        let chunks = merge::merge(&fragments, &self.config, &mut tracker, &mut report);
        (chunks, report)
    }

    /// The raw fragment list produced by recursive splitting, before
    /// protected spans are reconciled. Exposed for black-box verification of
    /// the pipeline stages.
    pub fn raw_fragments(&self, text: &str) -> Vec<String> {
        let mut report = SplitReport::new();
        split::recursive_split(text, &self.config, &mut report)
    }

    /// The protected spans found in `text`, sorted and non-overlapping
    pub fn protected_spans(&self, text: &str) -> Vec<ProtectedSpan> {
        let mut report = SplitReport::new();
        protected::extract_protected(text, &self.config, &mut report)
    }

    /// The fragment list after protected spans are re-emitted atomically;
    /// concatenating it reproduces `text` exactly
    pub fn reconciled_fragments(&self, text: &str) -> Vec<String> {
        let mut report = SplitReport::new();
        let fragments = split::recursive_split(text, &self.config, &mut report);
        let spans = protected::extract_protected(text, &self.config, &mut report);
        reconcile::reconcile(fragments, &spans)
    }
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
            .expect("default splitter creation should not fail")
    }
}

// Convenience functions

/// Split text with the default configuration (chunk size 512, overlap 100)
pub fn split_text(text: &str) -> Vec<Chunk> {
    TextSplitter::default().split_text(text)
}

/// Split text with a specific configuration
pub fn split_text_with_config(text: &str, config: SplitterConfig) -> Vec<Chunk> {
    TextSplitter::with_config(config).split_text(text)
}
