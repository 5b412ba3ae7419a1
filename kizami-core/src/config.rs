//! Splitter configuration
//!
//! A [`SplitterConfig`] is immutable for the lifetime of the
//! [`TextSplitter`](crate::TextSplitter) that owns it. Patterns are compiled
//! once here so that pattern errors surface at construction time.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, SplitterError};
use crate::header::HeaderRule;

/// Default chunk ceiling in measured units
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// Default overlap window carried between consecutive chunks
pub const DEFAULT_CHUNK_OVERLAP: usize = 100;

/// Default separator ladder, highest priority first; the empty separator is
/// the per-character fallback
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Default protected-content patterns: display math, images, links, table
/// header blocks, table rows, and fenced code block openers
pub const DEFAULT_PROTECTED_PATTERNS: [&str; 6] = [
    r"\$\$[\s\S]*?\$\$",
    r"!\[.*?\]\(.*?\)",
    r"\[.*?\]\(.*?\)",
    r"(?:\|[^|\n]*)+\|[\r\n]+\s*(?:\|\s*:?-{3,}:?\s*)+\|[\r\n]+",
    r"(?:\|[^|\n]*)+\|[\r\n]+",
    "```(?:\\w+)[\\r\\n]+[^\\r\\n]*",
];

/// Pluggable unit-counting function used for all size and overlap arithmetic
pub type LengthFn = Arc<dyn Fn(&str) -> usize + Send + Sync>;

/// The default length function: Unicode code-point count
pub fn default_length_fn() -> LengthFn {
    Arc::new(|text: &str| text.chars().count())
}

/// Configuration for a [`TextSplitter`](crate::TextSplitter)
#[derive(Clone)]
pub struct SplitterConfig {
    /// Maximum chunk size in measured units
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in measured units
    pub chunk_overlap: usize,
    /// Separator ladder, highest priority first
    pub separators: Vec<String>,
    pub(crate) protected_patterns: Vec<Regex>,
    pub(crate) header_rules: Vec<HeaderRule>,
    pub(crate) length_fn: LengthFn,
}

impl SplitterConfig {
    /// Create a configuration with the given sizes and default separators,
    /// protected patterns, and header rules
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::builder()
            .chunk_size(chunk_size)
            .chunk_overlap(chunk_overlap)
            .build()
    }

    /// Create a builder pre-populated with the defaults
    pub fn builder() -> SplitterConfigBuilder {
        SplitterConfigBuilder::default()
    }

    /// Measure a piece of text with the configured length function
    pub(crate) fn measure(&self, text: &str) -> usize {
        (self.length_fn)(text)
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
            .expect("default configuration is valid")
    }
}

impl fmt::Debug for SplitterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitterConfig")
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("separators", &self.separators)
            .field("protected_patterns", &self.protected_patterns)
            .field("header_rules", &self.header_rules)
            .field("length_fn", &"<fn>")
            .finish()
    }
}

/// Builder for [`SplitterConfig`]
pub struct SplitterConfigBuilder {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
    protected_patterns: Vec<String>,
    header_rules: Option<Vec<HeaderRule>>,
    length_fn: Option<LengthFn>,
}

impl Default for SplitterConfigBuilder {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            protected_patterns: DEFAULT_PROTECTED_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            header_rules: None,
            length_fn: None,
        }
    }
}

impl SplitterConfigBuilder {
    /// Set the chunk ceiling in measured units
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the overlap window in measured units
    pub fn chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    /// Replace the separator ladder (highest priority first; an empty string
    /// selects per-character splitting)
    pub fn separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the protected-content patterns (matched in list order)
    pub fn protected_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.protected_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the header tracking rules
    pub fn header_rules(mut self, rules: Vec<HeaderRule>) -> Self {
        self.header_rules = Some(rules);
        self
    }

    /// Replace the length function (default: code-point count)
    pub fn length_fn(mut self, length_fn: LengthFn) -> Self {
        self.length_fn = Some(length_fn);
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<SplitterConfig> {
        if self.chunk_size == 0 {
            return Err(SplitterError::ZeroChunkSize);
        }
        if self.chunk_overlap > self.chunk_size {
            return Err(SplitterError::OverlapExceedsChunkSize {
                chunk_overlap: self.chunk_overlap,
                chunk_size: self.chunk_size,
            });
        }

        let protected_patterns = self
            .protected_patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let header_rules = match self.header_rules {
            Some(rules) => rules,
            None => HeaderRule::default_rules()?,
        };

        Ok(SplitterConfig {
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            separators: self.separators,
            protected_patterns,
            header_rules,
            length_fn: self.length_fn.unwrap_or_else(default_length_fn),
        })
    }
}
