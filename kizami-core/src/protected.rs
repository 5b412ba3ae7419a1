//! Protected-span extraction
//!
//! Scans the source text for configured protected-content patterns and
//! resolves overlapping matches into a sorted, non-overlapping span list that
//! the reconcile stage keeps indivisible.

use tracing::warn;

use crate::config::SplitterConfig;
use crate::SplitReport;

/// A region of source text that must never be split.
///
/// Positions are byte offsets into the source text; the reconcile stage
/// converts them to measured-unit offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProtectedSpan {
    /// Byte offset of the span start
    pub start: usize,
    /// Byte offset one past the span end
    pub end: usize,
    /// The protected text itself
    pub text: String,
}

/// Extract protected spans from `text`, sorted ascending by start and
/// mutually non-overlapping.
///
/// Matches are collected per pattern in configuration order, then sorted by
/// start ascending with longer matches first at equal starts; the sort is
/// stable, so pattern list order breaks any remaining tie. A sweep with a
/// `last_end` cursor keeps only matches starting at or after the furthest end
/// seen so far. Spans measuring at or above the chunk ceiling are dropped
/// from protection (they may legitimately be split downstream); the drop is
/// counted, and a discarded long match still suppresses shorter matches that
/// start inside it.
pub(crate) fn extract_protected(
    text: &str,
    config: &SplitterConfig,
    report: &mut SplitReport,
) -> Vec<ProtectedSpan> {
    let mut matches: Vec<(usize, usize)> = Vec::new();
    for pattern in &config.protected_patterns {
        for m in pattern.find_iter(text) {
            matches.push((m.start(), m.end()));
        }
    }

    matches.sort_by(|a, b| a.0.cmp(&b.0).then((b.1 - b.0).cmp(&(a.1 - a.0))));

    let mut spans = Vec::new();
    let mut last_end = 0usize;
    for (start, end) in matches {
        if start >= last_end {
            let length = config.measure(&text[start..end]);
            if length < config.chunk_size {
                spans.push(ProtectedSpan {
                    start,
                    end,
                    text: text[start..end].to_string(),
                });
            } else {
                warn!(
                    start,
                    length,
                    chunk_size = config.chunk_size,
                    "protected span exceeds chunk size, dropping from protection"
                );
                report.dropped_spans += 1;
            }
        }
        last_end = last_end.max(end);
    }

    spans
}
