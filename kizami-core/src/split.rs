//! Recursive separator-ladder splitting
//!
//! Breaks oversized text into fragments no larger than the chunk ceiling by
//! trying each configured separator in priority order and recursing into any
//! piece that is still too large. The empty separator is the per-character
//! terminal strategy. Concatenating the returned fragments always reproduces
//! the input exactly.

use tracing::warn;

use crate::config::SplitterConfig;
use crate::SplitReport;

/// Split `text` into fragments measuring at most `chunk_size` units each.
///
/// A fragment that no strategy can subdivide (a single character wider than
/// the ceiling under the configured length function) is emitted oversized and
/// counted in the report.
pub(crate) fn recursive_split(
    text: &str,
    config: &SplitterConfig,
    report: &mut SplitReport,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if config.measure(text) <= config.chunk_size {
        return vec![text.to_string()];
    }

    let mut pieces = Vec::new();
    for separator in &config.separators {
        pieces = split_with_separator(text, separator);
        if pieces.len() > 1 {
            break;
        }
    }
    // Terminal fallback for separator lists without the empty separator.
    if pieces.len() <= 1 {
        pieces = split_chars(text);
    }
    if pieces.len() <= 1 {
        warn!(
            length = config.measure(text),
            chunk_size = config.chunk_size,
            "unsplittable fragment exceeds chunk size"
        );
        report.unsplittable_fragments += 1;
        return vec![text.to_string()];
    }

    let mut fragments = Vec::with_capacity(pieces.len());
    for piece in pieces {
        if config.measure(&piece) <= config.chunk_size {
            fragments.push(piece);
        } else {
            fragments.extend(recursive_split(&piece, config, report));
        }
    }
    fragments
}

/// Split at every separator occurrence, re-prepending the separator to every
/// piece except the first and discarding empty pieces.
///
/// Returns at most one piece when the separator never occurs, which the
/// caller treats as strategy failure.
fn split_with_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return split_chars(text);
    }

    let mut pieces = Vec::new();
    for (i, part) in text.split(separator).enumerate() {
        let piece = if i == 0 {
            part.to_string()
        } else {
            format!("{separator}{part}")
        };
        if !piece.is_empty() {
            pieces.push(piece);
        }
    }
    pieces
}

fn split_chars(text: &str) -> Vec<String> {
    text.chars().map(String::from).collect()
}
