//! Merging reconciled fragments into overlapping chunks
//!
//! Accumulates fragments into chunks up to the configured ceiling, carries a
//! trailing-overlap window into each new chunk, and re-injects active header
//! text at chunk boundaries.

use std::collections::VecDeque;

use tracing::warn;

use crate::config::SplitterConfig;
use crate::header::HeaderTracker;
use crate::SplitReport;

/// A caller-visible chunk of the source text.
///
/// Positions are measured in the configured length units (code points by
/// default). Chunks are emitted in non-decreasing `start` order; header
/// injection can widen the visible span beyond the measured content length.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
    /// Unit offset of the first fragment in this chunk
    pub start: usize,
    /// Unit offset one past the last fragment in this chunk
    pub end: usize,
    /// The chunk text
    pub content: String,
}

/// One accumulated fragment with its unit position
struct ChunkPart {
    start: usize,
    end: usize,
    text: String,
}

fn close_chunk(parts: &VecDeque<ChunkPart>) -> Chunk {
    let content: String = parts.iter().map(|part| part.text.as_str()).collect();
    Chunk {
        start: parts.front().map_or(0, |part| part.start),
        end: parts.back().map_or(0, |part| part.end),
        content,
    }
}

/// Merge reconciled fragments into the final chunk sequence.
///
/// For each fragment: update the header tracker, then, if appending the
/// fragment (plus any active header text) would exceed the ceiling, close the
/// accumulator into a chunk and evict parts from its front until the carried
/// length fits both the overlap window and the incoming fragment. When the
/// eviction empties the accumulator entirely the next chunk simply starts
/// oversized. Active headers that fit the budget and are not already present
/// in the incoming fragment are prepended as a synthetic part whose position
/// is back-dated so chunk ordering is undisturbed.
pub(crate) fn merge(
    fragments: &[String],
    config: &SplitterConfig,
    tracker: &mut HeaderTracker<'_>,
    report: &mut SplitReport,
) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut parts: VecDeque<ChunkPart> = VecDeque::new();
    let mut run_len = 0usize;
    let mut cur_start = 0usize;

    for fragment in fragments {
        let frag_len = config.measure(fragment);
        let cur_end = cur_start + frag_len;

        if frag_len > config.chunk_size {
            warn!(
                length = frag_len,
                chunk_size = config.chunk_size,
                "fragment exceeds chunk size"
            );
            report.oversized_fragments += 1;
        }

        tracker.update(fragment);
        let mut headers = tracker.active_headers();
        let mut headers_len = config.measure(&headers);
        if headers_len > config.chunk_size {
            warn!(
                length = headers_len,
                chunk_size = config.chunk_size,
                "active headers exceed chunk size, skipping injection"
            );
            report.oversized_headers += 1;
            headers.clear();
            headers_len = 0;
        }

        if run_len + frag_len + headers_len > config.chunk_size {
            if !parts.is_empty() {
                chunks.push(close_chunk(&parts));
            }

            // Evict from the front until what remains fits the overlap
            // window together with the incoming fragment and headers.
            while !parts.is_empty()
                && (run_len > config.chunk_overlap
                    || run_len + frag_len + headers_len > config.chunk_size)
            {
                if let Some(front) = parts.pop_front() {
                    run_len -= config.measure(&front.text);
                }
            }

            if !headers.is_empty()
                && frag_len + headers_len < config.chunk_size
                && !fragment.contains(&headers)
            {
                let next_start = parts.front().map_or(cur_start, |part| part.start);
                let header_start = next_start.saturating_sub(headers_len);
                parts.push_front(ChunkPart {
                    start: header_start,
                    end: cur_end,
                    text: headers.clone(),
                });
                run_len += headers_len;
            }
        }

        parts.push_back(ChunkPart {
            start: cur_start,
            end: cur_end,
            text: fragment.clone(),
        });
        run_len += frag_len;
        cur_start = cur_end;
    }

    if !parts.is_empty() {
        chunks.push(close_chunk(&parts));
    }

    chunks
}
