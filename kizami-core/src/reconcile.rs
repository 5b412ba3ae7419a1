//! Reconciling split fragments with protected spans
//!
//! Fragments are positioned on the code-point grid while protected spans
//! carry byte offsets from pattern matching, so this stage first converts
//! every span into code-point space and then sweeps the fragment list once,
//! re-emitting each span as a single indivisible fragment even when it
//! straddles fragment boundaries. The ordered concatenation of the output
//! equals the input text exactly.

use crate::protected::ProtectedSpan;

/// Count code points in the text prefix up to `byte_offset`.
///
/// Clamped to the text length and rounded down to the nearest character
/// boundary, so malformed offsets cannot panic.
pub(crate) fn unit_offset(text: &str, byte_offset: usize) -> usize {
    let mut index = byte_offset.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    text[..index].chars().count()
}

/// A protected span on the code-point grid
struct UnitSpan {
    start: usize,
    end: usize,
    text: String,
}

/// Merge `fragments` with `spans` so that no protected span straddles a
/// fragment boundary.
///
/// Walks the fragment list with a code-point cursor. For each fragment, any
/// text before the next pending span is emitted as-is, the span text is
/// emitted as one atomic fragment, and the cursor advances past the span end,
/// consuming into subsequent fragments when the span reaches beyond the
/// current one. With no spans the fragment list is returned untouched.
pub(crate) fn reconcile(fragments: Vec<String>, spans: &[ProtectedSpan]) -> Vec<String> {
    if spans.is_empty() {
        return fragments;
    }

    let text: String = fragments.concat();
    let unit_spans: Vec<UnitSpan> = spans
        .iter()
        .map(|span| UnitSpan {
            start: unit_offset(&text, span.start),
            end: unit_offset(&text, span.end),
            text: span.text.clone(),
        })
        .collect();

    let mut result = Vec::new();
    let mut next_span = 0;
    // Cursor over consumed text and the current fragment's start, both in
    // code points.
    let mut point = 0usize;
    let mut start = 0usize;

    for fragment in &fragments {
        let chars: Vec<char> = fragment.chars().collect();
        let end = start + chars.len();

        // The unconsumed tail of this fragment; empty when a span from an
        // earlier fragment already consumed past its end.
        let consumed = point.saturating_sub(start);
        let mut rest: &[char] = if consumed < chars.len() {
            &chars[consumed..]
        } else {
            &[]
        };

        while next_span < unit_spans.len() {
            let span = &unit_spans[next_span];
            if end <= span.start {
                break;
            }

            // Emit fragment text that precedes the span.
            if point < span.start {
                let before_len = span.start - point;
                if before_len > 0 && before_len <= rest.len() {
                    let before: String = rest[..before_len].iter().collect();
                    if !before.is_empty() {
                        result.push(before);
                    }
                    rest = &rest[before_len..];
                }
                point = span.start;
            }

            // Emit the span atomically, then skip the text it covers, which
            // may extend past this fragment.
            if point == span.start {
                result.push(span.text.clone());
                next_span += 1;
            } else if point > span.start {
                // A span starting before the cursor violates the extractor's
                // non-overlap invariant; drop it rather than stall the sweep.
                next_span += 1;
                continue;
            }
            if point < span.end {
                let covered = span.end - point;
                if covered >= rest.len() {
                    rest = &[];
                } else {
                    rest = &rest[covered..];
                }
                point = span.end;
            }

            if rest.is_empty() {
                break;
            }
        }

        if !rest.is_empty() {
            result.push(rest.iter().collect());
            point = end;
        }

        start = end;
    }

    result
}
