//! Property tests for the lossless-reconstruction invariant

use kizami_core::{SplitterConfig, TextSplitter};
use proptest::prelude::*;

proptest! {
    /// The reconciled fragment list always re-concatenates to the input,
    /// byte for byte, for arbitrary unicode text.
    #[test]
    fn reconciled_fragments_reproduce_the_input(text in "\\PC{0,400}") {
        let splitter = TextSplitter::new(32, 8).unwrap();
        let fragments = splitter.reconciled_fragments(&text);
        prop_assert_eq!(fragments.concat(), text);
    }

    /// Markdown-flavoured text exercises the protected patterns and header
    /// rules; the round-trip flag must still hold.
    #[test]
    fn markdown_like_text_round_trips(
        words in proptest::collection::vec("[a-z]{1,8}", 0..40),
        link_target in "[a-z]{1,12}",
    ) {
        let mut text = words.join(" ");
        text.push_str(&format!(" [label]({link_target}) tail"));
        let splitter = TextSplitter::new(24, 6).unwrap();
        let (chunks, report) = splitter.split_text_with_report(&text);
        prop_assert!(report.round_trip_ok);
        prop_assert!(!chunks.is_empty());
    }

    /// Boundary arithmetic stays ordered for any size/overlap pair with
    /// overlap below the ceiling.
    #[test]
    fn chunk_starts_never_decrease(
        text in "[a-zA-Z \n]{0,300}",
        chunk_size in 4usize..64,
        overlap_frac in 0usize..4,
    ) {
        let chunk_overlap = chunk_size * overlap_frac / 4;
        let config = SplitterConfig::builder()
            .chunk_size(chunk_size)
            .chunk_overlap(chunk_overlap)
            .build()
            .unwrap();
        let chunks = TextSplitter::with_config(config).split_text(&text);
        for pair in chunks.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
    }
}
