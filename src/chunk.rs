//! Separator-priority text chunker with overlap.
//!
//! Splits the extracted blob into retrieval-sized chunks. Splitting prefers
//! the highest-priority separator present (paragraph break, then line break,
//! then sentence punctuation, then space), recursing to the next separator
//! for any fragment still over the limit. Fragments with no usable separator
//! are cut at character boundaries. Fragments are then merged greedily up to
//! `max_chars`, carrying a tail of up to `overlap_chars` into the next chunk
//! so local context survives chunk boundaries.
//!
//! Separators stay attached to the fragment they terminate, so sentences
//! keep their punctuation and every emitted chunk is a contiguous substring
//! of the source text.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::PipelineError;

/// Split priority, highest first. The empty last resort is a character cut.
const SEPARATORS: [&str; 6] = ["\n\n", "\n", ".", "!", "?", " "];

/// Split `text` into ordered, trimmed, non-empty chunks of at most
/// `max_chars` bytes, adjacent chunks sharing up to `overlap_chars` of
/// context. Empty input yields no chunks.
pub fn split_text(
    text: &str,
    max_chars: usize,
    overlap_chars: usize,
) -> Result<Vec<String>, PipelineError> {
    if max_chars == 0 {
        return Err(PipelineError::Chunking("max_chars must be > 0".into()));
    }
    let overlap = overlap_chars.min(max_chars - 1);

    let mut fragments = Vec::new();
    split_recursive(text, &SEPARATORS, max_chars, &mut fragments);

    let chunks = merge_fragments(&fragments, max_chars, overlap);
    debug!(
        input_chars = text.len(),
        fragments = fragments.len(),
        chunks = chunks.len(),
        "split text"
    );
    Ok(chunks)
}

/// Recursively split `text` into fragments no longer than `max_chars`,
/// preferring the first separator that occurs in the text and falling back
/// to per-character slices when none does.
fn split_recursive<'a>(
    text: &'a str,
    separators: &[&str],
    max_chars: usize,
    out: &mut Vec<&'a str>,
) {
    if text.is_empty() {
        return;
    }
    if text.len() <= max_chars {
        out.push(text);
        return;
    }

    let found = separators
        .iter()
        .position(|sep| text.contains(sep));

    match found {
        Some(i) => {
            let remaining = &separators[i + 1..];
            for piece in split_keep_separator(text, separators[i]) {
                if piece.len() <= max_chars {
                    out.push(piece);
                } else {
                    split_recursive(piece, remaining, max_chars, out);
                }
            }
        }
        None => {
            // No separator left: emit per-character slices; the merge pass
            // turns these into sliding windows of stride max - overlap.
            let mut prev = 0;
            for (idx, _) in text.char_indices().skip(1) {
                out.push(&text[prev..idx]);
                prev = idx;
            }
            out.push(&text[prev..]);
        }
    }
}

/// Split on `sep`, keeping the separator attached to the preceding piece.
fn split_keep_separator<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while let Some(pos) = text[start..].find(sep) {
        let end = start + pos + sep.len();
        pieces.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Greedily pack fragments into chunks of at most `max_chars`, retaining a
/// trailing window of up to `overlap` as the seed of the next chunk.
/// Whitespace-only chunks are dropped; emitted chunks are trimmed.
fn merge_fragments(fragments: &[&str], max_chars: usize, overlap: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut window: VecDeque<&str> = VecDeque::new();
    let mut total = 0usize;

    for &frag in fragments {
        if total > 0 && total + frag.len() > max_chars {
            emit(&window, &mut chunks);
            // Shrink until within the overlap budget and the new fragment fits.
            while total > 0 && (total > overlap || total + frag.len() > max_chars) {
                match window.pop_front() {
                    Some(dropped) => total -= dropped.len(),
                    None => break,
                }
            }
        }
        window.push_back(frag);
        total += frag.len();
    }
    emit(&window, &mut chunks);

    chunks
}

fn emit(window: &VecDeque<&str>, chunks: &mut Vec<String>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_text("", 1500, 150).unwrap().is_empty());
    }

    #[test]
    fn whitespace_only_text_yields_no_chunks() {
        assert!(split_text("  \n\n \t ", 1500, 150).unwrap().is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split_text("Hello world. This is page one.", 1500, 150).unwrap();
        assert_eq!(chunks, vec!["Hello world. This is page one."]);
    }

    #[test]
    fn zero_max_chars_is_a_chunking_error() {
        let err = split_text("abc", 0, 0).unwrap_err();
        assert!(matches!(err, PipelineError::Chunking(_)));
    }

    #[test]
    fn unbroken_run_becomes_sliding_windows() {
        // 3600 chars without any separator: windows [0:1500], [1350:2850],
        // [2700:3600] with a 150-char shared region.
        let text: String = "abcdefgh"
            .chars()
            .cycle()
            .take(3600)
            .collect();
        let chunks = split_text(&text, 1500, 150).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], &text[0..1500]);
        assert_eq!(chunks[1], &text[1350..2850]);
        assert_eq!(chunks[2], &text[2700..3600]);
        assert_eq!(&chunks[1][..150], &chunks[0][1350..]);
        assert_eq!(&chunks[2][..150], &chunks[1][1350..]);
    }

    #[test]
    fn every_chunk_is_within_bounds_and_non_empty() {
        let text: String = (0..200)
            .map(|i| format!("Sentence number {} has a little padding text.", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_text(&text, 300, 60).unwrap();
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(!chunk.trim().is_empty());
            assert!(chunk.len() <= 300, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn paragraph_breaks_are_preferred_over_mid_sentence_cuts() {
        let para_a = "Alpha beta gamma delta epsilon. ".repeat(4);
        let para_b = "Zeta eta theta iota kappa lambda. ".repeat(4);
        let text = format!("{}\n\n{}", para_a.trim(), para_b.trim());
        // Each paragraph fits in a chunk on its own; no overlap requested.
        let chunks = split_text(&text, 160, 0).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], para_a.trim());
        assert_eq!(chunks[1], para_b.trim());
    }

    #[test]
    fn chunks_are_ordered_substrings_of_the_source() {
        let text: String = (0..120)
            .map(|i| format!("Paragraph {} talks about topic {}.", i, i % 7))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = split_text(&text, 200, 40).unwrap();

        let mut search_from = 0;
        for chunk in &chunks {
            let pos = text[search_from..]
                .find(chunk.as_str())
                .map(|p| p + search_from)
                .unwrap_or_else(|| panic!("chunk not found in source: {chunk:?}"));
            // Strictly advancing start positions preserve source order.
            assert!(pos >= search_from);
            search_from = pos + 1;
        }
        // The final chunk reaches the end of the source text.
        let last = chunks.last().unwrap();
        assert!(text.trim_end().ends_with(last.as_str()));
    }

    #[test]
    fn adjacent_chunks_share_trailing_context() {
        // Sentences shorter than the overlap budget, so the carry is always
        // at least one whole sentence.
        let text: String = (0..80)
            .map(|i| format!("Fact {:03} is recorded here.", i))
            .collect::<Vec<_>>()
            .join(" ");
        let chunks = split_text(&text, 240, 80).unwrap();
        assert!(chunks.len() > 2);
        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let shared = (1..=prev.len())
                .rev()
                .any(|n| next.starts_with(prev[prev.len() - n..].trim_start()));
            assert!(shared, "no shared context between {prev:?} and {next:?}");
        }
    }

    #[test]
    fn splitting_is_deterministic() {
        let text: String = (0..60)
            .map(|i| format!("Line {} of the report.\n", i))
            .collect();
        let a = split_text(&text, 180, 30).unwrap();
        let b = split_text(&text, 180, 30).unwrap();
        assert_eq!(a, b);
    }
}
