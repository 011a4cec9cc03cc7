//! Text chunking for TTS processing.
//!
//! Chunks are cut at a fixed character count. Cuts may land mid-word or
//! mid-sentence, which can be audible at chunk seams; sentence-aware
//! splitting is not attempted.

use super::TextChunk;
use std::num::NonZeroUsize;

/// Default maximum chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 3000;

/// Split text into chunks of exactly `max_len` characters (the last may be shorter).
///
/// Lengths are counted in `char`s, so a cut never splits a UTF-8 sequence.
/// Concatenating the result in order gives back `text`; empty text gives no chunks.
pub fn chunk_text(text: &str, max_len: NonZeroUsize) -> Vec<String> {
    let max_len = max_len.get();
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_len {
            chunks.push(text[start..idx].to_string());
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(text[start..].to_string());
    }

    chunks
}

/// Split a document's text into indexed chunks.
pub fn split_document(text: &str, max_len: NonZeroUsize) -> Vec<TextChunk> {
    chunk_text(text, max_len)
        .into_iter()
        .enumerate()
        .map(|(index, text)| TextChunk::new(index, text))
        .collect()
}
