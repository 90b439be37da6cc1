//! Streaming Tokenizer Module
//!
//! Splits normalized text into words. It is the stage between the normalizer
//! and the aggregator: given `"hello world foo"` it emits
//!
//! ```ignore
//! ("hello", 0)
//! ("world", 1)
//! ("foo", 2)
//! ```
//!
//! ## Key Features
//!
//! - **Zero Allocation**: words are slices of the input, not new strings
//! - **Streaming**: words are emitted through a callback
//! - **Fast**: `memchr` scan for the ASCII space (0x20)
//!
//! ## The Input Contract
//!
//! Input is expected to come from [`TextNormalizer`](super::TextNormalizer):
//! lower-case letters separated by single spaces. Input that breaks the
//! contract is still split safely; empty runs between consecutive spaces are
//! skipped, since an empty word carries no triplets.

use memchr::memchr_iter;

/// Streaming tokenizer. Splits normalized text on ASCII spaces.
///
/// ## Example
///
/// ```
/// use tristat_core::analyzer::tokenizer::Tokenizer;
///
/// let mut count = 0;
/// Tokenizer::new().tokenize("hello world foo", |_word, _pos| count += 1);
/// assert_eq!(count, 3);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits `(word, position)`.
    ///
    /// Position is `u32`. After emitting a word at position `u32::MAX`,
    /// further emissions stop.
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        tokenize_through(normalized, u32::MAX, emit);
    }

    /// Collects all words of `normalized` in order.
    ///
    /// Unlike [`tokenize`](Self::tokenize) this carries no positions, so it
    /// has no word limit.
    pub fn words<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut words = Vec::with_capacity(normalized.len() / 6 + 1);
        split_words(normalized, |word| {
            words.push(word);
            true
        });
        words
    }
}

/// Emits words with positions `0..=last`, then stops.
#[inline(always)]
fn tokenize_through<'n, F>(normalized: &'n str, last: u32, mut emit: F)
where
    F: FnMut(&'n str, u32),
{
    let mut pos = 0u32;
    split_words(normalized, |word| {
        emit(word, pos);
        if pos == last {
            return false;
        }
        pos += 1;
        true
    });
}

/// Feeds every non-empty space-separated run to `emit` until it returns
/// `false`.
#[inline(always)]
fn split_words<'n, F>(normalized: &'n str, mut emit: F)
where
    F: FnMut(&'n str) -> bool,
{
    let bytes = normalized.as_bytes();
    let mut start = 0usize;

    for i in memchr_iter(b' ', bytes) {
        // An ASCII space is never part of a multi-byte sequence, so both
        // ends are char boundaries.
        if start < i && !emit(&normalized[start..i]) {
            return;
        }
        start = i + 1;
    }

    if start < bytes.len() {
        emit(&normalized[start..]);
    }
}
