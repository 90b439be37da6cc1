//! Triplet extraction module.
//!
//! A triplet is three consecutive characters of a word. Extraction walks a
//! sliding window over the word's characters (not its bytes), so Cyrillic
//! and other non-ASCII words produce the same number of triplets as an ASCII
//! word of the same length.
//!
//! A word holding anything other than letters (digits, punctuation, symbols)
//! is malformed and yields no triplets at all.

use tristat_types::Triplet;

use super::normalizer::is_word_char;

/// Lazy sliding-window iterator over the triplets of one word.
///
/// Clone before consuming to walk the same sequence again, or call
/// [`extract_triplets`] a second time. The iterator is fused.
#[derive(Debug, Clone)]
pub struct Triplets<'w> {
    rest: &'w str,
}

impl Iterator for Triplets<'_> {
    type Item = Triplet;

    #[inline]
    fn next(&mut self) -> Option<Triplet> {
        let mut chars = self.rest.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c)) => {
                self.rest = &self.rest[a.len_utf8()..];
                Some(Triplet::new(a, b, c))
            }
            _ => {
                self.rest = "";
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = self.rest.len().saturating_sub(2);
        let lower = if self.rest.is_ascii() { upper } else { 0 };
        (lower, Some(upper))
    }
}

impl core::iter::FusedIterator for Triplets<'_> {}

/// Returns the triplets of `word` in left-to-right order.
///
/// Words shorter than 3 characters and malformed words yield nothing; any
/// other word of N characters yields exactly N-2 triplets.
///
/// # Example
///
/// ```
/// use tristat_core::analyzer::triplet::extract_triplets;
///
/// let triplets: Vec<String> = extract_triplets("hello").map(|t| t.to_string()).collect();
/// assert_eq!(triplets, ["hel", "ell", "llo"]);
/// ```
#[inline(always)]
pub fn extract_triplets(word: &str) -> Triplets<'_> {
    Triplets {
        rest: if is_word(word) { word } else { "" },
    }
}

/// Returns `true` if every character of `word` is a letter.
#[inline]
pub fn is_word(word: &str) -> bool {
    if word.is_ascii() {
        word.bytes().all(|b| b.is_ascii_alphabetic())
    } else {
        word.chars().all(is_word_char)
    }
}

/// Counts triplets without extracting them.
///
/// Returns 0 for words shorter than 3 characters and for malformed words.
#[inline(always)]
pub fn count_triplets(word: &str) -> usize {
    if !is_word(word) {
        return 0;
    }
    let len = if word.is_ascii() {
        word.len()
    } else {
        word.chars().count()
    };
    len.saturating_sub(2)
}
