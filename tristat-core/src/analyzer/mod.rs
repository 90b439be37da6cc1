//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Cleans raw text down to lower-case letters and single spaces
//! - **Tokenizer**: Splits normalized text into words
//! - **Triplet**: Extracts overlapping 3-character sequences from a word

pub mod normalizer;
pub mod tokenizer;
pub mod triplet;

pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use tokenizer::Tokenizer;
pub use triplet::{count_triplets, extract_triplets, is_word, Triplets};
