//! Core types shared across the tristat workspace.
//!
//! Keeping these in their own crate lets the analysis engine and any
//! front end agree on the same value types without pulling in the engine's
//! concurrency stack:
//!
//! - **Triplet**: a packed, `Copy` three-character key
//! - **RankedEntry**: a (triplet, count) pair as produced by ranking
//! - **AnalyzerConfig**: worker pool and ranking options
//! - **AnalysisError**: failures surfaced by an analysis run

#![warn(missing_docs)]

use core::fmt;
use core::str::FromStr;

/// A triplet (three consecutive characters of a word) packed into a `u64`.
///
/// Each `char` fits in 21 bits, so the layout is
/// `(c0 << 42) | (c1 << 21) | c2`. This representation:
/// - Works as a hash map key without allocation
/// - Orders exactly like the three-character string it stands for
/// - Handles any Unicode letter, not only ASCII
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Triplet(u64);

impl Triplet {
    const CHAR_BITS: u32 = 21;
    const CHAR_MASK: u64 = (1 << Self::CHAR_BITS) - 1;

    /// Creates a triplet from three characters.
    #[inline(always)]
    pub const fn new(c0: char, c1: char, c2: char) -> Self {
        Self(
            ((c0 as u64) << (2 * Self::CHAR_BITS))
                | ((c1 as u64) << Self::CHAR_BITS)
                | (c2 as u64),
        )
    }

    /// Creates a triplet from three ASCII bytes.
    #[inline(always)]
    pub const fn from_ascii(b0: u8, b1: u8, b2: u8) -> Self {
        Self::new(b0 as char, b1 as char, b2 as char)
    }

    /// Returns the three characters of this triplet.
    #[inline]
    pub fn chars(self) -> [char; 3] {
        let unpack = |shift: u32| {
            let code = ((self.0 >> shift) & Self::CHAR_MASK) as u32;
            // Only ever packed from valid chars.
            char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
        };
        [unpack(2 * Self::CHAR_BITS), unpack(Self::CHAR_BITS), unpack(0)]
    }
}

impl fmt::Display for Triplet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.chars();
        write!(f, "{a}{b}{c}")
    }
}

/// Error returned when parsing a string that is not exactly three characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a triplet must be exactly 3 characters, got {length}")]
pub struct TripletParseError {
    /// Number of characters in the rejected input.
    pub length: usize,
}

impl FromStr for Triplet {
    type Err = TripletParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c), None) => Ok(Self::new(a, b, c)),
            _ => Err(TripletParseError {
                length: s.chars().count(),
            }),
        }
    }
}

/// A triplet together with its total number of occurrences.
///
/// Ranked sequences are ordered by `count` descending; how equal counts are
/// ordered depends on [`TieBreak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankedEntry {
    /// The triplet.
    pub triplet: Triplet,
    /// Occurrences across all words of the analyzed text.
    pub count: u64,
}

impl RankedEntry {
    /// Creates a new ranked entry.
    #[inline(always)]
    pub const fn new(triplet: Triplet, count: u64) -> Self {
        Self { triplet, count }
    }
}

impl fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.triplet, self.count)
    }
}

/// How entries with equal counts are ordered in a ranked sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Order in which each triplet first entered the frequency table.
    ///
    /// First insertion is decided by whichever worker reaches a triplet
    /// first, so tie order can differ between runs on the same text.
    #[default]
    FirstInserted,
    /// Lexicographic order of the triplet text. Fully deterministic.
    Lexicographic,
}

/// Analysis configuration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Number of worker threads in the aggregation pool.
    /// Default: number of logical CPUs.
    pub thread_count: usize,
    /// Number of words a worker takes from the shared queue at once.
    /// Default: 256
    pub chunk_size: usize,
    /// Number of entries kept by top-N selection.
    /// Default: 10
    pub top_n: usize,
    /// Ordering among entries with equal counts.
    pub tie_break: TieBreak,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            thread_count: num_cpus::get(),
            chunk_size: 256,
            top_n: 10,
            tie_break: TieBreak::FirstInserted,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a configuration whose ranking does not depend on scheduling.
    pub fn deterministic() -> Self {
        Self {
            tie_break: TieBreak::Lexicographic,
            ..Self::default()
        }
    }

    /// Returns a copy of this configuration with `thread_count` workers.
    pub const fn with_threads(self, thread_count: usize) -> Self {
        Self {
            thread_count,
            ..self
        }
    }

    /// Checks that the configuration can schedule work.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` for a zero thread count or a
    /// zero chunk size.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.thread_count == 0 {
            return Err(AnalysisError::InvalidConfig {
                reason: "thread_count must be at least 1",
            });
        }
        if self.chunk_size == 0 {
            return Err(AnalysisError::InvalidConfig {
                reason: "chunk_size must be at least 1",
            });
        }
        Ok(())
    }
}

/// Errors that can occur during an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// The configuration cannot be used to schedule work.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration.
        reason: &'static str,
    },
    /// A worker stopped for a reason unrelated to table contention.
    ///
    /// The frequency table is shared, so a torn worker leaves it in an
    /// undefined partial state; the whole run fails.
    #[error("aggregation failed: worker {worker} stopped: {reason}")]
    WorkerFailed {
        /// Index of the failed worker in the pool.
        worker: usize,
        /// Panic payload or other description of the failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplet_from_chars() {
        let t = Triplet::new('a', 'b', 'c');
        assert_eq!(t.chars(), ['a', 'b', 'c']);
        assert_eq!(t.to_string(), "abc");
    }

    #[test]
    fn triplet_from_ascii_matches_new() {
        assert_eq!(Triplet::from_ascii(b'x', b'y', b'z'), Triplet::new('x', 'y', 'z'));
    }

    #[test]
    fn triplet_unicode() {
        let t = Triplet::new('п', 'р', 'и');
        assert_eq!(t.to_string(), "при");

        let max = Triplet::new(char::MAX, char::MAX, char::MAX);
        assert_eq!(max.chars(), [char::MAX; 3]);
    }

    #[test]
    fn triplet_parse() {
        assert_eq!("abc".parse::<Triplet>(), Ok(Triplet::new('a', 'b', 'c')));
        assert_eq!("ёжз".parse::<Triplet>(), Ok(Triplet::new('ё', 'ж', 'з')));
        assert_eq!("ab".parse::<Triplet>(), Err(TripletParseError { length: 2 }));
        assert_eq!("abcd".parse::<Triplet>(), Err(TripletParseError { length: 4 }));
    }

    #[test]
    fn triplet_order_matches_string_order() {
        let words = ["abc", "abd", "aca", "baa", "zzz", "яяя", "ёёё"];
        for a in words {
            for b in words {
                let ta: Triplet = a.parse().unwrap();
                let tb: Triplet = b.parse().unwrap();
                assert_eq!(ta.cmp(&tb), a.cmp(b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn ranked_entry_display() {
        let e = RankedEntry::new(Triplet::new('a', 'a', 'a'), 2);
        assert_eq!(e.to_string(), "aaa=2");
    }

    #[test]
    fn default_config() {
        let c = AnalyzerConfig::default();
        assert!(c.thread_count >= 1);
        assert_eq!(c.chunk_size, 256);
        assert_eq!(c.top_n, 10);
        assert_eq!(c.tie_break, TieBreak::FirstInserted);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn deterministic_config() {
        let c = AnalyzerConfig::deterministic().with_threads(3);
        assert_eq!(c.tie_break, TieBreak::Lexicographic);
        assert_eq!(c.thread_count, 3);
    }

    #[test]
    fn validate_rejects_zero() {
        let c = AnalyzerConfig::default().with_threads(0);
        assert!(matches!(
            c.validate(),
            Err(AnalysisError::InvalidConfig { .. })
        ));

        let c = AnalyzerConfig {
            chunk_size: 0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(AnalysisError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn error_messages() {
        let e = AnalysisError::WorkerFailed {
            worker: 3,
            reason: "boom".into(),
        };
        assert_eq!(e.to_string(), "aggregation failed: worker 3 stopped: boom");
    }
}
