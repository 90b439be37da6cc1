//! Analysis entry point.
//!
//! [`TripletAnalyzer`] wires the pipeline together: tokenize the normalized
//! text, aggregate triplets across the worker pool, rank the frozen table.

use std::time::Instant;

use tracing::info;
use tristat_types::{AnalysisError, AnalyzerConfig, RankedEntry, Triplet};

use crate::aggregate::Aggregator;
use crate::analyzer::normalizer::{NormalizerConfig, TextNormalizer};
use crate::analyzer::tokenizer::Tokenizer;
use crate::rank::{join_triplets, rank, top_n};
use crate::stats::AnalysisStats;

/// Concurrent triplet frequency analyzer.
///
/// An analyzer holds no per-run state; every call builds, fills, and
/// discards its own frequency table, so one analyzer can serve many runs.
///
/// # Example
///
/// ```
/// use tristat_core::TripletAnalyzer;
/// use tristat_types::AnalyzerConfig;
///
/// let analyzer = TripletAnalyzer::new(AnalyzerConfig::deterministic()).unwrap();
/// let analysis = analyzer.analyze("abcabc aaaa").unwrap();
///
/// assert_eq!(analysis.render(), "aaa,abc,bca,cab");
/// assert_eq!(analysis.stats().triplets, 6);
/// ```
#[derive(Debug, Clone)]
pub struct TripletAnalyzer {
    config: AnalyzerConfig,
    aggregator: Aggregator,
    normalizer: TextNormalizer,
    tokenizer: Tokenizer,
}

impl TripletAnalyzer {
    /// Creates an analyzer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` for a zero thread count or
    /// chunk size.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        Ok(Self {
            aggregator: Aggregator::new(&config)?,
            config,
            normalizer: TextNormalizer::default(),
            tokenizer: Tokenizer::new(),
        })
    }

    /// Replaces the normalizer used by [`analyze_raw`](Self::analyze_raw).
    pub fn with_normalizer(self, config: NormalizerConfig) -> Self {
        Self {
            normalizer: TextNormalizer::new(config),
            ..self
        }
    }

    /// Analyzes already normalized text (lower-case letters, single spaces).
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::WorkerFailed` if aggregation fails.
    pub fn analyze(&self, normalized: &str) -> Result<Analysis, AnalysisError> {
        let words = self.tokenizer.words(normalized);
        self.analyze_words(&words)
    }

    /// Normalizes raw text, then analyzes it.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::WorkerFailed` if aggregation fails.
    pub fn analyze_raw(&self, raw: &str) -> Result<Analysis, AnalysisError> {
        let normalized = self.normalizer.normalize(raw);
        self.analyze(&normalized)
    }

    /// Analyzes a pre-split word list.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::WorkerFailed` if aggregation fails.
    pub fn analyze_words<S>(&self, words: &[S]) -> Result<Analysis, AnalysisError>
    where
        S: AsRef<str> + Sync,
    {
        let started = Instant::now();
        let aggregation = self.aggregator.aggregate(words)?;

        let distinct = aggregation.table.len();
        let triplets = aggregation.table.total();
        let ranked = rank(aggregation.table, self.config.tie_break);

        let stats = AnalysisStats {
            words: aggregation.words,
            triplets,
            distinct,
            conflicts: aggregation.conflicts,
            workers: aggregation.workers,
            elapsed: started.elapsed(),
        };
        info!(%stats, "analysis complete");

        Ok(Analysis {
            ranked,
            top_n: self.config.top_n,
            stats,
        })
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct Analysis {
    ranked: Vec<RankedEntry>,
    top_n: usize,
    stats: AnalysisStats,
}

impl Analysis {
    /// Every distinct triplet, by count descending.
    pub fn ranked(&self) -> &[RankedEntry] {
        &self.ranked
    }

    /// The configured number of top entries.
    pub fn top(&self) -> &[RankedEntry] {
        top_n(&self.ranked, self.top_n)
    }

    /// The first `n` entries.
    pub fn top_n(&self, n: usize) -> &[RankedEntry] {
        top_n(&self.ranked, n)
    }

    /// Total occurrences of `triplet`, if it appeared at all.
    pub fn count(&self, triplet: Triplet) -> Option<u64> {
        self.ranked
            .iter()
            .find(|entry| entry.triplet == triplet)
            .map(|entry| entry.count)
    }

    /// Top entries rendered as a comma-joined line of triplets.
    pub fn render(&self) -> String {
        join_triplets(self.top())
    }

    /// Statistics for this run.
    pub fn stats(&self) -> &AnalysisStats {
        &self.stats
    }

    /// Consumes the analysis and returns the full ranked sequence.
    pub fn into_ranked(self) -> Vec<RankedEntry> {
        self.ranked
    }
}
