//! Statistics for one analysis run.

use std::time::Duration;

/// A snapshot of what an analysis run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisStats {
    /// Number of words aggregated.
    pub words: usize,
    /// Total triplet occurrences (sum of all counts).
    pub triplets: u64,
    /// Number of distinct triplets.
    pub distinct: usize,
    /// Insertion races recovered by local retry.
    pub conflicts: u64,
    /// Worker threads used.
    pub workers: usize,
    /// Wall time spent aggregating and ranking.
    pub elapsed: Duration,
}

impl AnalysisStats {
    /// Average occurrences per distinct triplet.
    pub fn mean_count(&self) -> f64 {
        if self.distinct == 0 {
            0.0
        } else {
            self.triplets as f64 / self.distinct as f64
        }
    }
}

impl core::fmt::Display for AnalysisStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} words, {} triplets ({} distinct), {} workers, {} retried conflicts, {:.3} ms",
            self.words,
            self.triplets,
            self.distinct,
            self.workers,
            self.conflicts,
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnalysisStats {
        AnalysisStats {
            words: 3,
            triplets: 8,
            distinct: 4,
            conflicts: 1,
            workers: 2,
            elapsed: Duration::from_micros(1500),
        }
    }

    #[test]
    fn mean_count() {
        assert_eq!(sample().mean_count(), 2.0);

        let empty = AnalysisStats {
            triplets: 0,
            distinct: 0,
            ..sample()
        };
        assert_eq!(empty.mean_count(), 0.0);
    }

    #[test]
    fn display() {
        assert_eq!(
            sample().to_string(),
            "3 words, 8 triplets (4 distinct), 2 workers, 1 retried conflicts, 1.500 ms"
        );
    }
}
