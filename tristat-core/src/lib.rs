//! Concurrent triplet frequency analysis.
//!
//! Counts the overlapping 3-character sequences ("triplets") of every word in
//! a text and ranks them by frequency:
//!
//! ```text
//! raw text ─► normalize ─► tokenize ─► aggregate (worker pool) ─► rank ─► top N
//! ```
//!
//! Aggregation is the only concurrent stage. All workers share one
//! [`FrequencyTable`](table::FrequencyTable) whose increment-or-insert is
//! atomic per key, so final counts never depend on scheduling. The order of
//! equal counts does, unless a lexicographic tie-break is configured.

pub mod aggregate;
pub mod analysis;
pub mod analyzer;
pub mod rank;
pub mod stats;
pub mod table;

pub use analysis::{Analysis, TripletAnalyzer};
pub use stats::AnalysisStats;
pub use tristat_types::{AnalysisError, AnalyzerConfig, RankedEntry, TieBreak, Triplet};
