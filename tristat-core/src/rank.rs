//! Ranking and top-N selection.

use std::cmp::Reverse;

use tristat_types::{RankedEntry, TieBreak};

use crate::table::FrozenTable;

/// Orders the table's entries by count, descending.
///
/// With [`TieBreak::FirstInserted`] equal counts keep the table's
/// first-insertion order. This relies on the sort being stable; since
/// insertion order depends on thread scheduling, so does tie order.
/// [`TieBreak::Lexicographic`] orders ties by triplet text instead.
pub fn rank(table: FrozenTable, tie_break: TieBreak) -> Vec<RankedEntry> {
    let mut ranked: Vec<RankedEntry> = table
        .into_iter()
        .map(|(triplet, count)| RankedEntry::new(triplet, count))
        .collect();

    match tie_break {
        TieBreak::FirstInserted => ranked.sort_by_key(|entry| Reverse(entry.count)),
        TieBreak::Lexicographic => ranked.sort_unstable_by(|a, b| {
            b.count.cmp(&a.count).then_with(|| a.triplet.cmp(&b.triplet))
        }),
    }

    ranked
}

/// Returns the first `min(n, ranked.len())` entries.
#[inline]
pub fn top_n(ranked: &[RankedEntry], n: usize) -> &[RankedEntry] {
    &ranked[..n.min(ranked.len())]
}

/// Renders the triplets of `entries` separated by commas.
///
/// ```
/// use tristat_core::rank::join_triplets;
/// use tristat_types::RankedEntry;
///
/// let entries = [
///     RankedEntry::new("the".parse().unwrap(), 9),
///     RankedEntry::new("and".parse().unwrap(), 4),
/// ];
/// assert_eq!(join_triplets(&entries), "the,and");
/// ```
pub fn join_triplets(entries: &[RankedEntry]) -> String {
    let mut out = String::with_capacity(entries.len() * 4);
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        for c in entry.triplet.chars() {
            out.push(c);
        }
    }
    out
}
