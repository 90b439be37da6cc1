//! Shared frequency table.
//!
//! Memory Layout:
//! - Entries live in a sharded `DashMap`; each shard has its own `RwLock`
//! - A count is an `AtomicU64`, so increments only need the shard's read lock
//! - First insertion takes the shard's write lock and stamps a global
//!   sequence number, which later gives the table its insertion order
//!
//! Threading:
//! - [`FrequencyTable`] is `Sync`; every mutation goes through
//!   [`FrequencyTable::increment`], which is atomic per key.
//! - [`FrozenTable`] is the read-only result once all writers are done.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashMap};
use tracing::trace;
use tristat_types::Triplet;

#[derive(Debug)]
struct Slot {
    count: AtomicU64,
    seq: u64,
}

/// Another writer inserted the key between our lookup and our insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InsertConflict;

/// Concurrent mapping from triplet to occurrence count.
#[derive(Debug)]
pub struct FrequencyTable {
    slots: DashMap<Triplet, Slot, FxBuildHasher>,
    next_seq: AtomicU64,
    conflicts: AtomicU64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty table with room for `capacity` distinct triplets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            next_seq: AtomicU64::new(0),
            conflicts: AtomicU64::new(0),
        }
    }

    /// Increments the count of `triplet`, inserting it with count 1 if absent.
    ///
    /// Safe to call from any number of threads at once. A lost race on first
    /// insertion is retried here for this triplet only and never reported.
    #[inline]
    pub fn increment(&self, triplet: Triplet) {
        loop {
            if let Some(slot) = self.slots.get(&triplet) {
                slot.count.fetch_add(1, Ordering::Relaxed);
                return;
            }

            match self.try_insert(triplet) {
                Ok(()) => return,
                Err(InsertConflict) => {
                    self.conflicts.fetch_add(1, Ordering::Relaxed);
                    trace!(%triplet, "first insertion raced, retrying increment");
                }
            }
        }
    }

    fn try_insert(&self, triplet: Triplet) -> Result<(), InsertConflict> {
        match self.slots.entry(triplet) {
            Entry::Occupied(_) => Err(InsertConflict),
            Entry::Vacant(vacant) => {
                // Stamped under the shard's write lock, so no two keys share a seq.
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                vacant.insert(Slot {
                    count: AtomicU64::new(1),
                    seq,
                });
                Ok(())
            }
        }
    }

    /// Returns the current count of `triplet`, if present.
    pub fn get(&self, triplet: Triplet) -> Option<u64> {
        self.slots
            .get(&triplet)
            .map(|slot| slot.count.load(Ordering::Relaxed))
    }

    /// Number of distinct triplets.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing has been inserted.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of insertion races recovered by retrying.
    pub fn conflicts(&self) -> u64 {
        self.conflicts.load(Ordering::Relaxed)
    }

    /// Consumes the table and returns its entries in first-insertion order.
    ///
    /// Taking `self` by value guarantees no writer is still running.
    pub fn freeze(self) -> FrozenTable {
        let mut entries: Vec<(u64, Triplet, u64)> = self
            .slots
            .into_iter()
            .map(|(triplet, slot)| (slot.seq, triplet, slot.count.into_inner()))
            .collect();
        entries.sort_unstable_by_key(|&(seq, _, _)| seq);

        FrozenTable {
            entries: entries
                .into_iter()
                .map(|(_, triplet, count)| (triplet, count))
                .collect(),
        }
    }
}

/// Read-only frequency table, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrozenTable {
    entries: Vec<(Triplet, u64)>,
}

impl FrozenTable {
    /// Entries in the order their triplets were first inserted.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Triplet, u64)> + '_ {
        self.entries.iter().copied()
    }

    /// Count of `triplet`, if present.
    pub fn get(&self, triplet: Triplet) -> Option<u64> {
        self.entries
            .iter()
            .find(|(t, _)| *t == triplet)
            .map(|&(_, count)| count)
    }

    /// Number of distinct triplets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }

    /// Counts keyed by triplet, for order-independent comparison.
    pub fn counts(&self) -> FxHashMap<Triplet, u64> {
        self.entries.iter().copied().collect()
    }
}

impl IntoIterator for FrozenTable {
    type Item = (Triplet, u64);
    type IntoIter = std::vec::IntoIter<(Triplet, u64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    fn t(s: &str) -> Triplet {
        s.parse().unwrap()
    }

    #[test]
    fn insert_then_increment() {
        let table = FrequencyTable::new();
        assert!(table.is_empty());

        table.increment(t("abc"));
        assert_eq!(table.get(t("abc")), Some(1));

        table.increment(t("abc"));
        table.increment(t("bca"));
        assert_eq!(table.get(t("abc")), Some(2));
        assert_eq!(table.get(t("bca")), Some(1));
        assert_eq!(table.get(t("zzz")), None);
        assert_eq!(table.len(), 2);
        assert_eq!(table.conflicts(), 0);
    }

    #[test]
    fn freeze_keeps_insertion_order() {
        let table = FrequencyTable::new();
        for s in ["cab", "abc", "bca", "abc", "cab", "zzz"] {
            table.increment(t(s));
        }

        let frozen = table.freeze();
        let order: Vec<(String, u64)> = frozen.iter().map(|(t, c)| (t.to_string(), c)).collect();
        assert_eq!(
            order,
            [
                ("cab".to_string(), 2),
                ("abc".to_string(), 2),
                ("bca".to_string(), 1),
                ("zzz".to_string(), 1),
            ]
        );
        assert_eq!(frozen.total(), 6);
        assert_eq!(frozen.get(t("cab")), Some(2));
    }

    #[test]
    fn empty_freeze() {
        let frozen = FrequencyTable::default().freeze();
        assert!(frozen.is_empty());
        assert_eq!(frozen.total(), 0);
    }

    #[test]
    fn concurrent_first_insertions_are_not_lost() {
        // Every thread hammers the same small key set from the very start,
        // so first insertions race.
        let table = FrequencyTable::new();
        let keys = [t("aaa"), t("aab"), t("aba"), t("baa")];
        let threads = 8;
        let rounds = 5_000u64;

        thread::scope(|scope| {
            for _ in 0..threads {
                scope.spawn(|| {
                    for _ in 0..rounds {
                        for &key in &keys {
                            table.increment(key);
                        }
                    }
                });
            }
        });

        for key in keys {
            assert_eq!(table.get(key), Some(threads * rounds));
        }
        assert_eq!(table.len(), keys.len());

        let frozen = table.freeze();
        assert_eq!(frozen.total(), threads * rounds * keys.len() as u64);
    }

    #[test]
    fn insert_on_occupied_key_conflicts() {
        let table = FrequencyTable::new();
        assert_eq!(table.try_insert(t("abc")), Ok(()));
        assert_eq!(table.try_insert(t("abc")), Err(InsertConflict));
        assert_eq!(table.get(t("abc")), Some(1));
    }

    #[test]
    fn racing_fresh_keys_retry_without_losing_counts() {
        let threads = 16;
        let keys: Vec<Triplet> = (0..200u32)
            .filter_map(|i| char::from_u32(0x4E00 + i))
            .map(|c| Triplet::new(c, c, c))
            .collect();

        let mut conflicts = 0;
        for _ in 0..1_000 {
            let table = FrequencyTable::new();
            let start = Barrier::new(threads);

            thread::scope(|scope| {
                for _ in 0..threads {
                    scope.spawn(|| {
                        start.wait();
                        for &key in &keys {
                            table.increment(key);
                        }
                    });
                }
            });

            for &key in &keys {
                assert_eq!(table.get(key), Some(threads as u64));
            }
            assert_eq!(table.len(), keys.len());

            conflicts = table.conflicts();
            if conflicts > 0 {
                break;
            }
        }

        let parallel = thread::available_parallelism().map_or(1, |n| n.get());
        if parallel > 1 {
            assert!(conflicts > 0, "no insertion race in 1000 attempts");
        }
    }
}
