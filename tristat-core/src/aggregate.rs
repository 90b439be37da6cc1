//! Concurrent triplet aggregation.
//!
//! Every word is an independent unit of work: extract its triplets, then
//! increment each one in the shared [`FrequencyTable`]. Units run on a
//! bounded pool of scoped OS threads that pull chunks of words from a shared
//! queue, so a very large text never means one thread per word.
//!
//! The caller blocks until every worker has been joined. If any worker fails,
//! the others stop taking chunks and the run returns
//! [`AnalysisError::WorkerFailed`]; the partial table is dropped.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use tracing::{debug, debug_span, error};
use tristat_types::{AnalysisError, AnalyzerConfig};

use crate::analyzer::triplet::extract_triplets;
use crate::table::{FrequencyTable, FrozenTable};

/// Merges one word's triplets into the shared table.
#[inline]
pub fn merge_word(table: &FrequencyTable, word: &str) {
    for triplet in extract_triplets(word) {
        table.increment(triplet);
    }
}

/// Completed aggregation: the frozen table plus what it took to build it.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Final counts, in first-insertion order.
    pub table: FrozenTable,
    /// Number of words processed.
    pub words: usize,
    /// Number of worker threads that ran.
    pub workers: usize,
    /// Insertion races recovered by local retry.
    pub conflicts: u64,
}

/// Bounded worker pool that fills one [`FrequencyTable`] per run.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    thread_count: usize,
    chunk_size: usize,
}

impl Aggregator {
    /// Creates an aggregator from the pool settings in `config`.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidConfig` if the configuration cannot
    /// schedule work.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            thread_count: config.thread_count,
            chunk_size: config.chunk_size,
        })
    }

    /// Aggregates the triplets of every word.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::WorkerFailed` if a worker panics.
    pub fn aggregate<S>(&self, words: &[S]) -> Result<Aggregation, AnalysisError>
    where
        S: AsRef<str> + Sync,
    {
        self.aggregate_with(words, merge_word)
    }

    /// Runs `unit` once per word against a fresh shared table.
    ///
    /// `unit` must route every table mutation through
    /// [`FrequencyTable::increment`].
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::WorkerFailed` if any invocation of `unit`
    /// panics, or the work queue becomes unusable.
    pub fn aggregate_with<S, U>(&self, words: &[S], unit: U) -> Result<Aggregation, AnalysisError>
    where
        S: AsRef<str> + Sync,
        U: Fn(&FrequencyTable, &str) + Sync,
    {
        let started = Instant::now();
        let workers = self.thread_count.min(words.len()).max(1);
        let chunk_size = self.chunk_size.min(words.len() / workers + 1);

        let span = debug_span!("aggregate", words = words.len(), workers, chunk_size);
        let _enter = span.enter();

        let table = FrequencyTable::with_capacity(words.len() / 4);
        let queue = Mutex::new(words.chunks(chunk_size));
        let failed = AtomicBool::new(false);

        let outcomes: Vec<Result<usize, AnalysisError>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|worker| {
                    let table = &table;
                    let queue = &queue;
                    let failed = &failed;
                    let unit = &unit;
                    let span = span.clone();

                    scope.spawn(move || {
                        let _enter = span.enter();
                        let mut guard = FailFast::arm(failed);
                        let mut processed = 0usize;

                        while !failed.load(Ordering::Acquire) {
                            let chunk = match queue.lock() {
                                Ok(mut chunks) => chunks.next(),
                                Err(_) => {
                                    return Err(AnalysisError::WorkerFailed {
                                        worker,
                                        reason: "work queue lock poisoned".to_string(),
                                    })
                                }
                            };
                            let Some(chunk) = chunk else { break };

                            for word in chunk {
                                unit(table, word.as_ref());
                            }
                            processed += chunk.len();
                        }

                        guard.disarm();
                        Ok(processed)
                    })
                })
                .collect();

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle.join().unwrap_or_else(|payload| {
                        Err(AnalysisError::WorkerFailed {
                            worker,
                            reason: panic_message(payload.as_ref()),
                        })
                    })
                })
                .collect()
        });

        let mut processed = 0usize;
        for outcome in outcomes {
            match outcome {
                Ok(n) => processed += n,
                Err(e) => {
                    error!(error = %e, "aggregation aborted");
                    return Err(e);
                }
            }
        }

        let conflicts = table.conflicts();
        let table = table.freeze();
        debug!(
            processed,
            distinct = table.len(),
            conflicts,
            elapsed_us = started.elapsed().as_micros() as u64,
            "aggregation complete"
        );

        Ok(Aggregation {
            table,
            words: processed,
            workers,
            conflicts,
        })
    }
}

/// Raises the shared failure flag unless disarmed, so a panicking or
/// erroring worker stops its siblings from taking more chunks.
struct FailFast<'a> {
    failed: &'a AtomicBool,
    armed: bool,
}

impl<'a> FailFast<'a> {
    fn arm(failed: &'a AtomicBool) -> Self {
        Self {
            failed,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for FailFast<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.failed.store(true, Ordering::Release);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
