// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fan-out / fan-in over corpus partitions.
//!
//! Each search invocation builds its own rayon pool, spawns one task per
//! partition, and drains a channel on the calling thread. Workers never touch
//! shared state: a task returns its own hit list through the channel, and only
//! the coordinating thread merges hits and calls the partial-results callback.
//! Callback invocations are therefore sequential, in task-completion order.
//!
//! # Failure handling
//!
//! A task that returns an error, panics, or runs past the task timeout is
//! logged and dropped; its siblings are unaffected. The coordinator itself
//! stops waiting when no task reports within the task timeout or when the
//! caller's deadline passes. Tasks still running at that point are left to
//! finish on the pool and their results go nowhere.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::corpus::Partition;
use crate::error::{Result, SearchError};
use crate::types::{Hit, PartialResult, Variant};

/// Hits from every completed partition, plus bookkeeping.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub hits: Vec<Hit>,
    /// Partitions whose hits were merged.
    pub completed: usize,
    /// Partitions that failed, timed out, or never reported.
    pub failed: Vec<SearchError>,
}

struct TaskReport {
    partition: usize,
    outcome: std::result::Result<Vec<Hit>, String>,
    elapsed: Duration,
}

/// Runs a scan function over partitions on a per-invocation worker pool.
#[derive(Debug, Clone)]
pub struct ScanCoordinator {
    workers: usize,
    task_timeout: Duration,
    deadline: Option<Instant>,
}

impl ScanCoordinator {
    pub fn new(workers: usize, task_timeout: Duration) -> Self {
        Self {
            workers: workers.max(1),
            task_timeout,
            deadline: None,
        }
    }

    /// Stop waiting for stragglers once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn run<F>(
        &self,
        partitions: Vec<Partition>,
        scan: Arc<F>,
        on_partial: &mut dyn FnMut(&[PartialResult]),
    ) -> Result<ScanOutcome>
    where
        F: Fn(&Partition) -> Result<Vec<Hit>> + Send + Sync + 'static,
    {
        let total = partitions.len();
        let mut outcome = ScanOutcome::default();
        if total == 0 {
            return Ok(outcome);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.min(total))
            .thread_name(|i| format!("tzfanim-scan-{}", i))
            .build()?;

        let (tx, rx) = mpsc::channel::<TaskReport>();
        let mut pending: HashSet<usize> = HashSet::with_capacity(total);

        for partition in partitions {
            pending.insert(partition.index);
            let tx = tx.clone();
            let scan = Arc::clone(&scan);
            let timeout = self.task_timeout;
            pool.spawn(move || {
                let started = Instant::now();
                let result = panic::catch_unwind(AssertUnwindSafe(|| scan(&partition)));
                let elapsed = started.elapsed();
                let outcome = match result {
                    Ok(Ok(_)) if elapsed > timeout => {
                        Err(format!("timed out after {:.1}s", elapsed.as_secs_f64()))
                    }
                    Ok(Ok(hits)) => Ok(hits),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(payload) => Err(format!("panicked: {}", panic_message(payload.as_ref()))),
                };
                // The receiver is gone if the coordinator stopped waiting
                let _ = tx.send(TaskReport {
                    partition: partition.index,
                    outcome,
                    elapsed,
                });
            });
        }
        drop(tx);

        tracing::debug!(partitions = total, workers = self.workers.min(total), "scan_started");

        let mut seen: HashSet<Variant> = HashSet::new();
        while !pending.is_empty() {
            let wait = match self.deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        tracing::warn!(pending = pending.len(), "scan_deadline_passed");
                        break;
                    }
                    left.min(self.task_timeout)
                }
                None => self.task_timeout,
            };

            let report = match rx.recv_timeout(wait) {
                Ok(report) => report,
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(
                        pending = pending.len(),
                        waited_secs = wait.as_secs_f64(),
                        "scan_stopped_waiting"
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            };
            pending.remove(&report.partition);

            match report.outcome {
                Ok(hits) => {
                    outcome.completed += 1;
                    let fresh: Vec<PartialResult> = hits
                        .iter()
                        .filter(|h| seen.insert(h.variant.clone()))
                        .map(|h| PartialResult::from(&h.variant))
                        .collect();
                    tracing::debug!(
                        partition = report.partition,
                        hits = hits.len(),
                        new_variants = fresh.len(),
                        elapsed_ms = report.elapsed.as_millis() as u64,
                        "partition_completed"
                    );
                    if !fresh.is_empty() {
                        on_partial(&fresh);
                    }
                    outcome.hits.extend(hits);
                }
                Err(reason) => {
                    tracing::warn!(partition = report.partition, reason = %reason, "partition_task_failed");
                    outcome.failed.push(SearchError::PartitionTask {
                        partition: report.partition,
                        reason,
                    });
                }
            }
        }

        let mut abandoned: Vec<usize> = pending.into_iter().collect();
        abandoned.sort_unstable();
        for partition in abandoned {
            outcome.failed.push(SearchError::PartitionTask {
                partition,
                reason: "no result before the coordinator stopped waiting".to_string(),
            });
        }

        Ok(outcome)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
