#![forbid(unsafe_code)]

//! Per-tree commit counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a tree's counters. All values are monotonic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    /// Commit attempts (successful or not).
    pub attempted: u64,
    /// Commits that installed a new root.
    pub committed: u64,
    /// Commits rejected because the base was stale.
    pub rejected: u64,
    /// Mutations carried by successful commits.
    pub mutations: u64,
    /// `on_layout` notifications sent.
    pub layout_events: u64,
}

#[derive(Debug, Default)]
pub(crate) struct CommitCounters {
    attempted: AtomicU64,
    committed: AtomicU64,
    rejected: AtomicU64,
    mutations: AtomicU64,
    layout_events: AtomicU64,
}

impl CommitCounters {
    pub(crate) fn record_attempt(&self) {
        self.attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_commit(&self, mutations: usize) {
        self.committed.fetch_add(1, Ordering::Relaxed);
        self.mutations
            .fetch_add(mutations as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_layout_events(&self, count: usize) {
        self.layout_events
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CommitStats {
        CommitStats {
            attempted: self.attempted.load(Ordering::Relaxed),
            committed: self.committed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            mutations: self.mutations.load(Ordering::Relaxed),
            layout_events: self.layout_events.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let counters = CommitCounters::default();
        counters.record_attempt();
        counters.record_attempt();
        counters.record_commit(3);
        counters.record_rejection();
        counters.record_layout_events(2);

        assert_eq!(
            counters.snapshot(),
            CommitStats {
                attempted: 2,
                committed: 1,
                rejected: 1,
                mutations: 3,
                layout_events: 2,
            }
        );
    }
}
