use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate tallies for one sync cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleReport {
    /// When the cycle started
    pub started_at: Option<DateTime<Utc>>,
    /// Repositories returned by the lister
    pub discovered: usize,
    /// Tasks handed to the worker pool
    pub enqueued: usize,
    /// Descriptors skipped because their name cannot be a directory
    pub skipped: usize,
    /// Fresh clones
    pub cloned: usize,
    /// Mirrors that were already current
    pub up_to_date: usize,
    /// Mirrors advanced by a fast-forward
    pub fast_forwarded: usize,
    /// Mirrors left as-is because local history diverged
    pub diverged: usize,
    /// Tasks that ended in a clone or pull error
    pub failed: usize,
}

impl CycleReport {
    /// Number of tasks that reached a terminal outcome
    pub const fn completed(&self) -> usize {
        self.cloned + self.up_to_date + self.fast_forwarded + self.diverged + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_counts_every_terminal_outcome() {
        let report = CycleReport {
            cloned: 1,
            up_to_date: 2,
            fast_forwarded: 3,
            diverged: 4,
            failed: 5,
            skipped: 100,
            ..Default::default()
        };
        assert_eq!(report.completed(), 15);
    }
}
