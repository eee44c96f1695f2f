//! CycleStats - Counters for the changes applied during one cycle

/// Changes applied to the replica during one propagate-then-prune pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub folders_created: usize,
    pub files_copied: usize,
    pub files_removed: usize,
    pub folders_removed: usize,
    /// Aggregate bytes written into the replica
    pub bytes_copied: u64,
}

impl CycleStats {
    /// Total number of reconciliation actions taken
    pub fn actions(&self) -> usize {
        self.folders_created + self.files_copied + self.files_removed + self.folders_removed
    }

    /// True when the cycle found the replica already in sync
    pub fn is_noop(&self) -> bool {
        self.actions() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_noop() {
        let stats = CycleStats::default();
        assert_eq!(stats.actions(), 0);
        assert!(stats.is_noop());
    }

    #[test]
    fn test_actions_sums_every_counter() {
        let stats = CycleStats {
            folders_created: 1,
            files_copied: 2,
            files_removed: 3,
            folders_removed: 4,
            bytes_copied: 1024,
        };
        assert_eq!(stats.actions(), 10);
        assert!(!stats.is_noop());
    }

    #[test]
    fn test_bytes_alone_do_not_count_as_actions() {
        let stats = CycleStats {
            bytes_copied: 10,
            ..Default::default()
        };
        assert!(stats.is_noop());
    }
}
