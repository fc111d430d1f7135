/// Knobs for a single enumeration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Apply the pattern's pruning hooks. Turning this off visits every
    /// itemset and must yield the same results, only slower.
    pub prune: bool,
    /// Number of visited nodes between two progress lines at debug level.
    /// Zero disables progress logging.
    pub progress_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            prune: true,
            progress_interval: 1_000_000,
        }
    }
}

impl SearchConfig {
    pub fn new(prune: bool) -> Self {
        Self {
            prune,
            ..Self::default()
        }
    }

    pub fn without_pruning() -> Self {
        Self::new(false)
    }

    pub fn with_progress_interval(mut self, nodes: u64) -> Self {
        self.progress_interval = nodes;
        self
    }
}
