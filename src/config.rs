//! Runtime configuration

use crate::memory::DEFAULT_REGION_SIZE;

/// Limits and tuning of one interpreter instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Bytes in the shared scope/heap region
    pub region_size: usize,
    /// Deepest nesting of expressions and calls before
    /// "expression too complex"
    pub max_depth: usize,
    /// Collect once more than this many objects were allocated since the last
    /// collection
    pub collect_after_allocations: usize,
    /// Collect once more than this many statements ran since the last
    /// collection
    pub collect_after_statements: usize,
    /// Seed for `rand;` and `randInt:`; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl RuntimeConfig {
    pub fn with_region_size(mut self, region_size: usize) -> Self {
        self.region_size = region_size;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig {
            region_size: DEFAULT_REGION_SIZE,
            max_depth: 128,
            collect_after_allocations: 5,
            collect_after_statements: 30,
            seed: None,
        }
    }
}
