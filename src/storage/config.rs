//! Store Configuration

/// Store construction parameters
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Number of entries to preallocate (0 = allocate on first insert)
    pub initial_capacity: usize,
}

impl StoreConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of entries to preallocate
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
