use crate::error::Error;
use crate::tsmap::TsMap;

/// Capacity used by `Config::default()` and `TsMap::default()`.
pub const DEFAULT_CAPACITY: usize = 16;

/// Configuration for a TsMap instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) capacity: usize,
}

impl Config {
    /// Create a new config with defaults (16 buckets).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of buckets, which is also the maximum number of
    /// entries. Must be greater than 0.
    pub fn capacity(mut self, capacity: usize) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        self.capacity = capacity;
        Ok(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Builder for creating a TsMap with custom configuration.
#[derive(Debug, Default)]
pub struct TsMapBuilder {
    config: Config,
}

impl TsMapBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of buckets. Must be greater than 0.
    pub fn capacity(mut self, capacity: usize) -> Result<Self, Error> {
        self.config = self.config.capacity(capacity)?;
        Ok(self)
    }

    /// Build a TsMap with the configured settings.
    pub fn build(self) -> Result<TsMap, Error> {
        TsMap::with_config(self.config)
    }
}
