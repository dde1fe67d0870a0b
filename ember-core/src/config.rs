//! World settings shared by the chunk map and the light engine.

use serde::Deserialize;

/// The largest number of sections a chunk may span.
pub const MAX_SECTION_SPAN: i32 = 64;

/// Vertical extent of every chunk and the size of the loading pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// The lowest section height, inclusive.
    pub min_section: i32,
    /// The highest section height, inclusive.
    pub max_section: i32,
    /// Threads in the chunk loading pool. 0 picks one per CPU.
    pub worker_threads: usize,
}

impl WorldConfig {
    /// Checks the ranges of every field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.min_section > self.max_section {
            return Err("min_section must not be above max_section");
        }
        if self.max_section - self.min_section + 1 > MAX_SECTION_SPAN {
            return Err("A chunk may span at most 64 sections");
        }
        if self.worker_threads > 256 {
            return Err("worker_threads must be at most 256");
        }
        Ok(())
    }

    /// The lowest world y.
    #[must_use]
    pub fn min_y(&self) -> i32 {
        self.min_section * 16
    }

    /// One above the highest world y.
    #[must_use]
    pub fn max_y(&self) -> i32 {
        (self.max_section + 1) * 16
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            min_section: -4,
            max_section: 19,
            worker_threads: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_y(), -64);
        assert_eq!(config.max_y(), 320);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        let inverted = WorldConfig {
            min_section: 2,
            max_section: 1,
            ..WorldConfig::default()
        };
        assert!(inverted.validate().is_err());

        let tall = WorldConfig {
            min_section: 0,
            max_section: 64,
            ..WorldConfig::default()
        };
        assert!(tall.validate().is_err());

        let threads = WorldConfig {
            worker_threads: 1000,
            ..WorldConfig::default()
        };
        assert!(threads.validate().is_err());
    }
}
