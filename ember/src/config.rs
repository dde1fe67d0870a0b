//! The demo configuration file.

use std::{fs, io, path::Path};

use ember_core::config::WorldConfig;
use serde::Deserialize;
use thiserror::Error;

/// The configuration written on first start.
pub const DEFAULT_CONFIG: &str = include_str!("../../package-content/ember_config.json5");

/// Errors raised while loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("Config file could not be accessed: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid json5 or does not match the expected shape.
    #[error("Config file could not be parsed: {0}")]
    Parse(#[from] serde_json5::Error),
    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmberConfig {
    /// Chunk height and loading pool.
    pub world: WorldConfig,
    /// Tracing filter directive used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// The flat world scenario.
    pub demo: DemoConfig,
}

/// The flat world built and lit by the demo.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Chunks loaded around the origin in each direction.
    pub radius: i32,
    /// Solid ground fills every y below this.
    pub ground_height: i32,
    /// Distance between torches on the ground, 0 for none.
    pub torch_spacing: i32,
    /// Block edits applied after loading.
    pub edits: Vec<BlockEdit>,
    /// Positions whose light is reported.
    pub probes: Vec<[i32; 3]>,
}

/// A single block placement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockEdit {
    /// World position.
    pub pos: [i32; 3],
    /// Registry name of the block.
    pub block: String,
}

impl EmberConfig {
    /// Reads the configuration at `path`, writing the default one there first if missing.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let config_str = if path.exists() {
            fs::read_to_string(path)?
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, DEFAULT_CONFIG)?;
            DEFAULT_CONFIG.to_owned()
        };
        Self::parse(&config_str)
    }

    /// Parses and validates a configuration.
    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json5::from_str(config_str)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Checks the ranges of every field.
    pub fn validate(&self) -> Result<(), &'static str> {
        self.world.validate()?;
        let demo = &self.demo;
        if !(1..=32).contains(&demo.radius) {
            return Err("Demo radius must be in range 1..=32");
        }
        if !(self.world.min_y()..=self.world.max_y()).contains(&demo.ground_height) {
            return Err("Ground height must be inside the world");
        }
        if !(0..=64).contains(&demo.torch_spacing) {
            return Err("Torch spacing must be in range 0..=64");
        }
        Ok(())
    }
}

impl Default for EmberConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                min_section: -1,
                max_section: 7,
                worker_threads: 0,
            },
            log_filter: "info".to_owned(),
            demo: DemoConfig::default(),
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            radius: 4,
            ground_height: 64,
            torch_spacing: 8,
            edits: Vec::new(),
            probes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests are allowed to panic

    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = EmberConfig::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.world, EmberConfig::default().world);
        assert_eq!(config.demo.radius, 4);
        assert!(!config.demo.edits.is_empty());
        assert_eq!(config.demo.edits[0].block, "glowstone");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = EmberConfig::parse("{ demo: { radius: 2 } }").unwrap();
        assert_eq!(config.demo.radius, 2);
        assert_eq!(config.demo.ground_height, 64);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(matches!(
            EmberConfig::parse("{ demo: { radius: 0 } }"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EmberConfig::parse("{ demo: { ground_height: 4000 } }"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EmberConfig::parse("{ world: { min_section: 3, max_section: 1 } }"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EmberConfig::parse("{ demo: "),
            Err(ConfigError::Parse(_))
        ));
    }
}
