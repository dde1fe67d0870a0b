//! # Ember
//!
//! Builds a flat world of chunks, lights it while loading chunks in parallel, applies
//! the configured block edits and reports the light at the configured probes.

use std::{env, path::PathBuf};

use anyhow::Context;

use crate::config::EmberConfig;

mod config;
mod logger;
mod scenario;

fn main() -> anyhow::Result<()> {
    let path = env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from("ember_config.json5"), PathBuf::from);
    let config = EmberConfig::load_or_create(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;
    logger::init(&config.log_filter)?;

    log::info!(
        "Starting Ember with sections {}..={} and radius {}",
        config.world.min_section,
        config.world.max_section,
        config.demo.radius
    );
    let report = scenario::run(&config)?;

    log::info!(
        "{} chunks loaded, {} complete, {} sections changed light",
        report.chunks,
        report.completed,
        report.dirty_sections
    );
    for probe in &report.probes {
        match probe.block {
            Some(block) => log::info!(
                "{}: block {} has block light {} and sky light {}",
                probe.pos,
                block.0,
                probe.block_light,
                probe.sky_light
            ),
            None => log::info!("{}: not loaded", probe.pos),
        }
    }
    Ok(())
}
