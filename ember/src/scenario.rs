//! Builds a flat world, lights it while loading in parallel, then edits and probes it.

use std::{sync::Arc, time::Instant};

use anyhow::Context;
use ember_core::{
    chunk::{SECTION_SIZE, block_storage::BlockStorage, level_chunk::Chunk},
    world::ChunkMap,
};
use ember_registry::{BlockRegistry, RegistryExt, vanilla_blocks};
use ember_utils::{BlockPos, BlockStateId, ChunkPos};

use crate::config::{DemoConfig, EmberConfig};

/// Light read back at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// The probed position.
    pub pos: BlockPos,
    /// The block there, `None` outside the loaded world.
    pub block: Option<BlockStateId>,
    /// Block light, 0 outside the loaded world.
    pub block_light: u8,
    /// Sky light, 0 outside the loaded world.
    pub sky_light: u8,
}

/// What a scenario run did.
#[derive(Debug)]
pub struct Report {
    /// Chunks loaded.
    pub chunks: usize,
    /// Chunks whose eight neighbours were all loaded.
    pub completed: usize,
    /// Sections whose light changed during the run.
    pub dirty_sections: usize,
    /// The configured probes, in order.
    pub probes: Vec<Probe>,
}

/// Runs the configured scenario on a fresh world.
pub fn run(config: &EmberConfig) -> anyhow::Result<Report> {
    let mut registry = BlockRegistry::new_vanilla();
    registry.freeze();
    let map = ChunkMap::new(Arc::new(registry), config.world)?;

    let chunks = flat_chunks(&map, &config.demo);
    let count = chunks.len();
    let started = Instant::now();
    map.load_chunks(chunks)?;
    log::info!("Loaded and lit {count} chunks in {:?}", started.elapsed());

    for edit in &config.demo.edits {
        let state = map
            .registry()
            .get_by_name(&edit.block)
            .with_context(|| format!("Unknown block \"{}\" in edit", edit.block))?;
        let [x, y, z] = edit.pos;
        let pos = BlockPos::new(x, y, z);
        let started = Instant::now();
        match map.set_block(pos, state) {
            Some(_) => log::info!("Set {pos} to {} in {:?}", edit.block, started.elapsed()),
            None => log::warn!("Edit at {pos} is outside the loaded world"),
        }
    }

    let radius = config.demo.radius;
    let completed = (-radius..=radius)
        .flat_map(|x| (-radius..=radius).map(move |z| ChunkPos::new(x, z)))
        .filter(|&pos| map.chunk(pos).is_some_and(|chunk| chunk.is_complete()))
        .count();

    let probes = config
        .demo
        .probes
        .iter()
        .map(|&[x, y, z]| {
            let pos = BlockPos::new(x, y, z);
            Probe {
                pos,
                block: map.block_state(pos),
                block_light: map.block_light(pos).unwrap_or_default(),
                sky_light: map.sky_light(pos).unwrap_or_default(),
            }
        })
        .collect();

    Ok(Report {
        chunks: map.len(),
        completed,
        dirty_sections: map.drain_dirty_sections().len(),
        probes,
    })
}

/// Unlit chunks of bedrock, stone, dirt and grass with torches on top.
fn flat_chunks(map: &ChunkMap, demo: &DemoConfig) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for cx in -demo.radius..=demo.radius {
        for cz in -demo.radius..=demo.radius {
            chunks.push(flat_chunk(map, ChunkPos::new(cx, cz), demo));
        }
    }
    chunks
}

fn flat_chunk(map: &ChunkMap, pos: ChunkPos, demo: &DemoConfig) -> Chunk {
    let registry = map.registry();
    let chunk = map.create_chunk(pos);
    let min_y = chunk.min_section() * SECTION_SIZE as i32;
    let ground = demo.ground_height;

    // Whole sections of stone below the dirt layer.
    let stone_sections = (ground - 4).div_euclid(SECTION_SIZE as i32).max(chunk.min_section());
    {
        let mut data = chunk.lock();
        for height in chunk.min_section()..stone_sections {
            data.put_section(
                registry,
                height,
                BlockStorage::new_filled(vanilla_blocks::STONE),
            );
        }
    }

    for x in 0..SECTION_SIZE {
        for z in 0..SECTION_SIZE {
            for y in stone_sections * SECTION_SIZE as i32..ground {
                let state = if y == ground - 1 {
                    vanilla_blocks::GRASS_BLOCK
                } else if y >= ground - 4 {
                    vanilla_blocks::DIRT
                } else {
                    vanilla_blocks::STONE
                };
                chunk.set_block_unlit(registry, x, y, z, state);
            }
            if ground > min_y {
                chunk.set_block_unlit(registry, x, min_y, z, vanilla_blocks::BEDROCK);
            }

            let world_x = pos.min_block_x() + x as i32;
            let world_z = pos.min_block_z() + z as i32;
            if demo.torch_spacing > 0
                && world_x.rem_euclid(demo.torch_spacing) == 0
                && world_z.rem_euclid(demo.torch_spacing) == 0
            {
                chunk.set_block_unlit(registry, x, ground, z, vanilla_blocks::TORCH);
            }
        }
    }
    chunk
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Tests are allowed to panic

    use super::*;
    use crate::config::BlockEdit;
    use ember_core::config::WorldConfig;

    fn config(edits: Vec<BlockEdit>, probes: Vec<[i32; 3]>) -> EmberConfig {
        EmberConfig {
            world: WorldConfig {
                min_section: 0,
                max_section: 2,
                worker_threads: 2,
            },
            log_filter: "warn".to_owned(),
            demo: DemoConfig {
                radius: 2,
                ground_height: 20,
                torch_spacing: 8,
                edits,
                probes,
            },
        }
    }

    #[test]
    fn test_flat_world_is_lit() {
        let report = run(&config(
            Vec::new(),
            vec![[8, 20, 8], [9, 20, 8], [8, 19, 8], [8, 40, 8], [3, 21, 3]],
        ))
        .unwrap();

        assert_eq!(report.chunks, 25);
        assert_eq!(report.completed, 9);
        assert!(report.dirty_sections > 0);

        let [torch, beside, ground, sky, between] = report.probes[..] else {
            panic!("five probes expected");
        };
        assert_eq!(torch.block, Some(vanilla_blocks::TORCH));
        assert_eq!(torch.block_light, 14);
        assert_eq!(beside.block_light, 13);
        assert_eq!(ground.block, Some(vanilla_blocks::GRASS_BLOCK));
        assert_eq!(ground.block_light, 0);
        assert_eq!(sky.sky_light, 15);
        // Two torches are 3 + 1 + 3 blocks away.
        assert_eq!(between.block_light, 7);
    }

    #[test]
    fn test_edits_update_light() {
        let edits = vec![
            BlockEdit {
                pos: [8, 20, 8],
                block: "air".to_owned(),
            },
            BlockEdit {
                pos: [4, 19, 4],
                block: "air".to_owned(),
            },
            BlockEdit {
                pos: [4, 18, 4],
                block: "lantern".to_owned(),
            },
        ];
        let report = run(&config(edits, vec![[8, 20, 8], [4, 18, 4], [4, 19, 4]])).unwrap();

        let [removed, lantern, shaft] = report.probes[..] else {
            panic!("three probes expected");
        };
        assert_eq!(removed.block, Some(vanilla_blocks::AIR));
        // Only the torches 8 blocks away still reach it.
        assert_eq!(removed.block_light, 6);
        assert_eq!(lantern.block_light, 15);
        assert_eq!(shaft.block_light, 14);
        assert_eq!(shaft.sky_light, 15);
    }

    #[test]
    fn test_unknown_block_is_an_error() {
        let edits = vec![BlockEdit {
            pos: [0, 20, 0],
            block: "unobtainium".to_owned(),
        }];
        assert!(run(&config(edits, Vec::new())).is_err());
    }
}
