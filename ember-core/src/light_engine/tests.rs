#![allow(clippy::unwrap_used)] // Tests are allowed to panic

use std::sync::Arc;

use ember_registry::{BlockRegistry, LightProperties, RegistryExt, vanilla_blocks};
use ember_utils::{BlockPos, BlockStateId, ChunkPos};
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::RegionChunks;
use crate::{
    chunk::{SECTION_VOLUME, level_chunk::Chunk},
    config::WorldConfig,
    world::ChunkMap,
};

fn world_with(registry: BlockRegistry, worker_threads: usize) -> ChunkMap {
    let config = WorldConfig {
        min_section: 0,
        max_section: 1,
        worker_threads,
    };
    ChunkMap::new(Arc::new(registry), config).unwrap()
}

fn world() -> ChunkMap {
    world_with(BlockRegistry::new_vanilla(), 2)
}

fn load(map: &ChunkMap, x: i32, z: i32) -> Arc<Chunk> {
    let chunk = Arc::new(map.create_chunk(ChunkPos::new(x, z)));
    map.load_chunk(Arc::clone(&chunk)).unwrap();
    chunk
}

/// Loads the 3x3 chunks around the origin, completing the origin chunk.
fn load_around_origin(map: &ChunkMap) {
    for x in -1..=1 {
        for z in -1..=1 {
            load(map, x, z);
        }
    }
}

fn block_light(map: &ChunkMap, x: i32, y: i32, z: i32) -> u8 {
    map.block_light(BlockPos::new(x, y, z)).unwrap()
}

fn sky_light(map: &ChunkMap, x: i32, y: i32, z: i32) -> u8 {
    map.sky_light(BlockPos::new(x, y, z)).unwrap()
}

/// Every voxel of the chunks in `xs` x `zs`, in world coordinates.
fn voxels(xs: std::ops::Range<i32>, zs: std::ops::Range<i32>) -> impl Iterator<Item = BlockPos> {
    xs.flat_map(move |cx| zs.clone().map(move |cz| (cx, cz)))
        .flat_map(|(cx, cz)| {
            (0..16).flat_map(move |x| {
                (0..32).flat_map(move |y| (0..16).map(move |z| BlockPos::new(cx * 16 + x, y, cz * 16 + z)))
            })
        })
}

#[test]
fn test_single_source_after_calculate() {
    let map = world();
    let center = map.create_chunk(ChunkPos::new(0, 0));
    center.set_block_unlit(map.registry(), 8, 8, 8, vanilla_blocks::LANTERN);
    map.load_chunk(Arc::new(center)).unwrap();
    for x in -1..=1 {
        for z in -1..=1 {
            if (x, z) != (0, 0) {
                load(&map, x, z);
            }
        }
    }

    assert_eq!(block_light(&map, 8, 8, 8), 15);
    assert_eq!(block_light(&map, 9, 8, 8), 14);
    assert_eq!(block_light(&map, 0, 8, 8), 7);
    assert_eq!(block_light(&map, 8, 1, 8), 8);
    assert_eq!(block_light(&map, 8, 8, 22), 1);
    assert_eq!(block_light(&map, 8, 8, 23), 0);
    assert_eq!(block_light(&map, 23, 8, 8), 0);
    assert_eq!(block_light(&map, -7, 8, 8), 0);
    assert_eq!(block_light(&map, 4, 5, 10), 15 - 4 - 3 - 2);
}

#[test]
fn test_single_source_after_placement() {
    let map = world();
    load_around_origin(&map);
    map.set_block(BlockPos::new(8, 8, 8), vanilla_blocks::LANTERN);

    assert_eq!(block_light(&map, 8, 8, 8), 15);
    assert_eq!(block_light(&map, 9, 8, 8), 14);
    assert_eq!(block_light(&map, 0, 8, 8), 7);
    assert_eq!(block_light(&map, -6, 8, 8), 1);
    assert_eq!(block_light(&map, 8, 8, 23), 0);
}

#[test]
fn test_opaque_block_drops_borrowed_light() {
    let mut registry = BlockRegistry::new_vanilla();
    let lamp = registry.register_next("test_lamp", 11, LightProperties::Opaque);
    registry.freeze();
    let map = world_with(registry, 2);
    load_around_origin(&map);

    map.set_block(BlockPos::new(9, 8, 8), lamp);
    assert_eq!(block_light(&map, 9, 8, 8), 11);
    assert_eq!(block_light(&map, 8, 8, 8), 10);
    assert_eq!(block_light(&map, 7, 8, 8), 9);

    map.set_block(BlockPos::new(8, 8, 8), vanilla_blocks::STONE);
    assert_eq!(block_light(&map, 8, 8, 8), 0);
    // The light now has to go around the stone.
    assert_eq!(block_light(&map, 7, 8, 8), 7);
    assert_eq!(block_light(&map, 8, 9, 8), 9);
    assert_eq!(block_light(&map, 9, 8, 8), 11);
}

#[test]
fn test_completion_reveals_light_across_boundary() {
    let map = world();
    load(&map, 0, 0);
    map.set_block(BlockPos::new(15, 8, 8), vanilla_blocks::LANTERN);
    assert_eq!(block_light(&map, 15, 8, 8), 15);

    for (x, z) in [(0, -1), (0, 1), (1, -1), (1, 1), (2, -1), (2, 0)] {
        load(&map, x, z);
    }
    let b = load(&map, 1, 0);
    assert_eq!(b.neighbour_count(), 7);
    assert!(!b.is_complete());
    assert_eq!(b.completions(), 0);
    assert_eq!(block_light(&map, 16, 8, 8), 0);

    load(&map, 2, 1);
    assert!(b.is_complete());
    assert_eq!(b.completions(), 1);
    assert_eq!(block_light(&map, 16, 8, 8), 14);
    assert_eq!(block_light(&map, 17, 8, 8), 13);
    assert_eq!(block_light(&map, 16, 8, 12), 10);
}

#[test]
fn test_completion_runs_once_per_transition() {
    let map = world();
    let center = load(&map, 0, 0);
    let offsets = [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0)];
    for (x, z) in offsets {
        load(&map, x, z);
    }
    assert!(!center.is_complete());
    assert_eq!(center.completions(), 0);

    let last = load(&map, 1, 1);
    assert!(center.is_complete());
    assert_eq!(center.completions(), 1);

    center.set_neighbour_at(1, 1, &last, map.engine());
    assert_eq!(center.completions(), 1);

    map.unload_chunk(ChunkPos::new(1, 1));
    assert!(!center.is_complete());
    assert_eq!(center.completions(), 1);

    load(&map, 1, 1);
    assert_eq!(center.completions(), 2);
    assert!(center.neighbours().is_some());
}

#[test]
fn test_decrement_law_in_open_air() {
    let map = world();
    load_around_origin(&map);
    map.set_block(BlockPos::new(4, 12, 4), vanilla_blocks::LANTERN);

    for x in 4..18 {
        let here = block_light(&map, x, 12, 4);
        let next = block_light(&map, x + 1, 12, 4);
        assert_eq!(next + 1, here, "light at x={x}");
    }
    for y in 12..24 {
        assert_eq!(block_light(&map, 4, y + 1, 4) + 1, block_light(&map, 4, y, 4));
    }
}

#[test]
fn test_slab_occludes_its_bottom_face() {
    let map = world();
    load_around_origin(&map);
    map.set_block(BlockPos::new(8, 9, 8), vanilla_blocks::STONE_SLAB_BOTTOM);
    map.set_block(BlockPos::new(8, 8, 8), vanilla_blocks::LANTERN);

    // Light reaches the slab only from the sides and leaves it only through open faces.
    assert_eq!(block_light(&map, 8, 9, 8), 12);
    assert_eq!(block_light(&map, 8, 10, 8), 11);

    map.set_block(BlockPos::new(8, 9, 8), vanilla_blocks::AIR);
    assert_eq!(block_light(&map, 8, 10, 8), 13);
}

#[test]
fn test_reopened_voxel_above_slab_pulls_only_through_open_faces() {
    let map = world();
    load_around_origin(&map);
    map.set_block(BlockPos::new(8, 9, 8), vanilla_blocks::STONE_SLAB_BOTTOM);
    map.set_block(BlockPos::new(8, 8, 8), vanilla_blocks::LANTERN);
    assert_eq!(block_light(&map, 8, 10, 8), 11);

    map.set_block(BlockPos::new(8, 10, 8), vanilla_blocks::STONE);
    assert_eq!(block_light(&map, 8, 10, 8), 0);
    map.set_block(BlockPos::new(8, 10, 8), vanilla_blocks::AIR);
    assert_eq!(block_light(&map, 8, 10, 8), 11);
    assert_eq!(block_light(&map, 8, 11, 8), 10);
}

/// A stone roof at y = 20 over the origin chunk up to x and z of 12, lit from the side.
fn roofed_world() -> ChunkMap {
    let map = world();
    load_around_origin(&map);
    for x in 0..=12 {
        for z in 0..=12 {
            map.set_block(BlockPos::new(x, 20, z), vanilla_blocks::STONE);
        }
    }
    map
}

#[test]
fn test_emitter_replacing_opaque_block_lets_sky_through() {
    let replaced = roofed_world();
    replaced.set_block(BlockPos::new(6, 10, 6), vanilla_blocks::STONE);
    assert_eq!(sky_light(&replaced, 6, 10, 6), 0);
    replaced.set_block(BlockPos::new(6, 10, 6), vanilla_blocks::TORCH);

    let placed = roofed_world();
    placed.set_block(BlockPos::new(6, 10, 6), vanilla_blocks::TORCH);

    assert!(sky_light(&placed, 6, 10, 6) > 0);
    assert_eq!(block_light(&replaced, 6, 10, 6), 14);
    for pos in voxels(0..1, 0..1) {
        assert_eq!(replaced.block_light(pos), placed.block_light(pos), "block light at {pos}");
        assert_eq!(replaced.sky_light(pos), placed.sky_light(pos), "sky light at {pos}");
    }
}

#[test]
fn test_removing_source_clears_its_light() {
    let map = world();
    load_around_origin(&map);
    let torch = BlockPos::new(14, 20, 1);
    map.set_block(torch, vanilla_blocks::TORCH);
    assert_eq!(block_light(&map, 14, 20, 1), 14);
    assert_eq!(block_light(&map, 18, 20, -2), 7);

    map.set_block(torch, vanilla_blocks::AIR);
    for pos in voxels(-1..2, -1..2) {
        assert_eq!(map.block_light(pos), Some(0), "stale light at {pos}");
    }
}

#[test]
fn test_overhang_shades_and_reopens() {
    let map = world();
    load_around_origin(&map);
    for x in 6..=10 {
        for z in 6..=10 {
            map.set_block(BlockPos::new(x, 20, z), vanilla_blocks::STONE);
        }
    }

    assert_eq!(sky_light(&map, 8, 21, 8), 15);
    assert_eq!(sky_light(&map, 8, 20, 8), 0);
    assert_eq!(sky_light(&map, 6, 19, 8), 14);
    assert_eq!(sky_light(&map, 8, 19, 8), 12);
    // Sky light keeps its level on the way down.
    assert_eq!(sky_light(&map, 8, 3, 8), 12);
    assert_eq!(sky_light(&map, 5, 3, 8), 15);

    map.set_block(BlockPos::new(8, 20, 8), vanilla_blocks::AIR);
    assert_eq!(sky_light(&map, 8, 20, 8), 15);
    assert_eq!(sky_light(&map, 8, 19, 8), 15);
    assert_eq!(sky_light(&map, 8, 3, 8), 15);
    assert_eq!(sky_light(&map, 7, 19, 8), 14);
    assert_eq!(sky_light(&map, 7, 19, 7), 13);
}

#[test]
fn test_light_leaving_the_top_lands_in_border_plane() {
    let map = world();
    load_around_origin(&map);
    map.set_block(BlockPos::new(8, 31, 8), vanilla_blocks::LANTERN);
    assert_eq!(block_light(&map, 8, 32, 8), 14);
    assert_eq!(block_light(&map, 9, 32, 8), 13);
    assert_eq!(block_light(&map, 8, 33, 8), 0);

    map.set_block(BlockPos::new(8, 31, 8), vanilla_blocks::AIR);
    assert_eq!(block_light(&map, 8, 32, 8), 0);
}

/// Places random blocks around the origin chunk and returns their positions.
fn scatter(map: &ChunkMap, seed: u64, count: usize) -> Vec<(BlockPos, BlockStateId)> {
    let palette = [
        vanilla_blocks::TORCH,
        vanilla_blocks::GLOWSTONE,
        vanilla_blocks::STONE,
        vanilla_blocks::GLASS,
        vanilla_blocks::AIR,
        vanilla_blocks::REDSTONE_TORCH,
        vanilla_blocks::MAGMA_BLOCK,
        vanilla_blocks::STONE_SLAB_BOTTOM,
        vanilla_blocks::OAK_STAIRS_NORTH,
        vanilla_blocks::OAK_LEAVES,
    ];
    let mut rng = StdRng::seed_from_u64(seed);
    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let pos = BlockPos::new(
            rng.random_range(0..16),
            rng.random_range(0..32),
            rng.random_range(0..16),
        );
        let state = palette[rng.random_range(0..palette.len())];
        map.set_block(pos, state);
        placed.push((pos, state));
    }
    placed
}

#[test]
fn test_bounds_and_source_floor_hold_after_random_edits() {
    let map = world();
    load_around_origin(&map);
    scatter(&map, 0x9E37_79B9_7F4A_7C15, 60);

    for pos in voxels(0..1, 0..1) {
        let block = map.block_light(pos).unwrap();
        let sky = map.sky_light(pos).unwrap();
        assert!(block <= 15 && sky <= 15);

        let state = map.registry().state(map.block_state(pos).unwrap());
        assert!(
            block >= state.luminance,
            "{} at {pos} holds {block}",
            state.name
        );
    }
}

#[test]
fn test_calculate_is_idempotent() {
    let map = world();
    load_around_origin(&map);
    scatter(&map, 0x2545_F491_4F6C_DD1D, 40);

    let center = map.chunk(ChunkPos::new(0, 0)).unwrap();
    let chunks = RegionChunks::around_neighbours(&center);
    let mut region = chunks.lock();
    let slot = region.center_slot();
    let snapshot = |region: &super::LightRegion<'_>| -> Vec<[u8; SECTION_VOLUME]> {
        let chunk = region.chunk(slot).unwrap();
        chunk
            .sections()
            .map(|(_, section)| *section.light.as_bytes())
            .collect()
    };

    let before = snapshot(&region);
    for height in 0..=1 {
        map.engine().propagator(&mut region).calculate(slot, height);
    }
    let once = snapshot(&region);
    for height in 0..=1 {
        map.engine().propagator(&mut region).calculate(slot, height);
    }
    assert_eq!(once, snapshot(&region));
    assert_eq!(before, once);
}

#[test]
fn test_recalculated_section_settles_from_neighbours() {
    let map = world();
    load_around_origin(&map);
    scatter(&map, 0x9E37_79B9_7F4A_7C15, 40);

    let center = map.chunk(ChunkPos::new(0, 0)).unwrap();
    let chunks = RegionChunks::around_neighbours(&center);
    let mut region = chunks.lock();
    let slot = region.center_slot();
    let light = |region: &super::LightRegion<'_>| -> [u8; SECTION_VOLUME] {
        *region.chunk(slot).unwrap().section(0).unwrap().light.as_bytes()
    };

    let settled = light(&region);
    let mut propagator = map.engine().propagator(&mut region);
    propagator.recalculate(slot, 0);
    propagator.propagate_from_neighbours(slot, 0);
    assert!(!propagator.has_work());
    drop(propagator);
    assert_eq!(settled, light(&region));
}

#[test]
fn test_incremental_matches_full_recompute() {
    let sources = [
        (BlockPos::new(3, 5, 4), vanilla_blocks::TORCH),
        (BlockPos::new(12, 20, 9), vanilla_blocks::LANTERN),
        (BlockPos::new(8, 8, 15), vanilla_blocks::GLOWSTONE),
        (BlockPos::new(0, 30, 0), vanilla_blocks::REDSTONE_TORCH),
        (BlockPos::new(9, 6, 2), vanilla_blocks::GLASS),
    ];

    let incremental = world();
    load_around_origin(&incremental);
    for (pos, state) in sources {
        incremental.set_block(pos, state);
    }

    let recomputed = world();
    let center = recomputed.create_chunk(ChunkPos::new(0, 0));
    for (pos, state) in sources {
        let (x, _, z) = pos.section_local();
        center.set_block_unlit(recomputed.registry(), x, pos.y(), z, state);
    }
    recomputed.load_chunk(Arc::new(center)).unwrap();
    for x in -1..=1 {
        for z in -1..=1 {
            if (x, z) != (0, 0) {
                load(&recomputed, x, z);
            }
        }
    }

    for pos in voxels(-1..2, -1..2) {
        assert_eq!(
            incremental.block_light(pos),
            recomputed.block_light(pos),
            "block light differs at {pos}"
        );
        assert_eq!(
            incremental.sky_light(pos),
            recomputed.sky_light(pos),
            "sky light differs at {pos}"
        );
    }
}

fn torch_grid(map: &ChunkMap) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for cx in 0..4 {
        for cz in 0..4 {
            let chunk = map.create_chunk(ChunkPos::new(cx, cz));
            let mut rng = StdRng::seed_from_u64(0x1234_5678 + (cx * 4 + cz) as u64);
            for _ in 0..3 {
                let (x, y, z): (usize, i32, usize) = (
                    rng.random_range(0..16),
                    rng.random_range(0..32),
                    rng.random_range(0..16),
                );
                chunk.set_block_unlit(map.registry(), x, y, z, vanilla_blocks::TORCH);
            }
            chunks.push(chunk);
        }
    }
    chunks
}

#[test]
fn test_parallel_load_matches_sequential_load() {
    let sequential = world_with(BlockRegistry::new_vanilla(), 1);
    for chunk in torch_grid(&sequential) {
        sequential.load_chunk(Arc::new(chunk)).unwrap();
    }

    let parallel = world_with(BlockRegistry::new_vanilla(), 4);
    parallel.load_chunks(torch_grid(&parallel)).unwrap();

    for cx in 1..=2 {
        for cz in 1..=2 {
            let pos = ChunkPos::new(cx, cz);
            assert_eq!(parallel.chunk(pos).unwrap().completions(), 1);
        }
    }
    for pos in voxels(1..3, 1..3) {
        assert_eq!(
            sequential.block_light(pos),
            parallel.block_light(pos),
            "block light differs at {pos}"
        );
    }
}
