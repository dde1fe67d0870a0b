//! This module contains the `ChunkMap`, which owns every loaded chunk of a world.
use std::sync::Arc;

use rayon::prelude::*;
use scc::HashMap;
use smallvec::SmallVec;
use thiserror::Error;

use ember_registry::BlockRegistry;
use ember_utils::{BlockPos, BlockStateId, ChunkPos, SectionPos};

use crate::{
    chunk::{level_chunk::Chunk, neighbours::ChunkNeighbours},
    config::WorldConfig,
    light_engine::{LightEngine, RegionChunks},
};

/// Chunks within this distance of an edited chunk are locked for the edit's light update.
const EDIT_REGION_RADIUS: i32 = 2;

/// Errors from loading chunks into a [`ChunkMap`].
#[derive(Debug, Error)]
pub enum ChunkMapError {
    /// A chunk at that position is already loaded.
    #[error("chunk {0} is already loaded")]
    AlreadyLoaded(ChunkPos),
    /// The chunk's vertical range differs from the world's.
    #[error("chunk {pos} spans sections {min}..={max}, the world spans {expected_min}..={expected_max}")]
    HeightMismatch {
        /// The chunk position.
        pos: ChunkPos,
        /// The chunk's lowest section.
        min: i32,
        /// The chunk's highest section.
        max: i32,
        /// The world's lowest section.
        expected_min: i32,
        /// The world's highest section.
        expected_max: i32,
    },
    /// The world config failed validation.
    #[error("invalid world config: {0}")]
    InvalidConfig(&'static str),
    /// The loading pool could not be started.
    #[error("failed to build the chunk loading pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// A map of loaded chunks and the light engine that keeps them lit.
pub struct ChunkMap {
    chunks: HashMap<ChunkPos, Arc<Chunk>>,
    engine: LightEngine,
    config: WorldConfig,
    pool: rayon::ThreadPool,
}

impl ChunkMap {
    /// Creates an empty chunk map.
    pub fn new(registry: Arc<BlockRegistry>, config: WorldConfig) -> Result<Self, ChunkMapError> {
        config.validate().map_err(ChunkMapError::InvalidConfig)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads)
            .thread_name(|i| format!("ember-chunk-{i}"))
            .build()?;
        Ok(Self {
            chunks: HashMap::new(),
            engine: LightEngine::new(registry),
            config,
            pool,
        })
    }

    /// The world config.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The light engine.
    #[must_use]
    pub fn engine(&self) -> &LightEngine {
        &self.engine
    }

    /// The block registry.
    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        self.engine.registry()
    }

    /// Creates an empty, unloaded chunk with the world's vertical range.
    #[must_use]
    pub fn create_chunk(&self, pos: ChunkPos) -> Chunk {
        Chunk::new(pos, self.config.min_section, self.config.max_section)
    }

    /// Gets a loaded chunk.
    #[must_use]
    pub fn chunk(&self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        self.chunks.read_sync(&pos, |_, chunk| Arc::clone(chunk))
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Loads a chunk and links it both ways with its loaded neighbours.
    ///
    /// Any chunk whose neighbour set becomes complete has its light finalized before this
    /// returns.
    pub fn load_chunk(&self, chunk: Arc<Chunk>) -> Result<(), ChunkMapError> {
        let pos = chunk.pos();
        if chunk.min_section() != self.config.min_section
            || chunk.max_section() != self.config.max_section
        {
            return Err(ChunkMapError::HeightMismatch {
                pos,
                min: chunk.min_section(),
                max: chunk.max_section(),
                expected_min: self.config.min_section,
                expected_max: self.config.max_section,
            });
        }

        self.chunks
            .insert_sync(pos, Arc::clone(&chunk))
            .map_err(|_| ChunkMapError::AlreadyLoaded(pos))?;

        // Link every pair both ways first so completions see all sections connected.
        let mut completed: SmallVec<[Arc<Chunk>; 9]> = SmallVec::new();
        for (index, &(dx, dz)) in ChunkNeighbours::OFFSETS.iter().enumerate() {
            let Some(neighbour) = self.chunk(pos.offset(dx, dz)) else {
                continue;
            };
            if chunk.link_neighbour(index, &neighbour) {
                completed.push(Arc::clone(&chunk));
            }
            if neighbour.link_neighbour(ChunkNeighbours::opposite(index), &chunk) {
                completed.push(neighbour);
            }
        }
        for chunk in &completed {
            chunk.complete(&self.engine);
        }

        log::debug!(
            "Loaded chunk {pos} with {} neighbours",
            chunk.neighbour_count()
        );
        Ok(())
    }

    /// Loads many chunks on the worker pool.
    ///
    /// Stops at the first error; chunks loaded before it stay loaded.
    pub fn load_chunks(&self, chunks: Vec<Chunk>) -> Result<(), ChunkMapError> {
        let count = chunks.len();
        self.pool.install(|| {
            chunks
                .into_par_iter()
                .try_for_each(|chunk| self.load_chunk(Arc::new(chunk)))
        })?;
        log::info!("Loaded {count} chunks, {} total", self.len());
        Ok(())
    }

    /// Unloads a chunk and clears the neighbour slots pointing at it.
    ///
    /// Light is not recomputed.
    pub fn unload_chunk(&self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        let (_, chunk) = self.chunks.remove_sync(&pos)?;
        for (index, &(dx, dz)) in ChunkNeighbours::OFFSETS.iter().enumerate() {
            chunk.remove_neighbour(index);
            if let Some(neighbour) = self.chunk(pos.offset(dx, dz)) {
                neighbour.remove_neighbour(ChunkNeighbours::opposite(index));
            }
        }
        log::debug!("Unloaded chunk {pos}");
        Some(chunk)
    }

    /// Sets a block and updates light around it.
    ///
    /// Returns the previous block, or `None` if the position is not in a loaded chunk.
    #[tracing::instrument(level = "debug", skip_all, fields(pos = %pos, state = state.0))]
    pub fn set_block(&self, pos: BlockPos, state: BlockStateId) -> Option<BlockStateId> {
        let center = self.chunk(pos.chunk_pos())?;
        let chunks = RegionChunks::collect(&center, EDIT_REGION_RADIUS, |p| self.chunk(p));
        let mut region = chunks.lock();

        let voxel = region.voxel_at(pos)?;
        let previous = region.set_block(voxel, state)?;
        if previous == state {
            return Some(previous);
        }

        let registry = self.engine.registry();
        let as_state = |id: BlockStateId| (!id.is_air()).then(|| registry.state(id));
        self.engine
            .propagator(&mut region)
            .on_block_change(voxel, as_state(previous), as_state(state));
        Some(previous)
    }

    /// Gets the block at a position, or `None` outside the loaded world.
    #[must_use]
    pub fn block_state(&self, pos: BlockPos) -> Option<BlockStateId> {
        if !(self.config.min_y()..self.config.max_y()).contains(&pos.y()) {
            return None;
        }
        let (x, _, z) = pos.section_local();
        Some(self.chunk(pos.chunk_pos())?.block_state(x, pos.y(), z))
    }

    /// Gets the block light at a position.
    #[must_use]
    pub fn block_light(&self, pos: BlockPos) -> Option<u8> {
        self.light_at(pos).map(|(block, _)| block)
    }

    /// Gets the sky light at a position. Voxels open to the sky read 15.
    #[must_use]
    pub fn sky_light(&self, pos: BlockPos) -> Option<u8> {
        self.light_at(pos).map(|(_, sky)| sky)
    }

    fn light_at(&self, pos: BlockPos) -> Option<(u8, u8)> {
        let chunk = self.chunk(pos.chunk_pos())?;
        let (x, _, z) = pos.section_local();
        let data = chunk.lock();
        Some(data.light_at(x, pos.y(), z))
    }

    /// Returns every section whose light changed since the last call and clears the flags.
    pub fn drain_dirty_sections(&self) -> Vec<SectionPos> {
        let mut chunks = Vec::with_capacity(self.len());
        self.chunks.iter_sync(|_, chunk| {
            chunks.push(Arc::clone(chunk));
            true
        });

        let mut dirty = Vec::new();
        for chunk in chunks {
            let heights = chunk.lock().take_dirty_sections();
            dirty.extend(
                heights
                    .into_iter()
                    .map(|height| SectionPos::of_chunk(chunk.pos(), height)),
            );
        }
        dirty.sort_unstable();
        dirty
    }
}
