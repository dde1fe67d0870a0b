//! This module contains the `ChunkSection` struct.

use ember_utils::BlockStateId;

use super::{
    block_storage::BlockStorage, section_light::SectionLight,
    section_neighbours::SectionNeighbours,
};

/// A 16x16x16 slice of a chunk: its blocks, its light and its face links.
#[derive(Debug, Clone)]
pub struct ChunkSection {
    /// The block states in the section.
    pub blocks: BlockStorage,
    /// The light of the section.
    pub light: SectionLight,
    /// Links to the six face-adjacent sections.
    pub neighbours: SectionNeighbours,
    non_air_blocks: u16,
}

impl ChunkSection {
    /// Creates an all-air, dark section.
    #[must_use]
    pub fn new_empty(neighbours: SectionNeighbours) -> Self {
        Self {
            blocks: BlockStorage::new_empty(),
            light: SectionLight::new(),
            neighbours,
            non_air_blocks: 0,
        }
    }

    /// Creates a dark section from existing block storage.
    #[must_use]
    pub fn new(blocks: BlockStorage, neighbours: SectionNeighbours) -> Self {
        let non_air_blocks = blocks.count_non_air() as u16;
        Self {
            blocks,
            light: SectionLight::new(),
            neighbours,
            non_air_blocks,
        }
    }

    /// Gets the block state at a voxel index.
    #[must_use]
    #[inline]
    pub fn block(&self, index: usize) -> BlockStateId {
        self.blocks.get(index)
    }

    /// Sets the block state at a voxel index and returns the previous one.
    pub fn set_block(&mut self, index: usize, state: BlockStateId) -> BlockStateId {
        let previous = self.blocks.set(index, state);
        match (previous.is_air(), state.is_air()) {
            (true, false) => self.non_air_blocks += 1,
            (false, true) => self.non_air_blocks -= 1,
            _ => {}
        }
        previous
    }

    /// Whether the section holds only air.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.non_air_blocks == 0
    }

    /// Number of non-air voxels.
    #[must_use]
    pub fn non_air_blocks(&self) -> u16 {
        self.non_air_blocks
    }
}
