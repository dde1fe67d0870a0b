//! Chunks, their sections and the per-section light storage.

pub mod block_storage;
pub mod border_light;
pub mod heightmap;
pub mod level_chunk;
pub mod neighbours;
pub mod section;
pub mod section_light;
pub mod section_neighbours;

/// The edge length of a section in voxels.
pub const SECTION_SIZE: usize = 16;

/// The number of voxels in a section.
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// Index of a section-local voxel. `x` varies fastest, then `z`, then `y`.
#[must_use]
#[inline]
pub const fn section_index(x: usize, y: usize, z: usize) -> usize {
    debug_assert!(x < SECTION_SIZE && y < SECTION_SIZE && z < SECTION_SIZE);
    x + z * SECTION_SIZE + y * SECTION_SIZE * SECTION_SIZE
}

/// Inverse of [`section_index`].
#[must_use]
#[inline]
pub const fn section_coords(index: usize) -> (usize, usize, usize) {
    (index & 15, index >> 8, (index >> 4) & 15)
}
