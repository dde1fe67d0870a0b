//! Sky exposure tracking for chunk columns.

use super::SECTION_SIZE;

const COLUMNS: usize = SECTION_SIZE * SECTION_SIZE;

/// Tracks, per column, the lowest world y from which the column is open to the sky.
///
/// Every voxel at or above `get(x, z)` receives sky light 15 without tracing. The value
/// is one above the highest block that is not fully transparent, or the chunk's minimum
/// y when the column holds none.
#[derive(Debug, Clone)]
pub struct LightHeightmap {
    /// Minimum Y coordinate of the chunk.
    min_y: i32,

    /// Heights for each column (16x16 = 256 entries).
    /// Stored in Z-major order: index = z * 16 + x
    heights: Box<[i32; COLUMNS]>,
}

impl LightHeightmap {
    /// Creates a heightmap with every column fully open.
    #[must_use]
    pub fn new(min_y: i32) -> Self {
        Self {
            min_y,
            heights: Box::new([min_y; COLUMNS]),
        }
    }

    /// Gets the exposure height of a column.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, z: usize) -> i32 {
        debug_assert!(x < SECTION_SIZE && z < SECTION_SIZE, "Column coordinates must be 0-15");
        self.heights[z * SECTION_SIZE + x]
    }

    /// Sets the exposure height of a column.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, y: i32) {
        debug_assert!(x < SECTION_SIZE && z < SECTION_SIZE, "Column coordinates must be 0-15");
        debug_assert!(y >= self.min_y, "Height must not be below the chunk");
        self.heights[z * SECTION_SIZE + x] = y;
    }

    /// Whether the voxel at world height `y` in the column is open to the sky.
    #[inline]
    #[must_use]
    pub fn is_exposed(&self, x: usize, y: i32, z: usize) -> bool {
        y >= self.get(x, z)
    }

    /// The highest exposure height over all columns.
    #[must_use]
    pub fn max_height(&self) -> i32 {
        self.heights.iter().copied().max().unwrap_or(self.min_y)
    }

    /// The minimum y this heightmap was created for.
    #[must_use]
    pub fn min_y(&self) -> i32 {
        self.min_y
    }
}
