//! Block light that left a chunk through the top or bottom of its vertical range.

use super::SECTION_SIZE;

const COLUMNS: usize = SECTION_SIZE * SECTION_SIZE;

/// A one voxel thick block light plane directly above the highest (or below the lowest)
/// section of a chunk.
///
/// Light is stored here so faces on the world's vertical edges still get lit, but it does
/// not travel any further.
#[derive(Debug, Clone)]
pub struct BorderLight {
    /// Stored in Z-major order: index = z * 16 + x
    light: Box<[u8; COLUMNS]>,
}

impl BorderLight {
    /// Creates a dark plane.
    #[must_use]
    pub fn new() -> Self {
        Self {
            light: Box::new([0; COLUMNS]),
        }
    }

    /// Gets the block light of a column.
    #[must_use]
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> u8 {
        debug_assert!(x < SECTION_SIZE && z < SECTION_SIZE);
        self.light[z * SECTION_SIZE + x]
    }

    /// Sets the block light of a column.
    #[inline]
    pub fn set(&mut self, x: usize, z: usize, level: u8) {
        debug_assert!(x < SECTION_SIZE && z < SECTION_SIZE);
        debug_assert!(level <= 15, "Light level must be 0-15");
        self.light[z * SECTION_SIZE + x] = level;
    }

    /// Clears the plane.
    pub fn reset(&mut self) {
        self.light.fill(0);
    }
}

impl Default for BorderLight {
    fn default() -> Self {
        Self::new()
    }
}
