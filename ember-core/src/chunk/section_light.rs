//! Packed light storage for chunk sections.
//!
//! Each voxel gets one byte: sky light in the high nibble, block light in the low nibble.
//! A 16x16x16 section therefore needs 4096 bytes.

use std::{fmt, mem};

use super::SECTION_VOLUME;

/// Mask of the block light nibble.
pub const BLOCK_LIGHT_MASK: u8 = 0x0F;

/// Mask of the sky light nibble.
pub const SKY_LIGHT_MASK: u8 = 0xF0;

const SKY_LIGHT_SHIFT: u8 = 4;

/// The highest light level.
pub const MAX_LIGHT: u8 = 15;

/// Light of one section plus the flag telling the mesher it changed.
#[derive(Clone)]
pub struct SectionLight {
    light: Box<[u8; SECTION_VOLUME]>,
    dirty: bool,
}

impl SectionLight {
    /// Creates a dark section light store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            light: Box::new([0; SECTION_VOLUME]),
            dirty: false,
        }
    }

    /// Gets the packed light byte at the given voxel index.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.light[index]
    }

    /// Gets the block light level at the given voxel index.
    #[must_use]
    #[inline]
    pub fn block_light(&self, index: usize) -> u8 {
        self.light[index] & BLOCK_LIGHT_MASK
    }

    /// Gets the sky light level at the given voxel index.
    #[must_use]
    #[inline]
    pub fn sky_light(&self, index: usize) -> u8 {
        (self.light[index] & SKY_LIGHT_MASK) >> SKY_LIGHT_SHIFT
    }

    /// Sets the block light level, preserving the sky light nibble.
    #[inline]
    pub fn set_block_light(&mut self, index: usize, level: u8) {
        debug_assert!(level <= MAX_LIGHT, "Light level must be 0-15");
        self.light[index] = (self.light[index] & SKY_LIGHT_MASK) | (level & BLOCK_LIGHT_MASK);
        self.dirty = true;
    }

    /// Sets the sky light level, preserving the block light nibble.
    #[inline]
    pub fn set_sky_light(&mut self, index: usize, level: u8) {
        debug_assert!(level <= MAX_LIGHT, "Light level must be 0-15");
        self.light[index] =
            (self.light[index] & BLOCK_LIGHT_MASK) | ((level << SKY_LIGHT_SHIFT) & SKY_LIGHT_MASK);
        self.dirty = true;
    }

    /// Zeroes both planes of every voxel.
    pub fn reset(&mut self) {
        self.light.fill(0);
        self.dirty = true;
    }

    /// Whether the section changed since the flag was last taken.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the section for remeshing.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns the dirty flag and clears it.
    pub fn take_dirty(&mut self) -> bool {
        mem::take(&mut self.dirty)
    }

    /// The raw packed bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; SECTION_VOLUME] {
        &self.light
    }
}

impl Default for SectionLight {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SectionLight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lit = self.light.iter().filter(|&&b| b != 0).count();
        f.debug_struct("SectionLight")
            .field("lit_voxels", &lit)
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planes_are_independent() {
        let mut light = SectionLight::new();
        light.set_block_light(7, 12);
        light.set_sky_light(7, 5);
        assert_eq!(light.block_light(7), 12);
        assert_eq!(light.sky_light(7), 5);
        assert_eq!(light.get(7), 0x5C);

        light.set_block_light(7, 3);
        assert_eq!(light.sky_light(7), 5);
        light.set_sky_light(7, 15);
        assert_eq!(light.block_light(7), 3);
        assert_eq!(light.get(7), 0xF3);
    }

    #[test]
    fn test_dirty_flag() {
        let mut light = SectionLight::new();
        assert!(!light.is_dirty());
        light.set_block_light(0, 1);
        assert!(light.take_dirty());
        assert!(!light.is_dirty());
        light.reset();
        assert!(light.is_dirty());
        assert_eq!(light.get(0), 0);
    }
}
