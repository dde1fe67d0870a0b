//! Per block state light occlusion rules.

use bitflags::bitflags;
use ember_utils::Direction;

bitflags! {
    /// A set of voxel faces, one bit per [`Direction`] ordinal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FaceMask: u8 {
        /// The bottom face.
        const DOWN = 1 << 0;
        /// The top face.
        const UP = 1 << 1;
        /// The north face.
        const NORTH = 1 << 2;
        /// The south face.
        const SOUTH = 1 << 3;
        /// The west face.
        const WEST = 1 << 4;
        /// The east face.
        const EAST = 1 << 5;
    }
}

impl FaceMask {
    /// The mask holding only the face in direction `dir`.
    #[must_use]
    #[inline]
    pub const fn of(dir: Direction) -> Self {
        Self::from_bits_retain(1u8 << dir as u8)
    }

    /// Whether the face in direction `dir` is part of the mask.
    #[must_use]
    #[inline]
    pub const fn has(self, dir: Direction) -> bool {
        self.contains(Self::of(dir))
    }
}

/// How a block state lets light through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightProperties {
    /// Light passes between every pair of faces and sky light is not considered blocked.
    Transparent,
    /// No light passes. The block holds no light of its own unless it is luminous.
    Opaque,
    /// Light passes unless it enters or leaves through one of the occluded faces.
    ///
    /// A bottom slab occludes `DOWN`, a stair additionally occludes its back face.
    /// An empty mask still counts as a sky blocker (leaves, water).
    Directed(FaceMask),
}

impl LightProperties {
    /// Whether light can pass through this block in at least one direction.
    #[must_use]
    #[inline]
    pub const fn propagates_light(self) -> bool {
        !matches!(self, Self::Opaque)
    }

    /// Whether light passes between all faces without any occlusion.
    #[must_use]
    #[inline]
    pub const fn propagates_light_unconditionally(self) -> bool {
        matches!(self, Self::Transparent)
    }

    /// Whether light that entered through face `from` may leave through face `to`.
    #[must_use]
    #[inline]
    pub const fn propagates_light_between(self, from: Direction, to: Direction) -> bool {
        match self {
            Self::Transparent => true,
            Self::Opaque => false,
            Self::Directed(occluded) => !occluded.has(from) && !occluded.has(to),
        }
    }
}
