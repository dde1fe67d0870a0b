//! Position and id newtypes, so a section height is never passed where a block y belongs.

use std::fmt::{self, Display};

use crate::math::{Vector2, Vector3};

/// A raw block state id. Using the registry this id can be resolved into a block state and its light properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct BlockStateId(pub u16);

impl BlockStateId {
    /// The air block state. Every registry reserves id 0 for it.
    pub const AIR: BlockStateId = BlockStateId(0);

    /// Returns true for the air state.
    #[must_use]
    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

/// A chunk position. `0.y` holds the z axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos(pub Vector2<i32>);

impl ChunkPos {
    /// Creates a chunk position.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }

    /// The chunk x coordinate.
    #[must_use]
    #[inline]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// The chunk z coordinate.
    #[must_use]
    #[inline]
    pub const fn z(self) -> i32 {
        self.0.y
    }

    /// Returns the chunk `dx` chunks east and `dz` chunks south of this one.
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self::new(self.x() + dx, self.z() + dz)
    }

    /// Packs the position into a single i64, x in the low half.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        (self.x() as u32 as i64) | ((self.z() as i64) << 32)
    }

    /// The world x coordinate of the chunk's west edge.
    #[must_use]
    pub const fn min_block_x(self) -> i32 {
        self.x() << 4
    }

    /// The world z coordinate of the chunk's north edge.
    #[must_use]
    pub const fn min_block_z(self) -> i32 {
        self.z() << 4
    }
}

impl Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x(), self.z())
    }
}

/// A block position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos(pub Vector3<i32>);

impl BlockPos {
    /// Creates a block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// The x coordinate.
    #[must_use]
    #[inline]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// The y coordinate.
    #[must_use]
    #[inline]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// The z coordinate.
    #[must_use]
    #[inline]
    pub const fn z(self) -> i32 {
        self.0.z
    }

    /// The chunk containing this block.
    #[must_use]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::new(self.x() >> 4, self.z() >> 4)
    }

    /// The section height containing this block.
    #[must_use]
    pub const fn section_height(self) -> i32 {
        self.y() >> 4
    }

    /// The section containing this block.
    #[must_use]
    pub const fn section_pos(self) -> SectionPos {
        SectionPos::new(self.x() >> 4, self.y() >> 4, self.z() >> 4)
    }

    /// Coordinates relative to the containing section, each in `0..16`.
    #[must_use]
    pub const fn section_local(self) -> (usize, usize, usize) {
        (
            (self.x() & 15) as usize,
            (self.y() & 15) as usize,
            (self.z() & 15) as usize,
        )
    }
}

impl Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x(), self.y(), self.z())
    }
}

/// A section position: chunk x, section height, chunk z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionPos(pub Vector3<i32>);

impl SectionPos {
    /// Creates a section position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    /// Creates the position of section `height` in the given chunk.
    #[must_use]
    pub const fn of_chunk(chunk: ChunkPos, height: i32) -> Self {
        Self::new(chunk.x(), height, chunk.z())
    }

    /// The chunk this section belongs to.
    #[must_use]
    pub const fn chunk_pos(self) -> ChunkPos {
        ChunkPos::new(self.0.x, self.0.z)
    }

    /// The section height.
    #[must_use]
    pub const fn height(self) -> i32 {
        self.0.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_to_chunk() {
        let pos = BlockPos::new(-1, 70, 33);
        assert_eq!(pos.chunk_pos(), ChunkPos::new(-1, 2));
        assert_eq!(pos.section_height(), 4);
        assert_eq!(pos.section_local(), (15, 6, 1));
    }

    #[test]
    fn test_negative_section() {
        let pos = BlockPos::new(0, -1, 0);
        assert_eq!(pos.section_height(), -1);
        assert_eq!(pos.section_local(), (0, 15, 0));
        assert_eq!(pos.section_pos(), SectionPos::new(0, -1, 0));
    }

    #[test]
    fn test_chunk_pos_packing() {
        let a = ChunkPos::new(-1, 1);
        let b = ChunkPos::new(1, -1);
        assert_ne!(a.as_i64(), b.as_i64());
        assert_eq!(ChunkPos::new(3, 4).offset(-1, 1), ChunkPos::new(2, 5));
        assert_eq!(ChunkPos::new(-2, 3).min_block_x(), -32);
    }
}
