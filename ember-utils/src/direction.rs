//! The six face directions of a voxel.

use crate::types::BlockPos;

/// Six face directions, used both for light travel and for block face occlusion.
///
/// The ordinal values (0-5) index per-face arrays and are the bit positions used by
/// face masks and light queue entries.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Downward (-Y direction)
    Down = 0,
    /// Upward (+Y direction)
    Up = 1,
    /// North (-Z direction)
    North = 2,
    /// South (+Z direction)
    South = 3,
    /// West (-X direction)
    West = 4,
    /// East (+X direction)
    East = 5,
}

impl Direction {
    /// All six directions in array form for iteration.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// The four horizontal directions.
    pub const HORIZONTAL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns the direction with the given ordinal.
    ///
    /// # Panics
    /// Panics if `ordinal > 5`.
    #[must_use]
    pub const fn from_ordinal(ordinal: u8) -> Self {
        match ordinal {
            0 => Self::Down,
            1 => Self::Up,
            2 => Self::North,
            3 => Self::South,
            4 => Self::West,
            5 => Self::East,
            _ => panic!("direction ordinal out of range"),
        }
    }

    /// The ordinal as an array index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Whether this direction lies in the horizontal plane.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        !matches!(self, Self::Down | Self::Up)
    }

    /// Gets the offset in the given direction.
    ///
    /// Returns (dx, dy, dz) for this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// Returns a new `BlockPos` relative to the given position in this direction.
    #[must_use]
    pub const fn relative(self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        BlockPos::new(pos.x() + dx, pos.y() + dy, pos.z() + dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_ordinal(i as u8), *dir);
        }
    }

    #[test]
    fn test_opposite() {
        for dir in Direction::ALL {
            assert_ne!(dir.opposite(), dir);
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy, dz) = dir.offset();
            assert_eq!(dir.opposite().offset(), (-dx, -dy, -dz));
        }
    }

    #[test]
    fn test_relative() {
        let pos = BlockPos::new(4, -3, 9);
        assert_eq!(Direction::Down.relative(pos), BlockPos::new(4, -4, 9));
        assert_eq!(Direction::North.relative(pos), BlockPos::new(4, -3, 8));
        assert_eq!(Direction::East.relative(pos), BlockPos::new(5, -3, 9));
        assert!(Direction::HORIZONTAL.iter().all(|d| d.is_horizontal()));
        assert!(!Direction::Up.is_horizontal());
    }
}
