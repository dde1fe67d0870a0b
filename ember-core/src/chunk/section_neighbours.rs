//! Face links between sections.
//!
//! Up and down stay inside the chunk's column (or leave it through a border plane).
//! North, south, west and east only ever lead into the four cardinal neighbour chunks.

use ember_utils::Direction;

use super::neighbours::ChunkNeighbours;

/// Where light leaving a section through one face ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighbourTarget {
    /// A section of this chunk or of a cardinal neighbour. The section itself may not exist yet.
    Section {
        /// Chunk offset along x.
        dx: i8,
        /// Chunk offset along z.
        dz: i8,
        /// Section height.
        height: i32,
    },
    /// The block light plane above the highest section.
    TopBorder,
    /// The block light plane below the lowest section.
    BottomBorder,
    /// The neighbour chunk is not loaded.
    Unloaded,
}

/// Links of one section to its six face neighbours, indexed by [`Direction`] ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionNeighbours([NeighbourTarget; 6]);

impl SectionNeighbours {
    /// Resolves the links of section `height` of a chunk with the given neighbour table.
    #[must_use]
    pub fn resolve(
        neighbours: &ChunkNeighbours,
        min_section: i32,
        max_section: i32,
        height: i32,
    ) -> Self {
        debug_assert!((min_section..=max_section).contains(&height));
        let targets = Direction::ALL.map(|dir| match dir {
            Direction::Down if height > min_section => NeighbourTarget::Section {
                dx: 0,
                dz: 0,
                height: height - 1,
            },
            Direction::Down => NeighbourTarget::BottomBorder,
            Direction::Up if height < max_section => NeighbourTarget::Section {
                dx: 0,
                dz: 0,
                height: height + 1,
            },
            Direction::Up => NeighbourTarget::TopBorder,
            horizontal => match ChunkNeighbours::cardinal_index(horizontal) {
                Some(index) if neighbours.is_set(index) => {
                    let (dx, dz) = ChunkNeighbours::OFFSETS[index];
                    NeighbourTarget::Section {
                        dx: dx as i8,
                        dz: dz as i8,
                        height,
                    }
                }
                _ => NeighbourTarget::Unloaded,
            },
        });
        Self(targets)
    }

    /// The target across the face in direction `dir`.
    #[must_use]
    #[inline]
    pub fn get(&self, dir: Direction) -> NeighbourTarget {
        self.0[dir.index()]
    }
}
