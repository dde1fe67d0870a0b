//! The eight horizontal neighbours of a chunk.
//!
//! Slot layout, x growing to the right and z growing downwards:
//! ```text
//! 0 | 3 | 5
//! 1 | - | 6
//! 2 | 4 | 7
//! ```

use std::sync::{Arc, Weak};

use ember_utils::Direction;

use super::level_chunk::Chunk;

/// Non-owning links from a chunk to its loaded horizontal neighbours.
///
/// The world's chunk map owns the chunks. A slot holds a link iff that neighbour is loaded;
/// unloading clears it through [`ChunkNeighbours::remove`].
#[derive(Debug)]
pub struct ChunkNeighbours {
    slots: [Option<Weak<Chunk>>; ChunkNeighbours::COUNT],
    count: usize,
}

impl ChunkNeighbours {
    /// Number of neighbour slots.
    pub const COUNT: usize = 8;

    /// The neighbour at -x.
    pub const WEST: usize = 1;
    /// The neighbour at -z.
    pub const NORTH: usize = 3;
    /// The neighbour at +z.
    pub const SOUTH: usize = 4;
    /// The neighbour at +x.
    pub const EAST: usize = 6;

    /// Chunk offsets `(dx, dz)` of each slot.
    pub const OFFSETS: [(i32, i32); Self::COUNT] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];

    /// Creates an empty neighbour table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; Self::COUNT],
            count: 0,
        }
    }

    /// Gets the slot index of a chunk offset.
    ///
    /// # Panics
    /// Panics if the offset is `(0, 0)` or not adjacent. Such an offset is a caller bug.
    #[must_use]
    pub const fn index_of(dx: i32, dz: i32) -> usize {
        match (dx, dz) {
            (-1, -1) => 0,
            (-1, 0) => 1,
            (-1, 1) => 2,
            (0, -1) => 3,
            (0, 1) => 4,
            (1, -1) => 5,
            (1, 0) => 6,
            (1, 1) => 7,
            _ => panic!("offset is not a neighbour slot"),
        }
    }

    /// Slot index of the neighbour that sees this chunk in slot `index`.
    #[must_use]
    #[inline]
    pub const fn opposite(index: usize) -> usize {
        debug_assert!(index < Self::COUNT);
        Self::COUNT - 1 - index
    }

    /// The slot sharing a face with the chunk in a horizontal direction.
    #[must_use]
    pub const fn cardinal_index(dir: Direction) -> Option<usize> {
        match dir {
            Direction::North => Some(Self::NORTH),
            Direction::South => Some(Self::SOUTH),
            Direction::West => Some(Self::WEST),
            Direction::East => Some(Self::EAST),
            Direction::Down | Direction::Up => None,
        }
    }

    /// Registers a neighbour.
    ///
    /// Returns true iff this call filled the last empty slot. Replacing a filled slot
    /// does not change the count.
    pub fn set(&mut self, index: usize, chunk: &Arc<Chunk>) -> bool {
        let slot = &mut self.slots[index];
        let was_empty = slot.is_none();
        *slot = Some(Arc::downgrade(chunk));
        if !was_empty {
            return false;
        }
        self.count += 1;
        debug_assert!(self.count <= Self::COUNT);
        self.count == Self::COUNT
    }

    /// Unregisters a neighbour. Removing an empty slot is a no-op.
    ///
    /// Returns whether a link was removed.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.slots[index].take().is_none() {
            return false;
        }
        self.count -= 1;
        true
    }

    /// Whether slot `index` is filled.
    #[must_use]
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        self.slots[index].is_some()
    }

    /// Gets the neighbour in slot `index`, if it is loaded.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arc<Chunk>> {
        self.slots[index].as_ref().and_then(Weak::upgrade)
    }

    /// All eight neighbours, or `None` unless the table is complete.
    #[must_use]
    pub fn get_all(&self) -> Option<[Arc<Chunk>; Self::COUNT]> {
        if !self.is_complete() {
            return None;
        }
        let chunks = self
            .slots
            .iter()
            .map(|slot| slot.as_ref().and_then(Weak::upgrade))
            .collect::<Option<Vec<_>>>()?;
        chunks.try_into().ok()
    }

    /// Number of filled slots.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether all eight neighbours are loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.count == Self::COUNT
    }
}

impl Default for ChunkNeighbours {
    fn default() -> Self {
        Self::new()
    }
}
