//! Block state storage for one chunk section.

use std::mem;

use ember_utils::BlockStateId;

use super::SECTION_VOLUME;

/// Block states of a 16x16x16 section, indexed by [`super::section_index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockStorage {
    /// Every voxel holds the same state.
    Homogeneous(BlockStateId),
    /// One state per voxel.
    Heterogeneous(Box<[BlockStateId; SECTION_VOLUME]>),
}

impl BlockStorage {
    /// Creates storage with every voxel set to `state`.
    #[must_use]
    pub const fn new_filled(state: BlockStateId) -> Self {
        Self::Homogeneous(state)
    }

    /// Creates an all-air storage.
    #[must_use]
    pub const fn new_empty() -> Self {
        Self::Homogeneous(BlockStateId::AIR)
    }

    /// Gets the state at a voxel index.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> BlockStateId {
        match self {
            Self::Homogeneous(state) => *state,
            Self::Heterogeneous(states) => states[index],
        }
    }

    /// Sets the state at a voxel index and returns the previous one.
    ///
    /// If currently homogeneous and setting a different value, upgrades to heterogeneous.
    pub fn set(&mut self, index: usize, state: BlockStateId) -> BlockStateId {
        match self {
            Self::Homogeneous(current) => {
                let previous = *current;
                if previous != state {
                    let mut states = Box::new([previous; SECTION_VOLUME]);
                    states[index] = state;
                    *self = Self::Heterogeneous(states);
                }
                previous
            }
            Self::Heterogeneous(states) => mem::replace(&mut states[index], state),
        }
    }

    /// The single state shared by every voxel, if any.
    #[must_use]
    pub fn uniform(&self) -> Option<BlockStateId> {
        match self {
            Self::Homogeneous(state) => Some(*state),
            Self::Heterogeneous(_) => None,
        }
    }

    /// Counts the voxels that are not air.
    #[must_use]
    pub fn count_non_air(&self) -> usize {
        match self {
            Self::Homogeneous(state) if state.is_air() => 0,
            Self::Homogeneous(_) => SECTION_VOLUME,
            Self::Heterogeneous(states) => states.iter().filter(|s| !s.is_air()).count(),
        }
    }
}

impl Default for BlockStorage {
    fn default() -> Self {
        Self::new_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_upgrades_to_heterogeneous() {
        let mut storage = BlockStorage::new_empty();
        assert_eq!(storage.set(5, BlockStateId(3)), BlockStateId::AIR);

        assert_eq!(storage.get(5), BlockStateId(3));
        assert_eq!(storage.get(0), BlockStateId::AIR);
        assert!(storage.uniform().is_none());
        assert_eq!(storage.count_non_air(), 1);
    }

    #[test]
    fn test_same_value_stays_homogeneous() {
        let mut storage = BlockStorage::new_filled(BlockStateId(1));
        storage.set(100, BlockStateId(1));
        assert_eq!(storage.uniform(), Some(BlockStateId(1)));
        assert_eq!(storage.count_non_air(), SECTION_VOLUME);
    }
}
