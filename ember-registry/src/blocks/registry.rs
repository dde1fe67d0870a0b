//! The block registry.

use ember_utils::BlockStateId;
use rustc_hash::FxHashMap;

use super::{block_state::BlockState, light::LightProperties};
use crate::{RegistryExt, vanilla_blocks};

/// Lookup table from block state ids to their light facts.
///
/// Ids are dense: the state registered n-th has id n, which keeps the lookup on the
/// propagation hot path a plain index.
#[derive(Debug)]
pub struct BlockRegistry {
    by_id: Vec<BlockState>,
    by_name: FxHashMap<&'static str, BlockStateId>,
    allows_registering: bool,
}

impl BlockRegistry {
    /// Creates an empty registry that still accepts entries.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_id: Vec::new(),
            by_name: FxHashMap::default(),
            allows_registering: true,
        }
    }

    /// Creates a registry holding the vanilla block table, not yet frozen.
    #[must_use]
    pub fn new_vanilla() -> Self {
        let mut registry = Self::new();
        vanilla_blocks::register_all(&mut registry);
        registry
    }

    /// Registers a block state.
    ///
    /// # Panics
    /// Panics if the registry is frozen, if the id is not the next free id or if the name is taken.
    pub fn register(&mut self, state: BlockState) {
        assert!(
            self.allows_registering,
            "Cannot register block state after registry is frozen"
        );
        assert_eq!(
            usize::from(state.id.0),
            self.by_id.len(),
            "Block state {} registered out of order",
            state.name
        );
        let previous = self.by_name.insert(state.name, state.id);
        assert!(previous.is_none(), "Block state {} registered twice", state.name);
        self.by_id.push(state);
    }

    /// Registers a state under the next free id and returns that id.
    pub fn register_next(
        &mut self,
        name: &'static str,
        luminance: u8,
        light: LightProperties,
    ) -> BlockStateId {
        let id = BlockStateId(self.by_id.len() as u16);
        self.register(BlockState::new(id, name, luminance, light));
        id
    }

    /// Gets a block state by id.
    #[must_use]
    pub fn get(&self, id: BlockStateId) -> Option<&BlockState> {
        self.by_id.get(usize::from(id.0))
    }

    /// Gets a block state by id, treating unknown ids as air.
    ///
    /// # Panics
    /// Panics if the registry is empty.
    #[must_use]
    #[inline]
    pub fn state(&self, id: BlockStateId) -> &BlockState {
        self.by_id
            .get(usize::from(id.0))
            .unwrap_or(&self.by_id[usize::from(BlockStateId::AIR.0)])
    }

    /// Gets a block state id by name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<BlockStateId> {
        self.by_name.get(name).copied()
    }

    /// The number of registered states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no states are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryExt for BlockRegistry {
    fn freeze(&mut self) {
        log::debug!("Freezing block registry with {} states", self.by_id.len());
        self.allows_registering = false;
    }
}
