//! A registered block state and the light facts the engine reads from it.

use ember_utils::{BlockStateId, Direction};

use super::light::LightProperties;

/// An immutable block state entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockState {
    /// The state's id. Section storage holds these ids.
    pub id: BlockStateId,
    /// The state's name, e.g. `torch`.
    pub name: &'static str,
    /// Emitted light level, 0-15.
    pub luminance: u8,
    /// Face occlusion rules.
    pub light: LightProperties,
}

impl BlockState {
    /// Creates a block state entry.
    ///
    /// # Panics
    /// Panics if `luminance` is above 15.
    #[must_use]
    pub const fn new(
        id: BlockStateId,
        name: &'static str,
        luminance: u8,
        light: LightProperties,
    ) -> Self {
        assert!(luminance <= 15, "luminance must be 0-15");
        Self {
            id,
            name,
            luminance,
            light,
        }
    }

    /// Whether light can pass through this state in at least one direction.
    #[must_use]
    #[inline]
    pub const fn propagates_light(&self) -> bool {
        self.light.propagates_light()
    }

    /// Whether light that entered through face `from` may leave through face `to`.
    #[must_use]
    #[inline]
    pub const fn propagates_light_between(&self, from: Direction, to: Direction) -> bool {
        self.light.propagates_light_between(from, to)
    }

    /// Whether this state stops sky exposure for the column below it.
    #[must_use]
    #[inline]
    pub const fn blocks_sky(&self) -> bool {
        !self.light.propagates_light_unconditionally()
    }
}
