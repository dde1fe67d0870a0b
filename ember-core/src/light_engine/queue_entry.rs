//! `QueueEntry` bit-packing for light propagation.
//!
//! The `QueueEntry` packs all propagation metadata into a single u64:
//! - Bits 0-3: Light level (0-15)
//! - Bits 4-9: Direction flags (6 directions)
//! - Bits 10-12: Source direction ordinal + 1, 0 when the light has no source face
//! - Bit 13: Enforce flag for sky seeds
//!
//! Using u64 (instead of u16) for native word size performance on 64-bit CPUs.

use ember_utils::Direction;

/// A queue entry that encodes light propagation information in a bit-packed u64.
///
/// Bit layout:
/// ```text
/// Bit Position:  63..................14  13  12 11 10  9  8  7  6  5  4  3  2  1  0
///                |       Unused       | E | S  S  S | D  D  D  D  D  D | L  L  L  L |
///                                       |   |         |                 |
///                                       |   |         |                 +-> Light Level (4 bits)
///                                       |   |         +-------------------> Direction Flags (6 bits)
///                                       |   +-----------------------------> Source Direction (3 bits)
///                                       +---------------------------------> Enforce Flag
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueEntry(u64);

impl QueueEntry {
    /// Mask for light level (bits 0-3)
    const LEVEL_MASK: u64 = 0x0F;

    /// Mask for all direction flags (bits 4-9)
    const DIRECTIONS_MASK: u64 = 0x3F0;

    /// Shift of the source direction (bits 10-12)
    const SOURCE_SHIFT: u64 = 10;

    /// Mask for the source direction (bits 10-12)
    const SOURCE_MASK: u64 = 0x1C00;

    /// Flag for sky seeds that must be written regardless of stored light (bit 13)
    const ENFORCE_FLAG: u64 = 0x2000;

    /// Gets the light level from this queue entry (0-15).
    #[must_use]
    #[inline]
    pub fn level(self) -> u8 {
        (self.0 & Self::LEVEL_MASK) as u8
    }

    /// Checks if light should propagate in the given direction.
    #[must_use]
    #[inline]
    pub fn should_propagate(self, dir: Direction) -> bool {
        let bit = 1u64 << (dir as u8 + 4);
        (self.0 & bit) != 0
    }

    /// The face the light entered through, seen from the receiving voxel.
    #[must_use]
    #[inline]
    pub fn source(self) -> Option<Direction> {
        match (self.0 & Self::SOURCE_MASK) >> Self::SOURCE_SHIFT {
            0 => None,
            ordinal => Some(Direction::from_ordinal(ordinal as u8 - 1)),
        }
    }

    /// Whether the write ignores stored light and sky exposure.
    #[must_use]
    #[inline]
    pub fn is_enforced(self) -> bool {
        (self.0 & Self::ENFORCE_FLAG) != 0
    }

    /// Returns the same entry with the enforce flag set.
    #[must_use]
    #[inline]
    pub fn enforced(self) -> Self {
        Self(self.0 | Self::ENFORCE_FLAG)
    }

    /// Sets the light level in the entry, preserving other flags.
    #[must_use]
    #[inline]
    fn with_level(self, level: u8) -> Self {
        debug_assert!(level <= 15, "Light level must be 0-15");
        Self((self.0 & !Self::LEVEL_MASK) | (u64::from(level) & Self::LEVEL_MASK))
    }

    #[must_use]
    #[inline]
    fn with_direction(self, dir: Direction) -> Self {
        Self(self.0 | (1u64 << (dir as u8 + 4)))
    }

    #[must_use]
    #[inline]
    fn without_direction(self, dir: Direction) -> Self {
        Self(self.0 & !(1u64 << (dir as u8 + 4)))
    }

    #[must_use]
    #[inline]
    fn with_source(self, source: Direction) -> Self {
        let encoded = (u64::from(source as u8) + 1) << Self::SOURCE_SHIFT;
        Self((self.0 & !Self::SOURCE_MASK) | encoded)
    }

    /// Creates a queue entry for light emitted by a block, spreading in all directions.
    #[must_use]
    pub fn increase_from_emission(level: u8) -> Self {
        debug_assert!(level <= 15, "Light level must be 0-15");
        Self(Self::DIRECTIONS_MASK).with_level(level)
    }

    /// Creates a queue entry for light that entered through face `source`.
    ///
    /// The entry spreads everywhere except back out through `source`.
    #[must_use]
    pub fn increase_skip_one_direction(level: u8, source: Direction) -> Self {
        debug_assert!(level <= 15, "Light level must be 0-15");
        Self(Self::DIRECTIONS_MASK)
            .without_direction(source)
            .with_source(source)
            .with_level(level)
    }

    /// Creates a queue entry for a full sky light seed with selective directions.
    #[must_use]
    #[allow(clippy::fn_params_excessive_bools)]
    pub fn increase_sky_source_in_directions(
        down: bool,
        north: bool,
        south: bool,
        west: bool,
        east: bool,
    ) -> Self {
        let mut entry = Self(0).with_level(15);
        for (enabled, dir) in [
            (down, Direction::Down),
            (north, Direction::North),
            (south, Direction::South),
            (west, Direction::West),
            (east, Direction::East),
        ] {
            if enabled {
                entry = entry.with_direction(dir);
            }
        }
        entry
    }
}
