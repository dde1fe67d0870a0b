//! The built-in block table.

use ember_utils::BlockStateId;

use crate::{BlockRegistry, BlockState, FaceMask, LightProperties};

/// Air.
pub const AIR: BlockStateId = BlockStateId(0);
/// Stone.
pub const STONE: BlockStateId = BlockStateId(1);
/// Dirt.
pub const DIRT: BlockStateId = BlockStateId(2);
/// Grass block.
pub const GRASS_BLOCK: BlockStateId = BlockStateId(3);
/// Bedrock.
pub const BEDROCK: BlockStateId = BlockStateId(4);
/// Glass.
pub const GLASS: BlockStateId = BlockStateId(5);
/// Glowstone.
pub const GLOWSTONE: BlockStateId = BlockStateId(6);
/// Torch.
pub const TORCH: BlockStateId = BlockStateId(7);
/// Lantern.
pub const LANTERN: BlockStateId = BlockStateId(8);
/// Redstone torch, lit.
pub const REDSTONE_TORCH: BlockStateId = BlockStateId(9);
/// Magma block.
pub const MAGMA_BLOCK: BlockStateId = BlockStateId(10);
/// Stone slab, bottom half.
pub const STONE_SLAB_BOTTOM: BlockStateId = BlockStateId(11);
/// Stone slab, top half.
pub const STONE_SLAB_TOP: BlockStateId = BlockStateId(12);
/// Oak stairs facing north, bottom half.
pub const OAK_STAIRS_NORTH: BlockStateId = BlockStateId(13);
/// Oak leaves.
pub const OAK_LEAVES: BlockStateId = BlockStateId(14);
/// Water source.
pub const WATER: BlockStateId = BlockStateId(15);

const BLOCKS: [BlockState; 16] = [
    BlockState::new(AIR, "air", 0, LightProperties::Transparent),
    BlockState::new(STONE, "stone", 0, LightProperties::Opaque),
    BlockState::new(DIRT, "dirt", 0, LightProperties::Opaque),
    BlockState::new(GRASS_BLOCK, "grass_block", 0, LightProperties::Opaque),
    BlockState::new(BEDROCK, "bedrock", 0, LightProperties::Opaque),
    BlockState::new(GLASS, "glass", 0, LightProperties::Transparent),
    BlockState::new(GLOWSTONE, "glowstone", 15, LightProperties::Opaque),
    BlockState::new(TORCH, "torch", 14, LightProperties::Transparent),
    BlockState::new(LANTERN, "lantern", 15, LightProperties::Transparent),
    BlockState::new(REDSTONE_TORCH, "redstone_torch", 7, LightProperties::Transparent),
    BlockState::new(MAGMA_BLOCK, "magma_block", 3, LightProperties::Opaque),
    BlockState::new(
        STONE_SLAB_BOTTOM,
        "stone_slab_bottom",
        0,
        LightProperties::Directed(FaceMask::DOWN),
    ),
    BlockState::new(
        STONE_SLAB_TOP,
        "stone_slab_top",
        0,
        LightProperties::Directed(FaceMask::UP),
    ),
    BlockState::new(
        OAK_STAIRS_NORTH,
        "oak_stairs_north",
        0,
        LightProperties::Directed(FaceMask::DOWN.union(FaceMask::NORTH)),
    ),
    BlockState::new(
        OAK_LEAVES,
        "oak_leaves",
        0,
        LightProperties::Directed(FaceMask::empty()),
    ),
    BlockState::new(WATER, "water", 0, LightProperties::Directed(FaceMask::empty())),
];

/// Registers every built-in state in id order.
pub fn register_all(registry: &mut BlockRegistry) {
    for state in BLOCKS {
        registry.register(state);
    }
}
