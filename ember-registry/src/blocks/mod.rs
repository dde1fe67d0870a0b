//! Block state definitions and the block registry.

pub mod block_state;
pub mod light;
pub mod registry;

pub use block_state::BlockState;
pub use light::{FaceMask, LightProperties};
pub use registry::BlockRegistry;
