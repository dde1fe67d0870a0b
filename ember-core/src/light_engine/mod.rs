//! Flood-fill light propagation for block light and sky light.

mod base;
mod block_change;
mod calculate;
mod engine;
pub mod light_queue;
pub mod queue_entry;
pub mod region;

#[cfg(test)]
mod tests;

pub use base::LightPropagator;
pub use engine::LightEngine;
pub use light_queue::LightQueue;
pub use queue_entry::QueueEntry;
pub use region::{LightRegion, RegionChunks, Voxel};
