//! The shared entry point handing out propagators.

use std::sync::Arc;

use ember_registry::BlockRegistry;

use super::{base::LightPropagator, region::LightRegion};

/// Light engine shared by every chunk of a world.
///
/// The engine itself holds no light state; all state lives in the chunks, and each
/// operation runs in a [`LightPropagator`] over a locked region.
#[derive(Debug, Clone)]
pub struct LightEngine {
    registry: Arc<BlockRegistry>,
}

impl LightEngine {
    /// Creates a light engine reading block light properties from `registry`.
    #[must_use]
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self { registry }
    }

    /// The block registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Creates a propagator working on `region`.
    pub fn propagator<'r, 'a>(
        &'r self,
        region: &'r mut LightRegion<'a>,
    ) -> LightPropagator<'r, 'a> {
        LightPropagator::new(region, &self.registry)
    }
}
