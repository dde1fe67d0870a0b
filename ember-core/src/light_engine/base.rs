//! Flood-fill light propagation over a locked region.
//!
//! Two FIFO queues drive the traversal, one per light plane. Each entry carries the level
//! to write and the face the light came in through; a voxel that already holds at least
//! that level ends the branch, which bounds every path at 15 steps.

use ember_registry::BlockRegistry;
use ember_utils::Direction;

use super::{
    light_queue::LightQueue,
    queue_entry::QueueEntry,
    region::{LightRegion, Voxel},
};

/// Runs light traces against a [`LightRegion`].
///
/// The propagator assumes exclusive access to the region; callers acquire it through
/// [`RegionChunks::lock`](super::RegionChunks::lock).
#[derive(Debug)]
pub struct LightPropagator<'r, 'a> {
    pub(super) region: &'r mut LightRegion<'a>,
    pub(super) registry: &'r BlockRegistry,
    /// Queue for block light increases.
    increase_queue: LightQueue,
    /// Queue for sky light increases.
    sky_queue: LightQueue,
}

impl<'r, 'a> LightPropagator<'r, 'a> {
    /// Creates a propagator with empty queues.
    #[must_use]
    pub fn new(region: &'r mut LightRegion<'a>, registry: &'r BlockRegistry) -> Self {
        Self {
            region,
            registry,
            increase_queue: LightQueue::new(),
            sky_queue: LightQueue::new(),
        }
    }

    /// The region this propagator writes to.
    #[must_use]
    pub fn region(&self) -> &LightRegion<'a> {
        self.region
    }

    /// Enqueues a block light increase.
    pub fn enqueue_increase(&mut self, voxel: Voxel, entry: QueueEntry) {
        self.increase_queue.enqueue(voxel, entry);
    }

    /// Enqueues a sky light increase.
    pub fn enqueue_sky(&mut self, voxel: Voxel, entry: QueueEntry) {
        self.sky_queue.enqueue(voxel, entry);
    }

    /// Floods block light outward from `voxel` at `level`.
    ///
    /// `source` is the face the light entered through; `None` spreads in all six directions.
    pub fn trace_increase(&mut self, voxel: Voxel, level: u8, source: Option<Direction>) {
        let entry = match source {
            Some(source) => QueueEntry::increase_skip_one_direction(level, source),
            None => QueueEntry::increase_from_emission(level),
        };
        self.enqueue_increase(voxel, entry);
        self.propagate_increases();
    }

    /// Floods sky light outward from `voxel` at `level`.
    ///
    /// Unless `enforce` is set, exposed voxels are skipped since they read 15 anyway.
    pub fn trace_skylight(
        &mut self,
        voxel: Voxel,
        level: u8,
        source: Option<Direction>,
        enforce: bool,
    ) {
        let mut entry = match source {
            Some(source) => QueueEntry::increase_skip_one_direction(level, source),
            None => QueueEntry::increase_from_emission(level),
        };
        if enforce {
            entry = entry.enforced();
        }
        self.enqueue_sky(voxel, entry);
        self.propagate_sky();
    }

    /// Runs all queued light updates, block light first.
    pub fn run_light_updates(&mut self) {
        self.propagate_increases();
        self.propagate_sky();
    }

    /// Checks if there are any pending light updates.
    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.increase_queue.is_empty() || !self.sky_queue.is_empty()
    }

    fn propagate_increases(&mut self) {
        while let Some((voxel, entry)) = self.increase_queue.dequeue() {
            self.propagate_increase(voxel, entry);
        }
    }

    fn propagate_sky(&mut self) {
        while let Some((voxel, entry)) = self.sky_queue.dequeue() {
            self.propagate_sky_step(voxel, entry);
        }
    }

    fn propagate_increase(&mut self, voxel: Voxel, entry: QueueEntry) {
        let level = entry.level();
        if level == 0 {
            return;
        }

        if self.region.is_border(voxel) {
            if self.region.block_light(voxel) < level {
                self.region.set_block_light(voxel, level);
                self.region.mark_dirty(voxel);
            }
            return;
        }

        let state = self.registry.state(self.region.block(voxel));
        if !state.propagates_light() && state.luminance == 0 {
            return;
        }
        // Light only enters through open faces, so whatever a voxel holds may leave
        // through any of them.
        if let Some(source) = entry.source()
            && !state.propagates_light_between(source, source)
        {
            return;
        }
        if self.region.block_light(voxel) >= level {
            return;
        }
        self.region.set_block_light(voxel, level);

        if level == 1 {
            self.region.mark_boundary_dirty(voxel);
            return;
        }
        // Light arriving below the block's own emission is replaced by the emission trace.
        if state.luminance > level {
            return;
        }

        for dir in Direction::ALL {
            if !entry.should_propagate(dir) {
                continue;
            }
            if let Some(source) = entry.source()
                && !state.propagates_light_between(source, dir)
            {
                continue;
            }
            if let Some(next) = self.region.step(voxel, dir) {
                self.increase_queue.enqueue(
                    next,
                    QueueEntry::increase_skip_one_direction(level - 1, dir.opposite()),
                );
            }
        }
    }

    fn propagate_sky_step(&mut self, voxel: Voxel, entry: QueueEntry) {
        let level = entry.level();
        if level == 0 || self.region.is_border(voxel) {
            return;
        }
        let enforced = entry.is_enforced();
        if !enforced && self.region.is_exposed(voxel) {
            return;
        }

        let state = self.registry.state(self.region.block(voxel));
        if !state.propagates_light() {
            return;
        }
        if let Some(source) = entry.source()
            && !state.propagates_light_between(source, source)
        {
            return;
        }
        if !enforced && self.region.stored_sky_light(voxel) >= level {
            return;
        }
        self.region.set_sky_light(voxel, level);

        for dir in Direction::ALL {
            if !entry.should_propagate(dir) {
                continue;
            }
            if let Some(source) = entry.source()
                && !state.propagates_light_between(source, dir)
            {
                continue;
            }
            let next_level = if dir == Direction::Down { level } else { level - 1 };
            if next_level == 0 {
                continue;
            }
            if let Some(next) = self.region.step(voxel, dir) {
                self.sky_queue.enqueue(
                    next,
                    QueueEntry::increase_skip_one_direction(next_level, dir.opposite()),
                );
            }
        }
    }
}
