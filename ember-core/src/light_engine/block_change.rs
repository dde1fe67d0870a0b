//! Incremental light maintenance after a single block changed.

use smallvec::SmallVec;

use ember_registry::{BlockState, LightProperties};
use ember_utils::Direction;

use super::{base::LightPropagator, queue_entry::QueueEntry, region::Voxel};
use crate::chunk::{SECTION_SIZE, section_light::MAX_LIGHT};

impl LightPropagator<'_, '_> {
    /// Updates light after the block at `voxel` changed from `previous` to `now`.
    ///
    /// `None` stands for air. The new block must already be stored in the region; the
    /// column heightmap is refreshed here.
    pub fn on_block_change(
        &mut self,
        voxel: Voxel,
        previous: Option<&BlockState>,
        now: Option<&BlockState>,
    ) {
        let (old_height, new_height) = self.region.update_height(self.registry, voxel);

        let (previous_luminance, previous_light) = Self::light_facts(previous);
        let (luminance, light) = Self::light_facts(now);

        if luminance == previous_luminance && light == previous_light {
            return;
        }
        // An emitter that opens the voxel pulls in its neighbours' light as well.
        let opened = light != previous_light
            && (light.propagates_light_unconditionally()
                || (!previous_light.propagates_light() && light.propagates_light()));

        let mut decreased = false;
        if luminance < previous_luminance || (luminance == previous_luminance && !opened) {
            self.start_decrease_trace(voxel);
            decreased = true;
        } else if opened {
            self.propagate_from_neighbours_at(voxel);
        } else {
            self.trace_increase(voxel, luminance, None);
        }

        if new_height < old_height {
            self.expose_column(voxel, new_height, old_height);
        } else if new_height > old_height && !decreased {
            self.start_decrease_trace(voxel);
        }
    }

    fn light_facts(state: Option<&BlockState>) -> (u8, LightProperties) {
        state.map_or((0, LightProperties::Transparent), |state| {
            (state.luminance, state.light)
        })
    }

    /// Clears and re-derives all light that the old light at `voxel` could have reached.
    ///
    /// The cleared box spans every section within the old `max(block, sky)` level of the
    /// voxel. When the voxel held sky light every section below the box is included too.
    /// Each section in the box is reset, then calculated, then pulls light back in from
    /// its faces.
    pub fn start_decrease_trace(&mut self, voxel: Voxel) {
        let sky = self.region.sky_light(voxel);
        let radius = i32::from(self.region.block_light(voxel).max(sky));
        if radius == 0 {
            return;
        }

        let chunk_offsets = |local: u8| {
            let local = i32::from(local);
            let mut offsets: SmallVec<[i32; 3]> = SmallVec::new();
            offsets.push(0);
            if local < radius {
                offsets.push(-1);
            }
            if local + radius > SECTION_SIZE as i32 - 1 {
                offsets.push(1);
            }
            offsets
        };
        let xs = chunk_offsets(voxel.x);
        let zs = chunk_offsets(voxel.z);
        let ys = chunk_offsets(voxel.y);

        let top = (voxel.height + ys.iter().copied().max().unwrap_or_default())
            .min(self.region.max_section());
        let bottom = if sky > 0 {
            self.region.min_section()
        } else {
            (voxel.height + ys.iter().copied().min().unwrap_or_default())
                .max(self.region.min_section())
        };

        let mut sections: Vec<(u16, i32)> = Vec::new();
        for &dx in &xs {
            for &dz in &zs {
                let Some(slot) = self.region.slot_offset(voxel.slot, dx, dz) else {
                    continue;
                };
                let Some(chunk) = self.region.chunk(slot) else {
                    continue;
                };
                sections.extend(
                    (bottom..=top)
                        .filter(|&height| chunk.section(height).is_some())
                        .map(|height| (slot, height)),
                );
            }
        }

        log::debug!(
            "Decrease trace at {:?} (radius {radius}) resets {} sections",
            voxel,
            sections.len()
        );

        for &(slot, height) in &sections {
            self.reset_light(slot, height);
        }
        for &(slot, height) in &sections {
            self.calculate(slot, height);
        }
        for &(slot, height) in &sections {
            self.propagate_from_neighbours(slot, height);
        }
    }

    /// Lights the voxels of a column that became open to the sky, `from..to` in world y.
    fn expose_column(&mut self, voxel: Voxel, from: i32, to: i32) {
        let at = |y: i32| Voxel {
            height: y.div_euclid(SECTION_SIZE as i32),
            y: y.rem_euclid(SECTION_SIZE as i32) as u8,
            ..voxel
        };
        for y in from + 1..to {
            let exposed = at(y);
            if self.region.is_border(exposed) {
                continue;
            }
            let entry =
                QueueEntry::increase_sky_source_in_directions(false, true, true, true, true)
                    .enforced();
            self.enqueue_sky(exposed, entry);
        }
        // Only the lowest exposed voxel carries the light further down.
        let bottom = at(from);
        if self.region.is_border(bottom) {
            self.run_light_updates();
        } else {
            self.trace_skylight(bottom, MAX_LIGHT, Some(Direction::Up), true);
        }
    }
}
