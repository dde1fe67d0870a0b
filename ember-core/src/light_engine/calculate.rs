//! Whole-section light derivation: reset, calculate and pulling light in across faces.

use ember_utils::Direction;

use super::{base::LightPropagator, queue_entry::QueueEntry, region::Voxel};
use crate::chunk::{SECTION_SIZE, SECTION_VOLUME, section_coords, section_light::MAX_LIGHT};

const LAST: u8 = (SECTION_SIZE - 1) as u8;

impl LightPropagator<'_, '_> {
    /// Zeroes both light planes of a section, and the border plane next to it when the
    /// section is the highest or lowest of its chunk.
    pub fn reset_light(&mut self, slot: u16, height: i32) {
        let (min_section, max_section) = (self.region.min_section(), self.region.max_section());
        let Some(chunk) = self.region.chunk_mut(slot) else {
            return;
        };
        if height == max_section {
            chunk.top_light_mut().reset();
        }
        if height == min_section {
            chunk.bottom_light_mut().reset();
        }
        if let Some(section) = chunk.section_mut(height) {
            section.light.reset();
        }
    }

    /// Derives a section's light from its own content: luminous blocks and sky exposure.
    ///
    /// Light from outside the section only arrives through traces that started elsewhere
    /// or through [`Self::propagate_from_neighbours`].
    pub fn calculate(&mut self, slot: u16, height: i32) {
        let Some(section) = self
            .region
            .chunk(slot)
            .and_then(|chunk| chunk.section(height))
        else {
            return;
        };

        let mut emitters = Vec::new();
        match section.blocks.uniform() {
            Some(state) => {
                let luminance = self.registry.state(state).luminance;
                if luminance > 0 {
                    emitters.extend((0..SECTION_VOLUME).map(|index| (index, luminance)));
                }
            }
            None => {
                for index in 0..SECTION_VOLUME {
                    let luminance = self.registry.state(section.block(index)).luminance;
                    if luminance > 0 {
                        emitters.push((index, luminance));
                    }
                }
            }
        }

        for (index, luminance) in emitters {
            let (x, y, z) = section_coords(index);
            let voxel = Self::voxel(slot, height, x, y, z);
            self.enqueue_increase(voxel, QueueEntry::increase_from_emission(luminance));
        }

        self.seed_sky(slot, height);
        self.run_light_updates();
    }

    fn seed_sky(&mut self, slot: u16, height: i32) {
        let base_y = height * SECTION_SIZE as i32;
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let Some(column) = self.region.max_height(slot, x as u8, z as u8) else {
                    return;
                };
                for y in 0..SECTION_SIZE {
                    let voxel = Self::voxel(slot, height, x, y, z);
                    let absolute_y = base_y + y as i32;
                    if absolute_y >= column {
                        self.region.set_sky_light(voxel, MAX_LIGHT);
                    } else if absolute_y == column - 1 {
                        self.enqueue_sky(
                            voxel,
                            QueueEntry::increase_skip_one_direction(MAX_LIGHT, Direction::Up),
                        );
                    } else {
                        for dir in Direction::HORIZONTAL {
                            if self
                                .region
                                .neighbour_column_height(voxel, dir)
                                .is_some_and(|neighbour| absolute_y >= neighbour)
                            {
                                self.enqueue_sky(
                                    voxel,
                                    QueueEntry::increase_skip_one_direction(MAX_LIGHT - 1, dir),
                                );
                            }
                        }
                    }
                }
            }
        }
    }

    /// Resets a section, then calculates it.
    pub fn recalculate(&mut self, slot: u16, height: i32) {
        self.reset_light(slot, height);
        self.calculate(slot, height);
    }

    /// Resets every section of a chunk, then calculates each of them.
    pub fn recalculate_chunk(&mut self, slot: u16) {
        let Some(heights) = self.region.chunk(slot).map(|chunk| chunk.section_heights()) else {
            return;
        };
        let (min_section, max_section) = (self.region.min_section(), self.region.max_section());
        self.reset_light(slot, min_section);
        self.reset_light(slot, max_section);
        for &height in &heights {
            self.reset_light(slot, height);
        }
        for &height in &heights {
            self.calculate(slot, height);
        }
    }

    /// Pulls light into a section from the voxels just outside each of its six faces.
    ///
    /// The section is created on demand if any light arrives.
    pub fn propagate_from_neighbours(&mut self, slot: u16, height: i32) {
        self.enqueue_from_neighbours(slot, height);
        self.run_light_updates();
    }

    /// Pulls light across the faces of every section height of a chunk.
    pub fn propagate_chunk_from_neighbours(&mut self, slot: u16) {
        for height in self.region.min_section()..=self.region.max_section() {
            self.enqueue_from_neighbours(slot, height);
        }
        self.run_light_updates();
    }

    fn enqueue_from_neighbours(&mut self, slot: u16, height: i32) {
        for dir in Direction::ALL {
            for a in 0..SECTION_SIZE as u8 {
                for b in 0..SECTION_SIZE as u8 {
                    let (x, y, z) = match dir {
                        Direction::Down => (a, 0, b),
                        Direction::Up => (a, LAST, b),
                        Direction::North => (a, b, 0),
                        Direction::South => (a, b, LAST),
                        Direction::West => (0, a, b),
                        Direction::East => (LAST, a, b),
                    };
                    let voxel = Voxel {
                        slot,
                        height,
                        x,
                        y,
                        z,
                    };
                    self.enqueue_from(voxel, dir);
                }
            }
        }
    }

    fn enqueue_from(&mut self, voxel: Voxel, dir: Direction) {
        let Some(neighbour) = self.region.step(voxel, dir) else {
            return;
        };
        let block = self.block_light_leaving(neighbour, dir.opposite());
        if block > 1 {
            self.enqueue_increase(voxel, QueueEntry::increase_skip_one_direction(block - 1, dir));
        }
        let sky = self.sky_light_leaving(neighbour, dir.opposite());
        let sky = if dir == Direction::Up { sky } else { sky.saturating_sub(1) };
        if sky > 0 {
            self.enqueue_sky(voxel, QueueEntry::increase_skip_one_direction(sky, dir));
        }
    }

    /// Block light that leaves `voxel` through its face `toward`.
    ///
    /// Border planes are sinks and give nothing back. An occluded face only lets the
    /// block's own emission out.
    fn block_light_leaving(&self, voxel: Voxel, toward: Direction) -> u8 {
        if self.region.is_border(voxel) {
            return 0;
        }
        let stored = self.region.block_light(voxel);
        let state = self.registry.state(self.region.block(voxel));
        if state.propagates_light_between(toward, toward) {
            stored
        } else {
            stored.min(state.luminance)
        }
    }

    /// Sky light that leaves `voxel` through its face `toward`.
    fn sky_light_leaving(&self, voxel: Voxel, toward: Direction) -> u8 {
        if !self.region.is_border(voxel)
            && !self
                .registry
                .state(self.region.block(voxel))
                .propagates_light_between(toward, toward)
        {
            return 0;
        }
        self.region.sky_light(voxel)
    }

    /// Re-derives a single voxel's light from its six neighbours and its own emission.
    ///
    /// The stored levels are cleared first: the voxel may already hold them behind faces
    /// that were occluded until now, and the trace has to leave through the opened faces.
    pub fn propagate_from_neighbours_at(&mut self, voxel: Voxel) {
        self.region.set_block_light(voxel, 0);
        if !self.region.is_exposed(voxel) {
            self.region.set_sky_light(voxel, 0);
        }
        let luminance = self.registry.state(self.region.block(voxel)).luminance;
        if luminance > 0 {
            self.enqueue_increase(voxel, QueueEntry::increase_from_emission(luminance));
        }
        for dir in Direction::ALL {
            self.enqueue_from(voxel, dir);
        }
        self.run_light_updates();
    }

    #[inline]
    fn voxel(slot: u16, height: i32, x: usize, y: usize, z: usize) -> Voxel {
        Voxel {
            slot,
            height,
            x: x as u8,
            y: y as u8,
            z: z as u8,
        }
    }
}
