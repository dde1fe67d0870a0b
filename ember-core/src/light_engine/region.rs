//! A locked square of chunks that light traces run inside.
//!
//! [`RegionChunks`] gathers the chunks, [`RegionChunks::lock`] acquires them in canonical
//! `(x, z)` order and yields a [`LightRegion`] that addresses voxels by chunk slot.

use std::sync::Arc;

use smallvec::SmallVec;

use ember_registry::BlockRegistry;
use ember_utils::{BlockPos, BlockStateId, ChunkPos, Direction, locks::SyncMutexGuard};

use crate::chunk::{
    SECTION_SIZE,
    level_chunk::{Chunk, ChunkData},
    section_index,
    section_light::MAX_LIGHT,
    section_neighbours::{NeighbourTarget, SectionNeighbours},
};

/// A voxel inside a [`LightRegion`].
///
/// `height` may be one above the highest section (with `y == 0`) or one below the lowest
/// (with `y == 15`); those voxels live in the chunk's border light planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Voxel {
    /// Chunk slot in the region.
    pub slot: u16,
    /// Section height.
    pub height: i32,
    /// Section-local x.
    pub x: u8,
    /// Section-local y.
    pub y: u8,
    /// Section-local z.
    pub z: u8,
}

impl Voxel {
    /// Index of the voxel inside its section.
    #[must_use]
    #[inline]
    pub fn index(self) -> usize {
        section_index(self.x.into(), self.y.into(), self.z.into())
    }

    /// World y of the voxel.
    #[must_use]
    #[inline]
    pub fn absolute_y(self) -> i32 {
        self.height * SECTION_SIZE as i32 + i32::from(self.y)
    }
}

/// The chunks around a center chunk, gathered but not yet locked.
#[derive(Debug)]
pub struct RegionChunks {
    chunks: Vec<Arc<Chunk>>,
    center: ChunkPos,
    radius: i32,
    min_section: i32,
    max_section: i32,
}

impl RegionChunks {
    /// The center chunk and whatever of its eight neighbours are linked right now.
    pub fn around_neighbours(center: &Arc<Chunk>) -> Self {
        let mut chunks = vec![Arc::clone(center)];
        {
            let data = center.lock();
            let neighbours = data.neighbours();
            chunks.extend((0..8).filter_map(|index| neighbours.get(index)));
        }
        Self::from_chunks(center, chunks, 1)
    }

    /// The center chunk and every chunk within `radius` that `lookup` can find.
    pub fn collect(
        center: &Arc<Chunk>,
        radius: i32,
        mut lookup: impl FnMut(ChunkPos) -> Option<Arc<Chunk>>,
    ) -> Self {
        let mut chunks = vec![Arc::clone(center)];
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if dx == 0 && dz == 0 {
                    continue;
                }
                if let Some(chunk) = lookup(center.pos().offset(dx, dz)) {
                    chunks.push(chunk);
                }
            }
        }
        Self::from_chunks(center, chunks, radius)
    }

    fn from_chunks(center: &Arc<Chunk>, chunks: Vec<Arc<Chunk>>, radius: i32) -> Self {
        Self {
            chunks,
            center: center.pos(),
            radius,
            min_section: center.min_section(),
            max_section: center.max_section(),
        }
    }

    /// Locks every gathered chunk.
    ///
    /// Locks are taken in ascending `(x, z)` order. Every multi chunk acquisition goes
    /// through here, so two regions never wait on each other in a cycle.
    pub fn lock(&self) -> LightRegion<'_> {
        let mut order: SmallVec<[&Arc<Chunk>; 25]> = self.chunks.iter().collect();
        order.sort_unstable_by_key(|chunk| (chunk.pos().x(), chunk.pos().z()));

        let width = 2 * self.radius + 1;
        let mut chunks: Vec<Option<RegionChunk<'_>>> =
            (0..width * width).map(|_| None).collect();
        for chunk in order {
            let dx = chunk.pos().x() - self.center.x();
            let dz = chunk.pos().z() - self.center.z();
            let slot = ((dx + self.radius) * width + dz + self.radius) as usize;
            chunks[slot] = Some(RegionChunk {
                data: chunk.lock(),
            });
        }

        LightRegion {
            chunks,
            center: self.center,
            radius: self.radius,
            width,
            min_section: self.min_section,
            max_section: self.max_section,
        }
    }
}

#[derive(Debug)]
struct RegionChunk<'a> {
    data: SyncMutexGuard<'a, ChunkData>,
}

/// Exclusive access to a square of chunks for the duration of a light operation.
#[derive(Debug)]
pub struct LightRegion<'a> {
    chunks: Vec<Option<RegionChunk<'a>>>,
    center: ChunkPos,
    radius: i32,
    width: i32,
    min_section: i32,
    max_section: i32,
}

impl LightRegion<'_> {
    /// The slot of the center chunk.
    #[must_use]
    pub fn center_slot(&self) -> u16 {
        (self.radius * self.width + self.radius) as u16
    }

    /// The lowest section height of every chunk in the region.
    #[must_use]
    pub fn min_section(&self) -> i32 {
        self.min_section
    }

    /// The highest section height of every chunk in the region.
    #[must_use]
    pub fn max_section(&self) -> i32 {
        self.max_section
    }

    /// The slot of the chunk at `pos`, if it is in the region and loaded.
    #[must_use]
    pub fn slot_of(&self, pos: ChunkPos) -> Option<u16> {
        let dx = pos.x() - self.center.x();
        let dz = pos.z() - self.center.z();
        self.slot_at(dx, dz)
    }

    fn slot_at(&self, dx: i32, dz: i32) -> Option<u16> {
        if dx.abs() > self.radius || dz.abs() > self.radius {
            return None;
        }
        let slot = (dx + self.radius) * self.width + dz + self.radius;
        self.chunks[slot as usize].as_ref().map(|_| slot as u16)
    }

    fn slot_delta(&self, slot: u16) -> (i32, i32) {
        let slot = i32::from(slot);
        (slot / self.width - self.radius, slot % self.width - self.radius)
    }

    /// The slot of the chunk `dx`, `dz` away from the chunk in `slot`.
    #[must_use]
    pub fn slot_offset(&self, slot: u16, dx: i32, dz: i32) -> Option<u16> {
        let (sx, sz) = self.slot_delta(slot);
        self.slot_at(sx + dx, sz + dz)
    }

    /// The chunk position of a slot.
    #[must_use]
    pub fn chunk_pos(&self, slot: u16) -> ChunkPos {
        let (dx, dz) = self.slot_delta(slot);
        self.center.offset(dx, dz)
    }

    /// Slots holding a loaded chunk.
    pub fn loaded_slots(&self) -> impl Iterator<Item = u16> + '_ {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| chunk.is_some())
            .map(|(slot, _)| slot as u16)
    }

    /// The locked data of the chunk in `slot`.
    #[must_use]
    pub fn chunk(&self, slot: u16) -> Option<&ChunkData> {
        self.chunks
            .get(usize::from(slot))?
            .as_ref()
            .map(|chunk| &*chunk.data)
    }

    /// The locked data of the chunk in `slot`, mutably.
    pub fn chunk_mut(&mut self, slot: u16) -> Option<&mut ChunkData> {
        self.chunks
            .get_mut(usize::from(slot))?
            .as_mut()
            .map(|chunk| &mut *chunk.data)
    }

    /// The voxel at a world position, if its chunk is in the region.
    ///
    /// The layers directly above and below the chunk resolve to border voxels.
    #[must_use]
    pub fn voxel_at(&self, pos: BlockPos) -> Option<Voxel> {
        let slot = self.slot_of(pos.chunk_pos())?;
        let (x, y, z) = pos.section_local();
        let height = pos.section_height();
        let in_range = (self.min_section..=self.max_section).contains(&height)
            || (height == self.max_section + 1 && y == 0)
            || (height == self.min_section - 1 && y == SECTION_SIZE - 1);
        in_range.then_some(Voxel {
            slot,
            height,
            x: x as u8,
            y: y as u8,
            z: z as u8,
        })
    }

    /// Whether the voxel lives in a border light plane.
    #[must_use]
    #[inline]
    pub fn is_border(&self, voxel: Voxel) -> bool {
        voxel.height > self.max_section || voxel.height < self.min_section
    }

    /// The block at a voxel. Border voxels and missing sections read as air.
    #[must_use]
    pub fn block(&self, voxel: Voxel) -> BlockStateId {
        if self.is_border(voxel) {
            return BlockStateId::AIR;
        }
        self.chunk(voxel.slot)
            .and_then(|chunk| chunk.section(voxel.height))
            .map_or(BlockStateId::AIR, |section| section.block(voxel.index()))
    }

    /// The stored block light at a voxel.
    #[must_use]
    pub fn block_light(&self, voxel: Voxel) -> u8 {
        let Some(chunk) = self.chunk(voxel.slot) else {
            return 0;
        };
        let (x, z) = (voxel.x.into(), voxel.z.into());
        if voxel.height > self.max_section {
            chunk.top_light().get(x, z)
        } else if voxel.height < self.min_section {
            chunk.bottom_light().get(x, z)
        } else {
            chunk
                .section(voxel.height)
                .map_or(0, |section| section.light.block_light(voxel.index()))
        }
    }

    /// The stored sky light nibble of a voxel, ignoring exposure.
    #[must_use]
    pub fn stored_sky_light(&self, voxel: Voxel) -> u8 {
        if voxel.height > self.max_section {
            return MAX_LIGHT;
        }
        if voxel.height < self.min_section {
            return 0;
        }
        self.chunk(voxel.slot)
            .and_then(|chunk| chunk.section(voxel.height))
            .map_or(0, |section| section.light.sky_light(voxel.index()))
    }

    /// The effective sky light at a voxel. Exposed voxels read 15.
    #[must_use]
    pub fn sky_light(&self, voxel: Voxel) -> u8 {
        if self.is_exposed(voxel) {
            MAX_LIGHT
        } else {
            self.stored_sky_light(voxel)
        }
    }

    /// Whether a voxel is at or above its column's height.
    #[must_use]
    pub fn is_exposed(&self, voxel: Voxel) -> bool {
        if voxel.height > self.max_section {
            return true;
        }
        if voxel.height < self.min_section {
            return false;
        }
        self.chunk(voxel.slot).is_some_and(|chunk| {
            voxel.absolute_y() >= chunk.max_height(voxel.x.into(), voxel.z.into())
        })
    }

    /// The height of the column at section-local `x`, `z` in `slot`.
    #[must_use]
    pub fn max_height(&self, slot: u16, x: u8, z: u8) -> Option<i32> {
        self.chunk(slot)
            .map(|chunk| chunk.max_height(x.into(), z.into()))
    }

    /// The height of the column next to a voxel in a horizontal direction.
    ///
    /// `None` when that column's chunk is not in the region.
    #[must_use]
    pub fn neighbour_column_height(&self, voxel: Voxel, dir: Direction) -> Option<i32> {
        let (dx, _, dz) = dir.offset();
        let nx = i32::from(voxel.x) + dx;
        let nz = i32::from(voxel.z) + dz;
        let slot = self.slot_offset(voxel.slot, nx.div_euclid(16), nz.div_euclid(16))?;
        self.max_height(slot, nx.rem_euclid(16) as u8, nz.rem_euclid(16) as u8)
    }

    /// Writes block light, creating the section if needed.
    pub fn set_block_light(&mut self, voxel: Voxel, level: u8) {
        let (min_section, max_section) = (self.min_section, self.max_section);
        let Some(chunk) = self.chunk_mut(voxel.slot) else {
            return;
        };
        let (x, z) = (voxel.x.into(), voxel.z.into());
        if voxel.height > max_section {
            chunk.top_light_mut().set(x, z, level);
        } else if voxel.height < min_section {
            chunk.bottom_light_mut().set(x, z, level);
        } else if let Some(section) = chunk.get_or_put(voxel.height) {
            section.light.set_block_light(voxel.index(), level);
        }
    }

    /// Writes sky light, creating the section if needed. Border voxels are ignored.
    pub fn set_sky_light(&mut self, voxel: Voxel, level: u8) {
        if self.is_border(voxel) {
            return;
        }
        if let Some(section) = self
            .chunk_mut(voxel.slot)
            .and_then(|chunk| chunk.get_or_put(voxel.height))
        {
            section.light.set_sky_light(voxel.index(), level);
        }
    }

    /// Sets the block at a voxel without any light work. Returns the previous block.
    pub fn set_block(&mut self, voxel: Voxel, state: BlockStateId) -> Option<BlockStateId> {
        if self.is_border(voxel) {
            return None;
        }
        self.chunk_mut(voxel.slot)?.set_block(
            voxel.x.into(),
            voxel.absolute_y(),
            voxel.z.into(),
            state,
        )
    }

    /// Refreshes the column height after the block at `voxel` changed.
    ///
    /// Returns `(old, new)`.
    pub fn update_height(&mut self, registry: &BlockRegistry, voxel: Voxel) -> (i32, i32) {
        let y = voxel.absolute_y();
        self.chunk_mut(voxel.slot).map_or((y, y), |chunk| {
            chunk.update_height(registry, voxel.x.into(), y, voxel.z.into())
        })
    }

    /// The face links of a section, computed from the chunk's neighbour table when the
    /// section does not exist.
    fn links(&self, slot: u16, height: i32) -> Option<SectionNeighbours> {
        let chunk = self.chunk(slot)?;
        Some(chunk.section(height).map_or_else(
            || {
                SectionNeighbours::resolve(
                    chunk.neighbours(),
                    self.min_section,
                    self.max_section,
                    height,
                )
            },
            |section| section.neighbours,
        ))
    }

    /// The voxel one step from `voxel` in direction `dir`.
    ///
    /// Crossing a section face follows that section's links. Returns `None` when the target
    /// is unloaded or outside the region, and always for border voxels.
    #[must_use]
    pub fn step(&self, voxel: Voxel, dir: Direction) -> Option<Voxel> {
        if self.is_border(voxel) {
            return None;
        }
        let (dx, dy, dz) = dir.offset();
        let nx = i32::from(voxel.x) + dx;
        let ny = i32::from(voxel.y) + dy;
        let nz = i32::from(voxel.z) + dz;
        let inside = |c: i32| (0..SECTION_SIZE as i32).contains(&c);
        if inside(nx) && inside(ny) && inside(nz) {
            return Some(Voxel {
                x: nx as u8,
                y: ny as u8,
                z: nz as u8,
                ..voxel
            });
        }

        match self.links(voxel.slot, voxel.height)?.get(dir) {
            NeighbourTarget::Section { dx, dz, height } => Some(Voxel {
                slot: self.slot_offset(voxel.slot, dx.into(), dz.into())?,
                height,
                x: nx.rem_euclid(16) as u8,
                y: ny.rem_euclid(16) as u8,
                z: nz.rem_euclid(16) as u8,
            }),
            NeighbourTarget::TopBorder => Some(Voxel {
                height: self.max_section + 1,
                y: 0,
                ..voxel
            }),
            NeighbourTarget::BottomBorder => Some(Voxel {
                height: self.min_section - 1,
                y: (SECTION_SIZE - 1) as u8,
                ..voxel
            }),
            NeighbourTarget::Unloaded => None,
        }
    }

    /// Marks the section holding `voxel` dirty, if it exists.
    pub fn mark_dirty(&mut self, voxel: Voxel) {
        let height = voxel.height.clamp(self.min_section, self.max_section);
        if let Some(section) = self
            .chunk_mut(voxel.slot)
            .and_then(|chunk| chunk.section_mut(height))
        {
            section.light.mark_dirty();
        }
    }

    /// Marks dirty every existing section across a face that `voxel` touches.
    pub fn mark_boundary_dirty(&mut self, voxel: Voxel) {
        let last = (SECTION_SIZE - 1) as u8;
        for dir in Direction::ALL {
            let on_face = match dir {
                Direction::Down => voxel.y == 0,
                Direction::Up => voxel.y == last,
                Direction::North => voxel.z == 0,
                Direction::South => voxel.z == last,
                Direction::West => voxel.x == 0,
                Direction::East => voxel.x == last,
            };
            if !on_face {
                continue;
            }
            if let Some(across) = self.step(voxel, dir)
                && !self.is_border(across)
            {
                self.mark_dirty(across);
            }
        }
    }
}
