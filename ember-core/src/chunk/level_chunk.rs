//! A loaded chunk column and its neighbour completion controller.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};

use ember_registry::BlockRegistry;
use ember_utils::{
    BlockStateId, ChunkPos,
    locks::{SyncMutex, SyncMutexGuard},
};

use super::{
    SECTION_SIZE, block_storage::BlockStorage, border_light::BorderLight,
    heightmap::LightHeightmap, neighbours::ChunkNeighbours, section::ChunkSection, section_index,
    section_light::MAX_LIGHT, section_neighbours::SectionNeighbours,
};
use crate::light_engine::{LightEngine, RegionChunks};

/// The state of a chunk guarded by its lock.
#[derive(Debug)]
pub struct ChunkData {
    /// Sections indexed by `height - min_section`. `None` means all air and dark.
    sections: Vec<Option<ChunkSection>>,
    neighbours: ChunkNeighbours,
    heightmap: LightHeightmap,
    top_light: BorderLight,
    bottom_light: BorderLight,
    min_section: i32,
    max_section: i32,
}

impl ChunkData {
    fn new(min_section: i32, max_section: i32) -> Self {
        let count = (max_section - min_section + 1) as usize;
        Self {
            sections: (0..count).map(|_| None).collect(),
            neighbours: ChunkNeighbours::new(),
            heightmap: LightHeightmap::new(min_section * SECTION_SIZE as i32),
            top_light: BorderLight::new(),
            bottom_light: BorderLight::new(),
            min_section,
            max_section,
        }
    }

    /// The lowest section height.
    #[must_use]
    pub fn min_section(&self) -> i32 {
        self.min_section
    }

    /// The highest section height.
    #[must_use]
    pub fn max_section(&self) -> i32 {
        self.max_section
    }

    /// The lowest world y inside the chunk.
    #[must_use]
    pub fn min_y(&self) -> i32 {
        self.min_section * SECTION_SIZE as i32
    }

    /// One above the highest world y inside the chunk.
    #[must_use]
    pub fn max_y(&self) -> i32 {
        (self.max_section + 1) * SECTION_SIZE as i32
    }

    fn slot(&self, height: i32) -> Option<usize> {
        (self.min_section..=self.max_section)
            .contains(&height)
            .then(|| (height - self.min_section) as usize)
    }

    /// Gets the section at `height`, if it exists.
    #[must_use]
    pub fn section(&self, height: i32) -> Option<&ChunkSection> {
        self.sections.get(self.slot(height)?)?.as_ref()
    }

    /// Gets the section at `height` mutably, if it exists.
    pub fn section_mut(&mut self, height: i32) -> Option<&mut ChunkSection> {
        let slot = self.slot(height)?;
        self.sections[slot].as_mut()
    }

    /// Gets the section at `height`, creating an empty one if needed.
    ///
    /// Returns `None` only when `height` is outside the chunk. A created section is linked
    /// to its neighbours and its sky exposed voxels start at full sky light.
    pub fn get_or_put(&mut self, height: i32) -> Option<&mut ChunkSection> {
        let slot = self.slot(height)?;
        if self.sections[slot].is_none() {
            let links = self.links_for(height);
            let mut section = ChunkSection::new_empty(links);
            self.expose(&mut section, height);
            self.sections[slot] = Some(section);
        }
        self.sections[slot].as_mut()
    }

    /// Replaces the blocks of a whole section and refreshes the heightmap.
    ///
    /// Only sky exposure is updated, in every existing section. Returns false when
    /// `height` is outside the chunk.
    pub fn put_section(
        &mut self,
        registry: &BlockRegistry,
        height: i32,
        blocks: BlockStorage,
    ) -> bool {
        let Some(slot) = self.slot(height) else {
            return false;
        };
        self.sections[slot] = Some(ChunkSection::new(blocks, self.links_for(height)));
        let previous = self.heightmap.clone();
        self.rebuild_heightmap(registry);
        let (heightmap, min_section) = (&self.heightmap, self.min_section);
        for (i, section) in self.sections.iter_mut().enumerate() {
            if let Some(section) = section {
                Self::reexpose(section, min_section + i as i32, &previous, heightmap);
            }
        }
        true
    }

    /// Existing sections with their heights, bottom to top.
    pub fn sections(&self) -> impl Iterator<Item = (i32, &ChunkSection)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (self.min_section + i as i32, s)))
    }

    /// Heights of the existing sections, bottom to top.
    #[must_use]
    pub fn section_heights(&self) -> Vec<i32> {
        self.sections().map(|(height, _)| height).collect()
    }

    /// The lowest section holding a non-air block.
    #[must_use]
    pub fn lowest_section(&self) -> Option<i32> {
        self.sections()
            .find(|(_, section)| !section.is_empty())
            .map(|(height, _)| height)
    }

    /// The highest section holding a non-air block.
    #[must_use]
    pub fn highest_section(&self) -> Option<i32> {
        self.sections()
            .filter(|(_, section)| !section.is_empty())
            .last()
            .map(|(height, _)| height)
    }

    /// The neighbour table.
    #[must_use]
    pub fn neighbours(&self) -> &ChunkNeighbours {
        &self.neighbours
    }

    /// The sky exposure heightmap.
    #[must_use]
    pub fn heightmap(&self) -> &LightHeightmap {
        &self.heightmap
    }

    /// The lowest world y that is open to the sky in a column.
    #[must_use]
    #[inline]
    pub fn max_height(&self, x: usize, z: usize) -> i32 {
        self.heightmap.get(x, z)
    }

    /// The block light plane above the highest section.
    #[must_use]
    pub fn top_light(&self) -> &BorderLight {
        &self.top_light
    }

    /// The block light plane below the lowest section.
    #[must_use]
    pub fn bottom_light(&self) -> &BorderLight {
        &self.bottom_light
    }

    pub(crate) fn top_light_mut(&mut self) -> &mut BorderLight {
        &mut self.top_light
    }

    pub(crate) fn bottom_light_mut(&mut self) -> &mut BorderLight {
        &mut self.bottom_light
    }

    /// Gets the block at chunk-relative `x`, `z` and world `y`. Missing sections read as air.
    #[must_use]
    pub fn block(&self, x: usize, y: i32, z: usize) -> BlockStateId {
        self.section(y >> 4).map_or(BlockStateId::AIR, |section| {
            section.block(section_index(x, (y & 15) as usize, z))
        })
    }

    /// Sets the block at chunk-relative `x`, `z` and world `y` without touching light or
    /// the heightmap. Returns the previous state, or `None` outside the chunk.
    pub(crate) fn set_block(
        &mut self,
        x: usize,
        y: i32,
        z: usize,
        state: BlockStateId,
    ) -> Option<BlockStateId> {
        let height = y >> 4;
        let index = section_index(x, (y & 15) as usize, z);
        if state.is_air() {
            self.slot(height)?;
            return Some(
                self.section_mut(height)
                    .map_or(BlockStateId::AIR, |section| section.set_block(index, state)),
            );
        }
        Some(self.get_or_put(height)?.set_block(index, state))
    }

    /// Gets `(block, sky)` light at chunk-relative `x`, `z` and world `y`.
    ///
    /// Sky exposed voxels read 15 whether or not their section exists. The voxel layers
    /// just outside the chunk read the border planes.
    #[must_use]
    pub fn light_at(&self, x: usize, y: i32, z: usize) -> (u8, u8) {
        if y >= self.max_y() {
            let block = if y == self.max_y() { self.top_light.get(x, z) } else { 0 };
            return (block, MAX_LIGHT);
        }
        if y < self.min_y() {
            let block = if y == self.min_y() - 1 { self.bottom_light.get(x, z) } else { 0 };
            return (block, 0);
        }
        let exposed = self.heightmap.is_exposed(x, y, z);
        let (block, sky) = self.section(y >> 4).map_or((0, 0), |section| {
            let index = section_index(x, (y & 15) as usize, z);
            (section.light.block_light(index), section.light.sky_light(index))
        });
        (block, if exposed { MAX_LIGHT } else { sky })
    }

    /// Takes the dirty flags of every section and returns the heights that were dirty.
    pub fn take_dirty_sections(&mut self) -> Vec<i32> {
        let min_section = self.min_section;
        self.sections
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| {
                let s = s.as_mut()?;
                s.light.take_dirty().then(|| min_section + i as i32)
            })
            .collect()
    }

    fn links_for(&self, height: i32) -> SectionNeighbours {
        SectionNeighbours::resolve(&self.neighbours, self.min_section, self.max_section, height)
    }

    /// Rebuilds the face links of every section from the neighbour table.
    pub(crate) fn relink_sections(&mut self) {
        for height in self.min_section..=self.max_section {
            let links = self.links_for(height);
            if let Some(section) = self.section_mut(height) {
                section.neighbours = links;
            }
        }
    }

    fn expose(&self, section: &mut ChunkSection, height: i32) {
        let base_y = height * SECTION_SIZE as i32;
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let exposed_from = (self.heightmap.get(x, z) - base_y).max(0);
                for y in exposed_from..SECTION_SIZE as i32 {
                    section
                        .light
                        .set_sky_light(section_index(x, y as usize, z), MAX_LIGHT);
                }
            }
        }
    }

    /// Moves the sky nibbles of `section` from the exposure in `previous` to `current`.
    fn reexpose(
        section: &mut ChunkSection,
        height: i32,
        previous: &LightHeightmap,
        current: &LightHeightmap,
    ) {
        let base_y = height * SECTION_SIZE as i32;
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let (now, before) = (current.get(x, z), previous.get(x, z));
                for y in 0..SECTION_SIZE {
                    let absolute_y = base_y + y as i32;
                    let index = section_index(x, y, z);
                    if absolute_y >= now {
                        section.light.set_sky_light(index, MAX_LIGHT);
                    } else if absolute_y >= before {
                        section.light.set_sky_light(index, 0);
                    }
                }
            }
        }
    }

    /// Finds the exposure height of a column considering only blocks below `below`.
    fn scan_column(&self, registry: &BlockRegistry, x: usize, z: usize, below: i32) -> i32 {
        let mut y = below.min(self.max_y()) - 1;
        while y >= self.min_y() {
            let height = y >> 4;
            match self.section(height) {
                Some(section) if !section.is_empty() => {
                    let state = section.block(section_index(x, (y & 15) as usize, z));
                    if registry.state(state).blocks_sky() {
                        return y + 1;
                    }
                    y -= 1;
                }
                _ => y = (height << 4) - 1,
            }
        }
        self.min_y()
    }

    /// Updates the heightmap after the block at `x`, `y`, `z` changed.
    ///
    /// Returns the column's `(old, new)` exposure height.
    pub(crate) fn update_height(
        &mut self,
        registry: &BlockRegistry,
        x: usize,
        y: i32,
        z: usize,
    ) -> (i32, i32) {
        let old = self.heightmap.get(x, z);
        let new = if registry.state(self.block(x, y, z)).blocks_sky() {
            old.max(y + 1)
        } else if y + 1 == old {
            self.scan_column(registry, x, z, y)
        } else {
            old
        };
        if new != old {
            self.heightmap.set(x, z, new);
        }
        (old, new)
    }

    /// Recomputes every column of the heightmap from the blocks.
    pub fn rebuild_heightmap(&mut self, registry: &BlockRegistry) {
        let top = self.max_y();
        for z in 0..SECTION_SIZE {
            for x in 0..SECTION_SIZE {
                let height = self.scan_column(registry, x, z, top);
                self.heightmap.set(x, z, height);
            }
        }
    }
}

/// A chunk column shared between the chunk map and its neighbours.
#[derive(Debug)]
pub struct Chunk {
    pos: ChunkPos,
    min_section: i32,
    max_section: i32,
    data: SyncMutex<ChunkData>,
    completions: AtomicU32,
}

impl Chunk {
    /// Creates an empty chunk spanning sections `min_section..=max_section`.
    ///
    /// # Panics
    /// Panics if `min_section > max_section`.
    #[must_use]
    pub fn new(pos: ChunkPos, min_section: i32, max_section: i32) -> Self {
        assert!(min_section <= max_section, "chunk must span at least one section");
        Self {
            pos,
            min_section,
            max_section,
            data: SyncMutex::new(ChunkData::new(min_section, max_section)),
            completions: AtomicU32::new(0),
        }
    }

    /// The position of this chunk.
    #[must_use]
    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// The lowest section height.
    #[must_use]
    pub fn min_section(&self) -> i32 {
        self.min_section
    }

    /// The highest section height.
    #[must_use]
    pub fn max_section(&self) -> i32 {
        self.max_section
    }

    /// Locks the chunk.
    ///
    /// Never lock a second chunk while holding this guard; multi chunk work goes through
    /// [`RegionChunks`] which orders acquisitions.
    pub fn lock(&self) -> SyncMutexGuard<'_, ChunkData> {
        self.data.lock()
    }

    /// Sets a block without running light updates, keeping the heightmap current.
    ///
    /// Meant for filling a chunk before it is loaded into the world.
    pub fn set_block_unlit(
        &self,
        registry: &BlockRegistry,
        x: usize,
        y: i32,
        z: usize,
        state: BlockStateId,
    ) -> Option<BlockStateId> {
        let mut data = self.data.lock();
        let previous = data.set_block(x, y, z, state)?;
        data.update_height(registry, x, y, z);
        Some(previous)
    }

    /// Gets the block at chunk-relative `x`, `z` and world `y`.
    #[must_use]
    pub fn block_state(&self, x: usize, y: i32, z: usize) -> BlockStateId {
        self.data.lock().block(x, y, z)
    }

    /// Whether all eight neighbours are loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.data.lock().neighbours.is_complete()
    }

    /// Number of loaded neighbours.
    #[must_use]
    pub fn neighbour_count(&self) -> usize {
        self.data.lock().neighbours.count()
    }

    /// All eight neighbours, or `None` while incomplete.
    #[must_use]
    pub fn neighbours(&self) -> Option<[Arc<Chunk>; ChunkNeighbours::COUNT]> {
        self.data.lock().neighbours.get_all()
    }

    /// How often this chunk's light was finalized by a neighbour completion.
    #[must_use]
    pub fn completions(&self) -> u32 {
        self.completions.load(Ordering::Acquire)
    }

    /// Registers a neighbour in slot `index`.
    ///
    /// Filling the last empty slot finalizes this chunk's light.
    pub fn set_neighbour(self: &Arc<Self>, index: usize, chunk: &Arc<Chunk>, engine: &LightEngine) {
        if self.link_neighbour(index, chunk) {
            self.complete(engine);
        }
    }

    /// Registers a neighbour without finalizing light.
    ///
    /// Returns true when this filled the last empty slot; the caller must then call
    /// [`Self::complete`] once it holds no chunk lock.
    pub(crate) fn link_neighbour(&self, index: usize, chunk: &Arc<Chunk>) -> bool {
        let mut data = self.data.lock();
        let completed = data.neighbours.set(index, chunk);
        data.relink_sections();
        completed
    }

    /// Registers a neighbour by chunk offset.
    ///
    /// # Panics
    /// Panics if the offset is not a neighbour offset.
    pub fn set_neighbour_at(
        self: &Arc<Self>,
        dx: i32,
        dz: i32,
        chunk: &Arc<Chunk>,
        engine: &LightEngine,
    ) {
        self.set_neighbour(ChunkNeighbours::index_of(dx, dz), chunk, engine);
    }

    /// Unregisters the neighbour in slot `index`. Light is left as it is.
    pub fn remove_neighbour(&self, index: usize) {
        let mut data = self.data.lock();
        if data.neighbours.remove(index) {
            data.relink_sections();
        }
    }

    /// Unregisters a neighbour by chunk offset.
    ///
    /// # Panics
    /// Panics if the offset is not a neighbour offset.
    pub fn remove_neighbour_at(&self, dx: i32, dz: i32) {
        self.remove_neighbour(ChunkNeighbours::index_of(dx, dz));
    }

    /// Gets the chunk at an offset of at most one; `(0, 0)` is this chunk.
    ///
    /// # Panics
    /// Panics if the offset is further than one chunk.
    #[must_use]
    pub fn neighbour(self: &Arc<Self>, dx: i32, dz: i32) -> Option<Arc<Chunk>> {
        if dx == 0 && dz == 0 {
            return Some(Arc::clone(self));
        }
        self.data.lock().neighbours.get(ChunkNeighbours::index_of(dx, dz))
    }

    /// Resolves a chunk at any offset by walking neighbour links one hop at a time,
    /// x first, then z.
    #[must_use]
    pub fn trace(self: &Arc<Self>, mut dx: i32, mut dz: i32) -> Option<Arc<Chunk>> {
        let mut chunk = Arc::clone(self);
        while dx != 0 || dz != 0 {
            let index = if dx > 0 {
                dx -= 1;
                ChunkNeighbours::EAST
            } else if dx < 0 {
                dx += 1;
                ChunkNeighbours::WEST
            } else if dz > 0 {
                dz -= 1;
                ChunkNeighbours::SOUTH
            } else {
                dz += 1;
                ChunkNeighbours::NORTH
            };
            let next = chunk.data.lock().neighbours.get(index)?;
            chunk = next;
        }
        Some(chunk)
    }

    /// Gets a block at a position relative to this chunk's origin that may lie in
    /// another chunk.
    #[must_use]
    pub fn trace_block(self: &Arc<Self>, x: i32, y: i32, z: i32) -> Option<BlockStateId> {
        let chunk = self.trace(x >> 4, z >> 4)?;
        if y < chunk.min_section * SECTION_SIZE as i32
            || y >= (chunk.max_section + 1) * SECTION_SIZE as i32
        {
            return None;
        }
        Some(chunk.block_state((x & 15) as usize, y, (z & 15) as usize))
    }

    /// Finalizes light once all neighbours are present: relinks sections, recalculates the
    /// whole chunk and pulls light in from the neighbours.
    #[tracing::instrument(level = "debug", skip_all, fields(chunk = %self.pos))]
    pub(crate) fn complete(self: &Arc<Self>, engine: &LightEngine) {
        let region_chunks = RegionChunks::around_neighbours(self);
        let mut region = region_chunks.lock();
        let center = region.center_slot();

        let Some(data) = region.chunk_mut(center) else {
            return;
        };
        if !data.neighbours.is_complete() {
            log::warn!("Chunk {} lost a neighbour before its light was finalized", self.pos);
            return;
        }
        data.relink_sections();
        let sections = data.sections().count();

        let mut propagator = engine.propagator(&mut region);
        propagator.recalculate_chunk(center);
        propagator.propagate_chunk_from_neighbours(center);

        self.completions.fetch_add(1, Ordering::AcqRel);
        log::debug!("Finalized light of chunk {} ({sections} sections)", self.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_registry::vanilla_blocks;

    fn registry() -> BlockRegistry {
        BlockRegistry::new_vanilla()
    }

    #[test]
    fn test_get_or_put_bounds() {
        let chunk = Chunk::new(ChunkPos::new(0, 0), -1, 1);
        let mut data = chunk.lock();
        assert!(data.get_or_put(-2).is_none());
        assert!(data.get_or_put(2).is_none());
        assert!(data.get_or_put(1).is_some());
        assert_eq!(data.section_heights(), vec![1]);
        assert_eq!(data.min_y(), -16);
        assert_eq!(data.max_y(), 32);
    }

    #[test]
    fn test_new_section_is_sky_lit_above_heightmap() {
        let registry = registry();
        let chunk = Chunk::new(ChunkPos::new(0, 0), 0, 1);
        chunk.set_block_unlit(&registry, 4, 20, 4, vanilla_blocks::STONE);

        let mut data = chunk.lock();
        assert_eq!(data.max_height(4, 4), 21);
        assert_eq!(data.max_height(5, 4), 0);
        let sky = |data: &mut ChunkData, x| {
            data.get_or_put(0)
                .map(|s| s.light.sky_light(section_index(x, 3, 4)))
        };
        assert_eq!(sky(&mut *data, 4), Some(0));
        assert_eq!(sky(&mut *data, 5), Some(15));
        assert_eq!(data.light_at(4, 10, 4), (0, 0));
        assert_eq!(data.light_at(4, 21, 4), (0, 15));
        assert_eq!(data.light_at(5, 19, 5), (0, 15));
    }

    #[test]
    fn test_put_section_moves_exposure_of_other_sections() {
        let registry = registry();
        let chunk = Chunk::new(ChunkPos::new(0, 0), 0, 2);
        let mut data = chunk.lock();
        let sky = |data: &ChunkData| {
            data.section(0)
                .map(|s| s.light.sky_light(section_index(3, 5, 3)))
        };
        assert!(data.get_or_put(0).is_some());
        assert_eq!(sky(&*data), Some(15));

        assert!(data.put_section(&registry, 2, BlockStorage::new_filled(vanilla_blocks::STONE)));
        assert_eq!(data.max_height(3, 3), 48);
        assert_eq!(sky(&*data), Some(0));

        assert!(data.put_section(&registry, 2, BlockStorage::new_filled(vanilla_blocks::AIR)));
        assert_eq!(data.max_height(3, 3), 0);
        assert_eq!(sky(&*data), Some(15));
    }

    #[test]
    fn test_heightmap_follows_edits() {
        let registry = registry();
        let chunk = Chunk::new(ChunkPos::new(0, 0), 0, 3);
        chunk.set_block_unlit(&registry, 0, 10, 0, vanilla_blocks::STONE);
        chunk.set_block_unlit(&registry, 0, 40, 0, vanilla_blocks::STONE);
        chunk.set_block_unlit(&registry, 0, 50, 0, vanilla_blocks::GLASS);
        assert_eq!(chunk.lock().max_height(0, 0), 41);

        chunk.set_block_unlit(&registry, 0, 40, 0, vanilla_blocks::AIR);
        assert_eq!(chunk.lock().max_height(0, 0), 11);

        chunk.set_block_unlit(&registry, 0, 10, 0, vanilla_blocks::OAK_LEAVES);
        assert_eq!(chunk.lock().max_height(0, 0), 11);
        chunk.set_block_unlit(&registry, 0, 10, 0, vanilla_blocks::AIR);
        assert_eq!(chunk.lock().max_height(0, 0), 0);
    }

    #[test]
    fn test_content_bounds() {
        let registry = registry();
        let chunk = Chunk::new(ChunkPos::new(0, 0), -2, 5);
        assert_eq!(chunk.lock().lowest_section(), None);
        chunk.set_block_unlit(&registry, 1, -20, 1, vanilla_blocks::STONE);
        chunk.set_block_unlit(&registry, 1, 70, 1, vanilla_blocks::STONE);
        let data = chunk.lock();
        assert_eq!(data.lowest_section(), Some(-2));
        assert_eq!(data.highest_section(), Some(4));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let center = Arc::new(Chunk::new(ChunkPos::new(0, 0), 0, 0));
        let east = Arc::new(Chunk::new(ChunkPos::new(1, 0), 0, 0));
        let engine = LightEngine::new(Arc::new(registry()));

        center.set_neighbour_at(1, 0, &east, &engine);
        assert_eq!(center.neighbour_count(), 1);
        center.remove_neighbour_at(1, 0);
        center.remove_neighbour_at(1, 0);
        assert_eq!(center.neighbour_count(), 0);
        assert_eq!(center.completions(), 0);
    }

    #[test]
    #[allow(clippy::unwrap_used)] // Tests are allowed to panic
    fn test_trace_walks_hops() {
        let engine = LightEngine::new(Arc::new(registry()));
        let chunks: Vec<Arc<Chunk>> = (0..3)
            .map(|x| Arc::new(Chunk::new(ChunkPos::new(x, 0), 0, 0)))
            .collect();
        let below = Arc::new(Chunk::new(ChunkPos::new(2, 1), 0, 0));
        chunks[0].set_neighbour_at(1, 0, &chunks[1], &engine);
        chunks[1].set_neighbour_at(1, 0, &chunks[2], &engine);
        chunks[2].set_neighbour_at(0, 1, &below, &engine);

        assert_eq!(chunks[0].trace(0, 0).unwrap().pos(), ChunkPos::new(0, 0));
        assert_eq!(chunks[0].trace(2, 0).unwrap().pos(), ChunkPos::new(2, 0));
        assert_eq!(chunks[0].trace(2, 1).unwrap().pos(), ChunkPos::new(2, 1));
        assert!(chunks[0].trace(-1, 0).is_none());
        assert!(chunks[0].trace(0, 1).is_none());
        assert_eq!(chunks[0].neighbour(0, 0).unwrap().pos(), ChunkPos::new(0, 0));

        below.set_block_unlit(&registry(), 3, 5, 4, vanilla_blocks::GLOWSTONE);
        assert_eq!(
            chunks[0].trace_block(32 + 3, 5, 16 + 4),
            Some(vanilla_blocks::GLOWSTONE)
        );
        assert_eq!(chunks[0].trace_block(32 + 3, 6, 16 + 4), Some(vanilla_blocks::AIR));
        assert_eq!(chunks[0].trace_block(3, 99, 4), None);
    }
}
