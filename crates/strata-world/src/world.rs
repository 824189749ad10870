//! Loaded chunks plus the block-update pipeline.

use std::sync::Arc;

use hashbrown::HashMap;
use strata_blocks::{BlockFace, BlockWorld, MaterialId, MaterialRegistry, Source};
use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims};
use strata_geom::Transform;

use crate::generator::{WorldGenerator, WorldInfo};
use crate::pipeline::{GenerationError, generate_chunk};
use crate::update::{TickStats, UpdateQueue};

pub const DEFAULT_UPDATE_BUDGET: usize = 4096;

pub struct World {
    info: WorldInfo,
    generator: Arc<dyn WorldGenerator>,
    registry: Arc<MaterialRegistry>,
    dims: ChunkDims,
    chunks: HashMap<ChunkCoord, ChunkBuf>,
    updates: UpdateQueue,
    update_budget: usize,
}

impl World {
    pub fn new(
        info: WorldInfo,
        generator: Arc<dyn WorldGenerator>,
        registry: Arc<MaterialRegistry>,
        dims: ChunkDims,
    ) -> Self {
        Self {
            info,
            generator,
            registry,
            dims,
            chunks: HashMap::new(),
            updates: UpdateQueue::new(),
            update_budget: DEFAULT_UPDATE_BUDGET,
        }
    }

    /// Maximum number of queued updates one [`tick`](Self::tick) processes.
    pub fn with_update_budget(mut self, budget: usize) -> Self {
        self.update_budget = budget.max(1);
        self
    }

    #[inline]
    pub fn info(&self) -> &WorldInfo {
        &self.info
    }

    #[inline]
    pub fn registry(&self) -> &Arc<MaterialRegistry> {
        &self.registry
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    pub fn generator(&self) -> &Arc<dyn WorldGenerator> {
        &self.generator
    }

    pub fn spawn(&self) -> Transform {
        self.generator.spawn(&self.info)
    }

    /// Generates and commits `coord` unless it is already loaded. Returns
    /// whether a new chunk was committed.
    pub fn load_chunk(&mut self, coord: ChunkCoord) -> Result<bool, GenerationError> {
        if self.chunks.contains_key(&coord) {
            return Ok(false);
        }
        let buf = generate_chunk(self.generator.as_ref(), coord, self.dims)?;
        self.commit(coord, buf);
        Ok(true)
    }

    /// Commits an externally produced buffer, replacing any loaded chunk at
    /// `coord`. Buffers whose size does not match the world are refused.
    pub fn insert_chunk(&mut self, coord: ChunkCoord, mut buf: ChunkBuf) -> bool {
        if buf.dims() != self.dims {
            log::warn!(
                "refusing chunk {:?}: dims {:?} do not match world dims {:?}",
                coord,
                buf.dims(),
                self.dims
            );
            return false;
        }
        buf.coord = coord;
        self.commit(coord, buf);
        true
    }

    fn commit(&mut self, coord: ChunkCoord, mut buf: ChunkBuf) {
        let mut replaced = 0usize;
        for i in 0..buf.ids.len() {
            let id = buf.ids[i];
            if self.registry.block(id).is_none() {
                buf.ids[i] = MaterialId::AIR;
                buf.data.set(i, 0);
                replaced += 1;
            }
        }
        if replaced > 0 {
            log::warn!("chunk {:?}: {} voxels held non-block ids, set to air", coord, replaced);
        }
        log::debug!("committed chunk {:?}", coord);
        self.chunks.insert(coord, buf);
    }

    pub fn unload_chunk(&mut self, coord: ChunkCoord) -> Option<ChunkBuf> {
        self.chunks.remove(&coord)
    }

    #[inline]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&ChunkBuf> {
        self.chunks.get(&coord)
    }

    pub fn loaded_chunks(&self) -> usize {
        self.chunks.len()
    }

    pub fn block(&self, x: i32, y: i32, z: i32) -> Option<(MaterialId, u8)> {
        let coord = ChunkCoord::containing(x, y, z, self.dims);
        self.chunks.get(&coord)?.get_world(x, y, z)
    }

    /// Player-style placement: refused when the target holds an obstacle,
    /// otherwise the material's own placement hook decides.
    #[allow(clippy::too_many_arguments)]
    pub fn place_block(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        material: MaterialId,
        data: u8,
        against: BlockFace,
        source: Source,
    ) -> bool {
        let registry = Arc::clone(&self.registry);
        let Some(block) = registry.block(material) else {
            return false;
        };
        let Some((current, _)) = self.block(x, y, z) else {
            return false;
        };
        if registry
            .block(current)
            .is_some_and(|b| b.is_placement_obstacle())
        {
            return false;
        }
        block.on_placement(self, &registry, x, y, z, data, against, source)
    }

    pub fn pending_updates(&self) -> usize {
        self.updates.len()
    }

    /// Drains up to the update budget from the queue. Whatever is left waits
    /// for the next call.
    pub fn tick(&mut self) -> TickStats {
        let registry = Arc::clone(&self.registry);
        let mut processed = 0;
        while processed < self.update_budget {
            let Some((x, y, z)) = self.updates.pop() else {
                break;
            };
            processed += 1;
            let Some((id, _)) = self.block(x, y, z) else {
                continue;
            };
            if let Some(block) = registry.block(id) {
                if block.has_physics() {
                    block.on_update(self, &registry, x, y, z);
                }
            }
        }
        let stats = TickStats {
            processed,
            deferred: self.updates.len(),
        };
        if stats.deferred > 0 {
            log::debug!("tick: {} updates, {} deferred", stats.processed, stats.deferred);
        }
        stats
    }

    /// Ticks until the queue is empty. Returns the number of ticks, or `None`
    /// if updates were still pending after `max_ticks`.
    pub fn settle(&mut self, max_ticks: usize) -> Option<usize> {
        for n in 0..max_ticks {
            if self.updates.is_empty() {
                return Some(n);
            }
            self.tick();
        }
        self.updates.is_empty().then_some(max_ticks)
    }

    fn enqueue_around(&mut self, x: i32, y: i32, z: i32) {
        self.updates.push((x, y, z));
        for face in BlockFace::ALL {
            if let Some(pos) = face.neighbor(x, y, z) {
                self.updates.push(pos);
            }
        }
    }
}

impl BlockWorld for World {
    fn block_at(&self, x: i32, y: i32, z: i32) -> Option<(MaterialId, u8)> {
        self.block(x, y, z)
    }

    fn set_block_material(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        material: MaterialId,
        data: u8,
        causes_update: bool,
        _source: Source,
    ) -> bool {
        if self.registry.block(material).is_none() {
            return false;
        }
        let coord = ChunkCoord::containing(x, y, z, self.dims);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        let data = data & 0xF;
        if chunk.get_world(x, y, z) == Some((material, data)) {
            return true;
        }
        if !chunk.set_world(x, y, z, material, data) {
            return false;
        }
        if causes_update {
            self.enqueue_around(x, y, z);
        }
        true
    }

    fn break_block(&mut self, x: i32, y: i32, z: i32, source: Source) -> bool {
        let Some((id, _)) = self.block(x, y, z) else {
            return false;
        };
        let registry = Arc::clone(&self.registry);
        if let Some(block) = registry.block(id) {
            if block.hardness() < 0.0 && matches!(source, Source::Player(_)) {
                return false;
            }
            block.on_destroy(self, &registry, x, y, z);
        }
        self.set_block_material(x, y, z, MaterialId::AIR, 0, true, source)
    }

    fn request_update(&mut self, x: i32, y: i32, z: i32) {
        self.updates.push((x, y, z));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flat::FlatWorldGenerator;
    use strata_blocks::{BuiltinMaterials, initialize_builtin_materials};
    use strata_geom::{Vec3, WorldId};

    fn flat_world() -> (World, BuiltinMaterials) {
        let mut reg = MaterialRegistry::new();
        let ids = initialize_builtin_materials(&mut reg).unwrap();
        let generator = FlatWorldGenerator::new(Vec3::new(0.5, 65.0, 0.5), ids.unbreakable);
        let mut world = World::new(
            WorldInfo::new(WorldId(1), "test", 7),
            Arc::new(generator),
            Arc::new(reg),
            ChunkDims::cube(8),
        );
        for cy in -1..=1 {
            world.load_chunk(ChunkCoord::new(0, cy, 0)).unwrap();
        }
        (world, ids)
    }

    #[test]
    fn set_block_refuses_unloaded_and_non_blocks() {
        let (mut w, ids) = flat_world();
        assert!(!w.set_block_material(100, 0, 0, ids.stone, 0, false, Source::World));
        assert!(!w.set_block_material(1, 1, 1, ids.stick, 0, false, Source::World));
        assert!(!w.set_block_material(1, 1, 1, MaterialId(999), 0, false, Source::World));
        assert_eq!(w.block(1, 1, 1), Some((MaterialId::AIR, 0)));
        assert!(w.set_block_material(1, 1, 1, ids.stone, 0x13, false, Source::World));
        assert_eq!(w.block(1, 1, 1), Some((ids.stone, 3)));
        assert_eq!(w.pending_updates(), 0);
    }

    #[test]
    fn rewriting_the_same_block_is_a_quiet_success() {
        let (mut w, ids) = flat_world();
        assert!(w.set_block_material(2, 2, 2, ids.dirt, 1, true, Source::World));
        assert_eq!(w.pending_updates(), 7);
        w.tick();
        assert!(w.set_block_material(2, 2, 2, ids.dirt, 1, true, Source::World));
        assert_eq!(w.pending_updates(), 0);
    }

    #[test]
    fn place_refuses_obstacles_but_replaces_plants() {
        let (mut w, ids) = flat_world();
        // floor at y = -1 is unbreakable stone-like
        assert!(!w.place_block(0, -1, 0, ids.dirt, 0, BlockFace::Top, Source::Player(1)));
        assert!(w.place_block(0, 0, 0, ids.tall_grass, 0, BlockFace::Top, Source::Player(1)));
        assert!(w.place_block(0, 0, 0, ids.dirt, 0, BlockFace::Top, Source::Player(1)));
        assert_eq!(w.block(0, 0, 0), Some((ids.dirt, 0)));
    }

    #[test]
    fn players_cannot_break_unbreakable() {
        let (mut w, ids) = flat_world();
        assert!(!w.break_block(3, -1, 3, Source::Player(9)));
        assert_eq!(w.block(3, -1, 3), Some((ids.unbreakable, 0)));
        assert!(w.break_block(3, -1, 3, Source::World));
        assert_eq!(w.block(3, -1, 3), Some((MaterialId::AIR, 0)));
    }

    #[test]
    fn budget_defers_the_rest() {
        let (w, ids) = flat_world();
        let mut w = w.with_update_budget(3);
        assert!(w.set_block_material(4, 4, 4, ids.stone, 0, true, Source::World));
        let first = w.tick();
        assert_eq!(first, TickStats { processed: 3, deferred: 4 });
        let second = w.tick();
        assert_eq!(second, TickStats { processed: 3, deferred: 1 });
        let third = w.tick();
        assert_eq!(third, TickStats { processed: 1, deferred: 0 });
        assert_eq!(w.tick(), TickStats::default());
    }

    #[test]
    fn sand_column_settles_on_the_floor() {
        let (mut w, ids) = flat_world();
        for y in 3..7 {
            assert!(w.set_block_material(5, y, 5, ids.sand, 0, true, Source::World));
        }
        assert!(w.settle(1_000).is_some());
        for y in 0..4 {
            assert_eq!(w.block(5, y, 5), Some((ids.sand, 0)), "y = {y}");
        }
        for y in 4..8 {
            assert_eq!(w.block(5, y, 5), Some((MaterialId::AIR, 0)), "y = {y}");
        }
    }

    #[test]
    fn breaking_support_drops_the_torch() {
        let (mut w, ids) = flat_world();
        assert!(w.set_block_material(1, 0, 1, ids.stone, 0, false, Source::World));
        assert!(w.place_block(1, 1, 1, ids.torch, 0, BlockFace::Top, Source::Player(2)));
        assert!(w.settle(100).is_some());
        assert_eq!(w.block(1, 1, 1), Some((ids.torch, 0)));

        assert!(w.break_block(1, 0, 1, Source::Player(2)));
        assert!(w.settle(100).is_some());
        assert_eq!(w.block(1, 1, 1), Some((MaterialId::AIR, 0)));
    }

    #[test]
    fn foreign_ids_become_air_on_commit() {
        let (mut w, ids) = flat_world();
        let c = ChunkCoord::new(1, 0, 0);
        let mut buf = ChunkBuf::new(c, ChunkDims::cube(8));
        buf.set_local(0, 0, 0, MaterialId(4000), 2);
        buf.set_local(1, 0, 0, ids.stick, 0);
        buf.set_local(2, 0, 0, ids.glass, 0);
        assert!(w.insert_chunk(c, buf));
        assert_eq!(w.block(8, 0, 0), Some((MaterialId::AIR, 0)));
        assert_eq!(w.block(9, 0, 0), Some((MaterialId::AIR, 0)));
        assert_eq!(w.block(10, 0, 0), Some((ids.glass, 0)));

        let wrong = ChunkBuf::new(c, ChunkDims::cube(4));
        assert!(!w.insert_chunk(c, wrong));
    }

    #[test]
    fn updates_at_the_coordinate_edge_stay_in_range() {
        let (mut w, ids) = flat_world();
        let edge = ChunkCoord::containing(i32::MAX, 0, i32::MAX, w.dims());
        assert!(w.load_chunk(edge).unwrap());
        let (x, z) = (i32::MAX, i32::MAX);
        assert!(w.set_block_material(x, 3, z, ids.sand, 0, true, Source::World));
        // east and south neighbors do not exist
        assert_eq!(w.pending_updates(), 5);
        assert!(w.settle(64).is_some());
        assert_eq!(w.block(x, 0, z), Some((ids.sand, 0)));
        assert_eq!(w.block(x, 3, z), Some((MaterialId::AIR, 0)));
    }

    #[test]
    fn spawn_comes_from_the_generator() {
        let (w, _) = flat_world();
        let t = w.spawn();
        assert_eq!(t.position.world, WorldId(1));
        assert_eq!(t.position.pos, Vec3::new(0.5, 65.0, 0.5));
    }
}
