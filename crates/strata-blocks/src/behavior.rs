//! Per-variant block behavior and the hook dispatch built on it.

use serde::Deserialize;

use super::material::{BlockRef, MAX_LEVEL};
use super::registry::MaterialRegistry;
use super::types::{BlockFace, MaterialId, Source};
use super::world::BlockWorld;

/// Closed set of block behaviors. Each variant fixes the capability flags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockBehavior {
    /// Empty space.
    Air,
    /// Inert full block.
    Solid,
    /// Falls while the voxel below is not an obstacle (sand, gravel).
    Gravity,
    /// Flows down, then sideways, each sideways step raising the level up to `max_spread`.
    Liquid { max_spread: u8 },
    /// Needs an obstacle underneath; placement without one is refused and losing it breaks the block.
    Attached,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockCapabilities {
    pub liquid: bool,
    pub placement_obstacle: bool,
    pub physics: bool,
}

impl BlockBehavior {
    pub const fn capabilities(self) -> BlockCapabilities {
        let (liquid, placement_obstacle, physics) = match self {
            BlockBehavior::Air => (false, false, false),
            BlockBehavior::Solid => (false, true, false),
            BlockBehavior::Gravity => (false, true, true),
            BlockBehavior::Liquid { .. } => (true, false, true),
            BlockBehavior::Attached => (false, false, true),
        };
        BlockCapabilities {
            liquid,
            placement_obstacle,
            physics,
        }
    }
}

#[inline]
fn block_at<'r>(
    world: &dyn BlockWorld,
    registry: &'r MaterialRegistry,
    x: i32,
    y: i32,
    z: i32,
) -> Option<(BlockRef<'r>, u8)> {
    let (id, data) = world.block_at(x, y, z)?;
    registry.block(id).map(|b| (b, data))
}

/// `Some(true)` when the voxel holds a placement obstacle, `None` when it is not loaded.
#[inline]
fn obstacle_at(
    world: &dyn BlockWorld,
    registry: &MaterialRegistry,
    x: i32,
    y: i32,
    z: i32,
) -> Option<bool> {
    let (id, _) = world.block_at(x, y, z)?;
    Some(
        registry
            .block(id)
            .map(|b| b.is_placement_obstacle())
            .unwrap_or(false),
    )
}

#[inline]
fn is_air(block: &BlockRef<'_>) -> bool {
    matches!(block.behavior(), BlockBehavior::Air)
}

impl BlockRef<'_> {
    /// A neighbor of `(x, y, z)` changed. Never recurses; follow-up work goes
    /// through the world's update queue.
    pub fn on_update(
        &self,
        world: &mut dyn BlockWorld,
        registry: &MaterialRegistry,
        x: i32,
        y: i32,
        z: i32,
    ) {
        match self.behavior() {
            BlockBehavior::Air | BlockBehavior::Solid => {}
            BlockBehavior::Gravity => self.fall(world, registry, x, y, z),
            BlockBehavior::Liquid { max_spread } => {
                self.flow(world, registry, x, y, z, max_spread.min(MAX_LEVEL))
            }
            BlockBehavior::Attached => {
                let support = BlockFace::Bottom
                    .neighbor(x, y, z)
                    .and_then(|(bx, by, bz)| obstacle_at(world, registry, bx, by, bz));
                if support == Some(false) {
                    log::trace!("{} at ({},{},{}) lost its support", self.name(), x, y, z);
                    world.break_block(x, y, z, Source::Physics);
                }
            }
        }
    }

    /// This block was removed from `(x, y, z)`; neighbors get a chance to react.
    pub fn on_destroy(
        &self,
        world: &mut dyn BlockWorld,
        _registry: &MaterialRegistry,
        x: i32,
        y: i32,
        z: i32,
    ) {
        for face in BlockFace::ALL {
            if let Some((nx, ny, nz)) = face.neighbor(x, y, z) {
                world.request_update(nx, ny, nz);
            }
        }
    }

    /// Places this material at `(x, y, z)`. Returns the world's verdict.
    #[allow(clippy::too_many_arguments)]
    pub fn on_placement(
        &self,
        world: &mut dyn BlockWorld,
        registry: &MaterialRegistry,
        x: i32,
        y: i32,
        z: i32,
        data: u8,
        against: BlockFace,
        source: Source,
    ) -> bool {
        if matches!(self.behavior(), BlockBehavior::Attached)
            && BlockFace::Bottom
                .neighbor(x, y, z)
                .and_then(|(bx, by, bz)| obstacle_at(world, registry, bx, by, bz))
                != Some(true)
        {
            log::debug!(
                "refusing {} at ({},{},{}) against {:?}: no support",
                self.name(),
                x,
                y,
                z,
                against
            );
            return false;
        }
        world.set_block_material(x, y, z, self.id(), data, true, source)
    }

    fn fall(&self, world: &mut dyn BlockWorld, registry: &MaterialRegistry, x: i32, y: i32, z: i32) {
        let Some(by) = y.checked_sub(1) else {
            return;
        };
        let Some((below, _)) = block_at(world, registry, x, by, z) else {
            return;
        };
        if below.is_placement_obstacle() {
            return;
        }
        let data = world.block_at(x, y, z).map(|(_, d)| d).unwrap_or(0);
        if world.set_block_material(x, by, z, self.id(), data, true, Source::Physics) {
            world.set_block_material(x, y, z, MaterialId::AIR, 0, true, Source::Physics);
        }
    }

    fn flow(
        &self,
        world: &mut dyn BlockWorld,
        registry: &MaterialRegistry,
        x: i32,
        y: i32,
        z: i32,
        max_spread: u8,
    ) {
        let level = world.block_at(x, y, z).map(|(_, d)| d).unwrap_or(0);
        let below = y
            .checked_sub(1)
            .and_then(|by| block_at(world, registry, x, by, z).map(|(b, _)| (by, b)));
        if let Some((by, below)) = below {
            if is_air(&below) {
                world.set_block_material(x, by, z, self.id(), level, true, Source::Physics);
                return;
            }
            if !below.is_placement_obstacle() {
                // resting on liquid or a plant: neither falls through nor spreads
                return;
            }
        }
        if level >= max_spread {
            return;
        }
        for face in BlockFace::HORIZONTAL {
            let Some((nx, _, nz)) = face.neighbor(x, y, z) else {
                continue;
            };
            if let Some((next, _)) = block_at(world, registry, nx, y, nz) {
                if is_air(&next) {
                    world.set_block_material(nx, y, nz, self.id(), level + 1, true, Source::Physics);
                }
            }
        }
    }
}
