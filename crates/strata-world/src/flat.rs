use strata_blocks::MaterialId;
use strata_chunk::{ChunkBuf, ChunkCoord};
use strata_geom::{Point, Transform, Vec3};

use crate::generator::{WorldGenerator, WorldInfo};
use crate::populator::Populator;

/// Everything below chunk layer 0 is `floor`; everything else stays air.
#[derive(Clone, Debug)]
pub struct FlatWorldGenerator {
    pub spawn: Vec3,
    pub floor: MaterialId,
}

impl FlatWorldGenerator {
    pub fn new(spawn: Vec3, floor: MaterialId) -> Self {
        Self { spawn, floor }
    }
}

impl WorldGenerator for FlatWorldGenerator {
    fn generate(&self, buf: &mut ChunkBuf, coord: ChunkCoord) {
        if coord.cy < 0 {
            buf.flood(self.floor);
        }
    }

    fn populators(&self) -> &[Box<dyn Populator>] {
        &[]
    }

    fn spawn(&self, world: &WorldInfo) -> Transform {
        Transform::at(Point {
            world: world.id,
            pos: self.spawn,
        })
    }
}
