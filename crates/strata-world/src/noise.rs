//! Height-field terrain from OpenSimplex2 noise.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::MaterialId;
use strata_chunk::{ChunkBuf, ChunkCoord};
use strata_geom::{Point, Transform, Vec3};

use crate::generator::{WorldGenerator, WorldInfo};
use crate::populator::Populator;

#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParams {
    pub frequency: f32,
    pub min_height: i32,
    pub max_height: i32,
    pub sea_level: i32,
    /// Voxels at or below this y are the floor material.
    pub floor_y: i32,
    /// Dirt layers between grass and stone.
    pub topsoil: i32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            frequency: 0.02,
            min_height: 40,
            max_height: 90,
            sea_level: 62,
            floor_y: 0,
            topsoil: 3,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TerrainMaterials {
    pub stone: MaterialId,
    pub dirt: MaterialId,
    pub grass: MaterialId,
    pub sand: MaterialId,
    pub water: MaterialId,
    pub floor: MaterialId,
}

pub struct NoiseWorldGenerator {
    params: NoiseParams,
    mats: TerrainMaterials,
    spawn: Vec3,
    terrain: FastNoiseLite,
    populators: Vec<Box<dyn Populator>>,
}

impl NoiseWorldGenerator {
    pub fn new(seed: i32, params: NoiseParams, mats: TerrainMaterials, spawn: Vec3) -> Self {
        let mut terrain = FastNoiseLite::with_seed(seed);
        terrain.set_noise_type(Some(NoiseType::OpenSimplex2));
        terrain.set_frequency(Some(params.frequency));
        Self {
            params,
            mats,
            spawn,
            terrain,
            populators: Vec::new(),
        }
    }

    pub fn with_populators(mut self, populators: Vec<Box<dyn Populator>>) -> Self {
        self.populators = populators;
        self
    }

    /// Topmost solid y of the column at `(wx, wz)`.
    pub fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let h = self.terrain.get_noise_2d(wx as f32, wz as f32).clamp(-1.0, 1.0);
        let span = (self.params.max_height - self.params.min_height).max(0);
        ((h + 1.0) * 0.5 * span as f32) as i32 + self.params.min_height
    }

    #[inline]
    fn column_block(&self, wy: i32, height: i32) -> MaterialId {
        let p = &self.params;
        let m = &self.mats;
        let beach = height <= p.sea_level + 1;
        if wy <= p.floor_y {
            m.floor
        } else if wy > height {
            if wy <= p.sea_level { m.water } else { MaterialId::AIR }
        } else if wy == height {
            if beach { m.sand } else { m.grass }
        } else if wy > height - p.topsoil {
            if beach { m.sand } else { m.dirt }
        } else {
            m.stone
        }
    }
}

impl WorldGenerator for NoiseWorldGenerator {
    fn generate(&self, buf: &mut ChunkBuf, coord: ChunkCoord) {
        let (bx, by, bz) = coord.base(buf.dims());
        let top = by + buf.sy as i32 - 1;
        let p = &self.params;

        if top <= p.floor_y {
            buf.flood(self.mats.floor);
            return;
        }

        let mut heights = Vec::with_capacity(buf.sx * buf.sz);
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                heights.push(self.surface_height(bx + x as i32, bz + z as i32));
            }
        }
        let lo = heights.iter().copied().min().unwrap_or(p.min_height);
        let hi = heights.iter().copied().max().unwrap_or(p.max_height);

        if by > hi.max(p.sea_level).max(p.floor_y) {
            // above terrain, water and floor; the buffer is already air
            return;
        }
        // strictly below every surface voxel and its topsoil
        if by > p.floor_y && top < lo && top <= lo - p.topsoil {
            buf.flood(self.mats.stone);
            return;
        }

        for y in 0..buf.sy {
            let wy = by + y as i32;
            for z in 0..buf.sz {
                for x in 0..buf.sx {
                    let id = self.column_block(wy, heights[z * buf.sx + x]);
                    if id != MaterialId::AIR {
                        buf.set_local(x, y, z, id, 0);
                    }
                }
            }
        }
    }

    fn populators(&self) -> &[Box<dyn Populator>] {
        &self.populators
    }

    fn spawn(&self, world: &WorldInfo) -> Transform {
        Transform::at(Point {
            world: world.id,
            pos: self.spawn,
        })
    }
}
