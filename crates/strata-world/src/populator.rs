//! Post-generation passes over a single chunk buffer.

use strata_blocks::MaterialId;
use strata_chunk::{ChunkBuf, ChunkCoord};

use crate::hash::{ChunkRng, rand01};

/// Runs after the base pass, in the generator's list order.
///
/// Only the order is guaranteed: a populator must not rely on any other
/// populator having run, and must leave the buffer untouched when there is
/// nothing for it to do.
pub trait Populator: Send + Sync {
    fn populate(&self, buf: &mut ChunkBuf, coord: ChunkCoord);

    /// Label used in logs and generation errors.
    fn name(&self) -> &str {
        "populator"
    }
}

/// Replaces `host` voxels with `ore` along short random walks.
#[derive(Clone, Debug)]
pub struct OrePopulator {
    pub ore: MaterialId,
    pub host: MaterialId,
    pub attempts: u32,
    pub vein_size: u32,
    /// Highest world y a vein may start at.
    pub max_y: i32,
    pub seed: u32,
}

const STEPS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

impl Populator for OrePopulator {
    fn populate(&self, buf: &mut ChunkBuf, coord: ChunkCoord) {
        if buf.is_empty() || self.vein_size == 0 {
            return;
        }
        let (_, by, _) = coord.base(buf.dims());
        if by > self.max_y {
            return;
        }
        let mut rng = ChunkRng::new(self.seed, coord, u32::from(self.ore.raw()));
        let mut placed = 0usize;
        for _ in 0..self.attempts {
            let mut x = rng.below(buf.sx) as i32;
            let mut y = rng.below(buf.sy) as i32;
            let mut z = rng.below(buf.sz) as i32;
            if by + y > self.max_y {
                continue;
            }
            for _ in 0..self.vein_size {
                let (lx, ly, lz) = (x as usize, y as usize, z as usize);
                if buf.id_local(lx, ly, lz) == self.host {
                    buf.set_local(lx, ly, lz, self.ore, 0);
                    placed += 1;
                }
                let (dx, dy, dz) = STEPS[rng.below(STEPS.len())];
                let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                if nx < 0
                    || ny < 0
                    || nz < 0
                    || nx >= buf.sx as i32
                    || ny >= buf.sy as i32
                    || nz >= buf.sz as i32
                {
                    break;
                }
                (x, y, z) = (nx, ny, nz);
            }
        }
        if placed > 0 {
            log::trace!("{:?}: {} ore voxels of {:?}", coord, placed, self.ore);
        }
    }

    fn name(&self) -> &str {
        "ore"
    }
}

/// Puts `plant` on top of exposed `soil` with probability `chance` per voxel.
#[derive(Clone, Debug)]
pub struct ScatterPopulator {
    pub plant: MaterialId,
    pub soil: MaterialId,
    pub chance: f32,
    pub seed: u32,
}

impl Populator for ScatterPopulator {
    fn populate(&self, buf: &mut ChunkBuf, coord: ChunkCoord) {
        if self.chance <= 0.0 || buf.sy < 2 {
            return;
        }
        let (bx, by, bz) = coord.base(buf.dims());
        for z in 0..buf.sz {
            for x in 0..buf.sx {
                for y in 0..buf.sy - 1 {
                    if buf.id_local(x, y, z) != self.soil
                        || buf.id_local(x, y + 1, z) != MaterialId::AIR
                    {
                        continue;
                    }
                    let (wx, wy, wz) = (bx + x as i32, by + y as i32, bz + z as i32);
                    if rand01(wx, wy, wz, self.seed) < self.chance {
                        buf.set_local(x, y + 1, z, self.plant, 0);
                    }
                }
            }
        }
    }

    fn name(&self) -> &str {
        "scatter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_chunk::ChunkDims;

    const STONE: MaterialId = MaterialId(1);
    const ORE: MaterialId = MaterialId(9);
    const GRASS: MaterialId = MaterialId(4);
    const PLANT: MaterialId = MaterialId(10);

    fn stone_chunk(c: ChunkCoord) -> ChunkBuf {
        let mut buf = ChunkBuf::new(c, ChunkDims::cube(8));
        buf.flood(STONE);
        buf
    }

    fn ore(max_y: i32) -> OrePopulator {
        OrePopulator {
            ore: ORE,
            host: STONE,
            attempts: 32,
            vein_size: 5,
            max_y,
            seed: 77,
        }
    }

    #[test]
    fn ore_replaces_only_host() {
        let c = ChunkCoord::new(0, 0, 0);
        let mut buf = stone_chunk(c);
        // air pocket must survive
        buf.fill_layers(7, 8, MaterialId::AIR);
        ore(1_000).populate(&mut buf, c);
        assert!(buf.ids.iter().any(|&id| id == ORE));
        for z in 0..8 {
            for x in 0..8 {
                assert_eq!(buf.id_local(x, 7, z), MaterialId::AIR);
            }
        }
    }

    #[test]
    fn ore_above_max_y_is_a_no_op() {
        let c = ChunkCoord::new(0, 4, 0);
        let mut buf = stone_chunk(c);
        ore(10).populate(&mut buf, c);
        assert_eq!(buf.uniform_id(), Some(STONE));
    }

    #[test]
    fn ore_without_host_is_a_no_op() {
        let c = ChunkCoord::new(1, 0, 1);
        let mut buf = ChunkBuf::new(c, ChunkDims::cube(8));
        ore(1_000).populate(&mut buf, c);
        assert!(buf.is_all_air());
    }

    #[test]
    fn populators_place_by_the_coord_argument() {
        let c = ChunkCoord::new(0, 4, 0);
        let ore = ore(10);
        let scatter = ScatterPopulator {
            plant: PLANT,
            soil: GRASS,
            chance: 0.5,
            seed: 5,
        };
        let run = |tag: ChunkCoord| {
            let mut buf = stone_chunk(tag);
            buf.fill_layers(4, 5, GRASS);
            buf.fill_layers(5, 8, MaterialId::AIR);
            ore.populate(&mut buf, c);
            scatter.populate(&mut buf, c);
            buf.ids
        };
        let tagged = run(c);
        // a tag below max_y must not let ore into a chunk above it
        assert!(!tagged.contains(&ORE));
        assert!(tagged.contains(&PLANT));
        assert_eq!(run(ChunkCoord::new(-3, 0, 7)), tagged);
    }

    #[test]
    fn scatter_only_on_exposed_soil() {
        let c = ChunkCoord::new(0, 0, 0);
        let mut buf = ChunkBuf::new(c, ChunkDims::cube(8));
        buf.fill_layers(0, 3, GRASS);
        let p = ScatterPopulator {
            plant: PLANT,
            soil: GRASS,
            chance: 1.0,
            seed: 5,
        };
        p.populate(&mut buf, c);
        for z in 0..8 {
            for x in 0..8 {
                assert_eq!(buf.id_local(x, 2, z), GRASS);
                assert_eq!(buf.id_local(x, 3, z), PLANT);
                assert_eq!(buf.id_local(x, 4, z), MaterialId::AIR);
            }
        }
    }
}
