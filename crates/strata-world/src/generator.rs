use strata_chunk::{ChunkBuf, ChunkCoord};
use strata_geom::{Transform, WorldId};

use crate::populator::Populator;

/// Identity of a world as generators see it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldInfo {
    pub id: WorldId,
    pub name: String,
    pub seed: i32,
}

impl WorldInfo {
    pub fn new(id: WorldId, name: impl Into<String>, seed: i32) -> Self {
        Self {
            id,
            name: name.into(),
            seed,
        }
    }
}

/// Terrain source for one world.
///
/// `generate` must be a pure function of `coord` and the generator's own
/// configuration. It writes only into `buf`, which arrives as air, and must not
/// keep it. Populators run after it, in list order, on the same buffer.
pub trait WorldGenerator: Send + Sync {
    fn generate(&self, buf: &mut ChunkBuf, coord: ChunkCoord);

    fn populators(&self) -> &[Box<dyn Populator>];

    fn spawn(&self, world: &WorldInfo) -> Transform;
}
