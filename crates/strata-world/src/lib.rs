//! World generation, populators and the loaded-chunk store with its update queue.
#![forbid(unsafe_code)]

pub mod config;
pub mod flat;
pub mod generator;
pub mod hash;
pub mod noise;
pub mod pipeline;
pub mod populator;
pub mod update;
pub mod world;

pub use config::{WorldGenConfig, build_generator, load_config_from_path};
pub use flat::FlatWorldGenerator;
pub use generator::{WorldGenerator, WorldInfo};
pub use noise::{NoiseParams, NoiseWorldGenerator, TerrainMaterials};
pub use pipeline::{GenerationError, generate_chunk};
pub use populator::{OrePopulator, Populator, ScatterPopulator};
pub use update::{TickStats, UpdateQueue};
pub use world::{DEFAULT_UPDATE_BUDGET, World};

pub use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims};
