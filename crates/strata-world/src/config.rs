//! `worldgen.toml`: generator choice, seed, spawn and populators.

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use strata_blocks::{MaterialId, MaterialRegistry};
use strata_chunk::ChunkDims;
use strata_geom::Vec3;

use crate::flat::FlatWorldGenerator;
use crate::generator::WorldGenerator;
use crate::hash::uhash32;
use crate::noise::{NoiseParams, NoiseWorldGenerator, TerrainMaterials};
use crate::populator::{OrePopulator, Populator, ScatterPopulator};
use crate::world::DEFAULT_UPDATE_BUDGET;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 3],
    #[serde(default = "default_update_budget")]
    pub update_budget: usize,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default)]
    pub flat: Flat,
    #[serde(default)]
    pub noise: Noise,
    #[serde(default)]
    pub populators: Vec<PopulatorRule>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            seed: default_seed(),
            spawn: default_spawn(),
            update_budget: default_update_budget(),
            chunk_size: default_chunk_size(),
            flat: Flat::default(),
            noise: Noise::default(),
            populators: Vec::new(),
        }
    }
}

impl WorldGenConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(s)?)
    }

    pub fn chunk_dims(&self) -> ChunkDims {
        ChunkDims::cube(self.chunk_size.max(1))
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Flat,
    Noise,
}

fn default_mode() -> Mode {
    Mode::Flat
}
fn default_seed() -> i32 {
    1337
}
fn default_spawn() -> [f32; 3] {
    [0.5, 65.0, 0.5]
}
fn default_update_budget() -> usize {
    DEFAULT_UPDATE_BUDGET
}
fn default_chunk_size() -> usize {
    16
}

#[derive(Clone, Debug, Deserialize)]
pub struct Flat {
    #[serde(default = "default_floor")]
    pub floor: String,
}
fn default_floor() -> String {
    "unbreakable".into()
}
impl Default for Flat {
    fn default() -> Self {
        Self {
            floor: default_floor(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Noise {
    #[serde(default = "default_frequency")]
    pub frequency: f32,
    #[serde(default = "default_min_height")]
    pub min_height: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    #[serde(default = "default_sea_level")]
    pub sea_level: i32,
    #[serde(default)]
    pub floor_y: i32,
    #[serde(default = "default_topsoil")]
    pub topsoil: i32,
}
fn default_frequency() -> f32 {
    0.02
}
fn default_min_height() -> i32 {
    40
}
fn default_max_height() -> i32 {
    90
}
fn default_sea_level() -> i32 {
    62
}
fn default_topsoil() -> i32 {
    3
}
impl Default for Noise {
    fn default() -> Self {
        Self {
            frequency: default_frequency(),
            min_height: default_min_height(),
            max_height: default_max_height(),
            sea_level: default_sea_level(),
            floor_y: 0,
            topsoil: default_topsoil(),
        }
    }
}

impl From<&Noise> for NoiseParams {
    fn from(n: &Noise) -> Self {
        NoiseParams {
            frequency: n.frequency,
            min_height: n.min_height.min(n.max_height),
            max_height: n.max_height.max(n.min_height),
            sea_level: n.sea_level,
            floor_y: n.floor_y,
            topsoil: n.topsoil.max(1),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PopulatorRule {
    Ore {
        material: String,
        #[serde(default = "default_ore_host")]
        host: String,
        #[serde(default = "default_attempts")]
        attempts: u32,
        #[serde(default = "default_vein_size")]
        vein_size: u32,
        #[serde(default = "default_max_y")]
        max_y: i32,
    },
    Scatter {
        material: String,
        #[serde(default = "default_scatter_host")]
        host: String,
        #[serde(default = "default_chance")]
        chance: f32,
    },
}
fn default_ore_host() -> String {
    "stone".into()
}
fn default_attempts() -> u32 {
    8
}
fn default_vein_size() -> u32 {
    6
}
fn default_max_y() -> i32 {
    48
}
fn default_scatter_host() -> String {
    "grass".into()
}
fn default_chance() -> f32 {
    0.05
}

pub fn load_config_from_path(path: &Path) -> Result<WorldGenConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    WorldGenConfig::from_toml_str(&s)
}

fn resolve(reg: &MaterialRegistry, name: &str) -> Result<MaterialId, Box<dyn Error>> {
    let block = reg
        .block_by_name(name)
        .ok_or_else(|| format!("worldgen: `{}` is not a registered block material", name))?;
    Ok(block.id())
}

fn build_populators(
    cfg: &WorldGenConfig,
    reg: &MaterialRegistry,
) -> Result<Vec<Box<dyn Populator>>, Box<dyn Error>> {
    let mut out: Vec<Box<dyn Populator>> = Vec::with_capacity(cfg.populators.len());
    for (i, rule) in cfg.populators.iter().enumerate() {
        let seed = (cfg.seed as u32) ^ uhash32(i as u32 + 1);
        match rule {
            PopulatorRule::Ore {
                material,
                host,
                attempts,
                vein_size,
                max_y,
            } => out.push(Box::new(OrePopulator {
                ore: resolve(reg, material)?,
                host: resolve(reg, host)?,
                attempts: *attempts,
                vein_size: *vein_size,
                max_y: *max_y,
                seed,
            })),
            PopulatorRule::Scatter {
                material,
                host,
                chance,
            } => out.push(Box::new(ScatterPopulator {
                plant: resolve(reg, material)?,
                soil: resolve(reg, host)?,
                chance: chance.clamp(0.0, 1.0),
                seed,
            })),
        }
    }
    Ok(out)
}

/// Resolves every material name against `reg` and builds the configured generator.
pub fn build_generator(
    cfg: &WorldGenConfig,
    reg: &MaterialRegistry,
) -> Result<Arc<dyn WorldGenerator>, Box<dyn Error>> {
    let spawn = Vec3::from(cfg.spawn);
    match cfg.mode {
        Mode::Flat => {
            if !cfg.populators.is_empty() {
                log::warn!(
                    "worldgen: flat mode ignores {} configured populators",
                    cfg.populators.len()
                );
            }
            let floor = resolve(reg, &cfg.flat.floor)?;
            Ok(Arc::new(FlatWorldGenerator::new(spawn, floor)))
        }
        Mode::Noise => {
            let mats = TerrainMaterials {
                stone: resolve(reg, "stone")?,
                dirt: resolve(reg, "dirt")?,
                grass: resolve(reg, "grass")?,
                sand: resolve(reg, "sand")?,
                water: resolve(reg, "water")?,
                floor: resolve(reg, &cfg.flat.floor)?,
            };
            let populators = build_populators(cfg, reg)?;
            log::info!(
                "worldgen: noise terrain, seed {}, {} populators",
                cfg.seed,
                populators.len()
            );
            Ok(Arc::new(
                NoiseWorldGenerator::new(cfg.seed, NoiseParams::from(&cfg.noise), mats, spawn)
                    .with_populators(populators),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_blocks::initialize_builtin_materials;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = WorldGenConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.mode, Mode::Flat);
        assert_eq!(cfg.seed, 1337);
        assert_eq!(cfg.spawn, [0.5, 65.0, 0.5]);
        assert_eq!(cfg.update_budget, 4096);
        assert_eq!(cfg.flat.floor, "unbreakable");
        assert_eq!(cfg.chunk_dims(), ChunkDims::cube(16));
    }

    #[test]
    fn noise_config_builds_with_populators() {
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            mode = "noise"
            seed = 9

            [noise]
            sea_level = 50

            [[populators]]
            kind = "ore"
            material = "coal_ore"

            [[populators]]
            kind = "scatter"
            material = "tall_grass"
            chance = 0.2
        "#,
        )
        .unwrap();
        let mut reg = MaterialRegistry::new();
        initialize_builtin_materials(&mut reg).unwrap();
        let g = build_generator(&cfg, &reg).unwrap();
        assert_eq!(g.populators().len(), 2);
        assert_eq!(g.populators()[0].name(), "ore");
        assert_eq!(g.populators()[1].name(), "scatter");
    }

    #[test]
    fn unknown_material_is_an_error() {
        let cfg = WorldGenConfig::from_toml_str(
            r#"
            [flat]
            floor = "bedrock"
        "#,
        )
        .unwrap();
        let mut reg = MaterialRegistry::new();
        initialize_builtin_materials(&mut reg).unwrap();
        assert!(build_generator(&cfg, &reg).is_err());
    }
}
