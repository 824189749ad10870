//! Voxel server core: material registry bootstrap, world generation and players.
#![forbid(unsafe_code)]

pub mod player;

use std::error::Error;
use std::path::Path;

use strata_blocks::{BuiltinMaterials, MaterialRegistry, initialize_builtin_materials};

pub use player::{ItemStack, Player, PlayerController, PlayerInventory, ResourcePolicy};

/// Builtin materials, then any extra ones from a `materials.toml`.
pub fn bootstrap_registry(
    materials: Option<&Path>,
) -> Result<(MaterialRegistry, BuiltinMaterials), Box<dyn Error>> {
    let mut reg = MaterialRegistry::new();
    let builtins = initialize_builtin_materials(&mut reg)?;
    if let Some(path) = materials {
        let added = reg.load_from_path(path)?;
        log::info!("loaded {} materials from {}", added.len(), path.display());
    }
    Ok((reg, builtins))
}
