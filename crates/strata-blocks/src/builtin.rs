//! Builtin materials, registered by one explicit bootstrap call.

use strata_geom::Aabb;

use super::behavior::BlockBehavior;
use super::material::{BlockMaterialBuilder, MaterialDef};
use super::registry::{MaterialRegistry, RegistryError};
use super::types::MaterialId;

/// Hardness value marking a block that cannot be broken.
pub const UNBREAKABLE_HARDNESS: f32 = -1.0;

/// Ids of the builtin materials in the registry they were bootstrapped into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuiltinMaterials {
    pub air: MaterialId,
    pub stone: MaterialId,
    pub unbreakable: MaterialId,
    pub dirt: MaterialId,
    pub grass: MaterialId,
    pub sand: MaterialId,
    pub gravel: MaterialId,
    pub water: MaterialId,
    pub torch: MaterialId,
    pub tall_grass: MaterialId,
    pub glass: MaterialId,
    pub coal_ore: MaterialId,
    pub iron_ore: MaterialId,
    pub stick: MaterialId,
}

/// Registers the builtin set in a fixed order. Calling it twice on the same
/// registry returns the same ids.
pub fn initialize_builtin_materials(
    reg: &mut MaterialRegistry,
) -> Result<BuiltinMaterials, RegistryError> {
    let air = reg.register(
        BlockMaterialBuilder::new("air")
            .opacity(0)
            .behavior(BlockBehavior::Air)
            .build(),
    )?;
    let stone = reg.register(
        BlockMaterialBuilder::new("stone")
            .hardness(1.5)
            .friction(0.6)
            .build(),
    )?;
    let unbreakable = reg.register(
        BlockMaterialBuilder::new("unbreakable")
            .hardness(UNBREAKABLE_HARDNESS)
            .friction(0.6)
            .build(),
    )?;
    let dirt = reg.register(
        BlockMaterialBuilder::new("dirt")
            .hardness(0.5)
            .friction(0.6)
            .build(),
    )?;
    let grass = reg.register(
        BlockMaterialBuilder::new("grass")
            .hardness(0.6)
            .friction(0.6)
            .build(),
    )?;
    let sand = reg.register(
        BlockMaterialBuilder::new("sand")
            .hardness(0.5)
            .friction(0.6)
            .behavior(BlockBehavior::Gravity)
            .build(),
    )?;
    let gravel = reg.register(
        BlockMaterialBuilder::new("gravel")
            .hardness(0.6)
            .friction(0.6)
            .behavior(BlockBehavior::Gravity)
            .build(),
    )?;
    let water = reg.register(
        BlockMaterialBuilder::new("water")
            .hardness(100.0)
            .opacity(2)
            .behavior(BlockBehavior::Liquid { max_spread: 7 })
            .build(),
    )?;
    let torch = reg.register(
        BlockMaterialBuilder::new("torch")
            .opacity(0)
            .light_level(14)
            .bounding_area(Aabb::from_bounds(0.4, 0.0, 0.4, 0.6, 0.6, 0.6))
            .behavior(BlockBehavior::Attached)
            .build(),
    )?;
    let tall_grass = reg.register(
        BlockMaterialBuilder::new("tall_grass")
            .opacity(0)
            .bounding_area(Aabb::from_bounds(0.1, 0.0, 0.1, 0.9, 0.8, 0.9))
            .behavior(BlockBehavior::Attached)
            .build(),
    )?;
    let glass = reg.register(
        BlockMaterialBuilder::new("glass")
            .hardness(0.3)
            .friction(0.6)
            .opacity(0)
            .build(),
    )?;
    let coal_ore = reg.register(
        BlockMaterialBuilder::new("coal_ore")
            .hardness(3.0)
            .friction(0.6)
            .build(),
    )?;
    let iron_ore = reg.register(
        BlockMaterialBuilder::new("iron_ore")
            .hardness(3.0)
            .friction(0.6)
            .build(),
    )?;
    let stick = reg.register(MaterialDef::item("stick", 64))?;

    log::debug!("builtin materials registered ({} total)", reg.len());
    Ok(BuiltinMaterials {
        air,
        stone,
        unbreakable,
        dirt,
        grass,
        sand,
        gravel,
        water,
        torch,
        tall_grass,
        glass,
        coal_ore,
        iron_ore,
        stick,
    })
}
