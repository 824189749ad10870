use std::error::Error;

use serde::Deserialize;
use strata_geom::Aabb;

use super::behavior::BlockBehavior;
use super::material::{BlockMaterialBuilder, MaterialDef};
use super::registry::MaterialRegistry;
use super::types::MaterialId;

// Top-level materials file
#[derive(Deserialize, Debug, Default)]
pub struct MaterialsConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub hardness: Option<f32>,
    #[serde(default)]
    pub friction: Option<f32>,
    #[serde(default)]
    pub opacity: Option<u8>,
    #[serde(default)]
    pub light: Option<u8>,
    // e.g. { kind = "liquid", max_spread = 4 }
    #[serde(default)]
    pub behavior: Option<BlockBehavior>,
    // min_x, min_y, min_z, max_x, max_y, max_z
    #[serde(default)]
    pub bounds: Option<[f32; 6]>,
    // Name of the parent material when this block is a data subtype
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub data: Option<u16>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ItemDef {
    pub name: String,
    #[serde(default = "default_max_stack")]
    pub max_stack: u16,
}

fn default_max_stack() -> u16 {
    64
}

impl MaterialsConfig {
    /// Registers blocks first, then items, each in file order.
    pub fn register_into(self, reg: &mut MaterialRegistry) -> Result<Vec<MaterialId>, Box<dyn Error>> {
        let mut out = Vec::with_capacity(self.blocks.len() + self.items.len());
        for def in self.blocks {
            let mut b = BlockMaterialBuilder::new(def.name.clone());
            if let Some(h) = def.hardness {
                b = b.hardness(h);
            }
            if let Some(f) = def.friction {
                b = b.friction(f);
            }
            if let Some(o) = def.opacity {
                if o > 15 {
                    log::warn!("{}: opacity {} clamped to 15", def.name, o);
                }
                b = b.opacity(o);
            }
            if let Some(l) = def.light {
                if l > 15 {
                    log::warn!("{}: light {} clamped to 15", def.name, l);
                }
                b = b.light_level(l);
            }
            if let Some(behavior) = def.behavior {
                b = b.behavior(behavior);
            }
            if let Some([x0, y0, z0, x1, y1, z1]) = def.bounds {
                b = b.bounding_area(Aabb::from_bounds(x0, y0, z0, x1, y1, z1));
            }
            if let Some(parent_name) = def.parent.as_deref() {
                let parent = reg
                    .id_by_name(parent_name)
                    .ok_or_else(|| format!("{}: unknown parent material `{}`", def.name, parent_name))?;
                b = b.subtype_of(parent, def.data.unwrap_or(0));
            }
            out.push(reg.register(b.build())?);
        }
        for item in self.items {
            out.push(reg.register(MaterialDef::item(item.name, item.max_stack))?);
        }
        Ok(out)
    }
}
