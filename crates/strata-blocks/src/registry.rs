use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use super::behavior::BlockBehavior;
use super::config::MaterialsConfig;
use super::material::{BlockMaterialBuilder, BlockRef, Material, MaterialDef};
use super::types::MaterialId;

/// Size of the `u16` id space.
pub const MAX_MATERIALS: usize = u16::MAX as usize + 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("material `{name}` is already registered as {existing:?} with a different descriptor")]
    NameTaken { name: String, existing: MaterialId },
    #[error("material id space exhausted ({limit} entries)")]
    Exhausted { limit: usize },
    #[error("parent {parent:?} of material `{name}` is not registered")]
    UnknownParent { name: String, parent: MaterialId },
    #[error("a global material registry is already installed")]
    AlreadyInstalled,
}

/// Append-only catalog of every material known to the process.
///
/// Ids are dense and handed out in registration order. Id 0 is always `air`.
#[derive(Clone, Debug)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
    by_name: HashMap<String, MaterialId>,
    limit: usize,
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::with_limit(MAX_MATERIALS)
    }

    /// Registry that accepts at most `limit` materials (air included).
    pub fn with_limit(limit: usize) -> Self {
        let mut reg = Self {
            materials: Vec::new(),
            by_name: HashMap::new(),
            limit: limit.clamp(1, MAX_MATERIALS),
        };
        let air = BlockMaterialBuilder::new("air")
            .opacity(0)
            .behavior(BlockBehavior::Air)
            .build();
        reg.push(air);
        reg
    }

    pub fn register(&mut self, def: MaterialDef) -> Result<MaterialId, RegistryError> {
        let key = def.name.to_lowercase();
        if let Some(&existing) = self.by_name.get(&key) {
            let current = &self.materials[existing.0 as usize];
            if current.same_identity(&def) {
                return Ok(existing);
            }
            return Err(RegistryError::NameTaken {
                name: def.name,
                existing,
            });
        }
        if self.materials.len() >= self.limit {
            return Err(RegistryError::Exhausted { limit: self.limit });
        }
        if let Some(parent) = def.parent {
            if self.get(parent).is_none() {
                return Err(RegistryError::UnknownParent {
                    name: def.name,
                    parent,
                });
            }
        }
        let id = self.push(def);
        log::debug!("registered material {:?} as {:?}", self.materials[id.0 as usize].name(), id);
        Ok(id)
    }

    fn push(&mut self, def: MaterialDef) -> MaterialId {
        let id = MaterialId(self.materials.len() as u16);
        self.by_name.insert(def.name.to_lowercase(), id);
        self.materials.push(Material {
            id,
            name: def.name,
            data: def.data,
            parent: def.parent,
            kind: def.kind,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Case-insensitive name lookup.
    pub fn get_by_name(&self, name: &str) -> Option<&Material> {
        let id = self.by_name.get(&name.to_lowercase())?;
        self.get(*id)
    }

    /// Like [`get`](Self::get) but only for block materials.
    #[inline]
    pub fn block(&self, id: MaterialId) -> Option<BlockRef<'_>> {
        self.get(id)?.as_block()
    }

    pub fn block_by_name(&self, name: &str) -> Option<BlockRef<'_>> {
        self.get_by_name(name)?.as_block()
    }

    pub fn id_by_name(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.iter()
    }

    pub fn load_from_toml_str(&mut self, toml_str: &str) -> Result<Vec<MaterialId>, Box<dyn Error>> {
        let cfg: MaterialsConfig = toml::from_str(toml_str)?;
        cfg.register_into(self)
    }

    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<Vec<MaterialId>, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        self.load_from_toml_str(&s)
    }
}

static GLOBAL: OnceLock<Arc<MaterialRegistry>> = OnceLock::new();

/// Freezes a bootstrapped registry as the process-wide instance.
pub fn install(registry: MaterialRegistry) -> Result<Arc<MaterialRegistry>, RegistryError> {
    let count = registry.len();
    GLOBAL
        .set(Arc::new(registry))
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    log::info!("material registry installed with {} materials", count);
    GLOBAL.get().cloned().ok_or(RegistryError::AlreadyInstalled)
}

#[inline]
pub fn global() -> Option<&'static Arc<MaterialRegistry>> {
    GLOBAL.get()
}

/// Block lookup against the installed registry. `None` when nothing is installed,
/// the id is unknown, or it names a non-block material.
pub fn block(id: MaterialId) -> Option<BlockRef<'static>> {
    global()?.block(id)
}

pub fn block_by_name(name: &str) -> Option<BlockRef<'static>> {
    global()?.block_by_name(name)
}
