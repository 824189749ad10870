//! Material registry, block materials and their physics hooks.
#![forbid(unsafe_code)]

pub mod behavior;
pub mod builtin;
pub mod config;
pub mod material;
pub mod registry;
pub mod types;
pub mod world;

pub use behavior::{BlockBehavior, BlockCapabilities};
pub use builtin::{BuiltinMaterials, initialize_builtin_materials};
pub use material::{BlockMaterial, BlockMaterialBuilder, BlockRef, ItemMaterial, Material, MaterialDef, MaterialKind};
pub use registry::{MaterialRegistry, RegistryError, block, block_by_name, global, install};
pub use types::{BlockFace, MaterialId, Source};
pub use world::BlockWorld;
