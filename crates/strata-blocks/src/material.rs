use std::ops::Deref;

use strata_geom::Aabb;

use super::behavior::{BlockBehavior, BlockCapabilities};
use super::types::MaterialId;

/// Highest value a 4-bit light or opacity level can take.
pub const MAX_LEVEL: u8 = 0xF;

/// Registered material: identity plus the block or item payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub(crate) id: MaterialId,
    pub(crate) name: String,
    pub(crate) data: Option<u16>,
    pub(crate) parent: Option<MaterialId>,
    pub(crate) kind: MaterialKind,
}

impl Material {
    #[inline]
    pub fn id(&self) -> MaterialId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn data(&self) -> Option<u16> {
        self.data
    }

    #[inline]
    pub fn parent(&self) -> Option<MaterialId> {
        self.parent
    }

    #[inline]
    pub fn kind(&self) -> &MaterialKind {
        &self.kind
    }

    #[inline]
    pub fn as_block(&self) -> Option<BlockRef<'_>> {
        match &self.kind {
            MaterialKind::Block(block) => Some(BlockRef {
                material: self,
                block,
            }),
            MaterialKind::Item(_) => None,
        }
    }

    #[inline]
    pub fn as_item(&self) -> Option<&ItemMaterial> {
        match &self.kind {
            MaterialKind::Item(item) => Some(item),
            MaterialKind::Block(_) => None,
        }
    }

    /// True when `def` describes this same material (names compare case-insensitively).
    pub(crate) fn same_identity(&self, def: &MaterialDef) -> bool {
        self.name.to_lowercase() == def.name.to_lowercase()
            && self.data == def.data
            && self.parent == def.parent
            && self.kind == def.kind
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MaterialKind {
    Block(BlockMaterial),
    Item(ItemMaterial),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ItemMaterial {
    pub max_stack: u16,
}

/// Frozen physical description of a placeable voxel type.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockMaterial {
    hardness: f32,
    friction: f32,
    opacity: u8,
    light_level: u8,
    bounding_area: Aabb,
    behavior: BlockBehavior,
    caps: BlockCapabilities,
}

impl BlockMaterial {
    #[inline]
    pub fn hardness(&self) -> f32 {
        self.hardness
    }

    #[inline]
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// 0 is fully transparent, 15 fully opaque.
    #[inline]
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    #[inline]
    pub fn light_level(&self) -> u8 {
        self.light_level
    }

    #[inline]
    pub fn bounding_area(&self) -> &Aabb {
        &self.bounding_area
    }

    #[inline]
    pub fn behavior(&self) -> BlockBehavior {
        self.behavior
    }

    #[inline]
    pub fn capabilities(&self) -> BlockCapabilities {
        self.caps
    }

    #[inline]
    pub fn is_liquid(&self) -> bool {
        self.caps.liquid
    }

    /// Obstacles are kept when something is placed against them; others get replaced.
    #[inline]
    pub fn is_placement_obstacle(&self) -> bool {
        self.caps.placement_obstacle
    }

    /// Whether neighbor changes should schedule `on_update` for this block.
    #[inline]
    pub fn has_physics(&self) -> bool {
        self.caps.physics
    }
}

/// A registered block: the material identity together with its block payload.
#[derive(Clone, Copy, Debug)]
pub struct BlockRef<'r> {
    material: &'r Material,
    block: &'r BlockMaterial,
}

impl<'r> BlockRef<'r> {
    #[inline]
    pub fn id(&self) -> MaterialId {
        self.material.id
    }

    #[inline]
    pub fn name(&self) -> &'r str {
        &self.material.name
    }

    #[inline]
    pub fn material(&self) -> &'r Material {
        self.material
    }
}

impl Deref for BlockRef<'_> {
    type Target = BlockMaterial;

    fn deref(&self) -> &BlockMaterial {
        self.block
    }
}

impl PartialEq for BlockRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.material == other.material
    }
}

/// Unregistered material description; the registry turns it into a [`Material`].
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDef {
    pub name: String,
    pub data: Option<u16>,
    pub parent: Option<MaterialId>,
    pub kind: MaterialKind,
}

impl MaterialDef {
    pub fn item(name: impl Into<String>, max_stack: u16) -> Self {
        MaterialDef {
            name: name.into(),
            data: None,
            parent: None,
            kind: MaterialKind::Item(ItemMaterial { max_stack }),
        }
    }
}

/// Bootstrap-time configuration for a block material.
///
/// Setters chain; [`build`](Self::build) freezes the result so gameplay code only
/// ever sees the immutable [`BlockMaterial`].
#[derive(Clone, Debug)]
pub struct BlockMaterialBuilder {
    name: String,
    data: Option<u16>,
    parent: Option<MaterialId>,
    hardness: f32,
    friction: f32,
    opacity: u8,
    light_level: u8,
    bounding_area: Aabb,
    behavior: BlockBehavior,
}

impl BlockMaterialBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
            parent: None,
            hardness: 0.0,
            friction: 0.0,
            opacity: MAX_LEVEL,
            light_level: 0,
            bounding_area: Aabb::UNIT,
            behavior: BlockBehavior::Solid,
        }
    }

    pub fn hardness(mut self, hardness: f32) -> Self {
        self.hardness = hardness;
        self
    }

    pub fn friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Values above 15 saturate at 15.
    pub fn opacity(mut self, level: u8) -> Self {
        self.opacity = level.min(MAX_LEVEL);
        self
    }

    /// Values above 15 saturate at 15.
    pub fn light_level(mut self, level: u8) -> Self {
        self.light_level = level.min(MAX_LEVEL);
        self
    }

    pub fn bounding_area(mut self, area: Aabb) -> Self {
        self.bounding_area = area;
        self
    }

    pub fn behavior(mut self, behavior: BlockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Marks this block as a data subtype of `parent`.
    pub fn subtype_of(mut self, parent: MaterialId, data: u16) -> Self {
        self.parent = Some(parent);
        self.data = Some(data);
        self
    }

    pub fn build(self) -> MaterialDef {
        let caps = self.behavior.capabilities();
        MaterialDef {
            name: self.name,
            data: self.data,
            parent: self.parent,
            kind: MaterialKind::Block(BlockMaterial {
                hardness: self.hardness,
                friction: self.friction,
                opacity: self.opacity,
                light_level: self.light_level,
                bounding_area: self.bounding_area,
                behavior: self.behavior,
                caps,
            }),
        }
    }
}
