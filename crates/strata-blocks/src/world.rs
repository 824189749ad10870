use super::types::{MaterialId, Source};

/// The slice of a world that block hooks are allowed to touch.
///
/// Coordinates are world voxel coordinates. `data` is a 4-bit value; implementations
/// keep only the low nibble.
pub trait BlockWorld {
    /// Material id and data at a voxel, or `None` when the voxel is not loaded.
    fn block_at(&self, x: i32, y: i32, z: i32) -> Option<(MaterialId, u8)>;

    /// Overwrites a voxel. Returns `false` when the world refused and nothing changed.
    /// With `causes_update` the voxel and its six neighbors are queued for updates.
    #[allow(clippy::too_many_arguments)]
    fn set_block_material(
        &mut self,
        x: i32,
        y: i32,
        z: i32,
        material: MaterialId,
        data: u8,
        causes_update: bool,
        source: Source,
    ) -> bool;

    /// Runs the destroy hook of the voxel's material, then replaces it with air.
    fn break_block(&mut self, x: i32, y: i32, z: i32, source: Source) -> bool;

    /// Queues an `on_update` for the voxel.
    fn request_update(&mut self, x: i32, y: i32, z: i32);
}
