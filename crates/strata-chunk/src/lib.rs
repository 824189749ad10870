//! Chunk coordinates and the voxel buffer generators write into.
#![forbid(unsafe_code)]

mod nibble;

pub use nibble::NibbleArray;

use strata_blocks::MaterialId;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// Chunk holding world voxel `(wx, wy, wz)`.
    #[inline]
    pub fn containing(wx: i32, wy: i32, wz: i32, dims: ChunkDims) -> Self {
        Self {
            cx: wx.div_euclid(dims.sx as i32),
            cy: wy.div_euclid(dims.sy as i32),
            cz: wz.div_euclid(dims.sz as i32),
        }
    }

    /// World coordinates of this chunk's `(0, 0, 0)` voxel.
    #[inline]
    pub fn base(self, dims: ChunkDims) -> (i32, i32, i32) {
        (
            self.cx * dims.sx as i32,
            self.cy * dims.sy as i32,
            self.cz * dims.sz as i32,
        )
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Chunk extent in voxels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkDims {
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
}

impl ChunkDims {
    pub const DEFAULT: ChunkDims = ChunkDims::cube(16);

    pub const fn new(sx: usize, sy: usize, sz: usize) -> Self {
        Self { sx, sy, sz }
    }

    pub const fn cube(n: usize) -> Self {
        Self::new(n, n, n)
    }

    #[inline]
    pub const fn volume(self) -> usize {
        self.sx * self.sy * self.sz
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Mutable voxel volume: a material id and a 4-bit data value per voxel.
///
/// Local coordinates index as `(y * sz + z) * sx + x`. A fresh buffer is all
/// air with data 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub ids: Vec<MaterialId>,
    pub data: NibbleArray,
}

impl ChunkBuf {
    pub fn new(coord: ChunkCoord, dims: ChunkDims) -> Self {
        let n = dims.volume();
        ChunkBuf {
            coord,
            sx: dims.sx,
            sy: dims.sy,
            sz: dims.sz,
            ids: vec![MaterialId::AIR; n],
            data: NibbleArray::new(n),
        }
    }

    /// Wraps existing ids; the vector is truncated or padded with air to fit.
    pub fn from_ids_local(coord: ChunkCoord, dims: ChunkDims, ids: Vec<MaterialId>) -> Self {
        let mut ids = ids;
        let expect = dims.volume();
        if ids.len() != expect {
            ids.resize(expect, MaterialId::AIR);
        }
        ChunkBuf {
            coord,
            sx: dims.sx,
            sy: dims.sy,
            sz: dims.sz,
            ids,
            data: NibbleArray::new(expect),
        }
    }

    #[inline]
    pub fn dims(&self) -> ChunkDims {
        ChunkDims::new(self.sx, self.sy, self.sz)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> (MaterialId, u8) {
        let i = self.idx(x, y, z);
        (self.ids[i], self.data.get(i))
    }

    #[inline]
    pub fn id_local(&self, x: usize, y: usize, z: usize) -> MaterialId {
        self.ids[self.idx(x, y, z)]
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, id: MaterialId, data: u8) {
        let i = self.idx(x, y, z);
        self.ids[i] = id;
        self.data.set(i, data);
    }

    /// Sets every voxel to `id` with data 0.
    pub fn flood(&mut self, id: MaterialId) {
        self.ids.fill(id);
        self.data.fill(0);
    }

    /// Sets every voxel with `y` in `y0..y1` (clamped to the buffer) to `id`.
    pub fn fill_layers(&mut self, y0: usize, y1: usize, id: MaterialId) {
        let layer = self.sx * self.sz;
        let y1 = y1.min(self.sy);
        if y0 >= y1 {
            return;
        }
        self.ids[y0 * layer..y1 * layer].fill(id);
        for i in y0 * layer..y1 * layer {
            self.data.set(i, 0);
        }
    }

    #[inline]
    pub fn base(&self) -> (i32, i32, i32) {
        self.coord.base(self.dims())
    }

    /// Local coordinates of a world voxel inside this chunk.
    #[inline]
    pub fn world_to_local(&self, wx: i32, wy: i32, wz: i32) -> Option<(usize, usize, usize)> {
        let (bx, by, bz) = self.base();
        let (lx, ly, lz) = (wx - bx, wy - by, wz - bz);
        if lx < 0 || ly < 0 || lz < 0 {
            return None;
        }
        let (lx, ly, lz) = (lx as usize, ly as usize, lz as usize);
        if lx >= self.sx || ly >= self.sy || lz >= self.sz {
            return None;
        }
        Some((lx, ly, lz))
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        self.world_to_local(wx, wy, wz).is_some()
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<(MaterialId, u8)> {
        let (x, y, z) = self.world_to_local(wx, wy, wz)?;
        Some(self.get_local(x, y, z))
    }

    /// Returns `false` when the voxel lies outside this chunk.
    #[inline]
    pub fn set_world(&mut self, wx: i32, wy: i32, wz: i32, id: MaterialId, data: u8) -> bool {
        match self.world_to_local(wx, wy, wz) {
            Some((x, y, z)) => {
                self.set_local(x, y, z, id, data);
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.ids.iter().any(|&id| id != MaterialId::AIR)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }

    /// The single id every voxel holds, if there is one.
    pub fn uniform_id(&self) -> Option<MaterialId> {
        let first = *self.ids.first()?;
        self.ids.iter().all(|&id| id == first).then_some(first)
    }
}
