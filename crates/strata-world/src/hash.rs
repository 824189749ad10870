//! Integer hashing used for all worldgen randomness. Same inputs, same outputs,
//! on every thread and every run.

use strata_chunk::ChunkCoord;

#[inline]
pub fn uhash32(mut a: u32) -> u32 {
    a ^= a >> 16;
    a = a.wrapping_mul(0x7feb_352d);
    a ^= a >> 15;
    a = a.wrapping_mul(0x846c_a68b);
    a ^= a >> 16;
    a
}

#[inline]
pub fn hash3(x: i32, y: i32, z: i32, seed: u32) -> u32 {
    let mut h = seed ^ 0x9e37_79b9;
    h ^= uhash32((x as u32).wrapping_add(0x85eb_ca6b));
    h ^= uhash32((y as u32).wrapping_add(0xc2b2_ae35));
    h ^= uhash32((z as u32).wrapping_add(0x27d4_eb2f));
    uhash32(h)
}

/// Maps a hash to `[0, 1)` using its low 24 bits.
#[inline]
pub fn unit(h: u32) -> f32 {
    (h & 0x00FF_FFFF) as f32 / 16_777_216.0
}

#[inline]
pub fn rand01(x: i32, y: i32, z: i32, seed: u32) -> f32 {
    unit(hash3(x, y, z, seed))
}

/// Counter-based stream seeded from `(seed, chunk, salt)`.
#[derive(Clone, Debug)]
pub struct ChunkRng {
    state: u32,
}

impl ChunkRng {
    pub fn new(seed: u32, coord: ChunkCoord, salt: u32) -> Self {
        Self {
            state: hash3(coord.cx, coord.cy, coord.cz, seed ^ uhash32(salt)),
        }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x9e37_79b9);
        uhash32(self.state)
    }

    /// Uniform in `0..n`; `n` must be non-zero.
    #[inline]
    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u32() as usize) % n
    }
}
