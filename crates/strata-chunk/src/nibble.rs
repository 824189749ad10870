/// Packed array of 4-bit values, two per byte. Even indices use the low nibble.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NibbleArray {
    bytes: Vec<u8>,
    len: usize,
}

impl NibbleArray {
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(2)],
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn get(&self, i: usize) -> u8 {
        let b = self.bytes[i >> 1];
        if i & 1 == 0 { b & 0x0F } else { b >> 4 }
    }

    /// Stores the low nibble of `v`.
    #[inline]
    pub fn set(&mut self, i: usize, v: u8) {
        let v = v & 0x0F;
        let b = &mut self.bytes[i >> 1];
        if i & 1 == 0 {
            *b = (*b & 0xF0) | v;
        } else {
            *b = (*b & 0x0F) | (v << 4);
        }
    }

    pub fn fill(&mut self, v: u8) {
        let v = v & 0x0F;
        self.bytes.fill(v | (v << 4));
        // keep the unused high nibble of an odd-length tail at zero
        if self.len & 1 == 1 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0x0F;
            }
        }
    }
}
