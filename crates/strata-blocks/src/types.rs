/// Compact material identifier. Shared by blocks and items; stored raw in chunk buffers.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Debug)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Reserved by every registry at construction.
    pub const AIR: MaterialId = MaterialId(0);

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for MaterialId {
    fn from(v: u16) -> Self {
        MaterialId(v)
    }
}

/// Face of the block a placement was made against.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockFace {
    Top,
    Bottom,
    North,
    South,
    East,
    West,
    This,
}

impl BlockFace {
    pub const HORIZONTAL: [BlockFace; 4] = [
        BlockFace::North,
        BlockFace::South,
        BlockFace::East,
        BlockFace::West,
    ];

    pub const ALL: [BlockFace; 6] = [
        BlockFace::Top,
        BlockFace::Bottom,
        BlockFace::North,
        BlockFace::South,
        BlockFace::East,
        BlockFace::West,
    ];

    #[inline]
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            BlockFace::Top => (0, 1, 0),
            BlockFace::Bottom => (0, -1, 0),
            BlockFace::North => (0, 0, -1),
            BlockFace::South => (0, 0, 1),
            BlockFace::East => (1, 0, 0),
            BlockFace::West => (-1, 0, 0),
            BlockFace::This => (0, 0, 0),
        }
    }

    /// The voxel across this face, or `None` past the edge of the `i32` range.
    #[inline]
    pub fn neighbor(self, x: i32, y: i32, z: i32) -> Option<(i32, i32, i32)> {
        let (dx, dy, dz) = self.offset();
        Some((x.checked_add(dx)?, y.checked_add(dy)?, z.checked_add(dz)?))
    }
}

/// Who caused a block change. Passed through untouched.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    World,
    Generator,
    Physics,
    Player(u64),
}
