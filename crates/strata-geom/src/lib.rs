//! Geometry value types shared by the block, world and player crates.
#![forbid(unsafe_code)]

use core::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Vec3 {
    #[cfg_attr(test, proptest(strategy = "-1e3f32..1e3"))]
    pub x: f32,
    #[cfg_attr(test, proptest(strategy = "-1e3f32..1e3"))]
    pub y: f32,
    #[cfg_attr(test, proptest(strategy = "-1e3f32..1e3"))]
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const ONE: Vec3 = Vec3 {
        x: 1.0,
        y: 1.0,
        z: 1.0,
    };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Axis-aligned box in block-local units. Materials use it as their collision volume.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const UNIT: Aabb = Aabb {
        min: Vec3::ZERO,
        max: Vec3::ONE,
    };

    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Builds a box from the six bounds `(min_x, min_y, min_z, max_x, max_y, max_z)`.
    #[inline]
    pub const fn from_bounds(
        min_x: f32,
        min_y: f32,
        min_z: f32,
        max_x: f32,
        max_y: f32,
        max_z: f32,
    ) -> Self {
        Self {
            min: Vec3::new(min_x, min_y, min_z),
            max: Vec3::new(max_x, max_y, max_z),
        }
    }

    #[inline]
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    #[inline]
    pub fn translated(&self, by: Vec3) -> Aabb {
        Aabb::new(self.min + by, self.max + by)
    }
}

/// Rotation quaternion. Only carried through transforms here; no rotation math is needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldId(pub u32);

/// A position inside a specific world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub world: WorldId,
    pub pos: Vec3,
}

impl Point {
    #[inline]
    pub const fn new(world: WorldId, x: f32, y: f32, z: f32) -> Self {
        Self {
            world,
            pos: Vec3::new(x, y, z),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Point,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn at(position: Point) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn translated_keeps_extent(a in any::<Aabb>(), t in any::<Vec3>()) {
            let e = a.extent();
            let e2 = a.translated(t).extent();
            prop_assert!((e.x - e2.x).abs() <= 1e-2);
            prop_assert!((e.y - e2.y).abs() <= 1e-2);
            prop_assert!((e.z - e2.z).abs() <= 1e-2);
        }

        #[test]
        fn box_contains_its_corners_after_translation(p in any::<Vec3>(), t in any::<Vec3>()) {
            let a = Aabb::new(p, p + Vec3::ONE);
            let moved = a.translated(t);
            prop_assert_eq!(moved.min, a.min + t);
            prop_assert!(moved.contains(moved.min));
            prop_assert!(moved.contains(moved.max));
        }
    }

    #[test]
    fn transform_at_is_identity_rotation_unit_scale() {
        let t = Transform::at(Point::new(WorldId(3), 0.5, 65.0, 0.5));
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.position.world, WorldId(3));
    }
}
