use strata_geom::{Aabb, Vec3};
use proptest::prelude::*;
use proptest::num::f32::NORMAL;
use proptest::strategy::Strategy;

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}
fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}
fn unit_point() -> impl Strategy<Value = Vec3> {
    (0.0f32..=1.0, 0.0f32..=1.0, 0.0f32..=1.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Every point of the unit cell lies inside the default bounding area
    #[test]
    fn unit_box_contains_cell_points(p in unit_point()) {
        prop_assert!(Aabb::UNIT.contains(p));
    }

    // Translating a point and its box together preserves containment
    #[test]
    fn containment_survives_translation(p in unit_point(), t in (-1e3f32..1e3, -1e3f32..1e3, -1e3f32..1e3)) {
        let by = Vec3::new(t.0, t.1, t.2);
        let moved = Aabb::UNIT.translated(by);
        let q = p + by;
        // allow rounding at the faces
        let grown = Aabb::new(moved.min - Vec3::ONE * 1e-3, moved.max + Vec3::ONE * 1e-3);
        prop_assert!(grown.contains(q));
    }

    // from_bounds is the same as new with packed corners
    #[test]
    fn from_bounds_matches_new(a in arb_vec3(), b in arb_vec3()) {
        let x = Aabb::from_bounds(a.x, a.y, a.z, b.x, b.y, b.z);
        prop_assert_eq!(x, Aabb::new(a, b));
    }
}

#[test]
fn unit_box_extent_is_one() {
    assert_eq!(Aabb::UNIT.extent(), Vec3::ONE);
    assert!(!Aabb::UNIT.contains(Vec3::new(1.5, 0.5, 0.5)));
}
