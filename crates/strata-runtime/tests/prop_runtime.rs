use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use proptest::prelude::*;
use strata_blocks::{MaterialId, MaterialRegistry, initialize_builtin_materials};
use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims};
use strata_geom::{Point, Transform};
use strata_runtime::{GenJob, GenRuntime, coords_within};
use strata_world::{
    Populator, WorldGenConfig, WorldGenerator, WorldInfo, build_generator, generate_chunk,
};

const WAIT: Duration = Duration::from_secs(30);

fn noise_generator() -> Arc<dyn WorldGenerator> {
    let mut reg = MaterialRegistry::new();
    initialize_builtin_materials(&mut reg).unwrap();
    let cfg = WorldGenConfig::from_toml_str(
        r#"
        mode = "noise"
        seed = 77

        [[populators]]
        kind = "ore"
        material = "coal_ore"
    "#,
    )
    .unwrap();
    build_generator(&cfg, &reg).unwrap()
}

/// Panics on odd `cx`, floods everything else.
struct OddFails;

impl WorldGenerator for OddFails {
    fn generate(&self, buf: &mut ChunkBuf, coord: ChunkCoord) {
        if coord.cx % 2 != 0 {
            panic!("odd chunk");
        }
        buf.flood(MaterialId(1));
    }

    fn populators(&self) -> &[Box<dyn Populator>] {
        &[]
    }

    fn spawn(&self, world: &WorldInfo) -> Transform {
        Transform::at(Point::new(world.id, 0.0, 0.0, 0.0))
    }
}

#[test]
fn parallel_results_match_sequential_generation() {
    let generator = noise_generator();
    let dims = ChunkDims::cube(16);
    let rt = GenRuntime::new(Arc::clone(&generator), dims, 4).unwrap();
    let coords = coords_within(ChunkCoord::new(0, 3, 0), 1);
    for (i, c) in coords.iter().enumerate() {
        rt.submit(GenJob {
            coord: *c,
            job_id: i as u64,
        });
    }
    let out = rt.wait_all(coords.len(), WAIT);
    assert_eq!(out.len(), coords.len());
    assert!(rt.drain_results().is_empty());
    assert_eq!(rt.queue_depth().0, 0);

    let by_id: HashMap<u64, _> = out.into_iter().map(|o| (o.job_id, o)).collect();
    for (i, c) in coords.iter().enumerate() {
        let got = &by_id[&(i as u64)];
        assert_eq!(got.coord, *c);
        let want = generate_chunk(generator.as_ref(), *c, dims).unwrap();
        assert_eq!(got.result.as_ref().unwrap(), &want);
    }
}

#[test]
fn failures_are_reported_per_job() {
    let rt = GenRuntime::new(Arc::new(OddFails), ChunkDims::cube(4), 2).unwrap();
    for cx in 0..6 {
        rt.submit(GenJob {
            coord: ChunkCoord::new(cx, 0, 0),
            job_id: cx as u64,
        });
    }
    let out = rt.wait_all(6, WAIT);
    assert_eq!(out.len(), 6);
    for o in out {
        assert_eq!(o.result.is_err(), o.coord.cx % 2 != 0);
    }
}

/// Sleeps for its duration before flooding each chunk.
struct Slow(Duration);

impl WorldGenerator for Slow {
    fn generate(&self, buf: &mut ChunkBuf, _coord: ChunkCoord) {
        std::thread::sleep(self.0);
        buf.flood(MaterialId(1));
    }

    fn populators(&self) -> &[Box<dyn Populator>] {
        &[]
    }

    fn spawn(&self, world: &WorldInfo) -> Transform {
        Transform::at(Point::new(world.id, 0.0, 0.0, 0.0))
    }
}

#[test]
fn wait_all_gives_up_at_one_overall_deadline() {
    let rt = GenRuntime::new(Arc::new(Slow(Duration::from_millis(200))), ChunkDims::cube(4), 0).unwrap();
    assert_eq!(rt.workers(), 1);
    for cx in 0..10 {
        rt.submit(GenJob {
            coord: ChunkCoord::new(cx, 0, 0),
            job_id: cx as u64,
        });
    }
    // each result lands well inside the timeout, but all ten together take ~2 s
    let t0 = Instant::now();
    let out = rt.wait_all(10, Duration::from_millis(300));
    let waited = t0.elapsed();
    assert!(out.len() < 10, "got all {} results", out.len());
    assert!(waited < Duration::from_millis(1500), "waited {:?}", waited);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    // every coordinate in the cube shows up exactly once
    #[test]
    fn coords_within_covers_the_cube(cx in -100i32..100, cy in -100i32..100, cz in -100i32..100, r in 0i32..3) {
        let center = ChunkCoord::new(cx, cy, cz);
        let v = coords_within(center, r);
        let side = (2 * r + 1) as usize;
        prop_assert_eq!(v.len(), side * side * side);
        let mut sorted = v.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), v.len());
        for c in v {
            prop_assert!((c.cx - cx).abs() <= r && (c.cy - cy).abs() <= r && (c.cz - cz).abs() <= r);
        }
    }
}
