//! Worker pool that generates chunks off the world thread.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use strata_chunk::{ChunkBuf, ChunkCoord, ChunkDims};
use strata_world::{GenerationError, WorldGenerator, generate_chunk};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenJob {
    pub coord: ChunkCoord,
    pub job_id: u64,
}

#[derive(Debug)]
pub struct GenOut {
    pub coord: ChunkCoord,
    pub job_id: u64,
    pub result: Result<ChunkBuf, GenerationError>,
    pub t_gen_us: u32,
}

fn process_gen_job(job: GenJob, generator: &dyn WorldGenerator, dims: ChunkDims, tx: &Sender<GenOut>) {
    let t0 = Instant::now();
    let result = generate_chunk(generator, job.coord, dims);
    let t_gen_us = t0.elapsed().as_micros().min(u128::from(u32::MAX)) as u32;
    let _ = tx.send(GenOut {
        coord: job.coord,
        job_id: job.job_id,
        result,
        t_gen_us,
    });
}

pub struct GenRuntime {
    job_tx: Sender<GenJob>,
    res_rx: Receiver<GenOut>,
    _pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: usize,
}

impl GenRuntime {
    pub fn new(
        generator: Arc<dyn WorldGenerator>,
        dims: ChunkDims,
        workers: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<GenJob>();
        let (res_tx, res_rx) = unbounded::<GenOut>();
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("strata-gen-{i}"))
                .build()?,
        );
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let generator = Arc::clone(&generator);
            let queued = Arc::clone(&queued);
            let inflight = Arc::clone(&inflight);
            pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, generator.as_ref(), dims, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!("generation runtime started with {} workers", workers);

        Ok(Self {
            job_tx,
            res_rx,
            _pool: pool,
            queued,
            inflight,
            workers,
        })
    }

    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn submit(&self, job: GenJob) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Results that are ready now, without blocking.
    pub fn drain_results(&self) -> Vec<GenOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks until `expected` results arrived or `timeout` has passed since
    /// the call, whichever comes first.
    pub fn wait_all(&self, expected: usize, timeout: Duration) -> Vec<GenOut> {
        let deadline = Instant::now() + timeout;
        let mut out = Vec::with_capacity(expected);
        while out.len() < expected {
            match self.res_rx.recv_deadline(deadline) {
                Ok(r) => out.push(r),
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "gave up waiting: {} of {} chunks generated",
                        out.len(),
                        expected
                    );
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        out
    }

    /// `(queued, in flight)` job counts.
    pub fn queue_depth(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }
}

/// Chunk coordinates in a cube of `radius` around `center`, nearest first.
pub fn coords_within(center: ChunkCoord, radius: i32) -> Vec<ChunkCoord> {
    let r = radius.max(0);
    let mut out = Vec::with_capacity(((2 * r + 1) as usize).pow(3));
    for dy in -r..=r {
        for dz in -r..=r {
            for dx in -r..=r {
                out.push(center.offset(dx, dy, dz));
            }
        }
    }
    out.sort_by_key(|c| (c.distance_sq(center), *c));
    out
}
