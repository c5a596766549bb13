use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use mandelcycle_core::{
    validate_max_iterations, CoreError, EscapeTime, Mandelbrot, Viewport, DEFAULT_MAX_ITERATIONS,
};

use crate::error::RenderError;
use crate::grid::PixelGrid;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Fixed-at-startup engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Side of the square pixel grid.
    pub size_in_pixels: u32,
    /// Inclusive iteration bound; also the color table length.
    pub max_iterations: u32,
    /// Number of worker threads the grid is split across.
    pub workers: usize,
}

impl EngineConfig {
    pub const DEFAULT_SIZE: u32 = 500;
    pub const DEFAULT_WORKERS: usize = 16;

    /// Reject configurations the engine cannot run. Never clamps.
    pub fn validate(&self) -> crate::Result<()> {
        if self.size_in_pixels == 0 {
            return Err(CoreError::InvalidSize(self.size_in_pixels).into());
        }
        if self.workers == 0 {
            return Err(CoreError::InvalidWorkerCount(self.workers).into());
        }
        validate_max_iterations(self.max_iterations)?;
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size_in_pixels: Self::DEFAULT_SIZE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            workers: Self::DEFAULT_WORKERS,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Computes full escape-count grids on a dedicated pool of worker threads.
///
/// Pixel `i = y * size + x` belongs to worker `i % workers`. Each worker
/// fills its own lane buffer, so no two threads ever touch the same memory
/// and no lock is taken. The lanes are interleaved back into row-major order
/// once every worker has joined. Results are bit-identical for any worker
/// count.
pub struct Engine {
    config: EngineConfig,
    kernel: Mandelbrot,
    pool: ThreadPool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> crate::Result<Self> {
        config.validate()?;
        let kernel = Mandelbrot::new(config.max_iterations)?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("escape-worker-{i}"))
            .build()?;
        debug!(
            size = config.size_in_pixels,
            max_iterations = config.max_iterations,
            workers = config.workers,
            "Engine ready"
        );
        Ok(Self {
            config,
            kernel,
            pool,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the grid for `viewport` with the portable Mandelbrot kernel.
    pub fn compute(&self, viewport: &Viewport) -> crate::Result<PixelGrid> {
        self.compute_with(&self.kernel, viewport)
    }

    /// Compute the grid for `viewport` with any escape kernel.
    ///
    /// Blocks until every worker has finished. A panicking worker is
    /// reported as [`RenderError::WorkerFailed`] and no grid is produced.
    pub fn compute_with<K: EscapeTime + Sync>(
        &self,
        kernel: &K,
        viewport: &Viewport,
    ) -> crate::Result<PixelGrid> {
        let start = Instant::now();
        let size = self.config.size_in_pixels;
        let workers = self.config.workers;
        let total = size as usize * size as usize;
        debug!(
            label = viewport.label(),
            size, workers, "Starting escape-time computation"
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                let lanes: Vec<Vec<u32>> = (0..workers)
                    .into_par_iter()
                    .map(|lane| compute_lane(kernel, viewport, size, lane, workers))
                    .collect();
                interleave(&lanes, total, workers)
            })
        }));

        let values = match outcome {
            Ok(values) => values,
            Err(payload) => {
                let reason = panic_reason(payload.as_ref());
                warn!(%reason, label = viewport.label(), "Computation failed");
                return Err(RenderError::WorkerFailed { reason });
            }
        };

        info!(
            elapsed_ms = start.elapsed().as_millis(),
            label = viewport.label(),
            "Computation complete"
        );
        Ok(PixelGrid::from_values(size, kernel.max_iterations(), values))
    }
}

/// Escape counts for every pixel index congruent to `lane` modulo `workers`,
/// in ascending index order.
fn compute_lane<K: EscapeTime>(
    kernel: &K,
    viewport: &Viewport,
    size: u32,
    lane: usize,
    workers: usize,
) -> Vec<u32> {
    let side = size as usize;
    let total = side * side;
    (lane..total)
        .step_by(workers)
        .map(|i| {
            let x = (i % side) as u32;
            let y = (i / side) as u32;
            kernel.escape_time(viewport.pixel_to_complex(x, y, size))
        })
        .collect()
}

/// Reassemble lane buffers into row-major order.
///
/// Chunk `k` of width `workers` holds index `k * workers + lane` for each
/// lane, which is entry `k` of that lane's buffer.
fn interleave(lanes: &[Vec<u32>], total: usize, workers: usize) -> Vec<u32> {
    let mut values = vec![0u32; total];
    values
        .par_chunks_mut(workers)
        .enumerate()
        .for_each(|(k, chunk)| {
            for (lane, slot) in chunk.iter_mut().enumerate() {
                *slot = lanes[lane][k];
            }
        });
    values
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
