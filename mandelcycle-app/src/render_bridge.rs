use std::sync::mpsc;

use tracing::{debug, info, warn};

use mandelcycle_core::{EscapeTime, Viewport};
use mandelcycle_render::{Engine, Frame, PixelGrid, RenderError};

use crate::app::Explorer;
use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

pub(crate) struct ComputeRequest {
    pub(crate) id: u64,
    pub(crate) viewport: Viewport,
}

pub(crate) struct ComputeResponse {
    pub(crate) id: u64,
    pub(crate) viewport: Viewport,
    pub(crate) result: std::result::Result<PixelGrid, RenderError>,
}

/// Spawn the dedicated compute thread that owns the engine and the kernel
/// it runs.
///
/// Returns the send-side for requests and the receive-side for responses.
/// The thread runs until the request sender is dropped.
pub(crate) fn spawn_compute_worker<K>(
    engine: Engine,
    kernel: K,
) -> std::io::Result<(mpsc::Sender<ComputeRequest>, mpsc::Receiver<ComputeResponse>)>
where
    K: EscapeTime + Send + Sync + 'static,
{
    let (req_tx, req_rx) = mpsc::channel::<ComputeRequest>();
    let (resp_tx, resp_rx) = mpsc::channel::<ComputeResponse>();

    std::thread::Builder::new()
        .name("compute-worker".into())
        .spawn(move || {
            debug!("Compute worker thread started");
            while let Ok(ComputeRequest { id, viewport }) = req_rx.recv() {
                let result = engine.compute_with(&kernel, &viewport);
                if resp_tx
                    .send(ComputeResponse {
                        id,
                        viewport,
                        result,
                    })
                    .is_err()
                {
                    break;
                }
            }
            debug!("Compute worker thread exiting");
        })?;

    Ok((req_tx, resp_rx))
}

// ---------------------------------------------------------------------------
// impl Explorer: request dispatch and completion
// ---------------------------------------------------------------------------

impl Explorer {
    /// Hand `viewport` to the compute worker. Refused while another request
    /// is still pending.
    pub(crate) fn request_compute(&mut self, viewport: Viewport) -> Result<()> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        self.request_id += 1;
        debug!(id = self.request_id, label = viewport.label(), "Requesting computation");
        self.tx_request
            .send(ComputeRequest {
                id: self.request_id,
                viewport,
            })
            .map_err(|_| AppError::WorkerGone)?;
        self.pending = Some(self.request_id);
        Ok(())
    }

    /// Block until the pending computation finishes and push its frame.
    ///
    /// A failed computation is returned as an error and leaves history as
    /// it was; the controls unlock either way.
    pub(crate) fn wait(&mut self) -> Result<&Frame> {
        let pending = self.pending.ok_or(AppError::Idle)?;
        loop {
            let response = match self.rx_response.recv() {
                Ok(response) => response,
                Err(_) => {
                    self.pending = None;
                    return Err(AppError::WorkerGone);
                }
            };
            if response.id != pending {
                debug!(id = response.id, "Dropping stale response");
                continue;
            }
            self.pending = None;
            return match response.result {
                Ok(grid) => {
                    info!(label = response.viewport.label(), "View changed");
                    self.history.push(Frame::new(response.viewport, grid));
                    Ok(self.history.current())
                }
                Err(e) => {
                    warn!(label = response.viewport.label(), "Keeping previous view: {e}");
                    Err(e.into())
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::app::tests::small_prefs;
    use crate::app::Explorer;
    use crate::error::AppError;
    use mandelcycle_core::{Complex, EscapeTime, Mandelbrot};
    use mandelcycle_render::RenderError;

    /// Mandelbrot inside the starting square, a panic anywhere beyond it.
    struct BoundedKernel(Mandelbrot);

    impl EscapeTime for BoundedKernel {
        fn escape_time(&self, c: Complex) -> u32 {
            if c.re.abs() > 3.0 || c.im.abs() > 3.0 {
                panic!("point {c} outside the supported region");
            }
            self.0.escape_time(c)
        }

        fn max_iterations(&self) -> u32 {
            self.0.max_iterations()
        }
    }

    #[test]
    fn second_request_while_pending_is_refused() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        let next = explorer.current().viewport.pan_zoom(20, 20, 0.5, 40);
        explorer.request_compute(next.clone()).unwrap();
        assert!(explorer.is_busy());

        assert!(matches!(
            explorer.request_compute(next.clone()),
            Err(AppError::Busy)
        ));

        let frame = explorer.wait().unwrap();
        assert_eq!(frame.viewport, next);
        assert!(!explorer.is_busy());
        assert_eq!(explorer.status().depth, 2);
    }

    #[test]
    fn wait_without_request_is_idle() {
        let mut explorer = Explorer::new(&small_prefs()).unwrap();
        assert!(matches!(explorer.wait(), Err(AppError::Idle)));
    }

    #[test]
    fn failed_computation_keeps_history() {
        let prefs = small_prefs();
        let kernel = BoundedKernel(Mandelbrot::new(prefs.max_iterations).unwrap());
        let mut explorer = Explorer::with_kernel(&prefs, kernel).unwrap();
        let root = explorer.current().clone();

        // Zooming out covers [-8, 8), outside what the kernel accepts.
        explorer.zoom_out().unwrap();
        let err = explorer.wait().unwrap_err();
        assert!(matches!(
            err,
            AppError::Render(RenderError::WorkerFailed { .. })
        ));

        let status = explorer.status();
        assert_eq!(status.depth, 1);
        assert!(!status.busy);
        assert_eq!(explorer.current(), &root);

        // The worker is still serving requests.
        let frame = explorer.navigate_and_wait(Explorer::zoom_in).unwrap();
        assert_eq!(frame.viewport.span(), 1.0);
        assert_eq!(explorer.status().depth, 2);
    }
}
