use std::fmt;
use std::sync::mpsc;

use tracing::info;

use mandelcycle_core::{EscapeTime, Mandelbrot, Viewport};
use mandelcycle_render::{ColorTable, Engine, Frame, NavigationStack, RenderBuffer, RenderError};

use crate::display_color::ColorSettings;
use crate::error::Result;
use crate::preferences::AppPreferences;
use crate::render_bridge::{spawn_compute_worker, ComputeRequest, ComputeResponse};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Span multiplier for one zoom-out step.
pub(crate) const ZOOM_OUT: f64 = 4.0;
/// Span multiplier for one zoom-in step.
pub(crate) const ZOOM_IN: f64 = 1.0 / ZOOM_OUT;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Snapshot of what a front-end would show next to the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Status {
    pub(crate) label: String,
    pub(crate) depth: usize,
    pub(crate) can_go_back: bool,
    pub(crate) busy: bool,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [history {}", self.label, self.depth)?;
        if self.can_go_back {
            f.write_str(", back available")?;
        }
        if self.busy {
            f.write_str(", calculating")?;
        }
        f.write_str("]")
    }
}

// ---------------------------------------------------------------------------
// Explorer session
// ---------------------------------------------------------------------------

/// One exploration session: history of computed frames, the live color
/// table, and a background compute worker.
///
/// Navigation goes through the worker and is serialised: while a request is
/// pending every further pan/zoom/back is refused with
/// [`AppError::Busy`](crate::error::AppError::Busy). Recoloring only touches
/// the table and the already-computed grid, so it is always allowed.
pub(crate) struct Explorer {
    pub(crate) size: u32,
    pub(crate) history: NavigationStack,
    pub(crate) table: ColorTable,
    pub(crate) colors: ColorSettings,
    pub(crate) tx_request: mpsc::Sender<ComputeRequest>,
    pub(crate) rx_response: mpsc::Receiver<ComputeResponse>,
    pub(crate) pending: Option<u64>,
    pub(crate) request_id: u64,
}

impl Explorer {
    /// Explorer over the Mandelbrot kernel.
    pub(crate) fn new(prefs: &AppPreferences) -> Result<Self> {
        let kernel = Mandelbrot::new(prefs.max_iterations).map_err(RenderError::from)?;
        Self::with_kernel(prefs, kernel)
    }

    /// Validate the configuration, compute the root frame synchronously, and
    /// hand the engine and `kernel` to the compute worker.
    pub(crate) fn with_kernel<K>(prefs: &AppPreferences, kernel: K) -> Result<Self>
    where
        K: EscapeTime + Send + Sync + 'static,
    {
        let engine = Engine::new(prefs.engine_config())?;
        let config = *engine.config();

        let root = Viewport::initial();
        let grid = engine.compute_with(&kernel, &root)?;
        let history = NavigationStack::new(Frame::new(root, grid));

        let colors = prefs.color.clamped();
        let mut table = ColorTable::new(config.max_iterations as usize);
        colors.apply(&mut table);

        let (tx_request, rx_response) = spawn_compute_worker(engine, kernel)?;

        info!(
            size = config.size_in_pixels,
            max_iterations = config.max_iterations,
            workers = config.workers,
            "Explorer ready"
        );
        Ok(Self {
            size: config.size_in_pixels,
            history,
            table,
            colors,
            tx_request,
            rx_response,
            pending: None,
            request_id: 0,
        })
    }

    pub(crate) fn current(&self) -> &Frame {
        self.history.current()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn table(&self) -> &ColorTable {
        &self.table
    }

    pub(crate) fn colors(&self) -> &ColorSettings {
        &self.colors
    }

    /// Clamp `settings`, rebuild the table, and keep them as current.
    pub(crate) fn recolor(&mut self, settings: ColorSettings) {
        self.colors = settings.clamped();
        self.colors.apply(&mut self.table);
    }

    /// Paint the current frame with the current table.
    pub(crate) fn paint(&self) -> RenderBuffer {
        self.table.paint(&self.current().grid)
    }

    pub(crate) fn status(&self) -> Status {
        Status {
            label: self.current().viewport.label().to_string(),
            depth: self.history.len(),
            can_go_back: self.history.can_go_back(),
            busy: self.is_busy(),
        }
    }
}
