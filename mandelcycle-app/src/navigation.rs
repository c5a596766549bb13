use std::fmt;
use std::str::FromStr;

use tracing::debug;

use mandelcycle_render::{Frame, RenderError};

use crate::app::{Explorer, ZOOM_IN, ZOOM_OUT};
use crate::error::{AppError, Result};

// ---------------------------------------------------------------------------
// Pan directions
// ---------------------------------------------------------------------------

/// The eight pan buttons. Each recenters on a point one tenth of the image
/// in from the matching edge(s), keeping the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PanDirection {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl PanDirection {
    pub(crate) const ALL: [PanDirection; 8] = [
        PanDirection::Up,
        PanDirection::Down,
        PanDirection::Left,
        PanDirection::Right,
        PanDirection::UpLeft,
        PanDirection::UpRight,
        PanDirection::DownLeft,
        PanDirection::DownRight,
    ];

    /// Pixel to recenter on in a `size` x `size` grid. Row 0 is the top.
    pub(crate) fn target(self, size: u32) -> (u32, u32) {
        let near = size / 10;
        let far = size * 9 / 10;
        let mid = size / 2;
        match self {
            PanDirection::Up => (mid, near),
            PanDirection::Down => (mid, far),
            PanDirection::Left => (near, mid),
            PanDirection::Right => (far, mid),
            PanDirection::UpLeft => (near, near),
            PanDirection::UpRight => (far, near),
            PanDirection::DownLeft => (near, far),
            PanDirection::DownRight => (far, far),
        }
    }

    fn name(self) -> &'static str {
        match self {
            PanDirection::Up => "up",
            PanDirection::Down => "down",
            PanDirection::Left => "left",
            PanDirection::Right => "right",
            PanDirection::UpLeft => "up-left",
            PanDirection::UpRight => "up-right",
            PanDirection::DownLeft => "down-left",
            PanDirection::DownRight => "down-right",
        }
    }
}

impl fmt::Display for PanDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.to_ascii_lowercase();
        PanDirection::ALL
            .into_iter()
            .find(|d| d.name() == lower || d.name().replace('-', "") == lower)
            .ok_or_else(|| AppError::Command(format!("unknown direction '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// impl Explorer: navigation
// ---------------------------------------------------------------------------

impl Explorer {
    /// Zoom in around the image center.
    pub(crate) fn zoom_in(&mut self) -> Result<()> {
        let mid = self.size / 2;
        self.navigate(mid, mid, ZOOM_IN)
    }

    /// Zoom out around the image center.
    pub(crate) fn zoom_out(&mut self) -> Result<()> {
        let mid = self.size / 2;
        self.navigate(mid, mid, ZOOM_OUT)
    }

    pub(crate) fn pan(&mut self, direction: PanDirection) -> Result<()> {
        let (px, py) = direction.target(self.size);
        self.navigate(px, py, 1.0)
    }

    /// Recenter on a clicked pixel and zoom in one step.
    pub(crate) fn click(&mut self, px: u32, py: u32) -> Result<()> {
        if px >= self.size || py >= self.size {
            return Err(AppError::Command(format!(
                "pixel ({px}, {py}) is outside the {0}x{0} image",
                self.size
            )));
        }
        self.navigate(px, py, ZOOM_IN)
    }

    /// Drop the most recent frame. Returns `false` when already at the root.
    pub(crate) fn back(&mut self) -> Result<bool> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        match self.history.pop() {
            Ok(frame) => {
                debug!(label = frame.viewport.label(), "Went back");
                Ok(true)
            }
            Err(RenderError::EmptyHistoryAfterRoot) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Request the derived viewport. The result lands in history on the
    /// next [`wait`](Explorer::wait).
    fn navigate(&mut self, px: u32, py: u32, zoom_factor: f64) -> Result<()> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        let next = self
            .current()
            .viewport
            .pan_zoom(px, py, zoom_factor, self.size);
        self.request_compute(next)
    }

    /// Navigate and block until the new frame is in history.
    pub(crate) fn navigate_and_wait<F>(&mut self, step: F) -> Result<&Frame>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        step(self)?;
        self.wait()
    }
}
