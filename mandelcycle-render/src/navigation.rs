use std::sync::Arc;

use tracing::debug;

use mandelcycle_core::Viewport;

use crate::error::RenderError;
use crate::grid::PixelGrid;

/// A viewport together with the grid computed for it.
///
/// The grid sits behind an `Arc` so handing the current frame to a painter
/// never copies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub grid: Arc<PixelGrid>,
}

impl Frame {
    pub fn new(viewport: Viewport, grid: PixelGrid) -> Self {
        Self {
            viewport,
            grid: Arc::new(grid),
        }
    }
}

/// Append/pop-only history of computed frames.
///
/// Never empty: it is created with a root frame, and `pop` refuses to remove
/// it. Entries live for the life of the stack. Going back just drops the
/// most recent one.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    frames: Vec<Frame>,
}

impl NavigationStack {
    pub fn new(root: Frame) -> Self {
        Self { frames: vec![root] }
    }

    pub fn push(&mut self, frame: Frame) {
        debug!(label = frame.viewport.label(), depth = self.frames.len() + 1, "History push");
        self.frames.push(frame);
    }

    /// Remove and return the most recent frame.
    ///
    /// With only the root left this returns
    /// [`RenderError::EmptyHistoryAfterRoot`] and leaves the stack as is.
    pub fn pop(&mut self) -> crate::Result<Frame> {
        if self.frames.len() <= 1 {
            return Err(RenderError::EmptyHistoryAfterRoot);
        }
        let frame = self.frames.pop().ok_or(RenderError::EmptyHistoryAfterRoot)?;
        debug!(depth = self.frames.len(), "History pop");
        Ok(frame)
    }

    /// The frame currently on display.
    pub fn current(&self) -> &Frame {
        // The root is never removed.
        &self.frames[self.frames.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always `false`; provided for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether [`pop`](Self::pop) would do anything.
    pub fn can_go_back(&self) -> bool {
        self.frames.len() > 1
    }
}
