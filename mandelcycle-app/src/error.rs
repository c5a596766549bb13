use std::path::PathBuf;

use thiserror::Error;

use mandelcycle_render::RenderError;

/// Errors surfaced by the explorer session and its command loop.
#[derive(Debug, Error)]
pub enum AppError {
    /// A navigation request arrived while a computation was still running.
    #[error("a computation is already in progress")]
    Busy,

    /// There is nothing to wait for.
    #[error("no computation is in progress")]
    Idle,

    #[error("the compute worker has stopped")]
    WorkerGone,

    #[error("invalid command: {0}")]
    Command(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    /// Saving failed. The session goes on with its in-memory settings.
    #[error("failed to save preferences to {}: {source}", path.display())]
    Preferences {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
