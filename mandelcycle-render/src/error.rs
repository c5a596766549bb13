use thiserror::Error;

/// Errors originating from the engine, color table, and history.
#[derive(Debug, Error)]
pub enum RenderError {
    /// `pop` was called with only the root view left. Callers treat this
    /// as "nothing to undo", never as a failure.
    #[error("navigation history is already at its root")]
    EmptyHistoryAfterRoot,

    #[error("failed to start the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("a worker thread failed during computation: {reason}")]
    WorkerFailed { reason: String },

    #[error(transparent)]
    Core(#[from] mandelcycle_core::CoreError),
}
