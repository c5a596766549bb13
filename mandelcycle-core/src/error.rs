use thiserror::Error;

/// Errors originating from the core viewport and escape-time types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid max iterations: {0} (must be below the did-not-escape sentinel)")]
    InvalidMaxIterations(u32),

    #[error("invalid grid size: {0} (must be > 0)")]
    InvalidSize(u32),

    #[error("invalid worker count: {0} (must be >= 1)")]
    InvalidWorkerCount(usize),

    #[error("invalid viewport: {reason}")]
    InvalidViewport { reason: String },
}
