use thiserror::Error;

/// The error taxonomy from the design spec (§7). Parser and I/O errors are
/// fatal at start-up; `CacheInconsistency` and `NumericFailure` are fatal to
/// the chain that raised them but not to the process. `Unconverged` is
/// deliberately absent here: it is not an error, it is a flag carried on a
/// chain's successful `EstimationOutcome` (see `eenet-estimation`).
#[derive(Debug, Error)]
pub enum EeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid graph: {0}")]
    InvalidGraph(String),

    #[error("invalid edge ({i}, {j}): {reason}")]
    InvalidEdge { i: u32, j: u32, reason: String },

    #[error("two-path cache inconsistency: {0}")]
    CacheInconsistency(String),

    #[error("numeric failure: {0}")]
    Numeric(String),
}

pub type Result<T> = std::result::Result<T, EeError>;
