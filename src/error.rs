//! Error type shared by grid construction and the update engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LifeError {
    #[error("invalid grid dimensions {rows}x{columns}: both must be at least 1")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("cell buffer holds {actual} cells, expected {expected}")]
    CellCountMismatch { expected: usize, actual: usize },

    #[error("live density {0} is outside [0, 1]")]
    InvalidDensity(f64),

    #[error("invalid worker count {0}: at least one worker is required")]
    InvalidWorkerCount(usize),

    #[error("failed to build the worker thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, LifeError>;
