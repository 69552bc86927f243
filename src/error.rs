use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, KMeansError>;

/// Errors produced while configuring or running the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KMeansError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// A point does not have the dimensionality established by the dataset.
    #[error("dimension mismatch at point {index}: expected {expected} dimensions, found {found}")]
    DimensionMismatch { index: usize, expected: usize, found: usize },
}

/// Invalid engine configuration. Never retried, always surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cluster count must be within 1..={n}, got {k}")]
    InvalidClusterCount { k: i64, n: usize },
    #[error("dataset is empty")]
    EmptyDataset,
    #[error("points must have at least one dimension")]
    ZeroDimensions,
    #[error("max iteration count must be positive, got {0}")]
    InvalidMaxIter(i64),
    #[error("expected {expected} manual centroids, got {found}")]
    ManualCentroidCount { expected: usize, found: usize },
    #[error("manual centroid {index} has {found} dimensions, dataset has {expected}")]
    ManualCentroidDimension { index: usize, expected: usize, found: usize },
    #[error("manual initialization requires centroid coordinates")]
    MissingManualCentroids,
    #[error("coordinate of point {index} is not a finite number")]
    NonFiniteCoordinate { index: usize },
    #[error("{sample_cnt} samples of {sample_dims} dimensions do not fit into memory")]
    TooManySamples { sample_cnt: usize, sample_dims: usize },
    #[error("lower bound must be smaller than the upper bound")]
    InvalidBounds,
    #[error("unknown initialization method `{0}`")]
    UnknownInitMethod(String),
    #[error("no dataset has been submitted yet")]
    NotConfigured,
}
