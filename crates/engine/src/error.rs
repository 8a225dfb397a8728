/// Reasons the overlay declines to start.
///
/// Neither is a failure from the user's point of view: the host simply shows
/// no decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StartAbort {
    #[error("reduced motion requested")]
    ReducedMotion,
    #[error("render surface unavailable")]
    SurfaceUnavailable,
}

/// Errors from loading or validating an [`crate::EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}
