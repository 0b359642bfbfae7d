//! Error types for the runtime crate.

use tessera_core::DeviceType;
use thiserror::Error;

/// Network construction and execution errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Registry or tensor failure outside any single operator's lifecycle.
    #[error(transparent)]
    Core(#[from] tessera_core::Error),

    /// An operator input names a tensor the workspace doesn't hold.
    #[error("Tensor not found: {0}")]
    TensorNotFound(String),

    /// Neither the target device nor an allowed fallback can run the operator.
    #[error("No available device for operator '{op}' (target {target})")]
    NoAvailableDevice { op: String, target: DeviceType },

    /// `run` was called before `init`.
    #[error("Net must be initialized before running")]
    NotInitialized,

    /// An operator's `init` or `run` failed.
    #[error("Operator '{name}' failed: {source}")]
    Operation {
        name: String,
        source: tessera_core::Error,
    },
}

/// Specialized Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
