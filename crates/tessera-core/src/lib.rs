//! Operator contract, construction contexts and registry for Tessera.
//!
//! This crate provides the seam between a serialized graph description and
//! device-specific executable code:
//! - Operator definitions and typed attribute access (`OperatorDef`, `ArgValue`)
//! - Tensors and the workspace that owns them (`Tensor`, `TensorRef`, `Workspace`)
//! - Lifecycle contexts (`OpConstructContext`, `OpInitContext`, `OpContext`)
//! - The `Operation` trait every operator implementation satisfies
//! - The registry mapping `(op type, device type, data type)` to factories

pub mod arg_helper;
pub mod context;
pub mod device;
pub mod op_def;
pub mod operation;
pub mod registry;
pub mod tensor;
pub mod types;
pub mod workspace;

// Re-export commonly used types
pub use arg_helper::FromArg;
pub use context::{OpConstructContext, OpContext, OpInitContext};
pub use device::{CpuDevice, Device};
pub use op_def::{ArgValue, OperatorDef};
pub use operation::{OpBase, Operation};
pub use registry::{ConstructOp, OpCreator, OpKey, OpRegistrationInfo, OpRegistry};
pub use tensor::{Tensor, TensorRef};
pub use types::{DataType, DeviceType, Element, MemoryType};
pub use workspace::Workspace;

/// Result type using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failures of operator resolution and execution.
///
/// Broken construction sequences (missing definition, out-of-range tensor
/// index, unattached device) are not represented here: they panic.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown operator type '{0}'")]
    UnknownOperator(String),

    #[error(
        "Operator '{op_type}' has no implementation for device {device_type} with data type {data_type}"
    )]
    UnsupportedSpecialization {
        op_type: String,
        device_type: DeviceType,
        data_type: DataType,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Out of resources: {0}")]
    OutOfResources(String),

    #[error("Tensor error: {0}")]
    Tensor(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}
