//! Individual operator implementations that don't fit into families.

pub mod activation;
pub mod reshape;

pub use activation::{ActivationOp, ActivationType};
pub use reshape::ReshapeOp;
