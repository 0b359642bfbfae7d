//! Reference operator implementations for Tessera.
//!
//! Every operator here targets the host CPU and registers itself through an
//! explicit `register` function; [`register_core_ops`] calls them in a fixed
//! order.
//!
//! # Operator Families
//!
//! - **Eltwise**: Add, Sub, Mul, Div, Max, Min (`f32`, `i32`)
//!
//! # Individual Operators
//!
//! - Activation (NOOP, RELU, RELUX, LEAKYRELU, TANH, SIGMOID) (`f32`)
//! - Reshape (`f32`, `i32`)

pub mod families;
pub mod operators;

mod helpers;
mod registry;

pub use families::{EltwiseElement, EltwiseKind, EltwiseOp};
pub use operators::{ActivationOp, ActivationType, ReshapeOp};
pub use registry::{core_op_registry, global_op_registry, register_core_ops};
