//! Operator families sharing one implementation across several op types.

pub mod eltwise;

pub use eltwise::{EltwiseElement, EltwiseKind, EltwiseOp};
