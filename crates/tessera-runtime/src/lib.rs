//! Sequential execution of operator networks.
//!
//! A [`NetDef`] lists operator definitions in execution order. [`SerialNet`]
//! resolves each one through an [`OpRegistry`](tessera_core::OpRegistry),
//! places it on a device, binds its tensors from a
//! [`Workspace`](tessera_core::Workspace), and drives `init` and `run`.

pub mod error;
pub mod net;

pub use error::{Result, RuntimeError};
pub use net::{NetDef, NetOptions, SerialNet};
