//! Tessera CLI library - shared functionality for testing and binary.

pub mod demo;
pub mod inspect;
