//! SpecialSits Store - Storage ports and adapters
//!
//! This crate defines the vector and document storage ports and provides the
//! in-memory adapters used for per-run indices.

pub mod memory;
pub mod ports;
