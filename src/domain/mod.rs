//! Domain layer types and invariants.

pub mod articles;
pub mod entities;
pub mod error;
pub mod types;
