// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod state;

// Re-export public types for convenient access via `qoracle::core::TypeName`
pub use error::{EmulationError, QubitId};
pub use state::AmplitudeState;
