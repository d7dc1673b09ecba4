//! Shared type definitions for the gyroscope HIL simulation.
//!
//! Types defined here are produced by the tick loop in `hil-core` and
//! consumed by the report writers and the `hil-sim` binary.
//!
//! # Modules
//!
//! - [`enums`] -- Flight computer command labels and run end reasons
//! - [`structs`] -- The recorded [`Sample`] value

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CommandLabel, EndReason};
pub use structs::Sample;
