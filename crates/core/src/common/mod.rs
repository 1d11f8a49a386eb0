//! Common utilities and types used throughout the simulator.
//!
//! This module provides fundamental building blocks that are shared across all
//! components of the simulator. It includes:
//! 1. **Constants:** Memory layout and instruction-width constants.
//! 2. **Error Handling:** Assembly-time and run-time error taxonomies.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types for assembly and execution.
pub mod error;

pub use constants::WORD_BYTES;
pub use error::{AssemblerError, AssemblerErrorKind, ExecutionFault, MemoryError, RuntimeError};
