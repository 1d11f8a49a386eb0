//! MIPS32 assembler and cycle-stepped simulator library.
//!
//! This crate implements a MIPS32 instruction-set simulator with the following:
//! 1. **ISA:** Operand typing, instruction descriptors, encoding, decoding, and disassembly.
//! 2. **Assembler:** Two-pass translation from source text to 32-bit machine words.
//! 3. **Architecture:** GPR/HI/LO, COP1 (floating point), and COP0 register files.
//! 4. **Memory:** Sparse byte-addressable store with typed alignment/range errors.
//! 5. **Execution:** Four timing models (single-cycle, multi-cycle, pipelined,
//!    multi-ALU pipelined) sharing one four-phase instruction contract with
//!    register locking and value forwarding.

/// Two-pass assembler (lexer, label table, directives, passes).
pub mod asm;
/// Architectural register files (GPR, COP1, COP0) and the unified bank.
pub mod arch;
/// Common types shared throughout the simulator (errors, constants).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Execution engines, hazard management, and the simulation facade.
pub mod exec;
/// Instruction set (operand types, descriptors, encode/decode, disassembly).
pub mod isa;
/// Byte-addressable data memory.
pub mod mem;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Assembler entry point; produces a [`asm::Program`] or a batch of diagnostics.
pub use crate::asm::assemble;
/// Top-level simulation object; construct with `Simulation::new`.
pub use crate::exec::Simulation;
/// The registered MIPS32 instruction set; construct with `InstructionSet::mips32`.
pub use crate::isa::InstructionSet;
