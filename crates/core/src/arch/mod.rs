//! Architectural register state.
//!
//! This module implements the three register files of the simulated CPU and
//! a unified bank over them. It includes:
//! 1. **GPR:** 32 general-purpose registers with `$zero` hardwired.
//! 2. **COP1:** 32 floating-point registers with the even-register
//!    constraint for double precision, plus the FP condition flag.
//! 3. **COP0:** System control registers (status, cause, EPC, badvaddr).
//! 4. **Bank:** A single interface keyed by [`RegRef`], carrying the lock
//!    flags consumed by the hazard-managed execution models.

/// COP0 system control register file.
pub mod cop0;

/// COP1 floating-point register file.
pub mod cop1;

/// General-purpose register file.
pub mod gpr;

/// Unified register bank.
pub mod bank;

pub use bank::RegisterBank;
pub use cop0::Cop0;
pub use cop1::Cop1;
pub use gpr::Gpr;

/// Names one register in any of the CPU's register files.
///
/// The hazard primitives (`lock`, `forward`, `requires`, `set_and_unlock`)
/// are uniform across files; this is the key they operate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegRef {
    /// General-purpose register by index.
    Gpr(u8),
    /// COP1 floating-point register by index.
    Fpr(u8),
    /// COP0 control register by index.
    Cop0(u8),
    /// The HI multiply/divide accumulator.
    Hi,
    /// The LO multiply/divide accumulator.
    Lo,
    /// The COP1 condition flag set by FP compares.
    FpCond,
}
