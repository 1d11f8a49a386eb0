//! System-wide constants.

/// Width of one machine instruction in bytes. Every basic instruction
/// encodes to exactly one word of this size.
pub const WORD_BYTES: u32 = 4;

/// Number of general-purpose registers.
pub const GPR_COUNT: usize = 32;

/// Number of COP1 (floating-point) registers.
pub const FPR_COUNT: usize = 32;

/// Number of COP0 (system control) registers.
pub const COP0_COUNT: usize = 32;

/// Index of the register hardwired to zero in the general-purpose file.
pub const REG_ZERO: u8 = 0;

/// Assembler temporary register (`$at`), reserved for pseudo-instruction
/// expansions.
pub const REG_AT: u8 = 1;

/// First syscall result register (`$v0`); also carries the service number.
pub const REG_V0: u8 = 2;

/// First syscall argument register (`$a0`).
pub const REG_A0: u8 = 4;

/// Stack pointer register (`$sp`).
pub const REG_SP: u8 = 29;

/// Return address register (`$ra`).
pub const REG_RA: u8 = 31;
