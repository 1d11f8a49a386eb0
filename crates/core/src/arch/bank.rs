//! Unified register bank.
//!
//! This module provides the `RegisterBank` struct, a single interface over
//! the GPR, COP1, and COP0 register files plus the HI/LO accumulators. It
//! provides:
//! 1. **Unified Access:** One read/write/lock surface keyed by [`RegRef`].
//! 2. **Hazard State:** The lock flags consumed by the multi-cycle and
//!    pipelined execution models; the single-cycle model never touches them.
//! 3. **Snapshots:** Read-only state for external observers.

use crate::arch::cop0::Cop0;
use crate::arch::cop1::Cop1;
use crate::arch::gpr::Gpr;
use crate::arch::RegRef;

/// Unified register bank: GPR + HI/LO + COP1 + COP0.
#[derive(Debug, Clone, Default)]
pub struct RegisterBank {
    /// General-purpose register file.
    pub gpr: Gpr,
    /// COP1 floating-point register file.
    pub cop1: Cop1,
    /// COP0 control register file.
    pub cop0: Cop0,
    hi: u32,
    lo: u32,
    hi_lock: u8,
    lo_lock: u8,
}

impl RegisterBank {
    /// Creates a bank with all files zeroed and unlocked.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the register named by `reg`.
    ///
    /// The FP condition flag reads as 0 or 1.
    pub fn read(&self, reg: RegRef) -> u32 {
        match reg {
            RegRef::Gpr(i) => self.gpr.read(i),
            RegRef::Fpr(i) => self.cop1.read(i),
            RegRef::Cop0(i) => self.cop0.read(i),
            RegRef::Hi => self.hi,
            RegRef::Lo => self.lo,
            RegRef::FpCond => u32::from(self.cop1.condition()),
        }
    }

    /// Writes the register named by `reg`. Writes to `$0` are no-ops.
    pub fn write(&mut self, reg: RegRef, val: u32) {
        match reg {
            RegRef::Gpr(i) => self.gpr.write(i, val),
            RegRef::Fpr(i) => self.cop1.write(i, val),
            RegRef::Cop0(i) => self.cop0.write(i, val),
            RegRef::Hi => self.hi = val,
            RegRef::Lo => self.lo = val,
            RegRef::FpCond => self.cop1.set_condition(val != 0),
        }
    }

    /// Marks a register as pending a write.
    pub fn lock(&mut self, reg: RegRef) {
        match reg {
            RegRef::Gpr(i) => self.gpr.lock(i),
            RegRef::Fpr(i) => self.cop1.lock(i),
            RegRef::Cop0(i) => self.cop0.lock(i),
            RegRef::Hi => self.hi_lock = self.hi_lock.saturating_add(1),
            RegRef::Lo => self.lo_lock = self.lo_lock.saturating_add(1),
            RegRef::FpCond => self.cop1.lock_condition(),
        }
    }

    /// Clears a register's pending-write flag.
    pub fn unlock(&mut self, reg: RegRef) {
        match reg {
            RegRef::Gpr(i) => self.gpr.unlock(i),
            RegRef::Fpr(i) => self.cop1.unlock(i),
            RegRef::Cop0(i) => self.cop0.unlock(i),
            RegRef::Hi => self.hi_lock = self.hi_lock.saturating_sub(1),
            RegRef::Lo => self.lo_lock = self.lo_lock.saturating_sub(1),
            RegRef::FpCond => self.cop1.unlock_condition(),
        }
    }

    /// Whether a register has a pending write.
    pub fn is_locked(&self, reg: RegRef) -> bool {
        match reg {
            RegRef::Gpr(i) => self.gpr.is_locked(i),
            RegRef::Fpr(i) => self.cop1.is_locked(i),
            RegRef::Cop0(i) => self.cop0.is_locked(i),
            RegRef::Hi => self.hi_lock > 0,
            RegRef::Lo => self.lo_lock > 0,
            RegRef::FpCond => self.cop1.is_condition_locked(),
        }
    }

    /// Commits a value and clears the lock in one step.
    ///
    /// This is the write-back phase's only legal way to mutate a register.
    pub fn set_and_unlock(&mut self, reg: RegRef, val: u32) {
        self.write(reg, val);
        self.unlock(reg);
    }

    /// Zeroes every file and clears every lock.
    pub fn reset(&mut self) {
        self.gpr.reset();
        self.cop1.reset();
        self.cop0.reset();
        self.hi = 0;
        self.lo = 0;
        self.hi_lock = 0;
        self.lo_lock = 0;
    }

    /// Reads the HI accumulator.
    pub fn hi(&self) -> u32 {
        self.hi
    }

    /// Reads the LO accumulator.
    pub fn lo(&self) -> u32 {
        self.lo
    }
}
