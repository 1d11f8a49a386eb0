//! General-purpose register file.
//!
//! This module implements the general-purpose register file. It performs the
//! following:
//! 1. **Storage:** Maintains 32 integer registers (`$0`-`$31`).
//! 2. **Invariant Enforcement:** Register `$0` is hardwired to zero; writes
//!    to it are no-ops, as are lock requests against it.
//! 3. **Hazard State:** One lock flag per register, consumed only by the
//!    multi-cycle and pipelined execution models.

use crate::common::constants::GPR_COUNT;

/// General-purpose register file.
///
/// Register `$0` is hardwired to zero and cannot be modified or locked.
#[derive(Debug, Clone)]
pub struct Gpr {
    regs: [u32; GPR_COUNT],
    locks: [u8; GPR_COUNT],
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpr {
    /// Creates a register file with all registers zeroed and unlocked.
    pub fn new() -> Self {
        Self {
            regs: [0; GPR_COUNT],
            locks: [0; GPR_COUNT],
        }
    }

    /// Reads a register value. Register `$0` always returns 0.
    pub fn read(&self, idx: u8) -> u32 {
        if idx == 0 { 0 } else { self.regs[idx as usize] }
    }

    /// Writes a register value. Writes to `$0` are ignored.
    pub fn write(&mut self, idx: u8, val: u32) {
        if idx != 0 {
            self.regs[idx as usize] = val;
        }
    }

    /// Marks a register as pending a write. Locks nest: each in-flight
    /// writer holds one, so a register stays locked until the youngest
    /// writer commits. No-op for `$0`.
    pub fn lock(&mut self, idx: u8) {
        if idx != 0 {
            self.locks[idx as usize] = self.locks[idx as usize].saturating_add(1);
        }
    }

    /// Releases one pending-write claim.
    pub fn unlock(&mut self, idx: u8) {
        self.locks[idx as usize] = self.locks[idx as usize].saturating_sub(1);
    }

    /// Whether any writer still holds the register.
    pub fn is_locked(&self, idx: u8) -> bool {
        self.locks[idx as usize] > 0
    }

    /// Zeroes every register and clears every lock.
    pub fn reset(&mut self) {
        self.regs = [0; GPR_COUNT];
        self.locks = [0; GPR_COUNT];
    }

    /// Snapshot of all register values.
    pub fn snapshot(&self) -> [u32; GPR_COUNT] {
        self.regs
    }
}
