//! The four-phase instruction contract and its stage context.
//!
//! Every architecture pulls instructions through the same four phases —
//! decode, execute, memory, write-back — and differs only in how phases
//! are scheduled across cycles. This module defines:
//! 1. **Flight:** One in-flight instruction's phase logic.
//! 2. **Stage:** The context a phase runs against, exposing the hazard
//!    primitives (`requires`, `lock`, `forward`, `set_and_unlock`), memory,
//!    and PC control.
//! 3. **ForwardFile:** The pending-value buffer behind `forward`.
//!
//! Discipline: a phase gathers all its `requires` before taking any lock,
//! so a stalled phase leaves no state behind and can be retried next cycle.

use std::collections::HashMap;

use tracing::trace;

use crate::arch::{RegRef, RegisterBank};
use crate::common::error::RuntimeError;
use crate::config::BranchPolicy;
use crate::exec::syscall::{SyscallHandler, SyscallOutcome, SyscallRequest};
use crate::mem::Memory;

/// Pipeline phases, in program order for one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Operand gathering and destination locking.
    Decode,
    /// Computation; results become forwardable here.
    Execute,
    /// Data memory access.
    Memory,
    /// Commit via `set_and_unlock`; the only phase that mutates registers.
    WriteBack,
}

impl Phase {
    /// The phase after this one, or `None` after write-back.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Decode => Some(Self::Execute),
            Self::Execute => Some(Self::Memory),
            Self::Memory => Some(Self::WriteBack),
            Self::WriteBack => None,
        }
    }
}

/// Outcome of running one phase for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// The phase finished; the flight may advance.
    Done,
    /// The phase declined to advance (a required register is locked);
    /// retry next cycle.
    Stall,
}

/// Functional unit classes for the multi-ALU model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecUnit {
    /// Integer ALU (default).
    Integer,
    /// Floating-point ALU; carries a configurable execute latency.
    Float,
}

/// One in-flight instruction's phase logic.
///
/// Constructed per fetch by the winning descriptor's strategy constructor
/// for the active architecture. State accumulated in earlier phases
/// (operand values, results) lives in the implementing struct, not in the
/// engine.
pub trait Flight {
    /// Gathers operand values and locks destinations.
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError>;

    /// Computes; publishes results through `forward`.
    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError>;

    /// Accesses data memory. Default: nothing to do.
    fn memory(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let _ = st;
        Ok(PhaseOutcome::Done)
    }

    /// Commits results via `set_and_unlock`. Default: nothing to commit.
    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let _ = st;
        Ok(PhaseOutcome::Done)
    }

    /// Which functional unit the execute phase occupies.
    fn unit(&self) -> ExecUnit {
        ExecUnit::Integer
    }
}

/// Pending-value buffer: computed-but-not-yet-committed register values.
///
/// Values are published by `forward` in the execute or memory phase and
/// removed when the owning instruction commits.
#[derive(Debug, Clone, Default)]
pub struct ForwardFile {
    values: HashMap<RegRef, u32>,
}

impl ForwardFile {
    /// Publishes a value for a register.
    pub fn publish(&mut self, reg: RegRef, val: u32) {
        let _ = self.values.insert(reg, val);
    }

    /// Latest published value for a register, if any.
    pub fn get(&self, reg: RegRef) -> Option<u32> {
        self.values.get(&reg).copied()
    }

    /// Removes a register's pending value (on commit).
    pub fn retire(&mut self, reg: RegRef) {
        let _ = self.values.remove(&reg);
    }

    /// Clears all pending values.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// The program counter with its hazard lock.
#[derive(Debug, Clone, Copy)]
pub struct PcUnit {
    /// Next fetch address.
    pub value: u32,
    /// While set, the fetch side must not consume `value`.
    pub locked: bool,
}

/// The context one phase of one flight runs against.
///
/// Borrows the execution state for exactly one phase-step; flights never
/// hold references across cycles.
pub struct Stage<'a> {
    bank: &'a mut RegisterBank,
    fwd: &'a mut ForwardFile,
    mem: &'a mut Memory,
    pc: &'a mut PcUnit,
    syscalls: &'a mut dyn SyscallHandler,
    exit: &'a mut Option<i32>,
    /// Whether lock/forward interlocks are active (off for single-cycle).
    interlock: bool,
    /// Address of the instruction this flight was fetched from.
    addr: u32,
    policy: BranchPolicy,
}

impl std::fmt::Debug for Stage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("addr", &self.addr)
            .field("interlock", &self.interlock)
            .finish_non_exhaustive()
    }
}

impl<'a> Stage<'a> {
    /// Builds a stage context for one phase-step.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        bank: &'a mut RegisterBank,
        fwd: &'a mut ForwardFile,
        mem: &'a mut Memory,
        pc: &'a mut PcUnit,
        syscalls: &'a mut dyn SyscallHandler,
        exit: &'a mut Option<i32>,
        interlock: bool,
        addr: u32,
        policy: BranchPolicy,
    ) -> Self {
        Self {
            bank,
            fwd,
            mem,
            pc,
            syscalls,
            exit,
            interlock,
            addr,
            policy,
        }
    }

    /// Address of the instruction this flight belongs to.
    pub fn addr(&self) -> u32 {
        self.addr
    }

    /// The value a link register receives: the sequential successor.
    pub fn link_value(&self) -> u32 {
        self.addr.wrapping_add(4)
    }

    /// Active branch resolution policy.
    pub fn branch_policy(&self) -> BranchPolicy {
        self.policy
    }

    /// Declares a read dependency on a register.
    ///
    /// With `exact`, the read blocks until any lock on the register clears
    /// (the value must be architectural). Without it, a forwarded value
    /// satisfies the read. `None` means the caller must stall this cycle.
    pub fn requires(&self, reg: RegRef, exact: bool) -> Option<u32> {
        if !self.interlock || !self.bank.is_locked(reg) {
            return Some(self.bank.read(reg));
        }
        if exact {
            trace!(?reg, "stall: exact read of locked register");
            return None;
        }
        let fwd = self.fwd.get(reg);
        if fwd.is_none() {
            trace!(?reg, "stall: locked, no forwarded value yet");
        }
        fwd
    }

    /// Declares a read dependency on a double-precision register pair.
    pub fn requires_double(&self, even: u8, exact: bool) -> Option<u64> {
        let lo = self.requires(RegRef::Fpr(even), exact)?;
        let hi = self.requires(RegRef::Fpr(even.wrapping_add(1)), exact)?;
        Some((u64::from(hi) << 32) | u64::from(lo))
    }

    /// Marks a register as pending a write.
    pub fn lock(&mut self, reg: RegRef) {
        if self.interlock {
            self.bank.lock(reg);
        }
    }

    /// Publishes a computed-but-uncommitted value for later flights.
    pub fn forward(&mut self, reg: RegRef, val: u32) {
        if self.interlock {
            self.fwd.publish(reg, val);
        }
    }

    /// Commits a value and releases the lock; the write-back phase's only
    /// legal register mutation.
    pub fn set_and_unlock(&mut self, reg: RegRef, val: u32) {
        self.bank.write(reg, val);
        if self.interlock {
            self.bank.unlock(reg);
            self.fwd.retire(reg);
        }
    }

    /// Takes the PC lock; fetch stalls until [`Stage::release_pc`].
    pub fn hold_pc(&mut self) {
        self.pc.locked = true;
    }

    /// Releases the PC lock.
    pub fn release_pc(&mut self) {
        self.pc.locked = false;
    }

    /// Redirects the fetch side to `target`.
    pub fn jump(&mut self, target: u32) {
        trace!(target = format_args!("{target:#010x}"), "pc redirect");
        self.pc.value = target;
    }

    /// Loads a word from data memory.
    ///
    /// # Errors
    ///
    /// Propagates [`RuntimeError::Memory`] faults.
    pub fn load_word(&self, addr: u32) -> Result<u32, RuntimeError> {
        Ok(self.mem.load_word(addr)?)
    }

    /// Loads a half-word from data memory.
    ///
    /// # Errors
    ///
    /// Propagates [`RuntimeError::Memory`] faults.
    pub fn load_half(&self, addr: u32) -> Result<u16, RuntimeError> {
        Ok(self.mem.load_half(addr)?)
    }

    /// Loads a byte from data memory.
    ///
    /// # Errors
    ///
    /// Propagates [`RuntimeError::Memory`] faults.
    pub fn load_byte(&self, addr: u32) -> Result<u8, RuntimeError> {
        Ok(self.mem.load_byte(addr)?)
    }

    /// Stores a word to data memory.
    ///
    /// # Errors
    ///
    /// Propagates [`RuntimeError::Memory`] faults.
    pub fn store_word(&mut self, addr: u32, val: u32) -> Result<(), RuntimeError> {
        Ok(self.mem.store_word(addr, val)?)
    }

    /// Stores a half-word to data memory.
    ///
    /// # Errors
    ///
    /// Propagates [`RuntimeError::Memory`] faults.
    pub fn store_half(&mut self, addr: u32, val: u16) -> Result<(), RuntimeError> {
        Ok(self.mem.store_half(addr, val)?)
    }

    /// Stores a byte to data memory.
    ///
    /// # Errors
    ///
    /// Propagates [`RuntimeError::Memory`] faults.
    pub fn store_byte(&mut self, addr: u32, val: u8) -> Result<(), RuntimeError> {
        Ok(self.mem.store_byte(addr, val)?)
    }

    /// Dispatches a syscall to the injected handler.
    ///
    /// # Errors
    ///
    /// Propagates handler failures as [`RuntimeError::Syscall`].
    pub fn syscall(&mut self, req: &SyscallRequest) -> Result<SyscallOutcome, RuntimeError> {
        let outcome = self.syscalls.handle(req, self.mem)?;
        if let Some(code) = outcome.exit {
            *self.exit = Some(code);
        }
        Ok(outcome)
    }
}
