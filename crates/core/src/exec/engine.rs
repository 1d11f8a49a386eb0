//! Engine contract and shared stepping machinery.
//!
//! Every timing model implements [`Engine`]: a `step` that advances
//! exactly one cycle. The shared pieces here are the explicit
//! [`PipelineSlot`] (one value per in-flight instruction, tagged by its
//! current phase — no hidden per-stage object fields), stage-context
//! construction, fetch, and fault wrapping.

use tracing::trace;

use crate::arch::cop0;
use crate::common::error::{ExecutionFault, MemoryError, RuntimeError};
use crate::exec::flight::{Flight, Phase, PhaseOutcome, Stage};
use crate::exec::state::ExecutionState;
use crate::exec::syscall::SyscallHandler;

/// How one cycle left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More cycles to go.
    Running,
    /// A syscall requested exit with this code.
    Exited(i32),
    /// Execution fell off the end of the text segment and the pipeline
    /// drained.
    Completed,
}

/// A per-architecture cycle-stepped state machine.
pub trait Engine {
    /// Advances the simulation by exactly one cycle.
    ///
    /// # Errors
    ///
    /// A run-time fault annotated with the faulting instruction. The
    /// stepping loop is halted for this run; the state stays valid for
    /// `reset`.
    fn step(
        &mut self,
        state: &mut ExecutionState,
        sys: &mut dyn SyscallHandler,
    ) -> Result<StepOutcome, ExecutionFault>;

    /// Discards all in-flight slots.
    fn flush(&mut self);
}

/// One instruction in flight, tagged by its current phase.
pub struct PipelineSlot {
    /// The phase logic.
    pub flight: Box<dyn Flight>,
    /// Current phase.
    pub phase: Phase,
    /// Whether the current phase has finished and the slot is waiting to
    /// advance into the next one.
    pub completed: bool,
    /// Instruction address, for diagnostics and link values.
    pub addr: u32,
    /// Descriptor table index, for fault mnemonics.
    pub descriptor: usize,
    /// Remaining execute-phase latency (multi-ALU model).
    pub exec_wait: u32,
}

impl std::fmt::Debug for PipelineSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineSlot")
            .field("phase", &self.phase)
            .field("completed", &self.completed)
            .field("addr", &self.addr)
            .finish_non_exhaustive()
    }
}

impl PipelineSlot {
    /// Runs the slot's current phase once.
    ///
    /// # Errors
    ///
    /// The raw run-time fault from the phase.
    pub fn run_phase(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        trace!(addr = format_args!("{:#010x}", self.addr), phase = ?self.phase, "phase step");
        match self.phase {
            Phase::Decode => self.flight.decode(st),
            Phase::Execute => self.flight.execute(st),
            Phase::Memory => self.flight.memory(st),
            Phase::WriteBack => self.flight.write_back(st),
        }
    }
}

/// Builds the stage context for one phase-step of the instruction at
/// `addr`.
pub fn stage<'a>(
    state: &'a mut ExecutionState,
    sys: &'a mut dyn SyscallHandler,
    addr: u32,
) -> Stage<'a> {
    let interlock = state.interlock;
    let policy = state.policy;
    Stage::new(
        &mut state.bank,
        &mut state.fwd,
        &mut state.mem,
        &mut state.pc,
        sys,
        &mut state.exited,
        interlock,
        addr,
        policy,
    )
}

/// Fetches the instruction at the current PC into a fresh slot and
/// advances the PC past it.
///
/// Returns `Ok(None)` when the PC is outside the text segment (end of
/// program, or a pending redirect).
///
/// # Errors
///
/// `ReservedInstruction` when the active architecture has no execution
/// strategy for the fetched word.
pub fn fetch(state: &mut ExecutionState, arch: crate::config::ArchKind)
    -> Result<Option<PipelineSlot>, ExecutionFault>
{
    if state.pc.locked {
        return Ok(None);
    }
    let Some(instr) = state.program.at(state.pc.value) else {
        return Ok(None);
    };
    let (addr, desc_id, word) = (instr.addr, instr.descriptor, instr.word);
    let ctor = match state.program.iset.descriptor(desc_id).execution.get(arch) {
        Some(ctor) => std::sync::Arc::clone(ctor),
        None => {
            return Err(fault(
                state,
                addr,
                desc_id,
                RuntimeError::ReservedInstruction { word },
            ));
        }
    };
    let flight = ctor(word);
    trace!(addr = format_args!("{addr:#010x}"), "fetch");
    let slot = PipelineSlot {
        flight,
        phase: Phase::Decode,
        completed: false,
        addr,
        descriptor: desc_id,
        exec_wait: 0,
    };
    state.pc.value = state.pc.value.wrapping_add(4);
    Ok(Some(slot))
}

/// Wraps a raw fault with the faulting instruction's address and
/// mnemonic, and records the exception in COP0 before the halt.
pub fn fault(
    state: &mut ExecutionState,
    addr: u32,
    descriptor: usize,
    kind: RuntimeError,
) -> ExecutionFault {
    state.bank.cop0.record_exception(exception_code(&kind), addr);
    if let RuntimeError::Memory(
        MemoryError::OutOfRange { addr: bad, .. } | MemoryError::Misaligned { addr: bad, .. },
    ) = &kind
    {
        state.bank.cop0.write(cop0::BADVADDR, *bad);
    }
    ExecutionFault {
        addr,
        mnemonic: state.program.iset.descriptor(descriptor).mnemonic.to_owned(),
        kind,
    }
}

/// The fault raised when the PC leaves the text segment through anything
/// other than normal completion.
pub fn stray_pc_fault(state: &mut ExecutionState) -> ExecutionFault {
    let pc = state.pc.value;
    state
        .bank
        .cop0
        .record_exception(cop0::EXC_ADDR_LOAD, pc);
    ExecutionFault {
        addr: pc,
        mnemonic: "<fetch>".to_owned(),
        kind: RuntimeError::PcOutOfText(pc),
    }
}

fn exception_code(kind: &RuntimeError) -> u32 {
    match kind {
        RuntimeError::ArithmeticOverflow => cop0::EXC_OVERFLOW,
        RuntimeError::TrapException | RuntimeError::Break(_) => cop0::EXC_TRAP,
        RuntimeError::ReservedInstruction { .. } | RuntimeError::EvenRegisterViolation(_) => {
            cop0::EXC_RESERVED
        }
        RuntimeError::Memory(MemoryError::OutOfRange { .. } | MemoryError::Misaligned { .. })
        | RuntimeError::PcOutOfText(_) => cop0::EXC_ADDR_LOAD,
        RuntimeError::Syscall(_) => cop0::EXC_TRAP,
    }
}
