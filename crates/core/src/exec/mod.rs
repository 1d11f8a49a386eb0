//! Execution engines and the simulation facade.
//!
//! This module is the cycle-stepped heart of the simulator:
//! 1. **Flight:** The four-phase instruction contract and hazard
//!    primitives (`requires`, `lock`, `forward`, `set_and_unlock`).
//! 2. **Engines:** The four timing models scheduling those phases —
//!    single-cycle, multi-cycle, pipelined, multi-ALU pipelined.
//! 3. **Simulation:** The external surface — `step`, `run`, `reset`,
//!    read-only snapshots.
//! 4. **Syscall:** The injected environment hook.
//!
//! The simulator is single-threaded and cooperatively cycle-stepped: a
//! `step` call advances exactly one cycle, a stall is a phase doing
//! nothing for a cycle, and the register/memory bank is the only shared
//! mutable resource.

use std::sync::Arc;

use crate::arch::RegisterBank;
use crate::asm::program::Program;
use crate::common::error::{ExecutionFault, MemoryError};
use crate::config::{ArchKind, Config};

/// Engine contract and shared stepping machinery.
pub mod engine;

/// The four-phase flight contract and stage context.
pub mod flight;

/// Flight implementations behind the descriptor table.
pub mod flights;

/// The multi-ALU pipelined engine.
pub mod multi_alu;

/// The multi-cycle engine.
pub mod multi_cycle;

/// The pipelined engine.
pub mod pipeline;

/// The single-cycle engine.
pub mod single_cycle;

/// Mutable execution state.
pub mod state;

/// Syscall hook.
pub mod syscall;

pub use engine::{Engine, StepOutcome};
pub use flight::{ExecUnit, Flight, ForwardFile, Phase, PhaseOutcome, Stage};
pub use syscall::{ExitOnlySyscalls, SyscallHandler, SyscallOutcome, SyscallRequest};

use state::ExecutionState;

/// How a bounded `run` ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A syscall exited with this code.
    Exited(i32),
    /// Execution fell off the end of the text segment.
    Completed,
    /// The cycle budget ran out first.
    OutOfCycles,
}

/// Read-only register state for external observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterSnapshot {
    /// General-purpose registers.
    pub gpr: [u32; 32],
    /// HI accumulator.
    pub hi: u32,
    /// LO accumulator.
    pub lo: u32,
    /// COP1 registers.
    pub fpr: [u32; 32],
    /// Program counter.
    pub pc: u32,
}

/// A loaded program plus one architecture's cycle-stepped engine.
///
/// Lifecycle: created from an assembled [`Program`], stepped or run,
/// and reset at will. A run-time fault halts the stepping loop but the
/// simulation stays valid for `reset`.
pub struct Simulation {
    state: ExecutionState,
    engine: Box<dyn Engine>,
    handler: Box<dyn syscall::SyscallHandler>,
    cycles: u64,
    finished: Option<StepOutcome>,
    faulted: Option<ExecutionFault>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("cycles", &self.cycles)
            .field("pc", &self.state.pc.value)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation with the minimal exit-only syscall handler.
    pub fn new(program: Program, config: &Config) -> Self {
        Self::with_syscalls(program, config, Box::new(syscall::ExitOnlySyscalls))
    }

    /// Creates a simulation with an injected environment hook.
    pub fn with_syscalls(
        program: Program,
        config: &Config,
        handler: Box<dyn syscall::SyscallHandler>,
    ) -> Self {
        let engine: Box<dyn Engine> = match config.arch {
            ArchKind::SingleCycle => Box::new(single_cycle::SingleCycle::new()),
            ArchKind::MultiCycle => Box::new(multi_cycle::MultiCycle::new()),
            ArchKind::Pipelined => Box::new(pipeline::Pipelined::new()),
            ArchKind::MultiAlu => Box::new(multi_alu::MultiAlu::new(
                config.pipeline.fp_execute_cycles,
            )),
        };
        let state = ExecutionState::new(Arc::new(program), config);
        tracing::info!(
            arch = ?config.arch,
            words = state.program.text.len(),
            entry = format_args!("{:#010x}", state.program.entry),
            "program loaded"
        );
        Self {
            state,
            engine,
            handler,
            cycles: 0,
            finished: None,
            faulted: None,
        }
    }

    /// Advances the simulation by exactly one cycle.
    ///
    /// After completion, exit, or a fault, further calls repeat the final
    /// outcome without advancing anything.
    ///
    /// # Errors
    ///
    /// The fault that halted this run, annotated with the faulting
    /// instruction's address and mnemonic.
    pub fn step(&mut self) -> Result<StepOutcome, ExecutionFault> {
        if let Some(fault) = &self.faulted {
            return Err(fault.clone());
        }
        if let Some(done) = self.finished {
            return Ok(done);
        }
        self.cycles += 1;
        match self.engine.step(&mut self.state, self.handler.as_mut()) {
            Ok(StepOutcome::Running) => Ok(StepOutcome::Running),
            Ok(done) => {
                self.finished = Some(done);
                Ok(done)
            }
            Err(fault) => {
                self.engine.flush();
                self.faulted = Some(fault.clone());
                Err(fault)
            }
        }
    }

    /// Steps until exit, completion, a fault, or the cycle budget runs
    /// out.
    ///
    /// # Errors
    ///
    /// The first run-time fault, as for [`Simulation::step`].
    pub fn run(&mut self, max_cycles: u64) -> Result<RunOutcome, ExecutionFault> {
        for _ in 0..max_cycles {
            match self.step()? {
                StepOutcome::Running => {}
                StepOutcome::Exited(code) => return Ok(RunOutcome::Exited(code)),
                StepOutcome::Completed => return Ok(RunOutcome::Completed),
            }
        }
        Ok(RunOutcome::OutOfCycles)
    }

    /// Discards all in-flight state and restores the freshly-loaded
    /// image: registers zeroed, memory reloaded, PC at the entry point.
    pub fn reset(&mut self) {
        self.state.reset();
        self.engine.flush();
        self.cycles = 0;
        self.finished = None;
        self.faulted = None;
    }

    /// Read-only register snapshot.
    pub fn registers(&self) -> RegisterSnapshot {
        RegisterSnapshot {
            gpr: self.state.bank.gpr.snapshot(),
            hi: self.state.bank.hi(),
            lo: self.state.bank.lo(),
            fpr: self.state.bank.cop1.snapshot(),
            pc: self.state.pc.value,
        }
    }

    /// Direct access to the register bank, for observers that need COP0
    /// or lock state.
    pub fn bank(&self) -> &RegisterBank {
        &self.state.bank
    }

    /// A window of data memory. Unmapped bytes in range read as zero.
    ///
    /// # Errors
    ///
    /// [`MemoryError::OutOfRange`] if the window extends past the
    /// configured ceiling.
    pub fn memory_window(&self, start: u32, len: u32) -> Result<Vec<u8>, MemoryError> {
        self.state.mem.window(start, len)
    }

    /// The current program counter.
    pub fn program_counter(&self) -> u32 {
        self.state.pc.value
    }

    /// Cycles stepped since load or the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The loaded program.
    pub fn program(&self) -> &Arc<Program> {
        &self.state.program
    }
}
