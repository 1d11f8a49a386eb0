//! Single-cycle timing model.
//!
//! All four phases run back-to-back within one simulated cycle for one
//! instruction; there is no cross-instruction overlap and the lock/forward
//! interlocks are inert.

use crate::common::error::ExecutionFault;
use crate::config::ArchKind;
use crate::exec::engine::{fault, fetch, stage, stray_pc_fault, Engine, StepOutcome};
use crate::exec::flight::Phase;
use crate::exec::state::ExecutionState;
use crate::exec::syscall::SyscallHandler;

/// The single-cycle engine.
#[derive(Debug, Default)]
pub struct SingleCycle;

impl SingleCycle {
    /// Creates the engine.
    pub fn new() -> Self {
        Self
    }
}

impl Engine for SingleCycle {
    fn step(
        &mut self,
        state: &mut ExecutionState,
        sys: &mut dyn SyscallHandler,
    ) -> Result<StepOutcome, ExecutionFault> {
        let Some(mut slot) = fetch(state, ArchKind::SingleCycle)? else {
            return if state.pc.value == state.program.text_end() {
                Ok(StepOutcome::Completed)
            } else {
                Err(stray_pc_fault(state))
            };
        };
        for phase in [Phase::Decode, Phase::Execute, Phase::Memory, Phase::WriteBack] {
            slot.phase = phase;
            let mut st = stage(state, sys, slot.addr);
            // Interlocks are off, so a phase can never stall here.
            if let Err(e) = slot.run_phase(&mut st) {
                return Err(fault(state, slot.addr, slot.descriptor, e));
            }
        }
        if let Some(code) = state.exited {
            return Ok(StepOutcome::Exited(code));
        }
        Ok(StepOutcome::Running)
    }

    fn flush(&mut self) {}
}
