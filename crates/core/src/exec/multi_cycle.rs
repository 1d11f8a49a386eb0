//! Multi-cycle timing model.
//!
//! Phases are spread across cycles — fetch, then one phase per cycle —
//! for a single instruction at a time, with no overlap across
//! instructions. Decode pre-reads operand values into the flight so later
//! phases never re-read possibly-stale registers.

use crate::common::error::ExecutionFault;
use crate::config::ArchKind;
use crate::exec::engine::{fault, fetch, stage, stray_pc_fault, Engine, PipelineSlot, StepOutcome};
use crate::exec::flight::PhaseOutcome;
use crate::exec::state::ExecutionState;
use crate::exec::syscall::SyscallHandler;

/// The multi-cycle engine.
#[derive(Debug, Default)]
pub struct MultiCycle {
    current: Option<PipelineSlot>,
}

impl MultiCycle {
    /// Creates the engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for MultiCycle {
    fn step(
        &mut self,
        state: &mut ExecutionState,
        sys: &mut dyn SyscallHandler,
    ) -> Result<StepOutcome, ExecutionFault> {
        let Some(mut slot) = self.current.take() else {
            // Fetch cycle.
            return match fetch(state, ArchKind::MultiCycle)? {
                Some(slot) => {
                    self.current = Some(slot);
                    Ok(StepOutcome::Running)
                }
                None if state.pc.value == state.program.text_end() => Ok(StepOutcome::Completed),
                None => Err(stray_pc_fault(state)),
            };
        };

        let mut st = stage(state, sys, slot.addr);
        match slot.run_phase(&mut st) {
            Err(e) => return Err(fault(state, slot.addr, slot.descriptor, e)),
            Ok(PhaseOutcome::Stall) => {
                self.current = Some(slot);
                return Ok(StepOutcome::Running);
            }
            Ok(PhaseOutcome::Done) => {}
        }
        match slot.phase.next() {
            Some(next) => {
                slot.phase = next;
                self.current = Some(slot);
            }
            None => {
                // Retired.
                if let Some(code) = state.exited {
                    return Ok(StepOutcome::Exited(code));
                }
            }
        }
        Ok(StepOutcome::Running)
    }

    fn flush(&mut self) {
        self.current = None;
    }
}
