//! Pipelined timing model.
//!
//! Up to four instructions are in flight simultaneously, one per phase.
//! Each cycle advances every in-flight instruction one phase when its
//! successor phase is free; a phase whose `requires` cannot be satisfied
//! stalls — it does nothing this cycle and is retried next cycle.
//!
//! Slots are processed oldest first, so within one cycle the phases run
//! write-back → memory → execute → decode. An earlier-phase instruction
//! therefore never observes a later-phase instruction's uncommitted write
//! except through the explicit forward buffer, which the older
//! instruction has already refreshed by the time the younger one reads.

use crate::common::error::ExecutionFault;
use crate::config::ArchKind;
use crate::exec::engine::{fault, fetch, stage, stray_pc_fault, Engine, PipelineSlot, StepOutcome};
use crate::exec::flight::{Phase, PhaseOutcome};
use crate::exec::state::ExecutionState;
use crate::exec::syscall::SyscallHandler;

/// Maximum instructions in flight: one per phase.
const DEPTH: usize = 4;

/// The pipelined engine.
#[derive(Debug, Default)]
pub struct Pipelined {
    /// In-flight slots, oldest first.
    slots: Vec<PipelineSlot>,
}

impl Pipelined {
    /// Creates the engine.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Engine for Pipelined {
    fn step(
        &mut self,
        state: &mut ExecutionState,
        sys: &mut dyn SyscallHandler,
    ) -> Result<StepOutcome, ExecutionFault> {
        let mut kept: Vec<PipelineSlot> = Vec::with_capacity(DEPTH);
        let mut taken: Vec<Phase> = Vec::with_capacity(DEPTH);

        for mut slot in self.slots.drain(..) {
            if !slot.completed {
                let mut st = stage(state, sys, slot.addr);
                match slot.run_phase(&mut st) {
                    Ok(PhaseOutcome::Done) => slot.completed = true,
                    Ok(PhaseOutcome::Stall) => {}
                    Err(e) => return Err(fault(state, slot.addr, slot.descriptor, e)),
                }
            }
            if slot.completed {
                match slot.phase.next() {
                    // Write-back finished: the slot retires.
                    None => continue,
                    Some(next) => {
                        if !taken.contains(&next) {
                            slot.phase = next;
                            slot.completed = false;
                        }
                    }
                }
            }
            taken.push(slot.phase);
            kept.push(slot);
        }
        self.slots = kept;

        if let Some(code) = state.exited {
            self.slots.clear();
            return Ok(StepOutcome::Exited(code));
        }

        let decode_free = !self.slots.iter().any(|s| s.phase == Phase::Decode);
        if self.slots.len() < DEPTH && decode_free {
            match fetch(state, ArchKind::Pipelined)? {
                Some(slot) => self.slots.push(slot),
                None if self.slots.is_empty() && !state.pc.locked => {
                    return if state.pc.value == state.program.text_end() {
                        Ok(StepOutcome::Completed)
                    } else {
                        Err(stray_pc_fault(state))
                    };
                }
                None => {}
            }
        }
        Ok(StepOutcome::Running)
    }

    fn flush(&mut self) {
        self.slots.clear();
    }
}
