//! Multi-ALU pipelined timing model.
//!
//! Like the pipelined model, but the execute phase has one slot per
//! functional unit, so a long-latency floating-point operation can
//! overlap integer work instead of stalling it. Program order is still
//! preserved at the memory and write-back phases: a younger instruction
//! may share the execute phase but never passes an older one out of it.

use crate::common::error::ExecutionFault;
use crate::config::ArchKind;
use crate::exec::engine::{fault, fetch, stage, stray_pc_fault, Engine, PipelineSlot, StepOutcome};
use crate::exec::flight::{ExecUnit, Phase, PhaseOutcome};
use crate::exec::state::ExecutionState;
use crate::exec::syscall::SyscallHandler;

/// The multi-ALU engine.
#[derive(Debug)]
pub struct MultiAlu {
    slots: Vec<PipelineSlot>,
    fp_latency: u32,
}

impl MultiAlu {
    /// Creates the engine with the configured floating-point execute
    /// latency.
    pub fn new(fp_latency: u32) -> Self {
        Self {
            slots: Vec::new(),
            fp_latency: fp_latency.max(1),
        }
    }
}

impl Engine for MultiAlu {
    fn step(
        &mut self,
        state: &mut ExecutionState,
        sys: &mut dyn SyscallHandler,
    ) -> Result<StepOutcome, ExecutionFault> {
        let mut kept: Vec<PipelineSlot> = Vec::with_capacity(self.slots.len() + 1);
        let mut taken_decode = false;
        let mut taken_memory = false;
        let mut taken_wb = false;
        let mut exec_units: Vec<ExecUnit> = Vec::new();
        let mut older_in_execute = false;

        for mut slot in self.slots.drain(..) {
            if !slot.completed {
                let mut st = stage(state, sys, slot.addr);
                match slot.run_phase(&mut st) {
                    Ok(PhaseOutcome::Done) => slot.completed = true,
                    Ok(PhaseOutcome::Stall) => {}
                    Err(e) => return Err(fault(state, slot.addr, slot.descriptor, e)),
                }
            }

            // Burn off residual execute latency before advancing.
            let mut latency_hold = false;
            if slot.completed && slot.phase == Phase::Execute && slot.exec_wait > 0 {
                slot.exec_wait -= 1;
                latency_hold = true;
            }

            if slot.completed && !latency_hold {
                match slot.phase {
                    Phase::WriteBack => continue,
                    Phase::Decode => {
                        let unit = slot.flight.unit();
                        if !exec_units.contains(&unit) {
                            slot.phase = Phase::Execute;
                            slot.completed = false;
                            slot.exec_wait = match unit {
                                ExecUnit::Float => self.fp_latency - 1,
                                ExecUnit::Integer => 0,
                            };
                        }
                    }
                    Phase::Execute => {
                        if !older_in_execute && !taken_memory {
                            slot.phase = Phase::Memory;
                            slot.completed = false;
                        }
                    }
                    Phase::Memory => {
                        if !taken_wb {
                            slot.phase = Phase::WriteBack;
                            slot.completed = false;
                        }
                    }
                }
            }

            match slot.phase {
                Phase::Decode => taken_decode = true,
                Phase::Execute => {
                    older_in_execute = true;
                    exec_units.push(slot.flight.unit());
                }
                Phase::Memory => taken_memory = true,
                Phase::WriteBack => taken_wb = true,
            }
            kept.push(slot);
        }
        self.slots = kept;

        if let Some(code) = state.exited {
            self.slots.clear();
            return Ok(StepOutcome::Exited(code));
        }

        if !taken_decode {
            match fetch(state, ArchKind::MultiAlu)? {
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
