//! Mutable per-simulation execution state.
//!
//! Created when a program is loaded, mutated every simulated cycle, and
//! rebuilt on reset. The engines own the in-flight pipeline slots; this
//! struct owns everything architectural.

use std::sync::Arc;

use crate::arch::RegisterBank;
use crate::asm::program::Program;
use crate::common::constants::REG_SP;
use crate::config::{ArchKind, BranchPolicy, Config};
use crate::exec::flight::{ForwardFile, PcUnit};
use crate::mem::Memory;

/// Architectural state plus the hazard bookkeeping shared by all engines.
#[derive(Debug)]
pub struct ExecutionState {
    /// Program counter with its hazard lock.
    pub pc: PcUnit,
    /// The register bank.
    pub bank: RegisterBank,
    /// Data memory.
    pub mem: Memory,
    /// Pending forwarded values.
    pub fwd: ForwardFile,
    /// Exit request latched by a syscall.
    pub exited: Option<i32>,
    /// The loaded program.
    pub program: Arc<Program>,
    /// Whether lock/forward interlocks are active (everything but
    /// single-cycle).
    pub interlock: bool,
    /// Branch resolution policy.
    pub policy: BranchPolicy,
    /// Stack pointer initial value, reapplied on reset.
    stack_top: u32,
    /// Memory ceiling, reapplied on reset.
    mem_limit: u32,
}

impl ExecutionState {
    /// Builds fresh state for a loaded program.
    pub fn new(program: Arc<Program>, config: &Config) -> Self {
        let mut state = Self {
            pc: PcUnit {
                value: program.entry,
                locked: false,
            },
            bank: RegisterBank::new(),
            mem: Memory::new(config.memory.limit),
            fwd: ForwardFile::default(),
            exited: None,
            program,
            interlock: config.arch != ArchKind::SingleCycle,
            policy: config.branch,
            stack_top: config.memory.stack_top,
            mem_limit: config.memory.limit,
        };
        state.load_image();
        state
    }

    /// Discards all architectural state and reloads the program image.
    pub fn reset(&mut self) {
        self.bank.reset();
        self.mem.reset();
        self.fwd.clear();
        self.exited = None;
        self.pc = PcUnit {
            value: self.program.entry,
            locked: false,
        };
        self.load_image();
    }

    fn load_image(&mut self) {
        self.bank
            .gpr
            .write(REG_SP, self.stack_top);
        let blocks: Vec<_> = self.program.data.clone();
        for block in blocks {
            // The assembler laid these addresses out below the ceiling;
            // a failure here would be a config/program size mismatch.
            if self.mem.store_block(block.addr, &block.bytes).is_err() {
                tracing::warn!(
                    addr = format_args!("{:#010x}", block.addr),
                    limit = format_args!("{:#010x}", self.mem_limit),
                    "data block does not fit in configured memory"
                );
            }
        }
    }
}
