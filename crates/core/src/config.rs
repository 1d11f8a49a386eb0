//! Configuration system for the simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline constants (memory layout, pipeline latencies).
//! 2. **Structures:** Hierarchical config for architecture, memory, and pipeline.
//! 3. **Enums:** Timing-model and branch-resolution policy selection.
//!
//! Configuration is supplied via JSON from the CLI or `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
pub mod defaults {
    /// Base address of the text segment. The first assembled instruction
    /// lands here and execution starts here unless a `main` label says
    /// otherwise.
    pub const TEXT_BASE: u32 = 0x0040_0000;

    /// Base address of the data segment, where `.data` directives emit.
    pub const DATA_BASE: u32 = 0x1001_0000;

    /// Initial stack pointer. The stack grows down from just under the
    /// top of the conventional user segment.
    pub const STACK_TOP: u32 = 0x7FFF_EFFC;

    /// Exclusive ceiling of the simulated address space. Accesses at or
    /// beyond this address raise a memory fault.
    pub const MEMORY_LIMIT: u32 = 0x8000_0000;

    /// Execute-phase latency of floating-point flights, in cycles. Only
    /// the multi-ALU model can hide this latency behind integer work.
    pub const FP_EXECUTE_CYCLES: u32 = 3;
}

/// Micro-architectural timing model to simulate.
///
/// All four models produce bit-identical architectural results for
/// programs without timing-observable side effects; they differ in how
/// instruction phases are scheduled across cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchKind {
    /// All four phases of one instruction per cycle; no overlap, no locks.
    SingleCycle,
    /// One phase per cycle, one instruction in flight at a time.
    MultiCycle,
    /// Up to four instructions in flight, one per phase.
    #[default]
    Pipelined,
    /// Pipelined, with per-functional-unit execute slots so floating-point
    /// latency can overlap integer work.
    MultiAlu,
}

/// When a branch or jump redirects the program counter.
///
/// Both policies yield identical final architectural state; they differ
/// only in cycle count and in which phase issues the PC lock/jump/unlock
/// sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BranchPolicy {
    /// Resolve in the decode phase using forwarded comparison operands.
    #[default]
    OnDecode,
    /// Defer to write-back; simpler, costs extra stall cycles.
    OnWriteBack,
}

/// Memory geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Base address of the text segment.
    pub text_base: u32,
    /// Base address of the data segment.
    pub data_base: u32,
    /// Initial stack pointer value.
    pub stack_top: u32,
    /// Exclusive ceiling of the addressable space.
    pub limit: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            text_base: defaults::TEXT_BASE,
            data_base: defaults::DATA_BASE,
            stack_top: defaults::STACK_TOP,
            limit: defaults::MEMORY_LIMIT,
        }
    }
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Execute-phase latency of floating-point flights, in cycles.
    pub fp_execute_cycles: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fp_execute_cycles: defaults::FP_EXECUTE_CYCLES,
        }
    }
}

/// Root configuration object.
///
/// Passed by reference into `Simulation::new`; multiple simulations with
/// different configurations can coexist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Timing model to simulate.
    pub arch: ArchKind,
    /// Branch resolution policy for the hazard-managed models.
    pub branch: BranchPolicy,
    /// Memory geometry.
    pub memory: MemoryConfig,
    /// Pipeline tuning.
    pub pipeline: PipelineConfig,
}
