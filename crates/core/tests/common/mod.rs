//! Shared test infrastructure.
//!
//! Builders for assembling source snippets and running them to completion
//! under any timing model, plus the register indices the tests refer to.

use mipsim_core::asm::{DirectiveSet, Program};
use mipsim_core::common::error::ExecutionFault;
use mipsim_core::config::{ArchKind, BranchPolicy, Config};
use mipsim_core::exec::{RegisterSnapshot, RunOutcome};
use mipsim_core::{assemble, InstructionSet, Simulation};

/// `$at`
pub const AT: usize = 1;
/// `$v0`
pub const V0: usize = 2;
/// `$a0`
pub const A0: usize = 4;
/// `$t0`
pub const T0: usize = 8;
/// `$t1`
pub const T1: usize = 9;
/// `$t2`
pub const T2: usize = 10;
/// `$t3`
pub const T3: usize = 11;
/// `$ra`
pub const RA: usize = 31;

/// Every timing model, for equivalence sweeps.
pub const ALL_ARCHS: [ArchKind; 4] = [
    ArchKind::SingleCycle,
    ArchKind::MultiCycle,
    ArchKind::Pipelined,
    ArchKind::MultiAlu,
];

/// Assembles a snippet against the stock MIPS32 set, panicking on
/// diagnostics.
pub fn assemble_ok(source: &str) -> Program {
    let iset = InstructionSet::mips32();
    let dset = DirectiveSet::mips32();
    let config = Config::default();
    match assemble(source, &iset, &dset, &config.memory) {
        Ok(program) => program,
        Err(errors) => panic!("assembly failed: {errors:?}"),
    }
}

/// Assembles a snippet, returning the diagnostics.
pub fn assemble_err(source: &str) -> Vec<mipsim_core::common::error::AssemblerError> {
    let iset = InstructionSet::mips32();
    let dset = DirectiveSet::mips32();
    let config = Config::default();
    match assemble(source, &iset, &dset, &config.memory) {
        Ok(_) => panic!("assembly unexpectedly succeeded"),
        Err(errors) => errors,
    }
}

/// A config for the given timing model with defaults elsewhere.
pub fn config_for(arch: ArchKind) -> Config {
    Config {
        arch,
        ..Config::default()
    }
}

/// Builds a simulation of `source` under `arch`.
pub fn sim(source: &str, arch: ArchKind) -> Simulation {
    Simulation::new(assemble_ok(source), &config_for(arch))
}

/// Builds a simulation with an explicit branch policy.
pub fn sim_with_policy(source: &str, arch: ArchKind, branch: BranchPolicy) -> Simulation {
    let config = Config {
        arch,
        branch,
        ..Config::default()
    };
    Simulation::new(assemble_ok(source), &config)
}

/// Runs to exit/completion with a generous budget.
pub fn run_to_end(sim: &mut Simulation) -> Result<RunOutcome, ExecutionFault> {
    let outcome = sim.run(1_000_000)?;
    assert_ne!(outcome, RunOutcome::OutOfCycles, "program did not terminate");
    Ok(outcome)
}

/// Runs a snippet to completion under `arch` and returns the final
/// registers.
pub fn final_registers(source: &str, arch: ArchKind) -> RegisterSnapshot {
    let mut simulation = sim(source, arch);
    match run_to_end(&mut simulation) {
        Ok(_) => simulation.registers(),
        Err(fault) => panic!("runtime fault under {arch:?}: {fault}"),
    }
}

/// Reads the little-endian memory word at `addr` after running `source`
/// under `arch`.
pub fn final_memory_word(source: &str, arch: ArchKind, addr: u32) -> u32 {
    let mut simulation = sim(source, arch);
    if let Err(fault) = run_to_end(&mut simulation) {
        panic!("runtime fault under {arch:?}: {fault}");
    }
    let bytes = simulation
        .memory_window(addr, 4)
        .unwrap_or_else(|e| panic!("memory window: {e}"));
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
