//! Reset idempotence.
//!
//! `reset()` followed by a re-run must reproduce the first run exactly:
//! registers, memory, and cycle count.

use pretty_assertions::assert_eq;

use crate::common::{assemble_ok, config_for, run_to_end, ALL_ARCHS};
use mipsim_core::Simulation;

const PROGRAM: &str = "\
main: addiu $t0, $zero, 5
      addiu $t1, $zero, 0
loop: beq   $t0, $zero, end
      addu  $t1, $t1, $t0
      addiu $t0, $t0, -1
      j     loop
end:  sw    $t1, 0($zero)
";

#[test]
fn reset_then_rerun_reproduces_the_first_run() {
    for arch in ALL_ARCHS {
        let mut simulation = Simulation::new(assemble_ok(PROGRAM), &config_for(arch));
        match run_to_end(&mut simulation) {
            Ok(_) => {}
            Err(fault) => panic!("first run under {arch:?}: {fault}"),
        }
        let first_regs = simulation.registers();
        let first_mem = simulation
            .memory_window(0, 16)
            .unwrap_or_else(|e| panic!("{e}"));
        let first_cycles = simulation.cycles();

        simulation.reset();
        assert_eq!(simulation.cycles(), 0, "cycle counter under {arch:?}");
        assert_eq!(
            simulation.program_counter(),
            simulation.program().entry,
            "pc after reset under {arch:?}"
        );

        match run_to_end(&mut simulation) {
            Ok(_) => {}
            Err(fault) => panic!("second run under {arch:?}: {fault}"),
        }
        assert_eq!(simulation.registers(), first_regs, "registers under {arch:?}");
        assert_eq!(
            simulation
                .memory_window(0, 16)
                .unwrap_or_else(|e| panic!("{e}")),
            first_mem,
            "memory under {arch:?}"
        );
        assert_eq!(simulation.cycles(), first_cycles, "cycles under {arch:?}");
    }
}

#[test]
fn reset_restores_the_data_image() {
    let source = "\
.data
cell: .word 100
.text
main: la $t0, cell
      lw $t1, 0($t0)
      addiu $t1, $t1, 1
      sw $t1, 0($t0)
";
    let mut simulation = Simulation::new(
        assemble_ok(source),
        &config_for(mipsim_core::config::ArchKind::Pipelined),
    );
    match run_to_end(&mut simulation) {
        Ok(_) => {}
        Err(fault) => panic!("{fault}"),
    }
    let read_cell = |sim: &Simulation| {
        let bytes = sim
            .memory_window(0x1001_0000, 4)
            .unwrap_or_else(|e| panic!("{e}"));
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    };
    assert_eq!(read_cell(&simulation), 101);
    simulation.reset();
    assert_eq!(read_cell(&simulation), 100, "data image reloaded");
}
