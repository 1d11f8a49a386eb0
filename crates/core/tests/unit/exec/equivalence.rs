//! Architectural equivalence across timing models.
//!
//! For programs without timing-observable side effects, every model must
//! produce bit-identical final register and memory state; only cycle
//! counts may differ.

use pretty_assertions::assert_eq;

use crate::common::{
    assemble_ok, config_for, final_memory_word, final_registers, run_to_end, ALL_ARCHS, T0, T1,
};
use mipsim_core::config::ArchKind;
use mipsim_core::exec::RunOutcome;
use mipsim_core::Simulation;

/// The reference countdown-sum scenario: 5+4+3+2+1 into memory word 0.
const SUM_LOOP: &str = "\
main: addiu $t0, $zero, 5
      addiu $t1, $zero, 0
loop: beq   $t0, $zero, end
      addu  $t1, $t1, $t0
      addiu $t0, $t0, -1
      j     loop
end:  sw    $t1, 0($zero)
";

#[test]
fn reference_scenario_assembles_to_seven_words() {
    let program = assemble_ok(SUM_LOOP);
    assert_eq!(program.text.len(), 7);
}

#[test]
fn reference_scenario_sums_to_fifteen_under_every_model() {
    for arch in ALL_ARCHS {
        assert_eq!(
            final_memory_word(SUM_LOOP, arch, 0),
            15,
            "memory word under {arch:?}"
        );
        let regs = final_registers(SUM_LOOP, arch);
        assert_eq!(regs.gpr[T0], 0, "$t0 under {arch:?}");
        assert_eq!(regs.gpr[T1], 15, "$t1 under {arch:?}");
    }
}

#[test]
fn all_models_agree_on_a_mixed_program() {
    let source = "\
main: li   $t0, 0x00012345
      li   $t1, 3
      mult $t0, $t1
      mflo $t2
      sw   $t2, 0($zero)
      lw   $t3, 0($zero)
      sltu $t0, $zero, $t3
      jal  bump
      j    done
bump: addiu $t1, $t1, 40
      jr   $ra
done: sw   $t1, 4($zero)
";
    let reference = final_registers(source, ArchKind::SingleCycle);
    for arch in ALL_ARCHS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr, reference.gpr, "GPR state under {arch:?}");
        assert_eq!(regs.hi, reference.hi, "HI under {arch:?}");
        assert_eq!(regs.lo, reference.lo, "LO under {arch:?}");
        assert_eq!(
            final_memory_word(source, arch, 4),
            43,
            "memory under {arch:?}"
        );
    }
}

#[test]
fn models_differ_in_cycle_count_not_state() {
    let source = "\
main: addiu $t0, $zero, 1
      addiu $t1, $zero, 2
      addu  $t2, $t0, $t1
      addu  $t3, $t2, $t2
";
    let mut counts = Vec::new();
    for arch in ALL_ARCHS {
        let mut simulation = Simulation::new(assemble_ok(source), &config_for(arch));
        match run_to_end(&mut simulation) {
            Ok(RunOutcome::Completed) => {}
            other => panic!("unexpected outcome under {arch:?}: {other:?}"),
        }
        counts.push((arch, simulation.cycles()));
    }
    let single = counts[0].1;
    let multi = counts[1].1;
    let pipelined = counts[2].1;
    // Multi-cycle spreads phases over cycles; the pipeline overlaps them.
    assert!(multi > single, "multi-cycle should cost more than single");
    assert!(pipelined < multi, "pipelining should beat multi-cycle");
}

#[test]
fn fp_overlap_preserves_architectural_state() {
    let source = "\
main: li    $t0, 0x3FC00000
      mtc1  $t0, $f2
      mtc1  $t0, $f4
      add.s $f6, $f2, $f4
      addiu $t1, $zero, 11
      addiu $t2, $zero, 22
      mfc1  $t3, $f6
";
    let reference = final_registers(source, ArchKind::SingleCycle);
    for arch in ALL_ARCHS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr, reference.gpr, "GPR under {arch:?}");
        assert_eq!(regs.fpr, reference.fpr, "FPR under {arch:?}");
    }
    // 1.5 + 1.5 = 3.0
    assert_eq!(reference.fpr[6], 3.0f32.to_bits());
    assert_eq!(reference.gpr[T1 + 2], 3.0f32.to_bits());
}
