//! Forwarding and stall correctness.
//!
//! Read-after-write chains must observe the producing instruction's value
//! under every hazard-managed model, through forwarding when available
//! and stalls when not.

use pretty_assertions::assert_eq;

use crate::common::{final_registers, ALL_ARCHS, T0, T1, T2, T3};
use mipsim_core::config::ArchKind;

const HAZARD_MODELS: [ArchKind; 3] = [
    ArchKind::MultiCycle,
    ArchKind::Pipelined,
    ArchKind::MultiAlu,
];

#[test]
fn back_to_back_raw_dependency_forwards() {
    // A three-deep chain where each consumer sits directly behind its
    // producer.
    let source = "\
main: addiu $t1, $zero, 1
      add   $t0, $zero, $t1
      add   $t2, $t0, $t0
";
    for arch in HAZARD_MODELS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T0], 1, "$t0 under {arch:?}");
        assert_eq!(regs.gpr[T2], 2, "forwarded sum under {arch:?}");
    }
}

#[test]
fn producer_consumer_pair_yields_two() {
    // An immediate 1 into $t0, immediately doubled by the next
    // instruction: the consumer must observe the producer's value under
    // every pipelined model.
    let source = "\
main: addiu $t0, $zero, 1
      add   $t1, $t0, $t0
";
    for arch in HAZARD_MODELS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T1], 2, "$t1 under {arch:?}");
    }
}

#[test]
fn load_use_hazard_stalls_until_the_value_exists() {
    let source = "\
main: addiu $t0, $zero, 77
      sw    $t0, 0($zero)
      lw    $t1, 0($zero)
      addu  $t2, $t1, $t1
";
    for arch in HAZARD_MODELS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T1], 77, "loaded value under {arch:?}");
        assert_eq!(regs.gpr[T2], 154, "consumer under {arch:?}");
    }
}

#[test]
fn chained_writes_to_one_register_commit_in_program_order() {
    // Two in-flight writers of $t0; the reader must see the younger one.
    let source = "\
main: addiu $t0, $zero, 5
      addiu $t0, $zero, 7
      addu  $t1, $t0, $t0
";
    for arch in ALL_ARCHS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T0], 7, "$t0 under {arch:?}");
        assert_eq!(regs.gpr[T1], 14, "$t1 under {arch:?}");
    }
}

#[test]
fn hi_lo_results_forward_to_accumulator_moves() {
    let source = "\
main: addiu $t0, $zero, 6
      addiu $t1, $zero, 7
      mult  $t0, $t1
      mflo  $t2
      mfhi  $t3
";
    for arch in HAZARD_MODELS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T2], 42, "LO under {arch:?}");
        assert_eq!(regs.gpr[T3], 0, "HI under {arch:?}");
    }
}

#[test]
fn fp_condition_flag_is_interlocked() {
    // c.lt.s writes the flag; bc1t one slot behind must wait for it.
    let source = "\
main: li    $t0, 0x3F800000
      li    $t1, 0x40000000
      mtc1  $t0, $f2
      mtc1  $t1, $f4
      c.lt.s $f2, $f4
      bc1t  smaller
      addiu $t2, $zero, 111
      j     out
smaller: addiu $t2, $zero, 222
out:  sw    $t2, 0($zero)
";
    for arch in HAZARD_MODELS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T2], 222, "1.0 < 2.0 under {arch:?}");
    }
}
