//! Run-time fault taxonomy.
//!
//! Faults carry the failing instruction's address and mnemonic, halt the
//! current run, and leave the simulation valid for reset.

use mipsim_core::asm::program::{AssembledInstruction, Program};
use mipsim_core::common::error::{MemoryError, RuntimeError};
use mipsim_core::config::{ArchKind, Config};
use mipsim_core::exec::{RunOutcome, StepOutcome};
use mipsim_core::{InstructionSet, Simulation};

use crate::common::{assemble_ok, config_for, run_to_end, sim, ALL_ARCHS, T0};

fn expect_fault(source: &str, arch: ArchKind) -> mipsim_core::common::error::ExecutionFault {
    let mut simulation = sim(source, arch);
    match simulation.run(100_000) {
        Err(fault) => fault,
        Ok(outcome) => panic!("expected a fault under {arch:?}, got {outcome:?}"),
    }
}

#[test]
fn trapping_add_overflows_and_names_the_instruction() {
    let source = "\
main: li   $t0, 0x7FFFFFFF
      addi $t0, $t0, 1
";
    for arch in ALL_ARCHS {
        let fault = expect_fault(source, arch);
        assert_eq!(fault.kind, RuntimeError::ArithmeticOverflow, "{arch:?}");
        assert_eq!(fault.mnemonic, "addi", "{arch:?}");
        assert_eq!(fault.addr, 0x0040_0008, "{arch:?}");
    }
}

#[test]
fn wrapping_add_does_not_overflow() {
    let source = "\
main: li    $t0, 0x7FFFFFFF
      addiu $t0, $t0, 1
";
    for arch in ALL_ARCHS {
        let regs = crate::common::final_registers(source, arch);
        assert_eq!(regs.gpr[T0], 0x8000_0000, "{arch:?}");
    }
}

#[test]
fn trap_instructions_raise_trap_exceptions() {
    let source = "\
main: addiu $t0, $zero, 3
      addiu $t1, $zero, 3
      teq   $t0, $t1
";
    let fault = expect_fault(source, ArchKind::SingleCycle);
    assert_eq!(fault.kind, RuntimeError::TrapException);
    assert_eq!(fault.mnemonic, "teq");
}

#[test]
fn misaligned_store_is_a_memory_fault() {
    let source = "\
main: addiu $t0, $zero, 2
      sw    $t0, 2($zero)
";
    let fault = expect_fault(source, ArchKind::Pipelined);
    assert_eq!(
        fault.kind,
        RuntimeError::Memory(MemoryError::Misaligned {
            addr: 2,
            required: 4
        })
    );
    assert_eq!(fault.mnemonic, "sw");
}

#[test]
fn out_of_range_load_is_a_memory_fault() {
    // The default ceiling is 0x8000_0000.
    let source = "\
main: lui $t0, 0x8000
      lw  $t1, 0($t0)
";
    let fault = expect_fault(source, ArchKind::SingleCycle);
    assert!(matches!(
        fault.kind,
        RuntimeError::Memory(MemoryError::OutOfRange { addr: 0x8000_0000, .. })
    ));
}

#[test]
fn break_halts_with_its_code() {
    let fault = expect_fault("main: break\n", ArchKind::MultiCycle);
    assert_eq!(fault.kind, RuntimeError::Break(0));
    assert_eq!(fault.mnemonic, "break");
}

#[test]
fn odd_double_register_word_faults_at_execute_time() {
    // The assembler rejects this, so hand-build the word: add.d with
    // fd = $f1. Defense in depth demands the engine catch it too.
    let iset = InstructionSet::mips32();
    // add.d $f1(fd), $f2(fs), $f4(ft): COP1, fmt=D, ft=4, fs=2, fd=1.
    let word = 0x4624_1040;
    let id = iset
        .find_matching(word)
        .unwrap_or_else(|| panic!("hand-built add.d did not match"));
    assert_eq!(iset.descriptor(id).mnemonic, "add.d");
    let config = Config::default();
    let program = Program {
        text: vec![AssembledInstruction {
            word,
            descriptor: id,
            line: 1,
            addr: config.memory.text_base,
        }],
        labels: std::collections::HashMap::new(),
        data: Vec::new(),
        text_base: config.memory.text_base,
        entry: config.memory.text_base,
        iset,
    };
    let mut simulation = Simulation::new(program, &config);
    match simulation.run(100) {
        Err(fault) => {
            assert_eq!(fault.kind, RuntimeError::EvenRegisterViolation(1));
            assert_eq!(fault.mnemonic, "add.d");
        }
        Ok(outcome) => panic!("expected even-register fault, got {outcome:?}"),
    }
}

#[test]
fn stray_pc_after_jump_out_of_text_faults() {
    let source = "\
main: lui $t0, 0x0050
      jr  $t0
";
    let fault = expect_fault(source, ArchKind::SingleCycle);
    assert!(matches!(fault.kind, RuntimeError::PcOutOfText(0x0050_0000)));
}

#[test]
fn a_faulted_simulation_repeats_its_fault_until_reset() {
    let mut simulation = sim("main: break\n", ArchKind::SingleCycle);
    let first = match simulation.run(10) {
        Err(fault) => fault,
        Ok(outcome) => panic!("expected fault, got {outcome:?}"),
    };
    match simulation.step() {
        Err(second) => assert_eq!(first, second),
        Ok(outcome) => panic!("fault did not stick: {outcome:?}"),
    }
    simulation.reset();
    match simulation.step() {
        Err(fault) => panic!("reset did not clear the fault: {fault}"),
        Ok(StepOutcome::Running | StepOutcome::Completed) => {}
        Ok(outcome) => panic!("unexpected outcome after reset: {outcome:?}"),
    }
}

#[test]
fn completion_is_not_a_fault() {
    let mut simulation = Simulation::new(
        assemble_ok("main: addiu $t0, $zero, 1\n"),
        &config_for(ArchKind::Pipelined),
    );
    match run_to_end(&mut simulation) {
        Ok(RunOutcome::Completed) => {}
        other => panic!("expected completion, got {other:?}"),
    }
}
