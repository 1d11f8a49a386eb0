//! Syscall hook dispatch.
//!
//! The core calls the injected handler with architecturally-exact
//! register values and routes the handler's `$v0` result back through
//! the normal commit discipline.

use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;

use crate::common::{assemble_ok, config_for, run_to_end, ALL_ARCHS, T0, V0};
use mipsim_core::common::error::RuntimeError;
use mipsim_core::exec::syscall::{SyscallHandler, SyscallOutcome, SyscallRequest};
use mipsim_core::exec::RunOutcome;
use mipsim_core::mem::Memory;
use mipsim_core::Simulation;

/// Records every request into a shared log and returns a canned result.
struct Recording {
    seen: Rc<RefCell<Vec<SyscallRequest>>>,
    result: Option<u32>,
}

impl SyscallHandler for Recording {
    fn handle(&mut self, req: &SyscallRequest, _mem: &Memory) -> Result<SyscallOutcome, RuntimeError> {
        self.seen.borrow_mut().push(*req);
        if req.service == 10 {
            return Ok(SyscallOutcome::exit(0));
        }
        Ok(SyscallOutcome {
            result: self.result,
            exit: None,
        })
    }
}

#[test]
fn exit_service_terminates_with_its_code() {
    let source = "\
main: addiu $v0, $zero, 17
      addiu $a0, $zero, 3
      syscall
      addiu $t0, $zero, 99
";
    for arch in ALL_ARCHS {
        let mut simulation =
            Simulation::new(assemble_ok(source), &config_for(arch));
        match run_to_end(&mut simulation) {
            Ok(RunOutcome::Exited(3)) => {}
            other => panic!("expected exit 3 under {arch:?}, got {other:?}"),
        }
        // The instruction after the exit never retires.
        assert_eq!(simulation.registers().gpr[T0], 0, "{arch:?}");
    }
}

#[test]
fn handler_sees_exact_argument_registers() {
    let source = "\
main: addiu $v0, $zero, 42
      addiu $a0, $zero, 1
      addiu $a1, $zero, 2
      addiu $a2, $zero, 3
      syscall
      addiu $v0, $zero, 10
      syscall
";
    for arch in ALL_ARCHS {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut simulation = Simulation::with_syscalls(
            assemble_ok(source),
            &config_for(arch),
            Box::new(Recording {
                seen: Rc::clone(&seen),
                result: None,
            }),
        );
        match run_to_end(&mut simulation) {
            Ok(RunOutcome::Exited(0)) => {}
            other => panic!("unexpected outcome under {arch:?}: {other:?}"),
        }
        let log = seen.borrow();
        assert_eq!(log.len(), 2, "{arch:?}");
        assert_eq!(
            log[0],
            SyscallRequest {
                service: 42,
                a0: 1,
                a1: 2,
                a2: 3
            },
            "first request under {arch:?}"
        );
        assert_eq!(log[1].service, 10, "second request under {arch:?}");
    }
}

#[test]
fn handler_result_lands_in_v0_through_commit() {
    let source = "\
main: addiu $v0, $zero, 5
      syscall
      addu  $t0, $v0, $v0
";
    for arch in ALL_ARCHS {
        let mut simulation = Simulation::with_syscalls(
            assemble_ok(source),
            &config_for(arch),
            Box::new(Recording {
                seen: Rc::new(RefCell::new(Vec::new())),
                result: Some(21),
            }),
        );
        match run_to_end(&mut simulation) {
            Ok(RunOutcome::Completed) => {}
            other => panic!("unexpected outcome under {arch:?}: {other:?}"),
        }
        let regs = simulation.registers();
        assert_eq!(regs.gpr[V0], 21, "handler result under {arch:?}");
        assert_eq!(regs.gpr[T0], 42, "dependent consumer under {arch:?}");
    }
}

#[test]
fn unsupported_service_is_a_syscall_fault() {
    let source = "\
main: addiu $v0, $zero, 4
      syscall
";
    let mut simulation = Simulation::new(
        assemble_ok(source),
        &config_for(mipsim_core::config::ArchKind::SingleCycle),
    );
    match simulation.run(100) {
        Err(fault) => {
            assert_eq!(fault.mnemonic, "syscall");
            assert!(matches!(fault.kind, RuntimeError::Syscall(_)));
        }
        Ok(outcome) => panic!("expected fault, got {outcome:?}"),
    }
}
