//! Syscall hook.
//!
//! The `syscall` instruction's execute phase calls out through this trait;
//! the core is unaware of the implementation (console I/O, exit, a test
//! stub). The CLI installs a console handler; the default handler supports
//! only `exit`.

use crate::common::error::RuntimeError;
use crate::mem::Memory;

/// Service number: print the integer in `$a0`.
pub const SERVICE_PRINT_INT: u32 = 1;
/// Service number: print the NUL-terminated string at `$a0`.
pub const SERVICE_PRINT_STRING: u32 = 4;
/// Service number: read an integer into `$v0`.
pub const SERVICE_READ_INT: u32 = 5;
/// Service number: exit with code 0.
pub const SERVICE_EXIT: u32 = 10;
/// Service number: print the character in `$a0`.
pub const SERVICE_PRINT_CHAR: u32 = 11;
/// Service number: exit with the code in `$a0`.
pub const SERVICE_EXIT_CODE: u32 = 17;

/// A syscall request, captured from the architectural registers at the
/// execute phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyscallRequest {
    /// Service number from `$v0`.
    pub service: u32,
    /// First argument (`$a0`).
    pub a0: u32,
    /// Second argument (`$a1`).
    pub a1: u32,
    /// Third argument (`$a2`).
    pub a2: u32,
}

/// What a handled syscall did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyscallOutcome {
    /// New value for `$v0`, if the service produces one.
    pub result: Option<u32>,
    /// Exit request with process code, if the service terminates the run.
    pub exit: Option<i32>,
}

impl SyscallOutcome {
    /// An outcome that neither writes `$v0` nor exits.
    pub fn none() -> Self {
        Self::default()
    }

    /// An outcome carrying a `$v0` result.
    pub fn result(val: u32) -> Self {
        Self {
            result: Some(val),
            exit: None,
        }
    }

    /// An exit request.
    pub fn exit(code: i32) -> Self {
        Self {
            result: None,
            exit: Some(code),
        }
    }
}

/// The syscall-execution hook.
pub trait SyscallHandler {
    /// Handles one service request. `mem` allows string services to read
    /// program memory.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::Syscall`] if the service fails or is unsupported.
    fn handle(&mut self, req: &SyscallRequest, mem: &Memory) -> Result<SyscallOutcome, RuntimeError>;
}

/// Minimal handler: supports the exit services only.
///
/// Used when no environment hook is injected, and by tests that only need
/// a program to terminate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitOnlySyscalls;

impl SyscallHandler for ExitOnlySyscalls {
    fn handle(&mut self, req: &SyscallRequest, _mem: &Memory) -> Result<SyscallOutcome, RuntimeError> {
        match req.service {
            SERVICE_EXIT => Ok(SyscallOutcome::exit(0)),
            SERVICE_EXIT_CODE => Ok(SyscallOutcome::exit(req.a0 as i32)),
            other => Err(RuntimeError::Syscall(format!(
                "service {other} not supported by this environment"
            ))),
        }
    }
}
