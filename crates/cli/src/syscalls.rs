//! Console syscall handler.
//!
//! Implements the classic console services over stdin/stdout. The core
//! invokes this through the `SyscallHandler` hook, unaware of the
//! implementation.

use std::io::{self, BufRead, Write};

use mipsim_core::common::error::RuntimeError;
use mipsim_core::exec::syscall::{
    SyscallHandler, SyscallOutcome, SyscallRequest, SERVICE_EXIT, SERVICE_EXIT_CODE,
    SERVICE_PRINT_CHAR, SERVICE_PRINT_INT, SERVICE_PRINT_STRING, SERVICE_READ_INT,
};
use mipsim_core::mem::Memory;

/// Console-backed syscall services.
#[derive(Debug, Default)]
pub struct Console;

impl Console {
    /// Creates the handler.
    pub fn new() -> Self {
        Self
    }
}

fn flush() -> Result<(), RuntimeError> {
    io::stdout()
        .flush()
        .map_err(|e| RuntimeError::Syscall(e.to_string()))
}

/// Reads the NUL-terminated string at `addr`.
fn read_c_string(mem: &Memory, addr: u32) -> Result<String, RuntimeError> {
    let mut bytes = Vec::new();
    let mut cursor = addr;
    loop {
        let byte = mem.load_byte(cursor)?;
        if byte == 0 {
            break;
        }
        bytes.push(byte);
        cursor = cursor.wrapping_add(1);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl SyscallHandler for Console {
    fn handle(&mut self, req: &SyscallRequest, mem: &Memory) -> Result<SyscallOutcome, RuntimeError> {
        match req.service {
            SERVICE_PRINT_INT => {
                print!("{}", req.a0 as i32);
                flush()?;
                Ok(SyscallOutcome::none())
            }
            SERVICE_PRINT_STRING => {
                print!("{}", read_c_string(mem, req.a0)?);
                flush()?;
                Ok(SyscallOutcome::none())
            }
            SERVICE_READ_INT => {
                let mut line = String::new();
                let _ = io::stdin()
                    .lock()
                    .read_line(&mut line)
                    .map_err(|e| RuntimeError::Syscall(e.to_string()))?;
                let value: i32 = line
                    .trim()
                    .parse()
                    .map_err(|_| RuntimeError::Syscall(format!("bad integer `{}`", line.trim())))?;
                Ok(SyscallOutcome::result(value as u32))
            }
            SERVICE_PRINT_CHAR => {
                print!("{}", char::from_u32(req.a0 & 0xFF).unwrap_or('?'));
                flush()?;
                Ok(SyscallOutcome::none())
            }
            SERVICE_EXIT => Ok(SyscallOutcome::exit(0)),
            SERVICE_EXIT_CODE => Ok(SyscallOutcome::exit(req.a0 as i32)),
            other => Err(RuntimeError::Syscall(format!(
                "unsupported service {other}"
            ))),
        }
    }
}
