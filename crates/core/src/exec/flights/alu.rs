//! Integer ALU flights.
//!
//! Three shapes cover the integer ALU: two-source register ops, one
//! register plus immediate, and unary register transforms. The operation
//! itself is a plain function value, so trapping (`add`) and wrapping
//! (`addu`) variants differ only in the function the table passes in.

use crate::arch::RegRef;
use crate::common::error::RuntimeError;
use crate::exec::flight::{Flight, PhaseOutcome, Stage};

/// Result type of an ALU operation: trapping variants may fault.
pub type AluResult = Result<u32, RuntimeError>;

/// `dst = op(a, b)` over two register sources.
#[derive(Debug)]
pub struct BinReg {
    dst: RegRef,
    a: RegRef,
    b: RegRef,
    op: fn(u32, u32) -> AluResult,
    va: u32,
    vb: u32,
    result: u32,
}

impl BinReg {
    /// Creates the flight.
    pub fn new(dst: RegRef, a: RegRef, b: RegRef, op: fn(u32, u32) -> AluResult) -> Self {
        Self {
            dst,
            a,
            b,
            op,
            va: 0,
            vb: 0,
            result: 0,
        }
    }
}

impl Flight for BinReg {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let (Some(va), Some(vb)) = (st.requires(self.a, false), st.requires(self.b, false)) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.va = va;
        self.vb = vb;
        st.lock(self.dst);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.result = (self.op)(self.va, self.vb)?;
        st.forward(self.dst, self.result);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(self.dst, self.result);
        Ok(PhaseOutcome::Done)
    }
}

/// `dst = op(a, imm)` over one register source and an immediate.
#[derive(Debug)]
pub struct BinImm {
    dst: RegRef,
    a: RegRef,
    imm: i32,
    op: fn(u32, i32) -> AluResult,
    va: u32,
    result: u32,
}

impl BinImm {
    /// Creates the flight.
    pub fn new(dst: RegRef, a: RegRef, imm: i32, op: fn(u32, i32) -> AluResult) -> Self {
        Self {
            dst,
            a,
            imm,
            op,
            va: 0,
            result: 0,
        }
    }
}

impl Flight for BinImm {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let Some(va) = st.requires(self.a, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.va = va;
        st.lock(self.dst);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.result = (self.op)(self.va, self.imm)?;
        st.forward(self.dst, self.result);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(self.dst, self.result);
        Ok(PhaseOutcome::Done)
    }
}

/// `dst = op(a)` — unary transforms (`clz`, `bitswap`, `seb`, moves
/// between GPR and HI/LO).
#[derive(Debug)]
pub struct UnReg {
    dst: RegRef,
    a: RegRef,
    op: fn(u32) -> u32,
    va: u32,
    result: u32,
}

impl UnReg {
    /// Creates the flight.
    pub fn new(dst: RegRef, a: RegRef, op: fn(u32) -> u32) -> Self {
        Self {
            dst,
            a,
            op,
            va: 0,
            result: 0,
        }
    }
}

impl Flight for UnReg {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let Some(va) = st.requires(self.a, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.va = va;
        st.lock(self.dst);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.result = (self.op)(self.va);
        st.forward(self.dst, self.result);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(self.dst, self.result);
        Ok(PhaseOutcome::Done)
    }
}

/// Two's-complement overflow-checked addition (`add`, `addi`).
pub fn add_trapping(a: u32, b: u32) -> AluResult {
    (a as i32)
        .checked_add(b as i32)
        .map(|v| v as u32)
        .ok_or(RuntimeError::ArithmeticOverflow)
}

/// Two's-complement overflow-checked subtraction (`sub`).
pub fn sub_trapping(a: u32, b: u32) -> AluResult {
    (a as i32)
        .checked_sub(b as i32)
        .map(|v| v as u32)
        .ok_or(RuntimeError::ArithmeticOverflow)
}

/// Reverses the bit order within each byte of the word (`bitswap`).
pub fn bitswap(v: u32) -> u32 {
    u32::from_le_bytes(v.to_le_bytes().map(u8::reverse_bits))
}

/// Swaps the bytes within each half-word (`wsbh`).
pub fn wsbh(v: u32) -> u32 {
    let b = v.to_le_bytes();
    u32::from_le_bytes([b[1], b[0], b[3], b[2]])
}
