//! HI/LO multiply and divide flights.
//!
//! Products and quotients are computed by widening to 64 bits and
//! splitting: HI receives the high word (or remainder), LO the low word
//! (or quotient). Division by zero and the signed `INT_MIN / -1` case
//! follow the deterministic convention quotient = all-ones / `INT_MIN`,
//! remainder = dividend / 0, so no run-time fault is raised.

use crate::arch::RegRef;
use crate::common::error::RuntimeError;
use crate::exec::flight::{Flight, PhaseOutcome, Stage};

/// Computes the (HI, LO) pair from two operands.
pub type HiLoOp = fn(u32, u32) -> (u32, u32);

/// `hi:lo = op(a, b)` — `mult`, `multu`, `div`, `divu`.
#[derive(Debug)]
pub struct MulDiv {
    a: RegRef,
    b: RegRef,
    op: HiLoOp,
    va: u32,
    vb: u32,
    hi: u32,
    lo: u32,
}

impl MulDiv {
    /// Creates the flight.
    pub fn new(a: RegRef, b: RegRef, op: HiLoOp) -> Self {
        Self {
            a,
            b,
            op,
            va: 0,
            vb: 0,
            hi: 0,
            lo: 0,
        }
    }
}

impl Flight for MulDiv {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let (Some(va), Some(vb)) = (st.requires(self.a, false), st.requires(self.b, false)) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.va = va;
        self.vb = vb;
        st.lock(RegRef::Hi);
        st.lock(RegRef::Lo);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        (self.hi, self.lo) = (self.op)(self.va, self.vb);
        st.forward(RegRef::Hi, self.hi);
        st.forward(RegRef::Lo, self.lo);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(RegRef::Hi, self.hi);
        st.set_and_unlock(RegRef::Lo, self.lo);
        Ok(PhaseOutcome::Done)
    }
}

/// `hi:lo = hi:lo ± a * b` — `madd`, `maddu`, `msub`, `msubu`.
#[derive(Debug)]
pub struct MulAcc {
    a: RegRef,
    b: RegRef,
    signed: bool,
    subtract: bool,
    va: u32,
    vb: u32,
    acc: u64,
    hi: u32,
    lo: u32,
}

impl MulAcc {
    /// Creates the flight.
    pub fn new(a: RegRef, b: RegRef, signed: bool, subtract: bool) -> Self {
        Self {
            a,
            b,
            signed,
            subtract,
            va: 0,
            vb: 0,
            acc: 0,
            hi: 0,
            lo: 0,
        }
    }
}

impl Flight for MulAcc {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let (Some(va), Some(vb)) = (st.requires(self.a, false), st.requires(self.b, false)) else {
            return Ok(PhaseOutcome::Stall);
        };
        let (Some(hi), Some(lo)) = (
            st.requires(RegRef::Hi, false),
            st.requires(RegRef::Lo, false),
        ) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.va = va;
        self.vb = vb;
        self.acc = (u64::from(hi) << 32) | u64::from(lo);
        st.lock(RegRef::Hi);
        st.lock(RegRef::Lo);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let product = if self.signed {
            (i64::from(self.va as i32) * i64::from(self.vb as i32)) as u64
        } else {
            u64::from(self.va) * u64::from(self.vb)
        };
        let acc = if self.subtract {
            self.acc.wrapping_sub(product)
        } else {
            self.acc.wrapping_add(product)
        };
        self.hi = (acc >> 32) as u32;
        self.lo = acc as u32;
        st.forward(RegRef::Hi, self.hi);
        st.forward(RegRef::Lo, self.lo);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(RegRef::Hi, self.hi);
        st.set_and_unlock(RegRef::Lo, self.lo);
        Ok(PhaseOutcome::Done)
    }
}

/// Signed 64-bit widening multiply split into (HI, LO).
pub fn mult(a: u32, b: u32) -> (u32, u32) {
    let wide = (i64::from(a as i32) * i64::from(b as i32)) as u64;
    ((wide >> 32) as u32, wide as u32)
}

/// Unsigned 64-bit widening multiply split into (HI, LO).
pub fn multu(a: u32, b: u32) -> (u32, u32) {
    let wide = u64::from(a) * u64::from(b);
    ((wide >> 32) as u32, wide as u32)
}

/// Signed divide: HI = remainder, LO = quotient.
pub fn div(a: u32, b: u32) -> (u32, u32) {
    let (a, b) = (a as i32, b as i32);
    if b == 0 {
        (a as u32, u32::MAX)
    } else {
        (a.wrapping_rem(b) as u32, a.wrapping_div(b) as u32)
    }
}

/// Unsigned divide: HI = remainder, LO = quotient.
pub fn divu(a: u32, b: u32) -> (u32, u32) {
    if b == 0 {
        (a, u32::MAX)
    } else {
        (a % b, a / b)
    }
}
