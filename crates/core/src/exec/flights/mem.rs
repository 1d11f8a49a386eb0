//! Load and store flights.
//!
//! Loads forward their value from the memory phase, which is the earliest
//! point the value exists; a dependent instruction one slot behind
//! therefore observes a one-cycle load-use stall under the pipelined
//! models, exactly as the hardware would.

use crate::arch::RegRef;
use crate::common::error::RuntimeError;
use crate::exec::flight::{Flight, PhaseOutcome, Stage};

/// Access width and extension of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// `lb`: byte, sign-extended.
    ByteSigned,
    /// `lbu`: byte, zero-extended.
    ByteUnsigned,
    /// `lh`: half-word, sign-extended.
    HalfSigned,
    /// `lhu`: half-word, zero-extended.
    HalfUnsigned,
    /// `lw`/`lwc1`: full word.
    Word,
}

/// Access width of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// `sb`: low byte.
    Byte,
    /// `sh`: low half-word.
    Half,
    /// `sw`/`swc1`: full word.
    Word,
}

/// `dst = mem[base + offset]`, any destination file.
#[derive(Debug)]
pub struct Load {
    dst: RegRef,
    base: RegRef,
    offset: i16,
    kind: LoadKind,
    addr: u32,
    value: u32,
}

impl Load {
    /// Creates the flight.
    pub fn new(dst: RegRef, base: RegRef, offset: i16, kind: LoadKind) -> Self {
        Self {
            dst,
            base,
            offset,
            kind,
            addr: 0,
            value: 0,
        }
    }
}

impl Flight for Load {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let Some(base) = st.requires(self.base, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.addr = base.wrapping_add(i32::from(self.offset) as u32);
        st.lock(self.dst);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Ok(PhaseOutcome::Done)
    }

    fn memory(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.value = match self.kind {
            LoadKind::ByteSigned => i32::from(st.load_byte(self.addr)? as i8) as u32,
            LoadKind::ByteUnsigned => u32::from(st.load_byte(self.addr)?),
            LoadKind::HalfSigned => i32::from(st.load_half(self.addr)? as i16) as u32,
            LoadKind::HalfUnsigned => u32::from(st.load_half(self.addr)?),
            LoadKind::Word => st.load_word(self.addr)?,
        };
        st.forward(self.dst, self.value);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(self.dst, self.value);
        Ok(PhaseOutcome::Done)
    }
}

/// `mem[base + offset] = src`, any source file.
#[derive(Debug)]
pub struct Store {
    src: RegRef,
    base: RegRef,
    offset: i16,
    kind: StoreKind,
    addr: u32,
    value: u32,
}

impl Store {
    /// Creates the flight.
    pub fn new(src: RegRef, base: RegRef, offset: i16, kind: StoreKind) -> Self {
        Self {
            src,
            base,
            offset,
            kind,
            addr: 0,
            value: 0,
        }
    }
}

impl Flight for Store {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let (Some(base), Some(value)) =
            (st.requires(self.base, false), st.requires(self.src, false))
        else {
            return Ok(PhaseOutcome::Stall);
        };
        self.addr = base.wrapping_add(i32::from(self.offset) as u32);
        self.value = value;
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Ok(PhaseOutcome::Done)
    }

    fn memory(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        match self.kind {
            StoreKind::Byte => st.store_byte(self.addr, self.value as u8)?,
            StoreKind::Half => st.store_half(self.addr, self.value as u16)?,
            StoreKind::Word => st.store_word(self.addr, self.value)?,
        }
        Ok(PhaseOutcome::Done)
    }
}

/// `ldc1`: double-precision load — low word at the even register and
/// `addr`, high word at the odd register and `addr + 4`.
#[derive(Debug)]
pub struct LoadDouble {
    even: u8,
    base: RegRef,
    offset: i16,
    addr: u32,
    lo: u32,
    hi: u32,
}

impl LoadDouble {
    /// Creates the flight.
    pub fn new(even: u8, base: RegRef, offset: i16) -> Self {
        Self {
            even,
            base,
            offset,
            addr: 0,
            lo: 0,
            hi: 0,
        }
    }
}

impl Flight for LoadDouble {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if self.even % 2 != 0 {
            return Err(RuntimeError::EvenRegisterViolation(self.even));
        }
        let Some(base) = st.requires(self.base, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.addr = base.wrapping_add(i32::from(self.offset) as u32);
        st.lock(RegRef::Fpr(self.even));
        st.lock(RegRef::Fpr(self.even + 1));
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Ok(PhaseOutcome::Done)
    }

    fn memory(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.lo = st.load_word(self.addr)?;
        self.hi = st.load_word(self.addr.wrapping_add(4))?;
        st.forward(RegRef::Fpr(self.even), self.lo);
        st.forward(RegRef::Fpr(self.even + 1), self.hi);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(RegRef::Fpr(self.even), self.lo);
        st.set_and_unlock(RegRef::Fpr(self.even + 1), self.hi);
        Ok(PhaseOutcome::Done)
    }
}

/// `sdc1`: double-precision store, low word first.
#[derive(Debug)]
pub struct StoreDouble {
    even: u8,
    base: RegRef,
    offset: i16,
    addr: u32,
    lo: u32,
    hi: u32,
}

impl StoreDouble {
    /// Creates the flight.
    pub fn new(even: u8, base: RegRef, offset: i16) -> Self {
        Self {
            even,
            base,
            offset,
            addr: 0,
            lo: 0,
            hi: 0,
        }
    }
}

impl Flight for StoreDouble {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if self.even % 2 != 0 {
            return Err(RuntimeError::EvenRegisterViolation(self.even));
        }
        let Some(base) = st.requires(self.base, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        let (Some(lo), Some(hi)) = (
            st.requires(RegRef::Fpr(self.even), false),
            st.requires(RegRef::Fpr(self.even + 1), false),
        ) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.addr = base.wrapping_add(i32::from(self.offset) as u32);
        self.lo = lo;
        self.hi = hi;
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Ok(PhaseOutcome::Done)
    }

    fn memory(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.store_word(self.addr, self.lo)?;
        st.store_word(self.addr.wrapping_add(4), self.hi)?;
        Ok(PhaseOutcome::Done)
    }
}
