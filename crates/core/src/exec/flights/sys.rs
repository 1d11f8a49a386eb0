//! System flights: syscall, break, trap compares, COP0 moves, and CRC32.

use crate::arch::RegRef;
use crate::common::constants::{REG_A0, REG_V0};
use crate::common::error::RuntimeError;
use crate::exec::flight::{Flight, PhaseOutcome, Stage};
use crate::exec::syscall::SyscallRequest;

/// `syscall`: dispatches to the injected environment hook.
///
/// Arguments are read exactly (architectural state, not forwarded values),
/// so the flight stalls until every pending write to `$v0`/`$a0`-`$a2`
/// has committed. The handler's `$v0` result flows through the normal
/// lock/forward/commit discipline.
#[derive(Debug, Default)]
pub struct Syscall {
    request: SyscallRequest,
    result: u32,
}

impl Syscall {
    /// Creates the flight.
    pub fn new() -> Self {
        Self {
            request: SyscallRequest {
                service: 0,
                a0: 0,
                a1: 0,
                a2: 0,
            },
            result: 0,
        }
    }
}

impl Default for SyscallRequest {
    fn default() -> Self {
        Self {
            service: 0,
            a0: 0,
            a1: 0,
            a2: 0,
        }
    }
}

impl Flight for Syscall {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let v0 = RegRef::Gpr(REG_V0);
        let (Some(service), Some(a0), Some(a1), Some(a2)) = (
            st.requires(v0, true),
            st.requires(RegRef::Gpr(REG_A0), true),
            st.requires(RegRef::Gpr(REG_A0 + 1), true),
            st.requires(RegRef::Gpr(REG_A0 + 2), true),
        ) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.request = SyscallRequest {
            service,
            a0,
            a1,
            a2,
        };
        self.result = service;
        st.lock(v0);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let outcome = st.syscall(&self.request)?;
        if let Some(result) = outcome.result {
            self.result = result;
        }
        st.forward(RegRef::Gpr(REG_V0), self.result);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(RegRef::Gpr(REG_V0), self.result);
        Ok(PhaseOutcome::Done)
    }
}

/// `break`: raises [`RuntimeError::Break`] with its code field.
#[derive(Debug)]
pub struct Break {
    code: u32,
}

impl Break {
    /// Creates the flight with the 20-bit code field.
    pub fn new(code: u32) -> Self {
        Self { code }
    }
}

impl Flight for Break {
    fn decode(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Err(RuntimeError::Break(self.code))
    }
}

/// Conditional trap (`teq`, `tne`, `tlt`, ...): faults when the predicate
/// holds.
#[derive(Debug)]
pub struct TrapCmp {
    a: RegRef,
    b: RegRef,
    cond: fn(u32, u32) -> bool,
    va: u32,
    vb: u32,
}

impl TrapCmp {
    /// Creates the flight.
    pub fn new(a: RegRef, b: RegRef, cond: fn(u32, u32) -> bool) -> Self {
        Self {
            a,
            b,
            cond,
            va: 0,
            vb: 0,
        }
    }
}

impl Flight for TrapCmp {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let (Some(va), Some(vb)) = (st.requires(self.a, false), st.requires(self.b, false)) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.va = va;
        self.vb = vb;
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if (self.cond)(self.va, self.vb) {
            Err(RuntimeError::TrapException)
        } else {
            Ok(PhaseOutcome::Done)
        }
    }
}

/// CRC32 accumulate: `acc = crc(acc, msg)` over the low `bytes` bytes of
/// the message register, bit-at-a-time with a reflected polynomial.
///
/// No lookup table: eight shift/xor rounds per byte, which keeps the
/// polynomial a plain parameter.
#[derive(Debug)]
pub struct Crc {
    acc: RegRef,
    msg: RegRef,
    bytes: u32,
    poly: u32,
    vacc: u32,
    vmsg: u32,
    result: u32,
}

impl Crc {
    /// Creates the flight.
    pub fn new(acc: RegRef, msg: RegRef, bytes: u32, poly: u32) -> Self {
        Self {
            acc,
            msg,
            bytes,
            poly,
            vacc: 0,
            vmsg: 0,
            result: 0,
        }
    }
}

/// One bit-at-a-time CRC update over `bytes` message bytes, LSB first.
pub fn crc_update(mut crc: u32, msg: u32, bytes: u32, poly: u32) -> u32 {
    for i in 0..bytes {
        crc ^= (msg >> (8 * i)) & 0xFF;
        for _ in 0..8 {
            let lsb = crc & 1;
            crc >>= 1;
            if lsb != 0 {
                crc ^= poly;
            }
        }
    }
    crc
}

impl Flight for Crc {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let (Some(vacc), Some(vmsg)) =
            (st.requires(self.acc, false), st.requires(self.msg, false))
        else {
            return Ok(PhaseOutcome::Stall);
        };
        self.vacc = vacc;
        self.vmsg = vmsg;
        st.lock(self.acc);
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.result = crc_update(self.vacc, self.vmsg, self.bytes, self.poly);
        st.forward(self.acc, self.result);
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        st.set_and_unlock(self.acc, self.result);
        Ok(PhaseOutcome::Done)
    }
}
