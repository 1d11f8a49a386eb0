//! Branch and jump flights.
//!
//! Control transfers honor the configurable resolution policy: under
//! `OnDecode` the decode phase compares forwarded operands and redirects
//! the PC immediately; under `OnWriteBack` decode takes the PC lock
//! (stalling fetch) and write-back performs the jump and releases it.
//! Both paths compute the same architectural result.

use crate::arch::RegRef;
use crate::common::constants::REG_RA;
use crate::common::error::RuntimeError;
use crate::config::BranchPolicy;
use crate::exec::flight::{Flight, PhaseOutcome, Stage};

/// PC-relative target for a 16-bit word displacement.
fn relative_target(addr: u32, imm: i32) -> u32 {
    addr.wrapping_add(4).wrapping_add((imm << 2) as u32)
}

/// Conditional branch comparing one or two registers against a predicate.
#[derive(Debug)]
pub struct Branch {
    a: RegRef,
    b: Option<RegRef>,
    imm: i32,
    cond: fn(u32, u32) -> bool,
    link: bool,
    taken: bool,
    target: u32,
}

impl Branch {
    /// Two-register compare-and-branch (`beq`, `bne`).
    pub fn two(a: RegRef, b: RegRef, imm: i32, cond: fn(u32, u32) -> bool) -> Self {
        Self {
            a,
            b: Some(b),
            imm,
            cond,
            link: false,
            taken: false,
            target: 0,
        }
    }

    /// One-register compare-against-zero branch (`bgez`, `bltz`, ...).
    pub fn one(a: RegRef, imm: i32, cond: fn(u32, u32) -> bool, link: bool) -> Self {
        Self {
            a,
            b: None,
            imm,
            cond,
            link,
            taken: false,
            target: 0,
        }
    }
}

impl Flight for Branch {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let Some(va) = st.requires(self.a, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        let vb = match self.b {
            Some(b) => match st.requires(b, false) {
                Some(v) => v,
                None => return Ok(PhaseOutcome::Stall),
            },
            None => 0,
        };
        self.taken = (self.cond)(va, vb);
        self.target = relative_target(st.addr(), self.imm);
        match st.branch_policy() {
            BranchPolicy::OnDecode => {
                if self.taken {
                    st.jump(self.target);
                }
            }
            BranchPolicy::OnWriteBack => st.hold_pc(),
        }
        if self.link {
            st.lock(RegRef::Gpr(REG_RA));
        }
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if self.link {
            st.forward(RegRef::Gpr(REG_RA), st.link_value());
        }
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if st.branch_policy() == BranchPolicy::OnWriteBack {
            if self.taken {
                st.jump(self.target);
            }
            st.release_pc();
        }
        if self.link {
            st.set_and_unlock(RegRef::Gpr(REG_RA), st.link_value());
        }
        Ok(PhaseOutcome::Done)
    }
}

/// Branch on the COP1 condition flag (`bc1t`, `bc1f`).
#[derive(Debug)]
pub struct BranchFpCond {
    want: bool,
    imm: i32,
    taken: bool,
    target: u32,
}

impl BranchFpCond {
    /// Creates the flight; `want` is the flag value that takes the branch.
    pub fn new(want: bool, imm: i32) -> Self {
        Self {
            want,
            imm,
            taken: false,
            target: 0,
        }
    }
}

impl Flight for BranchFpCond {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let Some(flag) = st.requires(RegRef::FpCond, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.taken = (flag != 0) == self.want;
        self.target = relative_target(st.addr(), self.imm);
        match st.branch_policy() {
            BranchPolicy::OnDecode => {
                if self.taken {
                    st.jump(self.target);
                }
            }
            BranchPolicy::OnWriteBack => st.hold_pc(),
        }
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, _st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if st.branch_policy() == BranchPolicy::OnWriteBack {
            if self.taken {
                st.jump(self.target);
            }
            st.release_pc();
        }
        Ok(PhaseOutcome::Done)
    }
}

/// Absolute jump (`j`, `jal`): the 26-bit field shifted left two, combined
/// with the top bits of the successor address.
#[derive(Debug)]
pub struct Jump {
    target26: u32,
    link: bool,
    target: u32,
}

impl Jump {
    /// Creates the flight.
    pub fn new(target26: u32, link: bool) -> Self {
        Self {
            target26,
            link,
            target: 0,
        }
    }
}

impl Flight for Jump {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        self.target = (st.addr().wrapping_add(4) & 0xF000_0000) | (self.target26 << 2);
        match st.branch_policy() {
            BranchPolicy::OnDecode => st.jump(self.target),
            BranchPolicy::OnWriteBack => st.hold_pc(),
        }
        if self.link {
            st.lock(RegRef::Gpr(REG_RA));
        }
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if self.link {
            st.forward(RegRef::Gpr(REG_RA), st.link_value());
        }
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if st.branch_policy() == BranchPolicy::OnWriteBack {
            st.jump(self.target);
            st.release_pc();
        }
        if self.link {
            st.set_and_unlock(RegRef::Gpr(REG_RA), st.link_value());
        }
        Ok(PhaseOutcome::Done)
    }
}

/// Register-indirect jump (`jr`, `jalr`).
#[derive(Debug)]
pub struct JumpReg {
    src: RegRef,
    link: Option<RegRef>,
    target: u32,
}

impl JumpReg {
    /// Creates the flight; `link` is the link destination for `jalr`.
    pub fn new(src: RegRef, link: Option<RegRef>) -> Self {
        Self {
            src,
            link,
            target: 0,
        }
    }
}

impl Flight for JumpReg {
    fn decode(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        let Some(target) = st.requires(self.src, false) else {
            return Ok(PhaseOutcome::Stall);
        };
        self.target = target;
        match st.branch_policy() {
            BranchPolicy::OnDecode => st.jump(self.target),
            BranchPolicy::OnWriteBack => st.hold_pc(),
        }
        if let Some(link) = self.link {
            st.lock(link);
        }
        Ok(PhaseOutcome::Done)
    }

    fn execute(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if let Some(link) = self.link {
            st.forward(link, st.link_value());
        }
        Ok(PhaseOutcome::Done)
    }

    fn write_back(&mut self, st: &mut Stage<'_>) -> Result<PhaseOutcome, RuntimeError> {
        if st.branch_policy() == BranchPolicy::OnWriteBack {
            st.jump(self.target);
            st.release_pc();
        }
        if let Some(link) = self.link {
            st.set_and_unlock(link, st.link_value());
        }
        Ok(PhaseOutcome::Done)
    }
}
