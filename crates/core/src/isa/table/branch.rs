//! Branch and jump descriptors.
//!
//! Branch encodes carry a label operand that the assembler resolves to an
//! absolute address before encode; the encode function turns it into the
//! PC-relative word displacement `(target − addr − 4) >> 2`.

use crate::arch::RegRef;
use crate::exec::flights::branch::{Branch, Jump, JumpReg};
use crate::isa::descriptor::{ArchMap, InstructionDescriptor, InstructionSet};
use crate::isa::fields::{i_type, j_type, r_type, InstructionBits, MATCH_OP, MATCH_OP_FUNCT, MATCH_OP_RT};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::codes::{funct, op, regimm, REGIMM, SPECIAL};
use crate::isa::table::{basic, ctor, RD_FIELD, RT_FIELD, SHAMT_FIELD};

/// `mn $rs, $rt, label` — two-register compare and branch.
fn cmp_branch(mn: &'static str, opcode: u32, cond: fn(u32, u32) -> bool) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register, T::Label],
        MATCH_OP,
        i_type(opcode, 0, 0, 0),
        Box::new(move |cx| Ok(i_type(opcode, cx.reg(0)?, cx.reg(1)?, cx.branch_offset(2)?))),
        Box::new(|w| {
            vec![
                Operand::Reg(w.rs()),
                Operand::Reg(w.rt()),
                Operand::Imm(i64::from(w.imm16())),
            ]
        }),
        ArchMap::all(ctor(move |w| {
            Box::new(Branch::two(
                RegRef::Gpr(w.rs()),
                RegRef::Gpr(w.rt()),
                w.imm16(),
                cond,
            ))
        })),
    )
}

/// `mn $rs, label` — compare-against-zero branch with rt as a fixed code.
fn zero_branch(
    mn: &'static str,
    opcode: u32,
    rt_code: u8,
    cond: fn(u32, u32) -> bool,
    link: bool,
) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Label],
        MATCH_OP_RT,
        i_type(opcode, 0, rt_code, 0),
        Box::new(move |cx| Ok(i_type(opcode, cx.reg(0)?, rt_code, cx.branch_offset(1)?))),
        Box::new(|w| vec![Operand::Reg(w.rs()), Operand::Imm(i64::from(w.imm16()))]),
        ArchMap::all(ctor(move |w| {
            Box::new(Branch::one(RegRef::Gpr(w.rs()), w.imm16(), cond, link))
        })),
    )
}

/// `j label` / `jal label`.
fn abs_jump(mn: &'static str, opcode: u32, link: bool) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Label],
        MATCH_OP,
        j_type(opcode, 0),
        Box::new(move |cx| Ok(j_type(opcode, cx.jump_target(0)?))),
        Box::new(|w| vec![Operand::Imm(i64::from(w.target26()))]),
        ArchMap::all(ctor(move |w| Box::new(Jump::new(w.target26(), link)))),
    )
}

pub(super) fn register(set: &mut InstructionSet) {
    set.register(cmp_branch("beq", op::BEQ, |a, b| a == b));
    set.register(cmp_branch("bne", op::BNE, |a, b| a != b));

    set.register(zero_branch("blez", op::BLEZ, 0, |a, _| (a as i32) <= 0, false));
    set.register(zero_branch("bgtz", op::BGTZ, 0, |a, _| (a as i32) > 0, false));
    set.register(zero_branch(
        "bltz",
        REGIMM,
        regimm::BLTZ,
        |a, _| (a as i32) < 0,
        false,
    ));
    set.register(zero_branch(
        "bgez",
        REGIMM,
        regimm::BGEZ,
        |a, _| (a as i32) >= 0,
        false,
    ));
    set.register(zero_branch(
        "bltzal",
        REGIMM,
        regimm::BLTZAL,
        |a, _| (a as i32) < 0,
        true,
    ));
    set.register(zero_branch(
        "bgezal",
        REGIMM,
        regimm::BGEZAL,
        |a, _| (a as i32) >= 0,
        true,
    ));

    set.register(abs_jump("j", op::J, false));
    set.register(abs_jump("jal", op::JAL, true));

    // jr $rs — everything but rs is zero.
    set.register(basic(
        "jr",
        vec![T::Register],
        MATCH_OP_FUNCT | RT_FIELD | RD_FIELD | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, funct::JR),
        Box::new(|cx| Ok(r_type(SPECIAL, cx.reg(0)?, 0, 0, 0, funct::JR))),
        Box::new(|w| vec![Operand::Reg(w.rs())]),
        ArchMap::all(ctor(|w| Box::new(JumpReg::new(RegRef::Gpr(w.rs()), None)))),
    ));

    // jalr $rd, $rs — explicit link register.
    set.register(basic(
        "jalr",
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT | RT_FIELD | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, funct::JALR),
        Box::new(|cx| Ok(r_type(SPECIAL, cx.reg(1)?, 0, cx.reg(0)?, 0, funct::JALR))),
        Box::new(|w| vec![Operand::Reg(w.rd()), Operand::Reg(w.rs())]),
        ArchMap::all(ctor(|w| {
            Box::new(JumpReg::new(
                RegRef::Gpr(w.rs()),
                Some(RegRef::Gpr(w.rd())),
            ))
        })),
    ));

    // jalr $rs — one-operand overload, rd defaults to $ra. Registered after
    // the explicit form so it never shadows it during resolution.
    set.register(basic(
        "jalr",
        vec![T::Register],
        MATCH_OP_FUNCT | RT_FIELD | RD_FIELD | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 31, 0, funct::JALR),
        Box::new(|cx| Ok(r_type(SPECIAL, cx.reg(0)?, 0, 31, 0, funct::JALR))),
        Box::new(|w| vec![Operand::Reg(w.rs())]),
        ArchMap::all(ctor(|w| {
            Box::new(JumpReg::new(RegRef::Gpr(w.rs()), Some(RegRef::Gpr(31))))
        })),
    ));
}
