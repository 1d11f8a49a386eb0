//! HI/LO multiply/divide descriptors and the accumulator moves.

use crate::arch::RegRef;
use crate::exec::flights::alu::{BinReg, UnReg};
use crate::exec::flights::muldiv::{div, divu, mult, multu, HiLoOp, MulAcc, MulDiv};
use crate::isa::descriptor::{ArchMap, InstructionDescriptor, InstructionSet};
use crate::isa::fields::{r_type, InstructionBits, MATCH_OP_FUNCT};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::codes::{funct, special2, SPECIAL, SPECIAL2};
use crate::isa::table::{basic, ctor, RD_FIELD, RS_FIELD, RT_FIELD, SHAMT_FIELD};

/// `mn $rs, $rt` — writes HI:LO, rd and shamt zero.
fn hilo(mn: &'static str, f: u32, hilo_op: HiLoOp) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT | RD_FIELD | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL, cx.reg(0)?, cx.reg(1)?, 0, 0, f))),
        Box::new(|w| vec![Operand::Reg(w.rs()), Operand::Reg(w.rt())]),
        ArchMap::all(ctor(move |w| {
            Box::new(MulDiv::new(RegRef::Gpr(w.rs()), RegRef::Gpr(w.rt()), hilo_op))
        })),
    )
}

/// `mn $rs, $rt` — SPECIAL2 fused accumulate into HI:LO.
fn acc(mn: &'static str, f: u32, signed: bool, subtract: bool) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT | RD_FIELD | SHAMT_FIELD,
        r_type(SPECIAL2, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL2, cx.reg(0)?, cx.reg(1)?, 0, 0, f))),
        Box::new(|w| vec![Operand::Reg(w.rs()), Operand::Reg(w.rt())]),
        ArchMap::all(ctor(move |w| {
            Box::new(MulAcc::new(
                RegRef::Gpr(w.rs()),
                RegRef::Gpr(w.rt()),
                signed,
                subtract,
            ))
        })),
    )
}

/// `mfhi $rd` / `mflo $rd`.
fn move_from(mn: &'static str, f: u32, src: RegRef) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register],
        MATCH_OP_FUNCT | RS_FIELD | RT_FIELD | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL, 0, 0, cx.reg(0)?, 0, f))),
        Box::new(|w| vec![Operand::Reg(w.rd())]),
        ArchMap::all(ctor(move |w| {
            Box::new(UnReg::new(RegRef::Gpr(w.rd()), src, |v| v))
        })),
    )
}

/// `mthi $rs` / `mtlo $rs`.
fn move_to(mn: &'static str, f: u32, dst: RegRef) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register],
        MATCH_OP_FUNCT | RT_FIELD | RD_FIELD | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL, cx.reg(0)?, 0, 0, 0, f))),
        Box::new(|w| vec![Operand::Reg(w.rs())]),
        ArchMap::all(ctor(move |w| {
            Box::new(UnReg::new(dst, RegRef::Gpr(w.rs()), |v| v))
        })),
    )
}

pub(super) fn register(set: &mut InstructionSet) {
    set.register(hilo("mult", funct::MULT, mult));
    set.register(hilo("multu", funct::MULTU, multu));
    set.register(hilo("div", funct::DIV, div));
    set.register(hilo("divu", funct::DIVU, divu));

    set.register(move_from("mfhi", funct::MFHI, RegRef::Hi));
    set.register(move_from("mflo", funct::MFLO, RegRef::Lo));
    set.register(move_to("mthi", funct::MTHI, RegRef::Hi));
    set.register(move_to("mtlo", funct::MTLO, RegRef::Lo));

    // mul $rd, $rs, $rt: the SPECIAL2 low-word product, rd-only.
    set.register(basic(
        "mul",
        vec![T::Register, T::Register, T::Register],
        MATCH_OP_FUNCT | SHAMT_FIELD,
        r_type(SPECIAL2, 0, 0, 0, 0, special2::MUL),
        Box::new(|cx| {
            Ok(r_type(
                SPECIAL2,
                cx.reg(1)?,
                cx.reg(2)?,
                cx.reg(0)?,
                0,
                special2::MUL,
            ))
        }),
        Box::new(|w| {
            vec![
                Operand::Reg(w.rd()),
                Operand::Reg(w.rs()),
                Operand::Reg(w.rt()),
            ]
        }),
        ArchMap::all(ctor(|w| {
            Box::new(BinReg::new(
                RegRef::Gpr(w.rd()),
                RegRef::Gpr(w.rs()),
                RegRef::Gpr(w.rt()),
                |a, b| Ok(a.wrapping_mul(b)),
            ))
        })),
    ));

    set.register(acc("madd", special2::MADD, true, false));
    set.register(acc("maddu", special2::MADDU, false, false));
    set.register(acc("msub", special2::MSUB, true, true));
    set.register(acc("msubu", special2::MSUBU, false, true));
}
