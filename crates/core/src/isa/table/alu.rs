//! Integer ALU descriptors: three-register forms, shifts, immediates,
//! count-leading, and the BSHFL byte-shuffle family.

use crate::arch::RegRef;
use crate::exec::flights::alu::{
    add_trapping, bitswap, sub_trapping, wsbh, AluResult, BinImm, BinReg, UnReg,
};
use crate::isa::descriptor::{ArchMap, InstructionDescriptor, InstructionSet};
use crate::isa::fields::{r_type, i_type, InstructionBits, MATCH_OP, MATCH_OP_FUNCT};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::codes::{funct, op, special2, special3, SPECIAL, SPECIAL2, SPECIAL3};
use crate::isa::table::{basic, ctor, RS_FIELD, SHAMT_FIELD};

/// `mn $rd, $rs, $rt` — R-type, shamt zero.
fn r3(mn: &'static str, f: u32, alu: fn(u32, u32) -> AluResult) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register, T::Register],
        MATCH_OP_FUNCT | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL, cx.reg(1)?, cx.reg(2)?, cx.reg(0)?, 0, f))),
        Box::new(|w| {
            vec![
                Operand::Reg(w.rd()),
                Operand::Reg(w.rs()),
                Operand::Reg(w.rt()),
            ]
        }),
        ArchMap::all(ctor(move |w| {
            Box::new(BinReg::new(
                RegRef::Gpr(w.rd()),
                RegRef::Gpr(w.rs()),
                RegRef::Gpr(w.rt()),
                alu,
            ))
        })),
    )
}

/// `mn $rd, $rt, shamt` — constant shift, rs zero.
fn shift_imm(mn: &'static str, f: u32, alu: fn(u32, i32) -> AluResult) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register, T::Unsigned5],
        MATCH_OP_FUNCT | RS_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| {
            Ok(r_type(
                SPECIAL,
                0,
                cx.reg(1)?,
                cx.reg(0)?,
                cx.imm(2)? as u8,
                f,
            ))
        }),
        Box::new(|w| {
            vec![
                Operand::Reg(w.rd()),
                Operand::Reg(w.rt()),
                Operand::Imm(i64::from(w.shamt())),
            ]
        }),
        ArchMap::all(ctor(move |w| {
            Box::new(BinImm::new(
                RegRef::Gpr(w.rd()),
                RegRef::Gpr(w.rt()),
                i32::from(w.shamt()),
                alu,
            ))
        })),
    )
}

/// `mn $rd, $rt, $rs` — variable shift by the low five bits of rs.
fn shift_reg(mn: &'static str, f: u32, alu: fn(u32, u32) -> AluResult) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register, T::Register],
        MATCH_OP_FUNCT | SHAMT_FIELD,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL, cx.reg(2)?, cx.reg(1)?, cx.reg(0)?, 0, f))),
        Box::new(|w| {
            vec![
                Operand::Reg(w.rd()),
                Operand::Reg(w.rt()),
                Operand::Reg(w.rs()),
            ]
        }),
        ArchMap::all(ctor(move |w| {
            Box::new(BinReg::new(
                RegRef::Gpr(w.rd()),
                RegRef::Gpr(w.rt()),
                RegRef::Gpr(w.rs()),
                alu,
            ))
        })),
    )
}

/// `mn $rt, $rs, imm` — I-type with a signed or unsigned immediate type.
fn i_form(
    mn: &'static str,
    opcode: u32,
    imm_type: T,
    alu: fn(u32, i32) -> AluResult,
) -> InstructionDescriptor {
    let unsigned = imm_type == T::Unsigned16;
    basic(
        mn,
        vec![T::Register, T::Register, imm_type],
        MATCH_OP,
        i_type(opcode, 0, 0, 0),
        Box::new(move |cx| Ok(i_type(opcode, cx.reg(1)?, cx.reg(0)?, cx.imm(2)? as i32))),
        Box::new(move |w| {
            let imm = if unsigned {
                i64::from(w.uimm16())
            } else {
                i64::from(w.imm16())
            };
            vec![Operand::Reg(w.rt()), Operand::Reg(w.rs()), Operand::Imm(imm)]
        }),
        ArchMap::all(ctor(move |w| {
            let imm = if unsigned {
                w.uimm16() as i32
            } else {
                w.imm16()
            };
            Box::new(BinImm::new(RegRef::Gpr(w.rt()), RegRef::Gpr(w.rs()), imm, alu))
        })),
    )
}

/// `mn $rd, $rs` — SPECIAL2 count-leading (rt mirrors rd in the encoding).
fn count_leading(mn: &'static str, f: u32, alu: fn(u32) -> u32) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT | SHAMT_FIELD,
        r_type(SPECIAL2, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL2, cx.reg(1)?, cx.reg(0)?, cx.reg(0)?, 0, f))),
        Box::new(|w| vec![Operand::Reg(w.rd()), Operand::Reg(w.rs())]),
        ArchMap::all(ctor(move |w| {
            Box::new(UnReg::new(RegRef::Gpr(w.rd()), RegRef::Gpr(w.rs()), alu))
        })),
    )
}

/// `mn $rd, $rt` — BSHFL family, disambiguated from its siblings by the
/// `sa` field constraint.
fn bshfl(mn: &'static str, sa: u8, alu: fn(u32) -> u32) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT | RS_FIELD | SHAMT_FIELD,
        r_type(SPECIAL3, 0, 0, 0, sa, special3::BSHFL),
        Box::new(move |cx| Ok(r_type(SPECIAL3, 0, cx.reg(1)?, cx.reg(0)?, sa, special3::BSHFL))),
        Box::new(|w| vec![Operand::Reg(w.rd()), Operand::Reg(w.rt())]),
        ArchMap::all(ctor(move |w| {
            Box::new(UnReg::new(RegRef::Gpr(w.rd()), RegRef::Gpr(w.rt()), alu))
        })),
    )
}

pub(super) fn register(set: &mut InstructionSet) {
    // Shifts first: the all-zero word must decode as `sll` (canonical nop).
    set.register(shift_imm("sll", funct::SLL, |a, sa| Ok(a << (sa & 31))));
    set.register(shift_imm("srl", funct::SRL, |a, sa| Ok(a >> (sa & 31))));
    set.register(shift_imm("sra", funct::SRA, |a, sa| {
        Ok(((a as i32) >> (sa & 31)) as u32)
    }));
    set.register(shift_reg("sllv", funct::SLLV, |a, s| Ok(a << (s & 31))));
    set.register(shift_reg("srlv", funct::SRLV, |a, s| Ok(a >> (s & 31))));
    set.register(shift_reg("srav", funct::SRAV, |a, s| {
        Ok(((a as i32) >> (s & 31)) as u32)
    }));

    set.register(r3("add", funct::ADD, add_trapping));
    set.register(r3("addu", funct::ADDU, |a, b| Ok(a.wrapping_add(b))));
    set.register(r3("sub", funct::SUB, sub_trapping));
    set.register(r3("subu", funct::SUBU, |a, b| Ok(a.wrapping_sub(b))));
    set.register(r3("and", funct::AND, |a, b| Ok(a & b)));
    set.register(r3("or", funct::OR, |a, b| Ok(a | b)));
    set.register(r3("xor", funct::XOR, |a, b| Ok(a ^ b)));
    set.register(r3("nor", funct::NOR, |a, b| Ok(!(a | b))));
    set.register(r3("slt", funct::SLT, |a, b| {
        Ok(u32::from((a as i32) < (b as i32)))
    }));
    // Unsigned comparison is zero-extended comparison of the raw words.
    set.register(r3("sltu", funct::SLTU, |a, b| Ok(u32::from(a < b))));

    set.register(i_form("addi", op::ADDI, T::Signed16, |a, imm| {
        add_trapping(a, imm as u32)
    }));
    set.register(i_form("addiu", op::ADDIU, T::Signed16, |a, imm| {
        Ok(a.wrapping_add(imm as u32))
    }));
    set.register(i_form("slti", op::SLTI, T::Signed16, |a, imm| {
        Ok(u32::from((a as i32) < imm))
    }));
    set.register(i_form("sltiu", op::SLTIU, T::Signed16, |a, imm| {
        // Immediate sign-extends, then compares unsigned.
        Ok(u32::from(a < imm as u32))
    }));
    set.register(i_form("andi", op::ANDI, T::Unsigned16, |a, imm| {
        Ok(a & imm as u32)
    }));
    set.register(i_form("ori", op::ORI, T::Unsigned16, |a, imm| {
        Ok(a | imm as u32)
    }));
    set.register(i_form("xori", op::XORI, T::Unsigned16, |a, imm| {
        Ok(a ^ imm as u32)
    }));

    // lui $rt, imm — rs is zero in the encoding.
    set.register(basic(
        "lui",
        vec![T::Register, T::Unsigned16],
        MATCH_OP | RS_FIELD,
        i_type(op::LUI, 0, 0, 0),
        Box::new(|cx| Ok(i_type(op::LUI, 0, cx.reg(0)?, cx.imm(1)? as i32))),
        Box::new(|w| vec![Operand::Reg(w.rt()), Operand::Imm(i64::from(w.uimm16()))]),
        ArchMap::all(ctor(|w| {
            Box::new(BinImm::new(
                RegRef::Gpr(w.rt()),
                RegRef::Gpr(0),
                w.uimm16() as i32,
                |_, imm| Ok((imm as u32) << 16),
            ))
        })),
    ));

    set.register(count_leading("clz", special2::CLZ, u32::leading_zeros));
    set.register(count_leading("clo", special2::CLO, u32::leading_ones));

    set.register(bshfl("bitswap", special3::SA_BITSWAP, bitswap));
    set.register(bshfl("wsbh", special3::SA_WSBH, wsbh));
    set.register(bshfl("seb", special3::SA_SEB, |v| i32::from(v as u8 as i8) as u32));
    set.register(bshfl("seh", special3::SA_SEH, |v| {
        i32::from(v as u16 as i16) as u32
    }));
}
