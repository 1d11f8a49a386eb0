//! System descriptors: syscall, break, conditional traps, COP0 moves,
//! and the CRC32 families.

use crate::arch::RegRef;
use crate::exec::flights::alu::UnReg;
use crate::exec::flights::sys::{Break, Crc, Syscall, TrapCmp};
use crate::isa::descriptor::{ArchMap, InstructionDescriptor, InstructionSet};
use crate::isa::fields::{r_type, InstructionBits, MATCH_OP_FUNCT, MATCH_OP_RS};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::codes::{
    cop, funct, special3, COP0, CRC32C_POLY, CRC32_POLY, SPECIAL, SPECIAL3,
};
use crate::isa::table::{basic, ctor, RD_FIELD, SHAMT_FIELD};

/// `mn $rs, $rt` — conditional trap.
fn trap(mn: &'static str, f: u32, cond: fn(u32, u32) -> bool) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT,
        r_type(SPECIAL, 0, 0, 0, 0, f),
        Box::new(move |cx| Ok(r_type(SPECIAL, cx.reg(0)?, cx.reg(1)?, 0, 0, f))),
        Box::new(|w| vec![Operand::Reg(w.rs()), Operand::Reg(w.rt())]),
        ArchMap::all(ctor(move |w| {
            Box::new(TrapCmp::new(RegRef::Gpr(w.rs()), RegRef::Gpr(w.rt()), cond))
        })),
    )
}

/// `mn $rt, $rs` — CRC accumulate step with a fixed width and polynomial.
fn crc(mn: &'static str, sz: u8, castagnoli: bool) -> InstructionDescriptor {
    let sa = if castagnoli { special3::C_FLAG | sz } else { sz };
    let poly = if castagnoli { CRC32C_POLY } else { CRC32_POLY };
    let bytes = 1 << sz;
    basic(
        mn,
        vec![T::Register, T::Register],
        MATCH_OP_FUNCT | RD_FIELD | SHAMT_FIELD,
        r_type(SPECIAL3, 0, 0, 0, sa, special3::CRC),
        Box::new(move |cx| Ok(r_type(SPECIAL3, cx.reg(1)?, cx.reg(0)?, 0, sa, special3::CRC))),
        Box::new(|w| vec![Operand::Reg(w.rt()), Operand::Reg(w.rs())]),
        ArchMap::all(ctor(move |w| {
            Box::new(Crc::new(
                RegRef::Gpr(w.rt()),
                RegRef::Gpr(w.rs()),
                bytes,
                poly,
            ))
        })),
    )
}

/// `mfc0 $rt, $rd` / `mtc0 $rt, $rd`.
fn cop0_move(mn: &'static str, sub: u8, to_cop0: bool) -> InstructionDescriptor {
    basic(
        mn,
        vec![T::Register, T::Cop0Register],
        MATCH_OP_RS | SHAMT_FIELD | 0x3F,
        r_type(COP0, sub, 0, 0, 0, 0),
        Box::new(move |cx| Ok(r_type(COP0, sub, cx.reg(0)?, cx.cop0(1)?, 0, 0))),
        Box::new(|w| vec![Operand::Reg(w.rt()), Operand::Cop0(w.rd())]),
        ArchMap::all(ctor(move |w| {
            if to_cop0 {
                Box::new(UnReg::new(RegRef::Cop0(w.rd()), RegRef::Gpr(w.rt()), |v| v))
            } else {
                Box::new(UnReg::new(RegRef::Gpr(w.rt()), RegRef::Cop0(w.rd()), |v| v))
            }
        })),
    )
}

pub(super) fn register(set: &mut InstructionSet) {
    // syscall — the code field (bits 6-25) is not part of the match.
    set.register(basic(
        "syscall",
        vec![],
        MATCH_OP_FUNCT,
        r_type(SPECIAL, 0, 0, 0, 0, funct::SYSCALL),
        Box::new(|_| Ok(r_type(SPECIAL, 0, 0, 0, 0, funct::SYSCALL))),
        Box::new(|_| vec![]),
        ArchMap::all(ctor(|_| Box::new(Syscall::new()))),
    ));

    set.register(basic(
        "break",
        vec![],
        MATCH_OP_FUNCT,
        r_type(SPECIAL, 0, 0, 0, 0, funct::BREAK),
        Box::new(|_| Ok(r_type(SPECIAL, 0, 0, 0, 0, funct::BREAK))),
        Box::new(|_| vec![]),
        ArchMap::all(ctor(|w| Box::new(Break::new((w >> 6) & 0xFFFFF)))),
    ));

    set.register(trap("teq", funct::TEQ, |a, b| a == b));
    set.register(trap("tne", funct::TNE, |a, b| a != b));
    set.register(trap("tlt", funct::TLT, |a, b| (a as i32) < (b as i32)));
    set.register(trap("tltu", funct::TLTU, |a, b| a < b));
    set.register(trap("tge", funct::TGE, |a, b| (a as i32) >= (b as i32)));
    set.register(trap("tgeu", funct::TGEU, |a, b| a >= b));

    set.register(cop0_move("mfc0", cop::MF, false));
    set.register(cop0_move("mtc0", cop::MT, true));

    set.register(crc("crc32b", special3::SZ_BYTE, false));
    set.register(crc("crc32h", special3::SZ_HALF, false));
    set.register(crc("crc32w", special3::SZ_WORD, false));
    set.register(crc("crc32cb", special3::SZ_BYTE, true));
    set.register(crc("crc32ch", special3::SZ_HALF, true));
    set.register(crc("crc32cw", special3::SZ_WORD, true));
}
