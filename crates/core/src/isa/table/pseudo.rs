//! Pseudo-instruction descriptors.
//!
//! Each expansion is a small program over basic descriptors, looked up by
//! mnemonic + typed operands through `InstructionSet::basic_encode` —
//! never through another pseudo-instruction. Every expansion reports a
//! fixed, operand-independent word count so the layout pass can place
//! addresses before operand values are known. In particular `li` is
//! always two words even when the immediate's upper half is zero.

use crate::common::constants::REG_AT;
use crate::common::error::AssemblerErrorKind;
use crate::isa::descriptor::{EncodeCtx, InstructionSet};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::pseudo_def;

/// Builds the lui+ori pair that materializes a 32-bit constant in `rt`.
fn load_upper_lower(
    set: &InstructionSet,
    rt: u8,
    value: u32,
    addr: u32,
) -> Result<Vec<u32>, AssemblerErrorKind> {
    let hi = i64::from(value >> 16);
    let lo = i64::from(value & 0xFFFF);
    Ok(vec![
        set.basic_encode("lui", &[Operand::Reg(rt), Operand::Imm(hi)], addr)?,
        set.basic_encode(
            "ori",
            &[Operand::Reg(rt), Operand::Reg(rt), Operand::Imm(lo)],
            addr.wrapping_add(4),
        )?,
    ])
}

/// Builds the slt+branch pair behind `blt`/`bgt`/`ble`/`bge`.
fn cmp_and_branch(
    set: &InstructionSet,
    cx: &EncodeCtx<'_>,
    swap: bool,
    branch: &'static str,
) -> Result<Vec<u32>, AssemblerErrorKind> {
    let a = cx.reg(0)?;
    let b = cx.reg(1)?;
    let target = cx.target(2)?;
    let (lhs, rhs) = if swap { (b, a) } else { (a, b) };
    Ok(vec![
        set.basic_encode(
            "slt",
            &[Operand::Reg(REG_AT), Operand::Reg(lhs), Operand::Reg(rhs)],
            cx.addr,
        )?,
        set.basic_encode(
            branch,
            &[
                Operand::Reg(REG_AT),
                Operand::Reg(0),
                Operand::Imm(i64::from(target)),
            ],
            cx.addr.wrapping_add(4),
        )?,
    ])
}

pub(super) fn register(set: &mut InstructionSet) {
    set.register(pseudo_def(
        "li",
        vec![T::Register, T::Signed32],
        2,
        Box::new(|cx, set| load_upper_lower(set, cx.reg(0)?, cx.imm(1)? as u32, cx.addr)),
    ));

    set.register(pseudo_def(
        "la",
        vec![T::Register, T::Label],
        2,
        Box::new(|cx, set| load_upper_lower(set, cx.reg(0)?, cx.target(1)?, cx.addr)),
    ));

    set.register(pseudo_def(
        "move",
        vec![T::Register, T::Register],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "addu",
                &[Operand::Reg(cx.reg(0)?), Operand::Reg(cx.reg(1)?), Operand::Reg(0)],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "nop",
        vec![],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "sll",
                &[Operand::Reg(0), Operand::Reg(0), Operand::Imm(0)],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "not",
        vec![T::Register, T::Register],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "nor",
                &[Operand::Reg(cx.reg(0)?), Operand::Reg(cx.reg(1)?), Operand::Reg(0)],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "neg",
        vec![T::Register, T::Register],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "sub",
                &[Operand::Reg(cx.reg(0)?), Operand::Reg(0), Operand::Reg(cx.reg(1)?)],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "negu",
        vec![T::Register, T::Register],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "subu",
                &[Operand::Reg(cx.reg(0)?), Operand::Reg(0), Operand::Reg(cx.reg(1)?)],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "b",
        vec![T::Label],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "beq",
                &[
                    Operand::Reg(0),
                    Operand::Reg(0),
                    Operand::Imm(i64::from(cx.target(0)?)),
                ],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "beqz",
        vec![T::Register, T::Label],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "beq",
                &[
                    Operand::Reg(cx.reg(0)?),
                    Operand::Reg(0),
                    Operand::Imm(i64::from(cx.target(1)?)),
                ],
                cx.addr,
            )?])
        }),
    ));

    set.register(pseudo_def(
        "bnez",
        vec![T::Register, T::Label],
        1,
        Box::new(|cx, set| {
            Ok(vec![set.basic_encode(
                "bne",
                &[
                    Operand::Reg(cx.reg(0)?),
                    Operand::Reg(0),
                    Operand::Imm(i64::from(cx.target(1)?)),
                ],
                cx.addr,
            )?])
        }),
    ));

    let three = vec![T::Register, T::Register, T::Label];
    set.register(pseudo_def(
        "blt",
        three.clone(),
        2,
        Box::new(|cx, set| cmp_and_branch(set, cx, false, "bne")),
    ));
    set.register(pseudo_def(
        "bgt",
        three.clone(),
        2,
        Box::new(|cx, set| cmp_and_branch(set, cx, true, "bne")),
    ));
    set.register(pseudo_def(
        "bge",
        three.clone(),
        2,
        Box::new(|cx, set| cmp_and_branch(set, cx, false, "beq")),
    ));
    set.register(pseudo_def(
        "ble",
        three,
        2,
        Box::new(|cx, set| cmp_and_branch(set, cx, true, "beq")),
    ));
}
