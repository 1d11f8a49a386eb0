//! Load and store descriptors, integer and COP1.

use crate::arch::RegRef;
use crate::exec::flights::mem::{Load, LoadDouble, LoadKind, Store, StoreDouble, StoreKind};
use crate::isa::descriptor::{ArchMap, FlightCtor, InstructionDescriptor, InstructionSet};
use crate::isa::fields::{i_type, InstructionBits, MATCH_OP};
use crate::isa::operand::{Operand, OperandType as T};
use crate::isa::table::codes::op;
use crate::isa::table::{basic, ctor};

/// Builds one `mn $rt, offset($base)` descriptor over any register file.
fn access(mn: &'static str, opcode: u32, reg_type: T, flight: FlightCtor) -> InstructionDescriptor {
    let operand = move |idx: u8| match reg_type {
        T::FloatRegister | T::EvenFloatRegister => Operand::Fpr(idx),
        _ => Operand::Reg(idx),
    };
    basic(
        mn,
        vec![reg_type, T::RegisterOffset16],
        MATCH_OP,
        i_type(opcode, 0, 0, 0),
        Box::new(move |cx| {
            let rt = match reg_type {
                T::FloatRegister => cx.fpr(0)?,
                T::EvenFloatRegister => cx.even_fpr(0)?,
                _ => cx.reg(0)?,
            };
            let (base, offset) = cx.reg_offset(1)?;
            Ok(i_type(opcode, base, rt, i32::from(offset)))
        }),
        Box::new(move |w| {
            vec![
                operand(w.rt()),
                Operand::RegOffset {
                    base: w.rs(),
                    offset: w.imm16() as i16,
                },
            ]
        }),
        ArchMap::all(flight),
    )
}

fn load(mn: &'static str, opcode: u32, kind: LoadKind) -> InstructionDescriptor {
    access(
        mn,
        opcode,
        T::Register,
        ctor(move |w| {
            Box::new(Load::new(
                RegRef::Gpr(w.rt()),
                RegRef::Gpr(w.rs()),
                w.imm16() as i16,
                kind,
            ))
        }),
    )
}

fn store(mn: &'static str, opcode: u32, kind: StoreKind) -> InstructionDescriptor {
    access(
        mn,
        opcode,
        T::Register,
        ctor(move |w| {
            Box::new(Store::new(
                RegRef::Gpr(w.rt()),
                RegRef::Gpr(w.rs()),
                w.imm16() as i16,
                kind,
            ))
        }),
    )
}

pub(super) fn register(set: &mut InstructionSet) {
    set.register(load("lb", op::LB, LoadKind::ByteSigned));
    set.register(load("lbu", op::LBU, LoadKind::ByteUnsigned));
    set.register(load("lh", op::LH, LoadKind::HalfSigned));
    set.register(load("lhu", op::LHU, LoadKind::HalfUnsigned));
    set.register(load("lw", op::LW, LoadKind::Word));
    set.register(store("sb", op::SB, StoreKind::Byte));
    set.register(store("sh", op::SH, StoreKind::Half));
    set.register(store("sw", op::SW, StoreKind::Word));

    set.register(access(
        "lwc1",
        op::LWC1,
        T::FloatRegister,
        ctor(|w| {
            Box::new(Load::new(
                RegRef::Fpr(w.rt()),
                RegRef::Gpr(w.rs()),
                w.imm16() as i16,
                LoadKind::Word,
            ))
        }),
    ));
    set.register(access(
        "swc1",
        op::SWC1,
        T::FloatRegister,
        ctor(|w| {
            Box::new(Store::new(
                RegRef::Fpr(w.rt()),
                RegRef::Gpr(w.rs()),
                w.imm16() as i16,
                StoreKind::Word,
            ))
        }),
    ));
    set.register(access(
        "ldc1",
        op::LDC1,
        T::EvenFloatRegister,
        ctor(|w| Box::new(LoadDouble::new(w.rt(), RegRef::Gpr(w.rs()), w.imm16() as i16))),
    ));
    set.register(access(
        "sdc1",
        op::SDC1,
        T::EvenFloatRegister,
        ctor(|w| Box::new(StoreDouble::new(w.rt(), RegRef::Gpr(w.rs()), w.imm16() as i16))),
    ));
}
