//! The MIPS32 descriptor table.
//!
//! One file per instruction group, mirroring how the hardware manuals
//! carve the opcode space. Everything here is mechanical registration
//! data: the interesting machinery lives in `isa::descriptor` (matching,
//! overload resolution) and `exec::flights` (phase semantics).
//!
//! Registration order matters twice: it is the overload-resolution
//! priority for assembly and the match priority for disassembly. Groups
//! register basics first; pseudo-instructions come last so they can
//! compose any basic primitive.

use std::sync::Arc;

use crate::exec::flight::Flight;
use crate::isa::descriptor::{
    ArchMap, DescriptorKind, EncodeFn, FlightCtor, InstructionDescriptor, InstructionSet,
};
use crate::isa::fields::{REG_MASK, RD_SHIFT, RS_SHIFT, RT_SHIFT, SHAMT_SHIFT};
use crate::isa::operand::{OperandType, ParseContext};

mod alu;
mod branch;
mod codes;
mod fp;
mod loadstore;
mod muldiv;
mod pseudo;
mod sys;

/// Bit mask of the `rs` field position.
pub(super) const RS_FIELD: u32 = REG_MASK << RS_SHIFT;
/// Bit mask of the `rt` field position.
pub(super) const RT_FIELD: u32 = REG_MASK << RT_SHIFT;
/// Bit mask of the `rd` field position.
pub(super) const RD_FIELD: u32 = REG_MASK << RD_SHIFT;
/// Bit mask of the `shamt` field position.
pub(super) const SHAMT_FIELD: u32 = REG_MASK << SHAMT_SHIFT;

/// Wraps a flight-constructor closure.
pub(super) fn ctor<F>(f: F) -> FlightCtor
where
    F: Fn(u32) -> Box<dyn Flight> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Builds a basic descriptor.
pub(super) fn basic(
    mnemonic: &'static str,
    signature: Vec<OperandType>,
    mask: u32,
    bits: u32,
    encode: EncodeFn,
    decode: crate::isa::descriptor::DecodeFn,
    execution: ArchMap,
) -> InstructionDescriptor {
    InstructionDescriptor {
        mnemonic,
        signature,
        bits,
        mask,
        kind: DescriptorKind::Basic { encode, decode },
        execution,
    }
}

/// Builds a pseudo descriptor.
pub(super) fn pseudo_def(
    mnemonic: &'static str,
    signature: Vec<OperandType>,
    count: u32,
    expand: crate::isa::descriptor::ExpandFn,
) -> InstructionDescriptor {
    InstructionDescriptor {
        mnemonic,
        signature,
        bits: 0,
        mask: 0,
        kind: DescriptorKind::Pseudo { count, expand },
        execution: ArchMap::empty(),
    }
}

impl InstructionSet {
    /// Builds the stock MIPS32 instruction set.
    pub fn mips32() -> Arc<Self> {
        let mut set = Self::new(ParseContext::default());
        alu::register(&mut set);
        muldiv::register(&mut set);
        branch::register(&mut set);
        loadstore::register(&mut set);
        sys::register(&mut set);
        fp::register(&mut set);
        pseudo::register(&mut set);
        Arc::new(set)
    }
}
