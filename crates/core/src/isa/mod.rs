//! Instruction set: operand typing, descriptors, encode/decode.
//!
//! This module defines the instruction encode/decode abstraction:
//! 1. **Fields:** Bit extraction and packing for the MIPS32 R/I/J formats.
//! 2. **Operands:** The operand type system matching raw source tokens.
//! 3. **Descriptors:** Data-driven instruction definitions and the
//!    registry with overload resolution and reverse lookup.
//! 4. **Table:** The registered MIPS32 mnemonics, grouped by opcode family.

/// Descriptor records and the instruction-set registry.
pub mod descriptor;

/// Bit-field extraction and packing.
pub mod fields;

/// Operand types and token matching.
pub mod operand;

/// The registered MIPS32 descriptor table.
pub mod table;

pub use descriptor::{ArchMap, DescriptorKind, EncodeCtx, InstructionDescriptor, InstructionSet};
pub use fields::InstructionBits;
pub use operand::{Operand, OperandType, ParseContext};
