//! Assembled program representation.

use std::collections::HashMap;
use std::sync::Arc;

use crate::isa::descriptor::InstructionSet;

/// One encoded machine word, with its descriptor back-reference and
/// originating source line for diagnostics. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembledInstruction {
    /// The 32-bit encoding.
    pub word: u32,
    /// Index of the descriptor this word was encoded by (or re-matched
    /// to, for pseudo-expansion products).
    pub descriptor: usize,
    /// 1-based source line.
    pub line: usize,
    /// Byte address in the text segment.
    pub addr: u32,
}

/// One assembled data segment block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataBlock {
    /// Placement address.
    pub addr: u32,
    /// Raw little-endian bytes.
    pub bytes: Vec<u8>,
}

/// A fully assembled program: ordered instruction words, the label table,
/// and the data image. Consumed read-only by the execution engine.
#[derive(Debug, Clone)]
pub struct Program {
    /// Encoded instructions in address order.
    pub text: Vec<AssembledInstruction>,
    /// Resolved label addresses.
    pub labels: HashMap<String, u32>,
    /// Data segment image.
    pub data: Vec<DataBlock>,
    /// First instruction address.
    pub text_base: u32,
    /// Execution entry point (`main` if defined, else the text base).
    pub entry: u32,
    /// The instruction set this program was assembled against.
    pub iset: Arc<InstructionSet>,
}

impl Program {
    /// The label table, for navigation and highlighting.
    pub fn labels(&self) -> &HashMap<String, u32> {
        &self.labels
    }

    /// One-past-the-end address of the text segment.
    pub fn text_end(&self) -> u32 {
        self.text_base + 4 * self.text.len() as u32
    }

    /// The instruction at a byte address, if it falls inside the text
    /// segment.
    pub fn at(&self, addr: u32) -> Option<&AssembledInstruction> {
        if addr < self.text_base || addr % 4 != 0 {
            return None;
        }
        self.text.get(((addr - self.text_base) / 4) as usize)
    }
}
