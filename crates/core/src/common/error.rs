//! Assembly-time and run-time error definitions.
//!
//! This module defines the two error taxonomies of the simulator:
//! 1. **Assembly errors:** Recoverable diagnostics carrying a source line;
//!    the assembler accumulates as many as possible in one run.
//! 2. **Run-time errors:** Fatal to the current run (the stepping loop
//!    halts) but recoverable at the session level via `reset()`.

use thiserror::Error;

/// A single assembler diagnostic, anchored to its source line.
///
/// Assembly does not stop at the first problem: the assembler walks the
/// whole program and reports every diagnostic it can, so one bad line does
/// not hide the rest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct AssemblerError {
    /// 1-based source line the diagnostic refers to.
    pub line: usize,
    /// What went wrong.
    pub kind: AssemblerErrorKind,
}

/// Assembly-time error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerErrorKind {
    /// No descriptor with this mnemonic accepts the operands on the line.
    #[error("no instruction `{0}` matches these operands")]
    InstructionNotFound(String),

    /// The directive name is not registered in the active directive set.
    #[error("unknown directive `{0}`")]
    DirectiveNotFound(String),

    /// A label operand never resolved against the label table.
    #[error("label `{0}` is not defined")]
    LabelNotFound(String),

    /// A label was defined more than once. The first definition wins for
    /// address resolution; every later definition reports this diagnostic.
    #[error("label `{label}` already defined on line {first_line}")]
    DuplicateLabel {
        /// The offending label name.
        label: String,
        /// Line of the definition that won.
        first_line: usize,
    },

    /// A label definition does not follow identifier syntax.
    #[error("illegal label syntax `{0}`")]
    IllegalLabelSyntax(String),

    /// An operand parsed, but the chosen descriptor rejected it at encode
    /// time (range overflow, odd register for a double operand, ...).
    #[error("invalid operand: {0}")]
    InvalidOperand(String),

    /// No signature of any candidate descriptor accepted the operand list.
    #[error("operands do not match any form of `{mnemonic}`")]
    InvalidInstructionParameter {
        /// Mnemonic whose candidates were tried.
        mnemonic: String,
    },

    /// A pseudo-instruction expansion needed a basic primitive that is not
    /// registered. This is a broken instruction-set definition, not a user
    /// input error, and aborts assembly immediately.
    #[error("instruction set is missing basic primitive `{mnemonic}`")]
    BrokenInstructionSet {
        /// The missing primitive mnemonic.
        mnemonic: String,
    },
}

impl AssemblerErrorKind {
    /// Whether this diagnostic invalidates the instruction set itself and
    /// must abort assembly rather than be accumulated.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::BrokenInstructionSet { .. })
    }
}

/// Faults raised by data memory on bad accesses.
///
/// Out-of-range and misaligned accesses are error conditions, never
/// silent wrap-around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// The access touches bytes at or beyond the configured ceiling.
    #[error("address {addr:#010x} outside addressable memory (limit {limit:#010x})")]
    OutOfRange {
        /// First byte of the offending access.
        addr: u32,
        /// Exclusive upper bound of the address space.
        limit: u32,
    },

    /// The address is not a multiple of the access width.
    #[error("misaligned {required}-byte access at {addr:#010x}")]
    Misaligned {
        /// The offending address.
        addr: u32,
        /// Required alignment in bytes.
        required: u32,
    },
}

/// Run-time error taxonomy.
///
/// Each variant halts the current run when it propagates out of a pipeline
/// phase; the simulation object remains valid for `reset()`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Two's-complement overflow in a trapping arithmetic instruction
    /// (`add`, `addi`, `sub`).
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// An explicit trap instruction fired.
    #[error("trap")]
    TrapException,

    /// A `break` instruction was executed.
    #[error("breakpoint (code {0})")]
    Break(u32),

    /// The word matches no registered instruction, or the architecture has
    /// no execution strategy for it.
    #[error("reserved instruction {word:#010x}")]
    ReservedInstruction {
        /// The undecodable encoding.
        word: u32,
    },

    /// A double-precision operand named an odd COP1 register.
    #[error("double-precision operand requires an even register, got $f{0}")]
    EvenRegisterViolation(u8),

    /// A data memory access failed.
    #[error(transparent)]
    Memory(#[from] MemoryError),

    /// The program counter left the text segment without an exit syscall.
    #[error("program counter {0:#010x} outside the text segment")]
    PcOutOfText(u32),

    /// The injected syscall handler failed.
    #[error("syscall failed: {0}")]
    Syscall(String),
}

/// A run-time error annotated with the faulting instruction.
///
/// This is what `Simulation::step`/`run` surface: the raw fault plus the
/// address and mnemonic needed to point back at the source program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{mnemonic} at {addr:#010x}: {kind}")]
pub struct ExecutionFault {
    /// Address of the faulting instruction.
    pub addr: u32,
    /// Mnemonic of the faulting instruction.
    pub mnemonic: String,
    /// The underlying fault.
    pub kind: RuntimeError,
}
