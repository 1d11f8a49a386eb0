//! Instruction descriptors and the descriptor table.
//!
//! This module defines the data-driven instruction definition contract:
//! 1. **Descriptors:** One immutable record per instruction variant —
//!    mnemonic, operand-type signature, encode/decode functions, a
//!    mask/bits `matches` predicate, and a per-architecture map of
//!    execution-strategy constructors. No type per opcode: per-instruction
//!    custom logic lives in plain function values.
//! 2. **Pseudo-instructions:** Descriptors whose "encode" step is a small
//!    program producing a fixed number of basic words by reusing basic
//!    descriptors' encode functions.
//! 3. **Registry:** [`InstructionSet`] resolves mnemonic + operand tokens
//!    to the first accepting descriptor in registration order, and decoded
//!    words back to descriptors for disassembly.

use std::collections::HashMap;
use std::sync::Arc;

use crate::common::error::AssemblerErrorKind;
use crate::config::ArchKind;
use crate::exec::flight::Flight;
use crate::isa::operand::{Operand, OperandType, ParseContext};

/// Constructs the flight (phase logic) for one fetched word.
pub type FlightCtor = Arc<dyn Fn(u32) -> Box<dyn Flight> + Send + Sync>;

/// Encodes typed operands into one machine word.
pub type EncodeFn = Box<dyn Fn(&EncodeCtx<'_>) -> Result<u32, AssemblerErrorKind> + Send + Sync>;

/// Decodes a machine word back into typed operands, in signature order.
pub type DecodeFn = Box<dyn Fn(u32) -> Vec<Operand> + Send + Sync>;

/// Expands a pseudo-instruction into basic words.
pub type ExpandFn =
    Box<dyn Fn(&EncodeCtx<'_>, &InstructionSet) -> Result<Vec<u32>, AssemblerErrorKind> + Send + Sync>;

/// Per-architecture execution-strategy constructors.
///
/// Most instructions behave identically under every timing model and
/// register one constructor for all four; the map exists so a variant can
/// differ where the model demands it.
#[derive(Clone)]
pub struct ArchMap {
    single: Option<FlightCtor>,
    multi: Option<FlightCtor>,
    pipelined: Option<FlightCtor>,
    multi_alu: Option<FlightCtor>,
}

impl std::fmt::Debug for ArchMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchMap")
            .field("single", &self.single.is_some())
            .field("multi", &self.multi.is_some())
            .field("pipelined", &self.pipelined.is_some())
            .field("multi_alu", &self.multi_alu.is_some())
            .finish()
    }
}

impl ArchMap {
    /// A map with no strategies (pseudo-instructions never execute).
    pub fn empty() -> Self {
        Self {
            single: None,
            multi: None,
            pipelined: None,
            multi_alu: None,
        }
    }

    /// Registers the same constructor under every architecture tag.
    pub fn all(ctor: FlightCtor) -> Self {
        Self {
            single: Some(ctor.clone()),
            multi: Some(ctor.clone()),
            pipelined: Some(ctor.clone()),
            multi_alu: Some(ctor),
        }
    }

    /// Overrides the constructor for one architecture.
    pub fn with(mut self, arch: ArchKind, ctor: FlightCtor) -> Self {
        match arch {
            ArchKind::SingleCycle => self.single = Some(ctor),
            ArchKind::MultiCycle => self.multi = Some(ctor),
            ArchKind::Pipelined => self.pipelined = Some(ctor),
            ArchKind::MultiAlu => self.multi_alu = Some(ctor),
        }
        self
    }

    /// The constructor registered for `arch`, if any.
    pub fn get(&self, arch: ArchKind) -> Option<&FlightCtor> {
        match arch {
            ArchKind::SingleCycle => self.single.as_ref(),
            ArchKind::MultiCycle => self.multi.as_ref(),
            ArchKind::Pipelined => self.pipelined.as_ref(),
            ArchKind::MultiAlu => self.multi_alu.as_ref(),
        }
    }
}

/// Whether a descriptor is a one-word encoder or a macro expansion.
pub enum DescriptorKind {
    /// Encodes to exactly one 32-bit machine word.
    Basic {
        /// The bit-packing function.
        encode: EncodeFn,
        /// The field-unpacking function.
        decode: DecodeFn,
    },
    /// Expands to a fixed number of basic instructions at assemble time.
    Pseudo {
        /// Declared instruction count; operand-independent so addresses
        /// are computable before operand resolution.
        count: u32,
        /// The expansion program. Must compose basic descriptors only —
        /// never other pseudo-instructions.
        expand: ExpandFn,
    },
}

impl std::fmt::Debug for DescriptorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { .. } => f.write_str("Basic"),
            Self::Pseudo { count, .. } => f.debug_struct("Pseudo").field("count", count).finish(),
        }
    }
}

/// Static, immutable definition of one instruction variant.
#[derive(Debug)]
pub struct InstructionDescriptor {
    /// The assembly mnemonic.
    pub mnemonic: &'static str,
    /// Ordered operand-type signature.
    pub signature: Vec<OperandType>,
    /// Bits that must be set for a word to match this descriptor.
    pub bits: u32,
    /// Which bits of the word participate in matching. Several mnemonics
    /// share an opcode and are disambiguated by extra field constraints,
    /// i.e. a wider mask.
    pub mask: u32,
    /// Basic encoder/decoder or pseudo expansion.
    pub kind: DescriptorKind,
    /// Execution-strategy constructors by architecture.
    pub execution: ArchMap,
}

impl InstructionDescriptor {
    /// Whether a machine word decodes as this descriptor.
    ///
    /// Always false for pseudo-instructions: they exist only at assemble
    /// time.
    pub fn matches(&self, word: u32) -> bool {
        matches!(self.kind, DescriptorKind::Basic { .. }) && (word & self.mask) == self.bits
    }

    /// How many machine words this descriptor emits per source line.
    pub fn word_count(&self) -> u32 {
        match self.kind {
            DescriptorKind::Basic { .. } => 1,
            DescriptorKind::Pseudo { count, .. } => count,
        }
    }

    /// Whether the tokenized operands satisfy this signature.
    pub fn accepts(&self, tokens: &[String], cx: &ParseContext) -> Option<Vec<Operand>> {
        if tokens.len() != self.signature.len() {
            return None;
        }
        self.signature
            .iter()
            .zip(tokens)
            .map(|(ty, tok)| ty.try_parse(tok, cx))
            .collect()
    }

    /// Whether already-typed operands satisfy this signature (used when
    /// pseudo expansions hand pre-built operands to a basic descriptor).
    pub fn accepts_typed(&self, operands: &[Operand]) -> bool {
        operands.len() == self.signature.len()
            && self
                .signature
                .iter()
                .zip(operands)
                .all(|(ty, op)| ty.accepts(op))
    }
}

impl OperandType {
    /// Whether a typed operand value is admissible for this type.
    pub fn accepts(self, op: &Operand) -> bool {
        match (self, op) {
            (Self::Register, Operand::Reg(_))
            | (Self::FloatRegister | Self::EvenFloatRegister, Operand::Fpr(_))
            | (Self::Cop0Register, Operand::Cop0(_))
            | (Self::Label, Operand::Label(_))
            | (Self::RegisterOffset16, Operand::RegOffset { .. }) => true,
            (Self::Signed16, Operand::Imm(v)) => (-32768..=32767).contains(v),
            (Self::Signed32, Operand::Imm(v)) => {
                (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(v)
            }
            (Self::Unsigned5, Operand::Imm(v)) => (0..=31).contains(v),
            (Self::Unsigned16, Operand::Imm(v)) => (0..=65535).contains(v),
            (Self::Label, Operand::Imm(v)) => *v >= 0,
            _ => false,
        }
    }
}

/// Context handed to encode/expansion functions: the typed operands (with
/// labels already resolved to absolute addresses) and the instruction's
/// own address.
#[derive(Debug)]
pub struct EncodeCtx<'a> {
    /// Typed operands in signature order.
    pub operands: &'a [Operand],
    /// Byte address this instruction will occupy.
    pub addr: u32,
}

impl EncodeCtx<'_> {
    fn operand(&self, idx: usize) -> Result<&Operand, AssemblerErrorKind> {
        self.operands.get(idx).ok_or_else(|| {
            AssemblerErrorKind::InvalidOperand(format!("missing operand {idx}"))
        })
    }

    /// The general-purpose register at operand position `idx`.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the operand is not a GPR.
    pub fn reg(&self, idx: usize) -> Result<u8, AssemblerErrorKind> {
        match self.operand(idx)? {
            Operand::Reg(r) => Ok(*r),
            other => Err(AssemblerErrorKind::InvalidOperand(format!(
                "expected register, got `{other}`"
            ))),
        }
    }

    /// The COP1 register at operand position `idx`.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the operand is not a float register.
    pub fn fpr(&self, idx: usize) -> Result<u8, AssemblerErrorKind> {
        match self.operand(idx)? {
            Operand::Fpr(r) => Ok(*r),
            other => Err(AssemblerErrorKind::InvalidOperand(format!(
                "expected float register, got `{other}`"
            ))),
        }
    }

    /// The COP1 register at `idx`, validated even (double-precision slot).
    ///
    /// # Errors
    ///
    /// `InvalidOperand` for a non-float operand or an odd register.
    pub fn even_fpr(&self, idx: usize) -> Result<u8, AssemblerErrorKind> {
        let r = self.fpr(idx)?;
        if r % 2 != 0 {
            return Err(AssemblerErrorKind::InvalidOperand(format!(
                "double-precision operand requires an even register, got `$f{r}`"
            )));
        }
        Ok(r)
    }

    /// The COP0 register at operand position `idx`.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the operand is not a COP0 register.
    pub fn cop0(&self, idx: usize) -> Result<u8, AssemblerErrorKind> {
        match self.operand(idx)? {
            Operand::Cop0(r) => Ok(*r),
            other => Err(AssemblerErrorKind::InvalidOperand(format!(
                "expected COP0 register, got `{other}`"
            ))),
        }
    }

    /// The immediate at operand position `idx`.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the operand is not an immediate.
    pub fn imm(&self, idx: usize) -> Result<i64, AssemblerErrorKind> {
        match self.operand(idx)? {
            Operand::Imm(v) => Ok(*v),
            other => Err(AssemblerErrorKind::InvalidOperand(format!(
                "expected immediate, got `{other}`"
            ))),
        }
    }

    /// The base/offset pair at operand position `idx`.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the operand is not of offset(base) form.
    pub fn reg_offset(&self, idx: usize) -> Result<(u8, i16), AssemblerErrorKind> {
        match self.operand(idx)? {
            Operand::RegOffset { base, offset } => Ok((*base, *offset)),
            other => Err(AssemblerErrorKind::InvalidOperand(format!(
                "expected offset(base), got `{other}`"
            ))),
        }
    }

    /// The resolved absolute address at operand position `idx`.
    ///
    /// # Errors
    ///
    /// `LabelNotFound` if the label survived unresolved; `InvalidOperand`
    /// for a non-address operand.
    pub fn target(&self, idx: usize) -> Result<u32, AssemblerErrorKind> {
        match self.operand(idx)? {
            Operand::Imm(v) if *v >= 0 && *v <= i64::from(u32::MAX) => Ok(*v as u32),
            Operand::Label(name) => Err(AssemblerErrorKind::LabelNotFound(name.clone())),
            other => Err(AssemblerErrorKind::InvalidOperand(format!(
                "expected address, got `{other}`"
            ))),
        }
    }

    /// PC-relative branch displacement for the target at `idx`:
    /// `(target − addr − 4) >> 2`, range-checked to 16 bits.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the target is misaligned or out of branch range.
    pub fn branch_offset(&self, idx: usize) -> Result<i32, AssemblerErrorKind> {
        let target = self.target(idx)?;
        let delta = i64::from(target) - i64::from(self.addr) - 4;
        if delta % 4 != 0 {
            return Err(AssemblerErrorKind::InvalidOperand(format!(
                "branch target {target:#010x} is not word-aligned"
            )));
        }
        let words = delta >> 2;
        if !(-32768..=32767).contains(&words) {
            return Err(AssemblerErrorKind::InvalidOperand(format!(
                "branch target {target:#010x} out of 16-bit range"
            )));
        }
        Ok(words as i32)
    }

    /// Absolute 26-bit jump field for the target at `idx`, validated to
    /// share the 256 MiB region of `addr + 4`.
    ///
    /// # Errors
    ///
    /// `InvalidOperand` if the target is misaligned or in another region.
    pub fn jump_target(&self, idx: usize) -> Result<u32, AssemblerErrorKind> {
        let target = self.target(idx)?;
        if target % 4 != 0 {
            return Err(AssemblerErrorKind::InvalidOperand(format!(
                "jump target {target:#010x} is not word-aligned"
            )));
        }
        if (target & 0xF000_0000) != (self.addr.wrapping_add(4) & 0xF000_0000) {
            return Err(AssemblerErrorKind::InvalidOperand(format!(
                "jump target {target:#010x} outside the current 256 MiB region"
            )));
        }
        Ok((target >> 2) & 0x03FF_FFFF)
    }
}

/// The instruction descriptor registry for one architecture revision.
///
/// An explicit configuration object: the assembler and engine receive it
/// by reference, so multiple simulations with different instruction sets
/// can coexist.
#[derive(Debug)]
pub struct InstructionSet {
    descriptors: Vec<InstructionDescriptor>,
    by_mnemonic: HashMap<&'static str, Vec<usize>>,
    parse_cx: ParseContext,
}

impl InstructionSet {
    /// Creates an empty registry with the given parse context.
    pub fn new(parse_cx: ParseContext) -> Self {
        Self {
            descriptors: Vec::new(),
            by_mnemonic: HashMap::new(),
            parse_cx,
        }
    }

    /// Registers a descriptor. Registration order is the overload-
    /// resolution and decode priority order.
    pub fn register(&mut self, descriptor: InstructionDescriptor) {
        let idx = self.descriptors.len();
        self.by_mnemonic
            .entry(descriptor.mnemonic)
            .or_default()
            .push(idx);
        self.descriptors.push(descriptor);
    }

    /// The active parse context.
    pub fn parse_cx(&self) -> &ParseContext {
        &self.parse_cx
    }

    /// The descriptor with the given table index.
    pub fn descriptor(&self, id: usize) -> &InstructionDescriptor {
        &self.descriptors[id]
    }

    /// Iterates every registered descriptor in registration order.
    pub fn descriptors(&self) -> impl Iterator<Item = &InstructionDescriptor> {
        self.descriptors.iter()
    }

    /// Whether any descriptor carries this mnemonic.
    pub fn knows(&self, mnemonic: &str) -> bool {
        self.by_mnemonic.contains_key(mnemonic)
    }

    /// Resolves a mnemonic + operand tokens to the first descriptor whose
    /// signature accepts them, in registration order.
    pub fn resolve(&self, mnemonic: &str, tokens: &[String]) -> Option<(usize, Vec<Operand>)> {
        self.by_mnemonic.get(mnemonic)?.iter().find_map(|&id| {
            self.descriptors[id]
                .accepts(tokens, &self.parse_cx)
                .map(|ops| (id, ops))
        })
    }

    /// Finds the first basic descriptor matching a machine word, in
    /// registration order.
    pub fn find_matching(&self, word: u32) -> Option<usize> {
        self.descriptors.iter().position(|d| d.matches(word))
    }

    /// Encodes one basic instruction by mnemonic and pre-typed operands.
    ///
    /// This is the composition primitive pseudo-instruction expansions are
    /// built from; it refuses to recurse through pseudo-instructions.
    ///
    /// # Errors
    ///
    /// `BrokenInstructionSet` if no basic descriptor with this mnemonic
    /// accepts the operands — a broken instruction-set definition, fatal
    /// to assembly.
    pub fn basic_encode(
        &self,
        mnemonic: &'static str,
        operands: &[Operand],
        addr: u32,
    ) -> Result<u32, AssemblerErrorKind> {
        let candidates = self
            .by_mnemonic
            .get(mnemonic)
            .ok_or(AssemblerErrorKind::BrokenInstructionSet { mnemonic: mnemonic.into() })?;
        for &id in candidates {
            let desc = &self.descriptors[id];
            if let DescriptorKind::Basic { encode, .. } = &desc.kind {
                if desc.accepts_typed(operands) {
                    return encode(&EncodeCtx { operands, addr });
                }
            }
        }
        Err(AssemblerErrorKind::BrokenInstructionSet { mnemonic: mnemonic.into() })
    }

    /// Reverse lookup for display: decodes a word into its mnemonic and
    /// formatted operand strings.
    pub fn disassemble(&self, word: u32) -> Option<(&'static str, Vec<String>)> {
        let id = self.find_matching(word)?;
        let desc = &self.descriptors[id];
        let DescriptorKind::Basic { decode, .. } = &desc.kind else {
            return None;
        };
        let ops = decode(word).iter().map(ToString::to_string).collect();
        Some((desc.mnemonic, ops))
    }
}
