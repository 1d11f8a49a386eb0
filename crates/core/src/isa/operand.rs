//! Operand type system.
//!
//! This module defines the operand kinds instruction signatures are built
//! from and the matching of raw source tokens into typed operand values.
//! It provides:
//! 1. **Matching Rules:** One [`OperandType`] variant per parsing rule,
//!    each with a text-matching predicate and an encoding width.
//! 2. **Typed Values:** The [`Operand`] value produced by a successful
//!    match; labels stay symbolic until the assembler's second pass.
//! 3. **No-Throw Contract:** `try_parse` never panics on ill-formed input;
//!    it returns `None` so overload resolution can try the next candidate
//!    signature.

use std::fmt;

/// Parsing context: the register-name sigil set.
///
/// Architectures can redefine the register prefix; the stock MIPS set uses
/// `$`.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Characters accepted as a register-name prefix.
    pub register_prefixes: Vec<char>,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self {
            register_prefixes: vec!['$'],
        }
    }
}

/// ABI names for the general-purpose registers, by index.
pub const GPR_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

/// Names for the modeled COP0 registers, by index.
const COP0_NAMES: [(&str, u8); 4] = [("badvaddr", 8), ("status", 12), ("cause", 13), ("epc", 14)];

/// An operand's parsing/matching rule.
///
/// Immutable; the full set is created once when the instruction set is
/// registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// A general-purpose register (`$t0`, `$8`).
    Register,
    /// A COP1 register (`$f2`).
    FloatRegister,
    /// A COP1 register that must be even at encode time (double-precision
    /// operand). Accepts any float register syntactically so the evenness
    /// check can report `InvalidOperand` instead of a silent non-match.
    EvenFloatRegister,
    /// A COP0 register (`$12`, `status`).
    Cop0Register,
    /// A 16-bit signed immediate.
    Signed16,
    /// A 32-bit immediate (signed or unsigned spelling).
    Signed32,
    /// A 5-bit unsigned immediate (shift amounts).
    Unsigned5,
    /// A 16-bit unsigned immediate (logical immediates, `lui`).
    Unsigned16,
    /// A label reference, or a bare numeric absolute address.
    Label,
    /// A base register with a signed 16-bit displacement: `off($base)`.
    RegisterOffset16,
}

/// A typed operand value produced by a successful match.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// General-purpose register index.
    Reg(u8),
    /// COP1 register index.
    Fpr(u8),
    /// COP0 register index.
    Cop0(u8),
    /// Immediate value (also a resolved label address).
    Imm(i64),
    /// Unresolved label reference; replaced by `Imm` in the encode pass.
    Label(String),
    /// Base register plus displacement.
    RegOffset {
        /// Base register index.
        base: u8,
        /// Signed byte displacement.
        offset: i16,
    },
}

impl OperandType {
    /// Attempts to match `token` against this operand type.
    ///
    /// Returns `None` on any mismatch; never panics.
    pub fn try_parse(self, token: &str, cx: &ParseContext) -> Option<Operand> {
        match self {
            Self::Register => parse_gpr(token, cx).map(Operand::Reg),
            Self::FloatRegister | Self::EvenFloatRegister => {
                parse_fpr(token, cx).map(Operand::Fpr)
            }
            Self::Cop0Register => parse_cop0(token, cx).map(Operand::Cop0),
            Self::Signed16 => parse_int(token)
                .filter(|v| (-32768..=32767).contains(v))
                .map(Operand::Imm),
            Self::Signed32 => parse_int(token)
                .filter(|v| (i64::from(i32::MIN)..=i64::from(u32::MAX)).contains(v))
                .map(Operand::Imm),
            Self::Unsigned5 => parse_int(token).filter(|v| (0..=31).contains(v)).map(Operand::Imm),
            Self::Unsigned16 => parse_int(token)
                .filter(|v| (0..=65535).contains(v))
                .map(Operand::Imm),
            Self::Label => {
                if is_label_name(token) {
                    Some(Operand::Label(token.to_owned()))
                } else {
                    parse_int(token).filter(|v| *v >= 0).map(Operand::Imm)
                }
            }
            Self::RegisterOffset16 => parse_reg_offset(token, cx),
        }
    }
}

/// Whether `name` follows label identifier syntax.
pub fn is_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '.')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

/// Radix-aware integer parsing: decimal, `0x`/`0X`, `0b`, `0o`, with an
/// optional leading sign.
pub fn parse_int(token: &str) -> Option<i64> {
    let (neg, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if body.is_empty() {
        return None;
    }
    let lower = body.to_ascii_lowercase();
    let magnitude = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else {
        lower.parse::<i64>().ok()?
    };
    Some(if neg { -magnitude } else { magnitude })
}

fn strip_prefix<'t>(token: &'t str, cx: &ParseContext) -> Option<&'t str> {
    let first = token.chars().next()?;
    if cx.register_prefixes.contains(&first) {
        Some(&token[first.len_utf8()..])
    } else {
        None
    }
}

/// Parses a general-purpose register token: sigil + numeric index or ABI
/// name.
pub fn parse_gpr(token: &str, cx: &ParseContext) -> Option<u8> {
    let body = strip_prefix(token, cx)?;
    if let Ok(idx) = body.parse::<u8>() {
        return (idx < 32).then_some(idx);
    }
    GPR_NAMES
        .iter()
        .position(|name| *name == body)
        .map(|idx| idx as u8)
}

/// Parses a COP1 register token: sigil + `f` + index.
pub fn parse_fpr(token: &str, cx: &ParseContext) -> Option<u8> {
    let body = strip_prefix(token, cx)?;
    let idx = body.strip_prefix('f')?.parse::<u8>().ok()?;
    (idx < 32).then_some(idx)
}

/// Parses a COP0 register token: sigil + numeric index, or a bare name
/// (`status`, `cause`, `epc`, `badvaddr`).
pub fn parse_cop0(token: &str, cx: &ParseContext) -> Option<u8> {
    if let Some(body) = strip_prefix(token, cx) {
        if let Ok(idx) = body.parse::<u8>() {
            return (idx < 32).then_some(idx);
        }
    }
    let lower = token.to_ascii_lowercase();
    COP0_NAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, idx)| *idx)
}

fn parse_reg_offset(token: &str, cx: &ParseContext) -> Option<Operand> {
    let open = token.find('(')?;
    if !token.ends_with(')') {
        return None;
    }
    let offset_text = &token[..open];
    let base_text = &token[open + 1..token.len() - 1];
    let offset = if offset_text.is_empty() {
        0
    } else {
        i16::try_from(parse_int(offset_text)?).ok()?
    };
    let base = parse_gpr(base_text, cx)?;
    Some(Operand::RegOffset { base, offset })
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(i) => write!(f, "${}", GPR_NAMES[*i as usize]),
            Self::Fpr(i) => write!(f, "$f{i}"),
            Self::Cop0(i) => write!(f, "${i}"),
            Self::Imm(v) => write!(f, "{v}"),
            Self::Label(name) => write!(f, "{name}"),
            Self::RegOffset { base, offset } => {
                write!(f, "{}(${})", offset, GPR_NAMES[*base as usize])
            }
        }
    }
}
