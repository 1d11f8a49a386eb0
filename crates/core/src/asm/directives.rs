//! Directive set.
//!
//! An explicit registry of the assembler directives for the active
//! architecture revision. The assembler consumes it as an opaque lookup
//! table; nothing here is hard-coded into the passes.

use std::collections::HashMap;

use crate::common::error::AssemblerErrorKind;
use crate::isa::operand::parse_int;

/// Which segment a section directive selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Instruction segment.
    Text,
    /// Data segment.
    Data,
}

/// What a directive does to the layout.
#[derive(Debug, Clone, Copy)]
pub enum DirectiveAction {
    /// Switches the active segment.
    Section(Segment),
    /// Emits bytes into the data segment.
    Emit {
        /// Byte size of the emission, for the layout pass.
        size: fn(&[String]) -> Result<u32, AssemblerErrorKind>,
        /// The bytes themselves, for the encode pass.
        bytes: fn(&[String]) -> Result<Vec<u8>, AssemblerErrorKind>,
    },
    /// Aligns the data address to `2^n`.
    Align,
    /// Declares a symbol global; no layout effect.
    Globl,
}

/// The directive registry.
#[derive(Debug, Clone, Default)]
pub struct DirectiveSet {
    map: HashMap<&'static str, DirectiveAction>,
}

impl DirectiveSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a directive by name (including the leading dot).
    pub fn register(&mut self, name: &'static str, action: DirectiveAction) {
        let _ = self.map.insert(name, action);
    }

    /// Looks up a directive.
    pub fn get(&self, name: &str) -> Option<DirectiveAction> {
        self.map.get(name).copied()
    }

    /// The stock MIPS32 directive set.
    pub fn mips32() -> Self {
        let mut set = Self::new();
        set.register(".text", DirectiveAction::Section(Segment::Text));
        set.register(".data", DirectiveAction::Section(Segment::Data));
        set.register(
            ".word",
            DirectiveAction::Emit {
                size: |args| Ok(4 * args.len() as u32),
                bytes: |args| emit_scalars(args, 4),
            },
        );
        set.register(
            ".half",
            DirectiveAction::Emit {
                size: |args| Ok(2 * args.len() as u32),
                bytes: |args| emit_scalars(args, 2),
            },
        );
        set.register(
            ".byte",
            DirectiveAction::Emit {
                size: |args| Ok(args.len() as u32),
                bytes: |args| emit_scalars(args, 1),
            },
        );
        set.register(
            ".float",
            DirectiveAction::Emit {
                size: |args| Ok(4 * args.len() as u32),
                bytes: |args| {
                    let mut out = Vec::new();
                    for arg in args {
                        let v: f32 = arg.parse().map_err(|_| bad_scalar(arg))?;
                        out.extend_from_slice(&v.to_bits().to_le_bytes());
                    }
                    Ok(out)
                },
            },
        );
        set.register(
            ".double",
            DirectiveAction::Emit {
                size: |args| Ok(8 * args.len() as u32),
                bytes: |args| {
                    let mut out = Vec::new();
                    for arg in args {
                        let v: f64 = arg.parse().map_err(|_| bad_scalar(arg))?;
                        out.extend_from_slice(&v.to_bits().to_le_bytes());
                    }
                    Ok(out)
                },
            },
        );
        set.register(
            ".ascii",
            DirectiveAction::Emit {
                size: |args| string_bytes(args).map(|b| b.len() as u32),
                bytes: |args| string_bytes(args),
            },
        );
        set.register(
            ".asciiz",
            DirectiveAction::Emit {
                size: |args| string_bytes(args).map(|b| b.len() as u32 + 1),
                bytes: |args| {
                    let mut bytes = string_bytes(args)?;
                    bytes.push(0);
                    Ok(bytes)
                },
            },
        );
        set.register(
            ".space",
            DirectiveAction::Emit {
                size: space_size,
                bytes: |args| Ok(vec![0; space_size(args)? as usize]),
            },
        );
        set.register(".align", DirectiveAction::Align);
        set.register(".globl", DirectiveAction::Globl);
        set
    }
}

fn bad_scalar(arg: &str) -> AssemblerErrorKind {
    AssemblerErrorKind::InvalidOperand(format!("bad data value `{arg}`"))
}

/// Parses one integer or character-literal data value.
pub fn parse_scalar(arg: &str) -> Result<i64, AssemblerErrorKind> {
    if let Some(body) = arg.strip_prefix('\'').and_then(|a| a.strip_suffix('\'')) {
        let c = unescape_char(body).ok_or_else(|| bad_scalar(arg))?;
        return Ok(i64::from(c));
    }
    parse_int(arg).ok_or_else(|| bad_scalar(arg))
}

fn emit_scalars(args: &[String], width: usize) -> Result<Vec<u8>, AssemblerErrorKind> {
    let mut out = Vec::with_capacity(args.len() * width);
    for arg in args {
        let v = parse_scalar(arg)?;
        out.extend_from_slice(&(v as u64).to_le_bytes()[..width]);
    }
    Ok(out)
}

fn space_size(args: &[String]) -> Result<u32, AssemblerErrorKind> {
    let [arg] = args else {
        return Err(AssemblerErrorKind::InvalidOperand(
            ".space takes exactly one size".into(),
        ));
    };
    parse_scalar(arg).and_then(|v| {
        u32::try_from(v).map_err(|_| bad_scalar(arg))
    })
}

fn unescape_char(body: &str) -> Option<u8> {
    let mut chars = body.chars();
    let first = chars.next()?;
    let c = if first == '\\' {
        match chars.next()? {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            '0' => 0,
            '\\' => b'\\',
            '\'' => b'\'',
            '"' => b'"',
            _ => return None,
        }
    } else {
        u8::try_from(first as u32).ok()?
    };
    chars.next().is_none().then_some(c)
}

/// Concatenates the unescaped bytes of every quoted argument.
fn string_bytes(args: &[String]) -> Result<Vec<u8>, AssemblerErrorKind> {
    let mut out = Vec::new();
    for arg in args {
        let body = arg
            .strip_prefix('"')
            .and_then(|a| a.strip_suffix('"'))
            .ok_or_else(|| {
                AssemblerErrorKind::InvalidOperand(format!("expected string literal, got `{arg}`"))
            })?;
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let escaped = chars.next().ok_or_else(|| {
                    AssemblerErrorKind::InvalidOperand("dangling escape in string".into())
                })?;
                out.push(match escaped {
                    'n' => b'\n',
                    't' => b'\t',
                    'r' => b'\r',
                    '0' => 0,
                    '\\' => b'\\',
                    '"' => b'"',
                    other => {
                        return Err(AssemblerErrorKind::InvalidOperand(format!(
                            "unknown escape `\\{other}`"
                        )))
                    }
                });
            } else {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
    Ok(out)
}
