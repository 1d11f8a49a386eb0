//! Two-pass assembler.
//!
//! Pass 1 (**layout**) walks every line in program order, determines each
//! statement's descriptor and word count (1 for basic, the declared N for
//! pseudo), accumulates running addresses, and records label definitions.
//! Pass 2 (**encode**) resolves label operands against the now-complete
//! table and invokes each descriptor's encode/expansion function.
//!
//! Diagnostics accumulate: assembly walks the whole program and reports
//! every error it can in one run. The only early exit is a fatal
//! instruction-set integrity error (a pseudo expansion missing its basic
//! primitive), which indicates broken configuration rather than bad user
//! input.

use std::sync::Arc;

use tracing::debug;

use crate::asm::directives::{DirectiveAction, DirectiveSet, Segment};
use crate::asm::lexer;
use crate::asm::program::{AssembledInstruction, DataBlock, Program};
use crate::asm::symbols::LabelTable;
use crate::common::error::{AssemblerError, AssemblerErrorKind};
use crate::config::MemoryConfig;
use crate::isa::descriptor::{DescriptorKind, EncodeCtx, InstructionSet};
use crate::isa::operand::{is_label_name, Operand};

struct PendingInstr {
    line: usize,
    addr: u32,
    desc: usize,
    operands: Vec<Operand>,
}

struct PendingData {
    line: usize,
    addr: u32,
    action: DirectiveAction,
    args: Vec<String>,
}

#[derive(Default)]
struct Diagnostics {
    errors: Vec<AssemblerError>,
    fatal: bool,
}

impl Diagnostics {
    fn push(&mut self, line: usize, kind: AssemblerErrorKind) {
        self.fatal |= kind.is_fatal();
        self.errors.push(AssemblerError { line, kind });
    }
}

/// Assembles MIPS source text into a [`Program`].
///
/// The instruction and directive sets are explicit configuration: callers
/// can assemble against different architecture revisions side by side.
///
/// # Errors
///
/// The accumulated diagnostics if any line failed; each carries its source
/// line and error kind.
pub fn assemble(
    source: &str,
    iset: &Arc<InstructionSet>,
    dset: &DirectiveSet,
    memory: &MemoryConfig,
) -> Result<Program, Vec<AssemblerError>> {
    let lines = lexer::lex(source);
    let mut diags = Diagnostics::default();
    let mut labels = LabelTable::new();
    let mut pending_text: Vec<PendingInstr> = Vec::new();
    let mut pending_data: Vec<PendingData> = Vec::new();

    // Layout pass: addresses and label definitions.
    let mut segment = Segment::Text;
    let mut text_addr = memory.text_base;
    let mut data_addr = memory.data_base;
    for line in &lines {
        if let Some(label) = &line.label {
            if is_label_name(label) {
                let addr = match segment {
                    Segment::Text => text_addr,
                    Segment::Data => data_addr,
                };
                if let Err(kind) = labels.define(label, addr, line.number) {
                    diags.push(line.number, kind);
                }
            } else {
                diags.push(
                    line.number,
                    AssemblerErrorKind::IllegalLabelSyntax(label.clone()),
                );
            }
        }

        let Some(stmt) = &line.statement else {
            continue;
        };

        if stmt.is_directive() {
            match dset.get(&stmt.name) {
                None => diags.push(
                    line.number,
                    AssemblerErrorKind::DirectiveNotFound(stmt.name.clone()),
                ),
                Some(DirectiveAction::Section(seg)) => segment = seg,
                Some(DirectiveAction::Globl) => {}
                Some(DirectiveAction::Align) => match align_amount(&stmt.args) {
                    Ok(pow) => data_addr = align_up(data_addr, pow),
                    Err(kind) => diags.push(line.number, kind),
                },
                Some(action @ DirectiveAction::Emit { size, .. }) => {
                    if segment != Segment::Data {
                        diags.push(
                            line.number,
                            AssemblerErrorKind::InvalidOperand(format!(
                                "`{}` is only valid in the .data segment",
                                stmt.name
                            )),
                        );
                        continue;
                    }
                    match size(&stmt.args) {
                        Ok(len) => {
                            pending_data.push(PendingData {
                                line: line.number,
                                addr: data_addr,
                                action,
                                args: stmt.args.clone(),
                            });
                            data_addr += len;
                        }
                        Err(kind) => diags.push(line.number, kind),
                    }
                }
            }
            continue;
        }

        if segment != Segment::Text {
            diags.push(
                line.number,
                AssemblerErrorKind::InvalidOperand(format!(
                    "instruction `{}` in the .data segment",
                    stmt.name
                )),
            );
            continue;
        }
        if !iset.knows(&stmt.name) {
            diags.push(
                line.number,
                AssemblerErrorKind::InstructionNotFound(stmt.name.clone()),
            );
            continue;
        }
        match iset.resolve(&stmt.name, &stmt.args) {
            None => diags.push(
                line.number,
                AssemblerErrorKind::InvalidInstructionParameter {
                    mnemonic: stmt.name.clone(),
                },
            ),
            Some((desc, operands)) => {
                let count = iset.descriptor(desc).word_count();
                pending_text.push(PendingInstr {
                    line: line.number,
                    addr: text_addr,
                    desc,
                    operands,
                });
                text_addr += 4 * count;
            }
        }
    }

    // Encode pass: label resolution and word emission.
    let mut text: Vec<AssembledInstruction> = Vec::with_capacity(pending_text.len());
    for pending in &pending_text {
        let Some(operands) = resolve_labels(&pending.operands, &labels, pending.line, &mut diags)
        else {
            continue;
        };
        let cx = EncodeCtx {
            operands: &operands,
            addr: pending.addr,
        };
        let descriptor = iset.descriptor(pending.desc);
        match &descriptor.kind {
            DescriptorKind::Basic { encode, .. } => match encode(&cx) {
                Ok(word) => text.push(AssembledInstruction {
                    word,
                    descriptor: pending.desc,
                    line: pending.line,
                    addr: pending.addr,
                }),
                Err(kind) => diags.push(pending.line, kind),
            },
            DescriptorKind::Pseudo { count, expand } => match expand(&cx, iset.as_ref()) {
                Ok(words) => {
                    if words.len() as u32 != *count {
                        diags.push(
                            pending.line,
                            AssemblerErrorKind::BrokenInstructionSet {
                                mnemonic: descriptor.mnemonic.into(),
                            },
                        );
                        continue;
                    }
                    for (i, word) in words.iter().enumerate() {
                        let addr = pending.addr + 4 * i as u32;
                        match iset.find_matching(*word) {
                            Some(basic) => text.push(AssembledInstruction {
                                word: *word,
                                descriptor: basic,
                                line: pending.line,
                                addr,
                            }),
                            None => diags.push(
                                pending.line,
                                AssemblerErrorKind::BrokenInstructionSet {
                                    mnemonic: descriptor.mnemonic.into(),
                                },
                            ),
                        }
                    }
                }
                Err(kind) => diags.push(pending.line, kind),
            },
        }
        if diags.fatal {
            return Err(diags.errors);
        }
    }

    let mut data: Vec<DataBlock> = Vec::with_capacity(pending_data.len());
    for pending in &pending_data {
        let DirectiveAction::Emit { bytes, .. } = pending.action else {
            continue;
        };
        match bytes(&pending.args) {
            Ok(bytes) => data.push(DataBlock {
                addr: pending.addr,
                bytes,
            }),
            Err(kind) => diags.push(pending.line, kind),
        }
    }

    if !diags.errors.is_empty() {
        return Err(diags.errors);
    }

    let entry = labels.lookup("main").unwrap_or(memory.text_base);
    debug!(
        instructions = text.len(),
        data_blocks = data.len(),
        entry = format_args!("{entry:#010x}"),
        "assembly complete"
    );
    Ok(Program {
        text,
        labels: labels.to_map(),
        data,
        text_base: memory.text_base,
        entry,
        iset: Arc::clone(iset),
    })
}

/// Replaces label operands with their resolved absolute addresses.
/// Returns `None` (after reporting) if any label is undefined.
fn resolve_labels(
    operands: &[Operand],
    labels: &LabelTable,
    line: usize,
    diags: &mut Diagnostics,
) -> Option<Vec<Operand>> {
    let mut resolved = Vec::with_capacity(operands.len());
    for op in operands {
        match op {
            Operand::Label(name) => match labels.lookup(name) {
                Some(addr) => resolved.push(Operand::Imm(i64::from(addr))),
                None => {
                    diags.push(line, AssemblerErrorKind::LabelNotFound(name.clone()));
                    return None;
                }
            },
            other => resolved.push(other.clone()),
        }
    }
    Some(resolved)
}

fn align_amount(args: &[String]) -> Result<u32, AssemblerErrorKind> {
    let [arg] = args else {
        return Err(AssemblerErrorKind::InvalidOperand(
            ".align takes exactly one power of two".into(),
        ));
    };
    crate::asm::directives::parse_scalar(arg).and_then(|v| {
        if (0..=16).contains(&v) {
            Ok(v as u32)
        } else {
            Err(AssemblerErrorKind::InvalidOperand(format!(
                "bad alignment `{arg}`"
            )))
        }
    })
}

fn align_up(addr: u32, pow: u32) -> u32 {
    let mask = (1 << pow) - 1;
    (addr + mask) & !mask
}
