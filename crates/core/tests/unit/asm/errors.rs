//! Assembler diagnostic taxonomy.
//!
//! Assembly accumulates diagnostics across the whole program; each test
//! checks both the kind and the source line it is anchored to.

use crate::common::assemble_err;
use mipsim_core::common::error::AssemblerErrorKind;

#[test]
fn unknown_mnemonic_is_instruction_not_found() {
    let errors = assemble_err("frobnicate $t0, $t1\n");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 1);
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::InstructionNotFound(name) if name == "frobnicate"
    ));
}

#[test]
fn known_mnemonic_with_bad_operands_is_invalid_parameter() {
    // `add` exists but no signature takes an immediate in the third slot
    // out of 16-bit range... or a float register.
    let errors = assemble_err("add $t0, $t1, $f2\n");
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::InvalidInstructionParameter { mnemonic } if mnemonic == "add"
    ));
}

#[test]
fn unknown_directive_is_directive_not_found() {
    let errors = assemble_err(".frob 1, 2\n");
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::DirectiveNotFound(name) if name == ".frob"
    ));
}

#[test]
fn undefined_label_is_label_not_found() {
    let errors = assemble_err("beq $t0, $zero, nowhere\n");
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::LabelNotFound(name) if name == "nowhere"
    ));
}

#[test]
fn duplicate_label_reports_the_winning_definition() {
    let errors = assemble_err(
        "here: addiu $t0, $zero, 1\n\
         here: addiu $t1, $zero, 2\n",
    );
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].line, 2);
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::DuplicateLabel { label, first_line: 1 } if label == "here"
    ));
}

#[test]
fn bad_label_syntax_is_reported() {
    let errors = assemble_err("2start: addiu $t0, $zero, 1\n");
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::IllegalLabelSyntax(name) if name == "2start"
    ));
}

#[test]
fn odd_double_register_is_invalid_operand_at_encode_time() {
    let errors = assemble_err("add.d $f1, $f2, $f4\n");
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::InvalidOperand(_)
    ));
}

#[test]
fn branch_out_of_range_is_invalid_operand() {
    // A numeric absolute target far beyond 16-bit displacement reach.
    let errors = assemble_err("beq $t0, $zero, 0x00600000\n");
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::InvalidOperand(_)
    ));
}

#[test]
fn diagnostics_accumulate_across_lines() {
    let errors = assemble_err(
        "frobnicate $t0\n\
         addiu $t0, $zero, 1\n\
         .frob\n\
         beq $t0, $zero, nowhere\n",
    );
    let lines: Vec<usize> = errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 3, 4]);
}

#[test]
fn instructions_in_data_segment_are_rejected() {
    let errors = assemble_err(
        ".data\n\
         addiu $t0, $zero, 1\n",
    );
    assert!(matches!(
        &errors[0].kind,
        AssemblerErrorKind::InvalidOperand(_)
    ));
}
