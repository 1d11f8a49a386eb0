//! Two-pass label resolution.

use pretty_assertions::assert_eq;

use crate::common::assemble_ok;
use mipsim_core::isa::InstructionBits;

const TEXT_BASE: u32 = 0x0040_0000;

#[test]
fn labels_resolve_to_word_addresses_in_program_order() {
    let program = assemble_ok(
        "main: addiu $t0, $zero, 5\n\
         loop: addiu $t0, $t0, -1\n\
               bne $t0, $zero, loop\n\
         end:  sw $t0, 0($zero)\n",
    );
    assert_eq!(program.labels()["main"], TEXT_BASE);
    assert_eq!(program.labels()["loop"], TEXT_BASE + 4);
    assert_eq!(program.labels()["end"], TEXT_BASE + 12);
    assert_eq!(program.entry, TEXT_BASE);
}

#[test]
fn forward_and_backward_references_use_the_same_offset_rule() {
    // Branch at word 0 forward to a label at word 2: displacement +1.
    let forward = assemble_ok(
        "start: beq $zero, $zero, target\n\
               addiu $t0, $zero, 1\n\
         target: addiu $t1, $zero, 2\n",
    );
    assert_eq!(forward.text[0].word.imm16(), 1);

    // The same shape reordered so the branch at word 2 references the
    // label at word 0: displacement -3 under the same
    // (target - addr - 4) >> 2 rule.
    let backward = assemble_ok(
        "target: addiu $t1, $zero, 2\n\
               addiu $t0, $zero, 1\n\
         start: beq $zero, $zero, target\n",
    );
    assert_eq!(backward.text[2].word.imm16(), -3);
}

#[test]
fn branch_to_next_line_is_displacement_zero() {
    let program = assemble_ok(
        "      beq $zero, $zero, next\n\
         next: addiu $t0, $zero, 1\n",
    );
    assert_eq!(program.text[0].word.imm16(), 0);
}

#[test]
fn jump_targets_encode_word_addresses() {
    let program = assemble_ok(
        "main: j main\n",
    );
    assert_eq!(program.text[0].word.target26(), TEXT_BASE >> 2);
}

#[test]
fn labels_in_data_segment_resolve_to_data_addresses() {
    let program = assemble_ok(
        ".data\n\
         first: .word 1, 2, 3\n\
         second: .word 4\n\
         .text\n\
         main: lw $t0, 0($zero)\n",
    );
    assert_eq!(program.labels()["first"], 0x1001_0000);
    assert_eq!(program.labels()["second"], 0x1001_000C);
}

#[test]
fn entry_defaults_to_text_base_without_main() {
    let program = assemble_ok("addiu $t0, $zero, 1\n");
    assert_eq!(program.entry, TEXT_BASE);
}

#[test]
fn labels_pass_resolves_addresses_before_any_encode() {
    // A pseudo-instruction between the branch and its target keeps two
    // words of distance even though the operand is not yet resolved when
    // the layout pass assigns addresses.
    let program = assemble_ok(
        "      beq $zero, $zero, after\n\
               li $t0, 0x12345678\n\
         after: addiu $t1, $zero, 1\n",
    );
    // beq at word 0, li occupies words 1-2, target at word 3.
    assert_eq!(program.text.len(), 4);
    assert_eq!(program.text[0].word.imm16(), 2);
    assert_eq!(program.labels()["after"], TEXT_BASE + 12);
}
