//! Line lexing.

use pretty_assertions::assert_eq;

use mipsim_core::asm::lexer::{lex_line, Statement};

#[test]
fn comments_truncate_in_all_three_styles() {
    for source in [
        "addiu $t0, $zero, 1 # trailing",
        "addiu $t0, $zero, 1 ; trailing",
        "addiu $t0, $zero, 1 // trailing",
    ] {
        let line = lex_line(1, source);
        let stmt = line.statement.unwrap_or_else(|| panic!("no statement"));
        assert_eq!(stmt.name, "addiu");
        assert_eq!(stmt.args, vec!["$t0", "$zero", "1"]);
    }
}

#[test]
fn label_and_statement_share_a_line() {
    let line = lex_line(3, "loop: beq $t0, $zero, end");
    assert_eq!(line.label.as_deref(), Some("loop"));
    let stmt = line.statement.unwrap_or_else(|| panic!("no statement"));
    assert_eq!(stmt.name, "beq");
    assert_eq!(stmt.args.len(), 3);
}

#[test]
fn bare_label_line() {
    let line = lex_line(1, "end:");
    assert_eq!(line.label.as_deref(), Some("end"));
    assert_eq!(line.statement, None);
}

#[test]
fn dotted_mnemonics_are_not_labels() {
    let line = lex_line(1, "c.eq.s $f0, $f2");
    assert_eq!(line.label, None);
    let stmt = line.statement.unwrap_or_else(|| panic!("no statement"));
    assert_eq!(stmt.name, "c.eq.s");
}

#[test]
fn quoted_strings_survive_commas_colons_and_comment_starters() {
    let line = lex_line(1, r#".asciiz "a, b: # not a comment""#);
    let stmt = line.statement.unwrap_or_else(|| panic!("no statement"));
    assert_eq!(stmt.name, ".asciiz");
    assert_eq!(stmt.args, vec![r#""a, b: # not a comment""#]);
}

#[test]
fn mnemonics_fold_to_lower_case() {
    let line = lex_line(1, "ADDIU $t0, $zero, 1");
    assert_eq!(
        line.statement,
        Some(Statement {
            name: "addiu".into(),
            args: vec!["$t0".into(), "$zero".into(), "1".into()],
        })
    );
}

#[test]
fn blank_and_comment_only_lines_lex_to_nothing() {
    for source in ["", "   ", "# whole line", "; whole line"] {
        let line = lex_line(1, source);
        assert_eq!(line.label, None);
        assert_eq!(line.statement, None);
    }
}
