//! Operand token matching.

use rstest::rstest;

use mipsim_core::isa::operand::{parse_int, Operand, OperandType, ParseContext};

fn cx() -> ParseContext {
    ParseContext::default()
}

#[rstest]
#[case("$zero", 0)]
#[case("$at", 1)]
#[case("$v0", 2)]
#[case("$t0", 8)]
#[case("$s7", 23)]
#[case("$t8", 24)]
#[case("$sp", 29)]
#[case("$ra", 31)]
#[case("$8", 8)]
#[case("$31", 31)]
fn registers_match_by_name_and_number(#[case] token: &str, #[case] idx: u8) {
    assert_eq!(
        OperandType::Register.try_parse(token, &cx()),
        Some(Operand::Reg(idx))
    );
}

#[rstest]
#[case("t0")] // missing sigil
#[case("$t9x")]
#[case("$32")]
#[case("$f1")] // wrong file
fn bad_register_tokens_do_not_match(#[case] token: &str) {
    assert_eq!(OperandType::Register.try_parse(token, &cx()), None);
}

#[test]
fn register_sigil_set_is_configurable() {
    let cx = ParseContext {
        register_prefixes: vec!['%'],
    };
    assert_eq!(
        OperandType::Register.try_parse("%t3", &cx),
        Some(Operand::Reg(11))
    );
    assert_eq!(OperandType::Register.try_parse("$t3", &cx), None);
}

#[test]
fn float_registers_match_with_f_prefix() {
    assert_eq!(
        OperandType::FloatRegister.try_parse("$f31", &cx()),
        Some(Operand::Fpr(31))
    );
    assert_eq!(OperandType::FloatRegister.try_parse("$t0", &cx()), None);
}

#[test]
fn even_float_type_accepts_odd_registers_syntactically() {
    // Evenness is a descriptor-level encode check, so the odd register
    // still parses and the assembler can report InvalidOperand instead
    // of a mysterious no-match.
    assert_eq!(
        OperandType::EvenFloatRegister.try_parse("$f3", &cx()),
        Some(Operand::Fpr(3))
    );
}

#[rstest]
#[case("-32768", Some(-32768))]
#[case("32767", Some(32767))]
#[case("-32769", None)]
#[case("32768", None)]
#[case("0x7fff", Some(32767))]
fn signed16_is_range_checked(#[case] token: &str, #[case] expect: Option<i64>) {
    assert_eq!(
        OperandType::Signed16.try_parse(token, &cx()),
        expect.map(Operand::Imm)
    );
}

#[rstest]
#[case("0x12345678", 0x1234_5678)]
#[case("0b1010", 10)]
#[case("0o17", 15)]
#[case("-1", -1)]
#[case("+42", 42)]
fn integers_parse_radix_aware(#[case] token: &str, #[case] value: i64) {
    assert_eq!(parse_int(token), Some(value));
}

#[test]
fn labels_match_syntactically() {
    assert_eq!(
        OperandType::Label.try_parse("loop_2", &cx()),
        Some(Operand::Label("loop_2".into()))
    );
    assert_eq!(
        OperandType::Label.try_parse(".L0", &cx()),
        Some(Operand::Label(".L0".into()))
    );
    // Numeric absolute addresses are accepted too.
    assert_eq!(
        OperandType::Label.try_parse("0x00400010", &cx()),
        Some(Operand::Imm(0x0040_0010))
    );
    assert_eq!(OperandType::Label.try_parse("2bad", &cx()), None);
}

#[rstest]
#[case("8($sp)", 29, 8)]
#[case("-4($t0)", 8, -4)]
#[case("($gp)", 28, 0)]
#[case("0x10($a0)", 4, 16)]
fn register_offset_composites_parse(#[case] token: &str, #[case] base: u8, #[case] offset: i16) {
    assert_eq!(
        OperandType::RegisterOffset16.try_parse(token, &cx()),
        Some(Operand::RegOffset { base, offset })
    );
}

#[test]
fn cop0_registers_match_by_number_and_name() {
    assert_eq!(
        OperandType::Cop0Register.try_parse("$12", &cx()),
        Some(Operand::Cop0(12))
    );
    assert_eq!(
        OperandType::Cop0Register.try_parse("status", &cx()),
        Some(Operand::Cop0(12))
    );
    assert_eq!(
        OperandType::Cop0Register.try_parse("epc", &cx()),
        Some(Operand::Cop0(14))
    );
}
