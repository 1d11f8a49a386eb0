//! Reverse lookup (disassembly) formatting.

use pretty_assertions::assert_eq;

use mipsim_core::isa::operand::Operand;
use mipsim_core::InstructionSet;

const ADDR: u32 = 0x0040_0000;

fn disasm(iset: &InstructionSet, word: u32) -> String {
    let (mn, ops) = iset
        .disassemble(word)
        .unwrap_or_else(|| panic!("{word:#010x} did not disassemble"));
    if ops.is_empty() {
        mn.to_owned()
    } else {
        format!("{mn} {}", ops.join(", "))
    }
}

#[test]
fn formats_register_forms_with_abi_names() {
    let iset = InstructionSet::mips32();
    let word = iset
        .basic_encode(
            "addu",
            &[Operand::Reg(8), Operand::Reg(0), Operand::Reg(9)],
            ADDR,
        )
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(disasm(&iset, word), "addu $t0, $zero, $t1");
}

#[test]
fn formats_immediates_and_offsets() {
    let iset = InstructionSet::mips32();
    let addiu = iset
        .basic_encode(
            "addiu",
            &[Operand::Reg(8), Operand::Reg(0), Operand::Imm(-5)],
            ADDR,
        )
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(disasm(&iset, addiu), "addiu $t0, $zero, -5");

    let lw = iset
        .basic_encode(
            "lw",
            &[
                Operand::Reg(9),
                Operand::RegOffset {
                    base: 29,
                    offset: 16,
                },
            ],
            ADDR,
        )
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(disasm(&iset, lw), "lw $t1, 16($sp)");
}

#[test]
fn the_zero_word_is_the_canonical_nop() {
    let iset = InstructionSet::mips32();
    assert_eq!(disasm(&iset, 0), "sll $zero, $zero, 0");
}

#[test]
fn unknown_words_do_not_disassemble() {
    let iset = InstructionSet::mips32();
    // Opcode 0x3F is unassigned in this table.
    assert!(iset.disassemble(0xFC00_0000).is_none());
}

#[test]
fn every_basic_descriptor_disassembles_to_its_mnemonic() {
    let iset = InstructionSet::mips32();
    let mut seen = 0;
    for desc in iset.descriptors() {
        let mipsim_core::isa::DescriptorKind::Basic { encode, .. } = &desc.kind else {
            continue;
        };
        let ops: Vec<Operand> = desc
            .signature
            .iter()
            .map(|ty| match ty {
                mipsim_core::isa::OperandType::Register => Operand::Reg(1),
                mipsim_core::isa::OperandType::FloatRegister
                | mipsim_core::isa::OperandType::EvenFloatRegister => Operand::Fpr(2),
                mipsim_core::isa::OperandType::Cop0Register => Operand::Cop0(13),
                mipsim_core::isa::OperandType::Label => Operand::Imm(i64::from(ADDR)),
                mipsim_core::isa::OperandType::RegisterOffset16 => {
                    Operand::RegOffset { base: 1, offset: 1 }
                }
                _ => Operand::Imm(1),
            })
            .collect();
        let cx = mipsim_core::isa::EncodeCtx {
            operands: &ops,
            addr: ADDR,
        };
        let Ok(word) = encode(&cx) else {
            panic!("{} refused canonical operands", desc.mnemonic)
        };
        let (mn, _) = iset
            .disassemble(word)
            .unwrap_or_else(|| panic!("{} encoding lost", desc.mnemonic));
        assert_eq!(mn, desc.mnemonic);
        seen += 1;
    }
    assert!(seen > 60);
}
