//! Shared-opcode descriptor disambiguation.
//!
//! Several mnemonics share an opcode (and even a function code) and are
//! told apart only by extra field constraints in the match mask. A word
//! satisfying one sibling's constraint must never satisfy another's.

use mipsim_core::isa::descriptor::DescriptorKind;
use mipsim_core::isa::operand::Operand;
use mipsim_core::{InstructionSet, isa::InstructionDescriptor};

const ADDR: u32 = 0x0040_0000;

fn descriptor_named<'a>(iset: &'a InstructionSet, mn: &str) -> &'a InstructionDescriptor {
    iset.descriptors()
        .find(|d| d.mnemonic == mn && matches!(d.kind, DescriptorKind::Basic { .. }))
        .unwrap_or_else(|| panic!("no basic descriptor `{mn}`"))
}

fn encode_two_reg(iset: &InstructionSet, mn: &'static str) -> u32 {
    iset.basic_encode(mn, &[Operand::Reg(9), Operand::Reg(10)], ADDR)
        .unwrap_or_else(|e| panic!("{mn}: {e}"))
}

#[test]
fn bshfl_family_is_mutually_exclusive() {
    // bitswap/wsbh/seb/seh share SPECIAL3 + BSHFL and differ only in the
    // sa field constraint.
    let iset = InstructionSet::mips32();
    let family = ["bitswap", "wsbh", "seb", "seh"];
    for a in family {
        let word = encode_two_reg(&iset, a);
        for b in family {
            let matches = descriptor_named(&iset, b).matches(word);
            assert_eq!(
                matches,
                a == b,
                "`{b}`.matches on `{a}` encoding {word:#010x}"
            );
        }
    }
}

#[test]
fn crc_families_are_mutually_exclusive() {
    let iset = InstructionSet::mips32();
    let family = ["crc32b", "crc32h", "crc32w", "crc32cb", "crc32ch", "crc32cw"];
    for a in family {
        let word = encode_two_reg(&iset, a);
        for b in family {
            let matches = descriptor_named(&iset, b).matches(word);
            assert_eq!(matches, a == b, "`{b}`.matches on `{a}` encoding");
        }
    }
}

#[test]
fn regimm_branches_disambiguate_on_rt() {
    let iset = InstructionSet::mips32();
    let bltz = iset
        .basic_encode(
            "bltz",
            &[Operand::Reg(9), Operand::Imm(i64::from(ADDR) + 8)],
            ADDR,
        )
        .unwrap_or_else(|e| panic!("bltz: {e}"));
    assert!(descriptor_named(&iset, "bltz").matches(bltz));
    assert!(!descriptor_named(&iset, "bgez").matches(bltz));
    assert!(!descriptor_named(&iset, "bltzal").matches(bltz));
}

#[test]
fn special_funct_space_is_disjoint() {
    // Every SPECIAL-opcode word produced by one descriptor matches only
    // descriptors with the same mnemonic.
    let iset = InstructionSet::mips32();
    let word = iset
        .basic_encode(
            "addu",
            &[Operand::Reg(8), Operand::Reg(9), Operand::Reg(10)],
            ADDR,
        )
        .unwrap_or_else(|e| panic!("addu: {e}"));
    for desc in iset.descriptors() {
        if desc.matches(word) {
            assert_eq!(desc.mnemonic, "addu");
        }
    }
}

#[test]
fn pseudo_descriptors_never_match_words() {
    let iset = InstructionSet::mips32();
    for desc in iset.descriptors() {
        if matches!(desc.kind, DescriptorKind::Pseudo { .. }) {
            assert!(!desc.matches(0), "pseudo {} matched a word", desc.mnemonic);
            assert!(!desc.matches(u32::MAX));
        }
    }
}
