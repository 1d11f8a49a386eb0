//! CRC32 and bitswap bit-level semantics.

use pretty_assertions::assert_eq;

use crate::common::{final_registers, ALL_ARCHS, T0, T2};
use mipsim_core::exec::flights::alu::{bitswap, wsbh};
use mipsim_core::exec::flights::sys::crc_update;

const CRC32_POLY: u32 = 0xEDB8_8320;
const CRC32C_POLY: u32 = 0x82F6_3B78;

#[test]
fn crc_update_matches_the_reference_vector() {
    // Standard CRC-32 of "a": init all-ones, final xor all-ones.
    let crc = crc_update(0xFFFF_FFFF, u32::from(b'a'), 1, CRC32_POLY) ^ 0xFFFF_FFFF;
    assert_eq!(crc, 0xE8B7_BE43);
}

#[test]
fn crc_update_over_a_word_equals_four_byte_steps() {
    let word = 0x6162_6364; // "dcba" in memory order
    let by_word = crc_update(0xFFFF_FFFF, word, 4, CRC32_POLY);
    let mut by_bytes = 0xFFFF_FFFF;
    for i in 0..4 {
        by_bytes = crc_update(by_bytes, (word >> (8 * i)) & 0xFF, 1, CRC32_POLY);
    }
    assert_eq!(by_word, by_bytes);
}

#[test]
fn castagnoli_polynomial_differs() {
    let classic = crc_update(0, 0xAB, 1, CRC32_POLY);
    let castagnoli = crc_update(0, 0xAB, 1, CRC32C_POLY);
    assert_ne!(classic, castagnoli);
}

#[test]
fn crc_instructions_accumulate_in_rt() {
    // CRC-32 of "a" through the instruction pair: seed all-ones, update
    // with one byte, xor out.
    let source = "\
main: li     $t0, -1
      li     $t1, 0x61
      crc32b $t0, $t1
      not    $t2, $t0
";
    for arch in ALL_ARCHS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T2], 0xE8B7_BE43, "crc32b under {arch:?}");
    }
}

#[test]
fn bitswap_reverses_bits_within_each_byte() {
    assert_eq!(bitswap(0x0102_0304), 0x8040_C020);
    assert_eq!(bitswap(0xFF00_FF00), 0xFF00_FF00);
    assert_eq!(bitswap(bitswap(0xDEAD_BEEF)), 0xDEAD_BEEF, "involution");
}

#[test]
fn bitswap_instruction_applies_per_byte_reversal() {
    let source = "\
main: li      $t1, 0x01020304
      bitswap $t0, $t1
";
    for arch in ALL_ARCHS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T0], 0x8040_C020, "bitswap under {arch:?}");
    }
}

#[test]
fn wsbh_swaps_bytes_within_halfwords() {
    assert_eq!(wsbh(0x1122_3344), 0x2211_4433);
}

#[test]
fn sign_extension_ops_extend_from_byte_and_half() {
    let source = "\
main: li  $t1, 0x00000080
      seb $t0, $t1
      li  $t3, 0x00008000
      seh $t2, $t3
";
    for arch in ALL_ARCHS {
        let regs = final_registers(source, arch);
        assert_eq!(regs.gpr[T0], 0xFFFF_FF80, "seb under {arch:?}");
        assert_eq!(regs.gpr[T2], 0xFFFF_8000, "seh under {arch:?}");
    }
}
