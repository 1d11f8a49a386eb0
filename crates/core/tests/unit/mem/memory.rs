//! Memory access widths, alignment, range, and sparseness.

use mipsim_core::common::error::MemoryError;
use mipsim_core::mem::Memory;

const LIMIT: u32 = 0x8000_0000;

fn mem() -> Memory {
    Memory::new(LIMIT)
}

#[test]
fn words_are_little_endian() {
    let mut mem = mem();
    match mem.store_word(0x100, 0x1122_3344) {
        Ok(()) => {}
        Err(e) => panic!("store: {e}"),
    }
    assert_eq!(mem.load_byte(0x100), Ok(0x44));
    assert_eq!(mem.load_byte(0x103), Ok(0x11));
    assert_eq!(mem.load_half(0x100), Ok(0x3344));
    assert_eq!(mem.load_word(0x100), Ok(0x1122_3344));
}

#[test]
fn unmapped_memory_reads_zero() {
    let mem = mem();
    assert_eq!(mem.load_word(0x7FFF_0000), Ok(0));
    assert_eq!(mem.load_byte(0), Ok(0));
}

#[test]
fn misaligned_accesses_are_typed_errors() {
    let mut mem = mem();
    assert_eq!(
        mem.load_word(0x102),
        Err(MemoryError::Misaligned {
            addr: 0x102,
            required: 4
        })
    );
    assert_eq!(
        mem.load_half(0x101),
        Err(MemoryError::Misaligned {
            addr: 0x101,
            required: 2
        })
    );
    assert_eq!(
        mem.store_word(0x7, 1),
        Err(MemoryError::Misaligned {
            addr: 0x7,
            required: 4
        })
    );
}

#[test]
fn out_of_range_accesses_are_typed_errors() {
    let mut mem = mem();
    assert_eq!(
        mem.load_word(LIMIT),
        Err(MemoryError::OutOfRange {
            addr: LIMIT,
            limit: LIMIT
        })
    );
    // The access's last byte must also be under the ceiling.
    assert_eq!(
        mem.store_word(LIMIT - 2, 0),
        Err(MemoryError::Misaligned {
            addr: LIMIT - 2,
            required: 4
        })
    );
    assert_eq!(
        mem.store_word(LIMIT - 4, 7),
        Ok(())
    );
    assert_eq!(mem.load_word(LIMIT - 4), Ok(7));
}

#[test]
fn sparse_pages_do_not_interfere() {
    let mut mem = mem();
    match mem.store_byte(0x0000_0000, 1) {
        Ok(()) => {}
        Err(e) => panic!("{e}"),
    }
    match mem.store_byte(0x1001_0000, 2) {
        Ok(()) => {}
        Err(e) => panic!("{e}"),
    }
    assert_eq!(mem.load_byte(0), Ok(1));
    assert_eq!(mem.load_byte(0x1001_0000), Ok(2));
    assert_eq!(mem.load_byte(0x0800_0000), Ok(0));
}

#[test]
fn window_reads_across_page_boundaries() {
    let mut mem = mem();
    match mem.store_block(0xFFE, &[1, 2, 3, 4]) {
        Ok(()) => {}
        Err(e) => panic!("{e}"),
    }
    assert_eq!(mem.window(0xFFE, 4), Ok(vec![1, 2, 3, 4]));
}

#[test]
fn reset_drops_all_pages() {
    let mut mem = mem();
    match mem.store_word(0x200, 99) {
        Ok(()) => {}
        Err(e) => panic!("{e}"),
    }
    mem.reset();
    assert_eq!(mem.load_word(0x200), Ok(0));
}
