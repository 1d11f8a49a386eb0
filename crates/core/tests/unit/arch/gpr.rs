//! GPR invariants and lock nesting.

use mipsim_core::arch::{RegRef, RegisterBank};

#[test]
fn register_zero_reads_zero_and_ignores_writes() {
    let mut bank = RegisterBank::new();
    bank.write(RegRef::Gpr(0), 0xDEAD_BEEF);
    assert_eq!(bank.read(RegRef::Gpr(0)), 0);
    bank.set_and_unlock(RegRef::Gpr(0), 1);
    assert_eq!(bank.read(RegRef::Gpr(0)), 0);
}

#[test]
fn register_zero_cannot_be_locked() {
    let mut bank = RegisterBank::new();
    bank.lock(RegRef::Gpr(0));
    assert!(!bank.is_locked(RegRef::Gpr(0)));
}

#[test]
fn locks_nest_per_writer() {
    // Two in-flight writers each hold a claim; the register stays locked
    // until the second one commits.
    let mut bank = RegisterBank::new();
    bank.lock(RegRef::Gpr(8));
    bank.lock(RegRef::Gpr(8));
    bank.set_and_unlock(RegRef::Gpr(8), 1);
    assert!(bank.is_locked(RegRef::Gpr(8)));
    bank.set_and_unlock(RegRef::Gpr(8), 2);
    assert!(!bank.is_locked(RegRef::Gpr(8)));
    assert_eq!(bank.read(RegRef::Gpr(8)), 2);
}

#[test]
fn hi_lo_are_independent_of_the_gpr_file() {
    let mut bank = RegisterBank::new();
    bank.write(RegRef::Hi, 10);
    bank.write(RegRef::Lo, 20);
    assert_eq!(bank.hi(), 10);
    assert_eq!(bank.lo(), 20);
    assert_eq!(bank.read(RegRef::Gpr(10)), 0);
    bank.lock(RegRef::Hi);
    assert!(bank.is_locked(RegRef::Hi));
    assert!(!bank.is_locked(RegRef::Lo));
}

#[test]
fn reset_clears_values_and_locks() {
    let mut bank = RegisterBank::new();
    bank.write(RegRef::Gpr(8), 5);
    bank.lock(RegRef::Gpr(9));
    bank.write(RegRef::Hi, 7);
    bank.reset();
    assert_eq!(bank.read(RegRef::Gpr(8)), 0);
    assert!(!bank.is_locked(RegRef::Gpr(9)));
    assert_eq!(bank.hi(), 0);
}
