//! COP1 and the even-register constraint.

use mipsim_core::arch::Cop1;
use mipsim_core::common::error::RuntimeError;

#[test]
fn doubles_occupy_low_then_high_word() {
    let mut cop1 = Cop1::new();
    let bits = 1.5f64.to_bits();
    match cop1.write_double(4, bits) {
        Ok(()) => {}
        Err(e) => panic!("write_double: {e}"),
    }
    assert_eq!(cop1.read(4), bits as u32, "low word at the even index");
    assert_eq!(cop1.read(5), (bits >> 32) as u32, "high word at +1");
    assert_eq!(cop1.read_double(4), Ok(bits));
}

#[test]
fn odd_index_double_access_is_a_descriptive_error() {
    let mut cop1 = Cop1::new();
    assert_eq!(
        cop1.read_double(3),
        Err(RuntimeError::EvenRegisterViolation(3))
    );
    assert_eq!(
        cop1.write_double(7, 0),
        Err(RuntimeError::EvenRegisterViolation(7))
    );
}

#[test]
fn condition_flag_round_trips() {
    let mut cop1 = Cop1::new();
    assert!(!cop1.condition());
    cop1.set_condition(true);
    assert!(cop1.condition());
    cop1.lock_condition();
    assert!(cop1.is_condition_locked());
    cop1.unlock_condition();
    assert!(!cop1.is_condition_locked());
}
