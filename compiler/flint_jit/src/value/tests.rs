use pretty_assertions::assert_eq;

use super::*;

fn word(slot: Result<Slot<'_>, JitError>) -> u64 {
    match slot {
        Ok(Slot::Word(word)) => word,
        other => panic!("expected a word, got {other:?}"),
    }
}

#[test]
fn integers_keep_their_bits() {
    assert_eq!(word(lower("x", Value::from(-1i32), ValueType::Int)), u64::MAX);
    assert_eq!(word(lower("x", Value::from(u64::MAX), ValueType::Int)), u64::MAX);
    assert_eq!(word(lower("x", Value::from(true), ValueType::Int)), 1);
}

#[test]
fn unsigned_values_keep_their_magnitude() {
    assert_eq!(Value::from(u64::MAX), Value::UInt(u64::MAX));
    assert_eq!(Value::from(7usize), Value::UInt(7));
    assert_eq!(
        word(lower("x", Value::from(u64::MAX), ValueType::Float)),
        2.0f64.powi(64).to_bits()
    );
    assert_ne!(
        word(lower("x", Value::from(u64::MAX), ValueType::Float)),
        (-1.0f64).to_bits()
    );
    assert_eq!(word(lower("x", Value::from(1u64 << 63), ValueType::Bool)), 1);
    assert_eq!(word(lower("x", Value::from(0usize), ValueType::Bool)), 0);
}

#[test]
fn numeric_coercion_follows_the_slot() {
    assert_eq!(word(lower("x", Value::Float(-2.9), ValueType::Int)), (-2i64) as u64);
    assert_eq!(word(lower("x", Value::Int(3), ValueType::Float)), 3.0f64.to_bits());
    assert_eq!(word(lower("x", Value::Bool(true), ValueType::Float)), 1.0f64.to_bits());
    assert_eq!(word(lower("x", Value::Float(0.0), ValueType::Bool)), 0);
    assert_eq!(word(lower("x", Value::Int(-7), ValueType::Bool)), 1);
}

#[test]
fn strings_only_fill_string_slots() {
    assert_eq!(lower("s", Value::from("abc"), ValueType::String), Ok(Slot::Str("abc")));
    assert_eq!(
        lower("s", Value::Int(1), ValueType::String),
        Err(JitError::IntoString("s".into()))
    );
    assert_eq!(
        lower("n", Value::from("1"), ValueType::Int),
        Err(JitError::FromString("n".into()))
    );
}

#[test]
fn return_value_views() {
    let word = ReturnValue::Word((-5i64) as u64);
    assert_eq!(word.as_i64(), -5);
    assert!((word.as_f64() + 5.0).abs() < f64::EPSILON);
    assert!(word.as_bool());
    assert!(!word.is_float());

    let float = ReturnValue::Float(2.75);
    assert_eq!(float.as_i64(), 2);
    assert_eq!(float.as_u64(), 2.75f64.to_bits());
    assert!(float.is_float());
    assert!(!ReturnValue::Float(0.0).as_bool());
}
