//! Nilness, emptiness, zero values and type checks.

use crate::value::{CapabilitySet, Kind, Value};

/// Whether `v` is the untyped absence of a value or a typed null reference.
///
/// A `None` reflected from an `Option<T>` is nil; `Some(None)` is not.
pub fn is_nil(v: &Value) -> bool {
    matches!(v, Value::Nil | Value::Null(_))
}

/// Whether `v` is empty.
///
/// Growable sequences, maps and channels are empty when they have no elements.
/// Pointers and filled optionals are empty when what they point at is empty.
/// Everything else, fixed arrays included, is empty when it is its type's zero
/// value.
pub fn is_empty(v: &Value) -> bool {
    match v {
        Value::Nil | Value::Null(_) => true,
        Value::Seq(e) if e.ty.kind() == Kind::Slice => e.items.is_empty(),
        Value::Map(m) => m.entries.is_empty(),
        Value::Chan(c) => c.len == 0,
        Value::Ref(r) => is_empty(&r.target),
        other => is_zero(other),
    }
}

/// Whether `v` equals the zero value of its type.
///
/// The zero value of a number is `0`, of `bool` is `false`, of `char` is `'\0'`
/// and of text is `""`. Composites are zero when all their parts are; growable
/// sequences and maps are zero when empty. Live pointers, functions and channels
/// are never zero.
pub fn is_zero(v: &Value) -> bool {
    match v {
        Value::Nil | Value::Null(_) | Value::Unit => true,
        Value::Bool(b) => !b,
        Value::I8(n) => *n == 0,
        Value::I16(n) => *n == 0,
        Value::I32(n) => *n == 0,
        Value::I64(n) => *n == 0,
        Value::I128(n) => *n == 0,
        Value::Isize(n) => *n == 0,
        Value::U8(n) => *n == 0,
        Value::U16(n) => *n == 0,
        Value::U32(n) => *n == 0,
        Value::U64(n) => *n == 0,
        Value::U128(n) => *n == 0,
        Value::Usize(n) => *n == 0,
        Value::F32(n) => *n == 0.0,
        Value::F64(n) => *n == 0.0,
        Value::Char(c) => *c == '\0',
        Value::Str(s) => s.is_empty(),
        Value::Seq(e) if e.ty.kind() == Kind::Array => e.items.iter().all(is_zero),
        Value::Seq(e) => e.items.is_empty(),
        Value::Tuple(e) => e.items.iter().all(is_zero),
        Value::Map(m) => m.entries.is_empty(),
        Value::Struct(s) => s.fields.iter().all(|(_, f)| is_zero(f)),
        Value::Ref(_) | Value::Func(_) | Value::Chan(_) => false,
    }
}

/// Whether both values have the same runtime type. Two untyped nils agree.
pub fn type_equals(a: &Value, b: &Value) -> bool {
    a.type_of() == b.type_of()
}

/// Whether the runtime type of `v` declares every capability in `set`.
pub fn implements(set: &CapabilitySet, v: &Value) -> bool {
    v.type_of().is_some_and(|ty| set.is_satisfied_by(&ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Reflect, Type};
    use std::collections::HashMap;

    #[test]
    fn typed_nulls_are_nil() {
        let none: Option<Box<i32>> = None;
        assert!(is_nil(&none.reflect()));
        assert!(is_nil(&Value::null(Type::map(str::type_of(), i32::type_of())).unwrap()));
        assert!(!is_nil(&Some(0).reflect()));
        assert!(!is_nil(&0i32.reflect()));
        assert!(!is_nil(&Vec::<i32>::new().reflect()));
    }

    #[test]
    fn nested_none_is_not_nil() {
        let nested: Option<Option<i32>> = Some(None);
        assert!(!is_nil(&nested.reflect()));
    }

    #[test]
    fn empty_follows_pointers() {
        assert!(is_empty(&Box::new(Vec::<u8>::new()).reflect()));
        assert!(!is_empty(&Box::new(vec![1u8]).reflect()));
        assert!(is_empty(&Some(String::new()).reflect()));
        assert!(is_empty(&Some(0u32).reflect()));
    }

    #[test]
    fn empty_arrays_use_zero_value() {
        assert!(is_empty(&[0i32; 3].reflect()));
        assert!(!is_empty(&[0, 1, 0].reflect()));
        assert!(is_empty(&HashMap::<u8, u8>::new().reflect()));
    }

    #[test]
    fn zero_values() {
        assert!(is_zero(&0.0f32.reflect()));
        assert!(is_zero(&(0u8, false, "").reflect()));
        assert!(!is_zero(&(0u8, true).reflect()));
        assert!(!is_zero(&f64::NAN.reflect()));
        assert!(!is_zero(&Box::new(0).reflect()));
    }

    #[test]
    fn type_equality_is_exact() {
        assert!(type_equals(&1i32.reflect(), &2i32.reflect()));
        assert!(!type_equals(&1i32.reflect(), &1i64.reflect()));
        assert!(type_equals(&Value::Nil, &Value::Nil));
    }

    #[test]
    fn capability_checks() {
        let display = CapabilitySet::new("Display", ["Display"]);
        assert!(implements(&display, &1u8.reflect()));
        assert!(!implements(&display, &vec![1u8].reflect()));
        assert!(!implements(&display, &Value::Nil));
    }
}
