//! Deep structural equality, shared by every engine operation that compares values.

use crate::value::{Elements, Map, Value};

/// Recursive structural equality.
///
/// Two values are equal when they have the same runtime type and the same shape
/// with pairwise-equal contents. Numerically equal values of different types are
/// never equal. Further rules:
///
/// - maps compare by entries, regardless of entry order
/// - pointers and filled optionals compare by what they point at, never by address
/// - functions and channels compare by identity
/// - `NaN` is not equal to itself
///
/// ```rust
/// use verity::engine::deep_equal;
/// use verity::value::Reflect;
///
/// assert!(deep_equal(&vec![1, 2].reflect(), &vec![1, 2].reflect()));
/// assert!(!deep_equal(&1i32.reflect(), &1i64.reflect()));
/// assert!(deep_equal(&"a".reflect(), &String::from("a").reflect()));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) | (Value::Unit, Value::Unit) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::I8(x), Value::I8(y)) => x == y,
        (Value::I16(x), Value::I16(y)) => x == y,
        (Value::I32(x), Value::I32(y)) => x == y,
        (Value::I64(x), Value::I64(y)) => x == y,
        (Value::I128(x), Value::I128(y)) => x == y,
        (Value::Isize(x), Value::Isize(y)) => x == y,
        (Value::U8(x), Value::U8(y)) => x == y,
        (Value::U16(x), Value::U16(y)) => x == y,
        (Value::U32(x), Value::U32(y)) => x == y,
        (Value::U64(x), Value::U64(y)) => x == y,
        (Value::U128(x), Value::U128(y)) => x == y,
        (Value::Usize(x), Value::Usize(y)) => x == y,
        (Value::F32(x), Value::F32(y)) => x == y,
        (Value::F64(x), Value::F64(y)) => x == y,
        (Value::Char(x), Value::Char(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Seq(x), Value::Seq(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            elements_equal(x, y)
        }
        (Value::Map(x), Value::Map(y)) => maps_equal(x, y),
        (Value::Struct(x), Value::Struct(y)) => {
            x.ty == y.ty
                && x.fields.len() == y.fields.len()
                && x
                    .fields
                    .iter()
                    .zip(&y.fields)
                    .all(|((n1, v1), (n2, v2))| n1 == n2 && deep_equal(v1, v2))
        }
        (Value::Ref(x), Value::Ref(y)) => x.ty == y.ty && deep_equal(&x.target, &y.target),
        (Value::Func(x), Value::Func(y)) => x.ty == y.ty && x.addr == y.addr,
        (Value::Chan(x), Value::Chan(y)) => x.ty == y.ty && x.addr == y.addr,
        (Value::Null(x), Value::Null(y)) => x == y,
        _ => false,
    }
}

fn elements_equal(x: &Elements, y: &Elements) -> bool {
    x.ty == y.ty
        && x.items.len() == y.items.len()
        && x.items.iter().zip(&y.items).all(|(a, b)| deep_equal(a, b))
}

fn maps_equal(x: &Map, y: &Map) -> bool {
    x.ty == y.ty
        && x.entries.len() == y.entries.len()
        && x
            .entries
            .iter()
            .all(|(k, v)| lookup(y, k).is_some_and(|w| deep_equal(v, w)))
}

/// Value stored under `key`, found by deep equality.
pub(crate) fn lookup<'a>(map: &'a Map, key: &Value) -> Option<&'a Value> {
    map.entries
        .iter()
        .find(|(k, _)| deep_equal(k, key))
        .map(|(_, v)| v)
}

/// Index of the first item deep-equal to `item`.
pub(crate) fn position(items: &[Value], item: &Value) -> Option<usize> {
    items.iter().position(|candidate| deep_equal(candidate, item))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Reflect;
    use std::collections::{BTreeMap, HashMap};
    use std::rc::Rc;

    #[test]
    fn maps_ignore_entry_order() {
        let mut a = HashMap::new();
        let mut b = HashMap::new();
        for i in 0..20 {
            a.insert(i, i * 10);
        }
        for i in (0..20).rev() {
            b.insert(i, i * 10);
        }
        assert!(deep_equal(&a.reflect(), &b.reflect()));
        b.insert(3, 0);
        assert!(!deep_equal(&a.reflect(), &b.reflect()));
    }

    #[test]
    fn hash_and_btree_maps_are_different_types() {
        let hash: HashMap<i32, i32> = [(1, 2)].into_iter().collect();
        let tree: BTreeMap<i32, i32> = [(1, 2)].into_iter().collect();
        assert!(!deep_equal(&hash.reflect(), &tree.reflect()));
    }

    #[test]
    fn pointers_compare_by_pointee() {
        let a = Rc::new(vec![1, 2]);
        let b = Rc::new(vec![1, 2]);
        assert!(deep_equal(&a.reflect(), &b.reflect()));
        assert!(!deep_equal(&a.reflect(), &Rc::new(vec![1]).reflect()));
    }

    #[test]
    fn reused_addresses_do_not_make_pointers_equal() {
        let one = Box::new(1i32).reflect();
        let two = Box::new(2i32).reflect();
        assert!(!deep_equal(&one, &two));

        let options: Vec<Value> = (0..3).map(|i| Some(i).reflect()).collect();
        assert!(!deep_equal(&options[0], &options[1]));
        assert!(!deep_equal(&options[1], &options[2]));
        assert!(deep_equal(&options[2], &Some(2).reflect()));
    }

    #[test]
    fn same_address_with_different_targets_is_unequal() {
        let ty = Box::<i32>::type_of();
        let at = |target: Value| {
            Value::Ref(crate::value::Ref {
                ty: ty.clone(),
                target: Box::new(target),
                addr: 0x1000,
            })
        };
        assert!(!deep_equal(&at(Value::I32(1)), &at(Value::I32(2))));
        assert!(deep_equal(&at(Value::I32(3)), &at(Value::I32(3))));
    }

    #[test]
    fn nan_is_never_equal() {
        assert!(!deep_equal(&f64::NAN.reflect(), &f64::NAN.reflect()));
        assert!(deep_equal(&0.0f64.reflect(), &(-0.0f64).reflect()));
    }

    #[test]
    fn arrays_and_vecs_differ() {
        assert!(!deep_equal(&[1, 2].reflect(), &vec![1, 2].reflect()));
    }

    #[test]
    fn typed_nulls_compare_by_type() {
        let a: Option<i32> = None;
        let b: Option<i32> = None;
        let c: Option<u8> = None;
        assert!(deep_equal(&a.reflect(), &b.reflect()));
        assert!(!deep_equal(&a.reflect(), &c.reflect()));
        assert!(!deep_equal(&a.reflect(), &Value::Nil));
    }
}
