//! Container introspection: membership, subsets, multiset equality and length.

use crate::diagnostics::{EngineError, Operand, Operation};
use crate::engine::equality::{deep_equal, lookup, position};
use crate::value::{Kind, Map, Value};

/// Borrowed view of a value as a container. Typed null slices and maps are empty.
enum Container<'a> {
    Text(&'a str),
    Items(&'a [Value]),
    Entries(&'a Map),
    Empty(Kind),
}

impl<'a> Container<'a> {
    fn of(v: &'a Value) -> Option<Self> {
        match v {
            Value::Str(s) => Some(Container::Text(s)),
            Value::Seq(e) => Some(Container::Items(&e.items)),
            Value::Map(m) => Some(Container::Entries(m)),
            Value::Null(ty) if matches!(ty.kind(), Kind::Slice | Kind::Map) => {
                Some(Container::Empty(ty.kind()))
            }
            _ => None,
        }
    }

    fn is_sequence(&self) -> bool {
        matches!(self, Container::Items(_) | Container::Empty(Kind::Slice))
    }

    fn is_map(&self) -> bool {
        matches!(self, Container::Entries(_) | Container::Empty(Kind::Map))
    }

    fn items(&self) -> &'a [Value] {
        match *self {
            Container::Items(items) => items,
            _ => &[],
        }
    }

    fn entries(&self) -> &'a [(Value, Value)] {
        match *self {
            Container::Entries(m) => &m.entries,
            _ => &[],
        }
    }
}

/// Whether `container` holds `item`.
///
/// Text containers look for a substring and require text items. Sequences are
/// scanned with [`deep_equal`]; maps are checked for the key.
///
/// ```rust
/// use verity::engine::contains;
/// use verity::value::Reflect;
///
/// assert_eq!(contains(&"hello world".reflect(), &"world".reflect()), Ok(true));
/// assert_eq!(contains(&vec![1, 2, 3].reflect(), &4i32.reflect()), Ok(false));
/// assert!(contains(&"hello".reflect(), &1i32.reflect()).is_err());
/// ```
pub fn contains(container: &Value, item: &Value) -> Result<bool, EngineError> {
    match Container::of(container) {
        Some(Container::Text(text)) => match item {
            Value::Str(needle) => Ok(text.contains(needle.as_str())),
            other => Err(EngineError::mismatch(
                Operation::Contains,
                Operand::Item,
                "a string when container is a string",
                other.type_name(),
            )),
        },
        Some(Container::Items(items)) => Ok(position(items, item).is_some()),
        Some(Container::Entries(map)) => Ok(lookup(map, item).is_some()),
        Some(Container::Empty(_)) => Ok(false),
        None => Err(EngineError::unsupported(
            Operation::Contains,
            Operand::Container,
            container.type_name(),
        )),
    }
}

/// Whether every element of `subset` is present in `superset`.
///
/// For sequences each element only has to occur somewhere in `superset`:
/// duplicates are not counted, so `[1, 1]` is a subset of `[1]`. For maps each
/// key must be present with a deep-equal value.
pub fn subset(superset: &Value, subset: &Value) -> Result<bool, EngineError> {
    let outer = match Container::of(superset) {
        Some(c) if c.is_sequence() || c.is_map() => c,
        _ => {
            return Err(EngineError::unsupported(
                Operation::Subset,
                Operand::Superset,
                superset.type_name(),
            ))
        }
    };
    let inner = Container::of(subset);

    if outer.is_sequence() {
        let Some(inner) = inner.filter(Container::is_sequence) else {
            return Err(EngineError::mismatch(
                Operation::Subset,
                Operand::Subset,
                "a sequence when superset is a sequence",
                subset.type_name(),
            ));
        };
        let candidates = outer.items();
        return Ok(inner
            .items()
            .iter()
            .all(|item| position(candidates, item).is_some()));
    }

    let Some(inner) = inner.filter(Container::is_map) else {
        return Err(EngineError::mismatch(
            Operation::Subset,
            Operand::Subset,
            "a map when superset is a map",
            subset.type_name(),
        ));
    };
    let present = |key: &Value| match &outer {
        Container::Entries(map) => lookup(map, key),
        _ => None,
    };
    Ok(inner
        .entries()
        .iter()
        .all(|(k, v)| present(k).is_some_and(|w| deep_equal(v, w))))
}

fn sequence_operand(v: &Value, operand: Operand) -> Result<&[Value], EngineError> {
    match Container::of(v) {
        Some(c) if c.is_sequence() => Ok(c.items()),
        _ => Err(EngineError::unsupported(
            Operation::MultisetEqual,
            operand,
            v.type_name(),
        )),
    }
}

/// Values that can serve as a distinguishing key when counting occurrences.
///
/// Slices and maps cannot, and neither can anything containing one.
fn is_hashable(v: &Value) -> bool {
    match v {
        Value::Seq(e) => e.ty.kind() == Kind::Array && e.items.iter().all(is_hashable),
        Value::Tuple(e) => e.items.iter().all(is_hashable),
        Value::Struct(s) => s.fields.iter().all(|(_, f)| is_hashable(f)),
        Value::Ref(r) => is_hashable(&r.target),
        Value::Map(_) => false,
        Value::Null(ty) => !matches!(ty.kind(), Kind::Slice | Kind::Map),
        _ => true,
    }
}

/// Distinct elements of `items` with their occurrence counts.
fn occurrences(items: &[Value]) -> Vec<(&Value, usize)> {
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for item in items {
        match counts.iter_mut().find(|(seen, _)| deep_equal(seen, item)) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts
}

/// Whether two sequences hold the same elements with the same multiplicities,
/// in any order.
///
/// ```rust
/// use verity::engine::multiset_equal;
/// use verity::value::Reflect;
///
/// assert_eq!(multiset_equal(&vec![1, 2, 3].reflect(), &vec![3, 2, 1].reflect()), Ok(true));
/// assert_eq!(multiset_equal(&vec![1, 2, 2].reflect(), &vec![1, 2, 3].reflect()), Ok(false));
/// ```
pub fn multiset_equal(a: &Value, b: &Value) -> Result<bool, EngineError> {
    let first = sequence_operand(a, Operand::First)?;
    let second = sequence_operand(b, Operand::Second)?;
    if first.len() != second.len() {
        return Ok(false);
    }
    if let Some(bad) = first.iter().chain(second).find(|v| !is_hashable(v)) {
        return Err(EngineError::unhashable(
            Operation::MultisetEqual,
            bad.type_name(),
        ));
    }

    let counts_a = occurrences(first);
    let counts_b = occurrences(second);
    Ok(counts_a.len() == counts_b.len()
        && counts_a.iter().all(|(item, n)| {
            counts_b
                .iter()
                .any(|(other, m)| n == m && deep_equal(item, other))
        }))
}

/// Number of bytes of text, items of a sequence, entries of a map, or messages
/// queued in a channel.
pub fn length(v: &Value) -> Result<usize, EngineError> {
    match v {
        Value::Str(s) => Ok(s.len()),
        Value::Seq(e) => Ok(e.items.len()),
        Value::Map(m) => Ok(m.entries.len()),
        Value::Chan(c) => Ok(c.len),
        Value::Null(ty) if matches!(ty.kind(), Kind::Slice | Kind::Map | Kind::Channel) => Ok(0),
        other => Err(EngineError::unsupported(
            Operation::Length,
            Operand::Value,
            other.type_name(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::value::{Reflect, Type};
    use std::collections::{BTreeMap, HashSet};

    #[test]
    fn contains_on_maps_checks_keys() {
        let m: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(contains(&m.reflect(), &"a".reflect()), Ok(true));
        assert_eq!(contains(&m.reflect(), &1i32.reflect()), Ok(false));
    }

    #[test]
    fn contains_on_sets() {
        let s: HashSet<u8> = [1, 2, 3].into_iter().collect();
        assert_eq!(contains(&s.reflect(), &2u8.reflect()), Ok(true));
        assert_eq!(contains(&s.reflect(), &2i32.reflect()), Ok(false));
    }

    #[test]
    fn contains_on_null_slice_is_false() {
        let null = Value::null(Type::slice(i32::type_of())).unwrap();
        assert_eq!(contains(&null, &1i32.reflect()), Ok(false));
    }

    #[test]
    fn contains_rejects_scalars() {
        let err = contains(&42i32.reflect(), &4i32.reflect()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.operand(), Some(Operand::Container));
    }

    #[test]
    fn subset_of_sequences_ignores_duplicates() {
        let sup = vec![1, 2, 3].reflect();
        assert_eq!(subset(&sup, &vec![1, 1, 1].reflect()), Ok(true));
        assert_eq!(subset(&sup, &vec![4, 5].reflect()), Ok(false));
        assert_eq!(subset(&sup, &Vec::<i32>::new().reflect()), Ok(true));
    }

    #[test]
    fn subset_of_maps_compares_values() {
        let sup: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let good: BTreeMap<&str, i32> = [("a", 1)].into_iter().collect();
        let bad: BTreeMap<&str, i32> = [("a", 2)].into_iter().collect();
        assert_eq!(subset(&sup.reflect(), &good.reflect()), Ok(true));
        assert_eq!(subset(&sup.reflect(), &bad.reflect()), Ok(false));
    }

    #[test]
    fn subset_rejects_text_and_mixed_kinds() {
        let err = subset(&"abc".reflect(), &"a".reflect()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        let err = subset(&vec![1].reflect(), &1i32.reflect()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn multiset_rejects_non_sequences() {
        let err = multiset_equal(&vec![1].reflect(), &"1".reflect()).unwrap_err();
        assert_eq!(err.operand(), Some(Operand::Second));
    }

    #[test]
    fn multiset_rejects_nested_slices() {
        let a = vec![vec![1], vec![2]].reflect();
        let b = vec![vec![2], vec![1]].reflect();
        let err = multiset_equal(&a, &b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unhashable);
    }

    #[test]
    fn multiset_accepts_fixed_arrays_and_tuples() {
        let a = vec![[1, 2], [3, 4]].reflect();
        let b = vec![[3, 4], [1, 2]].reflect();
        assert_eq!(multiset_equal(&a, &b), Ok(true));
        let a = vec![(1, "x"), (1, "x"), (2, "y")].reflect();
        let b = vec![(2, "y"), (1, "x"), (2, "y")].reflect();
        assert_eq!(multiset_equal(&a, &b), Ok(false));
    }

    #[test]
    fn multiset_length_mismatch_is_false_before_hashability() {
        let a = vec![vec![1]].reflect();
        let b = Vec::<Vec<i32>>::new().reflect();
        assert_eq!(multiset_equal(&a, &b), Ok(false));
    }

    #[test]
    fn length_of_containers() {
        assert_eq!(length(&"héllo".reflect()), Ok(6));
        assert_eq!(length(&[0u8; 4].reflect()), Ok(4));
        assert!(length(&5i32.reflect()).is_err());
    }
}
