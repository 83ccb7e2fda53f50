//! Pure pass/fail decisions over reflected values.
//!
//! Each check returns `Ok(())` on success or the [`Failure`] to report. None of
//! them capture stack traces or touch a sink.

use std::cmp::Ordering;

use crate::diagnostics::{EngineError, ErrorKind, Operand};
use crate::engine;
use crate::value::{CapabilitySet, Value};

use super::Failure;

pub(crate) type Outcome = Result<(), Failure>;

fn ensure(condition: bool, failure: impl FnOnce() -> Failure) -> Outcome {
    if condition {
        Ok(())
    } else {
        Err(failure())
    }
}

/// Appends both type names when two values print identically.
fn type_hint(expected: &Value, actual: &Value) -> String {
    if expected.to_string() == actual.to_string() && !engine::type_equals(expected, actual) {
        format!(
            " (expected type {}, actual type {})",
            expected.type_name(),
            actual.type_name()
        )
    } else {
        String::new()
    }
}

pub(crate) fn equal(expected: &Value, actual: &Value) -> Outcome {
    ensure(engine::deep_equal(expected, actual), || {
        Failure::new(
            "equal",
            format!(
                "values not equal: expected: {} actual: {}{}",
                expected,
                actual,
                type_hint(expected, actual)
            ),
        )
        .with_values(expected, actual)
    })
}

pub(crate) fn not_equal(not_expected: &Value, actual: &Value) -> Outcome {
    ensure(!engine::deep_equal(not_expected, actual), || {
        Failure::new(
            "not_equal",
            format!(
                "values unexpectedly equal: not expected: {} actual: {}",
                not_expected, actual
            ),
        )
    })
}

pub(crate) fn nil(actual: &Value) -> Outcome {
    ensure(engine::is_nil(actual), || {
        Failure::new("nil", format!("expected nil, but got: {}", actual))
    })
}

pub(crate) fn not_nil(actual: &Value) -> Outcome {
    ensure(!engine::is_nil(actual), || {
        Failure::new("not_nil", "expected non-nil value, but got nil")
    })
}

pub(crate) fn empty(actual: &Value) -> Outcome {
    ensure(engine::is_empty(actual), || {
        Failure::new("empty", format!("expected empty value, but got: {}", actual))
    })
}

pub(crate) fn not_empty(actual: &Value) -> Outcome {
    ensure(!engine::is_empty(actual), || {
        Failure::new(
            "not_empty",
            format!("expected non-empty value, but got empty: {}", actual),
        )
    })
}

pub(crate) fn is_zero(actual: &Value) -> Outcome {
    ensure(engine::is_zero(actual), || {
        Failure::new("is_zero", format!("expected zero value, but got: {}", actual))
    })
}

pub(crate) fn is_true(condition: bool) -> Outcome {
    ensure(condition, || Failure::new("is_true", "expected true, but got false"))
}

pub(crate) fn is_false(condition: bool) -> Outcome {
    ensure(!condition, || Failure::new("is_false", "expected false, but got true"))
}

pub(crate) fn contains(container: &Value, item: &Value) -> Outcome {
    match engine::contains(container, item) {
        Ok(found) => ensure(found, || {
            Failure::new(
                "contains",
                format!("expected {} to contain {}, but it did not", container, item),
            )
        }),
        Err(err) => Err(Failure::from_engine("contains", err)),
    }
}

pub(crate) fn not_contains(container: &Value, item: &Value) -> Outcome {
    match engine::contains(container, item) {
        Ok(found) => ensure(!found, || {
            Failure::new(
                "not_contains",
                format!("expected {} to not contain {}, but it did", container, item),
            )
        }),
        Err(err) => Err(Failure::from_engine("not_contains", err)),
    }
}

pub(crate) fn len(object: &Value, expected: usize) -> Outcome {
    match engine::length(object) {
        Ok(actual) => ensure(actual == expected, || {
            Failure::new(
                "len",
                format!("expected length {}, but got {}", expected, actual),
            )
        }),
        Err(err) => Err(Failure::new(
            "len",
            format!("unsupported type for length check: {}", object.type_name()),
        )
        .with_cause(err)),
    }
}

pub(crate) fn subset(list: &Value, sub: &Value) -> Outcome {
    match engine::subset(list, sub) {
        Ok(holds) => ensure(holds, || {
            Failure::new(
                "subset",
                format!("expected {} to be a subset of {}, but it's not", sub, list),
            )
        }),
        Err(err) => Err(Failure::from_engine("subset", err)),
    }
}

fn ordering(
    assertion: &'static str,
    a: &Value,
    b: &Value,
    accept: impl FnOnce(Ordering) -> bool,
    relation: &str,
) -> Outcome {
    match engine::compare_numeric(a, b) {
        Ok(order) => ensure(accept(order), || {
            Failure::new(assertion, format!("expected {} to be {} {}", a, relation, b))
        }),
        Err(err) => Err(Failure::new(
            assertion,
            format!("failed to compare values: {}", err),
        )
        .with_cause(err)),
    }
}

pub(crate) fn greater(a: &Value, b: &Value) -> Outcome {
    ordering("greater", a, b, Ordering::is_gt, "greater than")
}

pub(crate) fn less(a: &Value, b: &Value) -> Outcome {
    ordering("less", a, b, Ordering::is_lt, "less than")
}

pub(crate) fn greater_or_equal(a: &Value, b: &Value) -> Outcome {
    ordering(
        "greater_or_equal",
        a,
        b,
        Ordering::is_ge,
        "greater than or equal to",
    )
}

pub(crate) fn less_or_equal(a: &Value, b: &Value) -> Outcome {
    ordering(
        "less_or_equal",
        a,
        b,
        Ordering::is_le,
        "less than or equal to",
    )
}

pub(crate) fn is_of_type(sample: &Value, object: &Value) -> Outcome {
    ensure(engine::type_equals(sample, object), || {
        Failure::new(
            "is_of_type",
            format!(
                "expected type {}, but got {}",
                sample.type_name(),
                object.type_name()
            ),
        )
    })
}

pub(crate) fn implements(set: &CapabilitySet, object: &Value) -> Outcome {
    ensure(engine::implements(set, object), || {
        Failure::new(
            "implements",
            format!(
                "expected {} to implement {}, but it does not",
                object.type_name(),
                set
            ),
        )
    })
}

/// Same-elements failures speak about arguments and lengths rather than engine
/// operations.
fn multiset_failure(assertion: &'static str, err: EngineError) -> Failure {
    let message = match (err.kind(), err.operand()) {
        (ErrorKind::UnsupportedType, Some(Operand::First)) => {
            "first argument must be a slice or array".to_string()
        }
        (ErrorKind::UnsupportedType, Some(Operand::Second)) => {
            "second argument must be a slice or array".to_string()
        }
        (ErrorKind::Unhashable, _) => format!("unsupported element type for comparison: {}", err),
        _ => err.to_string(),
    };
    Failure::new(assertion, message).with_cause(err)
}

pub(crate) fn same_elements(a: &Value, b: &Value) -> Outcome {
    match engine::multiset_equal(a, b) {
        Ok(true) => Ok(()),
        Ok(false) => {
            let (len_a, len_b) = (engine::length(a), engine::length(b));
            let message = match (len_a, len_b) {
                (Ok(x), Ok(y)) if x != y => format!(
                    "expected slices of the same length, but got {} and {}",
                    x, y
                ),
                _ => format!(
                    "expected same elements in both slices, but they differ: {} vs {}",
                    a, b
                ),
            };
            Err(Failure::new("same_elements", message).with_values(a, b))
        }
        Err(err) => Err(multiset_failure("same_elements", err)),
    }
}

pub(crate) fn elements_match(expected: &Value, actual: &Value) -> Outcome {
    match engine::multiset_equal(expected, actual) {
        Ok(holds) => ensure(holds, || {
            Failure::new(
                "elements_match",
                format!(
                    "element lists are not equal: expected: {} actual: {}",
                    expected, actual
                ),
            )
            .with_values(expected, actual)
        }),
        Err(err) => Err(multiset_failure("elements_match", err)),
    }
}

/// Maps a coercion failure to the side that was not numeric.
fn tolerance_failure(assertion: &'static str, err: EngineError) -> Failure {
    let side = match err.operand() {
        Some(Operand::Expected) => "expected",
        _ => "actual",
    };
    Failure::new(assertion, format!("{} value is not numeric: {}", side, err)).with_cause(err)
}

pub(crate) fn in_delta(expected: &Value, actual: &Value, delta: f64) -> Outcome {
    match engine::delta_within(expected, actual, delta) {
        Ok(t) => ensure(t.within, || {
            Failure::new(
                "in_delta",
                format!(
                    "expected {} to be within {} of {}, but difference was {}",
                    actual,
                    delta,
                    expected,
                    t.diff.abs()
                ),
            )
        }),
        Err(err) => Err(tolerance_failure("in_delta", err)),
    }
}

pub(crate) fn in_epsilon(expected: &Value, actual: &Value, epsilon: f64) -> Outcome {
    match engine::epsilon_within(expected, actual, epsilon) {
        Ok(t) => ensure(t.within, || {
            Failure::new(
                "in_epsilon",
                format!(
                    "expected {} to be within {}% of {}, but difference was {}%",
                    actual,
                    epsilon * 100.0,
                    expected,
                    t.diff * 100.0
                ),
            )
        }),
        Err(err) => Err(tolerance_failure("in_epsilon", err)),
    }
}

pub(crate) fn same(expected: usize, actual: usize) -> Outcome {
    ensure(expected == actual, || {
        Failure::new(
            "same",
            format!(
                "expected same address, but got different: {:#x} vs {:#x}",
                expected, actual
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Reflect;

    fn message(outcome: Outcome) -> String {
        outcome.expect_err("check should fail").message
    }

    #[test]
    fn equal_messages() {
        assert!(equal(&1i32.reflect(), &1i32.reflect()).is_ok());
        assert_eq!(
            message(equal(&1i32.reflect(), &2i32.reflect())),
            "values not equal: expected: 1 actual: 2"
        );
        assert_eq!(
            message(equal(&1i32.reflect(), &1i64.reflect())),
            "values not equal: expected: 1 actual: 1 (expected type i32, actual type i64)"
        );
    }

    #[test]
    fn contains_reports_string_item_mismatch() {
        let failure = contains(&"hello".reflect(), &1i32.reflect()).unwrap_err();
        assert_eq!(
            failure.message,
            "item must be a string when container is a string, got i32"
        );
        assert!(failure.cause.is_some());
    }

    #[test]
    fn ordering_messages() {
        assert!(greater(&2i32.reflect(), &1u8.reflect()).is_ok());
        assert_eq!(
            message(less_or_equal(&3i32.reflect(), &1i32.reflect())),
            "expected 3 to be less than or equal to 1"
        );
        assert_eq!(
            message(greater(&"a".reflect(), &1i32.reflect())),
            "failed to compare values: unsupported type for NumericCompare: str vs i32"
        );
    }

    #[test]
    fn same_elements_messages() {
        assert_eq!(
            message(same_elements(&vec![1, 2].reflect(), &vec![1].reflect())),
            "expected slices of the same length, but got 2 and 1"
        );
        assert_eq!(
            message(same_elements(&"ab".reflect(), &vec![1].reflect())),
            "first argument must be a slice or array"
        );
        assert!(message(same_elements(
            &vec![vec![1]].reflect(),
            &vec![vec![1]].reflect()
        ))
        .starts_with("unsupported element type for comparison"));
    }

    #[test]
    fn tolerance_messages() {
        assert_eq!(
            message(in_delta(&1.0f64.reflect(), &1.5f64.reflect(), 0.25)),
            "expected 1.5 to be within 0.25 of 1, but difference was 0.5"
        );
        assert!(message(in_epsilon(&"x".reflect(), &1i32.reflect(), 0.1))
            .starts_with("expected value is not numeric"));
    }

    #[test]
    fn len_of_scalar_names_type() {
        assert_eq!(
            message(len(&3u8.reflect(), 1)),
            "unsupported type for length check: u8"
        );
    }
}
