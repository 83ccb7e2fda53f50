//! Numeric coercion and comparison.

use std::cmp::Ordering;

use crate::diagnostics::{EngineError, Operand, Operation};
use crate::value::Value;

/// Absolute difference under which two coerced numbers compare equal.
pub const NUMERIC_EPSILON: f64 = 1e-9;

/// Outcome of a tolerance check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub within: bool,
    /// Signed difference for delta checks, relative difference for epsilon checks.
    pub diff: f64,
}

fn coerce(v: &Value) -> Option<f64> {
    let n = match *v {
        Value::I8(n) => f64::from(n),
        Value::I16(n) => f64::from(n),
        Value::I32(n) => f64::from(n),
        Value::I64(n) => n as f64,
        Value::I128(n) => n as f64,
        Value::Isize(n) => n as f64,
        Value::U8(n) => f64::from(n),
        Value::U16(n) => f64::from(n),
        Value::U32(n) => f64::from(n),
        Value::U64(n) => n as f64,
        Value::U128(n) => n as f64,
        Value::Usize(n) => n as f64,
        Value::F32(n) => f64::from(n),
        Value::F64(n) => n,
        _ => return None,
    };
    Some(n)
}

fn coerce_side(v: &Value, operation: Operation, operand: Operand) -> Result<f64, EngineError> {
    coerce(v).ok_or_else(|| EngineError::unsupported(operation, operand, v.type_name()))
}

/// Converts any integer or float to `f64`.
///
/// ```rust
/// use verity::engine::to_f64;
/// use verity::value::Reflect;
///
/// assert_eq!(to_f64(&7u8.reflect()), Ok(7.0));
/// assert!(to_f64(&"7".reflect()).is_err());
/// ```
pub fn to_f64(v: &Value) -> Result<f64, EngineError> {
    coerce_side(v, Operation::NumericCoerce, Operand::Value)
}

/// Orders two numbers of any numeric types, treating values closer than
/// [`NUMERIC_EPSILON`] as equal.
pub fn compare_numeric(a: &Value, b: &Value) -> Result<Ordering, EngineError> {
    let (Some(x), Some(y)) = (coerce(a), coerce(b)) else {
        return Err(EngineError::unsupported(
            Operation::NumericCompare,
            Operand::Both,
            format!("{} vs {}", a.type_name(), b.type_name()),
        ));
    };
    let diff = x - y;
    Ok(if diff.abs() < NUMERIC_EPSILON {
        Ordering::Equal
    } else if diff > 0.0 {
        Ordering::Greater
    } else {
        Ordering::Less
    })
}

/// Whether `|expected - actual| <= delta`. `diff` is `expected - actual`.
pub fn delta_within(
    expected: &Value,
    actual: &Value,
    delta: f64,
) -> Result<Tolerance, EngineError> {
    let e = coerce_side(expected, Operation::DeltaWithin, Operand::Expected)?;
    let a = coerce_side(actual, Operation::DeltaWithin, Operand::Actual)?;
    let diff = e - a;
    Ok(Tolerance {
        within: diff.abs() <= delta,
        diff,
    })
}

/// Whether the relative difference `|e - a| / (|e + a| / 2)` is at most `epsilon`.
pub fn epsilon_within(
    expected: &Value,
    actual: &Value,
    epsilon: f64,
) -> Result<Tolerance, EngineError> {
    let e = coerce_side(expected, Operation::EpsilonWithin, Operand::Expected)?;
    let a = coerce_side(actual, Operation::EpsilonWithin, Operand::Actual)?;
    if e == a {
        return Ok(Tolerance {
            within: true,
            diff: 0.0,
        });
    }
    let relative = (e - a).abs() / ((e + a).abs() / 2.0);
    Ok(Tolerance {
        within: relative <= epsilon,
        diff: relative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::value::Reflect;

    #[test]
    fn compare_across_widths() {
        assert_eq!(
            compare_numeric(&5u64.reflect(), &5i8.reflect()),
            Ok(Ordering::Equal)
        );
        assert_eq!(
            compare_numeric(&8i32.reflect(), &5i32.reflect()),
            Ok(Ordering::Greater)
        );
        assert_eq!(
            compare_numeric(&(-1.5f32).reflect(), &2u16.reflect()),
            Ok(Ordering::Less)
        );
    }

    #[test]
    fn near_floats_compare_equal() {
        let a = 0.1f64 + 0.2;
        assert_eq!(
            compare_numeric(&a.reflect(), &0.3f64.reflect()),
            Ok(Ordering::Equal)
        );
    }

    #[test]
    fn compare_names_both_types() {
        let err = compare_numeric(&5i32.reflect(), &"1".reflect()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(err.to_string(), "unsupported type for NumericCompare: i32 vs str");
    }

    #[test]
    fn delta_reports_signed_difference() {
        let t = delta_within(&10i32.reflect(), &12.5f64.reflect(), 3.0).unwrap();
        assert!(t.within);
        assert_eq!(t.diff, -2.5);
        let t = delta_within(&10i32.reflect(), &14i32.reflect(), 3.0).unwrap();
        assert!(!t.within);
    }

    #[test]
    fn delta_names_failing_side() {
        let err = delta_within(&1i32.reflect(), &"x".reflect(), 1.0).unwrap_err();
        assert_eq!(err.operand(), Some(Operand::Actual));
        let err = delta_within(&vec![1].reflect(), &1i32.reflect(), 1.0).unwrap_err();
        assert_eq!(err.operand(), Some(Operand::Expected));
    }

    #[test]
    fn epsilon_handles_zero_mean() {
        let t = epsilon_within(&0i32.reflect(), &0.0f64.reflect(), 0.0).unwrap();
        assert!(t.within);
        assert_eq!(t.diff, 0.0);
        let t = epsilon_within(&1i32.reflect(), &(-1i32).reflect(), 0.5).unwrap();
        assert!(!t.within);
    }

    #[test]
    fn epsilon_relative_difference() {
        let t = epsilon_within(&100i32.reflect(), &101i32.reflect(), 0.01).unwrap();
        assert!(t.within);
        assert!((t.diff - 1.0 / 100.5).abs() < 1e-12);
        let t = epsilon_within(&100i32.reflect(), &110i32.reflect(), 0.01).unwrap();
        assert!(!t.within);
    }
}
