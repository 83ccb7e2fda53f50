//! Running closures that may panic, and reading what they panicked with.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::engine;
use crate::value::{Reflect, Value};

use super::checks::Outcome;
use super::Failure;

type Payload = Box<dyn Any + Send>;

/// Runs `f`, returning the panic payload if it panicked.
pub(crate) fn catch<F: FnOnce()>(f: F) -> Option<Payload> {
    panic::catch_unwind(AssertUnwindSafe(f)).err()
}

macro_rules! downcast_scalar {
    ($payload:expr, $($ty:ty),*) => {
        $(
            if let Some(v) = $payload.downcast_ref::<$ty>() {
                return Some(v.reflect());
            }
        )*
    };
}

/// Reflects a panic payload: the message of `panic!`, or the value given to
/// `std::panic::panic_any` for primitives and [`Value`].
pub(crate) fn payload_value(payload: &(dyn Any + Send)) -> Option<Value> {
    if let Some(v) = payload.downcast_ref::<Value>() {
        return Some(v.clone());
    }
    downcast_scalar!(
        payload, &'static str, String, bool, char, i8, i16, i32, i64, i128, isize, u8, u16,
        u32, u64, u128, usize, f32, f64
    );
    None
}

fn describe(payload: &(dyn Any + Send)) -> String {
    payload_value(payload).map_or_else(|| "<opaque panic payload>".to_string(), |v| v.to_string())
}

pub(crate) fn panics(payload: Option<Payload>) -> Outcome {
    match payload {
        Some(_) => Ok(()),
        None => Err(Failure::new("panics", "expected panic, but none occurred")),
    }
}

pub(crate) fn not_panics(payload: Option<Payload>) -> Outcome {
    match payload {
        None => Ok(()),
        Some(p) => Err(Failure::new(
            "not_panics",
            format!("unexpected panic: {}", describe(&*p)),
        )),
    }
}

pub(crate) fn panics_with_value(expected: &Value, payload: Option<Payload>) -> Outcome {
    let Some(payload) = payload else {
        return Err(Failure::new(
            "panics_with_value",
            "expected panic, but none occurred",
        ));
    };
    match payload_value(&*payload) {
        Some(actual) if engine::deep_equal(expected, &actual) => Ok(()),
        Some(actual) => Err(Failure::new(
            "panics_with_value",
            format!("expected panic value {}, but got {}", expected, actual),
        )
        .with_values(expected, &actual)),
        None => Err(Failure::new(
            "panics_with_value",
            format!(
                "expected panic value {}, but got <opaque panic payload>",
                expected
            ),
        )),
    }
}
