//! # Assertions
//!
//! [`Asserter`] is the test-facing layer. Each assertion reflects its arguments,
//! asks the comparison engine for a verdict, and on failure captures a stack
//! trace and hands a [`Failure`] to its [`FailureSink`]. Every assertion returns
//! `true` when it passed.
//!
//! The sink decides what a failure means: [`PanicSink`] (the default) fails the
//! enclosing test, [`RecordingSink`] keeps failures for inspection, [`NullSink`]
//! drops them.
//!
//! ```rust
//! use verity::asserts::Asserter;
//!
//! let mut a = Asserter::new();
//! a.equal(vec![1, 2, 3], vec![1, 2, 3]);
//! a.contains("hello world", "world");
//! a.in_delta(1.0, 1.05, 0.1);
//! ```
//!
//! ## Module Structure
//!
//! - **`checks`**: pure verdicts over reflected values
//! - **`text`**: strings, errors, JSON and timestamps
//! - **`panics`**: panic interception
//! - **`failure`**: the [`Failure`] diagnostic
//! - **`sink`**: failure sinks
//! - **`report`**: colored terminal report

use std::fmt::Display;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::stacktrace::{CaptureConfig, StackTrace};
use crate::value::{CapabilitySet, Reflect};

mod checks;
mod failure;
mod panics;
pub mod report;
mod sink;
mod text;

pub use failure::Failure;
pub use sink::{FailureSink, NullSink, PanicSink, RecordingSink};

use checks::Outcome;

/// Settings shared by every assertion of an [`Asserter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    /// Stack capture for failures. The default skip lands on the caller of the
    /// assertion.
    pub capture: CaptureConfig,
    /// Frames kept in a failure's trace.
    pub trace_limit: usize,
}

impl Default for AssertConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::DEFAULT,
            trace_limit: 32,
        }
    }
}

/// Runs assertions and routes failures to a sink.
pub struct Asserter<S: FailureSink = PanicSink> {
    sink: S,
    config: AssertConfig,
}

impl Asserter<PanicSink> {
    pub fn new() -> Self {
        Self::with_sink(PanicSink::default())
    }
}

impl Default for Asserter<PanicSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl Asserter<RecordingSink> {
    /// An asserter that records failures instead of panicking.
    pub fn recording() -> Self {
        Self::with_sink(RecordingSink::new())
    }
}

impl<S: FailureSink> Asserter<S> {
    pub fn with_sink(sink: S) -> Self {
        Self {
            sink,
            config: AssertConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AssertConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AssertConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Reports a failed outcome. Must be called directly from the public
    /// assertion so the configured skip lands on the test code.
    #[inline(never)]
    fn verdict(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Ok(()) => true,
            Err(failure) => {
                let trace = StackTrace::capture(Some(&self.config.capture));
                let trace = trace.limit(self.config.trace_limit).into_owned();
                self.sink.report(failure.with_trace(trace));
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Equality and identity
    // ------------------------------------------------------------------------

    /// Deep structural equality. Values of different types are never equal.
    pub fn equal<E: Reflect, A: Reflect>(&mut self, expected: E, actual: A) -> bool {
        self.verdict(checks::equal(&expected.reflect(), &actual.reflect()))
    }

    pub fn not_equal<E: Reflect, A: Reflect>(&mut self, not_expected: E, actual: A) -> bool {
        self.verdict(checks::not_equal(&not_expected.reflect(), &actual.reflect()))
    }

    /// Whether both references point at the same address.
    pub fn same<E: ?Sized, A: ?Sized>(&mut self, expected: &E, actual: &A) -> bool {
        let expected = (expected as *const E).cast::<()>() as usize;
        let actual = (actual as *const A).cast::<()>() as usize;
        self.verdict(checks::same(expected, actual))
    }

    /// Whether `object` has exactly the runtime type of `sample`.
    pub fn is_of_type<T: Reflect, O: Reflect>(&mut self, sample: T, object: O) -> bool {
        self.verdict(checks::is_of_type(&sample.reflect(), &object.reflect()))
    }

    pub fn implements<O: Reflect>(&mut self, capabilities: &CapabilitySet, object: O) -> bool {
        self.verdict(checks::implements(capabilities, &object.reflect()))
    }

    // ------------------------------------------------------------------------
    // Nil, empty, zero, booleans
    // ------------------------------------------------------------------------

    pub fn nil<T: Reflect>(&mut self, actual: T) -> bool {
        self.verdict(checks::nil(&actual.reflect()))
    }

    pub fn not_nil<T: Reflect>(&mut self, actual: T) -> bool {
        self.verdict(checks::not_nil(&actual.reflect()))
    }

    pub fn empty<T: Reflect>(&mut self, actual: T) -> bool {
        self.verdict(checks::empty(&actual.reflect()))
    }

    pub fn not_empty<T: Reflect>(&mut self, actual: T) -> bool {
        self.verdict(checks::not_empty(&actual.reflect()))
    }

    pub fn is_zero<T: Reflect>(&mut self, actual: T) -> bool {
        self.verdict(checks::is_zero(&actual.reflect()))
    }

    pub fn is_true(&mut self, condition: bool) -> bool {
        self.verdict(checks::is_true(condition))
    }

    pub fn is_false(&mut self, condition: bool) -> bool {
        self.verdict(checks::is_false(condition))
    }

    // ------------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------------

    /// Substring for text, element for sequences, key for maps and sets.
    pub fn contains<C: Reflect, I: Reflect>(&mut self, container: C, item: I) -> bool {
        self.verdict(checks::contains(&container.reflect(), &item.reflect()))
    }

    pub fn not_contains<C: Reflect, I: Reflect>(&mut self, container: C, item: I) -> bool {
        self.verdict(checks::not_contains(&container.reflect(), &item.reflect()))
    }

    /// Length in bytes for text, in elements otherwise.
    pub fn len<T: Reflect>(&mut self, object: T, length: usize) -> bool {
        self.verdict(checks::len(&object.reflect(), length))
    }

    /// Each element of `sub` occurs in `list`; for maps, each entry of `sub` is in `list`.
    pub fn subset<L: Reflect, U: Reflect>(&mut self, list: L, sub: U) -> bool {
        self.verdict(checks::subset(&list.reflect(), &sub.reflect()))
    }

    /// Same elements with the same multiplicities, in any order.
    pub fn same_elements<A: Reflect, B: Reflect>(&mut self, a: A, b: B) -> bool {
        self.verdict(checks::same_elements(&a.reflect(), &b.reflect()))
    }

    pub fn elements_match<E: Reflect, A: Reflect>(&mut self, expected: E, actual: A) -> bool {
        self.verdict(checks::elements_match(&expected.reflect(), &actual.reflect()))
    }

    // ------------------------------------------------------------------------
    // Numbers
    // ------------------------------------------------------------------------

    pub fn greater<A: Reflect, B: Reflect>(&mut self, a: A, b: B) -> bool {
        self.verdict(checks::greater(&a.reflect(), &b.reflect()))
    }

    pub fn less<A: Reflect, B: Reflect>(&mut self, a: A, b: B) -> bool {
        self.verdict(checks::less(&a.reflect(), &b.reflect()))
    }

    pub fn greater_or_equal<A: Reflect, B: Reflect>(&mut self, a: A, b: B) -> bool {
        self.verdict(checks::greater_or_equal(&a.reflect(), &b.reflect()))
    }

    pub fn less_or_equal<A: Reflect, B: Reflect>(&mut self, a: A, b: B) -> bool {
        self.verdict(checks::less_or_equal(&a.reflect(), &b.reflect()))
    }

    pub fn in_delta<E: Reflect, A: Reflect>(&mut self, expected: E, actual: A, delta: f64) -> bool {
        self.verdict(checks::in_delta(&expected.reflect(), &actual.reflect(), delta))
    }

    /// `epsilon` is a fraction: `0.01` accepts a 1% relative difference.
    pub fn in_epsilon<E: Reflect, A: Reflect>(
        &mut self,
        expected: E,
        actual: A,
        epsilon: f64,
    ) -> bool {
        self.verdict(checks::in_epsilon(
            &expected.reflect(),
            &actual.reflect(),
            epsilon,
        ))
    }

    // ------------------------------------------------------------------------
    // Results and panics
    // ------------------------------------------------------------------------

    pub fn no_error<T, E: Display>(&mut self, result: &Result<T, E>) -> bool {
        self.verdict(text::no_error(result))
    }

    pub fn error<T, E>(&mut self, result: &Result<T, E>) -> bool {
        self.verdict(text::error(result))
    }

    pub fn error_contains<T, E: Display>(&mut self, result: &Result<T, E>, substr: &str) -> bool {
        self.verdict(text::error_contains(result, substr))
    }

    /// Runs `f` and passes if it panicked. The panic does not propagate.
    pub fn panics<F: FnOnce()>(&mut self, f: F) -> bool {
        self.verdict(panics::panics(panics::catch(f)))
    }

    pub fn not_panics<F: FnOnce()>(&mut self, f: F) -> bool {
        self.verdict(panics::not_panics(panics::catch(f)))
    }

    /// Passes if `f` panicked with a payload deep-equal to `expected`.
    ///
    /// `panic!` messages compare as text; values passed to
    /// `std::panic::panic_any` compare when they are primitives or a
    /// [`Value`](crate::value::Value).
    pub fn panics_with_value<V: Reflect, F: FnOnce()>(&mut self, expected: V, f: F) -> bool {
        let expected = expected.reflect();
        self.verdict(panics::panics_with_value(&expected, panics::catch(f)))
    }

    // ------------------------------------------------------------------------
    // Text, JSON, time
    // ------------------------------------------------------------------------

    pub fn matches_regex(&mut self, subject: &str, pattern: &str) -> bool {
        self.verdict(text::matches_regex(subject, pattern))
    }

    pub fn has_prefix(&mut self, subject: &str, prefix: &str) -> bool {
        self.verdict(text::has_prefix(subject, prefix))
    }

    pub fn has_suffix(&mut self, subject: &str, suffix: &str) -> bool {
        self.verdict(text::has_suffix(subject, suffix))
    }

    /// JSON documents with the same structure, ignoring whitespace and key order.
    pub fn json_eq(&mut self, expected: &str, actual: &str) -> bool {
        self.verdict(text::json_eq(expected, actual))
    }

    pub fn within_duration(
        &mut self,
        expected: SystemTime,
        actual: SystemTime,
        delta: Duration,
    ) -> bool {
        self.verdict(text::within_duration(expected, actual, delta))
    }
}
