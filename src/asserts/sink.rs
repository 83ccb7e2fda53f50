//! Where failed assertions go.

use termcolor::{ColorChoice, StandardStream};

use super::{report, Failure};

/// Receives every failure an [`Asserter`](super::Asserter) produces.
pub trait FailureSink {
    fn report(&mut self, failure: Failure);
}

impl<S: FailureSink + ?Sized> FailureSink for &mut S {
    fn report(&mut self, failure: Failure) {
        (**self).report(failure)
    }
}

impl<S: FailureSink + ?Sized> FailureSink for Box<S> {
    fn report(&mut self, failure: Failure) {
        (**self).report(failure)
    }
}

/// Prints the report to stderr and panics, failing the enclosing `#[test]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanicSink {
    pub use_colors: bool,
}

impl PanicSink {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }
}

/// Colors are on when stderr is a terminal.
impl Default for PanicSink {
    fn default() -> Self {
        Self::new(atty::is(atty::Stream::Stderr))
    }
}

impl FailureSink for PanicSink {
    fn report(&mut self, failure: Failure) {
        let choice = if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        // A failed stderr write is ignored; the panic below still fails the test.
        report::write_failure(&mut stderr, &failure).ok();
        panic!("{}", failure.message);
    }
}

/// Keeps failures in memory instead of failing the test.
///
/// # Examples
///
/// ```rust
/// use verity::asserts::Asserter;
///
/// let mut a = Asserter::recording();
/// assert!(!a.equal(1, 2));
/// assert_eq!(
///     a.sink().last_message(),
///     Some("values not equal: expected: 1 actual: 2")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    failures: Vec<Failure>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    pub fn last(&self) -> Option<&Failure> {
        self.failures.last()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.last().map(|f| f.message.as_str())
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&mut self) -> Vec<Failure> {
        std::mem::take(&mut self.failures)
    }

    pub fn clear(&mut self) {
        self.failures.clear();
    }
}

impl FailureSink for RecordingSink {
    fn report(&mut self, failure: Failure) {
        self.failures.push(failure);
    }
}

/// Discards every failure. Assertions still return `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FailureSink for NullSink {
    fn report(&mut self, _failure: Failure) {}
}
