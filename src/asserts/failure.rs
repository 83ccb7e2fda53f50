use miette::Diagnostic;
use thiserror::Error;

use crate::diagnostics::EngineError;
use crate::stacktrace::StackTrace;
use crate::value::Value;

/// A failed assertion, as handed to a [`FailureSink`](super::FailureSink).
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(verity::assert::failed))]
pub struct Failure {
    /// Name of the assertion method that failed, e.g. `"equal"`.
    pub assertion: &'static str,
    pub message: String,
    /// Multi-line rendering of the expected value, for diffs.
    pub expected: Option<String>,
    pub actual: Option<String>,
    /// Engine error that prevented the comparison, if any.
    #[source]
    pub cause: Option<EngineError>,
    /// Innermost frame of the trace, as `failed at file:line function`.
    #[help]
    pub origin: Option<String>,
    pub trace: Option<StackTrace>,
}

impl Failure {
    pub fn new(assertion: &'static str, message: impl Into<String>) -> Self {
        Self {
            assertion,
            message: message.into(),
            expected: None,
            actual: None,
            cause: None,
            origin: None,
            trace: None,
        }
    }

    /// A failure whose message is the engine error itself.
    pub fn from_engine(assertion: &'static str, cause: EngineError) -> Self {
        Self::new(assertion, cause.to_string()).with_cause(cause)
    }

    pub fn with_values(mut self, expected: &Value, actual: &Value) -> Self {
        self.expected = Some(format!("{:#}", expected));
        self.actual = Some(format!("{:#}", actual));
        self
    }

    pub fn with_renderings(mut self, expected: String, actual: String) -> Self {
        self.expected = Some(expected);
        self.actual = Some(actual);
        self
    }

    pub fn with_cause(mut self, cause: EngineError) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn with_trace(mut self, trace: StackTrace) -> Self {
        self.origin = trace
            .frames()
            .first()
            .map(|frame| format!("failed at {}", frame));
        self.trace = Some(trace);
        self
    }

    /// Whether the expected and actual renderings span several lines and are
    /// worth diffing.
    pub fn has_diff(&self) -> bool {
        match (&self.expected, &self.actual) {
            (Some(e), Some(a)) => e != a && (e.contains('\n') || a.contains('\n')),
            _ => false,
        }
    }
}
