//! # Engine Diagnostics
//!
//! Every comparison-engine failure is an [`EngineError`]. Errors are returned, never
//! raised: the assertion layer decides whether one becomes a test failure.
//!
//! The taxonomy is deliberately small:
//!
//! - **`UnsupportedType`**: a value's kind cannot take part in the requested operation.
//!   Always names the offending type, and which operand it was when that matters.
//! - **`TypeMismatch`**: two operands that must agree in kind do not.
//! - **`Unhashable`**: an element cannot serve as a distinguishing key.
//!
//! Tests should match on [`EngineError::kind`] rather than on message text.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Type-safe classification of [`EngineError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedType,
    TypeMismatch,
    Unhashable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UnsupportedType => "UnsupportedType",
            ErrorKind::TypeMismatch => "TypeMismatch",
            ErrorKind::Unhashable => "Unhashable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The engine operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    NumericCoerce,
    NumericCompare,
    DeltaWithin,
    EpsilonWithin,
    Contains,
    Subset,
    MultisetEqual,
    Length,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::NumericCoerce => "NumericCoerce",
            Operation::NumericCompare => "NumericCompare",
            Operation::DeltaWithin => "DeltaWithin",
            Operation::EpsilonWithin => "EpsilonWithin",
            Operation::Contains => "Contains",
            Operation::Subset => "Subset",
            Operation::MultisetEqual => "MultisetEqual",
            Operation::Length => "Length",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which argument of an operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// The only argument of a unary operation.
    Value,
    /// Both arguments of a binary operation.
    Both,
    Expected,
    Actual,
    Container,
    Item,
    Superset,
    Subset,
    First,
    Second,
}

impl Operand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operand::Value => "value",
            Operand::Both => "operands",
            Operand::Expected => "expected",
            Operand::Actual => "actual",
            Operand::Container => "container",
            Operand::Item => "item",
            Operand::Superset => "superset",
            Operand::Subset => "subset",
            Operand::First => "first",
            Operand::Second => "second",
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn describe(operand: &Operand, found: &str) -> String {
    match operand {
        Operand::Value | Operand::Both => found.to_string(),
        side => format!("{} is {}", side, found),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum EngineError {
    #[error("unsupported type for {operation}: {}", describe(.operand, .found))]
    #[diagnostic(
        code(verity::engine::unsupported_type),
        help("only numbers coerce to f64; only text, sequences and maps act as containers")
    )]
    UnsupportedType {
        operation: Operation,
        operand: Operand,
        /// Type name of the offending value, or `"a vs b"` when both operands are named.
        found: String,
    },

    #[error("{operand} must be {expected}, got {found}")]
    #[diagnostic(
        code(verity::engine::type_mismatch),
        help("both operands must share a kind for this operation")
    )]
    TypeMismatch {
        operation: Operation,
        operand: Operand,
        expected: &'static str,
        found: String,
    },

    #[error("{operation}: element of type {found} cannot be used as a distinguishing key")]
    #[diagnostic(
        code(verity::engine::unhashable),
        help(
            "elements containing slices or maps cannot be counted; compare them with equal instead"
        )
    )]
    Unhashable { operation: Operation, found: String },
}

impl EngineError {
    pub(crate) fn unsupported(
        operation: Operation,
        operand: Operand,
        found: impl Into<String>,
    ) -> Self {
        EngineError::UnsupportedType {
            operation,
            operand,
            found: found.into(),
        }
    }

    pub(crate) fn mismatch(
        operation: Operation,
        operand: Operand,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        EngineError::TypeMismatch {
            operation,
            operand,
            expected,
            found: found.into(),
        }
    }

    pub(crate) fn unhashable(operation: Operation, found: impl Into<String>) -> Self {
        EngineError::Unhashable {
            operation,
            found: found.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            EngineError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            EngineError::Unhashable { .. } => ErrorKind::Unhashable,
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            EngineError::UnsupportedType { operation, .. }
            | EngineError::TypeMismatch { operation, .. }
            | EngineError::Unhashable { operation, .. } => *operation,
        }
    }

    /// The argument the error refers to, if it refers to one.
    pub fn operand(&self) -> Option<Operand> {
        match self {
            EngineError::UnsupportedType { operand, .. }
            | EngineError::TypeMismatch { operand, .. } => Some(*operand),
            EngineError::Unhashable { .. } => None,
        }
    }
}
