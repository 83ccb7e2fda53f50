//! # verity
//!
//! Polymorphic assertions for Rust test suites. Values of any reflectable type
//! are compared structurally by the comparison [`engine`], and every failure is
//! annotated with a trimmed [`stacktrace`] pointing at the test code.
//!
//! ```rust
//! use verity::asserts::Asserter;
//!
//! let mut a = Asserter::recording();
//! a.same_elements(vec![1, 2, 3], vec![3, 2, 1]);
//! a.subset(vec![1, 2, 3], vec![4, 5]);
//! assert_eq!(a.sink().len(), 1);
//! ```

pub use crate::asserts::{AssertConfig, Asserter, Failure, FailureSink};
pub use crate::diagnostics::{EngineError, ErrorKind};
pub use crate::stacktrace::{CaptureConfig, Frame, Frames, StackTrace};
pub use crate::value::{CapabilitySet, Kind, Reflect, Type, Value};

pub mod asserts;
pub mod diagnostics;
pub mod engine;
pub mod stacktrace;
pub mod value;
