//! # Comparison Engine
//!
//! Pure functions over reflected [`Value`](crate::value::Value)s. Nothing here
//! holds state, performs I/O, or panics on bad input: operations that can fail
//! return an [`EngineError`](crate::diagnostics::EngineError) naming the
//! offending type.
//!
//! Every operation that needs equality goes through [`deep_equal`].
//!
//! ## Module Structure
//!
//! - **`equality`**: the shared recursive comparator
//! - **`numeric`**: coercion to `f64`, ordering, delta and epsilon tolerance
//! - **`containers`**: contains, subset, multiset equality, length
//! - **`predicates`**: nil, empty, zero, type and capability checks

mod containers;
mod equality;
mod numeric;
mod predicates;

pub use containers::{contains, length, multiset_equal, subset};
pub use equality::deep_equal;
pub use numeric::{
    compare_numeric, delta_within, epsilon_within, to_f64, Tolerance, NUMERIC_EPSILON,
};
pub use predicates::{implements, is_empty, is_nil, is_zero, type_equals};
