//! Runtime type descriptors for reflected values.
//!
//! A [`Type`] is what the engine knows about a value without knowing its static
//! Rust type: a name, a coarse [`Kind`], element and key types for containers,
//! and the capabilities the type declares. Two types are the same type when both
//! name and kind agree, so `i32` and `i64` never compare equal even when the
//! values they describe are numerically identical.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::value::Reflect;

/// Matches module qualification inside a type name (`alloc::vec::`, `core::option::`).
static MODULE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[a-z_][a-z0-9_]*::)+").expect("module path pattern is valid")
});

/// Coarse runtime classification of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Unit,
    Bool,
    /// Signed integers of any width.
    Int,
    /// Unsigned integers of any width.
    Uint,
    Float,
    Char,
    Str,
    /// Fixed-length sequence.
    Array,
    /// Growable sequence.
    Slice,
    Tuple,
    Map,
    Struct,
    /// Owning or shared pointer (`Box`, `Rc`, `Arc`).
    Pointer,
    /// A box that may be empty (`Option`).
    Optional,
    Function,
    Channel,
    /// A value whose concrete shape is only known at runtime (`serde_json::Value`).
    Dynamic,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Unit => "unit",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Uint => "uint",
            Kind::Float => "float",
            Kind::Char => "char",
            Kind::Str => "str",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Tuple => "tuple",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Pointer => "pointer",
            Kind::Optional => "optional",
            Kind::Function => "function",
            Kind::Channel => "channel",
            Kind::Dynamic => "dynamic",
        }
    }

    /// Kinds whose values may be a null reference.
    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            Kind::Channel
                | Kind::Function
                | Kind::Optional
                | Kind::Map
                | Kind::Pointer
                | Kind::Slice
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
struct TypeInfo {
    name: Cow<'static, str>,
    kind: Kind,
    elem: Option<Type>,
    key: Option<Type>,
    len: Option<usize>,
    capabilities: BTreeSet<Cow<'static, str>>,
}

/// Immutable, cheaply clonable runtime type descriptor.
///
/// # Examples
///
/// ```rust
/// use verity::value::{Kind, Reflect, Type};
/// let ints = <Vec<i32>>::type_of();
/// assert_eq!(ints.kind(), Kind::Slice);
/// assert_eq!(ints.elem().map(Type::kind), Some(Kind::Int));
/// assert_ne!(i32::type_of(), i64::type_of());
/// ```
#[derive(Clone)]
pub struct Type(Arc<TypeInfo>);

impl Type {
    pub fn new(name: impl Into<Cow<'static, str>>, kind: Kind) -> Self {
        Type(Arc::new(TypeInfo {
            name: name.into(),
            kind,
            elem: None,
            key: None,
            len: None,
            capabilities: BTreeSet::new(),
        }))
    }

    /// Describes `T` by its compiler-provided name.
    pub fn named<T: ?Sized>(kind: Kind) -> Self {
        Type::new(std::any::type_name::<T>(), kind)
    }

    /// Describes `T` by name and carries the capabilities `T` declares.
    pub fn of<T: Reflect + ?Sized>(kind: Kind) -> Self {
        Type::named::<T>(kind).with_capabilities(T::CAPABILITIES.iter().copied())
    }

    /// Growable sequence of `elem`, for values built by hand.
    pub fn slice(elem: Type) -> Self {
        Type::new(format!("[{}]", elem.name()), Kind::Slice).with_elem(elem)
    }

    pub fn array(elem: Type, len: usize) -> Self {
        Type::new(format!("[{}; {}]", elem.name(), len), Kind::Array)
            .with_elem(elem)
            .with_len(len)
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::new(format!("Map<{}, {}>", key.name(), value.name()), Kind::Map)
            .with_key(key)
            .with_elem(value)
    }

    pub fn optional(inner: Type) -> Self {
        Type::new(format!("Option<{}>", inner.name()), Kind::Optional).with_elem(inner)
    }

    pub fn pointer(inner: Type) -> Self {
        Type::new(format!("*{}", inner.name()), Kind::Pointer).with_elem(inner)
    }

    pub fn with_elem(mut self, elem: Type) -> Self {
        Arc::make_mut(&mut self.0).elem = Some(elem);
        self
    }

    pub fn with_key(mut self, key: Type) -> Self {
        Arc::make_mut(&mut self.0).key = Some(key);
        self
    }

    pub fn with_len(mut self, len: usize) -> Self {
        Arc::make_mut(&mut self.0).len = Some(len);
        self
    }

    pub fn with_capabilities<I, C>(mut self, capabilities: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cow<'static, str>>,
    {
        Arc::make_mut(&mut self.0)
            .capabilities
            .extend(capabilities.into_iter().map(Into::into));
        self
    }

    /// Fully qualified name, as reported by the compiler for reflected types.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Name with module paths removed: `alloc::vec::Vec<i32>` becomes `Vec<i32>`.
    pub fn short_name(&self) -> String {
        MODULE_PATH.replace_all(&self.0.name, "").into_owned()
    }

    pub fn kind(&self) -> Kind {
        self.0.kind
    }

    /// Element type of sequences, value type of maps, inner type of pointers and optionals.
    pub fn elem(&self) -> Option<&Type> {
        self.0.elem.as_ref()
    }

    pub fn key(&self) -> Option<&Type> {
        self.0.key.as_ref()
    }

    /// Fixed length, for arrays.
    pub fn len(&self) -> Option<usize> {
        self.0.len
    }

    pub fn capabilities(&self) -> impl Iterator<Item = &str> {
        self.0.capabilities.iter().map(|c| c.as_ref())
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.0.capabilities.iter().any(|c| c == capability)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.kind == other.0.kind && self.0.name == other.0.name)
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.kind.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type")
            .field(&self.0.name)
            .field(&self.0.kind)
            .finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// A named set of capabilities a type must declare to satisfy a contract.
///
/// Capabilities are trait names (`"Display"`, `"Hash"`, or any user-chosen
/// behaviour name) that types advertise through [`Reflect::CAPABILITIES`].
///
/// # Examples
///
/// ```rust
/// use verity::value::{CapabilitySet, Reflect};
/// let hashable = CapabilitySet::new("Hashable", ["Hash", "Eq"]);
/// assert!(hashable.is_satisfied_by(&i32::type_of()));
/// assert!(!hashable.is_satisfied_by(&f64::type_of()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilitySet {
    name: Cow<'static, str>,
    required: BTreeSet<Cow<'static, str>>,
}

impl CapabilitySet {
    pub fn new<I, C>(name: impl Into<Cow<'static, str>>, required: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cow<'static, str>>,
    {
        Self {
            name: name.into(),
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// The contract made of everything `T` declares.
    pub fn of<T: Reflect + ?Sized>() -> Self {
        let ty = T::type_of();
        Self::new(ty.short_name(), T::CAPABILITIES.iter().copied())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_satisfied_by(&self, ty: &Type) -> bool {
        self.required.iter().all(|c| ty.has_capability(c))
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_strips_module_paths() {
        let ty = Type::new("alloc::vec::Vec<core::option::Option<i32>>", Kind::Slice);
        assert_eq!(ty.short_name(), "Vec<Option<i32>>");
    }

    #[test]
    fn identity_is_name_and_kind() {
        let a = Type::new("Point", Kind::Struct);
        let b = Type::new("Point", Kind::Struct).with_capabilities(["Debug"]);
        let c = Type::new("Point", Kind::Tuple);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn builders_do_not_touch_shared_descriptors() {
        let base = Type::new("Widget", Kind::Struct);
        let shared = base.clone();
        let extended = base.with_capabilities(["Display"]);
        assert!(extended.has_capability("Display"));
        assert!(!shared.has_capability("Display"));
    }

    #[test]
    fn nullable_kinds() {
        for kind in [
            Kind::Channel,
            Kind::Function,
            Kind::Optional,
            Kind::Map,
            Kind::Pointer,
            Kind::Slice,
        ] {
            assert!(kind.is_nullable(), "{kind} should be nullable");
        }
        assert!(!Kind::Int.is_nullable());
        assert!(!Kind::Struct.is_nullable());
        assert!(!Kind::Array.is_nullable());
    }
}
