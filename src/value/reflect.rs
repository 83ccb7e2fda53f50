//! Structural introspection: turning statically typed Rust values into [`Value`]s.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::{Elements, Handle, Map, Ref, Struct, Type, Value};
use crate::value::Kind;

/// Types the engine can introspect.
///
/// `type_of` describes the type without needing a value, which is what typed
/// nulls (`None`) and empty containers need. References are transparent:
/// `&T` reflects exactly like `T`.
///
/// # Examples
///
/// ```rust
/// use verity::value::{Kind, Reflect, StructBuilder, Type, Value};
///
/// struct Point { x: i32, y: i32 }
///
/// impl Reflect for Point {
///     const CAPABILITIES: &'static [&'static str] = &["Display"];
///     fn type_of() -> Type {
///         Type::of::<Self>(Kind::Struct)
///     }
///     fn reflect(&self) -> Value {
///         StructBuilder::new::<Self>()
///             .field("x", &self.x)
///             .field("y", &self.y)
///             .build()
///     }
/// }
///
/// assert_eq!(Point { x: 1, y: 2 }.reflect().to_string(), "Point { x: 1, y: 2 }");
/// ```
pub trait Reflect {
    /// Capability names the type declares, checked by [`crate::engine::implements`].
    const CAPABILITIES: &'static [&'static str] = &[];

    fn type_of() -> Type;

    fn reflect(&self) -> Value;
}

// ============================================================================
// CAPABILITY TABLES
// ============================================================================

const INTEGER_CAPABILITIES: &[&str] = &[
    "Clone", "Copy", "Debug", "Default", "Display", "Eq", "FromStr", "Hash", "Ord", "PartialEq",
    "PartialOrd", "Send", "Sync",
];

const FLOAT_CAPABILITIES: &[&str] = &[
    "Clone", "Copy", "Debug", "Default", "Display", "FromStr", "PartialEq", "PartialOrd", "Send",
    "Sync",
];

const TEXT_CAPABILITIES: &[&str] = &[
    "Debug", "Display", "Eq", "Hash", "Ord", "PartialEq", "PartialOrd", "Send", "Sync",
];

const UNIT_CAPABILITIES: &[&str] = &[
    "Clone", "Copy", "Debug", "Default", "Eq", "Hash", "Ord", "PartialEq", "PartialOrd", "Send",
    "Sync",
];

const COLLECTION_CAPABILITIES: &[&str] = &["Default", "Extend", "FromIterator", "IntoIterator"];

const POINTER_CAPABILITIES: &[&str] = &["AsRef", "Borrow", "Deref"];

const FUNCTION_CAPABILITIES: &[&str] = &["Clone", "Copy", "Debug", "Fn", "FnMut", "FnOnce"];

// ============================================================================
// SCALARS
// ============================================================================

macro_rules! reflect_scalar {
    ($($ty:ty => $variant:ident, $kind:ident, $caps:ident;)*) => {$(
        impl Reflect for $ty {
            const CAPABILITIES: &'static [&'static str] = $caps;

            fn type_of() -> Type {
                static TYPE: Lazy<Type> = Lazy::new(|| Type::of::<$ty>(Kind::$kind));
                TYPE.clone()
            }

            fn reflect(&self) -> Value {
                Value::$variant(*self)
            }
        }
    )*};
}

reflect_scalar! {
    bool => Bool, Bool, INTEGER_CAPABILITIES;
    i8 => I8, Int, INTEGER_CAPABILITIES;
    i16 => I16, Int, INTEGER_CAPABILITIES;
    i32 => I32, Int, INTEGER_CAPABILITIES;
    i64 => I64, Int, INTEGER_CAPABILITIES;
    i128 => I128, Int, INTEGER_CAPABILITIES;
    isize => Isize, Int, INTEGER_CAPABILITIES;
    u8 => U8, Uint, INTEGER_CAPABILITIES;
    u16 => U16, Uint, INTEGER_CAPABILITIES;
    u32 => U32, Uint, INTEGER_CAPABILITIES;
    u64 => U64, Uint, INTEGER_CAPABILITIES;
    u128 => U128, Uint, INTEGER_CAPABILITIES;
    usize => Usize, Uint, INTEGER_CAPABILITIES;
    f32 => F32, Float, FLOAT_CAPABILITIES;
    f64 => F64, Float, FLOAT_CAPABILITIES;
    char => Char, Char, INTEGER_CAPABILITIES;
}

impl Reflect for () {
    const CAPABILITIES: &'static [&'static str] = UNIT_CAPABILITIES;

    fn type_of() -> Type {
        static TYPE: Lazy<Type> = Lazy::new(|| Type::of::<()>(Kind::Unit));
        TYPE.clone()
    }

    fn reflect(&self) -> Value {
        Value::Unit
    }
}

/// All text shares one runtime type, whether it was a `str` or a `String`.
impl Reflect for str {
    const CAPABILITIES: &'static [&'static str] = TEXT_CAPABILITIES;

    fn type_of() -> Type {
        static TYPE: Lazy<Type> = Lazy::new(|| Type::of::<str>(Kind::Str));
        TYPE.clone()
    }

    fn reflect(&self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl Reflect for String {
    const CAPABILITIES: &'static [&'static str] = TEXT_CAPABILITIES;

    fn type_of() -> Type {
        str::type_of()
    }

    fn reflect(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl<'a> Reflect for Cow<'a, str> {
    const CAPABILITIES: &'static [&'static str] = TEXT_CAPABILITIES;

    fn type_of() -> Type {
        str::type_of()
    }

    fn reflect(&self) -> Value {
        Value::Str(self.to_string())
    }
}

// ============================================================================
// REFERENCES
// ============================================================================

impl<T: Reflect + ?Sized> Reflect for &T {
    const CAPABILITIES: &'static [&'static str] = T::CAPABILITIES;

    fn type_of() -> Type {
        T::type_of()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for &mut T {
    const CAPABILITIES: &'static [&'static str] = T::CAPABILITIES;

    fn type_of() -> Type {
        T::type_of()
    }

    fn reflect(&self) -> Value {
        (**self).reflect()
    }
}

fn address_of<T: ?Sized>(target: &T) -> usize {
    (target as *const T).cast::<()>() as usize
}

macro_rules! reflect_pointer {
    ($($ptr:ident),*) => {$(
        impl<T: Reflect + ?Sized> Reflect for $ptr<T> {
            const CAPABILITIES: &'static [&'static str] = POINTER_CAPABILITIES;

            fn type_of() -> Type {
                Type::of::<Self>(Kind::Pointer).with_elem(T::type_of())
            }

            fn reflect(&self) -> Value {
                Value::Ref(Ref {
                    ty: Self::type_of(),
                    target: Box::new((**self).reflect()),
                    addr: address_of::<T>(self),
                })
            }
        }
    )*};
}

reflect_pointer!(Box, Rc, Arc);

impl<T: Reflect> Reflect for Option<T> {
    const CAPABILITIES: &'static [&'static str] = &["Default", "IntoIterator"];

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Optional).with_elem(T::type_of())
    }

    fn reflect(&self) -> Value {
        match self {
            None => Value::Null(Self::type_of()),
            Some(inner) => Value::Ref(Ref {
                ty: Self::type_of(),
                target: Box::new(inner.reflect()),
                addr: address_of(inner),
            }),
        }
    }
}

// ============================================================================
// SEQUENCES
// ============================================================================

fn reflect_items<'a, T, I>(ty: Type, items: I) -> Value
where
    T: Reflect + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Seq(Elements {
        ty,
        items: items.into_iter().map(Reflect::reflect).collect(),
    })
}

impl<T: Reflect> Reflect for [T] {
    fn type_of() -> Type {
        Type::of::<Self>(Kind::Slice).with_elem(T::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_items(Self::type_of(), self)
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    const CAPABILITIES: &'static [&'static str] = COLLECTION_CAPABILITIES;

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Slice).with_elem(T::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_items(Self::type_of(), self)
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    const CAPABILITIES: &'static [&'static str] = COLLECTION_CAPABILITIES;

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Slice).with_elem(T::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_items(Self::type_of(), self)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn type_of() -> Type {
        Type::of::<Self>(Kind::Array)
            .with_elem(T::type_of())
            .with_len(N)
    }

    fn reflect(&self) -> Value {
        reflect_items(Self::type_of(), self)
    }
}

macro_rules! reflect_tuple {
    ($(($($name:ident . $idx:tt),+))*) => {$(
        impl<$($name: Reflect),+> Reflect for ($($name,)+) {
            fn type_of() -> Type {
                Type::of::<Self>(Kind::Tuple)
            }

            fn reflect(&self) -> Value {
                Value::Tuple(Elements {
                    ty: Self::type_of(),
                    items: vec![$(self.$idx.reflect()),+],
                })
            }
        }
    )*};
}

reflect_tuple! {
    (A.0)
    (A.0, B.1)
    (A.0, B.1, C.2)
    (A.0, B.1, C.2, D.3)
    (A.0, B.1, C.2, D.3, E.4)
    (A.0, B.1, C.2, D.3, E.4, F.5)
}

// ============================================================================
// MAPS AND SETS
// ============================================================================

fn reflect_entries<'a, K, V, I>(ty: Type, entries: I) -> Value
where
    K: Reflect + 'a,
    V: Reflect + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    Value::Map(Map {
        ty,
        entries: entries
            .into_iter()
            .map(|(k, v)| (k.reflect(), v.reflect()))
            .collect(),
    })
}

/// Sets reflect as maps whose values are all `()`, so membership is key presence.
fn reflect_members<'a, T, I>(ty: Type, members: I) -> Value
where
    T: Reflect + 'a,
    I: IntoIterator<Item = &'a T>,
{
    Value::Map(Map {
        ty,
        entries: members
            .into_iter()
            .map(|m| (m.reflect(), Value::Unit))
            .collect(),
    })
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    const CAPABILITIES: &'static [&'static str] = COLLECTION_CAPABILITIES;

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Map)
            .with_key(K::type_of())
            .with_elem(V::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_entries(Self::type_of(), self)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    const CAPABILITIES: &'static [&'static str] = COLLECTION_CAPABILITIES;

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Map)
            .with_key(K::type_of())
            .with_elem(V::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_entries(Self::type_of(), self)
    }
}

impl<T: Reflect, S> Reflect for HashSet<T, S> {
    const CAPABILITIES: &'static [&'static str] = COLLECTION_CAPABILITIES;

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Map)
            .with_key(T::type_of())
            .with_elem(<()>::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_members(Self::type_of(), self)
    }
}

impl<T: Reflect> Reflect for BTreeSet<T> {
    const CAPABILITIES: &'static [&'static str] = COLLECTION_CAPABILITIES;

    fn type_of() -> Type {
        Type::of::<Self>(Kind::Map)
            .with_key(T::type_of())
            .with_elem(<()>::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_members(Self::type_of(), self)
    }
}

// ============================================================================
// FUNCTIONS
// ============================================================================

macro_rules! reflect_fn {
    ($(($($arg:ident),*))*) => {$(
        impl<R, $($arg),*> Reflect for fn($($arg),*) -> R {
            const CAPABILITIES: &'static [&'static str] = FUNCTION_CAPABILITIES;

            fn type_of() -> Type {
                Type::of::<Self>(Kind::Function)
            }

            fn reflect(&self) -> Value {
                Value::Func(Handle {
                    ty: Self::type_of(),
                    addr: *self as usize,
                })
            }
        }
    )*};
}

reflect_fn! {
    ()
    (A)
    (A, B)
    (A, B, C)
}

// ============================================================================
// DYNAMIC VALUES
// ============================================================================

impl Reflect for Value {
    fn type_of() -> Type {
        Type::of::<Self>(Kind::Dynamic)
    }

    fn reflect(&self) -> Value {
        self.clone()
    }
}

/// JSON numbers all reflect as `f64`, so `1` and `1.0` compare equal.
impl Reflect for serde_json::Value {
    fn type_of() -> Type {
        Type::of::<Self>(Kind::Dynamic)
    }

    fn reflect(&self) -> Value {
        match self {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::F64(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                reflect_items(<Vec<serde_json::Value>>::type_of(), items)
            }
            serde_json::Value::Object(fields) => reflect_entries(
                Type::of::<serde_json::Map<String, serde_json::Value>>(Kind::Map)
                    .with_key(str::type_of())
                    .with_elem(Self::type_of()),
                fields,
            ),
        }
    }
}

impl Reflect for serde_json::Map<String, serde_json::Value> {
    fn type_of() -> Type {
        Type::of::<Self>(Kind::Map)
            .with_key(str::type_of())
            .with_elem(serde_json::Value::type_of())
    }

    fn reflect(&self) -> Value {
        reflect_entries(Self::type_of(), self)
    }
}

// ============================================================================
// USER STRUCTS
// ============================================================================

/// Builds the [`Value`] of a user-defined struct field by field.
pub struct StructBuilder {
    ty: Type,
    fields: Vec<(Cow<'static, str>, Value)>,
}

impl StructBuilder {
    pub fn new<T: Reflect + ?Sized>() -> Self {
        Self {
            ty: T::type_of(),
            fields: Vec::new(),
        }
    }

    pub fn field<V: Reflect + ?Sized>(mut self, name: &'static str, value: &V) -> Self {
        self.fields.push((Cow::Borrowed(name), value.reflect()));
        self
    }

    pub fn build(self) -> Value {
        Value::Struct(Struct {
            ty: self.ty,
            fields: self.fields,
        })
    }
}

/// Implements [`Reflect`] for a struct by listing its fields, optionally with the
/// capabilities it declares.
///
/// ```rust
/// use verity::reflect_struct;
/// use verity::value::{Kind, Reflect};
///
/// struct Celsius { degrees: f64 }
/// reflect_struct!(Celsius { degrees } implements ["Display"]);
///
/// assert_eq!(Celsius::type_of().kind(), Kind::Struct);
/// assert!(Celsius::type_of().has_capability("Display"));
/// ```
#[macro_export]
macro_rules! reflect_struct {
    ($ty:ty { $($field:ident),* $(,)? } $(implements [$($cap:literal),* $(,)?])?) => {
        impl $crate::value::Reflect for $ty {
            const CAPABILITIES: &'static [&'static str] = &[$($($cap),*)?];

            fn type_of() -> $crate::value::Type {
                $crate::value::Type::of::<Self>($crate::value::Kind::Struct)
            }

            fn reflect(&self) -> $crate::value::Value {
                $crate::value::StructBuilder::new::<Self>()
                    $(.field(stringify!($field), &self.$field))*
                    .build()
            }
        }
    };
}
