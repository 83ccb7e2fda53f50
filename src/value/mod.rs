//! # Reflected Values
//!
//! The comparison engine never sees static Rust types. Everything it inspects is
//! first turned into a [`Value`] through the [`Reflect`] trait: a closed enum
//! that records both the data and enough of the runtime [`Type`] to tell an
//! `i32` from an `i64`, a `Vec` from a fixed array, or a null optional from a
//! missing value.
//!
//! ## Module Structure
//!
//! - **`types`**: [`Type`], [`Kind`] and [`CapabilitySet`]
//! - **`reflect`**: the [`Reflect`] trait, std implementations, [`StructBuilder`]

use std::borrow::Cow;
use std::fmt;

mod reflect;
mod types;

pub use reflect::{Reflect, StructBuilder};
pub use types::{CapabilitySet, Kind, Type};

/// A runtime value with its type.
///
/// Equality (`==`) is deep structural equality: see [`crate::engine::deep_equal`].
///
/// # Examples
///
/// ```rust
/// use verity::value::{Reflect, Value};
/// let v = vec![1, 2, 3].reflect();
/// assert_eq!(v.to_string(), "[1, 2, 3]");
/// assert_eq!(v.type_name(), "Vec<i32>");
/// let nil = Value::default();
/// assert_eq!(nil.type_name(), "nil");
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absence of any value, untyped.
    #[default]
    Nil,
    Unit,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    Char(char),
    Str(String),
    /// Arrays and slices.
    Seq(Elements),
    Tuple(Elements),
    Map(Map),
    Struct(Struct),
    /// Non-null pointer or filled optional.
    Ref(Ref),
    Func(Handle),
    Chan(Channel),
    /// Typed null reference. The type's kind is always nullable.
    Null(Type),
}

/// Ordered items of a sequence or tuple.
#[derive(Debug, Clone)]
pub struct Elements {
    pub ty: Type,
    pub items: Vec<Value>,
}

/// Key/value entries of an associative container. Keys are unique.
#[derive(Debug, Clone)]
pub struct Map {
    pub ty: Type,
    pub entries: Vec<(Value, Value)>,
}

#[derive(Debug, Clone)]
pub struct Struct {
    pub ty: Type,
    pub fields: Vec<(Cow<'static, str>, Value)>,
}

/// A pointer-like value together with what it points at.
#[derive(Debug, Clone)]
pub struct Ref {
    pub ty: Type,
    pub target: Box<Value>,
    pub addr: usize,
}

/// Opaque callable, identified by address.
#[derive(Debug, Clone)]
pub struct Handle {
    pub ty: Type,
    pub addr: usize,
}

/// Opaque queue endpoint with the number of messages currently buffered.
#[derive(Debug, Clone)]
pub struct Channel {
    pub ty: Type,
    pub addr: usize,
    pub len: usize,
}

impl Value {
    /// Typed null reference, if `ty` is a nullable kind.
    ///
    /// ```rust
    /// use verity::value::{Reflect, Type, Value};
    /// assert!(Value::null(Type::slice(i32::type_of())).is_some());
    /// assert!(Value::null(i32::type_of()).is_none());
    /// ```
    pub fn null(ty: Type) -> Option<Value> {
        ty.kind().is_nullable().then_some(Value::Null(ty))
    }

    /// Fixed-length sequence built by hand.
    pub fn array(elem: Type, items: Vec<Value>) -> Value {
        let ty = Type::array(elem, items.len());
        Value::Seq(Elements { ty, items })
    }

    /// Growable sequence built by hand.
    pub fn slice(elem: Type, items: Vec<Value>) -> Value {
        Value::Seq(Elements {
            ty: Type::slice(elem),
            items,
        })
    }

    /// Queue endpoint built by hand, for wrapping channel types that expose a length.
    pub fn channel(ty: Type, addr: usize, len: usize) -> Value {
        Value::Chan(Channel { ty, addr, len })
    }

    /// Runtime type of the value; `None` only for [`Value::Nil`].
    pub fn type_of(&self) -> Option<Type> {
        let ty = match self {
            Value::Nil => return None,
            Value::Unit => <()>::type_of(),
            Value::Bool(_) => bool::type_of(),
            Value::I8(_) => i8::type_of(),
            Value::I16(_) => i16::type_of(),
            Value::I32(_) => i32::type_of(),
            Value::I64(_) => i64::type_of(),
            Value::I128(_) => i128::type_of(),
            Value::Isize(_) => isize::type_of(),
            Value::U8(_) => u8::type_of(),
            Value::U16(_) => u16::type_of(),
            Value::U32(_) => u32::type_of(),
            Value::U64(_) => u64::type_of(),
            Value::U128(_) => u128::type_of(),
            Value::Usize(_) => usize::type_of(),
            Value::F32(_) => f32::type_of(),
            Value::F64(_) => f64::type_of(),
            Value::Char(_) => char::type_of(),
            Value::Str(_) => str::type_of(),
            Value::Seq(e) | Value::Tuple(e) => e.ty.clone(),
            Value::Map(m) => m.ty.clone(),
            Value::Struct(s) => s.ty.clone(),
            Value::Ref(r) => r.ty.clone(),
            Value::Func(h) => h.ty.clone(),
            Value::Chan(c) => c.ty.clone(),
            Value::Null(ty) => ty.clone(),
        };
        Some(ty)
    }

    pub fn kind(&self) -> Option<Kind> {
        self.type_of().map(|ty| ty.kind())
    }

    /// Short type name for messages, `"nil"` for the untyped absence.
    pub fn type_name(&self) -> String {
        self.type_of()
            .map_or_else(|| "nil".to_string(), |ty| ty.short_name())
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    /// Writes a value inside a container: text is quoted so `["a b"]` stays readable.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, indent: Option<usize>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Char(c) => write!(f, "{:?}", c),
            other => other.fmt_value(f, indent),
        }
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>, indent: Option<usize>) -> fmt::Result {
        match self {
            Value::Nil | Value::Null(_) => write!(f, "nil"),
            Value::Unit => write!(f, "()"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I8(n) => write!(f, "{}", n),
            Value::I16(n) => write!(f, "{}", n),
            Value::I32(n) => write!(f, "{}", n),
            Value::I64(n) => write!(f, "{}", n),
            Value::I128(n) => write!(f, "{}", n),
            Value::Isize(n) => write!(f, "{}", n),
            Value::U8(n) => write!(f, "{}", n),
            Value::U16(n) => write!(f, "{}", n),
            Value::U32(n) => write!(f, "{}", n),
            Value::U64(n) => write!(f, "{}", n),
            Value::U128(n) => write!(f, "{}", n),
            Value::Usize(n) => write!(f, "{}", n),
            Value::F32(n) => write!(f, "{}", n),
            Value::F64(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => write!(f, "{}", s),
            Value::Seq(e) => Value::fmt_items(f, "[", "]", &e.items, indent),
            Value::Tuple(e) => Value::fmt_items(f, "(", ")", &e.items, indent),
            Value::Map(m) => Value::fmt_map(f, &m.entries, indent),
            Value::Struct(s) => Value::fmt_struct(f, s, indent),
            Value::Ref(r) => r.target.fmt_nested(f, indent),
            Value::Func(h) => write!(f, "fn@{:#x}", h.addr),
            Value::Chan(c) => write!(f, "chan@{:#x}", c.addr),
        }
    }

    /// Separator before an item: a space in compact form, a newline plus indentation
    /// in pretty form.
    fn fmt_break(f: &mut fmt::Formatter<'_>, indent: Option<usize>) -> fmt::Result {
        match indent {
            Some(depth) => write!(f, "\n{:width$}", "", width = depth * 4),
            None => Ok(()),
        }
    }

    fn fmt_items(
        f: &mut fmt::Formatter<'_>,
        open: &str,
        close: &str,
        items: &[Value],
        indent: Option<usize>,
    ) -> fmt::Result {
        write!(f, "{}", open)?;
        let inner = indent.map(|d| d + 1);
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
                if indent.is_none() {
                    write!(f, " ")?;
                }
            }
            Value::fmt_break(f, inner)?;
            item.fmt_nested(f, inner)?;
        }
        if indent.is_some() && !items.is_empty() {
            write!(f, ",")?;
            Value::fmt_break(f, indent)?;
        }
        write!(f, "{}", close)
    }

    fn fmt_map(
        f: &mut fmt::Formatter<'_>,
        entries: &[(Value, Value)],
        indent: Option<usize>,
    ) -> fmt::Result {
        write!(f, "{{")?;
        let inner = indent.map(|d| d + 1);
        for (i, (k, v)) in entries.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
                if indent.is_none() {
                    write!(f, " ")?;
                }
            }
            Value::fmt_break(f, inner)?;
            k.fmt_nested(f, inner)?;
            write!(f, ": ")?;
            v.fmt_nested(f, inner)?;
        }
        if indent.is_some() && !entries.is_empty() {
            write!(f, ",")?;
            Value::fmt_break(f, indent)?;
        }
        write!(f, "}}")
    }

    fn fmt_struct(f: &mut fmt::Formatter<'_>, s: &Struct, indent: Option<usize>) -> fmt::Result {
        write!(f, "{}", s.ty.short_name())?;
        if s.fields.is_empty() {
            return Ok(());
        }
        write!(f, " {{")?;
        let inner = indent.map(|d| d + 1);
        for (i, (name, v)) in s.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match inner {
                Some(_) => Value::fmt_break(f, inner)?,
                None => write!(f, " ")?,
            }
            write!(f, "{}: ", name)?;
            v.fmt_nested(f, inner)?;
        }
        match indent {
            Some(_) => {
                write!(f, ",")?;
                Value::fmt_break(f, indent)?;
            }
            None => write!(f, " ")?,
        }
        write!(f, "}}")
    }
}

/// `{}` renders compactly on one line; `{:#}` renders one item per line, which is
/// what failure diffs are computed over.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = if f.alternate() { Some(0) } else { None };
        self.fmt_value(f, indent)
    }
}
