//! Bound arguments and the `Bindable` capability.
//!
//! Every value that can appear on the right-hand side of a comparison
//! implements [`Bindable`]. The implementation decides how the value is
//! handed to the evaluation engine:
//!
//! - sequences bind as one [`Argument::List`], never as several slots
//! - raw-backed enums bind their raw value (see `#[derive(Bindable)]`)
//! - entities bind their identity (see `#[derive(Entity)]` with `#[safepred(id)]`)
//! - everything else binds directly
//!
//! ```rust
//! use safepred_query::{Argument, Bindable};
//!
//! assert_eq!(42i32.bind(), Argument::Int(42));
//! assert_eq!("x".bind(), Argument::String("x".into()));
//! assert_eq!(
//!     vec![1i64, 2].bind(),
//!     Argument::List(vec![Argument::Int(1), Argument::Int(2)])
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;

/// A positional argument bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// A collection bound as a single argument.
    List(Vec<Argument>),
}

/// Literal rendering, used when a query is displayed for humans.
impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("nil"),
            Self::Bool(true) => f.write_str("true"),
            Self::Bool(false) => f.write_str("false"),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                f.write_str("\"")
            }
            Self::List(values) => {
                f.write_str("{")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// A value that can be bound as a query argument.
pub trait Bindable {
    /// Convert to the argument handed to the evaluation engine.
    fn bind(&self) -> Argument;
}

/// A value accepted where a comparison expects a `V`.
///
/// Implemented for `V` itself, so unsuffixed literals take the field's type,
/// and for borrowed text where the field holds a `String`.
pub trait Operand<V> {
    /// Convert into the comparison operand.
    fn into_operand(self) -> V;
}

impl<V> Operand<V> for V {
    #[inline]
    fn into_operand(self) -> V {
        self
    }
}

impl Operand<String> for &str {
    fn into_operand(self) -> String {
        self.to_owned()
    }
}

impl Operand<String> for &String {
    fn into_operand(self) -> String {
        self.clone()
    }
}

impl Operand<String> for char {
    fn into_operand(self) -> String {
        self.to_string()
    }
}

impl Operand<String> for Box<str> {
    fn into_operand(self) -> String {
        self.into_string()
    }
}

impl Bindable for Argument {
    fn bind(&self) -> Argument {
        self.clone()
    }
}

impl Bindable for bool {
    fn bind(&self) -> Argument {
        Argument::Bool(*self)
    }
}

macro_rules! bind_lossless_int {
    ($($ty:ty),*) => {
        $(
            impl Bindable for $ty {
                fn bind(&self) -> Argument {
                    Argument::Int(i64::from(*self))
                }
            }
        )*
    };
}

bind_lossless_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! bind_wide_int {
    ($($ty:ty),*) => {
        $(
            impl Bindable for $ty {
                fn bind(&self) -> Argument {
                    // Out-of-range values degrade to a float instead of wrapping.
                    i64::try_from(*self).map_or(Argument::Float(*self as f64), Argument::Int)
                }
            }
        )*
    };
}

bind_wide_int!(u64, usize, isize, i128, u128);

impl Bindable for f32 {
    fn bind(&self) -> Argument {
        Argument::Float(f64::from(*self))
    }
}

impl Bindable for f64 {
    fn bind(&self) -> Argument {
        Argument::Float(*self)
    }
}

impl Bindable for char {
    fn bind(&self) -> Argument {
        Argument::String(self.to_string())
    }
}

impl Bindable for String {
    fn bind(&self) -> Argument {
        Argument::String(self.clone())
    }
}

impl Bindable for str {
    fn bind(&self) -> Argument {
        Argument::String(self.to_owned())
    }
}

impl Bindable for std::borrow::Cow<'_, str> {
    fn bind(&self) -> Argument {
        Argument::String(self.to_string())
    }
}

impl Bindable for std::time::Duration {
    fn bind(&self) -> Argument {
        Argument::Float(self.as_secs_f64())
    }
}

#[cfg(feature = "uuid")]
impl Bindable for uuid::Uuid {
    fn bind(&self) -> Argument {
        Argument::String(self.hyphenated().to_string())
    }
}

impl<T: Bindable + ?Sized> Bindable for &T {
    fn bind(&self) -> Argument {
        (**self).bind()
    }
}

impl<T: Bindable + ?Sized> Bindable for Box<T> {
    fn bind(&self) -> Argument {
        (**self).bind()
    }
}

impl<T: Bindable + ?Sized> Bindable for std::sync::Arc<T> {
    fn bind(&self) -> Argument {
        (**self).bind()
    }
}

impl<T: Bindable> Bindable for Option<T> {
    fn bind(&self) -> Argument {
        match self {
            Some(v) => v.bind(),
            None => Argument::Null,
        }
    }
}

fn bind_all<'a, T: Bindable + 'a>(values: impl IntoIterator<Item = &'a T>) -> Argument {
    Argument::List(values.into_iter().map(Bindable::bind).collect())
}

impl<T: Bindable> Bindable for [T] {
    fn bind(&self) -> Argument {
        bind_all(self)
    }
}

impl<T: Bindable, const N: usize> Bindable for [T; N] {
    fn bind(&self) -> Argument {
        bind_all(self)
    }
}

impl<T: Bindable> Bindable for Vec<T> {
    fn bind(&self) -> Argument {
        bind_all(self)
    }
}

impl<T: Bindable> Bindable for VecDeque<T> {
    fn bind(&self) -> Argument {
        bind_all(self)
    }
}

impl<T: Bindable> Bindable for BTreeSet<T> {
    fn bind(&self) -> Argument {
        bind_all(self)
    }
}

impl<T: Bindable, S> Bindable for HashSet<T, S> {
    fn bind(&self) -> Argument {
        bind_all(self)
    }
}

/// Numeric values usable in aggregate comparisons.
///
/// Aggregate operands are embedded in the fragment as literals rather than
/// bound, so a numeric type must also render itself as one.
pub trait Numeric: Bindable + PartialOrd + Copy {
    /// Render as a literal, or `None` when the value has no literal form.
    fn literal(&self) -> Option<String>;
}

macro_rules! numeric_int {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn literal(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

numeric_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! numeric_float {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                fn literal(&self) -> Option<String> {
                    self.is_finite().then(|| self.to_string())
                }
            }
        )*
    };
}

numeric_float!(f32, f64);
