//! Typed field paths.
//!
//! A [`FieldPath<Root, Value>`] names a value reachable from a `Root`
//! element and resolves to the dotted expression the evaluation engine
//! understands. The type parameters keep comparisons honest: a path to a
//! `String` only accepts `String` comparisons.
//!
//! Paths are usually generated by `#[derive(Entity)]`, but can be declared
//! by hand:
//!
//! ```rust
//! use safepred_query::FieldPath;
//!
//! struct Author { name: String }
//! struct Book { title: String, author: Author }
//!
//! let author = FieldPath::<Book, Author>::new("author");
//! let name = FieldPath::<Author, String>::new("name");
//! assert_eq!(author.then(&name).expression(), "author.name");
//!
//! // The empty path is the evaluated element itself.
//! assert_eq!(FieldPath::<Book, Book>::this().expression(), "SELF");
//! ```

use smol_str::SmolStr;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;

/// Expression naming the evaluated element itself.
pub const SELF_EXPRESSION: &str = "SELF";

/// A typed reference from a `Root` element to one of its values.
pub struct FieldPath<Root, Value> {
    // Empty means the element itself.
    path: SmolStr,
    _marker: PhantomData<fn(&Root) -> Value>,
}

impl<Root, Value> FieldPath<Root, Value> {
    /// Create a path from a static dotted expression.
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self {
            path: SmolStr::new_static(path),
            _marker: PhantomData,
        }
    }

    /// Create a path from a runtime dotted expression.
    ///
    /// The caller asserts that `path` leads from `Root` to `Value`.
    pub fn from_expression(path: impl AsRef<str>) -> Self {
        Self {
            path: SmolStr::new(path.as_ref().trim()),
            _marker: PhantomData,
        }
    }

    /// Check if this path denotes the evaluated element itself.
    #[inline]
    pub fn is_self(&self) -> bool {
        self.path.is_empty()
    }

    /// The dotted property path, empty for the element itself.
    #[inline]
    pub fn raw(&self) -> &str {
        &self.path
    }

    /// Resolve to the expression handed to the evaluation engine.
    pub fn expression(&self) -> &str {
        if self.is_self() {
            SELF_EXPRESSION
        } else {
            &self.path
        }
    }

    /// Extend this path with a path rooted at its value.
    pub fn then<Next>(&self, next: &FieldPath<Value, Next>) -> FieldPath<Root, Next> {
        let path = match (self.is_self(), next.is_self()) {
            (true, _) => next.path.clone(),
            (_, true) => self.path.clone(),
            _ => SmolStr::from(format!("{}.{}", self.path, next.path)),
        };
        FieldPath {
            path,
            _marker: PhantomData,
        }
    }
}

impl<Root> FieldPath<Root, Root> {
    /// The path to the evaluated element itself.
    #[inline]
    pub const fn this() -> Self {
        Self::new("")
    }
}

impl<Root, Value> Clone for FieldPath<Root, Value> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Root, Value> PartialEq for FieldPath<Root, Value> {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl<Root, Value> Eq for FieldPath<Root, Value> {}

impl<Root, Value> fmt::Debug for FieldPath<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldPath").field(&self.expression()).finish()
    }
}

impl<Root, Value> fmt::Display for FieldPath<Root, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.expression())
    }
}

/// A collection-valued field whose elements can be quantified over.
pub trait Collection {
    /// The element type subqueries and aggregates are scoped to.
    type Element;
}

impl<T> Collection for Vec<T> {
    type Element = T;
}

impl<T, const N: usize> Collection for [T; N] {
    type Element = T;
}

impl<T> Collection for Box<[T]> {
    type Element = T;
}

impl<T> Collection for VecDeque<T> {
    type Element = T;
}

impl<T> Collection for BTreeSet<T> {
    type Element = T;
}

impl<T, S> Collection for HashSet<T, S> {
    type Element = T;
}
