//! The compiled query handed to the evaluation engine.
//!
//! A [`Query`] is the final `(format, arguments)` pair. Queries are built from
//! pairs, groups and subqueries, and combined with [`Query::and`] and
//! [`Query::or`]. The empty query is the identity of both combinators, so
//! optional filters compose without special-casing:
//!
//! ```rust
//! use safepred_query::{FieldPath, Query};
//!
//! struct Book;
//! let author = FieldPath::<Book, String>::new("author");
//! let words = FieldPath::<Book, i64>::new("wordCount");
//!
//! let mut query = Query::<Book>::empty();
//! if let Some(name) = Some("Jules Verne") {
//!     query = query.and(author.equals(name));
//! }
//! let query = query.and(words.greater_than(100_000));
//!
//! assert_eq!(query.format(), "(author = ? AND wordCount > ?)");
//! assert_eq!(query.to_string(), r#"(author = "Jules Verne" AND wordCount > 100000)"#);
//! ```

use crate::aggregate::Aggregate;
use crate::error::QueryResult;
use crate::group::{Group, LogicalOperator};
use crate::pair::PartialPair;
use crate::path::{Collection, FieldPath};
use crate::subquery::{Scoped, Subquery};
use crate::value::{Argument, Numeric};
use std::fmt;
use std::marker::PhantomData;

/// The always-true predicate literal.
pub const TRUE_PREDICATE: &str = "TRUEPREDICATE";

/// The always-false predicate literal.
pub const FALSE_PREDICATE: &str = "FALSEPREDICATE";

/// A compiled predicate over `Root` elements.
pub struct Query<Root> {
    format: String,
    arguments: Vec<Argument>,
    _marker: PhantomData<fn(&Root)>,
}

impl<Root> Query<Root> {
    fn from_parts(format: String, arguments: Vec<Argument>) -> Self {
        Self {
            format,
            arguments,
            _marker: PhantomData,
        }
    }

    /// The empty query, the identity of [`and`](Self::and) and [`or`](Self::or).
    pub fn empty() -> Self {
        Self::from_parts(String::new(), Vec::new())
    }

    /// A query every element satisfies.
    pub fn true_predicate() -> Self {
        Self::from_parts(TRUE_PREDICATE.to_owned(), Vec::new())
    }

    /// A query no element satisfies.
    pub fn false_predicate() -> Self {
        Self::from_parts(FALSE_PREDICATE.to_owned(), Vec::new())
    }

    /// Check if this is the empty query.
    pub fn is_empty(&self) -> bool {
        self.format.is_empty()
    }

    /// Both `self` and `other` hold.
    pub fn and(self, other: impl Into<Query<Root>>) -> Self {
        self.combine(LogicalOperator::And, other.into())
    }

    /// Either `self` or `other` holds.
    pub fn or(self, other: impl Into<Query<Root>>) -> Self {
        self.combine(LogicalOperator::Or, other.into())
    }

    fn combine(self, operator: LogicalOperator, other: Query<Root>) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }

        let format = format!("({}{}{})", self.format, operator.separator(), other.format);
        let mut arguments = self.arguments;
        arguments.extend(other.arguments);

        crate::safepred_trace!(operator = operator.as_str(), format = %format, "combined queries");
        Self::from_parts(format, arguments)
    }

    /// Every pair holds.
    pub fn all_of(pairs: impl IntoIterator<Item = PartialPair<Root>>) -> QueryResult<Self> {
        Group::and(pairs).map(Self::from)
    }

    /// At least one pair holds.
    pub fn any_of(pairs: impl IntoIterator<Item = PartialPair<Root>>) -> QueryResult<Self> {
        Group::or(pairs).map(Self::from)
    }

    /// At least one element of `collection` satisfies `inner`.
    pub fn any<C: Collection>(
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        Subquery::any(collection, inner).into()
    }

    /// Every element of `collection` satisfies `inner`.
    pub fn all<C: Collection>(
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        Subquery::all(collection, inner).into()
    }

    /// No element of `collection` satisfies `inner`.
    pub fn none<C: Collection>(
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        Subquery::none(collection, inner).into()
    }

    /// An aggregate over the numeric `field` of each element of `collection`.
    pub fn aggregate<C, N>(
        collection: &FieldPath<Root, C>,
        field: &FieldPath<C::Element, N>,
        aggregate: Aggregate<N>,
    ) -> QueryResult<Self>
    where
        C: Collection,
        N: Numeric,
    {
        PartialPair::aggregate(collection, field, aggregate).map(Self::from)
    }

    /// The query text, empty for the empty query.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The bound arguments in placeholder order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Hand the query over to an engine.
    ///
    /// The empty query becomes [`TRUE_PREDICATE`].
    pub fn into_parts(self) -> (String, Vec<Argument>) {
        if self.is_empty() {
            return (TRUE_PREDICATE.to_owned(), self.arguments);
        }
        crate::safepred_debug!(
            format = %self.format,
            arguments = self.arguments.len(),
            "query handed off"
        );
        (self.format, self.arguments)
    }
}

impl<Root> Default for Query<Root> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Root> From<PartialPair<Root>> for Query<Root> {
    fn from(pair: PartialPair<Root>) -> Self {
        let (format, arguments) = pair.fragment().clone().into_parts();
        Self::from_parts(format, arguments)
    }
}

impl<Root> From<Group<Root>> for Query<Root> {
    fn from(group: Group<Root>) -> Self {
        let (format, arguments) = group.fragment().clone().into_parts();
        Self::from_parts(format, arguments)
    }
}

impl<Root> From<Subquery<Root>> for Query<Root> {
    fn from(subquery: Subquery<Root>) -> Self {
        let (format, arguments) = subquery.fragment().clone().into_parts();
        Self::from_parts(format, arguments)
    }
}

impl<Root> Clone for Query<Root> {
    fn clone(&self) -> Self {
        Self::from_parts(self.format.clone(), self.arguments.clone())
    }
}

impl<Root> PartialEq for Query<Root> {
    fn eq(&self, other: &Self) -> bool {
        self.format == other.format && self.arguments == other.arguments
    }
}

impl<Root> fmt::Debug for Query<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("format", &self.format)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// Renders the query with each placeholder replaced by its argument literal.
impl<Root> fmt::Display for Query<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(TRUE_PREDICATE);
        }
        let mut arguments = self.arguments.iter();
        let mut rest = self.format.as_str();
        while let Some(at) = rest.find('?') {
            f.write_str(&rest[..at])?;
            match arguments.next() {
                Some(argument) => write!(f, "{}", argument)?,
                None => f.write_str("?")?,
            }
            rest = &rest[at + 1..];
        }
        f.write_str(rest)
    }
}
