//! Quantified subqueries over collection fields.
//!
//! A [`Subquery`] wraps a pair or group scoped to a collection's element
//! type. The inner fragment is re-rooted at a scope variable and a count
//! postcondition encodes the quantifier:
//!
//! | Quantifier | Emitted |
//! |---|---|
//! | any | `SUBQUERY(E, $v, inner).@count > 0` |
//! | all | `SUBQUERY(E, $v, inner).@count == E.@count` |
//! | none | `SUBQUERY(E, $v, inner).@count == 0` |
//!
//! The scope variable is `$a<h>` where `h` is the subquery's nesting height:
//! `$a0` for a subquery over plain leaves, one more than the deepest nested
//! subquery otherwise. An enclosing subquery therefore never reuses a
//! variable that is still in scope inside it.
//!
//! ```rust
//! use safepred_query::{FieldPath, Subquery};
//!
//! struct Book;
//! struct Chapter;
//!
//! let chapters = FieldPath::<Book, Vec<Chapter>>::new("chapters");
//! let title = FieldPath::<Chapter, String>::new("title");
//!
//! let any = Subquery::any(&chapters, title.equals("Hogwarts"));
//! assert_eq!(any.format(), "SUBQUERY(chapters, $a0, $a0.title = ?).@count > 0");
//! ```

use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;
use crate::group::{Group, LogicalOperator};
use crate::pair::PartialPair;
use crate::path::{Collection, FieldPath};
use crate::value::Argument;
use std::fmt;
use std::marker::PhantomData;

/// How many elements of the collection must satisfy the inner predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// At least one element.
    Any,
    /// Every element; holds vacuously for an empty collection.
    All,
    /// No element.
    None,
}

impl Quantifier {
    /// Lowercase name, for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::All => "all",
            Self::None => "none",
        }
    }

    fn postcondition(self, collection: &str) -> Fragment {
        let fragment = Fragment::new().text(").@count ");
        match self {
            Self::Any => fragment.text("> 0"),
            Self::All => fragment.text("== ").field(collection).text(".@count"),
            Self::None => fragment.text("== 0"),
        }
    }
}

/// The predicate a subquery applies to each element.
pub enum Scoped<Element> {
    /// A single leaf.
    Pair(PartialPair<Element>),
    /// A flat group of leaves.
    Group(Group<Element>),
}

impl<Element> Scoped<Element> {
    fn fragment(&self) -> &Fragment {
        match self {
            Self::Pair(pair) => pair.fragment(),
            Self::Group(group) => group.fragment(),
        }
    }
}

impl<Element> From<PartialPair<Element>> for Scoped<Element> {
    fn from(pair: PartialPair<Element>) -> Self {
        Self::Pair(pair)
    }
}

impl<Element> From<Group<Element>> for Scoped<Element> {
    fn from(group: Group<Element>) -> Self {
        Self::Group(group)
    }
}

/// A compiled quantified predicate over a collection field of `Root`.
pub struct Subquery<Root> {
    quantifier: Quantifier,
    collection: String,
    variable: String,
    fragment: Fragment,
    _marker: PhantomData<fn(&Root)>,
}

impl<Root> Subquery<Root> {
    /// Quantify `inner` over the elements of `collection`.
    pub fn new<C: Collection>(
        quantifier: Quantifier,
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        let inner: Scoped<C::Element> = inner.into();
        let inner = inner.fragment();
        let height = inner.height();
        let variable = format!("$a{}", height);

        let fragment = Fragment::new()
            .text("SUBQUERY(")
            .field(collection.raw())
            .text(", ")
            .text(&variable)
            .text(", ")
            .append(inner.scoped(&variable))
            .append(quantifier.postcondition(collection.raw()))
            .with_height(height + 1);

        crate::safepred_debug!(
            quantifier = quantifier.as_str(),
            collection = collection.expression(),
            variable = %variable,
            fragment = %fragment.render(),
            "compiled subquery"
        );
        Self {
            quantifier,
            collection: collection.raw().to_owned(),
            variable,
            fragment,
            _marker: PhantomData,
        }
    }

    /// At least one element satisfies `inner`.
    pub fn any<C: Collection>(
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        Self::new(Quantifier::Any, collection, inner)
    }

    /// Every element satisfies `inner`; an empty collection qualifies.
    pub fn all<C: Collection>(
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        Self::new(Quantifier::All, collection, inner)
    }

    /// No element satisfies `inner`.
    pub fn none<C: Collection>(
        collection: &FieldPath<Root, C>,
        inner: impl Into<Scoped<C::Element>>,
    ) -> Self {
        Self::new(Quantifier::None, collection, inner)
    }

    /// At least one element satisfies every pair.
    pub fn any_and<C: Collection>(
        collection: &FieldPath<Root, C>,
        pairs: impl IntoIterator<Item = PartialPair<C::Element>>,
    ) -> QueryResult<Self> {
        Self::from_pairs(Quantifier::Any, LogicalOperator::And, collection, pairs)
    }

    /// At least one element satisfies some pair.
    pub fn any_or<C: Collection>(
        collection: &FieldPath<Root, C>,
        pairs: impl IntoIterator<Item = PartialPair<C::Element>>,
    ) -> QueryResult<Self> {
        Self::from_pairs(Quantifier::Any, LogicalOperator::Or, collection, pairs)
    }

    /// Quantify a group built from `pairs`, failing if there are none.
    pub fn from_pairs<C: Collection>(
        quantifier: Quantifier,
        operator: LogicalOperator,
        collection: &FieldPath<Root, C>,
        pairs: impl IntoIterator<Item = PartialPair<C::Element>>,
    ) -> QueryResult<Self> {
        let group = Group::new(operator, pairs)
            .map_err(|_| QueryError::empty_subquery(collection.expression()))?;
        Ok(Self::new(quantifier, collection, group))
    }

    /// The quantifier.
    pub fn quantifier(&self) -> Quantifier {
        self.quantifier
    }

    /// The scope variable bound to each element, e.g. `$a0`.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// The compiled fragment.
    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// The compiled text, fields relative to `Root`.
    pub fn format(&self) -> String {
        self.fragment.render()
    }

    /// The bound arguments in placeholder order.
    pub fn arguments(&self) -> &[Argument] {
        self.fragment.arguments()
    }
}

/// A subquery is itself a leaf of its root type, so it can be grouped or
/// nested inside another subquery.
impl<Root> From<Subquery<Root>> for PartialPair<Root> {
    fn from(subquery: Subquery<Root>) -> Self {
        PartialPair::compiled(&subquery.collection, subquery.fragment)
    }
}

impl<Root> From<Subquery<Root>> for Scoped<Root> {
    fn from(subquery: Subquery<Root>) -> Self {
        Self::Pair(subquery.into())
    }
}

impl<Root> Clone for Subquery<Root> {
    fn clone(&self) -> Self {
        Self {
            quantifier: self.quantifier,
            collection: self.collection.clone(),
            variable: self.variable.clone(),
            fragment: self.fragment.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Root> fmt::Debug for Subquery<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subquery")
            .field("quantifier", &self.quantifier)
            .field("format", &self.format())
            .field("arguments", &self.arguments())
            .finish()
    }
}
