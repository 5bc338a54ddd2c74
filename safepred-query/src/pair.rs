//! Compiled leaves.
//!
//! A [`PartialPair`] binds one field to one comparison or aggregate and is
//! compiled once, when it is built. The usual way to get one is through the
//! builder methods on [`FieldPath`]:
//!
//! ```rust
//! use safepred_query::{FieldPath, StringOptions};
//!
//! struct Book;
//!
//! let title = FieldPath::<Book, String>::new("title");
//! let pair = title.equals_matching("harry", StringOptions::folded());
//! assert_eq!(pair.format(), "title =[cd] ?");
//! ```

use crate::aggregate::Aggregate;
use crate::comparison::Comparison;
use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;
use crate::group::Group;
use crate::options::StringOptions;
use crate::path::{Collection, FieldPath};
use crate::value::{Argument, Bindable, Numeric, Operand};
use std::fmt;
use std::marker::PhantomData;

/// One compiled condition on a `Root` element.
pub struct PartialPair<Root> {
    expression: String,
    fragment: Fragment,
    _marker: PhantomData<fn(&Root)>,
}

impl<Root> PartialPair<Root> {
    /// Compile `comparison` against `path`.
    pub fn new<V: Bindable>(path: &FieldPath<Root, V>, comparison: Comparison<V>) -> Self {
        Self::compiled(path.raw(), comparison.compile(path.raw()))
    }

    /// Compile `comparison` against a precomputed field expression.
    ///
    /// The caller asserts the expression leads from `Root` to `V`.
    pub fn with_expression<V: Bindable>(
        expression: impl Into<String>,
        comparison: Comparison<V>,
    ) -> QueryResult<Self> {
        let expression = expression.into();
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(QueryError::blank_expression());
        }
        Ok(Self::compiled(trimmed, comparison.compile(trimmed)))
    }

    /// Compile an aggregate over the numeric `field` of each element of `collection`.
    pub fn aggregate<C, N>(
        collection: &FieldPath<Root, C>,
        field: &FieldPath<C::Element, N>,
        aggregate: Aggregate<N>,
    ) -> QueryResult<Self>
    where
        C: Collection,
        N: Numeric,
    {
        let fragment = aggregate
            .compile(collection.raw(), field.raw())
            .map_err(|e| e.with_expression(collection.expression()))?;
        Ok(Self::compiled(collection.raw(), fragment))
    }

    pub(crate) fn compiled(expression: &str, fragment: Fragment) -> Self {
        Self {
            expression: expression.to_owned(),
            fragment,
            _marker: PhantomData,
        }
    }

    /// The field expression this pair was compiled against.
    pub fn expression(&self) -> &str {
        &self.expression
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

    /// Combine with another pair under AND.
    pub fn and(self, other: PartialPair<Root>) -> Group<Root> {
        Group::and_pair(self, other)
    }

    /// Combine with another pair under OR.
    pub fn or(self, other: PartialPair<Root>) -> Group<Root> {
        Group::or_pair(self, other)
    }
}

impl<Root> Clone for PartialPair<Root> {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            fragment: self.fragment.clone(),
            _marker: PhantomData,
        }
    }
}

impl<Root> fmt::Debug for PartialPair<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialPair")
            .field("format", &self.format())
            .field("arguments", &self.arguments())
            .finish()
    }
}

// ============================================================================
// Builder methods
// ============================================================================

impl<Root, V: Bindable> FieldPath<Root, V> {
    /// `field = value`
    pub fn equals(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::Is(value.into_operand(), StringOptions::none()))
    }

    /// `field != value`
    pub fn not_equals(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::IsNot(value.into_operand(), StringOptions::none()))
    }

    /// `field IN values`, bound as one collection argument.
    pub fn is_in<I>(&self, values: I) -> PartialPair<Root>
    where
        I: IntoIterator,
        I::Item: Operand<V>,
    {
        let values = values.into_iter().map(Operand::into_operand).collect();
        self.compare(Comparison::In(values, StringOptions::none()))
    }

    /// `field BETWEEN { low, high }`, both ends inclusive.
    pub fn between(&self, low: impl Operand<V>, high: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::Between(low.into_operand(), high.into_operand()))
    }

    /// `field > value`
    pub fn greater_than(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::GreaterThan(value.into_operand()))
    }

    /// `field < value`
    pub fn lesser_than(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::LesserThan(value.into_operand()))
    }

    /// `field CONTAINS value`
    pub fn contains(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::Contains(value.into_operand(), StringOptions::none()))
    }

    /// `field BEGINSWITH value`
    pub fn begins_with(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::BeginsWith(value.into_operand(), StringOptions::none()))
    }

    /// `field ENDSWITH value`
    pub fn ends_with(&self, value: impl Operand<V>) -> PartialPair<Root> {
        self.compare(Comparison::EndsWith(value.into_operand(), StringOptions::none()))
    }

    /// Compile an arbitrary comparison against this field.
    pub fn compare(&self, comparison: Comparison<V>) -> PartialPair<Root> {
        PartialPair::new(self, comparison)
    }
}

/// Variants taking string match options.
impl<Root, V: Bindable + TextValue> FieldPath<Root, V> {
    /// `field =[options] value`
    pub fn equals_matching(
        &self,
        value: impl Operand<V>,
        options: impl Into<StringOptions>,
    ) -> PartialPair<Root> {
        self.compare(Comparison::Is(value.into_operand(), options.into()))
    }

    /// `field !=[options] value`
    pub fn not_equals_matching(
        &self,
        value: impl Operand<V>,
        options: impl Into<StringOptions>,
    ) -> PartialPair<Root> {
        self.compare(Comparison::IsNot(value.into_operand(), options.into()))
    }

    /// `field IN[options] values`
    pub fn is_in_matching<I>(&self, values: I, options: impl Into<StringOptions>) -> PartialPair<Root>
    where
        I: IntoIterator,
        I::Item: Operand<V>,
    {
        let values = values.into_iter().map(Operand::into_operand).collect();
        self.compare(Comparison::In(values, options.into()))
    }

    /// `field CONTAINS[options] value`
    pub fn contains_matching(
        &self,
        value: impl Operand<V>,
        options: impl Into<StringOptions>,
    ) -> PartialPair<Root> {
        self.compare(Comparison::Contains(value.into_operand(), options.into()))
    }

    /// `field BEGINSWITH[options] value`
    pub fn begins_with_matching(
        &self,
        value: impl Operand<V>,
        options: impl Into<StringOptions>,
    ) -> PartialPair<Root> {
        self.compare(Comparison::BeginsWith(value.into_operand(), options.into()))
    }

    /// `field ENDSWITH[options] value`
    pub fn ends_with_matching(
        &self,
        value: impl Operand<V>,
        options: impl Into<StringOptions>,
    ) -> PartialPair<Root> {
        self.compare(Comparison::EndsWith(value.into_operand(), options.into()))
    }
}

/// Collection fields.
impl<Root, C> FieldPath<Root, C>
where
    C: Collection,
    C::Element: Bindable,
{
    /// `ANY field = value`: some element of the collection equals `value`.
    pub fn any_equals(&self, value: impl Operand<C::Element>) -> PartialPair<Root> {
        let comparison = Comparison::AnyIs(value.into_operand(), StringOptions::none());
        PartialPair::compiled(self.raw(), comparison.compile(self.raw()))
    }

    /// `ANY field =[options] value`
    pub fn any_equals_matching(
        &self,
        value: impl Operand<C::Element>,
        options: impl Into<StringOptions>,
    ) -> PartialPair<Root>
    where
        C::Element: TextValue,
    {
        let comparison = Comparison::AnyIs(value.into_operand(), options.into());
        PartialPair::compiled(self.raw(), comparison.compile(self.raw()))
    }
}

impl<Root, C: Collection> FieldPath<Root, C> {
    /// Compare an aggregate over the numeric `field` of each element.
    pub fn aggregate<N: Numeric>(
        &self,
        field: &FieldPath<C::Element, N>,
        aggregate: Aggregate<N>,
    ) -> QueryResult<PartialPair<Root>> {
        PartialPair::aggregate(self, field, aggregate)
    }
}

/// Values that string match options apply to.
pub trait TextValue {}

impl TextValue for String {}
impl TextValue for str {}
impl TextValue for &str {}
impl TextValue for std::borrow::Cow<'_, str> {}
impl TextValue for char {}
impl<T: TextValue> TextValue for Option<T> {}
impl<T: TextValue> TextValue for Box<T> {}
impl<T: TextValue> TextValue for Vec<T> {}
