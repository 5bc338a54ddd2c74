//! Aggregate comparisons over collection fields.
//!
//! Unlike leaf comparisons, aggregate operands are embedded as literals:
//! the compiled text is a self-contained sub-expression such as
//! `reviews.@avg.value BETWEEN { 4, 5 }` with no bound arguments.

use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;
use crate::value::Numeric;
use std::ops::RangeInclusive;

/// The comparison applied to an aggregate result.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateCompare<N> {
    /// `> n`
    GreaterThan(N),
    /// `< n`
    LesserThan(N),
    /// `== n`
    Equal(N),
    /// `BETWEEN { lo, hi }`
    Between(RangeInclusive<N>),
}

impl<N: Numeric> AggregateCompare<N> {
    /// Render the operator and its literal operands.
    pub fn operand_text(&self) -> QueryResult<String> {
        Ok(match self {
            Self::GreaterThan(v) => format!("> {}", literal(v)?),
            Self::LesserThan(v) => format!("< {}", literal(v)?),
            Self::Equal(v) => format!("== {}", literal(v)?),
            Self::Between(range) => format!(
                "BETWEEN {{ {}, {} }}",
                literal(range.start())?,
                literal(range.end())?
            ),
        })
    }
}

fn literal<N: Numeric>(value: &N) -> QueryResult<String> {
    value.literal().ok_or_else(|| {
        QueryError::invalid_argument("aggregate", "value has no finite literal form")
    })
}

/// An aggregate function applied to a numeric field of a collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate<N> {
    /// `@count`
    Count(AggregateCompare<N>),
    /// `@avg`
    Average(AggregateCompare<N>),
    /// `@sum`
    Sum(AggregateCompare<N>),
    /// `@max`
    Max(AggregateCompare<N>),
    /// `@min`
    Min(AggregateCompare<N>),
}

impl<N> Aggregate<N> {
    /// The aggregate function keyword.
    pub fn function(&self) -> &'static str {
        match self {
            Self::Count(_) => "@count",
            Self::Average(_) => "@avg",
            Self::Sum(_) => "@sum",
            Self::Max(_) => "@max",
            Self::Min(_) => "@min",
        }
    }

    /// The comparison applied to the aggregate result.
    pub fn compare(&self) -> &AggregateCompare<N> {
        match self {
            Self::Count(c) | Self::Average(c) | Self::Sum(c) | Self::Max(c) | Self::Min(c) => c,
        }
    }
}

impl<N: Numeric> Aggregate<N> {
    /// Compile over the numeric `field` of each element of `collection`.
    ///
    /// Both expressions are raw paths: `collection` is relative to the current
    /// root, `field` to the collection's element. Either may be empty.
    pub fn compile(&self, collection: &str, field: &str) -> QueryResult<Fragment> {
        let operand = self.compare().operand_text()?;

        let mut fragment = Fragment::new().prefix(collection).text(self.function());
        if !field.is_empty() {
            fragment = fragment.text(".").text(field);
        }
        let fragment = fragment.text(" ").text(operand);

        crate::safepred_trace!(
            collection = collection,
            function = self.function(),
            fragment = %fragment.render(),
            "compiled aggregate"
        );
        Ok(fragment)
    }
}
