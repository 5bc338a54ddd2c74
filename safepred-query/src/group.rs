//! Flat groups of leaves under one logical operator.
//!
//! A [`Group`] joins its pairs with a single operator and always encloses
//! the result in one pair of parentheses. Groups never mix operators; mixed
//! logic comes from nesting subqueries or combining whole queries.
//!
//! ```rust
//! use safepred_query::{FieldPath, Group};
//!
//! struct Book;
//! let author = FieldPath::<Book, String>::new("author");
//! let words = FieldPath::<Book, i64>::new("wordCount");
//!
//! let group = Group::and([author.equals("Jules Verne"), words.greater_than(100_000)]).unwrap();
//! assert_eq!(group.format(), "(author = ? AND wordCount > ?)");
//!
//! assert!(Group::<Book>::or([]).is_err());
//! ```

use crate::error::{QueryError, QueryResult};
use crate::fragment::Fragment;
use crate::pair::PartialPair;
use crate::value::Argument;
use std::fmt;

/// The operator joining a group's leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// Every leaf holds.
    And,
    /// At least one leaf holds.
    Or,
}

impl LogicalOperator {
    /// The keyword as written in the query.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// The keyword with its surrounding spaces.
    pub const fn separator(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty list of pairs joined by one operator.
pub struct Group<Root> {
    operator: LogicalOperator,
    pairs: Vec<PartialPair<Root>>,
    fragment: Fragment,
}

impl<Root> Group<Root> {
    /// Build a group, failing if `pairs` is empty.
    pub fn new(
        operator: LogicalOperator,
        pairs: impl IntoIterator<Item = PartialPair<Root>>,
    ) -> QueryResult<Self> {
        let pairs: Vec<_> = pairs.into_iter().collect();
        if pairs.is_empty() {
            return Err(QueryError::empty_group(operator.as_str()));
        }
        Ok(Self::compile(operator, pairs))
    }

    /// Join `pairs` under AND.
    pub fn and(pairs: impl IntoIterator<Item = PartialPair<Root>>) -> QueryResult<Self> {
        Self::new(LogicalOperator::And, pairs)
    }

    /// Join `pairs` under OR.
    pub fn or(pairs: impl IntoIterator<Item = PartialPair<Root>>) -> QueryResult<Self> {
        Self::new(LogicalOperator::Or, pairs)
    }

    pub(crate) fn and_pair(left: PartialPair<Root>, right: PartialPair<Root>) -> Self {
        Self::compile(LogicalOperator::And, vec![left, right])
    }

    pub(crate) fn or_pair(left: PartialPair<Root>, right: PartialPair<Root>) -> Self {
        Self::compile(LogicalOperator::Or, vec![left, right])
    }

    /// Append a pair under this group's operator.
    pub fn with(self, pair: PartialPair<Root>) -> Self {
        let mut pairs = self.pairs;
        pairs.push(pair);
        Self::compile(self.operator, pairs)
    }

    // `pairs` is non-empty here.
    fn compile(operator: LogicalOperator, pairs: Vec<PartialPair<Root>>) -> Self {
        let mut fragment = Fragment::new().text("(");
        for (i, pair) in pairs.iter().enumerate() {
            if i > 0 {
                fragment = fragment.text(operator.separator());
            }
            fragment = fragment.append(pair.fragment().clone());
        }
        let fragment = fragment.text(")");

        crate::safepred_trace!(
            operator = operator.as_str(),
            leaves = pairs.len(),
            fragment = %fragment.render(),
            "compiled group"
        );
        Self {
            operator,
            pairs,
            fragment,
        }
    }

    /// The joining operator.
    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    /// The leaves, in order.
    pub fn pairs(&self) -> &[PartialPair<Root>] {
        &self.pairs
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always `false`: a group holds at least one pair.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
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

impl<Root> Clone for Group<Root> {
    fn clone(&self) -> Self {
        Self {
            operator: self.operator,
            pairs: self.pairs.clone(),
            fragment: self.fragment.clone(),
        }
    }
}

impl<Root> fmt::Debug for Group<Root> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group")
            .field("operator", &self.operator)
            .field("format", &self.format())
            .field("arguments", &self.arguments())
            .finish()
    }
}
