//! # safepred-query
//!
//! Typed predicate compiler for the Safepred query layer.
//!
//! This crate turns typed field paths and comparisons into a textual
//! predicate plus its positional arguments, ready for an evaluation engine
//! that speaks the `SUBQUERY`/`@count` predicate grammar:
//! - Leaf comparisons (`=`, `!=`, `IN`, `BETWEEN`, `CONTAINS`, ...) with
//!   string match options
//! - Aggregates over collection fields (`@count`, `@avg`, `@sum`, `@max`, `@min`)
//! - Flat AND/OR groups
//! - Quantified subqueries (any / all / none), nestable
//! - Top-level combination with empty-operand short-circuiting
//!
//! ## Comparisons
//!
//! ```rust
//! use safepred_query::{FieldPath, StringOption};
//!
//! struct Book;
//! let title = FieldPath::<Book, String>::new("title");
//!
//! let pair = title.begins_with_matching(
//!     "harry",
//!     [StringOption::CaseInsensitive, StringOption::DiacriticInsensitive],
//! );
//! assert_eq!(pair.format(), "title BEGINSWITH[cd] ?");
//! ```
//!
//! ## Groups and subqueries
//!
//! ```rust
//! use safepred_query::{FieldPath, Query};
//!
//! struct Book;
//! struct Review;
//! let reviews = FieldPath::<Book, Vec<Review>>::new("reviews");
//! let stars = FieldPath::<Review, u8>::new("stars");
//! let author = FieldPath::<Book, String>::new("author");
//!
//! let query = Query::from(author.equals("Jules Verne"))
//!     .and(Query::none(&reviews, stars.lesser_than(2u8)));
//! assert_eq!(
//!     query.format(),
//!     "(author = ? AND SUBQUERY(reviews, $a0, $a0.stars < ?).@count == 0)"
//! );
//! assert_eq!(query.arguments().len(), 2);
//! ```
//!
//! ## Aggregates
//!
//! ```rust
//! use safepred_query::{Aggregate, AggregateCompare, FieldPath, Query};
//!
//! struct Book;
//! struct Review;
//! let reviews = FieldPath::<Book, Vec<Review>>::new("reviews");
//! let stars = FieldPath::<Review, u8>::new("stars");
//!
//! let query = Query::aggregate(
//!     &reviews,
//!     &stars,
//!     Aggregate::Average(AggregateCompare::Between(4..=5)),
//! )
//! .unwrap();
//! assert_eq!(query.format(), "reviews.@avg.stars BETWEEN { 4, 5 }");
//! ```
//!
//! ## Error Handling
//!
//! Construction-time failures (an empty group, a blank expression, a
//! non-finite aggregate literal) are reported as [`QueryError`]:
//!
//! ```rust
//! use safepred_query::{ErrorCode, Query};
//!
//! struct Book;
//! let err = Query::<Book>::all_of([]).unwrap_err();
//! assert_eq!(err.code, ErrorCode::InvalidQuery);
//! assert!(err.to_string().starts_with("[S1001]"));
//! ```

pub mod aggregate;
pub mod comparison;
pub mod error;
pub mod fragment;
pub mod group;
pub mod logging;
pub mod options;
pub mod pair;
pub mod path;
pub mod query;
pub mod subquery;
pub mod value;

pub use aggregate::{Aggregate, AggregateCompare};
pub use comparison::Comparison;
pub use error::{ErrorCode, ErrorContext, QueryError, QueryResult};
pub use fragment::{Fragment, Segment};
pub use group::{Group, LogicalOperator};
pub use options::{StringOption, StringOptions};
pub use pair::{PartialPair, TextValue};
pub use path::{Collection, FieldPath, SELF_EXPRESSION};
pub use query::{FALSE_PREDICATE, Query, TRUE_PREDICATE};
pub use subquery::{Quantifier, Scoped, Subquery};
pub use value::{Argument, Bindable, Numeric, Operand};

// Re-export logging utilities
pub use logging::{get_log_format, get_log_level, is_debug_enabled};

// Re-export tracing for the logging macros
#[doc(hidden)]
pub use tracing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::aggregate::{Aggregate, AggregateCompare};
    pub use crate::error::{QueryError, QueryResult};
    pub use crate::group::Group;
    pub use crate::options::{StringOption, StringOptions};
    pub use crate::pair::PartialPair;
    pub use crate::path::{Collection, FieldPath};
    pub use crate::query::Query;
    pub use crate::subquery::Subquery;
    pub use crate::value::{Argument, Bindable};
}
