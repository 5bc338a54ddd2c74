//! # Safepred
//!
//! Type-safe predicates compiled to a `SUBQUERY`/`@count` predicate string
//! plus positional arguments.
//!
//! Safepred provides:
//! - Typed field paths generated from your structs
//! - Comparisons, aggregates, flat groups and quantified subqueries that only
//!   accept values of the field's type
//! - A compiled `(format, arguments)` pair ready for an evaluation engine
//!
//! ## Quick Start
//!
//! ```rust
//! use safepred::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Entity)]
//! #[safepred(rename_all = "camelCase")]
//! pub struct Book {
//!     #[safepred(id)]
//!     pub id: i64,
//!     pub title: String,
//!     pub reading_time: Duration,
//!     pub chapters: Vec<Chapter>,
//! }
//!
//! #[derive(Entity)]
//! pub struct Chapter {
//!     pub title: String,
//!     pub words: u32,
//! }
//!
//! fn main() {
//!     let query = Query::from(book::reading_time().lesser_than(Duration::from_secs(10 * 3600)))
//!         .and(Query::any(&book::chapters(), chapter::title().contains("Hogwarts")));
//!
//!     assert_eq!(
//!         query.format(),
//!         "(readingTime < ? AND SUBQUERY(chapters, $a0, $a0.title CONTAINS ?).@count > 0)"
//!     );
//!
//!     let (_format, arguments) = query.into_parts();
//!     assert_eq!(arguments.len(), 2);
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use safepred_query::*;

// Re-export proc macros
#[cfg(feature = "derive")]
pub use safepred_codegen::{Bindable, Entity};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use safepred_query::prelude::*;
    pub use safepred_query::{AggregateCompare, LogicalOperator, Quantifier, StringOption};

    #[cfg(feature = "derive")]
    pub use safepred_codegen::{Bindable, Entity};
}
