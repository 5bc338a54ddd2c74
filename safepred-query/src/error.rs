//! Error types for predicate construction.
//!
//! Most misuse is rejected by the type system: a field path only accepts
//! comparisons over its own value type, and aggregates only accept numeric
//! fields. The errors here cover what can only be checked at construction
//! time, such as a group built from zero leaves.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: S{category}{number}
//! - 1xxx: Construction errors (empty group, blank expression, bad argument)
//!
//! ```rust
//! use safepred_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::empty_group("AND");
//! assert_eq!(err.code, ErrorCode::InvalidQuery);
//! assert!(err.to_string().starts_with("[S1001]"));
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for predicate construction.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A group or subquery was built without any leaf (S1001).
    InvalidQuery = 1001,
    /// A precomputed field expression was blank (S1002).
    InvalidExpression = 1002,
    /// An argument could not be bound (S1003).
    InvalidArgument = 1003,
}

impl ErrorCode {
    /// Get the error code string (e.g., "S1001").
    pub fn code(&self) -> String {
        format!("S{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidQuery => "Invalid query",
            Self::InvalidExpression => "Invalid field expression",
            Self::InvalidArgument => "Invalid argument",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The field expression involved.
    pub expression: Option<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<String>,
}

impl ErrorContext {
    /// Create new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operation.
    pub fn operation(mut self, op: impl Into<String>) -> Self {
        self.operation = Some(op.into());
        self
    }

    /// Set the field expression.
    pub fn expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Add a text suggestion.
    pub fn suggest(mut self, text: impl Into<String>) -> Self {
        self.suggestions.push(text.into());
        self
    }
}

/// Errors that can occur while building a predicate.
#[derive(Error, Debug, Clone)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Set the field expression.
    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.context.expression = Some(expression.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(suggestion.into());
        self
    }

    // ============== Constructor Functions ==============

    /// Create an error for a group built from zero pairs.
    pub fn empty_group(operator: impl Into<String>) -> Self {
        let operator = operator.into();
        Self::new(
            ErrorCode::InvalidQuery,
            format!("Cannot build an {} group without any condition", operator),
        )
        .with_context("group")
        .with_suggestion("Pass at least one pair, or use Query::empty() for an optional filter")
    }

    /// Create an error for a subquery built from zero pairs.
    pub fn empty_subquery(collection: impl Into<String>) -> Self {
        let collection = collection.into();
        Self::new(
            ErrorCode::InvalidQuery,
            format!("Cannot build a subquery over {} without any condition", collection),
        )
        .with_context("subquery")
        .with_expression(collection)
        .with_suggestion("Pass at least one pair scoped to the collection's element type")
    }

    /// Create an error for a blank precomputed expression.
    pub fn blank_expression() -> Self {
        Self::new(
            ErrorCode::InvalidExpression,
            "Field expression must not be blank",
        )
        .with_context("expression")
        .with_suggestion("Use FieldPath::this() to compare the evaluated element itself")
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(expression: impl Into<String>, message: impl Into<String>) -> Self {
        let expression = expression.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidArgument,
            format!("Invalid argument for {}: {}", expression, message),
        )
        .with_expression(expression)
    }

    // ============== Error Checks ==============

    /// Check if this is an invalid query error.
    pub fn is_invalid_query(&self) -> bool {
        self.code == ErrorCode::InvalidQuery
    }

    /// Get the suggestions attached to this error.
    pub fn suggestions(&self) -> &[String] {
        &self.context.suggestions
    }
}
