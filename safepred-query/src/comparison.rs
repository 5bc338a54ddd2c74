//! Leaf comparisons.
//!
//! Each [`Comparison`] variant compiles to exactly one operator template.
//! Values are never embedded: every operand becomes a `?` placeholder and
//! its [`Bindable::bind`] result is appended to the argument list.
//!
//! | Variant | Fragment | Arguments |
//! |---|---|---|
//! | `AnyIs(v, o)` | `ANY E =<o> ?` | `[v]` |
//! | `Is(v, o)` | `E =<o> ?` | `[v]` |
//! | `IsNot(v, o)` | `E !=<o> ?` | `[v]` |
//! | `In(vs, o)` | `E IN<o> ?` | `[vs]` as one list |
//! | `Between(lo, hi)` | `E BETWEEN { ?, ? }` | `[lo, hi]` |
//! | `Contains(v, o)` | `E CONTAINS<o> ?` | `[v]` |
//! | `BeginsWith(v, o)` | `E BEGINSWITH<o> ?` | `[v]` |
//! | `EndsWith(v, o)` | `E ENDSWITH<o> ?` | `[v]` |
//! | `GreaterThan(v)` | `E > ?` | `[v]` |
//! | `LesserThan(v)` | `E < ?` | `[v]` |

use crate::fragment::Fragment;
use crate::options::StringOptions;
use crate::value::{Argument, Bindable};

/// A comparison against a value of type `V`.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison<V> {
    /// Some element of a collection field equals the value.
    AnyIs(V, StringOptions),
    /// The field equals the value.
    Is(V, StringOptions),
    /// The field does not equal the value.
    IsNot(V, StringOptions),
    /// The field equals one of the values.
    In(Vec<V>, StringOptions),
    /// The field lies in the closed range.
    Between(V, V),
    /// The field contains the value.
    Contains(V, StringOptions),
    /// The field begins with the value.
    BeginsWith(V, StringOptions),
    /// The field ends with the value.
    EndsWith(V, StringOptions),
    /// The field is greater than the value.
    GreaterThan(V),
    /// The field is lesser than the value.
    LesserThan(V),
}

impl<V> Comparison<V> {
    /// Equality without match options.
    pub fn equal(value: V) -> Self {
        Self::Is(value, StringOptions::none())
    }

    /// The operator keyword, without match options.
    pub fn operator(&self) -> &'static str {
        match self {
            Self::AnyIs(..) | Self::Is(..) => "=",
            Self::IsNot(..) => "!=",
            Self::In(..) => "IN",
            Self::Between(..) => "BETWEEN",
            Self::Contains(..) => "CONTAINS",
            Self::BeginsWith(..) => "BEGINSWITH",
            Self::EndsWith(..) => "ENDSWITH",
            Self::GreaterThan(_) => ">",
            Self::LesserThan(_) => "<",
        }
    }

    /// The match options, if this variant accepts any.
    pub fn options(&self) -> Option<&StringOptions> {
        match self {
            Self::AnyIs(_, o)
            | Self::Is(_, o)
            | Self::IsNot(_, o)
            | Self::In(_, o)
            | Self::Contains(_, o)
            | Self::BeginsWith(_, o)
            | Self::EndsWith(_, o) => Some(o),
            Self::Between(..) | Self::GreaterThan(_) | Self::LesserThan(_) => None,
        }
    }
}

impl<V: Bindable> Comparison<V> {
    /// Compile against the field at `expression`, relative to the current root.
    ///
    /// An empty `expression` denotes the root element itself.
    pub fn compile(&self, expression: &str) -> Fragment {
        let operator = self.operator();
        let suffix = self.options().map(StringOptions::encode).unwrap_or_default();

        let fragment = match self {
            Self::AnyIs(..) => Fragment::new().text("ANY ").field(expression),
            _ => Fragment::new().field(expression),
        };
        let fragment = fragment.text(" ").text(operator).text(&suffix).text(" ");

        let fragment = match self {
            Self::Between(low, high) => fragment
                .text("{ ")
                .bind(low.bind())
                .text(", ")
                .bind(high.bind())
                .text(" }"),
            Self::In(values, _) => {
                fragment.bind(Argument::List(values.iter().map(Bindable::bind).collect()))
            }
            Self::AnyIs(v, _)
            | Self::Is(v, _)
            | Self::IsNot(v, _)
            | Self::Contains(v, _)
            | Self::BeginsWith(v, _)
            | Self::EndsWith(v, _)
            | Self::GreaterThan(v)
            | Self::LesserThan(v) => fragment.bind(v.bind()),
        };

        crate::safepred_trace!(
            expression = expression,
            operator = operator,
            fragment = %fragment.render(),
            "compiled comparison"
        );
        fragment
    }
}
