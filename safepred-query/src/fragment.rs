//! Compiled fragments.
//!
//! A fragment is the compiled text of one comparison, aggregate, group or
//! subquery together with its bound arguments. Field references are kept as
//! separate segments so a fragment compiled against an element type can later
//! be re-rooted at a subquery's scope variable without recompiling the leaf.

use crate::path::SELF_EXPRESSION;
use crate::value::Argument;
use smallvec::SmallVec;
use smol_str::SmolStr;

/// A piece of compiled text.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal query text.
    Text(SmolStr),
    /// A field expression relative to the fragment's root; empty for the root itself.
    Field(SmolStr),
    /// A field expression followed by `.`, as in `reviews.@avg`. Empty for the
    /// root itself, which needs no prefix at the top level.
    Prefix(SmolStr),
}

/// Compiled text plus the arguments its placeholders consume, left to right.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    segments: SmallVec<[Segment; 4]>,
    arguments: Vec<Argument>,
    // Subquery nesting height: 0 for leaves.
    height: usize,
}

impl Fragment {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append literal text.
    pub fn text(mut self, text: impl AsRef<str>) -> Self {
        self.push_text(text.as_ref());
        self
    }

    /// Append a field reference relative to the root.
    pub fn field(mut self, path: impl AsRef<str>) -> Self {
        self.segments.push(Segment::Field(SmolStr::new(path.as_ref())));
        self
    }

    /// Append a field reference used as the left side of a `.` access.
    pub fn prefix(mut self, path: impl AsRef<str>) -> Self {
        self.segments.push(Segment::Prefix(SmolStr::new(path.as_ref())));
        self
    }

    /// Append a `?` placeholder and the argument it consumes.
    pub fn bind(mut self, argument: Argument) -> Self {
        self.push_text("?");
        self.arguments.push(argument);
        self
    }

    /// Append another fragment, taking over its arguments in order.
    pub fn append(mut self, other: Fragment) -> Self {
        for segment in other.segments {
            match segment {
                Segment::Text(t) => self.push_text(&t),
                field => self.segments.push(field),
            }
        }
        self.arguments.extend(other.arguments);
        self.height = self.height.max(other.height);
        self
    }

    /// Set the subquery nesting height.
    pub(crate) fn with_height(mut self, height: usize) -> Self {
        self.height = height;
        self
    }

    /// The subquery nesting height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The bound arguments in placeholder order.
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// Re-root every field reference at `variable`.
    ///
    /// `title` becomes `$a0.title` and the root itself becomes `$a0`. The
    /// result has no root-relative fields left.
    pub fn scoped(&self, variable: &str) -> Fragment {
        let mut out = Fragment {
            segments: SmallVec::new(),
            arguments: self.arguments.clone(),
            height: self.height,
        };
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_text(t),
                Segment::Field(path) if path.is_empty() => out.push_text(variable),
                Segment::Field(path) => {
                    out.push_text(variable);
                    out.push_text(".");
                    out.push_text(path);
                }
                Segment::Prefix(path) => {
                    out.push_text(variable);
                    out.push_text(".");
                    if !path.is_empty() {
                        out.push_text(path);
                        out.push_text(".");
                    }
                }
            }
        }
        out
    }

    /// Render the text with root-relative fields as-is.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Field(path) if path.is_empty() => out.push_str(SELF_EXPRESSION),
                Segment::Field(path) => out.push_str(path),
                Segment::Prefix(path) if path.is_empty() => {}
                Segment::Prefix(path) => {
                    out.push_str(path);
                    out.push('.');
                }
            }
        }
        out
    }

    /// Split into rendered text and arguments.
    pub fn into_parts(self) -> (String, Vec<Argument>) {
        let text = self.render();
        (text, self.arguments)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            let mut joined = String::with_capacity(last.len() + text.len());
            joined.push_str(last);
            joined.push_str(text);
            *last = SmolStr::from(joined);
        } else {
            self.segments.push(Segment::Text(SmolStr::new(text)));
        }
    }
}
