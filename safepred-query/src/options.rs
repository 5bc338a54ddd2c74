//! String match modifiers.
//!
//! Modifiers are appended to a comparison operator as a bracketed suffix,
//! one letter per modifier, in the order the caller supplied them:
//!
//! ```rust
//! use safepred_query::{StringOption, StringOptions};
//!
//! let options = StringOptions::from([
//!     StringOption::DiacriticInsensitive,
//!     StringOption::CaseInsensitive,
//! ]);
//! assert_eq!(options.encode(), "[dc]");
//! assert_eq!(StringOptions::none().encode(), "");
//! ```

use smallvec::SmallVec;
use std::fmt;

/// A single string match modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOption {
    /// `"NeXT" =[c] "next"` holds.
    CaseInsensitive,
    /// `"naïve" =[d] "naive"` holds.
    DiacriticInsensitive,
    /// `"straße" =[l] "strasse"` holds.
    LocaleInsensitive,
}

impl StringOption {
    /// Every modifier, in code order.
    pub const ALL: [StringOption; 3] = [
        Self::CaseInsensitive,
        Self::DiacriticInsensitive,
        Self::LocaleInsensitive,
    ];

    /// The single-letter code used in the operator suffix.
    pub const fn code(self) -> char {
        match self {
            Self::CaseInsensitive => 'c',
            Self::DiacriticInsensitive => 'd',
            Self::LocaleInsensitive => 'l',
        }
    }
}

/// An ordered list of string match modifiers.
///
/// Order only affects the textual suffix; the evaluation engine combines the
/// flags commutatively. Duplicates are kept as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StringOptions(SmallVec<[StringOption; 3]>);

impl StringOptions {
    /// No modifiers.
    pub fn none() -> Self {
        Self::default()
    }

    /// Case and diacritic insensitive, the most common combination.
    pub fn folded() -> Self {
        Self::from([StringOption::CaseInsensitive, StringOption::DiacriticInsensitive])
    }

    /// Every modifier.
    pub fn all() -> Self {
        Self::from(StringOption::ALL)
    }

    /// Append a modifier.
    pub fn with(mut self, option: StringOption) -> Self {
        self.0.push(option);
        self
    }

    /// Check if no modifier is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if a modifier is set.
    pub fn contains(&self, option: StringOption) -> bool {
        self.0.contains(&option)
    }

    /// Iterate over the modifiers in caller order.
    pub fn iter(&self) -> impl Iterator<Item = StringOption> + '_ {
        self.0.iter().copied()
    }

    /// Encode as an operator suffix: empty, or `[` + codes + `]`.
    pub fn encode(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let mut out = String::with_capacity(self.0.len() + 2);
        out.push('[');
        out.extend(self.0.iter().map(|o| o.code()));
        out.push(']');
        out
    }
}

impl fmt::Display for StringOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<StringOption> for StringOptions {
    fn from(option: StringOption) -> Self {
        Self(SmallVec::from_iter([option]))
    }
}

impl<const N: usize> From<[StringOption; N]> for StringOptions {
    fn from(options: [StringOption; N]) -> Self {
        Self(options.into_iter().collect())
    }
}

impl From<&[StringOption]> for StringOptions {
    fn from(options: &[StringOption]) -> Self {
        Self(options.iter().copied().collect())
    }
}

impl From<Vec<StringOption>> for StringOptions {
    fn from(options: Vec<StringOption>) -> Self {
        Self(options.into_iter().collect())
    }
}

impl FromIterator<StringOption> for StringOptions {
    fn from_iter<I: IntoIterator<Item = StringOption>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
