//! Deriving the exported C identifier from a file name.
use std::{fmt, path::Path};

use crate::{Error, Result};

/// Keywords from C89 through C23. A symbol spelled like one of these cannot be
/// declared.
const C_KEYWORDS: &[&str] = &[
    "alignas",
    "alignof",
    "auto",
    "bool",
    "break",
    "case",
    "char",
    "const",
    "constexpr",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extern",
    "false",
    "float",
    "for",
    "goto",
    "if",
    "inline",
    "int",
    "long",
    "nullptr",
    "register",
    "restrict",
    "return",
    "short",
    "signed",
    "sizeof",
    "static",
    "static_assert",
    "struct",
    "switch",
    "thread_local",
    "true",
    "typedef",
    "typeof",
    "typeof_unqual",
    "union",
    "unsigned",
    "void",
    "volatile",
    "while",
    "_Alignas",
    "_Alignof",
    "_Atomic",
    "_BitInt",
    "_Bool",
    "_Complex",
    "_Decimal128",
    "_Decimal32",
    "_Decimal64",
    "_Generic",
    "_Imaginary",
    "_Noreturn",
    "_Static_assert",
    "_Thread_local",
];

/// Replaces every `-` and `.` in `base_name` with `_`. Nothing else changes.
///
/// ```
/// assert_eq!(bin2c::sanitize("my-font.ttf"), "my_font_ttf");
/// ```
#[must_use]
pub fn sanitize(base_name: &str) -> String {
    base_name.replace(['-', '.'], "_")
}

/// The identifier the generated source exports.
///
/// The blob is exported as the symbol itself, its length as
/// [`len_symbol`](Self::len_symbol).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Wraps a caller-chosen name as-is, without sanitizing it.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives the symbol from the final segment of `path`, extension included.
    ///
    /// # Errors
    /// Returns [`Error::NoFileName`] when the path has no final segment, like
    /// `/` or `..`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .ok_or_else(|| Error::NoFileName(path.to_path_buf()))?;
        Ok(Self(sanitize(&name.to_string_lossy())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name of the length constant, `<symbol>_len`.
    #[must_use]
    pub fn len_symbol(&self) -> String {
        format!("{}_len", self.0)
    }

    /// Reports the first reason this symbol would not compile as a C
    /// identifier, if any.
    ///
    /// Sanitizing only rewrites `-` and `.`, so a name like `2x.png` or
    /// `int` still comes out unusable. Collisions with other symbols of the
    /// same build are not detected.
    ///
    /// # Errors
    /// Returns the [`SymbolIssue`] found.
    pub fn check(&self) -> std::result::Result<(), SymbolIssue> {
        let name = self.0.as_str();
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return Err(SymbolIssue::Empty);
        };
        if first.is_ascii_digit() {
            return Err(SymbolIssue::LeadingDigit);
        }
        if let Some(c) = name.chars().find(|&c| !(c.is_ascii_alphanumeric() || c == '_')) {
            return Err(SymbolIssue::IllegalChar(c));
        }
        if let Some(keyword) = C_KEYWORDS.iter().copied().find(|&keyword| keyword == name) {
            return Err(SymbolIssue::Keyword(keyword));
        }
        if first == '_' && chars.next().is_some_and(|c| c == '_' || c.is_ascii_uppercase()) {
            return Err(SymbolIssue::ReservedPrefix);
        }
        Ok(())
    }

    /// Like [`check`](Self::check), as a crate error.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSymbol`] if the symbol is unusable.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(|issue| Error::InvalidSymbol {
            symbol: self.0.clone(),
            issue,
        })
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Why a [`Symbol`] cannot be used as a C identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SymbolIssue {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier starts with a digit")]
    LeadingDigit,
    #[error("character {0:?} is not allowed in an identifier")]
    IllegalChar(char),
    #[error("`{0}` is a C keyword")]
    Keyword(&'static str),
    #[error("names starting with `__` or `_` and an uppercase letter are reserved")]
    ReservedPrefix,
}
