//! The identifier model shared by the resolver and the emitter.

use std::fmt;

/// What kind of symbol an identifier occurrence names.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IdentKind {
    Type,
    Function,
    Variable,
}

impl IdentKind {
    /// Lowercase tag character used for non-declaration occurrences.
    pub fn tag(self) -> char {
        match self {
            IdentKind::Type => 't',
            IdentKind::Function => 'f',
            IdentKind::Variable => 'v',
        }
    }

    /// Uppercase tag character used for declaration-origin occurrences.
    pub fn def_tag(self) -> char {
        match self {
            IdentKind::Type => 'T',
            IdentKind::Function => 'F',
            IdentKind::Variable => 'V',
        }
    }
}

/// An identifier occurrence: a kind plus a simple name. Immutable value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ident {
    pub kind: IdentKind,
    pub name: String,
}

impl Ident {
    pub fn new(kind: IdentKind, name: impl Into<String>) -> Self {
        Ident {
            kind,
            name: name.into(),
        }
    }

    pub fn ty(name: impl Into<String>) -> Self {
        Ident::new(IdentKind::Type, name)
    }

    pub fn func(name: impl Into<String>) -> Self {
        Ident::new(IdentKind::Function, name)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Ident::new(IdentKind::Variable, name)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.tag(), self.name)
    }
}
