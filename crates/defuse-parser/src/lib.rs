//! Java front end for the defuse analyzer.
//!
//! `parse` turns source text into a `CompilationUnit`: package name,
//! ordered type declarations with supertype references and members,
//! ordered statements and expressions, and simple names for every
//! declaration. No semantic binding is performed — the resolver
//! substitutes its own heuristic resolution precisely because a batch of
//! arbitrary files need not form a buildable source set.

pub mod parser;
pub mod syntax;

pub use parser::{ParseError, Parser, parse};
pub use syntax::CompilationUnit;
