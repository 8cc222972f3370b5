//! The shared symbol table: an append-only multimap from scope-path keys
//! to identifier lists.
//!
//! Written by pass 1 across every file of the batch, then read-only for
//! the whole of pass 2. Keys are opaque strings and only ever match
//! exactly; a key's list, once written, is never mutated or removed.

use defuse_common::{Ident, IdentKind};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: FxHashMap<String, Vec<Ident>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Append an identifier under a key, creating the list on first use.
    /// No failure mode.
    pub fn record(&mut self, key: String, ident: Ident) {
        trace!(%key, ident = %ident, "record");
        self.entries.entry(key).or_default().push(ident);
    }

    /// Pure read; `None` is the expected steady state for unresolved
    /// symbols, never an error.
    pub fn lookup(&self, key: &str) -> Option<&[Ident]> {
        let found = self.entries.get(key).map(Vec::as_slice);
        trace!(%key, hit = found.is_some(), "lookup");
        found
    }

    /// First `Type` identifier recorded under the key: the declared type
    /// of a variable or field.
    pub fn resolve_type(&self, key: &str) -> Option<&str> {
        self.lookup(key).and_then(first_type)
    }

    /// Recorded keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// First `Type` identifier in a resolved list.
pub fn first_type(list: &[Ident]) -> Option<&str> {
    list.iter()
        .find(|ident| ident.kind == IdentKind::Type)
        .map(|ident| ident.name.as_str())
}

/// Declared return type of a method-key list: the first `Type` recorded
/// after the `Function` identifier. Parameter types come before it, so a
/// `void` or primitive return correctly reads as `None`.
pub fn return_type(list: &[Ident]) -> Option<&str> {
    let mut past_function = false;
    for ident in list {
        match ident.kind {
            IdentKind::Function => past_function = true,
            IdentKind::Type if past_function => return Some(ident.name.as_str()),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_preserves_insertion_order() {
        let mut table = SymbolTable::new();
        table.record("vpkg.TFoo.Mm.x".into(), Ident::var("x"));
        table.record("vpkg.TFoo.Mm.x".into(), Ident::ty("String"));
        let list = table.lookup("vpkg.TFoo.Mm.x").unwrap();
        assert_eq!(list, &[Ident::var("x"), Ident::ty("String")]);
    }

    #[test]
    fn lookup_never_matches_partially() {
        let mut table = SymbolTable::new();
        table.record("vpkg.TFoo.x".into(), Ident::var("x"));
        assert!(table.lookup("vpkg.TFoo").is_none());
        assert!(table.lookup("vpkg.TFoo.x.y").is_none());
    }

    #[test]
    fn resolve_type_takes_first_type() {
        let mut table = SymbolTable::new();
        table.record("k".into(), Ident::var("x"));
        table.record("k".into(), Ident::ty("A"));
        table.record("k".into(), Ident::ty("B"));
        assert_eq!(table.resolve_type("k"), Some("A"));
        assert_eq!(table.resolve_type("missing"), None);
    }

    #[test]
    fn return_type_skips_parameter_types() {
        // void run(Foo p) — parameter type precedes the function marker.
        let void_method = [Ident::var("p"), Ident::ty("Foo"), Ident::func("run")];
        assert_eq!(return_type(&void_method), None);

        // Bar run(Foo p)
        let typed_method = [
            Ident::var("p"),
            Ident::ty("Foo"),
            Ident::func("run"),
            Ident::ty("Bar"),
        ];
        assert_eq!(return_type(&typed_method), Some("Bar"));
    }

    #[test]
    fn idempotent_re_recording_appends_without_clearing() {
        let mut table = SymbolTable::new();
        table.record("k".into(), Ident::var("x"));
        table.record("other".into(), Ident::ty("T"));
        // Re-running pass 1 appends duplicates under the same key but
        // leaves unrelated keys untouched.
        table.record("k".into(), Ident::var("x"));
        assert_eq!(table.lookup("other").unwrap(), &[Ident::ty("T")]);
        assert_eq!(table.lookup("k").unwrap().len(), 2);
    }
}
