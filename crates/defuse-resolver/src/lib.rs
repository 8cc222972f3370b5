//! The two-pass scope-aware def/use resolver.
//!
//! Pass 1 (`collect_declarations`) walks every file of the batch once,
//! filling one shared append-only `SymbolTable` keyed by scope path. Pass
//! 2 (`resolve_file`) re-walks each file read-only against that table,
//! emitting a `DefUseEvent` group per statement/expression visit and
//! recovering approximate types from lexical scope alone. All trees stay
//! in memory between the passes: a reference may resolve through a
//! declaration in any file of the batch, including ones parsed later.
//!
//! `collect_occurrences` is the simplified variant: declared names only,
//! no resolution.

pub mod collect;
pub mod event;
pub mod occurrences;
pub mod resolve;
pub mod scope;
pub mod table;

pub use collect::collect_declarations;
pub use event::{DefUse, DefUseEvent};
pub use occurrences::collect_occurrences;
pub use resolve::resolve_file;
pub use scope::{ScopeChain, ScopeFrame, ScopeRole};
pub use table::SymbolTable;
