//! Def/use records: the output unit of pass 2.

use defuse_common::Ident;
use smallvec::SmallVec;

/// One identifier occurrence, tagged with whether it originates a
/// declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefUse {
    pub ident: Ident,
    pub is_def: bool,
}

impl DefUse {
    pub fn def(ident: Ident) -> Self {
        DefUse {
            ident,
            is_def: true,
        }
    }

    pub fn used(ident: Ident) -> Self {
        DefUse {
            ident,
            is_def: false,
        }
    }
}

/// An ordered, non-empty group of records produced together by a single
/// statement or expression visit. Groups are emitted atomically: once one
/// begins it is always completed, never split.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DefUseEvent {
    pub records: SmallVec<[DefUse; 4]>,
}

impl DefUseEvent {
    pub fn of(records: impl IntoIterator<Item = DefUse>) -> Self {
        DefUseEvent {
            records: records.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
