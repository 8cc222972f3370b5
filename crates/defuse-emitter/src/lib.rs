//! Renders analysis results as text, one section per input file.
//!
//! Def/use mode: a `+ path` header, one line per event group with its
//! identifiers in order (declaration-origin identifiers take the
//! uppercase kind tag, uses the lowercase one), then a blank separator.
//! Occurrence mode: the same framing with one lowercase-tagged line per
//! declared name. Sections for different files never interleave.

use defuse_common::Ident;
use defuse_resolver::DefUseEvent;
use std::io::{self, Write};

/// Write one file's def/use section.
pub fn write_def_use<W: Write>(
    out: &mut W,
    path: &str,
    events: &[DefUseEvent],
) -> io::Result<()> {
    writeln!(out, "+ {path}")?;
    for event in events {
        let mut line = String::new();
        for record in &event.records {
            if !line.is_empty() {
                line.push(' ');
            }
            let tag = if record.is_def {
                record.ident.kind.def_tag()
            } else {
                record.ident.kind.tag()
            };
            line.push(tag);
            line.push_str(&record.ident.name);
        }
        writeln!(out, "{line}")?;
    }
    writeln!(out)
}

/// Write one file's occurrence section (simplified mode).
pub fn write_occurrences<W: Write>(out: &mut W, path: &str, idents: &[Ident]) -> io::Result<()> {
    writeln!(out, "+ {path}")?;
    for ident in idents {
        writeln!(out, "{}{}", ident.kind.tag(), ident.name)?;
    }
    writeln!(out)
}
