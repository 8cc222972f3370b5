//! The batch driver: read → parse → pass 1 → pass 2 → emit.
//!
//! Unreadable and unparseable files are reported and dropped; the rest of
//! the batch proceeds. Every surviving tree is held in memory until pass 1
//! has finished for the whole batch, because pass 2 may resolve a
//! reference through a declaration in any file, including one parsed
//! after the referencing file.

use crate::args::CliArgs;
use anyhow::{Context, Result};
use defuse_common::{Diagnostic, LineMap};
use defuse_emitter::{write_def_use, write_occurrences};
use defuse_parser::{CompilationUnit, parse};
use defuse_resolver::{SymbolTable, collect_declarations, collect_occurrences, resolve_file};
use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
pub struct AnalysisResult {
    pub diagnostics: Vec<Diagnostic>,
    /// Files that made it into the batch.
    pub files_read: Vec<PathBuf>,
}

/// Entry point used by the binary: gathers inputs, opens the output
/// stream, and runs the batch.
pub fn run(args: &CliArgs) -> Result<AnalysisResult> {
    let files = gather_inputs(args)?;
    match &args.output {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("cannot open output file: {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let result = analyze(&files, args.idents, &mut out)?;
            out.flush()?;
            Ok(result)
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            let result = analyze(&files, args.idents, &mut out)?;
            out.flush()?;
            Ok(result)
        }
    }
}

/// Positional paths first, then the `-i` list in its own order.
fn gather_inputs(args: &CliArgs) -> Result<Vec<PathBuf>> {
    let mut files = args.files.clone();
    if let Some(list_path) = &args.input_list {
        if list_path.as_os_str() == "-" {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                push_listed(&mut files, &line?);
            }
        } else {
            let content = fs::read_to_string(list_path)
                .with_context(|| format!("cannot open input list: {}", list_path.display()))?;
            for line in content.lines() {
                push_listed(&mut files, line);
            }
        }
    }
    Ok(files)
}

fn push_listed(files: &mut Vec<PathBuf>, line: &str) {
    let trimmed = line.trim();
    if !trimmed.is_empty() {
        files.push(PathBuf::from(trimmed));
    }
}

/// Run the whole batch against one output stream.
pub fn analyze<W: Write>(
    files: &[PathBuf],
    idents_only: bool,
    out: &mut W,
) -> Result<AnalysisResult> {
    let mut result = AnalysisResult::default();

    // Parse everything up front; trees for the whole batch stay resident.
    let mut parsed: Vec<(PathBuf, CompilationUnit)> = Vec::new();
    for path in files {
        info!(path = %path.display(), "parsing");
        let Some(unit) = load_and_parse(path, &mut result.diagnostics) else {
            continue;
        };
        result.files_read.push(path.clone());
        parsed.push((path.clone(), unit));
    }

    if idents_only {
        for (path, unit) in &parsed {
            let idents = collect_occurrences(unit);
            write_occurrences(out, &path.display().to_string(), &idents)?;
        }
        return Ok(result);
    }

    info!(files = parsed.len(), "pass 1");
    let mut table = SymbolTable::new();
    for (path, unit) in &parsed {
        debug!(path = %path.display(), "collecting");
        collect_declarations(unit, &mut table);
    }

    info!(keys = table.len(), "pass 2");
    for (path, unit) in &parsed {
        debug!(path = %path.display(), "resolving");
        let events = resolve_file(unit, &table);
        write_def_use(out, &path.display().to_string(), &events)?;
    }
    Ok(result)
}

fn load_and_parse(path: &Path, diagnostics: &mut Vec<Diagnostic>) -> Option<CompilationUnit> {
    let display_path = path.display().to_string();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %display_path, %err, "dropping unreadable file");
            diagnostics.push(Diagnostic::error(display_path, format!("cannot read file: {err}")));
            return None;
        }
    };
    match parse(&source) {
        Ok(unit) => Some(unit),
        Err(err) => {
            let (line, column) = LineMap::new(&source).location(err.offset);
            warn!(path = %display_path, %err, "dropping unparseable file");
            diagnostics.push(Diagnostic::error(display_path, err.message).at(line, column));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_files_are_dropped_not_fatal() {
        let files = vec![PathBuf::from("/definitely/not/here.java")];
        let mut out = Vec::new();
        let result = analyze(&files, false, &mut out).unwrap();
        assert_eq!(result.diagnostics.len(), 1);
        assert!(result.files_read.is_empty());
        assert!(out.is_empty());
    }
}
