//! Tracing setup for the defuse binary.
//!
//! Verbosity comes from repeated `-v` flags; `DEFUSE_LOG` (or `RUST_LOG`)
//! overrides them with full filter syntax. `DEFUSE_LOG_FORMAT=tree`
//! switches to hierarchical indented output, handy when following the
//! resolver through nested scopes. All output goes to stderr so it never
//! mixes with the record stream on stdout.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

fn build_filter(verbose: u8) -> EnvFilter {
    if let Ok(value) = std::env::var("DEFUSE_LOG") {
        return EnvFilter::builder().parse_lossy(value);
    }
    if std::env::var("RUST_LOG").is_ok() {
        return EnvFilter::from_default_env();
    }
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::builder().parse_lossy(level)
}

/// Initialise the global subscriber once, from the binary's main.
pub fn init_tracing(verbose: u8) {
    let filter = build_filter(verbose);

    let tree = std::env::var("DEFUSE_LOG_FORMAT").is_ok_and(|format| format == "tree");
    if tree {
        let tree_layer = tracing_tree::HierarchicalLayer::default()
            .with_indent_amount(2)
            .with_indent_lines(true)
            .with_targets(true);
        Registry::default().with(filter).with(tree_layer).init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
