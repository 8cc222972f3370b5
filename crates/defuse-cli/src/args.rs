use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the defuse binary.
#[derive(Parser, Debug)]
#[command(
    name = "defuse",
    version,
    about = "Approximate, binding-free def/use analysis over a batch of Java sources"
)]
pub struct CliArgs {
    /// Source files to analyze, in batch order. Arguments after `--` are
    /// always treated as paths.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Read additional newline-delimited paths from a list file
    /// (`-` reads the list from standard input).
    #[arg(short = 'i', long = "input-list", value_name = "PATH")]
    pub input_list: Option<PathBuf>,

    /// Write output to a file instead of standard output.
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Emit one plain identifier occurrence per line instead of def/use
    /// records.
    #[arg(long)]
    pub idents: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_files_and_flags() {
        let args = CliArgs::parse_from(["defuse", "-o", "out.txt", "A.java", "B.java"]);
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.output.as_deref().unwrap().to_str(), Some("out.txt"));
        assert!(!args.idents);
    }

    #[test]
    fn double_dash_terminates_flag_parsing() {
        let args = CliArgs::parse_from(["defuse", "A.java", "--", "-weird.java"]);
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.files[1].to_str(), Some("-weird.java"));
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(CliArgs::try_parse_from(["defuse", "--bogus"]).is_err());
    }

    #[test]
    fn verbosity_counts() {
        let args = CliArgs::parse_from(["defuse", "-vv", "A.java"]);
        assert_eq!(args.verbose, 2);
    }
}
