//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Glyph source file (positional, required).
pub fn file_arg() -> Arg {
    Arg::new("file")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Glyph source file to validate")
}

/// Emit the structured wire format instead of the human transcript (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output the structured JSON report")
}

/// Indent JSON output (--pretty).
pub fn pretty_arg() -> Arg {
    Arg::new("pretty")
        .long("pretty")
        .action(ArgAction::SetTrue)
        .help("Pretty-print JSON output (implies --json)")
}

/// One-line summary only (--summary).
pub fn summary_arg() -> Arg {
    Arg::new("summary")
        .long("summary")
        .action(ArgAction::SetTrue)
        .help("Print a one-line summary instead of the full report")
}

/// Extra module search path (-I/--search-path), repeatable.
pub fn search_path_arg() -> Arg {
    Arg::new("search_path")
        .short('I')
        .long("search-path")
        .value_name("DIR")
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Additional directory to search for imported modules")
}
