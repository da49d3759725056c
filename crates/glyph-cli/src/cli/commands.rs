//! CLI command tree.

use clap::Command;

use super::args;

pub fn build_cli() -> Command {
    Command::new("glyph")
        .about("Tooling for Glyph service definitions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("validate")
                .about("Validate a Glyph source file and report diagnostics")
                .arg(args::file_arg())
                .arg(args::json_arg())
                .arg(args::pretty_arg())
                .arg(args::summary_arg())
                .arg(args::search_path_arg()),
        )
}
