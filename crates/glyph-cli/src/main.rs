mod cli;
mod commands;

use cli::{ValidateParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("validate", m)) => {
            let params = ValidateParams::from_matches(m);
            commands::validate::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
