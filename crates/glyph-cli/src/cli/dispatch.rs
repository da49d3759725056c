//! Dispatch logic: extract params from ArgMatches and convert to command
//! args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::validate::{OutputMode, ValidateArgs};

pub struct ValidateParams {
    pub file: PathBuf,
    pub json: bool,
    pub pretty: bool,
    pub summary: bool,
    pub search_paths: Vec<PathBuf>,
}

impl ValidateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            file: m.get_one::<PathBuf>("file").cloned().expect("required arg"),
            json: m.get_flag("json"),
            pretty: m.get_flag("pretty"),
            summary: m.get_flag("summary"),
            search_paths: m
                .get_many::<PathBuf>("search_path")
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default(),
        }
    }

    fn output_mode(&self) -> OutputMode {
        if self.summary {
            OutputMode::Summary
        } else if self.json || self.pretty {
            OutputMode::Json {
                pretty: self.pretty,
            }
        } else {
            OutputMode::Human
        }
    }
}

impl From<ValidateParams> for ValidateArgs {
    fn from(p: ValidateParams) -> Self {
        let output = p.output_mode();
        Self {
            file: p.file,
            output,
            search_paths: p.search_paths,
        }
    }
}
