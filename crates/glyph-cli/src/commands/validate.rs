use std::path::PathBuf;

use glyph_compiler::Validator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json { pretty: bool },
    Summary,
}

pub struct ValidateArgs {
    pub file: PathBuf,
    pub output: OutputMode,
    pub search_paths: Vec<PathBuf>,
}

pub fn run(args: ValidateArgs) {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", args.file.display(), e);
            std::process::exit(2);
        }
    };

    let mut validator = Validator::new(source, args.file.display().to_string());
    for path in args.search_paths {
        validator = validator.with_search_path(path);
    }
    let result = validator.validate();

    match args.output {
        OutputMode::Human => print!("{}", result.to_human()),
        OutputMode::Summary => println!("{}", result.summary()),
        OutputMode::Json { pretty } => match result.to_json(pretty) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: cannot serialize report: {e}");
                std::process::exit(2);
            }
        },
    }

    if !result.valid {
        std::process::exit(1);
    }
}
