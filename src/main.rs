use std::io;
use std::process::ExitCode;

use ags4_tools::NativeLibrary;
use ags4_tools::cli::{self, Cli, logging};
use clap::Parser;

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(error) = logging::init(cli.verbose) {
        eprintln!("error: {error}");
        return ExitCode::FAILURE;
    }

    let mut stdout = io::stdout().lock();
    match cli::run(cli, &NativeLibrary, &mut stdout) {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}
