//! Command line front end: argument parsing, dispatch on file types, and
//! console output.

pub mod logging;
pub mod report;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use tracing::debug;

use crate::ags4::tools::error::{Result, ToolError};
use crate::ags4::tools::library::Ags4Library;

/// Reports with this many entries or more go to a file instead of the screen.
pub const SCREEN_ERROR_LIMIT: usize = 100;

/// File written next to the input when a long report needs a home.
pub const DEFAULT_ERROR_LOG: &str = "error_log.txt";

#[derive(Debug, Parser)]
#[command(
    name = "ags4_cli",
    author,
    version,
    about = "A tool to read, write, and check AGS4 files."
)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert .ags file to .xlsx file or vice versa.
    #[command(after_help = "e.g.\n\n  Linux/Mac: ags4_cli convert ~/temp/data.ags ~/temp/data.xlsx\n\n  Windows:   ags4_cli convert c:\\Temp\\data.ags c:\\Temp\\data.xlsx")]
    Convert(ConvertArgs),
    /// Check .ags file for errors based on AGS4 rules.
    Check(CheckArgs),
}

#[derive(Debug, clap::Args)]
pub struct ConvertArgs {
    /// Path to input file. The file should be either .ags or .xlsx
    pub input_file: PathBuf,

    /// Path to output file. The file should be either .ags or .xlsx
    pub output_file: PathBuf,

    /// Format numeric data based on TYPE values if converting from .xlsx to
    /// .ags (true [default] or false).
    #[arg(short = 'f', long = "format_columns", default_value = "true")]
    pub format_columns: String,

    /// Path to AGS4 dictionary file. Numeric data will be formatted based on
    /// TYPE values from this file if converting from .xlsx to .ags.
    #[arg(short = 'd', long)]
    pub dictionary: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct CheckArgs {
    /// Path to .ags file to be checked.
    pub input_file: PathBuf,

    /// Path to save error log.
    #[arg(short = 'o', long = "output_file")]
    pub output_file: Option<PathBuf>,

    /// Path to AGS4 dictionary file.
    #[arg(short = 'd', long)]
    pub dictionary: Option<PathBuf>,
}

/// Result of a subcommand that ran to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The request was rejected after reporting why on the console.
    Rejected,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::FAILURE,
        }
    }
}

/// File types the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Ags,
    Xlsx,
}

impl FileKind {
    /// Classifies a path by its extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "ags" => Some(FileKind::Ags),
            "xlsx" => Some(FileKind::Xlsx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Ags => "ags",
            FileKind::Xlsx => "xlsx",
        }
    }
}

/// What `convert` should do for a pair of paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPlan {
    AgsToSpreadsheet,
    SpreadsheetToAgs,
    /// Both files share a type, nothing to convert.
    SameType(FileKind),
    Invalid,
}

impl ConversionPlan {
    pub fn for_paths(input: &Path, output: &Path) -> Self {
        match (FileKind::from_path(input), FileKind::from_path(output)) {
            (Some(FileKind::Ags), Some(FileKind::Xlsx)) => ConversionPlan::AgsToSpreadsheet,
            (Some(FileKind::Xlsx), Some(FileKind::Ags)) => ConversionPlan::SpreadsheetToAgs,
            (Some(from), Some(to)) if from == to => ConversionPlan::SameType(from),
            _ => ConversionPlan::Invalid,
        }
    }
}

/// Interprets the `--format_columns` value; `true` and `yes` enable it.
pub fn parse_format_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "yes")
}

/// Runs the parsed command against `library`, writing console output to `out`.
pub fn run<L, W>(cli: Cli, library: &L, out: &mut W) -> Result<Outcome>
where
    L: Ags4Library + ?Sized,
    W: Write,
{
    match cli.command {
        Command::Convert(args) => execute_convert(args, library, out),
        Command::Check(args) => execute_check(args, library, out),
    }
}

fn execute_convert<L, W>(args: ConvertArgs, library: &L, out: &mut W) -> Result<Outcome>
where
    L: Ags4Library + ?Sized,
    W: Write,
{
    require_exists(&args.input_file)?;
    if let Some(dictionary) = &args.dictionary {
        require_exists(dictionary)?;
    }

    let plan = ConversionPlan::for_paths(&args.input_file, &args.output_file);
    debug!(?plan, "conversion planned");

    match plan {
        ConversionPlan::AgsToSpreadsheet => {
            announce(out, &args.input_file, &args.output_file)?;
            library.convert_to_spreadsheet(&args.input_file, &args.output_file)?;
            writeln!(out, "\n{}\n", "File conversion complete! ✔".green())?;
        }
        ConversionPlan::SpreadsheetToAgs => {
            announce(out, &args.input_file, &args.output_file)?;
            let format_numeric_columns = parse_format_flag(&args.format_columns);
            library.spreadsheet_to_convert(
                &args.input_file,
                &args.output_file,
                format_numeric_columns,
                args.dictionary.as_deref(),
            )?;
            writeln!(out, "\n{}\n", "File conversion complete! ✔".green())?;
        }
        ConversionPlan::SameType(kind) => {
            let extension = args
                .input_file
                .extension()
                .and_then(|extension| extension.to_str())
                .unwrap_or(kind.extension());
            writeln!(
                out,
                "{}",
                format!(
                    "Both input and output files are of the same type (i.e. .{extension}). No conversion necessary."
                )
                .yellow()
            )?;
        }
        ConversionPlan::Invalid => {
            writeln!(out, "{}", "ERROR: Invalid filenames.".red())?;
            writeln!(
                out,
                "{}",
                "Try \"ags4_cli convert --help\" to see help and examples.".red()
            )?;
            return Ok(Outcome::Rejected);
        }
    }

    Ok(Outcome::Success)
}

fn execute_check<L, W>(args: CheckArgs, library: &L, out: &mut W) -> Result<Outcome>
where
    L: Ags4Library + ?Sized,
    W: Write,
{
    require_exists(&args.input_file)?;
    if let Some(dictionary) = &args.dictionary {
        require_exists(dictionary)?;
    }

    if FileKind::from_path(&args.input_file) != Some(FileKind::Ags) {
        writeln!(out, "{}", "ERROR: Only .ags files are accepted as input.".red())?;
        return Ok(Outcome::Rejected);
    }

    writeln!(
        out,
        "{} {}\n",
        "Opening file...".green(),
        args.input_file.display().to_string().green().bold()
    )?;

    let errors = library.validate(&args.input_file, args.dictionary.as_deref())?;

    if errors.is_empty() {
        writeln!(out, "\n{}\n", "File check complete! No errors found. ✔".green())?;
        return Ok(Outcome::Success);
    }

    let error_count = errors.error_count();
    let summary = format!("File check complete! {error_count} errors found!");

    if error_count < SCREEN_ERROR_LIMIT {
        report::print_to_screen(out, &errors)?;
        writeln!(out, "\n{}", summary.yellow())?;

        if let Some(output_file) = &args.output_file {
            report::save_to_file(output_file, &errors, &args.input_file)?;
            writeln!(
                out,
                "\n{}\n",
                format!("Error report saved in {}.", output_file.display()).yellow()
            )?;
        }
    } else {
        writeln!(out, "\n{}", summary.yellow())?;
        writeln!(out, "\n{}", "Error report too long to print to screen.".yellow())?;

        let output_file = args
            .output_file
            .unwrap_or_else(|| default_error_log(&args.input_file));
        report::save_to_file(&output_file, &errors, &args.input_file)?;
        writeln!(
            out,
            "\n{}\n",
            format!("Error report saved in {}", output_file.display()).yellow()
        )?;
    }

    Ok(Outcome::Success)
}

/// Location of the error log when `--output_file` is not given.
pub fn default_error_log(input: &Path) -> PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(DEFAULT_ERROR_LOG)
}

fn announce<W: Write>(out: &mut W, input: &Path, output: &Path) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        "Opening file...".green(),
        input.display().to_string().green().bold()
    )?;
    writeln!(
        out,
        "{} {}",
        "Exporting data to...".green(),
        output.display().to_string().green().bold()
    )?;
    writeln!(out)?;
    Ok(())
}

fn require_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ToolError::MissingInput(path.to_path_buf()))
    }
}
