use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::ags4::tools::error::Result;
use crate::ags4::tools::model::ErrorReport;

#[derive(Serialize)]
struct JsonReport<'a> {
    input_file: String,
    error_count: usize,
    errors: &'a ErrorReport,
}

/// Prints the report grouped by rule.
pub fn print_to_screen<W: Write>(out: &mut W, report: &ErrorReport) -> Result<()> {
    for (rule, entries) in report.iter() {
        writeln!(out, "{}:", rule.to_string().underline())?;
        for entry in entries {
            writeln!(
                out,
                "  Line {}\t {}\t {}",
                entry.line,
                strip_quotes(&entry.group).bold(),
                entry.desc
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Renders the plain text error log.
pub fn render_text(report: &ErrorReport, input: &Path) -> String {
    let mut text = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(text, "Input file: {}", input.display());
    let _ = writeln!(text, "{} errors found!", report.error_count());
    text.push('\n');

    for (rule, entries) in report.iter() {
        let _ = writeln!(text, "{rule}:");
        for entry in entries {
            let _ = writeln!(
                text,
                "  Line {}\t {}\t {}",
                entry.line,
                strip_quotes(&entry.group),
                entry.desc
            );
        }
        text.push('\n');
    }
    text
}

/// Saves the report to `path`, as JSON when the file name ends in `.json`
/// and as plain text otherwise.
pub fn save_to_file(path: &Path, report: &ErrorReport, input: &Path) -> Result<()> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let contents = if is_json {
        serde_json::to_string_pretty(&JsonReport {
            input_file: input.display().to_string(),
            error_count: report.error_count(),
            errors: report,
        })?
    } else {
        render_text(report, input)
    };

    fs::write(path, contents)?;
    Ok(())
}

fn strip_quotes(group: &str) -> &str {
    group.trim_matches('"')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ags4::tools::model::RuleKey;

    fn sample_report() -> ErrorReport {
        let mut report = ErrorReport::new();
        report.push(RuleKey::new(13), 0, "PROJ", "PROJ group not found.");
        report.push(RuleKey::with_suffix(2, 'a'), 4, "\"LOCA\"", "Is not terminated by <CR> and <LF> characters.");
        report
    }

    #[test]
    fn text_log_lists_rules_in_order() {
        let text = render_text(&sample_report(), Path::new("site.ags"));
        assert_eq!(
            text,
            "Input file: site.ags\n\
             2 errors found!\n\
             \n\
             AGS Format Rule 2a:\n  Line 4\t LOCA\t Is not terminated by <CR> and <LF> characters.\n\
             \n\
             AGS Format Rule 13:\n  Line 0\t PROJ\t PROJ group not found.\n\
             \n"
        );
    }
}
