use std::path::Path;

use tracing::{debug, info, instrument};

use crate::ags4::tools::dictionary::Dictionary;
use crate::ags4::tools::error::Result;
use crate::ags4::tools::format;
use crate::ags4::tools::io::ags;
use crate::ags4::tools::io::excel_read;
use crate::ags4::tools::io::excel_write;

/// Exports every group of an AGS4 file to its own worksheet.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn ags_to_excel(input: &Path, output: &Path) -> Result<()> {
    let document = ags::read_document(input)?;
    info!(group_count = document.groups.len(), "parsed groups from AGS4 source");
    excel_write::write_workbook(output, &document)
}

/// Rebuilds an AGS4 file from a workbook.
///
/// When a dictionary is supplied its TYPE values replace those found in the
/// workbook. With `format_numeric_columns` set, numeric cells are rewritten
/// to match their TYPE.
#[instrument(
    level = "info",
    skip_all,
    fields(
        input = %input.display(),
        output = %output.display(),
        format_numeric_columns = format_numeric_columns,
        dictionary = ?dictionary.map(Path::display)
    )
)]
pub fn excel_to_ags(
    input: &Path,
    output: &Path,
    format_numeric_columns: bool,
    dictionary: Option<&Path>,
) -> Result<()> {
    let mut document = excel_read::read_document(input)?;
    info!(group_count = document.groups.len(), "read groups from workbook");

    if let Some(path) = dictionary {
        let dictionary = Dictionary::load(path)?;
        for group in &mut document.groups {
            dictionary.apply_types(group);
        }
    }

    if format_numeric_columns {
        for group in &mut document.groups {
            format::format_numeric_columns(group);
        }
        debug!("numeric columns formatted");
    }

    ags::write_file(output, &document)
}
