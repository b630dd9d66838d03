use std::path::Path;

use crate::ags4::tools::check;
use crate::ags4::tools::convert;
use crate::ags4::tools::error::Result;
use crate::ags4::tools::model::ErrorReport;

/// Operations the command line front end needs from an AGS4 implementation.
pub trait Ags4Library {
    /// Exports an AGS4 file to a spreadsheet.
    fn convert_to_spreadsheet(&self, input: &Path, output: &Path) -> Result<()>;

    /// Builds an AGS4 file from a spreadsheet.
    fn spreadsheet_to_convert(
        &self,
        input: &Path,
        output: &Path,
        format_numeric_columns: bool,
        dictionary: Option<&Path>,
    ) -> Result<()>;

    /// Checks an AGS4 file and collects every rule violation found.
    fn validate(&self, input: &Path, dictionary: Option<&Path>) -> Result<ErrorReport>;
}

/// The implementation bundled with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeLibrary;

impl Ags4Library for NativeLibrary {
    fn convert_to_spreadsheet(&self, input: &Path, output: &Path) -> Result<()> {
        convert::ags_to_excel(input, output)
    }

    fn spreadsheet_to_convert(
        &self,
        input: &Path,
        output: &Path,
        format_numeric_columns: bool,
        dictionary: Option<&Path>,
    ) -> Result<()> {
        convert::excel_to_ags(input, output, format_numeric_columns, dictionary)
    }

    fn validate(&self, input: &Path, dictionary: Option<&Path>) -> Result<ErrorReport> {
        check::check_file(input, dictionary)
    }
}
