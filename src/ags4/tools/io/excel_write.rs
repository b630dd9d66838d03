use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::ags4::tools::error::Result;
use crate::ags4::tools::model::{AgsDocument, DATA_ROW, HEADING_ROW, TYPE_ROW, UNIT_ROW};

/// Writes every group of the document to its own worksheet.
///
/// Each sheet starts with a bold `HEADING` row followed by the `UNIT` and
/// `TYPE` rows; data rows carry `DATA` in the first column so the layout can
/// be read back by [`excel_read`](crate::io::excel_read).
pub fn write_workbook(path: &Path, document: &AgsDocument) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for group in &document.groups {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&group.name)?;

        worksheet.write_string_with_format(0, 0, HEADING_ROW, &header_format)?;
        for (col_idx, heading) in group.headings.iter().enumerate() {
            worksheet.write_string_with_format(0, (col_idx + 1) as u16, heading, &header_format)?;
        }

        let descriptor_rows = [(UNIT_ROW, &group.units), (TYPE_ROW, &group.types)];
        let data_rows = group.rows.iter().map(|row| (DATA_ROW, row));

        for (row_idx, (descriptor, values)) in descriptor_rows.into_iter().chain(data_rows).enumerate() {
            let row_idx = (row_idx + 1) as u32;
            worksheet.write_string(row_idx, 0, descriptor)?;
            for (col_idx, value) in values.iter().enumerate() {
                worksheet.write_string(row_idx, (col_idx + 1) as u16, value)?;
            }
        }

        worksheet.set_freeze_panes(3, 1)?;
        debug!(group = %group.name, rows = group.rows.len(), "worksheet written");
    }

    workbook_writer.save(path)?;
    Ok(())
}
