use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use tracing::{debug, warn};

use crate::ags4::tools::error::{Result, ToolError};
use crate::ags4::tools::model::{
    AgsDocument, AgsGroup, DATA_ROW, HEADING_ROW, TYPE_ROW, UNIT_ROW,
};

/// Reads every worksheet of the workbook as an AGS4 group, following the
/// layout produced by the [`excel_write`](crate::io::excel_write) module.
///
/// Sheets whose first column is not labelled `HEADING` are treated as plain
/// tables: the first row supplies the headings and every other row is data.
pub fn read_document(path: &Path) -> Result<AgsDocument> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_names = workbook.sheet_names().to_owned();

    let mut document = AgsDocument::default();
    for sheet_name in sheet_names {
        let range = read_required_sheet(&mut workbook, &sheet_name)?;
        match read_group(&sheet_name, &range)? {
            Some(group) => {
                debug!(group = %group.name, rows = group.rows.len(), "worksheet read");
                document.groups.push(group);
            }
            None => warn!(sheet = %sheet_name, "skipping empty worksheet"),
        }
    }

    Ok(document)
}

fn read_required_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::InvalidWorkbook(format!("missing sheet '{name}'")))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

fn read_group(sheet_name: &str, range: &calamine::Range<DataType>) -> Result<Option<AgsGroup>> {
    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()));

    let Some(header) = rows.next() else {
        return Ok(None);
    };

    let labelled = header.first().map(|cell| cell.trim()) == Some(HEADING_ROW);
    let headings: Vec<String> = if labelled {
        header[1..].to_vec()
    } else {
        header
    };
    let headings = trim_trailing_blanks(headings);
    if headings.is_empty() {
        return Err(ToolError::InvalidWorkbook(format!(
            "sheet '{sheet_name}' has no headings"
        )));
    }

    let width = headings.len();
    let mut group = AgsGroup::new(sheet_name.trim(), headings);

    for row in rows {
        let (descriptor, values) = if labelled {
            let descriptor = row.first().map(|cell| cell.trim().to_string()).unwrap_or_default();
            (descriptor, row.into_iter().skip(1).collect::<Vec<_>>())
        } else {
            (DATA_ROW.to_string(), row)
        };
        let values = fit_width(values, width).map_err(|column| {
            ToolError::InvalidWorkbook(format!(
                "sheet '{sheet_name}' has a value in column {column} beyond its {width} headings"
            ))
        })?;

        match descriptor.as_str() {
            UNIT_ROW => group.units = values,
            TYPE_ROW => group.types = values,
            DATA_ROW | "" => group.rows.push(values),
            other => {
                return Err(ToolError::InvalidWorkbook(format!(
                    "unknown row descriptor '{other}' in sheet '{sheet_name}'"
                )));
            }
        }
    }

    Ok(Some(group))
}

fn trim_trailing_blanks(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(|cell| cell.trim().is_empty()) {
        cells.pop();
    }
    cells
}

/// Pads a row to `width` cells. A non-blank cell past the headings is
/// returned as its 1-based column number.
fn fit_width(mut values: Vec<String>, width: usize) -> std::result::Result<Vec<String>, usize> {
    if let Some(offset) = values
        .iter()
        .skip(width)
        .position(|cell| !cell.trim().is_empty())
    {
        return Err(width + offset + 1);
    }
    values.resize(width, String::new());
    Ok(values)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
