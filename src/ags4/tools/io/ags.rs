use std::fs;
use std::path::Path;

use crate::ags4::tools::error::{Result, ToolError};
use crate::ags4::tools::model::{
    AgsDocument, AgsGroup, DATA_ROW, GROUP_ROW, HEADING_ROW, TYPE_ROW, UNIT_ROW,
};

/// Line terminator mandated for AGS4 files.
pub const LINE_ENDING: &str = "\r\n";

/// Byte order mark some editors put at the start of the file.
pub const BYTE_ORDER_MARK: char = '\u{feff}';

/// A single field of an AGS4 row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub value: String,
    /// Whether the field was enclosed in double quotes.
    pub quoted: bool,
}

/// Splits one line into its comma separated fields. Quoted fields may contain
/// commas and doubled quotes; unquoted fields are accepted as-is so the checker
/// can report them instead of failing outright.
pub fn split_fields(line_no: usize, line: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        let mut value = String::new();

        if chars.peek() == Some(&'"') {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') if chars.peek() == Some(&'"') => {
                        chars.next();
                        value.push('"');
                    }
                    Some('"') => break,
                    Some(ch) => value.push(ch),
                    None => {
                        return Err(ToolError::invalid_ags(line_no, "unterminated quoted field"));
                    }
                }
            }
            fields.push(Field {
                value,
                quoted: true,
            });

            match chars.next() {
                None => break,
                Some(',') => continue,
                Some(other) => {
                    return Err(ToolError::invalid_ags(
                        line_no,
                        format!("unexpected character '{other}' after closing quote"),
                    ));
                }
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch == ',' {
                    break;
                }
                value.push(ch);
                chars.next();
            }
            fields.push(Field {
                value,
                quoted: false,
            });
            if chars.next().is_none() {
                break;
            }
        }
    }

    Ok(fields)
}

/// Parses AGS4 text into its groups.
pub fn parse_document(text: &str) -> Result<AgsDocument> {
    let mut document = AgsDocument::default();
    let mut current: Option<AgsGroup> = None;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let mut values = split_fields(line_no, line)?
            .into_iter()
            .map(|field| field.value);
        let descriptor = values.next().unwrap_or_default();
        let values: Vec<String> = values.collect();

        if descriptor == GROUP_ROW {
            if let Some(group) = current.take() {
                document.groups.push(finish_group(group, line_no)?);
            }
            let name = values
                .first()
                .filter(|name| !name.is_empty())
                .ok_or_else(|| ToolError::invalid_ags(line_no, "GROUP row without a name"))?;
            current = Some(AgsGroup::new(name.clone(), Vec::new()));
            continue;
        }

        let group = current
            .as_mut()
            .ok_or_else(|| ToolError::invalid_ags(line_no, format!("{descriptor} row outside of a group")))?;

        if descriptor == HEADING_ROW {
            if !group.headings.is_empty() {
                return Err(ToolError::invalid_ags(
                    line_no,
                    format!("duplicate HEADING row in group {}", group.name),
                ));
            }
            *group = AgsGroup::new(group.name.clone(), values);
            continue;
        }

        if group.headings.is_empty() {
            return Err(ToolError::invalid_ags(
                line_no,
                format!("{descriptor} row before HEADING row in group {}", group.name),
            ));
        }
        if values.len() != group.headings.len() {
            return Err(ToolError::invalid_ags(
                line_no,
                format!(
                    "expected {} fields in group {} but found {}",
                    group.headings.len(),
                    group.name,
                    values.len()
                ),
            ));
        }

        match descriptor.as_str() {
            UNIT_ROW => group.units = values,
            TYPE_ROW => group.types = values,
            DATA_ROW => group.rows.push(values),
            other => {
                return Err(ToolError::invalid_ags(
                    line_no,
                    format!("unknown row descriptor '{other}'"),
                ));
            }
        }
    }

    if let Some(group) = current {
        let last_line = text.lines().count();
        document.groups.push(finish_group(group, last_line)?);
    }

    Ok(document)
}

fn finish_group(group: AgsGroup, line_no: usize) -> Result<AgsGroup> {
    if group.headings.is_empty() {
        return Err(ToolError::invalid_ags(
            line_no,
            format!("group {} has no HEADING row", group.name),
        ));
    }
    Ok(group)
}

/// Renders a document as AGS4 text with quoted fields and CRLF endings.
pub fn write_document(document: &AgsDocument) -> String {
    let mut out = String::new();

    for (index, group) in document.groups.iter().enumerate() {
        if index > 0 {
            out.push_str(LINE_ENDING);
        }
        push_row(&mut out, GROUP_ROW, std::slice::from_ref(&group.name));
        push_row(&mut out, HEADING_ROW, &group.headings);
        push_row(&mut out, UNIT_ROW, &group.units);
        push_row(&mut out, TYPE_ROW, &group.types);
        for row in &group.rows {
            push_row(&mut out, DATA_ROW, row);
        }
    }

    out
}

fn push_row(out: &mut String, descriptor: &str, values: &[String]) {
    out.push_str(&quote(descriptor));
    for value in values {
        out.push(',');
        out.push_str(&quote(value));
    }
    out.push_str(LINE_ENDING);
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Reads and parses an AGS4 file.
pub fn read_document(path: &Path) -> Result<AgsDocument> {
    let text = fs::read_to_string(path)?;
    parse_document(&text)
}

/// Writes a document to the given path.
pub fn write_file(path: &Path, document: &AgsDocument) -> Result<()> {
    fs::write(path, write_document(document))?;
    Ok(())
}
