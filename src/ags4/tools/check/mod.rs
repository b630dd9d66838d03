//! Checks AGS4 files against the structural format rules.
//!
//! The checker reads the raw text line by line so it can report every problem
//! it finds, where [`io::ags`](crate::io::ags) stops at the first one when
//! reading data for conversion.

pub mod rules;

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::ags4::tools::dictionary::Dictionary;
use crate::ags4::tools::error::Result;
use crate::ags4::tools::io::ags::{BYTE_ORDER_MARK, split_fields};
use crate::ags4::tools::model::{
    AgsDocument, AgsGroup, DATA_ROW, ErrorReport, GROUP_ROW, HEADING_ROW, ROW_DESCRIPTORS,
    RuleKey, TYPE_ROW, UNIT_ROW,
};

const PROJ_GROUP: &str = "PROJ";
const TRAN_GROUP: &str = "TRAN";

/// Checks the AGS4 file at `path`.
///
/// Headings are checked against `dictionary` merged with the file's own
/// `DICT` group. With neither, the heading check is skipped.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %path.display(), dictionary = ?dictionary.map(Path::display))
)]
pub fn check_file(path: &Path, dictionary: Option<&Path>) -> Result<ErrorReport> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let dictionary = dictionary.map(Dictionary::load).transpose()?;

    let report = check_text(&text, dictionary);
    info!(error_count = report.error_count(), "check finished");
    Ok(report)
}

/// Checks AGS4 text. See [`check_file`].
pub fn check_text(text: &str, dictionary: Option<Dictionary>) -> ErrorReport {
    let mut checker = Checker::default();
    for (index, line) in text.split_inclusive('\n').enumerate() {
        checker.line(index + 1, line);
    }
    checker.finish(dictionary)
}

#[derive(Default)]
struct Checker {
    report: ErrorReport,
    current: Option<GroupState>,
    groups: Vec<GroupState>,
}

struct GroupState {
    name: String,
    line: usize,
    headings: Option<(usize, Vec<String>)>,
    units: Option<Vec<String>>,
    types: Option<Vec<String>>,
    layout_reported: bool,
    rows: Vec<(usize, Vec<String>)>,
}

impl GroupState {
    fn new(name: String, line: usize) -> Self {
        Self {
            name,
            line,
            headings: None,
            units: None,
            types: None,
            layout_reported: false,
            rows: Vec::new(),
        }
    }

    fn width(&self) -> Option<usize> {
        self.headings.as_ref().map(|(_, headings)| headings.len())
    }

    fn to_group(&self) -> Option<AgsGroup> {
        let (_, headings) = self.headings.as_ref()?;
        let mut group = AgsGroup::new(self.name.clone(), headings.clone());
        group.rows = self.rows.iter().map(|(_, row)| row.clone()).collect();
        Some(group)
    }
}

impl Checker {
    fn line(&mut self, line_no: usize, raw: &str) {
        if !raw.is_ascii() {
            self.flag(rules::NON_ASCII, line_no, "Has Non-ASCII character(s).");
        }
        let raw = match line_no {
            1 => raw.strip_prefix(BYTE_ORDER_MARK).unwrap_or(raw),
            _ => raw,
        };

        let content = raw
            .strip_suffix("\r\n")
            .or_else(|| raw.strip_suffix('\n'))
            .unwrap_or(raw);
        let blank = content.trim().is_empty();

        if !raw.ends_with("\r\n") {
            self.flag(
                rules::LINE_ENDING,
                line_no,
                "Is not terminated by <CR> and <LF> characters.",
            );
        }

        if blank {
            self.close_group();
            return;
        }

        let fields = match split_fields(line_no, content) {
            Ok(fields) => fields,
            Err(_) => {
                self.flag(
                    rules::QUOTING,
                    line_no,
                    "Contains a field with unbalanced double quotes.",
                );
                return;
            }
        };

        if fields.iter().any(|field| !field.quoted) {
            self.flag(
                rules::QUOTING,
                line_no,
                "Contains fields that are not enclosed in double quotes.",
            );
        }

        let mut values = fields.into_iter().map(|field| field.value);
        let descriptor = values.next().unwrap_or_default();
        let values: Vec<String> = values.collect();

        if !ROW_DESCRIPTORS.contains(&descriptor.as_str()) {
            self.flag(
                rules::DESCRIPTOR,
                line_no,
                "Does not start with a valid data descriptor.",
            );
            return;
        }

        if descriptor == GROUP_ROW {
            self.close_group();
            let name = values.first().cloned().unwrap_or_default();
            if !rules::is_valid_group_name(&name) {
                self.report.push(
                    rules::GROUP_NAME,
                    line_no,
                    &name,
                    "GROUP name should consist of four uppercase alphanumeric characters.",
                );
            }
            self.current = Some(GroupState::new(name, line_no));
            return;
        }

        let Some(group) = self.current.as_mut() else {
            self.report.push(
                rules::GROUP_LAYOUT,
                line_no,
                "",
                format!("{descriptor} row found outside of a GROUP."),
            );
            return;
        };
        let report = &mut self.report;

        if descriptor == HEADING_ROW {
            if group.headings.is_some() {
                report.push(rules::GROUP_LAYOUT, line_no, &group.name, "Duplicate HEADING row.");
                return;
            }
            for heading in &values {
                if !rules::is_valid_heading_name(heading) {
                    report.push(
                        rules::HEADING_NAME,
                        line_no,
                        &group.name,
                        format!(
                            "Heading {heading} should be at most 9 uppercase alphanumeric characters or underscores."
                        ),
                    );
                }
            }
            group.headings = Some((line_no, values));
            return;
        }

        let Some(width) = group.width() else {
            if !group.layout_reported {
                report.push(
                    rules::GROUP_LAYOUT,
                    line_no,
                    &group.name,
                    format!("{descriptor} row found before HEADING row."),
                );
                group.layout_reported = true;
            }
            return;
        };

        if values.len() != width {
            report.push(
                rules::FIELD_COUNT,
                line_no,
                &group.name,
                format!(
                    "Number of fields does not match the HEADING row (expected {width}, found {}).",
                    values.len()
                ),
            );
        }

        match descriptor.as_str() {
            UNIT_ROW => {
                if group.units.is_some() || group.types.is_some() || !group.rows.is_empty() {
                    report.push(rules::GROUP_LAYOUT, line_no, &group.name, "UNIT row is misplaced.");
                }
                group.units = Some(values);
            }
            TYPE_ROW => {
                if group.units.is_none() || group.types.is_some() || !group.rows.is_empty() {
                    report.push(
                        rules::GROUP_LAYOUT,
                        line_no,
                        &group.name,
                        "TYPE row is misplaced. It should immediately follow the UNIT row.",
                    );
                }
                group.types = Some(values);
            }
            DATA_ROW => {
                if (group.units.is_none() || group.types.is_none()) && !group.layout_reported {
                    report.push(
                        rules::GROUP_LAYOUT,
                        line_no,
                        &group.name,
                        "DATA row found before UNIT and TYPE rows.",
                    );
                    group.layout_reported = true;
                }
                group.rows.push((line_no, values));
            }
            _ => {}
        }
    }

    /// Records a finding against the group currently being read.
    fn flag(&mut self, rule: RuleKey, line_no: usize, desc: impl Into<String>) {
        let group = self
            .current
            .as_ref()
            .map(|group| group.name.as_str())
            .unwrap_or("");
        self.report.push(rule, line_no, group, desc);
    }

    fn close_group(&mut self) {
        let Some(group) = self.current.take() else {
            return;
        };

        if group.headings.is_none() {
            self.report
                .push(rules::GROUP_LAYOUT, group.line, &group.name, "HEADING row missing.");
        } else {
            if group.units.is_none() {
                self.report
                    .push(rules::GROUP_LAYOUT, group.line, &group.name, "UNIT row missing.");
            }
            if group.types.is_none() {
                self.report
                    .push(rules::GROUP_LAYOUT, group.line, &group.name, "TYPE row missing.");
            }
        }

        if let (Some((_, headings)), Some(types)) = (&group.headings, &group.types) {
            for (line_no, row) in &group.rows {
                for ((heading, data_type), value) in headings.iter().zip(types).zip(row) {
                    if !rules::value_matches_type(value, data_type) {
                        self.report.push(
                            rules::DATA_TYPE,
                            *line_no,
                            &group.name,
                            format!("Value {value} in {heading} not of data type {data_type}."),
                        );
                    }
                }
            }
        }

        self.groups.push(group);
    }

    fn finish(mut self, dictionary: Option<Dictionary>) -> ErrorReport {
        self.close_group();

        let document = AgsDocument {
            groups: self.groups.iter().filter_map(GroupState::to_group).collect(),
        };

        let dictionary = match (dictionary, Dictionary::from_document(&document)) {
            (Some(mut dictionary), Some(file_dictionary)) => {
                dictionary.merge(file_dictionary);
                Some(dictionary)
            }
            (dictionary, file_dictionary) => dictionary.or(file_dictionary),
        };
        if let Some(dictionary) = &dictionary {
            self.check_headings_defined(dictionary);
        }

        for (required, rule) in [(PROJ_GROUP, rules::PROJ_GROUP), (TRAN_GROUP, rules::TRAN_GROUP)] {
            if document.group(required).is_none() {
                self.report
                    .push(rule, 0, required, format!("{required} group not found."));
            }
        }

        debug!(groups = self.groups.len(), "structure checked");
        self.report.sort_by_line();
        self.report
    }

    fn check_headings_defined(&mut self, dictionary: &Dictionary) {
        for group in &self.groups {
            let Some((line_no, headings)) = &group.headings else {
                continue;
            };
            if !dictionary.has_group(&group.name) {
                self.report.push(
                    rules::DICTIONARY,
                    group.line,
                    &group.name,
                    format!("GROUP {} not found in the dictionary.", group.name),
                );
                continue;
            }
            for heading in headings {
                if dictionary.heading(&group.name, heading).is_none() {
                    self.report.push(
                        rules::DICTIONARY,
                        *line_no,
                        &group.name,
                        format!("{heading} not found in the dictionary."),
                    );
                }
            }
        }
    }
}
