use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Row descriptor for the group name row.
pub const GROUP_ROW: &str = "GROUP";
/// Row descriptor for the heading row.
pub const HEADING_ROW: &str = "HEADING";
/// Row descriptor for the unit row.
pub const UNIT_ROW: &str = "UNIT";
/// Row descriptor for the data type row.
pub const TYPE_ROW: &str = "TYPE";
/// Row descriptor for data rows.
pub const DATA_ROW: &str = "DATA";

/// All descriptors a row may start with.
pub const ROW_DESCRIPTORS: [&str; 5] = [GROUP_ROW, HEADING_ROW, UNIT_ROW, TYPE_ROW, DATA_ROW];

/// A single AGS4 table. `units`, `types` and every row in `rows` hold one
/// entry per heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgsGroup {
    pub name: String,
    pub headings: Vec<String>,
    pub units: Vec<String>,
    pub types: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl AgsGroup {
    /// Creates a group with the given headings and blank UNIT/TYPE rows.
    pub fn new(name: impl Into<String>, headings: Vec<String>) -> Self {
        let width = headings.len();
        Self {
            name: name.into(),
            headings,
            units: vec![String::new(); width],
            types: vec![String::new(); width],
            rows: Vec::new(),
        }
    }

    /// Position of a heading within the group, if present.
    pub fn heading_index(&self, heading: &str) -> Option<usize> {
        self.headings.iter().position(|candidate| candidate == heading)
    }

    /// Iterates over the values of one column.
    pub fn column<'a>(&'a self, heading: &str) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.heading_index(heading);
        self.rows
            .iter()
            .filter_map(move |row| index.and_then(|idx| row.get(idx)).map(String::as_str))
    }
}

/// An AGS4 file: groups in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgsDocument {
    pub groups: Vec<AgsGroup>,
}

impl AgsDocument {
    pub fn group(&self, name: &str) -> Option<&AgsGroup> {
        self.groups.iter().find(|group| group.name == name)
    }
}

/// Identifies an AGS4 format rule, e.g. `2a`. Ordering follows the rule
/// number first so `2a` sorts before `10`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuleKey {
    pub number: u16,
    pub suffix: Option<char>,
}

impl RuleKey {
    pub const fn new(number: u16) -> Self {
        Self {
            number,
            suffix: None,
        }
    }

    pub const fn with_suffix(number: u16, suffix: char) -> Self {
        Self {
            number,
            suffix: Some(suffix),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AGS Format Rule {}", self.number)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{suffix}")?;
        }
        Ok(())
    }
}

impl Serialize for RuleKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One finding of the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEntry {
    /// 1-based line number, `0` for findings about the file as a whole.
    pub line: usize,
    /// Group the finding belongs to, empty when not tied to a group.
    pub group: String,
    pub desc: String,
}

/// Findings grouped by the rule they violate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    entries: BTreeMap<RuleKey, Vec<ErrorEntry>>,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding under the given rule.
    pub fn push(&mut self, rule: RuleKey, line: usize, group: &str, desc: impl Into<String>) {
        self.entries.entry(rule).or_default().push(ErrorEntry {
            line,
            group: group.to_string(),
            desc: desc.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of findings across every rule.
    pub fn error_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, rule: &RuleKey) -> Option<&[ErrorEntry]> {
        self.entries.get(rule).map(Vec::as_slice)
    }

    /// Orders each rule's findings by line, keeping insertion order for ties.
    pub fn sort_by_line(&mut self) {
        for entries in self.entries.values_mut() {
            entries.sort_by_key(|entry| entry.line);
        }
    }

    /// Iterates rules in rule order together with their findings.
    pub fn iter(&self) -> impl Iterator<Item = (&RuleKey, &[ErrorEntry])> {
        self.entries
            .iter()
            .map(|(rule, entries)| (rule, entries.as_slice()))
    }
}
