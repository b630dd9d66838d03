use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::ags4::tools::error::{Result, ToolError};
use crate::ags4::tools::io::ags;
use crate::ags4::tools::model::{AgsDocument, AgsGroup};

/// Name of the group holding dictionary definitions.
pub const DICT_GROUP: &str = "DICT";

const DICT_TYPE: &str = "DICT_TYPE";
const DICT_GRP: &str = "DICT_GRP";
const DICT_HDNG: &str = "DICT_HDNG";
const DICT_DTYP: &str = "DICT_DTYP";
const DICT_UNIT: &str = "DICT_UNIT";

/// Definition of one heading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictHeading {
    pub data_type: String,
    pub unit: String,
}

/// Group and heading definitions taken from a `DICT` group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    groups: BTreeSet<String>,
    headings: BTreeMap<(String, String), DictHeading>,
}

impl Dictionary {
    /// Loads the `DICT` group of the AGS4 file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let document = ags::read_document(path)?;
        let dictionary = Self::from_document(&document).ok_or_else(|| {
            ToolError::invalid_ags(0, format!("{} has no DICT group", path.display()))
        })?;
        debug!(
            groups = dictionary.groups.len(),
            headings = dictionary.headings.len(),
            "dictionary loaded"
        );
        Ok(dictionary)
    }

    /// Builds a dictionary from the document's `DICT` group, if it has one.
    pub fn from_document(document: &AgsDocument) -> Option<Self> {
        let group = document.group(DICT_GROUP)?;
        Some(Self::from_group(group))
    }

    fn from_group(group: &AgsGroup) -> Self {
        let field = |row: &[String], heading: &str| -> String {
            group
                .heading_index(heading)
                .and_then(|idx| row.get(idx))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let mut dictionary = Dictionary::default();
        for row in &group.rows {
            let group_name = field(row, DICT_GRP);
            if group_name.is_empty() {
                continue;
            }
            match field(row, DICT_TYPE).as_str() {
                "GROUP" => {
                    dictionary.groups.insert(group_name);
                }
                "HEADING" => {
                    let heading = field(row, DICT_HDNG);
                    if heading.is_empty() {
                        continue;
                    }
                    dictionary.groups.insert(group_name.clone());
                    dictionary.headings.insert(
                        (group_name, heading),
                        DictHeading {
                            data_type: field(row, DICT_DTYP),
                            unit: field(row, DICT_UNIT),
                        },
                    );
                }
                _ => {}
            }
        }
        dictionary
    }

    /// Adds the definitions of `other`, keeping existing entries.
    pub fn merge(&mut self, other: Dictionary) {
        self.groups.extend(other.groups);
        for (key, heading) in other.headings {
            self.headings.entry(key).or_insert(heading);
        }
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn heading(&self, group: &str, heading: &str) -> Option<&DictHeading> {
        self.headings.get(&(group.to_string(), heading.to_string()))
    }

    /// Overwrites the TYPE row of `group` with the dictionary types of any
    /// heading the dictionary defines.
    pub fn apply_types(&self, group: &mut AgsGroup) {
        for (heading, data_type) in group.headings.iter().zip(group.types.iter_mut()) {
            if let Some(definition) = self.heading(&group.name, heading) {
                if !definition.data_type.is_empty() {
                    *data_type = definition.data_type.clone();
                }
            }
        }
    }
}
