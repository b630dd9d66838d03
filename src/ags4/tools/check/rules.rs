//! Rule identifiers and the value level predicates used by the checker.

use crate::ags4::tools::format::NumericType;
use crate::ags4::tools::model::RuleKey;

/// Only ASCII characters.
pub const NON_ASCII: RuleKey = RuleKey::new(1);
/// Lines terminated by CR+LF.
pub const LINE_ENDING: RuleKey = RuleKey::with_suffix(2, 'a');
/// HEADING, UNIT and TYPE rows present and in order.
pub const GROUP_LAYOUT: RuleKey = RuleKey::with_suffix(2, 'b');
/// Rows start with a known data descriptor.
pub const DESCRIPTOR: RuleKey = RuleKey::new(3);
/// Rows have as many fields as the HEADING row.
pub const FIELD_COUNT: RuleKey = RuleKey::new(4);
/// Fields enclosed in double quotes.
pub const QUOTING: RuleKey = RuleKey::new(5);
/// Data matches the declared TYPE.
pub const DATA_TYPE: RuleKey = RuleKey::new(8);
/// Headings defined in the dictionary.
pub const DICTIONARY: RuleKey = RuleKey::new(9);
/// PROJ group present.
pub const PROJ_GROUP: RuleKey = RuleKey::new(13);
/// TRAN group present.
pub const TRAN_GROUP: RuleKey = RuleKey::new(14);
/// Group naming.
pub const GROUP_NAME: RuleKey = RuleKey::new(19);
/// Heading naming.
pub const HEADING_NAME: RuleKey = RuleKey::with_suffix(19, 'a');

const MAX_HEADING_LEN: usize = 9;

pub fn is_valid_group_name(name: &str) -> bool {
    name.len() == 4
        && name
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit())
}

pub fn is_valid_heading_name(heading: &str) -> bool {
    !heading.is_empty()
        && heading.len() <= MAX_HEADING_LEN
        && heading
            .chars()
            .all(|ch| ch.is_ascii_uppercase() || ch.is_ascii_digit() || ch == '_')
}

/// Checks a non-blank value against its TYPE. Returns `false` only when the
/// TYPE has a checkable format and the value does not follow it.
pub fn value_matches_type(value: &str, data_type: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }

    if let Some(numeric_type) = NumericType::parse(data_type) {
        let Ok(number) = value.parse::<f64>() else {
            return false;
        };
        return match numeric_type {
            NumericType::DecimalPlaces(places) => {
                number.is_finite() && decimal_places(value) == places
            }
            NumericType::SignificantFigures(_) => number.is_finite(),
            NumericType::Scientific(_) => value.contains(['e', 'E']),
        };
    }

    match data_type.trim() {
        "U" | "MC" => value.parse::<f64>().is_ok_and(f64::is_finite),
        "YN" => matches!(value.to_ascii_uppercase().as_str(), "Y" | "N" | "YES" | "NO"),
        _ => true,
    }
}

fn decimal_places(value: &str) -> usize {
    value
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}
