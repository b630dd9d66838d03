//! Formatting of numeric cells according to AGS4 TYPE values.

use crate::ags4::tools::model::AgsGroup;

/// Numeric formats expressible through a TYPE value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// `nDP`: fixed number of decimal places.
    DecimalPlaces(usize),
    /// `nSF`: fixed number of significant figures.
    SignificantFigures(usize),
    /// `nSCI`: scientific notation with a fixed number of decimals.
    Scientific(usize),
}

impl NumericType {
    /// Parses TYPE values such as `2DP`, `3SF` or `1SCI`.
    pub fn parse(data_type: &str) -> Option<Self> {
        let data_type = data_type.trim();
        let split = data_type
            .find(|ch: char| !ch.is_ascii_digit())
            .filter(|&idx| idx > 0)?;
        let (digits, suffix) = data_type.split_at(split);
        let precision: usize = digits.parse().ok()?;

        match suffix {
            "DP" => Some(NumericType::DecimalPlaces(precision)),
            "SF" if precision > 0 => Some(NumericType::SignificantFigures(precision)),
            "SCI" => Some(NumericType::Scientific(precision)),
            _ => None,
        }
    }

    pub fn format(self, value: f64) -> String {
        match self {
            NumericType::DecimalPlaces(places) => format!("{value:.places$}"),
            NumericType::SignificantFigures(figures) => format_significant(value, figures),
            NumericType::Scientific(places) => format_scientific(value, places),
        }
    }
}

/// Formats a single cell. Blank cells, non-numeric cells and TYPE values
/// without a numeric format are returned unchanged.
pub fn format_value(value: &str, data_type: &str) -> String {
    let Some(numeric_type) = NumericType::parse(data_type) else {
        return value.to_string();
    };
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => numeric_type.format(number),
        _ => value.to_string(),
    }
}

/// Reformats every data row of a group in place.
pub fn format_numeric_columns(group: &mut AgsGroup) {
    for (column, data_type) in group.types.iter().enumerate() {
        if NumericType::parse(data_type).is_none() {
            continue;
        }
        for row in &mut group.rows {
            if let Some(cell) = row.get_mut(column) {
                *cell = format_value(cell, data_type);
            }
        }
    }
}

fn format_significant(value: f64, figures: usize) -> String {
    if value == 0.0 {
        let places = figures.saturating_sub(1);
        return format!("{value:.places$}");
    }

    let magnitude = value.abs().log10().floor() as i64;
    let places = figures as i64 - 1 - magnitude;
    if places >= 0 {
        let places = places as usize;
        let rendered = format!("{value:.places$}");
        // Rounding may carry into a new digit, e.g. 9.99 at 2SF.
        match rendered.parse::<f64>() {
            Ok(rounded) if rounded.abs().log10().floor() as i64 > magnitude => {
                format_significant(rounded, figures)
            }
            _ => rendered,
        }
    } else {
        let scale = 10f64.powi(-places as i32);
        format!("{:.0}", (value / scale).round() * scale)
    }
}

fn format_scientific(value: f64, places: usize) -> String {
    let rendered = format!("{value:.places$e}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or_default();
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_types() {
        assert_eq!(NumericType::parse("2DP"), Some(NumericType::DecimalPlaces(2)));
        assert_eq!(NumericType::parse("3SF"), Some(NumericType::SignificantFigures(3)));
        assert_eq!(NumericType::parse("1SCI"), Some(NumericType::Scientific(1)));
        assert_eq!(NumericType::parse("DP"), None);
        assert_eq!(NumericType::parse("0SF"), None);
        assert_eq!(NumericType::parse("X"), None);
    }

    #[test]
    fn formats_decimal_places() {
        assert_eq!(format_value("25", "2DP"), "25.00");
        assert_eq!(format_value("1.005", "0DP"), "1");
        assert_eq!(format_value("-3.14159", "3DP"), "-3.142");
    }

    #[test]
    fn formats_significant_figures() {
        assert_eq!(format_value("1234.5", "3SF"), "1230");
        assert_eq!(format_value("0.012345", "2SF"), "0.012");
        assert_eq!(format_value("0", "3SF"), "0.00");
        assert_eq!(format_value("9.99", "2SF"), "10");
    }

    #[test]
    fn formats_scientific() {
        assert_eq!(format_value("12345", "2SCI"), "1.23e+04");
        assert_eq!(format_value("0.00051", "1SCI"), "5.1e-04");
    }

    #[test]
    fn leaves_other_cells_untouched() {
        assert_eq!(format_value("", "2DP"), "");
        assert_eq!(format_value("N/A", "2DP"), "N/A");
        assert_eq!(format_value("12.3456", "X"), "12.3456");
    }

    #[test]
    fn formats_only_numeric_columns() {
        let mut group = AgsGroup::new("LOCA", vec!["LOCA_ID".into(), "LOCA_FDEP".into()]);
        group.types = vec!["ID".into(), "2DP".into()];
        group.rows.push(vec!["7".into(), "3.1".into()]);

        format_numeric_columns(&mut group);

        assert_eq!(group.rows[0], ["7", "3.10"]);
    }
}
