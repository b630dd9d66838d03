use ags4_tools::check::{self, rules};
use ags4_tools::dictionary::Dictionary;
use ags4_tools::io::ags;
use ags4_tools::model::{AgsDocument, AgsGroup};
use std::fs;
use tempfile::tempdir;

const VALID_AGS: &str = "\"GROUP\",\"PROJ\"\r\n\
\"HEADING\",\"PROJ_ID\",\"PROJ_NAME\"\r\n\
\"UNIT\",\"\",\"\"\r\n\
\"TYPE\",\"ID\",\"X\"\r\n\
\"DATA\",\"121415\",\"ACME Gas Works\"\r\n\
\r\n\
\"GROUP\",\"TRAN\"\r\n\
\"HEADING\",\"TRAN_ISNO\",\"TRAN_AGS\"\r\n\
\"UNIT\",\"\",\"\"\r\n\
\"TYPE\",\"X\",\"X\"\r\n\
\"DATA\",\"1\",\"4.1\"\r\n\
\r\n\
\"GROUP\",\"LOCA\"\r\n\
\"HEADING\",\"LOCA_ID\",\"LOCA_FDEP\",\"LOCA_CLST\"\r\n\
\"UNIT\",\"\",\"m\",\"\"\r\n\
\"TYPE\",\"ID\",\"2DP\",\"YN\"\r\n\
\"DATA\",\"BH01\",\"25.00\",\"Y\"\r\n";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn lines(report: &ags4_tools::model::ErrorReport, rule: &ags4_tools::model::RuleKey) -> Vec<usize> {
    report
        .get(rule)
        .map(|entries| entries.iter().map(|entry| entry.line).collect())
        .unwrap_or_default()
}

#[test]
fn valid_file_has_no_errors() {
    let report = check::check_text(VALID_AGS, None);
    assert!(report.is_empty(), "unexpected errors: {report:?}");
}

#[test]
fn bare_line_feeds_are_flagged_per_line() {
    let text = VALID_AGS.replacen("\r\n", "\n", 2);
    let report = check::check_text(&text, None);
    assert_eq!(lines(&report, &rules::LINE_ENDING), [1, 2]);
    assert_eq!(report.error_count(), 2);
}

#[test]
fn unquoted_and_short_rows_are_flagged() {
    let text = VALID_AGS.replace(
        "\"DATA\",\"BH01\",\"25.00\",\"Y\"",
        "\"DATA\",BH01,\"25.00\"",
    );
    let report = check::check_text(&text, None);

    assert_eq!(lines(&report, &rules::QUOTING), [17]);
    assert_eq!(lines(&report, &rules::FIELD_COUNT), [17]);
    let entry = &report.get(&rules::FIELD_COUNT).unwrap()[0];
    assert_eq!(entry.group, "LOCA");
}

#[test]
fn missing_required_groups_are_file_level_errors() {
    let text = VALID_AGS.replace("\"GROUP\",\"TRAN\"", "\"GROUP\",\"TRAX\"");
    let report = check::check_text(&text, None);

    let tran = report.get(&rules::TRAN_GROUP).expect("TRAN finding");
    assert_eq!(tran[0].line, 0);
    assert_eq!(tran[0].desc, "TRAN group not found.");
    assert!(report.get(&rules::PROJ_GROUP).is_none());
}

#[test]
fn layout_problems_are_reported() {
    let text = VALID_AGS
        .replace("\"TYPE\",\"ID\",\"2DP\",\"YN\"\r\n", "")
        .replace("\"GROUP\",\"PROJ\"", "\"GROUP\",\"proj\"")
        .replace("\"LOCA_CLST\"", "\"LOCA_CLOSED\"");
    let report = check::check_text(&text, None);

    let layout = report.get(&rules::GROUP_LAYOUT).expect("layout findings");
    let descriptions: Vec<&str> = layout.iter().map(|entry| entry.desc.as_str()).collect();
    assert_eq!(
        descriptions,
        ["TYPE row missing.", "DATA row found before UNIT and TYPE rows."]
    );
    assert_eq!(lines(&report, &rules::GROUP_LAYOUT), [13, 16]);
    assert_eq!(lines(&report, &rules::GROUP_NAME), [1]);
    assert_eq!(lines(&report, &rules::HEADING_NAME), [14]);
    assert_eq!(lines(&report, &rules::PROJ_GROUP), [0]);
}

#[test]
fn leading_byte_order_mark_is_only_a_non_ascii_finding() {
    let text = format!("\u{feff}{VALID_AGS}");
    let report = check::check_text(&text, None);

    assert_eq!(lines(&report, &rules::NON_ASCII), [1]);
    assert_eq!(report.error_count(), 1, "unexpected errors: {report:?}");
}

#[test]
fn unknown_descriptors_and_non_ascii_are_flagged() {
    let text = VALID_AGS.replace("\"DATA\",\"121415\",\"ACME Gas Works\"", "\"DATUM\",\"121415\",\"Café\"");
    let report = check::check_text(&text, None);

    assert_eq!(lines(&report, &rules::NON_ASCII), [5]);
    assert_eq!(lines(&report, &rules::DESCRIPTOR), [5]);
}

#[test]
fn values_must_match_their_type() {
    let text = VALID_AGS.replace("\"BH01\",\"25.00\",\"Y\"", "\"BH01\",\"25.0\",\"perhaps\"");
    let report = check::check_text(&text, None);

    let entries = report.get(&rules::DATA_TYPE).expect("type findings");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|entry| entry.line == 17 && entry.group == "LOCA"));
    assert_eq!(entries[0].desc, "Value 25.0 in LOCA_FDEP not of data type 2DP.");
}

#[test]
fn headings_checked_against_dictionary_and_file_dict_group() {
    let mut dict = AgsGroup::new(
        "DICT",
        strings(&["DICT_TYPE", "DICT_GRP", "DICT_HDNG", "DICT_DTYP", "DICT_UNIT"]),
    );
    for (group, heading) in [
        ("PROJ", "PROJ_ID"),
        ("PROJ", "PROJ_NAME"),
        ("TRAN", "TRAN_ISNO"),
        ("TRAN", "TRAN_AGS"),
        ("LOCA", "LOCA_ID"),
        ("LOCA", "LOCA_FDEP"),
    ] {
        dict.rows.push(strings(&["HEADING", group, heading, "X", ""]));
    }
    let dictionary = Dictionary::from_document(&AgsDocument { groups: vec![dict] })
        .expect("dictionary built");

    let report = check::check_text(VALID_AGS, Some(dictionary.clone()));
    let missing = report.get(&rules::DICTIONARY).expect("dictionary findings");
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].line, 14);
    assert_eq!(missing[0].desc, "LOCA_CLST not found in the dictionary.");

    let with_file_dict = format!(
        "{VALID_AGS}\r\n\
\"GROUP\",\"DICT\"\r\n\
\"HEADING\",\"DICT_TYPE\",\"DICT_GRP\",\"DICT_HDNG\",\"DICT_DTYP\"\r\n\
\"UNIT\",\"\",\"\",\"\",\"\"\r\n\
\"TYPE\",\"PA\",\"X\",\"X\",\"PA\"\r\n\
\"DATA\",\"HEADING\",\"LOCA\",\"LOCA_CLST\",\"YN\"\r\n"
    );
    let report = check::check_text(&with_file_dict, Some(dictionary));
    let missing: Vec<&str> = report
        .get(&rules::DICTIONARY)
        .expect("DICT group itself is undefined")
        .iter()
        .map(|entry| entry.desc.as_str())
        .collect();
    assert_eq!(missing, ["GROUP DICT not found in the dictionary."]);
}

#[test]
fn file_dict_group_alone_enables_heading_check() {
    let text = format!(
        "{VALID_AGS}\r\n\
\"GROUP\",\"DICT\"\r\n\
\"HEADING\",\"DICT_TYPE\",\"DICT_GRP\",\"DICT_HDNG\",\"DICT_DTYP\"\r\n\
\"UNIT\",\"\",\"\",\"\",\"\"\r\n\
\"TYPE\",\"PA\",\"X\",\"X\",\"PA\"\r\n\
\"DATA\",\"HEADING\",\"LOCA\",\"LOCA_ID\",\"ID\"\r\n\
\"DATA\",\"HEADING\",\"LOCA\",\"LOCA_FDEP\",\"2DP\"\r\n"
    );
    let report = check::check_text(&text, None);

    let missing = report.get(&rules::DICTIONARY).expect("dictionary findings");
    let clst = missing
        .iter()
        .find(|entry| entry.desc == "LOCA_CLST not found in the dictionary.")
        .expect("undefined LOCA heading reported");
    assert_eq!((clst.line, clst.group.as_str()), (14, "LOCA"));
    assert!(
        !missing
            .iter()
            .any(|entry| entry.desc.starts_with("LOCA_ID") || entry.desc.starts_with("LOCA_FDEP"))
    );
}

#[test]
fn check_file_reads_from_disk_with_dictionary() {
    let temp_dir = tempdir().expect("temporary directory");
    let input = temp_dir.path().join("site.ags");
    fs::write(&input, VALID_AGS).expect("input written");

    let mut dict = AgsGroup::new(
        "DICT",
        strings(&["DICT_TYPE", "DICT_GRP", "DICT_HDNG", "DICT_DTYP", "DICT_UNIT"]),
    );
    dict.rows.push(strings(&["GROUP", "PROJ", "", "", ""]));
    let dictionary_path = temp_dir.path().join("dictionary.ags");
    ags::write_file(&dictionary_path, &AgsDocument { groups: vec![dict] })
        .expect("dictionary written");

    let report = check::check_file(&input, Some(&dictionary_path)).expect("file checked");
    let descriptions: Vec<&str> = report
        .get(&rules::DICTIONARY)
        .expect("dictionary findings")
        .iter()
        .map(|entry| entry.desc.as_str())
        .collect();
    assert_eq!(
        descriptions,
        [
            "PROJ_ID not found in the dictionary.",
            "PROJ_NAME not found in the dictionary.",
            "GROUP TRAN not found in the dictionary.",
            "GROUP LOCA not found in the dictionary.",
        ]
    );

    let without_dictionary = check::check_file(&input, None).expect("file checked");
    assert!(without_dictionary.is_empty());
}
