//! Delimited-text export of records.
//!
//! Two shapes are produced:
//!
//! - a table ([`to_delimited_text`]) with a header row and one row per
//!   record, every field wrapped in quotes;
//! - a `label,value` listing of a single record, one field per line.
//!
//! Quoting is the legacy form used by earlier exports: every table field is
//! quoted unconditionally and nothing inside a field is escaped, so a value
//! containing `"` or `,` is written verbatim. Consumers of existing files
//! depend on this exact output.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{Initiative, RootCauseRecord, WHY_DEPTH};

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Row separator. The last row has no trailing separator.
pub const ROW_SEPARATOR: char = '\n';

/// Header row of the bulk initiative export.
pub const INITIATIVE_HEADER: &str =
    "Title,Department,Owner,Status,Date Started,Date Completed,Problem Statement,Cost Savings,Time Saved";

/// One output column: a header label and how to render a record's value.
pub struct Column<T> {
    /// Header label.
    pub name: &'static str,
    /// Renders the raw value for a record.
    pub value: fn(&T) -> String,
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column").field("name", &self.name).finish()
    }
}

fn date(value: NaiveDate) -> String {
    value.to_string()
}

fn optional_date(value: Option<NaiveDate>) -> String {
    value.map(date).unwrap_or_default()
}

/// Columns of the bulk initiative export, in header order.
#[must_use]
pub fn initiative_columns() -> [Column<Initiative>; 9] {
    [
        Column { name: "Title", value: |i| i.title.clone() },
        Column { name: "Department", value: |i| i.department.clone() },
        Column { name: "Owner", value: |i| i.owner.clone() },
        Column { name: "Status", value: |i| i.status.to_string() },
        Column { name: "Date Started", value: |i| date(i.date_started) },
        Column { name: "Date Completed", value: |i| optional_date(i.date_completed) },
        Column { name: "Problem Statement", value: |i| i.problem_statement.clone() },
        Column { name: "Cost Savings", value: |i| i.cost_savings.to_string() },
        Column { name: "Time Saved", value: |i| i.time_saved.to_string() },
    ]
}

/// Render `records` as a header row plus one quoted row per record.
#[must_use]
pub fn to_delimited_text<T>(records: &[T], columns: &[Column<T>]) -> String {
    let delimiter = DELIMITER.to_string();
    let header = columns
        .iter()
        .map(|c| c.name)
        .collect::<Vec<_>>()
        .join(&delimiter);

    let rows = records.iter().map(|record| {
        columns
            .iter()
            .map(|c| format!("\"{}\"", (c.value)(record)))
            .collect::<Vec<_>>()
            .join(&delimiter)
    });

    std::iter::once(header)
        .chain(rows)
        .collect::<Vec<_>>()
        .join(&ROW_SEPARATOR.to_string())
}

/// Bulk export of every initiative.
#[must_use]
pub fn initiatives_to_csv(records: &[Initiative]) -> String {
    to_delimited_text(records, &initiative_columns())
}

fn label_lines(fields: Vec<(String, String)>) -> String {
    fields
        .into_iter()
        .map(|(label, value)| format!("{label}{DELIMITER}{value}"))
        .collect::<Vec<_>>()
        .join(&ROW_SEPARATOR.to_string())
}

/// Single root cause analysis as `label,value` lines, values unquoted.
#[must_use]
pub fn root_cause_to_lines(record: &RootCauseRecord) -> String {
    let mut fields = vec![
        ("Title".to_string(), record.title.clone()),
        ("Problem Statement".to_string(), record.problem_statement.clone()),
    ];
    for depth in 1..=WHY_DEPTH {
        fields.push((
            format!("Why {depth}"),
            record.why(depth).unwrap_or_default().to_string(),
        ));
    }
    fields.extend([
        ("Root Cause Summary".to_string(), record.root_cause_summary.clone()),
        ("Corrective Actions".to_string(), record.corrective_actions.clone()),
        ("Status".to_string(), record.status.to_string()),
        ("Owner".to_string(), record.owner.clone()),
        ("Date Created".to_string(), date(record.date_created)),
    ]);
    label_lines(fields)
}

/// Single initiative as `label,value` lines, values unquoted.
#[must_use]
pub fn initiative_to_lines(record: &Initiative) -> String {
    let fields = [
        ("Title", record.title.clone()),
        ("Problem Statement", record.problem_statement.clone()),
        ("Department", record.department.clone()),
        ("Owner", record.owner.clone()),
        ("Status", record.status.to_string()),
        ("Date Started", date(record.date_started)),
        ("Date Completed", optional_date(record.date_completed)),
        ("Root Cause Summary", record.root_cause_summary.clone()),
        ("Action Plan", record.action_plan.clone()),
        ("Before KPIs", record.before_kpis.clone()),
        ("After KPIs", record.after_kpis.clone()),
        ("Time Saved", record.time_saved.to_string()),
        ("Cost Savings", record.cost_savings.to_string()),
        ("Date Created", date(record.date_created)),
        ("Date Modified", date(record.date_modified)),
    ];
    label_lines(
        fields
            .into_iter()
            .map(|(label, value)| (label.to_string(), value))
            .collect(),
    )
}

/// File name for a bulk initiative export made on `today`.
#[must_use]
pub fn initiatives_file_name(today: NaiveDate) -> String {
    format!("kaizen-initiatives-{}.csv", today.format("%Y-%m-%d"))
}

fn whitespace() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    // Literal pattern; compiling it cannot fail.
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// File name for a single root cause analysis export.
///
/// Each run of whitespace in the title becomes `-` and the result is
/// lower-cased. Other characters are kept as they are.
#[must_use]
pub fn root_cause_file_name(title: &str) -> String {
    let slug = whitespace().replace_all(title, "-").to_lowercase();
    format!("rca-{slug}.csv")
}

/// File name for a single initiative export.
#[must_use]
pub fn initiative_file_name(title: &str) -> String {
    let slug = whitespace().replace_all(title, "-").to_lowercase();
    format!("kaizen-{slug}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InitiativeDraft, InitiativeStatus};
    use crate::seed;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample(title: &str, department: &str) -> Initiative {
        let draft = InitiativeDraft {
            department: Some(department.to_string()),
            owner: Some("O".to_string()),
            status: Some(InitiativeStatus::InProgress),
            date_started: Some(day("2024-03-01")),
            cost_savings: Some(3750.0),
            time_saved: Some(0.5),
            ..InitiativeDraft::new(title, "P")
        };
        Initiative::from_draft("1".into(), day("2024-03-01"), draft, "U")
    }

    #[test]
    fn test_single_initiative_table() {
        let text = initiatives_to_csv(&[sample("X", "D")]);
        let expected = format!(
            "{INITIATIVE_HEADER}\n\"X\",\"D\",\"O\",\"In Progress\",\"2024-03-01\",\"\",\"P\",\"3750\",\"0.5\""
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_matches_columns() {
        let names: Vec<_> = initiative_columns().iter().map(|c| c.name).collect();
        assert_eq!(names.join(","), INITIATIVE_HEADER);
    }

    #[test]
    fn test_empty_collection_is_header_only() {
        assert_eq!(initiatives_to_csv(&[]), INITIATIVE_HEADER);
    }

    #[test]
    fn test_embedded_quotes_and_delimiters_are_not_escaped() {
        let text = initiatives_to_csv(&[sample("Say \"hi\", then go", "D")]);
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("\"Say \"hi\", then go\",\"D\""));
    }

    #[test]
    fn test_rows_follow_collection_order() {
        let text = initiatives_to_csv(&seed::initiatives());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("\"Reduce Setup Time"));
        assert!(lines[2].contains("\"2024-02-01\",\"\""));
        assert!(lines[3].ends_with("\"45000\",\"80\""));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_root_cause_lines() {
        let record = &seed::root_causes()[0];
        let text = root_cause_to_lines(record);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "Title,Production Line Downtime");
        assert_eq!(lines[2], "Why 1,Machine sensor malfunctioned");
        assert_eq!(lines[6], "Why 5,Lack of documented maintenance procedures");
        assert_eq!(lines[9], "Status,final");
        assert_eq!(lines[11], "Date Created,2024-01-15");
    }

    #[test]
    fn test_initiative_lines_field_order() {
        let text = initiative_to_lines(&seed::initiatives()[1]);
        let labels: Vec<_> = text
            .lines()
            .map(|l| l.split_once(',').unwrap().0)
            .collect();
        assert_eq!(
            labels,
            vec![
                "Title",
                "Problem Statement",
                "Department",
                "Owner",
                "Status",
                "Date Started",
                "Date Completed",
                "Root Cause Summary",
                "Action Plan",
                "Before KPIs",
                "After KPIs",
                "Time Saved",
                "Cost Savings",
                "Date Created",
                "Date Modified",
            ]
        );
        assert!(text.contains("\nDate Completed,\n"));
    }

    #[test]
    fn test_generic_table_over_root_causes() {
        let columns = [
            Column::<RootCauseRecord> { name: "Title", value: |r| r.title.clone() },
            Column { name: "Status", value: |r| r.status.to_string() },
        ];
        let text = to_delimited_text(&seed::root_causes(), &columns);
        assert_eq!(
            text,
            "Title,Status\n\"Production Line Downtime\",\"final\"\n\"Quality Control Issue\",\"draft\""
        );
    }

    #[test]
    fn test_file_names() {
        assert_eq!(
            initiatives_file_name(day("2024-06-09")),
            "kaizen-initiatives-2024-06-09.csv"
        );
        assert_eq!(
            root_cause_file_name("Production  Line\tDowntime"),
            "rca-production-line-downtime.csv"
        );
        assert_eq!(initiative_file_name("Reduce Setup"), "kaizen-reduce-setup.csv");
    }
}
