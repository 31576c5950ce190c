use crate::error::OutputError;
use crate::runner::{AggregatedRecord, PANEL};
use std::fs;
use std::path::Path;

pub const CSV_FILE: &str = "curation.csv";
pub const JSON_FILE: &str = "curation.json";

/// Column names of the results table, in output order
pub fn table_headers() -> Vec<String> {
    let mut headers = vec![
        "unit_id".to_string(),
        "average_score".to_string(),
        "final_classification".to_string(),
        "combined_reasoning".to_string(),
    ];
    headers.extend(PANEL.iter().map(|r| format!("reviewer_{}_score", r)));
    headers.extend(PANEL.iter().map(|r| format!("reviewer_{}_class", r)));
    headers
}

fn table_row(record: &AggregatedRecord) -> Vec<String> {
    let mut row = vec![
        record.unit_id.to_string(),
        format!("{:.2}", record.average_score),
        record.final_classification.to_string(),
        record.combined_reasoning.clone(),
    ];

    for reviewer in PANEL {
        let vote = record.votes.iter().find(|v| v.reviewer == reviewer);
        row.push(vote.map(|v| v.score.to_string()).unwrap_or_default());
    }
    for reviewer in PANEL {
        let vote = record.votes.iter().find(|v| v.reviewer == reviewer);
        row.push(vote.map(|v| v.label.to_string()).unwrap_or_default());
    }

    row
}

/// Write the results table as CSV and JSON
pub fn write_results(report_dir: &Path, records: &[AggregatedRecord]) -> Result<(), OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let mut writer = csv::WriterBuilder::new().from_path(report_dir.join(CSV_FILE))?;
    writer.write_record(table_headers())?;
    for record in records {
        writer.write_record(table_row(record))?;
    }
    writer.flush().map_err(OutputError::WriteReport)?;

    let json = serde_json::to_string_pretty(records)?;
    fs::write(report_dir.join(JSON_FILE), json).map_err(OutputError::WriteReport)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Label;
    use crate::runner::{ReviewerVote, Verdict};

    fn record(unit_id: u32) -> AggregatedRecord {
        AggregatedRecord {
            unit_id,
            average_score: 0.6,
            final_classification: Verdict::Bad,
            combined_reasoning: "Reviewer 1: a, b\nReviewer 2: c\nReviewer 3: ".to_string(),
            votes: vec![
                ReviewerVote {
                    reviewer: PANEL[0],
                    score: 0.8,
                    label: Label::Good,
                },
                ReviewerVote {
                    reviewer: PANEL[1],
                    score: 1.0,
                    label: Label::Bad,
                },
                ReviewerVote {
                    reviewer: PANEL[2],
                    score: 0.0,
                    label: Label::Error,
                },
            ],
        }
    }

    #[test]
    fn test_headers() {
        let headers = table_headers();
        assert_eq!(headers.len(), 10);
        assert_eq!(headers[4], "reviewer_1_score");
        assert_eq!(headers[7], "reviewer_1_class");
        assert_eq!(headers[9], "reviewer_3_class");
    }

    #[test]
    fn test_row_values() {
        let row = table_row(&record(4));
        assert_eq!(row[0], "4");
        assert_eq!(row[1], "0.60");
        assert_eq!(row[2], "Bad");
        assert_eq!(&row[4..7], &["0.8", "1", "0"]);
        assert_eq!(&row[7..], &["Good", "Bad", "Error"]);
    }

    #[test]
    fn test_write_results_roundtrips_csv() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("2026-01-01");
        write_results(&dir, &[record(1), record(2)]).unwrap();

        let mut reader = csv::Reader::from_path(dir.join(CSV_FILE)).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[1][0], "2");
        assert!(rows[0][3].contains('\n'));

        let json = fs::read_to_string(dir.join(JSON_FILE)).unwrap();
        let parsed: Vec<AggregatedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, vec![record(1), record(2)]);
    }
}
