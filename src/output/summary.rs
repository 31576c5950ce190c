use crate::error::OutputError;
use crate::runner::{AggregatedRecord, Verdict};
use crate::units::UnitId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryReport {
    pub run_id: String,
    pub timestamp: String,
    pub model: String,
    pub duration_sec: f64,
    pub units: usize,
    pub good: usize,
    pub bad: usize,
    /// Units where at least one reviewer exhausted its retries
    pub degraded: Vec<UnitId>,
    pub report_dir: PathBuf,
}

/// Write `summary.json` and `summary.md` for a finished run
pub fn write_summary(
    report_dir: &Path,
    records: &[AggregatedRecord],
    model: &str,
    duration: Duration,
) -> Result<SummaryReport, OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let summary = build_summary(records, model, duration, report_dir.to_path_buf());

    let json = serde_json::to_string_pretty(&summary)?;
    fs::write(report_dir.join("summary.json"), json).map_err(OutputError::WriteReport)?;

    let md = build_summary_markdown(&summary, records);
    fs::write(report_dir.join("summary.md"), md).map_err(OutputError::WriteReport)?;

    Ok(summary)
}

fn build_summary(
    records: &[AggregatedRecord],
    model: &str,
    duration: Duration,
    report_dir: PathBuf,
) -> SummaryReport {
    let good = records
        .iter()
        .filter(|r| r.final_classification == Verdict::Good)
        .count();

    SummaryReport {
        run_id: uuid::Uuid::new_v4().to_string(),
        timestamp: Utc::now().to_rfc3339(),
        model: model.to_string(),
        duration_sec: duration.as_secs_f64(),
        units: records.len(),
        good,
        bad: records.len() - good,
        degraded: records
            .iter()
            .filter(|r| r.is_degraded())
            .map(|r| r.unit_id)
            .collect(),
        report_dir,
    }
}

fn build_summary_markdown(summary: &SummaryReport, records: &[AggregatedRecord]) -> String {
    let mut md = String::new();

    md.push_str("# spikecurate Summary\n\n");
    md.push_str(&format!("**Run:** {}\n", summary.run_id));
    md.push_str(&format!("**Generated:** {}\n", summary.timestamp));
    md.push_str(&format!("**Model:** {}\n", summary.model));
    md.push_str(&format!("**Duration:** {:.1}s\n\n", summary.duration_sec));

    md.push_str("## Totals\n\n");
    md.push_str("| Verdict | Units |\n");
    md.push_str("|---------|-------|\n");
    md.push_str(&format!("| Good | {} |\n", summary.good));
    md.push_str(&format!("| Bad | {} |\n", summary.bad));
    md.push_str(&format!("| Total | {} |\n\n", summary.units));

    if !summary.degraded.is_empty() {
        md.push_str("## Degraded Units\n\n");
        md.push_str("At least one reviewer failed on every attempt for these units:\n\n");
        for id in &summary.degraded {
            md.push_str(&format!("- {}\n", id));
        }
        md.push('\n');
    }

    md.push_str("## Units\n\n");
    md.push_str("| Unit | Verdict | Score | Votes |\n");
    md.push_str("|------|---------|-------|-------|\n");
    for record in records {
        let icon = match record.final_classification {
            Verdict::Good => "✅",
            Verdict::Bad => "❌",
        };
        let votes = record
            .votes
            .iter()
            .map(|v| v.label.to_string())
            .collect::<Vec<_>>()
            .join(" / ");
        md.push_str(&format!(
            "| {} | {} {} | {:.2} | {} |\n",
            record.unit_id, icon, record.final_classification, record.average_score, votes
        ));
    }

    md
}
