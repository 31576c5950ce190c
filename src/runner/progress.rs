use super::AggregatedRecord;
use tracing::info;

/// Notified once per unit as its ensemble completes
pub trait ProgressReporter: Send + Sync {
    fn unit_completed(&self, record: &AggregatedRecord, completed: usize, total: usize);
}

/// Reports progress through the log
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn unit_completed(&self, record: &AggregatedRecord, completed: usize, total: usize) {
        info!(
            "[{}/{}] Unit {}: {} ({:.2})",
            completed, total, record.unit_id, record.final_classification, record.average_score
        );
    }
}
