use super::ensemble::run_ensemble;
use super::{AggregatedRecord, Preamble, ProgressReporter, UnitInput, PANEL};
use crate::config::RetryConfig;
use crate::error::RunnerError;
use crate::provider::ModelInvoker;
use crate::units::{ImageTable, MetricsTable, UnitId};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info};

/// Everything a run needs besides the model
pub struct Batch<'a> {
    pub unit_ids: &'a [UnitId],
    pub images: &'a ImageTable,
    pub metrics: Option<&'a MetricsTable>,
    pub preamble: &'a Preamble,
}

/// Drives ensembles for many units under a concurrency bound
pub struct BatchScheduler {
    invoker: Arc<dyn ModelInvoker>,
    retry: RetryConfig,
    concurrency: usize,
    semaphore: Arc<Semaphore>,
}

impl BatchScheduler {
    pub fn new(invoker: Arc<dyn ModelInvoker>, retry: RetryConfig, concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        Self {
            invoker,
            retry,
            concurrency,
            semaphore,
        }
    }

    pub fn chunk_size(&self) -> usize {
        chunk_size(self.concurrency)
    }

    /// Classify every unit in the batch, returning records sorted by unit id
    ///
    /// Fails before any model call when the metrics table does not line up
    /// with the image table. Per-reviewer failures never fail the run.
    pub async fn run(
        &self,
        batch: &Batch<'_>,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<AggregatedRecord>, RunnerError> {
        let inputs = resolve_inputs(batch)?;
        let start = Instant::now();
        let total = inputs.len();
        let chunk_size = self.chunk_size();

        info!(
            "Classifying {} units via {} with {} reviewers each (concurrency {}, chunk size {})",
            total,
            self.invoker.name(),
            PANEL.len(),
            self.concurrency,
            chunk_size
        );

        let completed = AtomicUsize::new(0);
        let completed = &completed;
        let mut records = Vec::with_capacity(total);

        for (idx, chunk) in inputs.chunks(chunk_size).enumerate() {
            debug!("Submitting chunk {} ({} units)", idx + 1, chunk.len());

            let futures = chunk.iter().map(|&unit| async move {
                let _permit = self.semaphore.acquire().await?;
                let record =
                    run_ensemble(self.invoker.as_ref(), &self.retry, batch.preamble, unit).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.unit_completed(&record, done, total);
                Ok::<_, RunnerError>(record)
            });

            for result in join_all(futures).await {
                records.push(result?);
            }
        }

        records.sort_by_key(|r| r.unit_id);

        info!(
            "Classified {} units in {:.1}s",
            records.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(records)
    }
}

/// Units submitted per wave: one panel's worth of the bound, at least one
pub fn chunk_size(concurrency: usize) -> usize {
    (concurrency / PANEL.len()).max(1)
}

/// Check preconditions and look up each unit's images and metrics
fn resolve_inputs<'a>(batch: &Batch<'a>) -> Result<Vec<UnitInput<'a>>, RunnerError> {
    if let Some(metrics) = batch.metrics {
        if metrics.len() != batch.images.len() {
            return Err(RunnerError::MetricsMismatch {
                metrics: metrics.len(),
                images: batch.images.len(),
            });
        }
    }

    batch
        .unit_ids
        .iter()
        .map(|&id| {
            let images = batch.images.get(id).ok_or(RunnerError::UnknownUnit(id))?;
            let metrics = match batch.metrics {
                Some(table) => Some(table.get(id).ok_or(RunnerError::MissingMetrics(id))?),
                None => None,
            };
            Ok(UnitInput {
                id,
                images,
                metrics,
            })
        })
        .collect()
}
