use super::aggregate::{aggregate, AggregatedRecord};
use super::reviewer::review_unit;
use super::{Preamble, UnitInput, PANEL};
use crate::config::RetryConfig;
use crate::provider::ModelInvoker;
use futures::future::join_all;

/// Review one unit with every panel member concurrently, then aggregate
pub async fn run_ensemble(
    invoker: &dyn ModelInvoker,
    retry: &RetryConfig,
    preamble: &Preamble,
    unit: UnitInput<'_>,
) -> AggregatedRecord {
    let reviews = join_all(
        PANEL
            .iter()
            .map(|&reviewer| review_unit(invoker, retry, preamble, unit, reviewer)),
    )
    .await;

    aggregate(unit.id, &reviews)
}
