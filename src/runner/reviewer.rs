use super::retry::{retry_with_fixed_delay, RetryOutcome};
use super::{Preamble, Review, ReviewerId, UnitInput};
use crate::config::RetryConfig;
use crate::parser::Classification;
use crate::prompt::create_unit_messages;
use crate::provider::{ClassificationRequest, ModelInvoker};
use tracing::{debug, error, info_span, Instrument};

/// Obtain one reviewer's classification of a unit
///
/// Never fails: when every attempt errors the review degrades to the
/// `Error` sentinel.
pub async fn review_unit(
    invoker: &dyn ModelInvoker,
    retry: &RetryConfig,
    preamble: &Preamble,
    unit: UnitInput<'_>,
    reviewer: ReviewerId,
) -> Review {
    let span = info_span!("review", unit = unit.id, reviewer = %reviewer);

    async move {
        let mut messages = preamble.system.clone();
        messages.extend(create_unit_messages(unit.images, unit.metrics));
        messages.extend(preamble.fewshot.iter().cloned());

        debug!(
            "Sending {} messages ({} images)",
            messages.len(),
            messages.iter().map(|m| m.image_count()).sum::<usize>()
        );

        let request = ClassificationRequest {
            unit_id: unit.id,
            reviewer,
            messages,
        };

        let outcome = retry_with_fixed_delay(retry, || invoker.invoke(&request)).await;

        let classification = match outcome {
            RetryOutcome::Success(classification) => {
                debug!(
                    "Unit {} reviewer {}: {} ({:.2})",
                    unit.id, reviewer, classification.classification, classification.confidence_score
                );
                classification
            }
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => {
                error!(
                    "Skipping unit {} for reviewer {} after {} failures: {}",
                    unit.id, reviewer, attempts, last_error
                );
                Classification::error_sentinel()
            }
        };

        Review {
            reviewer,
            classification,
        }
    }
    .instrument(span)
    .await
}
