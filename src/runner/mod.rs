mod aggregate;
mod ensemble;
mod progress;
mod retry;
mod reviewer;
mod scheduler;

pub use aggregate::{AggregatedRecord, Review};
#[cfg(test)]
pub use aggregate::ReviewerVote;
pub use progress::{LogProgress, ProgressReporter};
pub use scheduler::{chunk_size, Batch, BatchScheduler};

use crate::prompt::Message;
use crate::units::{ImagePayload, UnitId, UnitMetrics};
use serde::{Deserialize, Serialize};

/// Identifies one independent review of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewerId(pub u8);

impl std::fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed review panel. Consensus rules assume exactly three members.
pub const PANEL: [ReviewerId; 3] = [ReviewerId(1), ReviewerId(2), ReviewerId(3)];

/// Consensus label for a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Good,
    Bad,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Good => write!(f, "Good"),
            Verdict::Bad => write!(f, "Bad"),
        }
    }
}

/// Messages shared by every reviewer invocation in a run
#[derive(Debug, Clone, Default)]
pub struct Preamble {
    pub system: Vec<Message>,
    pub fewshot: Vec<Message>,
}

/// Borrowed view of the unit under review
#[derive(Debug, Clone, Copy)]
pub struct UnitInput<'a> {
    pub id: UnitId,
    pub images: &'a [ImagePayload],
    pub metrics: Option<&'a UnitMetrics>,
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ReviewerId;
    use crate::error::ProviderError;
    use crate::parser::{Classification, Label};
    use crate::provider::{ClassificationRequest, ModelInvoker};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from a fixed function of (unit, reviewer), failing where it returns None
    pub struct ScriptedInvoker<F>
    where
        F: Fn(u32, ReviewerId) -> Option<Label> + Send + Sync,
    {
        pub script: F,
        pub calls: AtomicUsize,
    }

    impl<F> ScriptedInvoker<F>
    where
        F: Fn(u32, ReviewerId) -> Option<Label> + Send + Sync,
    {
        pub fn new(script: F) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl<F> ModelInvoker for ScriptedInvoker<F>
    where
        F: Fn(u32, ReviewerId) -> Option<Label> + Send + Sync,
    {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn invoke(
            &self,
            request: &ClassificationRequest,
        ) -> Result<Classification, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            match (self.script)(request.unit_id, request.reviewer) {
                Some(label) => Ok(Classification {
                    classification: label,
                    confidence_score: 0.9,
                    reasoning: format!("unit {} looks {}", request.unit_id, label),
                }),
                None => Err(ProviderError::EmptyResponse),
            }
        }
    }
}
