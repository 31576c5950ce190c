use super::{ReviewerId, Verdict};
use crate::parser::{round2, Classification, Label};
use crate::units::UnitId;
use serde::{Deserialize, Serialize};

/// One panel member's contribution to a unit
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub reviewer: ReviewerId,
    pub classification: Classification,
}

/// A reviewer's score and label, kept for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewerVote {
    pub reviewer: ReviewerId,
    pub score: f64,
    pub label: Label,
}

/// Consensus for one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub unit_id: UnitId,
    pub average_score: f64,
    pub final_classification: Verdict,
    pub combined_reasoning: String,
    pub votes: Vec<ReviewerVote>,
}

impl AggregatedRecord {
    /// True when at least one reviewer fell back to the error sentinel
    pub fn is_degraded(&self) -> bool {
        self.votes.iter().any(|v| v.label == Label::Error)
    }
}

/// Combine a panel's reviews of one unit
///
/// The unit is Good only when more than one reviewer said Good; with the
/// three-member panel that means two of three. Error reviews count toward
/// the mean with their score of zero.
pub fn aggregate(unit_id: UnitId, reviews: &[Review]) -> AggregatedRecord {
    let scores: Vec<f64> = reviews
        .iter()
        .map(|r| r.classification.confidence_score)
        .collect();
    let average_score = if scores.is_empty() {
        0.0
    } else {
        round2(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    let good_count = reviews
        .iter()
        .filter(|r| r.classification.classification == Label::Good)
        .count();
    let final_classification = if good_count > 1 {
        Verdict::Good
    } else {
        Verdict::Bad
    };

    let combined_reasoning = reviews
        .iter()
        .map(|r| format!("Reviewer {}: {}", r.reviewer, r.classification.reasoning))
        .collect::<Vec<_>>()
        .join("\n");

    let votes = reviews
        .iter()
        .map(|r| ReviewerVote {
            reviewer: r.reviewer,
            score: r.classification.confidence_score,
            label: r.classification.classification,
        })
        .collect();

    AggregatedRecord {
        unit_id,
        average_score,
        final_classification,
        combined_reasoning,
        votes,
    }
}
