use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A reviewer's label for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
pub enum Label {
    Good,
    Bad,
    Error,
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Good => write!(f, "Good"),
            Label::Bad => write!(f, "Bad"),
            Label::Error => write!(f, "Error"),
        }
    }
}

/// Structured output for spike classification.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Classification {
    /// The classification of the spike as Good or Bad.
    pub classification: Label,

    /// Score of the spike from 0 to 1 (two decimal places).
    pub confidence_score: f64,

    /// Brief explanation of how the waveform, autocorrelogram, and metrics
    /// contributed to the decision. Be specific.
    pub reasoning: String,
}

impl Classification {
    /// Stand-in for a reviewer whose every attempt failed
    pub fn error_sentinel() -> Self {
        Self {
            classification: Label::Error,
            confidence_score: 0.0,
            reasoning: String::new(),
        }
    }
}

/// Round half away from zero to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
