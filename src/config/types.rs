use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;
use crate::units::UnitId;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Directory holding one sub-directory of plot images per unit
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    #[serde(default = "default_modalities")]
    pub modalities: Vec<Modality>,

    /// Restrict the run to these units (default: every unit under `image_dir`)
    #[serde(default)]
    pub unit_ids: Option<Vec<UnitId>>,

    #[serde(default)]
    pub metrics: Option<MetricsConfig>,

    #[serde(default)]
    pub fewshot: FewshotConfig,

    /// Directory overriding the built-in prompt texts
    #[serde(default)]
    pub prompt_dir: Option<PathBuf>,

    /// Maximum number of units in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    #[serde(default)]
    pub dry_run: bool,
}

/// Plot types a unit can be rendered as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    WaveformSingle,
    WaveformMulti,
    Autocorr,
    SpikeLocations,
    AmplitudePlot,
}

impl Modality {
    pub const ALL: [Modality; 5] = [
        Modality::WaveformSingle,
        Modality::WaveformMulti,
        Modality::Autocorr,
        Modality::SpikeLocations,
        Modality::AmplitudePlot,
    ];

    /// File stem used for images and prompt blocks
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::WaveformSingle => "waveform_single",
            Modality::WaveformMulti => "waveform_multi",
            Modality::Autocorr => "autocorr",
            Modality::SpikeLocations => "spike_locations",
            Modality::AmplitudePlot => "amplitude_plot",
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            Modality::WaveformSingle => "Single-channel average waveform",
            Modality::WaveformMulti => "Multi-channel average waveform (template)",
            Modality::Autocorr => "Autocorrelogram of spike times",
            Modality::SpikeLocations => "Spike location scatter plot",
            Modality::AmplitudePlot => "Amplitude over time plot",
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Modality::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown modality: {}", s))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct MetricsConfig {
    /// CSV file with a `unit_id` column and one column per metric
    pub path: PathBuf,

    #[serde(default = "default_metric_columns")]
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct FewshotConfig {
    #[serde(default)]
    pub good_ids: Vec<UnitId>,

    #[serde(default)]
    pub bad_ids: Vec<UnitId>,
}

impl FewshotConfig {
    pub fn is_empty(&self) -> bool {
        self.good_ids.is_empty() && self.bad_ids.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed pause between attempts
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ProviderConfig {
    /// OpenAI-compatible API root (the `/chat/completions` path is appended)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            timeout_sec: default_timeout_sec(),
        }
    }
}
