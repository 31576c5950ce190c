use std::path::PathBuf;

use super::Modality;

pub fn default_version() -> u32 {
    1
}

pub fn default_image_dir() -> PathBuf {
    PathBuf::from("images")
}

pub fn default_modalities() -> Vec<Modality> {
    vec![Modality::WaveformSingle, Modality::Autocorr]
}

pub fn default_concurrency() -> usize {
    50
}

pub fn default_report_dir() -> PathBuf {
    PathBuf::from("reports")
}

pub fn default_metric_columns() -> Vec<String> {
    vec![
        "snr".to_string(),
        "isi_violations_ratio".to_string(),
        "presence_ratio".to_string(),
        "amplitude_cutoff".to_string(),
    ]
}

pub fn default_max_attempts() -> u32 {
    10
}

pub fn default_delay_ms() -> u64 {
    1000
}

pub fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

pub fn default_model() -> String {
    "gpt-4o".to_string()
}

pub fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

pub fn default_temperature() -> f32 {
    1.0
}

pub fn default_timeout_sec() -> u64 {
    120
}
