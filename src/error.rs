use std::path::PathBuf;
use thiserror::Error;

use crate::units::UnitId;

#[derive(Error, Debug)]
pub enum CurateError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] PromptError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("retry.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("No modalities requested")]
    NoModalities,

    #[error("Modality '{0}' requested more than once")]
    DuplicateModality(String),

    #[error("Unit {0} is listed as both a good and a bad few-shot example")]
    ConflictingExample(UnitId),
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unit {unit} has no '{modality}' image in {dir}")]
    MissingImage {
        unit: UnitId,
        modality: String,
        dir: PathBuf,
    },

    #[error("Failed to read metrics CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unit {0} appears on more than one metrics row")]
    DuplicateUnit(UnitId),

    #[error("Metrics CSV has no '{0}' column")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in metrics column '{column}'")]
    InvalidValue { column: String, value: String },
}

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to read prompt file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Few-shot example unit {0} not found in image table")]
    UnknownExample(UnitId),
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Environment variable '{0}' is not set")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model response contained no message content")]
    EmptyResponse,

    #[error("Invalid model response: {0}")]
    Parse(#[from] ParserError),
}

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No JSON object found in model output")]
    NoJson,

    #[error("Confidence score is not a finite number")]
    NonFiniteScore,
}

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Metrics have {metrics} rows but the image table has {images}")]
    MetricsMismatch { metrics: usize, images: usize },

    #[error("No metrics row for unit {0}")]
    MissingMetrics(UnitId),

    #[error("Unit {0} not found in image table")]
    UnknownUnit(UnitId),

    #[error("Failed to acquire semaphore: {0}")]
    Semaphore(#[from] tokio::sync::AcquireError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
