mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::collections::HashSet;
use std::path::Path;

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            image_dir: default_image_dir(),
            modalities: default_modalities(),
            unit_ids: None,
            metrics: None,
            fewshot: FewshotConfig::default(),
            prompt_dir: None,
            concurrency: default_concurrency(),
            retry: RetryConfig::default(),
            provider: ProviderConfig::default(),
            report_dir: default_report_dir(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }

        if self.modalities.is_empty() {
            return Err(ConfigError::NoModalities);
        }

        let mut seen = HashSet::new();
        for modality in &self.modalities {
            if !seen.insert(*modality) {
                return Err(ConfigError::DuplicateModality(modality.to_string()));
            }
        }

        for id in &self.fewshot.good_ids {
            if self.fewshot.bad_ids.contains(id) {
                return Err(ConfigError::ConflictingExample(*id));
            }
        }

        Ok(())
    }
}
