mod openai;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::parser::Classification;
use crate::prompt::Message;
use crate::runner::ReviewerId;
use crate::units::UnitId;
use async_trait::async_trait;
use std::sync::Arc;

/// One reviewer's view of one unit, ready to send
#[derive(Debug, Clone)]
pub struct ClassificationRequest {
    pub unit_id: UnitId,
    pub reviewer: ReviewerId,
    pub messages: Vec<Message>,
}

/// A structured-output capable model
///
/// Implementations return a validated `Classification` or an error; any
/// error is treated as transient by the caller and retried.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    fn name(&self) -> &str;

    async fn invoke(&self, request: &ClassificationRequest)
        -> Result<Classification, ProviderError>;
}

/// Build the invoker described by the provider config
///
/// The API key is read from the configured environment variable here, once,
/// and owned by the returned invoker.
pub fn create_invoker(config: &ProviderConfig) -> Result<Arc<dyn ModelInvoker>, ProviderError> {
    let api_key = std::env::var(&config.api_key_env)
        .map_err(|_| ProviderError::MissingApiKey(config.api_key_env.clone()))?;
    Ok(Arc::new(openai::OpenAiInvoker::new(config, api_key)?))
}
