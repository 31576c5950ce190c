use super::{ClassificationRequest, ModelInvoker};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::parser::{classification_schema, parse_classification, Classification};
use crate::prompt::{ContentBlock, Message, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SCHEMA_NAME: &str = "spike_classification";

/// Chat-completions client for OpenAI-compatible endpoints
pub struct OpenAiInvoker {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<WireMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: Vec<WirePart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiInvoker {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_sec))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    fn build_body(&self, messages: &[Message]) -> Result<ChatRequest<'_>, ProviderError> {
        let schema = serde_json::to_value(classification_schema())
            .map_err(|e| ProviderError::Parse(e.into()))?;

        Ok(ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: messages.iter().map(to_wire).collect(),
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: SCHEMA_NAME,
                    strict: true,
                    schema,
                },
            },
        })
    }
}

fn to_wire(message: &Message) -> WireMessage {
    let role = match message.role {
        Role::System => "system",
        Role::User => "user",
    };

    let content = message
        .content
        .iter()
        .map(|block| match block {
            ContentBlock::Text(text) => WirePart::Text { text: text.clone() },
            ContentBlock::Image(image) => WirePart::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            },
        })
        .collect();

    WireMessage { role, content }
}

/// Turn an HTTP status and chat-completions body into a classification
fn read_reply(status: u16, body: &str) -> Result<Classification, ProviderError> {
    if !(200..300).contains(&status) {
        return Err(ProviderError::Status {
            status,
            body: body.to_string(),
        });
    }

    let chat: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.into()))?;
    let content = chat
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(ProviderError::EmptyResponse)?;

    Ok(parse_classification(&content)?)
}

#[async_trait]
impl ModelInvoker for OpenAiInvoker {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(
        &self,
        request: &ClassificationRequest,
    ) -> Result<Classification, ProviderError> {
        let body = self.build_body(&request.messages)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(
            "Unit {} reviewer {} reply ({}): {}",
            request.unit_id, request.reviewer, status, text
        );

        read_reply(status, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Modality;
    use crate::units::ImagePayload;

    fn invoker() -> OpenAiInvoker {
        let config = ProviderConfig {
            base_url: "http://localhost:8000/v1/".to_string(),
            ..ProviderConfig::default()
        };
        OpenAiInvoker::new(&config, "sk-test".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(
            invoker().endpoint,
            "http://localhost:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let messages = vec![
            Message::system("head"),
            Message::user(vec![
                ContentBlock::Text("unit".to_string()),
                ContentBlock::Image(ImagePayload {
                    modality: Modality::Autocorr,
                    media_type: "image/png",
                    data: "QUJD".into(),
                }),
            ]),
        ];

        let invoker = invoker();
        let body = serde_json::to_value(invoker.build_body(&messages).unwrap()).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"][1]["type"], "image_url");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/png;base64,QUJD"
        );
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(
            body["response_format"]["json_schema"]["schema"]["additionalProperties"],
            false
        );
    }

    fn reply(content: serde_json::Value) -> String {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
        .to_string()
    }

    #[test]
    fn test_reply_error_status() {
        let err = read_reply(429, r#"{"error": "rate limited"}"#).unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Status { status: 429, ref body } if body.contains("rate limited")
        ));
    }

    #[test]
    fn test_reply_without_content() {
        let empty = r#"{"choices": []}"#;
        assert!(matches!(
            read_reply(200, empty),
            Err(ProviderError::EmptyResponse)
        ));

        let null = reply(serde_json::Value::Null);
        assert!(matches!(
            read_reply(200, &null),
            Err(ProviderError::EmptyResponse)
        ));
    }

    #[test]
    fn test_reply_fenced_content() {
        let body = reply(serde_json::json!(
            "```json\n{\"classification\": \"Good\", \"confidence_score\": 0.914, \"reasoning\": \"sharp trough\"}\n```"
        ));

        let parsed = read_reply(200, &body).unwrap();
        assert_eq!(parsed.classification, crate::parser::Label::Good);
        assert_eq!(parsed.confidence_score, 0.91);
        assert_eq!(parsed.reasoning, "sharp trough");
    }

    #[test]
    fn test_reply_malformed_body() {
        assert!(matches!(
            read_reply(200, "<html>bad gateway</html>"),
            Err(ProviderError::Parse(_))
        ));
    }
}
