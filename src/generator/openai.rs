use super::TextGenerator;
use crate::config::GeneratorConfig;
use crate::model::GenerationError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResponsesReply {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesReply {
    /// Prefers the aggregated `output_text`, otherwise joins the
    /// `output_text` parts of every output message. Blank text counts as none.
    fn into_text(self) -> Option<String> {
        let text = match self.output_text {
            Some(text) => text,
            None => self
                .output
                .into_iter()
                .flat_map(|item| item.content)
                .filter(|part| part.kind == "output_text")
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join(""),
        };
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Client for an OpenAI-compatible Responses endpoint.
pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiGenerator {
    pub fn new(config: &GeneratorConfig, api_key: String) -> Result<Self, GenerationError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            endpoint: format!("{}/responses", config.api_base.trim_end_matches('/')),
        })
    }

    /// Builds a generator when the configured credential is present.
    pub fn from_config(config: &GeneratorConfig) -> Result<Option<Self>, GenerationError> {
        match config.api_key() {
            Some(key) => Self::new(config, key).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("📤 Requesting summary from {} ({})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ResponsesRequest {
                model: &self.model,
                input: prompt,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("❌ Text generation API responded [{}]: {}", status, body);
            return Err(GenerationError::Status(status.as_u16(), body));
        }

        let reply: ResponsesReply = response.json().await?;
        reply.into_text().ok_or(GenerationError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, StatusCode, header};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    fn reply(json: &str) -> ResponsesReply {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reads_aggregated_output_text() {
        let r = reply(r#"{ "output_text": "  Prices rose.  " }"#);
        assert_eq!(r.into_text().as_deref(), Some("  Prices rose.  "));
    }

    #[test]
    fn joins_message_content_parts() {
        let r = reply(
            r#"{ "output": [
                { "type": "reasoning", "content": [] },
                { "type": "message", "content": [
                    { "type": "output_text", "text": "Prices " },
                    { "type": "refusal", "refusal": "no" },
                    { "type": "output_text", "text": "rose." }
                ] }
            ] }"#,
        );
        assert_eq!(r.into_text().as_deref(), Some("Prices rose."));
    }

    #[test]
    fn blank_replies_yield_nothing() {
        assert_eq!(reply(r#"{ "output_text": "   " }"#).into_text(), None);
        assert_eq!(reply("{}").into_text(), None);
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let cfg = GeneratorConfig {
            api_base: "http://localhost:9/v1/".into(),
            timeout_secs: Some(1),
            ..GeneratorConfig::default()
        };
        let generator = OpenAiGenerator::new(&cfg, "key".into()).unwrap();
        assert_eq!(generator.endpoint, "http://localhost:9/v1/responses");
        assert_eq!(generator.model, "gpt-5.1-mini");
    }

    /// Serves `app` on an ephemeral local port and returns a generator aimed at it.
    async fn generator_for(app: Router) -> OpenAiGenerator {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let cfg = GeneratorConfig {
            api_base: format!("http://{addr}/v1"),
            timeout_secs: Some(5),
            ..GeneratorConfig::default()
        };
        OpenAiGenerator::new(&cfg, "test-key".into()).unwrap()
    }

    async fn generator_replying(status: StatusCode, body: &'static str) -> OpenAiGenerator {
        let app = Router::new().route(
            "/v1/responses",
            post(move || async move {
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }),
        );
        generator_for(app).await
    }

    #[tokio::test]
    async fn sends_model_prompt_and_key() {
        let app = Router::new().route(
            "/v1/responses",
            post(|headers: HeaderMap, Json(req): Json<Value>| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!({
                    "output_text": format!("{} {} {}", auth, req["model"], req["input"])
                }))
            }),
        );
        let generator = generator_for(app).await;

        let text = generator.generate("How is Wakad?").await.unwrap();
        assert_eq!(text, r#"Bearer test-key "gpt-5.1-mini" "How is Wakad?""#);
    }

    #[tokio::test]
    async fn server_error_is_reported_with_status() {
        let generator =
            generator_replying(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error": "boom"}"#).await;
        match generator.generate("q").await {
            Err(GenerationError::Status(500, body)) => assert!(body.contains("boom")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_reply_is_an_error() {
        let generator = generator_replying(StatusCode::OK, r#"{"output_text": 5}"#).await;
        assert!(matches!(
            generator.generate("q").await,
            Err(GenerationError::Http(_))
        ));
    }

    #[tokio::test]
    async fn reply_without_text_is_empty() {
        let generator = generator_replying(StatusCode::OK, "{}").await;
        assert!(matches!(
            generator.generate("q").await,
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let cfg = GeneratorConfig {
            api_base: format!("http://{addr}/v1"),
            timeout_secs: Some(5),
            ..GeneratorConfig::default()
        };
        let generator = OpenAiGenerator::new(&cfg, "key".into()).unwrap();
        assert!(matches!(
            generator.generate("q").await,
            Err(GenerationError::Http(_))
        ));
    }
}
