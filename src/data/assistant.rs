//! Conversational backend client.
//!
//! Request: `POST {base}/gpt {"prompt": "..."}`.
//! Response: `{"response": "..."}` (text) or `{"chartData": ChartPayload}`.
//! Anything else is logged and turned into a silent no-op.

use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::data::{env_base_url, http_client};
use crate::domain::ChartPayload;
use crate::error::AppError;

pub const ASSISTANT_URL_VAR: &str = "TRENDS_ASSISTANT_URL";

/// What the assistant sent back.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantReply {
    Text(String),
    Chart(ChartPayload),
    /// Nothing to show (malformed body or empty prompt).
    NoOp,
}

#[derive(Debug, Serialize)]
struct GptRequest<'a> {
    prompt: &'a str,
}

pub struct AssistantClient {
    client: Client,
    base_url: String,
}

impl AssistantClient {
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = env_base_url(ASSISTANT_URL_VAR)?;
        Ok(Self {
            client: http_client()?,
            base_url,
        })
    }

    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Send a prompt. Transport and HTTP failures are errors; a malformed body is not.
    pub fn ask(&self, prompt: &str) -> Result<AssistantReply, AppError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(AssistantReply::NoOp);
        }

        let url = format!("{}/gpt", self.base_url);
        debug!(%url, "sending prompt to assistant");
        let resp = self
            .client
            .post(&url)
            .json(&GptRequest { prompt })
            .send()
            .map_err(|e| AppError::new(4, format!("Assistant request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Assistant request failed with status {}.", resp.status()),
            ));
        }

        let body: Value = match resp.json() {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "assistant response is not JSON");
                return Ok(AssistantReply::NoOp);
            }
        };
        Ok(parse_assistant_reply(&body))
    }
}

/// Interpret a response body. Text wins when both shapes are present.
pub fn parse_assistant_reply(body: &Value) -> AssistantReply {
    if let Some(text) = body.get("response").and_then(Value::as_str) {
        return AssistantReply::Text(text.to_string());
    }

    if let Some(chart) = body.get("chartData") {
        return match serde_json::from_value::<ChartPayload>(chart.clone()) {
            Ok(payload) => AssistantReply::Chart(payload),
            Err(e) => {
                warn!(error = %e, "malformed chartData in assistant response");
                AssistantReply::NoOp
            }
        };
    }

    warn!(body = %body, "malformed assistant response");
    AssistantReply::NoOp
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_reply() {
        let reply = parse_assistant_reply(&json!({"response": "Cement rose 0.4% last month."}));
        assert_eq!(reply, AssistantReply::Text("Cement rose 0.4% last month.".to_string()));
    }

    #[test]
    fn chart_reply() {
        let reply = parse_assistant_reply(&json!({
            "chartData": {"title": "Cement", "points": [{"date": "2024-01", "value": -0.2}]}
        }));
        match reply {
            AssistantReply::Chart(ChartPayload::Single { title, points }) => {
                assert_eq!(title, "Cement");
                assert_eq!(points[0].value, -0.2);
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn malformed_replies_are_silent() {
        assert_eq!(parse_assistant_reply(&json!({"answer": 1})), AssistantReply::NoOp);
        assert_eq!(parse_assistant_reply(&json!({"response": 42})), AssistantReply::NoOp);
        assert_eq!(parse_assistant_reply(&json!({"chartData": {"title": "x"}})), AssistantReply::NoOp);
        assert_eq!(parse_assistant_reply(&json!([])), AssistantReply::NoOp);
    }

    #[test]
    fn blank_prompt_skips_the_call() {
        let client = AssistantClient::new(Client::new(), "http://127.0.0.1:9");
        assert_eq!(client.ask("   ").unwrap(), AssistantReply::NoOp);
    }
}
