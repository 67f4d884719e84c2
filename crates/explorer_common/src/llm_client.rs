//! HTTP model gateway.
//!
//! Talks to an OpenAI-compatible chat completions endpoint (OpenRouter by
//! default) with a blocking client. Every failure, including the per-call
//! deadline, is flattened into a `GatewayError`.

use crate::config::ModelConfig;
use anyhow::Result;
use explorer_shared::gateway::{GatewayRequest, GatewayResponse, ModelGateway};
use explorer_shared::GatewayError;
use std::time::Duration;

pub struct HttpGateway {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
}

impl HttpGateway {
    pub fn new(config: &ModelConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("edge-explorer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

/// Body of a single-turn chat completion request.
pub fn request_body(model: &str, request: &GatewayRequest) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            {"role": "user", "content": request.prompt},
        ],
        "max_tokens": request.max_output_tokens,
    })
}

/// Pull the assistant text out of a chat completion response.
pub fn parse_completion(response: &serde_json::Value) -> Result<String, GatewayError> {
    if let Some(error) = response.get("error") {
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string())
            .unwrap_or_else(|| error.to_string());
        return Err(GatewayError::new(format!("provider error: {}", message)));
    }

    let text = response
        .get("choices")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| GatewayError::new("response has no choices[0].message.content"))?;

    if text.trim().is_empty() {
        return Err(GatewayError::new("model returned an empty response"));
    }
    Ok(text.to_string())
}

impl ModelGateway for HttpGateway {
    fn complete(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        let mut builder = self
            .client
            .post(self.url())
            .timeout(Duration::from_secs(request.timeout_secs))
            .json(&request_body(&self.model, request));

        if let Some(api_key) = &self.api_key {
            builder = builder.bearer_auth(api_key);
        }

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                GatewayError::new(format!(
                    "request timed out after {} seconds",
                    request.timeout_secs
                ))
            } else {
                GatewayError::new(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(GatewayError::new(format!(
                "HTTP {} from {}: {}",
                status,
                self.endpoint,
                detail.trim()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .map_err(|e| GatewayError::new(format!("invalid JSON response: {}", e)))?;

        parse_completion(&json).map(|text| GatewayResponse { text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = GatewayRequest::new("hello", 800, 30);
        let body = request_body("deepseek/deepseek-r1", &request);
        assert_eq!(body["model"], "deepseek/deepseek-r1");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
        assert_eq!(body["max_tokens"], 800);
    }

    #[test]
    fn test_parse_completion_ok() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "An idea."}}]
        });
        assert_eq!(parse_completion(&json).unwrap(), "An idea.");
    }

    #[test]
    fn test_parse_completion_provider_error() {
        let json = serde_json::json!({"error": {"message": "Rate limit exceeded", "code": 429}});
        let err = parse_completion(&json).unwrap_err();
        assert_eq!(err.message, "provider error: Rate limit exceeded");
    }

    #[test]
    fn test_parse_completion_missing_or_empty() {
        assert!(parse_completion(&serde_json::json!({"choices": []})).is_err());
        let empty = serde_json::json!({"choices": [{"message": {"content": "   "}}]});
        assert!(parse_completion(&empty).is_err());
    }

    #[test]
    fn test_unreachable_endpoint_is_gateway_error() {
        let config = ModelConfig {
            endpoint: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 2,
            ..ModelConfig::default()
        };
        let gateway = HttpGateway::new(&config, None).unwrap();
        assert_eq!(gateway.url(), "http://127.0.0.1:9/chat/completions");

        let result = gateway.complete(&GatewayRequest::new("hi", 10, 2));
        assert!(result.is_err());
    }
}
