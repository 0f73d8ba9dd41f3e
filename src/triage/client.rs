use serde::{Deserialize, Serialize};

use super::TriageError;
use crate::config::AppConfig;

/// Completion backend behind the analysis client.
///
/// One outbound call per invocation, no retry. Implementations surface
/// a single failure to the caller, which decides whether to show a
/// user-facing error.
pub trait AnalyzeBackend {
    fn complete(&self, system: &str, user: &str) -> Result<String, TriageError>;
}

/// HTTP client for an OpenAI-compatible chat-completions endpoint.
///
/// The credential is injected through [`AppConfig`] rather than read
/// from process-wide state; a client without one rejects every call
/// with the same configuration error and never touches the network.
pub struct HttpAnalysisClient {
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl HttpAnalysisClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout_secs: config.request_timeout_secs,
            client,
        }
    }
}

/// Request body for POST {base_url}/chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl AnalyzeBackend for HttpAnalysisClient {
    fn complete(&self, system: &str, user: &str) -> Result<String, TriageError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(TriageError::MissingCredential)?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TriageError::Http(format!("request timed out after {}s", self.timeout_secs))
                } else {
                    TriageError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| TriageError::ResponseDecoding(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(TriageError::EmptyResponse)
    }
}

/// Mock backend for testing. Returns a configurable response or error.
pub struct MockBackend {
    response: Result<String, fn() -> TriageError>,
}

impl MockBackend {
    pub fn replying(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn failing(make_error: fn() -> TriageError) -> Self {
        Self {
            response: Err(make_error),
        }
    }
}

impl AnalyzeBackend for MockBackend {
    fn complete(&self, _system: &str, _user: &str) -> Result<String, TriageError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mock_backend_returns_configured_response() {
        let backend = MockBackend::replying("canned reply");
        assert_eq!(backend.complete("s", "u").unwrap(), "canned reply");
    }

    #[test]
    fn mock_backend_returns_configured_error() {
        let backend = MockBackend::failing(|| TriageError::EmptyResponse);
        assert!(matches!(
            backend.complete("s", "u"),
            Err(TriageError::EmptyResponse)
        ));
    }

    #[test]
    fn missing_credential_fails_before_any_network_call() {
        // Config without a key; the bogus URL proves no call is made.
        let mut config = AppConfig::for_tests(PathBuf::from("/tmp/medibot-test"));
        config.backend_url = "http://256.256.256.256".to_string();
        let client = HttpAnalysisClient::new(&config);

        let result = client.complete("system", "user");
        assert!(matches!(result, Err(TriageError::MissingCredential)));
    }

    #[test]
    fn client_trims_trailing_slash() {
        let mut config = AppConfig::for_tests(PathBuf::from("/tmp/medibot-test"));
        config.backend_url = "http://localhost:1234/".to_string();
        let client = HttpAnalysisClient::new(&config);
        assert_eq!(client.base_url, "http://localhost:1234");
    }
}
