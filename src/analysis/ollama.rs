//! HTTP client for a local Ollama instance.

use serde::{Deserialize, Serialize};

use super::{AnalysisError, TextGenerator};
use crate::config;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new client pointing at an Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default local instance with the standard analysis timeout.
    pub fn default_local() -> Self {
        Self::new(config::DEFAULT_OLLAMA_URL, config::DEFAULT_OLLAMA_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> AnalysisError {
        if e.is_connect() {
            AnalysisError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            AnalysisError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            AnalysisError::Http(e.to_string())
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Error payload returned on non-success statuses.
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

impl TextGenerator for OllamaClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, AnalysisError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            if status.as_u16() == 404 {
                return Err(AnalysisError::ModelNotFound {
                    model: model.to_string(),
                });
            }
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| AnalysisError::ResponseParsing(e.to_string()))?;

        Ok(parsed.response)
    }

    fn list_models(&self) -> Result<Vec<String>, AnalysisError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            return Err(AnalysisError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TagsResponse = response
            .json()
            .map_err(|e| AnalysisError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock generator for tests: configurable response, records prompts.
pub struct MockGenerator {
    response: Result<String, ()>,
    available_models: Vec<String>,
    prompts: std::cell::RefCell<Vec<String>>,
}

impl MockGenerator {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            available_models: vec!["llama3:latest".to_string()],
            prompts: std::cell::RefCell::new(Vec::new()),
        }
    }

    /// A generator whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            response: Err(()),
            available_models: Vec::new(),
            prompts: std::cell::RefCell::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, _model: &str, prompt: &str) -> Result<String, AnalysisError> {
        match &self.response {
            Ok(text) => {
                self.prompts.borrow_mut().push(prompt.to_string());
                Ok(text.clone())
            }
            Err(()) => Err(AnalysisError::Connection("http://localhost:11434".into())),
        }
    }

    fn list_models(&self) -> Result<Vec<String>, AnalysisError> {
        Ok(self.available_models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_response() {
        let client = MockGenerator::new("réponse de test");
        let result = client.generate("llama3", "prompt").unwrap();
        assert_eq!(result, "réponse de test");
        assert_eq!(client.prompts(), vec!["prompt".to_string()]);
    }

    #[test]
    fn mock_model_availability_uses_prefix_match() {
        let client = MockGenerator::new("").with_models(vec![
            "llama3:latest".into(),
            "mistral:7b".into(),
        ]);
        assert!(client.is_model_available("llama3").unwrap());
        assert!(client.is_model_available("mistral").unwrap());
        assert!(!client.is_model_available("medgemma").unwrap());
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60);
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn default_local_uses_standard_port() {
        let client = OllamaClient::default_local();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.timeout_secs, 300);
    }

    #[test]
    fn generate_request_serializes_per_wire_contract() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "Analyse cette séance",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llama3",
                "prompt": "Analyse cette séance",
                "stream": false
            })
        );
    }

    #[test]
    fn error_payload_parses_error_field() {
        let parsed: ErrorResponse =
            serde_json::from_str(r#"{"error": "model 'x' not found"}"#).unwrap();
        assert_eq!(parsed.error, "model 'x' not found");
    }
}
