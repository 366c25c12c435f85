//! Ollama client here so we can send requests to it. Only the non-streaming
//! `/api/generate` call is implemented, with the request timeout bounding how
//! long a caller can stay suspended on a hung endpoint.

use async_trait::async_trait;
use logging::new_client;
use std::time::Duration;
use tracing::{debug, error};

use super::types::LLMClient;
use super::types::LLMClientCompletionStringRequest;
use super::types::LLMClientError;

pub struct OllamaClient {
    client: reqwest_middleware::ClientWithMiddleware,
    base_url: String,
    request_timeout: Duration,
}

#[derive(serde::Deserialize, Debug, Clone)]
struct OllamaResponse {
    model: String,
    response: String,
}

#[derive(serde::Serialize, Debug, Clone)]
struct OllamaClientOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_ctx: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repetition_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Debug, serde::Serialize)]
struct OllamaClientRequest {
    prompt: String,
    model: String,
    stream: bool,
    options: OllamaClientOptions,
}

impl OllamaClientRequest {
    fn from_string_request(request: &LLMClientCompletionStringRequest) -> Self {
        Self {
            prompt: request.prompt().to_owned(),
            model: request.model().to_string(),
            stream: false,
            options: OllamaClientOptions {
                temperature: request.temperature(),
                num_ctx: request.num_ctx(),
                repetition_penalty: request.repetition_penalty(),
                num_predict: request.get_max_tokens(),
                stop: request.stop_words().map(|words| words.to_vec()),
            },
        }
    }
}

impl OllamaClient {
    pub fn new() -> Self {
        // ollama always runs on the following url:
        // http://localhost:11434/
        Self::with_base_url("http://localhost:11434".to_owned())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: new_client(),
            base_url,
            request_timeout: Duration::from_secs(60),
        }
    }

    /// Upper bound on one generation round trip. A hung endpoint surfaces as
    /// an error instead of suspending the caller forever.
    pub fn set_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn generation_endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    fn client(&self) -> &crate::provider::LLMProvider {
        &crate::provider::LLMProvider::Ollama
    }

    async fn prompt_completion(
        &self,
        request: LLMClientCompletionStringRequest,
    ) -> Result<String, LLMClientError> {
        let ollama_request = OllamaClientRequest::from_string_request(&request);
        debug!(
            "sending generation request for model {} to {}",
            ollama_request.model,
            self.generation_endpoint()
        );

        let response = self
            .client
            .post(self.generation_endpoint())
            .json(&ollama_request)
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| {
                error!("failed to reach the generation endpoint: {:?}", e);
                e
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            error!("unauthorized access to the generation endpoint");
            return Err(LLMClientError::UnauthorizedAccess);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            error!("generation endpoint rate limited us");
            return Err(LLMClientError::RateLimitExceeded);
        }
        if !status.is_success() {
            error!("generation endpoint returned status {}", status);
            return Err(LLMClientError::ModelUnavailable(status));
        }

        let body = response.bytes().await?;
        let value = match serde_json::from_slice::<OllamaResponse>(&body) {
            Ok(v) => v,
            Err(e) => {
                error!("failed to parse the generation response: {:?}", e);
                return Err(LLMClientError::SerdeError(e));
            }
        };
        debug!("model {} produced {} bytes", value.model, value.response.len());
        Ok(value.response)
    }
}

#[cfg(test)]
mod tests {
    use super::{LLMClientCompletionStringRequest, OllamaClientRequest};
    use crate::clients::types::LLMType;

    #[test]
    fn request_serializes_the_generation_wire_format() {
        let request = LLMClientCompletionStringRequest::new(
            LLMType::Qwen25Coder7B,
            "fn main() {".to_owned(),
            0.25,
            Some(1.5),
        )
        .set_stop_words(vec!["<|im_end|>".to_owned()])
        .set_max_tokens(100)
        .set_num_ctx(2048);
        let ollama_request = OllamaClientRequest::from_string_request(&request);
        let value = serde_json::to_value(&ollama_request).expect("to work");
        assert_eq!(
            value,
            serde_json::json!({
                "prompt": "fn main() {",
                "model": "qwen2.5-coder:7b",
                "stream": false,
                "options": {
                    "temperature": 0.25,
                    "num_ctx": 2048,
                    "repetition_penalty": 1.5,
                    "num_predict": 100,
                    "stop": ["<|im_end|>"],
                },
            })
        );
    }

    #[test]
    fn unset_options_stay_off_the_wire() {
        let request = LLMClientCompletionStringRequest::new(
            LLMType::Custom("starcoder2:3b".to_owned()),
            "hello".to_owned(),
            0.0,
            None,
        );
        let ollama_request = OllamaClientRequest::from_string_request(&request);
        let value = serde_json::to_value(&ollama_request).expect("to work");
        assert_eq!(
            value,
            serde_json::json!({
                "prompt": "hello",
                "model": "starcoder2:3b",
                "stream": false,
                "options": {
                    "temperature": 0.0,
                },
            })
        );
    }
}
