use axum::{response::IntoResponse, Extension, Json};
use tracing::{error, info};

use crate::application::application::Application;
use crate::completion::types::{CompletionAgent, CompletionError};

use super::types::{json, ApiResponse, Error, Result};

#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct CompletionRequest {
    /// The document text with the cursor marker at the caret, possibly with
    /// further context files merged in ahead of it
    pub context_text: String,
    pub language_id: Option<String>,
    /// Extra context the editor wants ahead of the windowed prefix
    pub prefix: Option<String>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct CompletionResponse {
    pub text: String,
}

impl CompletionResponse {
    pub fn new(text: String) -> Self {
        Self { text }
    }
}

impl ApiResponse for CompletionResponse {}

pub async fn complete(
    Extension(app): Extension<Application>,
    Json(CompletionRequest {
        context_text,
        language_id,
        prefix,
    }): Json<CompletionRequest>,
) -> Result<impl IntoResponse> {
    info!(
        event_name = "inline_completion",
        language_id = language_id.as_deref().unwrap_or("unknown"),
        context_chars = context_text.chars().count(),
    );
    let gate = app.completion_gate.clone();
    let _guard = match gate.try_acquire() {
        Some(guard) => guard,
        None => {
            // a completion is already running, the editor just asks again
            // later instead of us queueing anything
            info!(event_name = "inline_completion.busy");
            return Ok(json(CompletionResponse::new("in process".to_owned())));
        }
    };

    let agent = CompletionAgent::new(
        app.llm_client.clone(),
        app.llm_type.clone(),
        app.fill_in_middle_broker.clone(),
        app.answer_models.clone(),
        app.config.clone(),
    );
    match agent.completion(context_text, prefix).await {
        Ok(text) => Ok(json(CompletionResponse::new(text))),
        Err(CompletionError::MissingCursorMarker) => Err(Error::user("Cursor marker missing.")),
        Err(err) => {
            error!(?err, "inline completion failed");
            Err(Error::internal("Failed to generate AI suggestion."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{complete, CompletionRequest};
    use crate::application::application::Application;
    use crate::application::config::configuration::Configuration;
    use crate::completion::state::CompletionGate;
    use async_trait::async_trait;
    use axum::body::HttpBody;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::{Extension, Json};
    use llm_client::clients::types::{
        LLMClient, LLMClientCompletionStringRequest, LLMClientError, LLMType,
    };
    use llm_client::provider::LLMProvider;
    use llm_prompts::answer_model::LLMAnswerModelBroker;
    use llm_prompts::fim::types::FillInMiddleBroker;
    use std::sync::Arc;

    struct CannedTestClient {
        tail: &'static str,
    }

    #[async_trait]
    impl LLMClient for CannedTestClient {
        fn client(&self) -> &LLMProvider {
            &LLMProvider::Ollama
        }

        async fn prompt_completion(
            &self,
            request: LLMClientCompletionStringRequest,
        ) -> Result<String, LLMClientError> {
            Ok(format!("{}{}", request.prompt(), self.tail))
        }
    }

    struct FailingTestClient;

    #[async_trait]
    impl LLMClient for FailingTestClient {
        fn client(&self) -> &LLMProvider {
            &LLMProvider::Ollama
        }

        async fn prompt_completion(
            &self,
            _request: LLMClientCompletionStringRequest,
        ) -> Result<String, LLMClientError> {
            Err(LLMClientError::UnauthorizedAccess)
        }
    }

    struct UnreachableTestClient;

    #[async_trait]
    impl LLMClient for UnreachableTestClient {
        fn client(&self) -> &LLMProvider {
            &LLMProvider::Ollama
        }

        async fn prompt_completion(
            &self,
            _request: LLMClientCompletionStringRequest,
        ) -> Result<String, LLMClientError> {
            panic!("the model must not be invoked while the gate is held");
        }
    }

    fn test_app(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Application {
        Application {
            config: Arc::new(Configuration::default()),
            llm_type: LLMType::Qwen25Coder7B,
            llm_client,
            fill_in_middle_broker: Arc::new(FillInMiddleBroker::new()),
            answer_models: Arc::new(LLMAnswerModelBroker::new()),
            completion_gate: Arc::new(CompletionGate::new()),
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            context_text: "fn add(a: i32, b: i32) -> i32 {\n<|cursor|>\n}".to_owned(),
            language_id: Some("rust".to_owned()),
            prefix: None,
        }
    }

    async fn body_json(mut response: axum::response::Response) -> serde_json::Value {
        let bytes = response
            .body_mut()
            .data()
            .await
            .expect("a body chunk")
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("valid json")
    }

    #[tokio::test]
    async fn a_completion_comes_back_as_text() {
        let app = test_app(Arc::new(CannedTestClient {
            tail: "a + b<|im_end|>",
        }));
        let result = complete(Extension(app.clone()), Json(request())).await;
        let response = result.expect("the completion to succeed").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"text": "a + b"})
        );
        assert!(!app.completion_gate.is_busy());
    }

    #[tokio::test]
    async fn a_missing_marker_is_a_bad_request() {
        let app = test_app(Arc::new(UnreachableTestClient));
        let result = complete(
            Extension(app),
            Json(CompletionRequest {
                context_text: "fn main() {}".to_owned(),
                language_id: None,
                prefix: None,
            }),
        )
        .await;
        let response = result.err().expect("a client error").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Cursor marker missing."})
        );
    }

    #[tokio::test]
    async fn a_model_failure_is_an_internal_error_with_a_fixed_message() {
        let app = test_app(Arc::new(FailingTestClient));
        let result = complete(Extension(app.clone()), Json(request())).await;
        let response = result.err().expect("an internal error").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Failed to generate AI suggestion."})
        );
        // the guard released on the failure path too
        assert!(!app.completion_gate.is_busy());
    }

    #[tokio::test]
    async fn a_held_gate_answers_in_process_without_touching_the_model() {
        let app = test_app(Arc::new(UnreachableTestClient));
        let gate = app.completion_gate.clone();
        let _held = gate.try_acquire().expect("gate to be idle");
        let result = complete(Extension(app), Json(request())).await;
        let response = result.expect("busy to be a plain 200").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"text": "in process"})
        );
    }

    #[tokio::test]
    async fn the_gate_reopens_for_the_request_after_the_busy_one() {
        let app = test_app(Arc::new(CannedTestClient {
            tail: "a + b<|im_end|>",
        }));
        {
            let gate = app.completion_gate.clone();
            let _held = gate.try_acquire().expect("gate to be idle");
            let result = complete(Extension(app.clone()), Json(request())).await;
            let response = result.expect("busy to be a plain 200").into_response();
            assert_eq!(
                body_json(response).await,
                serde_json::json!({"text": "in process"})
            );
        }
        let result = complete(Extension(app), Json(request())).await;
        let response = result.expect("the completion to succeed").into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"text": "a + b"})
        );
    }
}
