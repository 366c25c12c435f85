use std::sync::Arc;
use std::time::Instant;

use llm_client::clients::types::{LLMClient, LLMClientError, LLMType};
use llm_prompts::answer_model::LLMAnswerModelBroker;
use llm_prompts::fim::types::{FillInMiddleBroker, FillInMiddleError, FillInMiddleRequest};
use llm_prompts::sanitize::ResponseSanitizer;
use tracing::info;

use crate::application::config::configuration::Configuration;

use super::context::ContextWindower;

#[derive(thiserror::Error, Debug)]
pub enum CompletionError {
    #[error("No cursor marker in the completion context.")]
    MissingCursorMarker,

    #[error("LLM type {0} is not supported for inline completion.")]
    LLMNotSupported(LLMType),

    #[error("Fill in middle error: {0}")]
    FillInMiddleError(#[from] FillInMiddleError),

    #[error("LLMClient error: {0}")]
    LLMClientError(#[from] LLMClientError),
}

/// Runs one completion end to end: window the context around the cursor,
/// render the model family's prompt, call the endpoint once and sanitize
/// whatever comes back. Built per request from the application's shared
/// pieces.
pub struct CompletionAgent {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    llm_type: LLMType,
    fill_in_middle_broker: Arc<FillInMiddleBroker>,
    answer_mode: Arc<LLMAnswerModelBroker>,
    config: Arc<Configuration>,
}

impl CompletionAgent {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        llm_type: LLMType,
        fill_in_middle_broker: Arc<FillInMiddleBroker>,
        answer_mode: Arc<LLMAnswerModelBroker>,
        config: Arc<Configuration>,
    ) -> Self {
        Self {
            llm_client,
            llm_type,
            fill_in_middle_broker,
            answer_mode,
            config,
        }
    }

    pub async fn completion(
        &self,
        context_text: String,
        extra_prefix: Option<String>,
    ) -> Result<String, CompletionError> {
        let request_start = Instant::now();

        let windower = ContextWindower::new(
            self.config.cursor_marker.clone(),
            self.config.context_chars,
        );
        let windowed = windower.window(&context_text)?;
        // editor-provided extra context rides ahead of the windowed prefix
        // and does not count against the budget
        let prefix_content = match extra_prefix {
            Some(extra_prefix) => format!("{}\n{}", extra_prefix, windowed.prefix_content()),
            None => windowed.prefix_content().to_owned(),
        };
        let suffix_content = windowed.suffix_content().to_owned();

        let answer_model = self
            .answer_mode
            .get_answer_model(&self.llm_type)
            .ok_or_else(|| CompletionError::LLMNotSupported(self.llm_type.clone()))?;
        let stop_words = answer_model
            .get_stop_words_inline_completion()
            .unwrap_or_default();
        let completion_tokens = self
            .config
            .num_predict
            .or(answer_model.inline_completion_tokens);

        let fim_request = FillInMiddleRequest::new(
            prefix_content,
            suffix_content.clone(),
            self.llm_type.clone(),
            stop_words,
            completion_tokens,
            self.config.temperature,
        );
        let string_request = self
            .fill_in_middle_broker
            .format_context(fim_request, &self.llm_type)?
            .set_repetition_penalty(self.config.repetition_penalty)
            .set_num_ctx(self.config.num_ctx);
        let strip_tokens = self.fill_in_middle_broker.strip_tokens(&self.llm_type)?;
        let prompt = string_request.prompt().to_owned();

        let response = self.llm_client.prompt_completion(string_request).await?;

        let sanitizer = ResponseSanitizer::new(strip_tokens);
        let suggestion = sanitizer.sanitize(&response, &prompt, &suffix_content);
        info!(
            time_taken = ?request_start.elapsed(),
            suggestion_len = suggestion.len(),
            "inline completion generated"
        );
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use super::{CompletionAgent, CompletionError};
    use crate::application::config::configuration::Configuration;
    use async_trait::async_trait;
    use llm_client::clients::types::{
        LLMClient, LLMClientCompletionStringRequest, LLMClientError, LLMType,
    };
    use llm_client::provider::LLMProvider;
    use llm_prompts::answer_model::LLMAnswerModelBroker;
    use llm_prompts::fim::types::FillInMiddleBroker;
    use std::sync::{Arc, Mutex};

    /// Behaves like a chatty local model: echoes the whole prompt back and
    /// then keeps talking past the completion.
    struct EchoingTestClient {
        tail: &'static str,
    }

    #[async_trait]
    impl LLMClient for EchoingTestClient {
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

    struct RecordingTestClient {
        seen: Arc<Mutex<Option<LLMClientCompletionStringRequest>>>,
    }

    #[async_trait]
    impl LLMClient for RecordingTestClient {
        fn client(&self) -> &LLMProvider {
            &LLMProvider::Ollama
        }

        async fn prompt_completion(
            &self,
            request: LLMClientCompletionStringRequest,
        ) -> Result<String, LLMClientError> {
            *self.seen.lock().expect("lock to work") = Some(request);
            Ok("done".to_owned())
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
            panic!("the model must not be invoked for this request");
        }
    }

    fn agent(llm_client: Arc<dyn LLMClient + Send + Sync>) -> CompletionAgent {
        CompletionAgent::new(
            llm_client,
            LLMType::Qwen25Coder7B,
            Arc::new(FillInMiddleBroker::new()),
            Arc::new(LLMAnswerModelBroker::new()),
            Arc::new(Configuration::default()),
        )
    }

    #[tokio::test]
    async fn an_echoing_model_still_yields_a_clean_suggestion() {
        let agent = agent(Arc::new(EchoingTestClient {
            tail: "a + b<|im_end|>\nand here is why this works",
        }));
        let suggestion = agent
            .completion(
                "fn add(a: i32, b: i32) -> i32 {\n<|cursor|>\n}".to_owned(),
                None,
            )
            .await
            .expect("completion to succeed");
        assert_eq!(suggestion, "a + b");
    }

    #[tokio::test]
    async fn a_missing_marker_never_reaches_the_model() {
        let agent = agent(Arc::new(UnreachableTestClient));
        let result = agent.completion("fn main() {}".to_owned(), None).await;
        assert!(matches!(result, Err(CompletionError::MissingCursorMarker)));
    }

    #[tokio::test]
    async fn model_failures_surface_as_client_errors() {
        let agent = agent(Arc::new(FailingTestClient));
        let result = agent.completion("let x = <|cursor|>;".to_owned(), None).await;
        assert!(matches!(result, Err(CompletionError::LLMClientError(_))));
    }

    #[tokio::test]
    async fn generation_knobs_ride_along_with_the_prompt() {
        let seen = Arc::new(Mutex::new(None));
        let agent = agent(Arc::new(RecordingTestClient { seen: seen.clone() }));
        agent
            .completion(
                "use std::fmt;\nfn main() {\n<|cursor|>\n}".to_owned(),
                Some("// scratch buffer".to_owned()),
            )
            .await
            .expect("completion to succeed");
        let request = seen
            .lock()
            .expect("lock to work")
            .take()
            .expect("the model to have been invoked");
        assert!(request
            .prompt()
            .contains("// scratch buffer\nuse std::fmt;\nfn main() {"));
        assert_eq!(request.num_ctx(), Some(8192));
        assert_eq!(request.repetition_penalty(), Some(1.1));
        assert_eq!(request.get_max_tokens(), Some(500));
        let stop_words = request.stop_words().expect("stop words to be set");
        assert!(stop_words.contains(&"<|im_end|>".to_owned()));
    }
}
