use llm_client::clients::types::LLMClientCompletionStringRequest;

use super::types::{FillInMiddleFormatter, FillInMiddleRequest};

const PREFIX_TOKEN: &str = "<PRE>";
const SUFFIX_TOKEN: &str = "<SUF>";
const MIDDLE_TOKEN: &str = "<MID>";
const END_OF_TURN: &str = "<EOT>";

const STRIP_TOKENS: &[&str] = &[PREFIX_TOKEN, SUFFIX_TOKEN, MIDDLE_TOKEN, END_OF_TURN];

pub struct CodeLlamaFillInMiddleFormatter;

impl CodeLlamaFillInMiddleFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl FillInMiddleFormatter for CodeLlamaFillInMiddleFormatter {
    fn fill_in_middle(&self, request: FillInMiddleRequest) -> LLMClientCompletionStringRequest {
        // infill variants of codellama take the bare token template, no chat
        // envelope
        let prefix = request.prefix();
        let suffix = request.suffix();
        let prompt = format!("{PREFIX_TOKEN} {prefix} {SUFFIX_TOKEN}{suffix} {MIDDLE_TOKEN}");
        let temperature = request.temperature();
        let completion_tokens = request.completion_tokens();
        let mut string_request =
            LLMClientCompletionStringRequest::new(request.llm().clone(), prompt, temperature, None)
                .set_stop_words(request.stop_words());
        if let Some(completion_tokens) = completion_tokens {
            string_request = string_request.set_max_tokens(completion_tokens);
        }
        string_request
    }

    fn strip_tokens(&self) -> &'static [&'static str] {
        STRIP_TOKENS
    }
}
