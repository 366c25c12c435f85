use llm_client::clients::types::LLMClientCompletionStringRequest;

use super::types::{FillInMiddleFormatter, FillInMiddleRequest};

pub(crate) const FIM_PREFIX: &str = "<|fim_prefix|>";
pub(crate) const FIM_SUFFIX: &str = "<|fim_suffix|>";
pub(crate) const FIM_MIDDLE: &str = "<|fim_middle|>";
pub(crate) const TURN_START: &str = "<|im_start|>";
pub(crate) const TURN_END: &str = "<|im_end|>";
pub(crate) const END_OF_TEXT: &str = "<|endoftext|>";
pub(crate) const FILE_SEPARATOR: &str = "<|file_sep|>";
pub(crate) const TOOL_RESPONSE_CLOSE: &str = "</tool_response>";

const SYSTEM_INSTRUCTION: &str = r#"You are a code-completion engine. The user message contains code split around an insertion point: the text after the fim-prefix marker comes before the cursor and the text after the fim-suffix marker comes after it. Reply with only the code which belongs at the insertion point. Do not add explanations, do not repeat the surrounding code and do not wrap your reply in markdown fences."#;

// Order matters: each token is searched on the remainder left by the
// previous cut, and the role tokens have to go before the fim tokens so an
// echoed envelope is cut at its outermost marker.
const STRIP_TOKENS: &[&str] = &[
    TURN_END,
    TURN_START,
    FIM_PREFIX,
    FIM_SUFFIX,
    FIM_MIDDLE,
    END_OF_TEXT,
    TOOL_RESPONSE_CLOSE,
    FILE_SEPARATOR,
];

pub struct QwenFillInMiddleFormatter;

impl QwenFillInMiddleFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl FillInMiddleFormatter for QwenFillInMiddleFormatter {
    fn fill_in_middle(&self, request: FillInMiddleRequest) -> LLMClientCompletionStringRequest {
        // fim segment is
        // <|fim_prefix|>{prefix}<|fim_suffix|>{suffix}<|fim_middle|>
        // wrapped in a three-turn chat envelope whose assistant turn is left
        // open, so the model continues with the middle piece
        let prefix = request.prefix();
        let suffix = request.suffix();
        let fim_segment = format!("{FIM_PREFIX}{prefix}{FIM_SUFFIX}{suffix}{FIM_MIDDLE}");
        let prompt = format!(
            "{TURN_START}system\n{SYSTEM_INSTRUCTION}{TURN_END}\n{TURN_START}user\n{fim_segment}{TURN_END}\n{TURN_START}assistant\n"
        );
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

#[cfg(test)]
mod tests {
    use super::{FillInMiddleFormatter, QwenFillInMiddleFormatter};
    use crate::fim::types::FillInMiddleRequest;
    use llm_client::clients::types::LLMType;

    #[test]
    fn prompt_wraps_the_fim_segment_in_a_chat_envelope() {
        let formatter = QwenFillInMiddleFormatter::new();
        let request = FillInMiddleRequest::new(
            "fn add(a: i32, b: i32) -> i32 {\n    ".to_owned(),
            "\n}".to_owned(),
            LLMType::Qwen25Coder7B,
            vec!["<|im_end|>".to_owned()],
            Some(100),
            0.2,
        );
        let string_request = formatter.fill_in_middle(request);
        let expected = r#"<|im_start|>system
You are a code-completion engine. The user message contains code split around an insertion point: the text after the fim-prefix marker comes before the cursor and the text after the fim-suffix marker comes after it. Reply with only the code which belongs at the insertion point. Do not add explanations, do not repeat the surrounding code and do not wrap your reply in markdown fences.<|im_end|>
<|im_start|>user
<|fim_prefix|>fn add(a: i32, b: i32) -> i32 {
    <|fim_suffix|>
}<|fim_middle|><|im_end|>
<|im_start|>assistant
"#;
        assert_eq!(string_request.prompt(), expected);
        assert_eq!(string_request.get_max_tokens(), Some(100));
        assert_eq!(
            string_request.stop_words(),
            Some(&["<|im_end|>".to_owned()][..])
        );
    }
}
