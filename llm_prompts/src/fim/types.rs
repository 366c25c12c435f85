use std::collections::HashMap;

use llm_client::clients::types::{LLMClientCompletionStringRequest, LLMType};

use super::{codellama::CodeLlamaFillInMiddleFormatter, qwen::QwenFillInMiddleFormatter};

#[derive(thiserror::Error, Debug)]
pub enum FillInMiddleError {
    #[error("Unknown LLM type")]
    UnknownLLMType,
}

pub struct FillInMiddleRequest {
    prefix: String,
    suffix: String,
    llm_type: LLMType,
    stop_words: Vec<String>,
    completion_tokens: Option<i64>,
    temperature: f32,
}

impl FillInMiddleRequest {
    pub fn new(
        prefix: String,
        suffix: String,
        llm_type: LLMType,
        stop_words: Vec<String>,
        completion_tokens: Option<i64>,
        temperature: f32,
    ) -> Self {
        Self {
            prefix,
            suffix,
            llm_type,
            stop_words,
            completion_tokens,
            temperature,
        }
    }

    pub fn llm(&self) -> &LLMType {
        &self.llm_type
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn stop_words(self) -> Vec<String> {
        self.stop_words
    }

    pub fn completion_tokens(&self) -> Option<usize> {
        self.completion_tokens.map(|tokens| tokens as usize)
    }
}

/// One model family's prompt template. `fill_in_middle` renders the exact
/// string the model expects around the prefix/suffix pair and
/// `strip_tokens` is the ordered list of control tokens the sanitizer cuts
/// the response at. A family's formatter owns both sides of that contract.
pub trait FillInMiddleFormatter {
    fn fill_in_middle(&self, request: FillInMiddleRequest) -> LLMClientCompletionStringRequest;

    fn strip_tokens(&self) -> &'static [&'static str];
}

pub struct FillInMiddleBroker {
    providers: HashMap<LLMType, Box<dyn FillInMiddleFormatter + Send + Sync>>,
}

impl FillInMiddleBroker {
    pub fn new() -> Self {
        let broker = Self {
            providers: HashMap::new(),
        };
        broker
            .add_llm(
                LLMType::Qwen25Coder7B,
                Box::new(QwenFillInMiddleFormatter::new()),
            )
            .add_llm(
                LLMType::Qwen25Coder1_5B,
                Box::new(QwenFillInMiddleFormatter::new()),
            )
            .add_llm(
                LLMType::CodeLlama7BInstruct,
                Box::new(CodeLlamaFillInMiddleFormatter::new()),
            )
            .add_llm(
                LLMType::CodeLlama13BInstruct,
                Box::new(CodeLlamaFillInMiddleFormatter::new()),
            )
    }

    fn add_llm(
        mut self,
        llm_type: LLMType,
        formatter: Box<dyn FillInMiddleFormatter + Send + Sync>,
    ) -> Self {
        self.providers.insert(llm_type, formatter);
        self
    }

    pub fn supports(&self, model: &LLMType) -> bool {
        self.providers.contains_key(model)
    }

    pub fn format_context(
        &self,
        request: FillInMiddleRequest,
        model: &LLMType,
    ) -> Result<LLMClientCompletionStringRequest, FillInMiddleError> {
        let formatter = self
            .providers
            .get(model)
            .ok_or(FillInMiddleError::UnknownLLMType)?;
        Ok(formatter.fill_in_middle(request))
    }

    pub fn strip_tokens(
        &self,
        model: &LLMType,
    ) -> Result<&'static [&'static str], FillInMiddleError> {
        let formatter = self
            .providers
            .get(model)
            .ok_or(FillInMiddleError::UnknownLLMType)?;
        Ok(formatter.strip_tokens())
    }
}
