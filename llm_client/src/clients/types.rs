use async_trait::async_trait;
use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;
use thiserror::Error;

use crate::provider::LLMProvider;

/// The model families the completion service knows how to prompt. Anything
/// else arrives as `Custom` carrying the raw model tag.
#[derive(Debug, Clone, PartialEq, Hash, Eq)]
pub enum LLMType {
    /// Qwen2.5-Coder 7B model
    Qwen25Coder7B,
    /// Qwen2.5-Coder 1.5B model
    Qwen25Coder1_5B,
    /// CodeLlama 7B model
    CodeLlama7BInstruct,
    /// CodeLlama 13B model
    CodeLlama13BInstruct,
    /// Custom model type with a specified tag
    Custom(String),
}

impl LLMType {
    /// Maps a model tag the way the generation endpoint spells it. Unknown
    /// tags are preserved as `Custom` so they can still be surfaced in
    /// errors and logs.
    pub fn from_model_name(name: &str) -> LLMType {
        match name {
            "qwen2.5-coder:7b" => LLMType::Qwen25Coder7B,
            "qwen2.5-coder:1.5b" => LLMType::Qwen25Coder1_5B,
            "codellama:7b" => LLMType::CodeLlama7BInstruct,
            "codellama:13b" => LLMType::CodeLlama13BInstruct,
            _ => LLMType::Custom(name.to_owned()),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, LLMType::Custom(_))
    }

    pub fn is_qwen_coder(&self) -> bool {
        matches!(self, LLMType::Qwen25Coder7B | LLMType::Qwen25Coder1_5B)
    }

    pub fn is_code_llama(&self) -> bool {
        matches!(
            self,
            LLMType::CodeLlama7BInstruct | LLMType::CodeLlama13BInstruct
        )
    }
}

impl Serialize for LLMType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            LLMType::Custom(s) => serializer.serialize_str(s),
            _ => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for LLMType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LLMTypeVisitor;

        impl<'de> Visitor<'de> for LLMTypeVisitor {
            type Value = LLMType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string representing an LLMType")
            }

            fn visit_str<E>(self, value: &str) -> Result<LLMType, E>
            where
                E: de::Error,
            {
                Ok(LLMType::from_model_name(value))
            }
        }

        deserializer.deserialize_string(LLMTypeVisitor)
    }
}

impl fmt::Display for LLMType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMType::Qwen25Coder7B => write!(f, "qwen2.5-coder:7b"),
            LLMType::Qwen25Coder1_5B => write!(f, "qwen2.5-coder:1.5b"),
            LLMType::CodeLlama7BInstruct => write!(f, "codellama:7b"),
            LLMType::CodeLlama13BInstruct => write!(f, "codellama:13b"),
            LLMType::Custom(s) => write!(f, "{}", s),
        }
    }
}

/// A fully rendered prompt plus the generation knobs which ride along with it
/// to the endpoint. The formatter producing the prompt fills in temperature
/// and stop words; the caller layers on the endpoint-level options.
#[derive(Clone)]
pub struct LLMClientCompletionStringRequest {
    model: LLMType,
    prompt: String,
    temperature: f32,
    repetition_penalty: Option<f32>,
    stop_words: Option<Vec<String>>,
    max_tokens: Option<usize>,
    num_ctx: Option<usize>,
}

impl LLMClientCompletionStringRequest {
    pub fn new(
        model: LLMType,
        prompt: String,
        temperature: f32,
        repetition_penalty: Option<f32>,
    ) -> Self {
        Self {
            model,
            prompt,
            temperature,
            repetition_penalty,
            stop_words: None,
            max_tokens: None,
            num_ctx: None,
        }
    }

    pub fn set_stop_words(mut self, stop_words: Vec<String>) -> Self {
        self.stop_words = Some(stop_words);
        self
    }

    pub fn set_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn set_repetition_penalty(mut self, repetition_penalty: f32) -> Self {
        self.repetition_penalty = Some(repetition_penalty);
        self
    }

    pub fn set_num_ctx(mut self, num_ctx: usize) -> Self {
        self.num_ctx = Some(num_ctx);
        self
    }

    pub fn model(&self) -> &LLMType {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn repetition_penalty(&self) -> Option<f32> {
        self.repetition_penalty
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn stop_words(&self) -> Option<&[String]> {
        self.stop_words.as_deref()
    }

    pub fn get_max_tokens(&self) -> Option<usize> {
        self.max_tokens
    }

    pub fn num_ctx(&self) -> Option<usize> {
        self.num_ctx
    }
}

#[derive(Error, Debug)]
pub enum LLMClientError {
    #[error("Reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("ReqwestMiddlewareError error: {0}")]
    ReqwestMiddlewareError(#[from] reqwest_middleware::Error),

    #[error("serde failed: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("model endpoint returned status {0}")]
    ModelUnavailable(reqwest::StatusCode),

    #[error("Unauthorized access to API")]
    UnauthorizedAccess,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

#[async_trait]
pub trait LLMClient {
    fn client(&self) -> &LLMProvider;

    /// Sends a rendered prompt to the endpoint and returns the raw generated
    /// text in one shot. There is no streaming variant, every caller wants
    /// the whole suggestion before it touches the editor.
    async fn prompt_completion(
        &self,
        request: LLMClientCompletionStringRequest,
    ) -> Result<String, LLMClientError>;
}
