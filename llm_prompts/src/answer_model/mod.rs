//! Static metadata about the models we can run inline completions against.
//! The broker is the lookup table the webserver consults at boot to make sure
//! the configured model is one we actually know how to prompt.

use lazy_static::lazy_static;
use llm_client::clients::types::LLMType;
use std::collections::HashMap;

lazy_static! {
    pub static ref QWEN_CODER_STOP_WORDS: Vec<String> = vec![
        "<|im_end|>".to_owned(),
        "<|endoftext|>".to_owned(),
        "<|fim_prefix|>".to_owned(),
        "<|file_sep|>".to_owned(),
        "</tool_response>".to_owned(),
    ];
    pub static ref CODE_LLAMA_STOP_WORDS: Vec<String> = vec![
        "<PRE>".to_owned(),
        "<SUF>".to_owned(),
        "<MID>".to_owned(),
        "<EOT>".to_owned(),
    ];
}

#[derive(Debug, Clone)]
pub struct AnswerModel {
    pub llm_type: LLMType,
    /// Hard cap on the tokens a single inline completion may generate when
    /// the configuration does not pin one itself.
    pub inline_completion_tokens: Option<i64>,
}

impl AnswerModel {
    pub fn get_stop_words_inline_completion(&self) -> Option<Vec<String>> {
        if self.llm_type.is_qwen_coder() {
            Some(QWEN_CODER_STOP_WORDS.to_vec())
        } else if self.llm_type.is_code_llama() {
            Some(CODE_LLAMA_STOP_WORDS.to_vec())
        } else {
            None
        }
    }
}

pub const QWEN_25_CODER_7B: AnswerModel = AnswerModel {
    llm_type: LLMType::Qwen25Coder7B,
    inline_completion_tokens: Some(500),
};

pub const QWEN_25_CODER_1_5B: AnswerModel = AnswerModel {
    llm_type: LLMType::Qwen25Coder1_5B,
    inline_completion_tokens: Some(500),
};

pub const CODE_LLAMA_7B_INSTRUCT: AnswerModel = AnswerModel {
    llm_type: LLMType::CodeLlama7BInstruct,
    inline_completion_tokens: Some(512),
};

pub const CODE_LLAMA_13B_INSTRUCT: AnswerModel = AnswerModel {
    llm_type: LLMType::CodeLlama13BInstruct,
    inline_completion_tokens: Some(512),
};

pub struct LLMAnswerModelBroker {
    pub models: HashMap<LLMType, AnswerModel>,
}

impl LLMAnswerModelBroker {
    pub fn new() -> Self {
        let broker = Self {
            models: Default::default(),
        };
        broker
            .add_answer_model(QWEN_25_CODER_7B)
            .add_answer_model(QWEN_25_CODER_1_5B)
            .add_answer_model(CODE_LLAMA_7B_INSTRUCT)
            .add_answer_model(CODE_LLAMA_13B_INSTRUCT)
    }

    fn add_answer_model(mut self, model: AnswerModel) -> Self {
        self.models.insert(model.llm_type.clone(), model);
        self
    }

    pub fn get_answer_model(&self, llm_type: &LLMType) -> Option<AnswerModel> {
        self.models.get(llm_type).cloned()
    }
}
