//! Types for the provider hosting the model. Everything this service talks to
//! today is an Ollama-style endpoint, but the trait seam in `clients::types`
//! keys off this enum so another provider can be slotted in later.

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize, Hash, PartialEq, Eq)]
pub enum LLMProvider {
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::Ollama => write!(f, "Ollama"),
        }
    }
}

impl LLMProvider {
    pub fn is_ollama(&self) -> bool {
        matches!(self, LLMProvider::Ollama)
    }
}
