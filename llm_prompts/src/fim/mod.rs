pub mod codellama;
pub mod qwen;
pub mod types;
