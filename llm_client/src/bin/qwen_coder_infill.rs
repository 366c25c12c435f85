use llm_client::clients::{
    ollama::OllamaClient,
    types::{LLMClient, LLMClientCompletionStringRequest, LLMType},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = OllamaClient::new();
    let prompt = r#"<|fim_prefix|>fn factorial(n: u64) -> u64 {
    if n == 0 {
        return 1;
    }
    <|fim_suffix|>
}
<|fim_middle|>"#;
    let request = LLMClientCompletionStringRequest::new(
        LLMType::Qwen25Coder7B,
        prompt.to_owned(),
        0.2,
        None,
    )
    .set_stop_words(vec!["<|endoftext|>".to_owned(), "<|fim_prefix|>".to_owned()])
    .set_max_tokens(100);
    let response = client.prompt_completion(request).await?;
    println!("{}", response);
    Ok(())
}
