use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Configuration {
    #[clap(short, long, default_value_os_t = default_data_dir())]
    #[serde(default = "default_data_dir")]
    /// Directory to store all persistent state
    pub data_dir: PathBuf,

    #[clap(long, default_value_t = default_port())]
    #[serde(default = "default_port")]
    /// Bind the webserver to `<port>`
    pub port: u16,

    #[clap(long, default_value_t = default_host())]
    #[serde(default = "default_host")]
    /// Bind the webserver to `<host>`
    pub host: String,

    #[clap(long, default_value_t = default_model())]
    #[serde(default = "default_model")]
    /// Model tag the completions run against, it has to be pulled on the
    /// generation endpoint already
    pub model: String,

    #[clap(long, default_value_t = default_model_endpoint())]
    #[serde(default = "default_model_endpoint")]
    /// Base url of the generation endpoint
    pub model_endpoint: String,

    #[clap(long, default_value_t = default_context_chars())]
    #[serde(default = "default_context_chars")]
    /// Character budget for the prefix plus suffix context around the cursor
    pub context_chars: usize,

    #[clap(long, default_value_t = default_num_ctx())]
    #[serde(default = "default_num_ctx")]
    /// Context window in tokens handed to the model
    pub num_ctx: usize,

    #[clap(long)]
    #[serde(default)]
    /// Cap on the tokens one completion may generate, falls back to the
    /// answer-model table when unset
    pub num_predict: Option<i64>,

    #[clap(long, default_value_t = default_temperature())]
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[clap(long, default_value_t = default_repetition_penalty())]
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,

    #[clap(long, default_value_t = default_request_timeout_secs())]
    #[serde(default = "default_request_timeout_secs")]
    /// Seconds before an outbound generation call is abandoned
    pub request_timeout_secs: u64,

    #[clap(long, default_value_t = default_cursor_marker())]
    #[serde(default = "default_cursor_marker")]
    /// Sentinel the editor inserts at the caret position
    pub cursor_marker: String,
}

impl Configuration {
    /// Directory where logs are written to
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: default_port(),
            host: default_host(),
            model: default_model(),
            model_endpoint: default_model_endpoint(),
            context_chars: default_context_chars(),
            num_ctx: default_num_ctx(),
            num_predict: None,
            temperature: default_temperature(),
            repetition_penalty: default_repetition_penalty(),
            request_timeout_secs: default_request_timeout_secs(),
            cursor_marker: default_cursor_marker(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    match directories::ProjectDirs::from("ai", "codestory", "ghostwriter") {
        Some(dirs) => dirs.data_dir().to_owned(),
        None => "ghostwriter".into(),
    }
}

fn default_port() -> u16 {
    8989
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_model() -> String {
    "qwen2.5-coder:7b".to_owned()
}

fn default_model_endpoint() -> String {
    "http://localhost:11434".to_owned()
}

fn default_context_chars() -> usize {
    8000
}

fn default_num_ctx() -> usize {
    8192
}

fn default_temperature() -> f32 {
    0.2
}

fn default_repetition_penalty() -> f32 {
    1.1
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_cursor_marker() -> String {
    "<|cursor|>".to_owned()
}
