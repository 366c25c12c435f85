// Core application state and how we boot it up.

use std::sync::Arc;
use std::time::Duration;

use llm_client::clients::ollama::OllamaClient;
use llm_client::clients::types::{LLMClient, LLMType};
use llm_prompts::{answer_model::LLMAnswerModelBroker, fim::types::FillInMiddleBroker};
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::completion::state::CompletionGate;

use super::{config::configuration::Configuration, logging::tracing::tracing_subscribe};

static LOGGER_INSTALLED: OnceCell<bool> = OnceCell::new();

#[derive(Clone)]
pub struct Application {
    // everything in here is handed to every request handler, hence the Arcs
    pub config: Arc<Configuration>,
    /// The model every completion runs against, resolved once at boot
    pub llm_type: LLMType,
    pub llm_client: Arc<dyn LLMClient + Send + Sync>,
    pub fill_in_middle_broker: Arc<FillInMiddleBroker>,
    pub answer_models: Arc<LLMAnswerModelBroker>,
    pub completion_gate: Arc<CompletionGate>,
}

impl Application {
    pub async fn initialize(config: Configuration) -> anyhow::Result<Self> {
        debug!(?config, "configuration after loading");
        let llm_type = LLMType::from_model_name(&config.model);
        let fill_in_middle_broker = Arc::new(FillInMiddleBroker::new());
        let answer_models = Arc::new(LLMAnswerModelBroker::new());
        // a model we cannot prompt should fail the boot, not every
        // completion request after it
        if !fill_in_middle_broker.supports(&llm_type) {
            anyhow::bail!("no fill-in-middle template registered for model {}", llm_type);
        }
        if answer_models.get_answer_model(&llm_type).is_none() {
            anyhow::bail!("no answer model entry for model {}", llm_type);
        }
        let llm_client = OllamaClient::with_base_url(config.model_endpoint.clone())
            .set_request_timeout(Duration::from_secs(config.request_timeout_secs));
        Ok(Self {
            config: Arc::new(config),
            llm_type,
            llm_client: Arc::new(llm_client),
            fill_in_middle_broker,
            answer_models,
            completion_gate: Arc::new(CompletionGate::new()),
        })
    }

    pub fn install_logging(config: &Configuration) {
        if LOGGER_INSTALLED.get().copied().unwrap_or(false) {
            return;
        }

        if !tracing_subscribe(config) {
            warn!("tracing_subscriber did not install, there is probably one already");
        }

        if color_eyre::install().is_err() {
            warn!("color-eyre did not install, a previous panic hook is still registered");
        }

        _ = LOGGER_INSTALLED.set(true);
    }
}
