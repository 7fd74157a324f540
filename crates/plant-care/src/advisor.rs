use std::sync::Arc;

use llm_common::anthropic::{Message, MessagesRequest};
use llm_common::TextGenerator;
use tracing::{info, warn};

use crate::config::AdvisorConfig;
use crate::error::AppError;

pub const SYSTEM_INSTRUCTION: &str = "Use the information about the plant in the prompt to give tips on plant care, specifically water, soil and any other information";

/// Turns a located snippet into care instructions through the generative-text backend.
#[derive(Clone)]
pub struct CareAdvisor {
    generator: Arc<dyn TextGenerator>,
    config: AdvisorConfig,
}

impl CareAdvisor {
    pub fn new(generator: Arc<dyn TextGenerator>, config: AdvisorConfig) -> Self {
        Self { generator, config }
    }

    pub fn build_request(&self, plant_name: &str, snippet: &str) -> MessagesRequest {
        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(SYSTEM_INSTRUCTION.to_string()),
            messages: vec![Message::user(build_prompt(plant_name, snippet))],
        }
    }

    /// One request, no retry. Any failure, including a reply without text, is an
    /// `ExternalService` error.
    pub async fn advise(&self, plant_name: &str, snippet: &str) -> Result<String, AppError> {
        let request = self.build_request(plant_name, snippet);
        let response = self
            .generator
            .create_message(request)
            .await
            .inspect_err(|e| warn!(error = %e, plant = plant_name, "care model request failed"))?;

        if let Some(usage) = &response.usage {
            info!(
                model = %self.config.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "care model replied"
            );
        }

        response
            .first_text()
            .map(|t| t.to_string())
            .ok_or_else(|| {
                AppError::ExternalService("response contained no text segment".to_string())
            })
    }
}

pub fn build_prompt(plant_name: &str, snippet: &str) -> String {
    format!(
        "I have the following information about the plant {plant_name}:\n\n{snippet}\n\n\
Please provide detailed care instructions based on this information."
    )
}
