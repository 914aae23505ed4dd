//! Generative responder client.
//!
//! The responder is an opaque collaborator: it gets the user message, the
//! retrieved context window, the selected vehicles and the user's name, and
//! returns text. The HTTP implementation talks to an Ollama-style generation
//! server. No retries; a failure here fails the turn.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::config::GeneratorConfig;
use crate::error::{AppError, Result};
use crate::models::vehicle::Vehicle;
use crate::services::retrieval::ContextItem;

/// How many of the top-ranked context items the prompt folds in
const PROMPT_CONTEXT_ITEMS: usize = 3;

/// Generative responder trait
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Responder: Send + Sync {
    /// Produce the reply for one turn
    async fn generate(
        &self,
        message: &str,
        context: &[ContextItem],
        selected: &[Vehicle],
        user_name: &str,
    ) -> Result<String>;
}

/// HTTP responder against an Ollama-style generation endpoint
pub struct HttpResponder {
    client: reqwest::Client,
    config: GeneratorConfig,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl HttpResponder {
    /// Build a responder with the configured endpoint and timeout
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| AppError::Generation(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Responder for HttpResponder {
    async fn generate(
        &self,
        message: &str,
        context: &[ContextItem],
        selected: &[Vehicle],
        user_name: &str,
    ) -> Result<String> {
        let prompt = build_prompt(message, context, selected, user_name);
        let url = format!("{}/api/generate", self.config.url.trim_end_matches('/'));

        tracing::debug!("generating response via {} ({})", url, self.config.model);

        let request = GenerateRequest {
            model: &self.config.model,
            prompt: &prompt,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Generation(format!(
                "generation server returned {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(e.to_string()))?;

        Ok(body.response)
    }
}

/// Assemble the responder prompt for one turn.
///
/// The context section carries the top [`PROMPT_CONTEXT_ITEMS`] interactions,
/// highest relevance first.
pub fn build_prompt(
    message: &str,
    context: &[ContextItem],
    selected: &[Vehicle],
    user_name: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are Grace, a friendly and knowledgeable car sales manager assisting customers \
         of a vehicle showroom. You maintain conversation continuity and remember previous \
         interactions with customers.\n\n",
    );
    prompt.push_str(&format!("Customer name: {}\n\n", user_name));

    prompt.push_str("Previous conversation context (if any):\n");
    if context.is_empty() {
        prompt.push_str("No previous conversation history\n");
    } else {
        for item in context.iter().take(PROMPT_CONTEXT_ITEMS) {
            prompt.push_str(&format!(
                "Previous interaction ({}):\n",
                item.timestamp.format("%Y-%m-%d %H:%M")
            ));
            prompt.push_str(&format!("Customer: {}\n", item.message));
            if let Some(response) = &item.response {
                prompt.push_str(&format!("Your response: {}\n", response));
            }
            if !item.vehicles_mentioned.is_empty() {
                prompt.push_str(&format!(
                    "Cars discussed: {}\n",
                    item.vehicles_mentioned.join(", ")
                ));
            }
            prompt.push_str(&format!("Intent: {}\n\n", item.intent));
        }
    }

    prompt.push_str("\nSelected cars for this conversation:\n");
    if selected.is_empty() {
        prompt.push_str("No cars specifically selected for this conversation\n");
    } else {
        for vehicle in selected {
            match vehicle.base_msrp_usd {
                Some(price) => prompt.push_str(&format!(
                    "- {} (${} USD)\n",
                    vehicle.display_name(),
                    price
                )),
                None => prompt.push_str(&format!("- {}\n", vehicle.display_name())),
            }
        }
    }

    prompt.push_str(&format!("\nCurrent customer question:\n{}\n\n", message));
    prompt.push_str(
        "Reference previous conversations naturally when relevant, keep the response \
         conversational and helpful, and encourage further interaction.\n",
    );

    prompt
}

/// Create the HTTP responder
pub fn create_responder(config: GeneratorConfig) -> Result<Box<dyn Responder>> {
    Ok(Box::new(HttpResponder::new(config)?))
}
