//! Tutoring conversation, resumed from the lesson store.

use lingua_config::Config;
use lingua_conversation::{TutorConfig, TutorLoop};
use lingua_providers::AnthropicProvider;
use std::time::Duration;
use tracing::info;

use super::{build_exporter, open_store};

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    /// Optional single message to send (non-interactive mode)
    pub message: Option<String>,
    /// Optional model override
    pub model: Option<String>,
    /// Optional reply length override
    pub max_tokens: Option<u32>,
}

/// Strategy for executing the Chat command.
///
/// The API key is checked before the store is opened, so a missing
/// credential leaves no database or archive directory behind.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let api_key = lingua_config::api_key()?;

        let provider = AnthropicProvider::new(api_key)
            .with_base_url(config.http.anthropic_base_url.clone())
            .with_timeout(Duration::from_secs(config.http.timeout_secs))?;

        let tutor_config = TutorConfig {
            model: input.model.unwrap_or_else(|| config.tutor.model.clone()),
            max_tokens: input.max_tokens.unwrap_or(config.tutor.max_tokens),
            ..TutorConfig::default()
        };

        let store = open_store(&config).await?;
        let exporter = build_exporter(&config)?;
        let mut tutor = TutorLoop::new(
            provider,
            store,
            exporter,
            Box::new(config.tutor.seed()),
            tutor_config,
        )
        .await?;

        info!(
            "Session resumed with {} messages",
            tutor.session().len()
        );

        if let Some(msg) = input.message {
            let result = tutor.process_turn(&msg).await?;
            println!("{}", result.response);
            if let Some(usage) = result.usage {
                info!(
                    "Turn {}: {} input tokens, {} output tokens",
                    result.turn_number, usage.input_tokens, usage.output_tokens
                );
            }
        } else {
            tutor.run_interactive().await?;
        }

        tutor.into_store().close().await?;
        Ok(())
    }
}
