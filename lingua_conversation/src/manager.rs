//! Tutor loop: the turn exchange and the interactive prompt around it.

use crate::reset::{ResetError, ResetReport, ResetTransaction};
use crate::session::ConversationSession;
use lingua_archive::ArchiveExporter;
use lingua_core::{Error, LLMProvider, MessageStore, Narrator, Result, SeedProvider, Usage};
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

/// Configuration for the tutor loop.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Ceiling on the length of each reply
    pub max_tokens: u32,
    /// Printed when the interactive loop starts
    pub greeting: String,
    /// Printed on `exit`
    pub farewell: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-sonnet-20240229".to_string(),
            max_tokens: 1000,
            greeting: "Hello! I'm your British English teacher. I'm here to help you practice English at an A1 level.".to_string(),
            farewell: "Well done today! Goodbye and keep practicing your English!".to_string(),
        }
    }
}

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Clear,
    Say(String),
    Empty,
}

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            Self::Empty
        } else if line.eq_ignore_ascii_case("exit") {
            Self::Exit
        } else if line.eq_ignore_ascii_case("clear") {
            Self::Clear
        } else {
            Self::Say(line.to_string())
        }
    }
}

/// Result of processing a conversation turn.
#[derive(Debug, Clone)]
pub struct TurnResult {
    /// Assistant's response
    pub response: String,
    pub usage: Option<Usage>,
    pub turn_number: usize,
}

pub struct TutorLoop<P, S, N> {
    provider: P,
    session: ConversationSession<S>,
    exporter: ArchiveExporter<N>,
    seed: Box<dyn SeedProvider>,
    config: TutorConfig,
}

impl<P, S, N> TutorLoop<P, S, N>
where
    P: LLMProvider,
    S: MessageStore,
    N: Narrator,
{
    pub async fn new(
        provider: P,
        store: S,
        exporter: ArchiveExporter<N>,
        seed: Box<dyn SeedProvider>,
        config: TutorConfig,
    ) -> Result<Self> {
        info!("Starting tutor loop with model {}", config.model);
        let session = ConversationSession::start(store, seed.as_ref()).await?;

        Ok(Self {
            provider,
            session,
            exporter,
            seed,
            config,
        })
    }

    /// Record the user's message, ask the model with the full history, and
    /// record the reply.
    ///
    /// If the model fails, the user's turn stays persisted and no reply is
    /// recorded.
    pub async fn process_turn(&mut self, user_input: &str) -> Result<TurnResult> {
        let turn = self.session.append_user(user_input).await?;
        let turn_number = self.session.len() / 2;
        debug!("Processing turn {turn_number} (row {})", turn.id);

        let response = self
            .provider
            .chat(
                self.session.messages(),
                &self.config.model,
                self.config.max_tokens,
            )
            .await
            .map_err(|e| Error::external("response generation", e))?;

        if response.content.trim().is_empty() {
            return Err(Error::external(
                "response generation",
                anyhow::anyhow!("empty response"),
            ));
        }

        self.session.append_assistant(&response.content).await?;

        Ok(TurnResult {
            response: response.content,
            usage: response.usage,
            turn_number,
        })
    }

    /// Archive, clear, and start over from the seed pair.
    ///
    /// The store is known to be empty once the clear succeeded, so the
    /// session restarts from the seed without reading it back.
    pub async fn reset(&mut self) -> std::result::Result<ResetReport, ResetError> {
        let report = ResetTransaction::new(self.session.store(), &self.exporter)
            .run()
            .await?;
        self.session.restart(self.seed.as_ref());
        Ok(report)
    }

    /// Interactive loop on stdin/stdout.
    pub async fn run_interactive(&mut self) -> anyhow::Result<()> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        self.run_with(stdin.lock(), stdout.lock()).await
    }

    /// Interactive loop over any line source. Ends on `exit` or end of input.
    pub async fn run_with<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> anyhow::Result<()> {
        writeln!(output, "{}", self.config.greeting)?;
        writeln!(
            output,
            "Type 'clear' to clear all conversation data, or 'exit' to end our lesson."
        )?;

        loop {
            write!(output, "Student: ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                info!("Input closed, ending session");
                break;
            }

            match Command::parse(&line) {
                Command::Empty => {}
                Command::Exit => {
                    writeln!(output, "Teacher: {}", self.config.farewell)?;
                    break;
                }
                Command::Clear => match self.reset().await {
                    Ok(report) => match report.archive() {
                        Some(archive) => {
                            writeln!(
                                output,
                                "Conversation saved to {} and {}",
                                archive.document.display(),
                                archive.audio.display()
                            )?;
                            writeln!(
                                output,
                                "Teacher: I've cleared our conversation history and saved it as PDF and MP3. Let's start fresh!"
                            )?;
                        }
                        None => {
                            writeln!(output, "No conversation to save.")?;
                            writeln!(
                                output,
                                "Teacher: There was nothing to clear yet. Let's start!"
                            )?;
                        }
                    },
                    Err(e) => writeln!(output, "An error occurred while clearing data: {e}")?,
                },
                Command::Say(text) => {
                    writeln!(output, "Teacher is typing...")?;
                    match self.process_turn(&text).await {
                        Ok(result) => {
                            writeln!(output, "Teacher: {}", result.response)?;
                        }
                        Err(e) => {
                            warn!("Turn failed: {e}");
                            writeln!(output, "Error: {e}")?;
                        }
                    }
                }
            }
        }

        info!(
            "Conversation ended: {} messages in history",
            self.session.len()
        );
        Ok(())
    }

    #[must_use]
    pub const fn session(&self) -> &ConversationSession<S> {
        &self.session
    }

    pub fn into_store(self) -> S {
        self.session.into_store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(Command::parse("EXIT\n"), Command::Exit);
        assert_eq!(Command::parse("  Clear "), Command::Clear);
        assert_eq!(Command::parse("\n"), Command::Empty);
        assert_eq!(
            Command::parse("I like tea.\n"),
            Command::Say("I like tea.".to_string())
        );
    }

    #[test]
    fn words_containing_commands_are_turns() {
        assert_eq!(
            Command::parse("exit the room"),
            Command::Say("exit the room".to_string())
        );
    }

    #[test]
    fn test_config_default() {
        let config = TutorConfig::default();
        assert_eq!(config.max_tokens, 1000);
        assert!(!config.model.is_empty());
    }
}
