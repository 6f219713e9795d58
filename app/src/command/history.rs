use lingua_config::Config;
use lingua_core::MessageStore;

use super::open_store;

/// Strategy for printing the stored lesson in sequence order.
#[derive(Debug, Clone, Copy)]
pub struct HistoryStrategy;

impl super::CommandStrategy for HistoryStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let store = open_store(&config).await?;

        let turns = store.load_all().await?;
        if turns.is_empty() {
            println!("No conversation stored yet.");
        }
        for turn in &turns {
            println!("{} - {}: {}", turn.timestamp_iso(), turn.role, turn.content);
        }

        store.close().await?;
        Ok(())
    }
}
