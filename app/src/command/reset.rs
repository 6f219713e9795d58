use lingua_config::Config;
use lingua_conversation::ResetTransaction;

use super::{build_exporter, open_store};

/// Strategy for the export-then-clear reset, outside the interactive loop.
#[derive(Debug, Clone, Copy)]
pub struct ResetStrategy;

impl super::CommandStrategy for ResetStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let store = open_store(&config).await?;
        let exporter = build_exporter(&config)?;

        let report = ResetTransaction::new(&store, &exporter).run().await?;
        match report.archive() {
            Some(archive) => println!(
                "Archived {} turns as {} and cleared the lesson.",
                report.turns_cleared, archive.key
            ),
            None => println!("No conversation to save. The lesson is already empty."),
        }

        store.close().await?;
        Ok(())
    }
}
