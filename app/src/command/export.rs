use lingua_archive::ExportOutcome;
use lingua_config::Config;
use lingua_core::MessageStore;

use super::{build_exporter, open_store};

/// Strategy for archiving the stored lesson as PDF and MP3 without
/// clearing it.
#[derive(Debug, Clone, Copy)]
pub struct ExportStrategy;

impl super::CommandStrategy for ExportStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let store = open_store(&config).await?;
        let exporter = build_exporter(&config)?;

        let turns = store.load_all().await?;
        match exporter.export(&turns).await? {
            ExportOutcome::NothingToExport => println!("No conversation to save."),
            ExportOutcome::Archived(archive) => {
                println!("Saved {} turns:", archive.turns);
                println!("  {}", archive.document.display());
                println!("  {}", archive.audio.display());
            }
        }

        store.close().await?;
        Ok(())
    }
}
