//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy with its own input type, dispatched
//! statically from `main`.

use lingua_archive::ArchiveExporter;
use lingua_config::Config;
use lingua_providers::GoogleTranslateNarrator;
use lingua_store::SqliteMessageStore;
use std::time::Duration;
use tracing::info;

mod chat;
mod export;
mod history;
mod info;
mod init;
mod reset;
mod version;

pub use chat::{ChatInput, ChatStrategy};
pub use export::ExportStrategy;
pub use history::HistoryStrategy;
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use reset::ResetStrategy;
pub use version::VersionStrategy;

/// Open the lesson database named by the configuration, creating it if needed.
async fn open_store(config: &Config) -> anyhow::Result<SqliteMessageStore> {
    info!("Opening lesson store at {}", config.storage.database_path.display());
    Ok(SqliteMessageStore::open(&config.storage.database_path).await?)
}

/// Exporter writing into the configured archive directory with the
/// configured narration voice.
fn build_exporter(config: &Config) -> anyhow::Result<ArchiveExporter<GoogleTranslateNarrator>> {
    let narrator = GoogleTranslateNarrator::new()
        .with_timeout(Duration::from_secs(config.http.timeout_secs))?;
    Ok(ArchiveExporter::new(
        config.storage.archive_dir.clone(),
        narrator,
        config.narration.clone(),
    ))
}

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}
