//! Export-then-clear reset.
//!
//! Two steps with no persisted intermediate state:
//! 1. export a fresh load of the store through the [`ArchiveExporter`]
//! 2. clear the store
//!
//! Step 2 never runs unless step 1 finished.

use lingua_archive::{Archive, ArchiveExporter, ExportOutcome};
use lingua_core::{Error, MessageStore, Narrator};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ResetError {
    #[error("could not read the conversation to archive it: {0}")]
    Load(#[source] Error),

    #[error("archiving failed, conversation left intact: {0}")]
    Export(#[source] Error),

    /// The archive exists but the store could not be cleared. Needs manual
    /// recovery; not retried.
    #[error("archive written but clearing failed: {source}")]
    Clear {
        archive: Option<Archive>,
        #[source]
        source: Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetReport {
    pub export: ExportOutcome,
    pub turns_cleared: usize,
}

impl ResetReport {
    #[must_use]
    pub const fn archive(&self) -> Option<&Archive> {
        match &self.export {
            ExportOutcome::Archived(archive) => Some(archive),
            ExportOutcome::NothingToExport => None,
        }
    }
}

pub struct ResetTransaction<'a, S, N> {
    store: &'a S,
    exporter: &'a ArchiveExporter<N>,
}

impl<'a, S: MessageStore, N: Narrator> ResetTransaction<'a, S, N> {
    pub const fn new(store: &'a S, exporter: &'a ArchiveExporter<N>) -> Self {
        Self { store, exporter }
    }

    pub async fn run(&self) -> Result<ResetReport, ResetError> {
        let result = self.try_run().await;
        match &result {
            Ok(report) => info!(
                "All conversation data cleared successfully ({} turns)",
                report.turns_cleared
            ),
            Err(e) => debug!("Reset failed: {e}"),
        }
        result
    }

    async fn try_run(&self) -> Result<ResetReport, ResetError> {
        let turns = self.store.load_all().await.map_err(ResetError::Load)?;

        let export = self
            .exporter
            .export(&turns)
            .await
            .map_err(ResetError::Export)?;

        if let Err(source) = self.store.clear_all().await {
            let archive = match export {
                ExportOutcome::Archived(archive) => Some(archive),
                ExportOutcome::NothingToExport => None,
            };
            return Err(ResetError::Clear { archive, source });
        }

        Ok(ResetReport {
            export,
            turns_cleared: turns.len(),
        })
    }
}
