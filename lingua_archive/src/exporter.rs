use chrono::NaiveDateTime;
use lingua_core::{Error, Narrator, Result, Turn, Voice};
use std::path::PathBuf;
use tracing::info;

use crate::document::{layout, render_pdf};

pub const DOCUMENT_EXTENSION: &str = "pdf";
pub const AUDIO_EXTENSION: &str = "mp3";

/// Paths of one export. Both files share `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub key: String,
    pub document: PathBuf,
    pub audio: PathBuf,
    pub turns: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The conversation was empty; nothing was written.
    NothingToExport,
    Archived(Archive),
}

/// `YYYYMMDDHHMMSS`. Two exports within one second share a key.
#[must_use]
pub fn archive_key(at: NaiveDateTime) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}

/// The conversation as `role: content` lines, in order.
#[must_use]
pub fn narration_script(turns: &[Turn]) -> String {
    turns.iter().fold(String::new(), |mut script, turn| {
        script.push_str(turn.role.as_str());
        script.push_str(": ");
        script.push_str(&turn.content);
        script.push('\n');
        script
    })
}

/// Writes a PDF transcript and an MP3 narration of a conversation.
///
/// The two artifacts are not written transactionally: if narration fails
/// after the document was written, the document stays on disk.
pub struct ArchiveExporter<N> {
    archive_dir: PathBuf,
    narrator: N,
    voice: Voice,
}

impl<N: Narrator> ArchiveExporter<N> {
    pub fn new(archive_dir: impl Into<PathBuf>, narrator: N, voice: Voice) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            narrator,
            voice,
        }
    }

    #[must_use]
    pub const fn narrator(&self) -> &N {
        &self.narrator
    }

    /// Export keyed by the current local time.
    pub async fn export(&self, turns: &[Turn]) -> Result<ExportOutcome> {
        let key = archive_key(chrono::Local::now().naive_local());
        self.export_with_key(turns, &key).await
    }

    pub async fn export_with_key(&self, turns: &[Turn], key: &str) -> Result<ExportOutcome> {
        if turns.is_empty() {
            info!("No conversation to save.");
            return Ok(ExportOutcome::NothingToExport);
        }

        tokio::fs::create_dir_all(&self.archive_dir)
            .await
            .map_err(|e| Error::export("create archive directory", e))?;

        let document = self
            .archive_dir
            .join(format!("{key}.{DOCUMENT_EXTENSION}"));
        let audio = self.archive_dir.join(format!("{key}.{AUDIO_EXTENSION}"));

        let pdf = render_pdf(&layout(turns)).map_err(|e| Error::export("render document", e))?;
        tokio::fs::write(&document, pdf)
            .await
            .map_err(|e| Error::export("write document", e))?;

        let mp3 = self
            .narrator
            .narrate(&narration_script(turns), &self.voice)
            .await
            .map_err(|e| Error::export("synthesize narration", e))?;
        tokio::fs::write(&audio, mp3)
            .await
            .map_err(|e| Error::export("write audio", e))?;

        info!(
            "Conversation saved to {} and {}",
            document.display(),
            audio.display()
        );

        Ok(ExportOutcome::Archived(Archive {
            key: key.to_string(),
            document,
            audio,
            turns: turns.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingua_core::Role;

    #[test]
    fn key_has_second_granularity() {
        let at = NaiveDateTime::parse_from_str("2024-12-31 23:59:58.750", "%Y-%m-%d %H:%M:%S%.3f")
            .unwrap();
        assert_eq!(archive_key(at), "20241231235958");
    }

    #[test]
    fn script_is_role_prefixed_lines() {
        let ts = NaiveDateTime::default();
        let turns = [
            Turn {
                id: 1,
                timestamp: ts,
                role: Role::User,
                content: "Hello".to_string(),
            },
            Turn {
                id: 2,
                timestamp: ts,
                role: Role::Assistant,
                content: "Hi there!".to_string(),
            },
        ];
        assert_eq!(
            narration_script(&turns),
            "user: Hello\nassistant: Hi there!\n"
        );
    }
}
