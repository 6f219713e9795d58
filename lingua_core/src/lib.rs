#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use seed::{SeedProvider, StaticSeed, TeacherSeed};

/// Format used for turn timestamps, matching ISO-8601 with microseconds.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => anyhow::bail!("unknown role: {other}"),
        }
    }
}

/// A role/content pair as sent to the response-generation capability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// A persisted dialogue turn. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Sequence position assigned by the store, starting at 1.
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub role: Role,
    pub content: String,
}

impl Turn {
    #[must_use]
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    #[must_use]
    pub fn to_message(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

/// Durable, append-only log of dialogue turns keyed by insertion order.
///
/// Implementations own a single connection for the lifetime of the process.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Ensure the schema exists. Safe to call on every startup.
    async fn initialize(&self) -> Result<()>;

    /// All persisted turns in ascending sequence order. Never injects a seed.
    async fn load_all(&self) -> Result<Vec<Turn>>;

    /// Persist one turn as a single atomic insert.
    async fn append(&self, role: Role, content: &str) -> Result<Turn>;

    /// Persist several turns in one transaction, all or nothing.
    async fn append_batch(&self, messages: &[ChatMessage]) -> Result<Vec<Turn>>;

    /// Destroy every turn and reset sequence positions to start at 1.
    ///
    /// On failure the previous rows are left untouched and readable.
    async fn clear_all(&self) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct LLMResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        model: &str,
        max_tokens: u32,
    ) -> anyhow::Result<LLMResponse>;
}

/// Language and accent selector for narration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Voice {
    pub lang: String,
    /// Regional variant, expressed as the top-level domain of the speech service.
    pub tld: String,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            tld: "co.uk".to_string(),
        }
    }
}

/// Text-to-speech capability producing one continuous MP3 stream.
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn narrate(&self, text: &str, voice: &Voice) -> anyhow::Result<Vec<u8>>;
}

#[async_trait]
impl<'a, T: MessageStore + ?Sized> MessageStore for &'a T {
    async fn initialize(&self) -> Result<()> {
        (**self).initialize().await
    }

    async fn load_all(&self) -> Result<Vec<Turn>> {
        (**self).load_all().await
    }

    async fn append(&self, role: Role, content: &str) -> Result<Turn> {
        (**self).append(role, content).await
    }

    async fn append_batch(&self, messages: &[ChatMessage]) -> Result<Vec<Turn>> {
        (**self).append_batch(messages).await
    }

    async fn clear_all(&self) -> Result<()> {
        (**self).clear_all().await
    }
}
