use async_trait::async_trait;
use lingua_core::{Narrator, Voice};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::retry::{RetryPolicy, is_transient, retry_with_backoff};

/// Longest text the speech endpoint accepts per request.
pub const MAX_CHUNK_CHARS: usize = 100;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// Narration through the Google Translate speech endpoint.
///
/// Text is sent in chunks and the MP3 segments are concatenated, which
/// plays back as one continuous stream.
pub struct GoogleTranslateNarrator {
    client: Client,
    retry: RetryPolicy,
}

impl GoogleTranslateNarrator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> anyhow::Result<Self> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        voice: &Voice,
        idx: usize,
        total: usize,
    ) -> anyhow::Result<Vec<u8>> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let bytes = self
            .client
            .get(format!("https://translate.google.{}/translate_tts", voice.tld))
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", voice.lang.as_str()),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

impl Default for GoogleTranslateNarrator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Narrator for GoogleTranslateNarrator {
    async fn narrate(&self, text: &str, voice: &Voice) -> anyhow::Result<Vec<u8>> {
        let chunks = split_for_speech(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("No speakable text");
        }

        info!(
            "Synthesizing narration: lang={}, tld={}, chunks={}",
            voice.lang,
            voice.tld,
            chunks.len()
        );

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let segment = retry_with_backoff(
                || self.fetch_chunk(chunk, voice, idx, chunks.len()),
                &self.retry,
                is_transient,
            )
            .await?;
            debug!("Chunk {}/{}: {} bytes", idx + 1, chunks.len(), segment.len());
            audio.extend_from_slice(&segment);
        }

        Ok(audio)
    }
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// whitespace. A single word longer than the limit is cut at the limit.
#[must_use]
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }

        let extra = if current.is_empty() {
            word.len()
        } else {
            word.len() + 1
        };
        if current_len + extra > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current_len += word.len();
        current.extend(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
