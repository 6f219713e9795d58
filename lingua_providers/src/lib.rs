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

//! HTTP-backed implementations of the external capabilities.

mod anthropic;
mod gtts;
pub mod retry;

pub use anthropic::AnthropicProvider;
pub use gtts::{GoogleTranslateNarrator, split_for_speech};
