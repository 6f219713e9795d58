#![warn(
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

//! Turn-by-turn tutoring conversation with durable history.
//!
//! # Key Features
//! - Write-through session: every turn reaches the store before it is
//!   visible in memory
//! - Seed pair injected when the store is empty
//! - Export-then-clear reset that never clears without a finished export

mod manager;
mod reset;
mod session;

pub use manager::{Command, TurnResult, TutorConfig, TutorLoop};
pub use reset::{ResetError, ResetReport, ResetTransaction};
pub use session::ConversationSession;
