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

//! Archive export: a paginated PDF transcript plus an MP3 narration,
//! both keyed by the export timestamp.

pub mod document;
mod exporter;

pub use document::{Line, Page, layout, render_pdf};
pub use exporter::{Archive, ArchiveExporter, ExportOutcome, archive_key, narration_script};
