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

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    ChatInput, ChatStrategy, CommandStrategy, ExportStrategy, HistoryStrategy, InfoStrategy,
    InitStrategy, ResetStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "lingua")]
#[command(about = "English tutor with a persistent lesson history", long_about = None)]
struct Cli {
    /// Log lifecycle events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Converse with the tutor (default)
    Chat {
        /// Single message to send
        #[arg(short = 'm', long)]
        message: Option<String>,

        /// Model to use
        #[arg(short = 'M', long)]
        model: Option<String>,

        /// Maximum tokens per reply
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// Save the current lesson as PDF and MP3 without clearing it
    Export,
    /// Save the current lesson as PDF and MP3, then clear it
    Reset,
    /// Print the stored lesson
    History,
    /// Initialize configuration
    Init,
    /// Show effective configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the key may come from the real environment.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Commands::Chat {
        message: None,
        model: None,
        max_tokens: None,
    }) {
        Commands::Chat {
            message,
            model,
            max_tokens,
        } => {
            ChatStrategy
                .execute(ChatInput {
                    message,
                    model,
                    max_tokens,
                })
                .await
        }
        Commands::Export => ExportStrategy.execute(()).await,
        Commands::Reset => ResetStrategy.execute(()).await,
        Commands::History => HistoryStrategy.execute(()).await,
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
    }
}
