use lingua_config::{API_KEY_VAR, Config, mask_secret};

/// Strategy for displaying the effective configuration.
///
/// The API key is shown masked, and its absence is reported rather than
/// treated as an error.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== lingua Configuration ===\n");

        println!("Config file: {}", Config::default_path().display());
        println!();

        println!("API Key:");
        match lingua_config::api_key() {
            Ok(key) => println!("  {API_KEY_VAR}: {}", mask_secret(&key)),
            Err(_) => println!("  {API_KEY_VAR}: (not set)"),
        }
        println!();

        println!("Tutor:");
        println!("  Model: {}", config.tutor.model);
        println!("  Max Tokens: {}", config.tutor.max_tokens);
        println!("  Instruction: {}", truncate(&config.tutor.instruction, 60));
        println!();

        println!("Storage:");
        println!("  Database: {}", config.storage.database_path.display());
        println!("  Archive Dir: {}", config.storage.archive_dir.display());
        println!();

        println!("Narration:");
        println!("  Language: {}", config.narration.lang);
        println!("  Accent TLD: {}", config.narration.tld);
        println!();

        println!("HTTP:");
        println!("  Timeout: {}s", config.http.timeout_secs);
        println!("  Anthropic Base URL: {}", config.http.anthropic_base_url);

        Ok(())
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
