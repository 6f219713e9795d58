use lingua_core::seed::{TEACHER_ACKNOWLEDGMENT, TEACHER_INSTRUCTION};
use lingua_core::{Error, Result, StaticSeed, Voice};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable holding the Anthropic API key.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub tutor: TutorSection,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub narration: Voice,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TutorSection {
    #[serde(default = "TutorSection::default_model")]
    pub model: String,
    #[serde(default = "TutorSection::default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "TutorSection::default_instruction")]
    pub instruction: String,
    #[serde(default = "TutorSection::default_acknowledgment")]
    pub acknowledgment: String,
}

impl Default for TutorSection {
    fn default() -> Self {
        Self {
            model: Self::default_model(),
            max_tokens: Self::default_max_tokens(),
            instruction: Self::default_instruction(),
            acknowledgment: Self::default_acknowledgment(),
        }
    }
}

impl TutorSection {
    fn default_model() -> String {
        "claude-3-sonnet-20240229".to_string()
    }

    const fn default_max_tokens() -> u32 {
        1000
    }

    fn default_instruction() -> String {
        TEACHER_INSTRUCTION.to_string()
    }

    fn default_acknowledgment() -> String {
        TEACHER_ACKNOWLEDGMENT.to_string()
    }

    #[must_use]
    pub fn seed(&self) -> StaticSeed {
        StaticSeed::new(self.instruction.clone(), self.acknowledgment.clone())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_database_path")]
    pub database_path: PathBuf,
    #[serde(default = "StorageConfig::default_archive_dir")]
    pub archive_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: Self::default_database_path(),
            archive_dir: Self::default_archive_dir(),
        }
    }
}

impl StorageConfig {
    fn default_database_path() -> PathBuf {
        data_dir().join("english_lessons.db")
    }

    fn default_archive_dir() -> PathBuf {
        data_dir().join("historic")
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "HttpConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "HttpConfig::default_anthropic_base_url")]
    pub anthropic_base_url: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout_secs(),
            anthropic_base_url: Self::default_anthropic_base_url(),
        }
    }
}

impl HttpConfig {
    const fn default_timeout_secs() -> u64 {
        120
    }

    fn default_anthropic_base_url() -> String {
        "https://api.anthropic.com".to_string()
    }
}

/// `~/lingua`, or the working directory when there is no home directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from("."), |home| home.join("lingua"))
}

impl Config {
    #[must_use]
    pub fn default_path() -> PathBuf {
        data_dir().join("config.json")
    }

    /// Load `~/lingua/config.json`. A missing file means all defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|e| {
            Error::configuration(format!("cannot read {}: {e}", config_path.display()))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!("invalid config {}: {e}", config_path.display()))
        })?;

        info!("Loaded config from {}", config_path.display());
        Ok(config)
    }

    pub fn create_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::default_path();
        Self::write_template(&config_path)?;
        Ok(config_path)
    }

    /// Write the default config as a starting point. Refuses to overwrite.
    pub fn write_template(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Config file already exists at: {}. Please edit it directly.",
                config_path.display()
            );
        }
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let template = serde_json::to_string_pretty(&Self::default())?;
        std::fs::write(config_path, template)?;
        Ok(())
    }
}

/// Read the API key from the process environment.
pub fn api_key() -> Result<String> {
    api_key_from(|name| std::env::var(name).ok())
}

pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    lookup(API_KEY_VAR)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            Error::configuration(format!(
                "{API_KEY_VAR} not found in the environment or .env file"
            ))
        })
}

/// Show only the first and last four characters of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"tutor": {"max_tokens": 2048}, "narration": {"lang": "en", "tld": "com"}}"#)
                .unwrap();

        assert_eq!(config.tutor.max_tokens, 2048);
        assert_eq!(config.tutor.model, "claude-3-sonnet-20240229");
        assert_eq!(config.narration.tld, "com");
        assert_eq!(config.http.timeout_secs, 120);
        assert!(config.storage.archive_dir.ends_with("historic"));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config.tutor.max_tokens, 1000);
        assert_eq!(config.narration, Voice::default());
    }

    #[test]
    fn template_round_trips_and_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        Config::write_template(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.tutor.instruction, TEACHER_INSTRUCTION);

        assert!(Config::write_template(&path).is_err());
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn missing_or_blank_key_is_fatal() {
        assert!(api_key_from(|_| None).unwrap_err().is_fatal());
        assert!(api_key_from(|_| Some("  ".to_string())).is_err());
        assert_eq!(
            api_key_from(|_| Some("sk-ant-123\n".to_string())).unwrap(),
            "sk-ant-123"
        );
    }

    #[test]
    fn secrets_are_masked() {
        assert_eq!(mask_secret("sk-ant-abcdef123456"), "sk-a...3456");
        assert_eq!(mask_secret("short"), "***");
    }
}
