use crate::error::{Result, SubtransError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Format of an input subtitle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Vtt,
    Srt,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Vtt => write!(f, "vtt"),
            SourceFormat::Srt => write!(f, "srt"),
        }
    }
}

impl std::str::FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vtt" => Ok(SourceFormat::Vtt),
            "srt" => Ok(SourceFormat::Srt),
            _ => Err(format!("Unknown source format: {}. Use 'vtt' or 'srt'", s)),
        }
    }
}

impl SourceFormat {
    /// Guess the format from a file extension, defaulting to VTT.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "srt" => SourceFormat::Srt,
            _ => SourceFormat::Vtt,
        }
    }
}

/// Format for displayed or exported subtitles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Vtt,
    Srt,
    Txt,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Vtt => write!(f, "vtt"),
            OutputFormat::Srt => write!(f, "srt"),
            OutputFormat::Txt => write!(f, "txt"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vtt" => Ok(OutputFormat::Vtt),
            "srt" => Ok(OutputFormat::Srt),
            "txt" => Ok(OutputFormat::Txt),
            _ => Err(format!(
                "Unknown format: {}. Use 'vtt', 'srt', or 'txt'",
                s
            )),
        }
    }
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Vtt => "vtt",
            OutputFormat::Srt => "srt",
            OutputFormat::Txt => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Vtt => "text/vtt",
            OutputFormat::Srt => "application/x-subrip",
            OutputFormat::Txt => "text/plain",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub model: String,
    pub default_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            model: "gemini-2.5-flash".to_string(),
            default_format: OutputFormat::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                if let Ok(file_config) = toml::from_str::<Config>(&contents) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.gemini_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("SUBTRANS_MODEL") {
            config.model = model;
        }
        if let Ok(format) = std::env::var("SUBTRANS_DEFAULT_FORMAT") {
            if let Ok(f) = format.parse() {
                config.default_format = f;
            }
        }

        Ok(config)
    }

    /// Persist the configuration, including the API key, to the config file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file_path().ok_or_else(|| {
            SubtransError::Config("Could not determine config directory".to_string())
        })?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| SubtransError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(config_path, contents)?;

        Ok(())
    }

    /// Remove the stored config file, forgetting any saved API key.
    pub fn clear() -> Result<()> {
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                std::fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.gemini_api_key.is_none() {
            return Err(SubtransError::Config(
                "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey"
                    .to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(SubtransError::Config("Model name must not be empty".to_string()));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subtrans").join("config.toml"))
    }
}
