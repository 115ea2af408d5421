use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Complete hbnb configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HbnbConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding every persisted object
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
}

fn default_file_path() -> PathBuf {
    PathBuf::from("file.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
        }
    }
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Largest accepted request body
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_body_bytes() -> usize {
    1_048_576 // 1 MB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl HbnbConfig {
    /// Override fields from HBNB_* env vars. Unparseable values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("HBNB_API_HOST") {
            if !v.is_empty() {
                self.api.host = v;
            }
        }
        if let Ok(v) = std::env::var("HBNB_API_PORT") {
            if let Ok(port) = v.parse::<u16>() {
                self.api.port = port;
            }
        }
        if let Ok(v) = std::env::var("HBNB_FILE_PATH") {
            if !v.is_empty() {
                self.storage.file_path = PathBuf::from(v);
            }
        }
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &Path) -> Result<HbnbConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: HbnbConfig = toml::from_str(&contents).context("Failed to parse config file")?;
    Ok(config)
}
