use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Process-wide configuration loaded from config.toml and environment variables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub latency: LatencySettings,
    pub dataset: DatasetSettings,
    pub table: TableSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    pub transport: String,
    pub log_level: String,
}

/// Simulated round-trip delays, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LatencySettings {
    pub query_min_ms: u64,
    pub query_max_ms: u64,
    pub options_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatasetSettings {
    /// JSON file with an array of incidents; the demo dataset is generated when unset
    pub path: Option<PathBuf>,
    pub generated_count: usize,
    pub include_samples: bool,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableSettings {
    pub default_page_size: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for LatencySettings {
    fn default() -> Self {
        Self {
            query_min_ms: 500,
            query_max_ms: 1500,
            options_ms: 300,
        }
    }
}

impl LatencySettings {
    /// No artificial delay at all
    pub fn none() -> Self {
        Self {
            query_min_ms: 0,
            query_max_ms: 0,
            options_ms: 0,
        }
    }

    pub fn query_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.query_min_ms),
            Duration::from_millis(self.query_max_ms),
        )
    }

    pub fn options_delay(&self) -> Duration {
        Duration::from_millis(self.options_ms)
    }
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: None,
            generated_count: 1000,
            include_samples: true,
            seed: None,
        }
    }
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            default_page_size: 10,
        }
    }
}

impl Settings {
    /// Load settings with precedence env > file > defaults.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                info!("Using config file: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let default_path = Self::config_path();
                if default_path.exists() {
                    info!("Using default config file: {}", default_path.display());
                    Self::from_file(&default_path)?
                } else {
                    info!(
                        "No config file found at {}, using defaults",
                        default_path.display()
                    );
                    Self::default()
                }
            }
        };

        settings.apply_env_overrides()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("SAFEDESK_LOG_LEVEL") {
            self.server.log_level = val;
        }

        if let Ok(val) = std::env::var("SAFEDESK_DATASET_PATH") {
            self.dataset.path = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("SAFEDESK_GENERATED_COUNT") {
            self.dataset.generated_count = val
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SAFEDESK_GENERATED_COUNT '{}': {}", val, e))?;
        }

        if let Ok(val) = std::env::var("SAFEDESK_PAGE_SIZE") {
            self.table.default_page_size = val
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SAFEDESK_PAGE_SIZE '{}': {}", val, e))?;
        }

        if let Ok(val) = std::env::var("SAFEDESK_LATENCY_MS") {
            let ms: u64 = val
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SAFEDESK_LATENCY_MS '{}': {}", val, e))?;
            self.latency.query_min_ms = ms;
            self.latency.query_max_ms = ms;
        }

        Ok(())
    }

    pub fn config_path() -> PathBuf {
        if let Ok(custom_path) = std::env::var("SAFEDESK_CONFIG_PATH") {
            PathBuf::from(custom_path)
        } else {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("safedesk")
                .join("config.toml")
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.default_page_size == 0 {
            anyhow::bail!("Default page size must be greater than 0");
        }

        if self.latency.query_min_ms > self.latency.query_max_ms {
            anyhow::bail!(
                "latency.query_min_ms ({}) exceeds latency.query_max_ms ({})",
                self.latency.query_min_ms,
                self.latency.query_max_ms
            );
        }

        Ok(())
    }
}
