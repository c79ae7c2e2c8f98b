use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub server: ServerSettings,
    pub currency: CurrencySettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// Rates endpoint used when no API key is configured.
    pub api_url: String,
    /// Optional exchangerate-api key; switches to the keyed v6 endpoint.
    pub api_key: String,
    pub cache_ttl_secs: i64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Override for the rates database directory (defaults to the platform data dir).
    pub data_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            currency: CurrencySettings {
                api_url: "https://api.exchangerate-api.com/v4/latest/USD".to_string(),
                api_key: String::new(),
                cache_ttl_secs: 300,
                request_timeout_secs: 10,
            },
            storage: StorageSettings { data_dir: None },
        }
    }
}

impl CurrencySettings {
    /// Resolve the rates URL, preferring the keyed endpoint when a key is set.
    pub fn effective_api_url(&self) -> String {
        if self.api_key.is_empty() {
            self.api_url.clone()
        } else {
            format!("https://v6.exchangerate-api.com/v6/{}/latest/USD", self.api_key)
        }
    }
}

impl AppSettings {
    pub fn settings_path() -> Result<PathBuf> {
        ProjectDirs::from("com", "convertscope", "convertscope")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| anyhow!("failed to determine config directory"))
    }

    pub async fn load() -> Result<Self> {
        let path = Self::settings_path()?;

        let mut settings = if path.exists() {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("failed to read settings file {}", path.display()))?;
            serde_json::from_str(&content).context("failed to parse settings")?
        } else {
            let settings = Self::default();
            settings.save_to_disk().await?;
            settings
        };

        // Environment overrides the file for the API key
        if let Ok(key) = std::env::var("EXCHANGE_API_KEY") {
            if !key.is_empty() {
                settings.currency.api_key = key;
            }
        }

        Ok(settings)
    }

    async fn save_to_disk(&self) -> Result<()> {
        let path = Self::settings_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("failed to serialize settings")?;
        fs::write(&path, content)
            .await
            .context("failed to write settings file")?;
        Ok(())
    }

    /// Path of the redb file holding persisted exchange rates.
    pub fn rates_db_path(&self) -> Result<PathBuf> {
        let mut dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("com", "convertscope", "convertscope")
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| anyhow!("failed to determine data directory"))?,
        };
        std::fs::create_dir_all(&dir).context("failed to create data directory")?;
        dir.push("currency_rates.redb");
        Ok(dir)
    }
}
