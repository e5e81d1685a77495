use crate::percentile::PercentileTable;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "mockrankd.toml";
pub const DEFAULT_SCRAPE_ENDPOINT: &str = "https://mockserver-ujt5.onrender.com/scrape";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Google Sheets export URL used by `workbook.fetch` when no url is given.
    pub sheet_url: Option<String>,
    pub scrape_endpoint: String,
    pub percentile_table: PercentileTable,
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            scrape_endpoint: DEFAULT_SCRAPE_ENDPOINT.to_string(),
            percentile_table: PercentileTable::default(),
            http_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Config> {
        toml::from_str(text).context("invalid config toml")
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Config> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.to_string_lossy()))?;
        Self::from_toml_str(&text)
    }

    /// Environment overrides. Unparseable numbers are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MOCKRANKD_SHEET_URL").filter(|v| !v.trim().is_empty()) {
            self.sheet_url = Some(v.trim().to_string());
        }
        if let Some(v) = lookup("MOCKRANKD_SCRAPE_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            self.scrape_endpoint = v.trim().to_string();
        }
        if let Some(v) = lookup("MOCKRANKD_PERCENTILE_TABLE") {
            self.percentile_table = PercentileTable::from_year(&v);
        }
        if let Some(n) = lookup("MOCKRANKD_HTTP_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.http_timeout_secs = n;
        }
    }

    /// `.env`, then the TOML file (if present), then process environment.
    pub fn load() -> anyhow::Result<Config> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("MOCKRANKD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut cfg = if path.is_file() {
            Self::from_file(&path)?
        } else {
            Config::default()
        };
        cfg.apply_overrides(|k| std::env::var(k).ok());
        Ok(cfg)
    }
}
