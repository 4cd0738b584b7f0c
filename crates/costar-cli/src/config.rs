//! CLI configuration

use anyhow::Context;
use costar_core::{DriverConfig, SearchConfig};
use costar_imdb::{ImdbConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use costar_storage::csv::DEFAULT_CSV_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get default config directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".costar")
}

/// Config file location, honoring an explicit override
pub fn config_file_path(over: Option<&Path>) -> PathBuf {
    over.map(Path::to_path_buf)
        .unwrap_or_else(|| default_config_dir().join("config.toml"))
}

/// An actor of the default roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Configuration file contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_depth: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movies_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors_limit: Option<usize>,
    pub search_concurrency: usize,
    pub worker_budget: usize,
    pub pair_retries: u32,
    pub base_url: String,
    pub fetch_timeout_secs: u64,
    pub output: PathBuf,
    pub roster: Vec<RosterEntry>,
}

impl Default for Config {
    fn default() -> Self {
        let driver = DriverConfig::default();
        Self {
            max_depth: driver.search.max_depth,
            movies_limit: driver.search.outbound_limit,
            actors_limit: driver.search.inbound_limit,
            search_concurrency: driver.search.search_concurrency,
            worker_budget: driver.worker_budget,
            pair_retries: driver.pair_retries,
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch_timeout_secs: DEFAULT_TIMEOUT_SECS,
            output: PathBuf::from(DEFAULT_CSV_FILE),
            roster: Vec::new(),
        }
    }
}

fn parse_limit(value: &str) -> anyhow::Result<Option<usize>> {
    match value {
        "" | "none" => Ok(None),
        n => Ok(Some(n.parse().with_context(|| format!("Invalid limit: {}", n))?)),
    }
}

fn show_limit(limit: Option<usize>) -> String {
    limit.map(|n| n.to_string()).unwrap_or_else(|| "none".to_string())
}

impl Config {
    /// Load the config file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Keys settable with `config set`
    pub fn keys() -> &'static [&'static str] {
        &[
            "max_depth",
            "movies_limit",
            "actors_limit",
            "search_concurrency",
            "worker_budget",
            "pair_retries",
            "base_url",
            "fetch_timeout_secs",
            "output",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "max_depth" => self.max_depth.to_string(),
            "movies_limit" => show_limit(self.movies_limit),
            "actors_limit" => show_limit(self.actors_limit),
            "search_concurrency" => self.search_concurrency.to_string(),
            "worker_budget" => self.worker_budget.to_string(),
            "pair_retries" => self.pair_retries.to_string(),
            "base_url" => self.base_url.clone(),
            "fetch_timeout_secs" => self.fetch_timeout_secs.to_string(),
            "output" => self.output.display().to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let invalid = || format!("Invalid value for {}: {}", key, value);
        match key {
            "max_depth" => self.max_depth = value.parse().with_context(invalid)?,
            "movies_limit" => self.movies_limit = parse_limit(value)?,
            "actors_limit" => self.actors_limit = parse_limit(value)?,
            "search_concurrency" => self.search_concurrency = value.parse().with_context(invalid)?,
            "worker_budget" => self.worker_budget = value.parse().with_context(invalid)?,
            "pair_retries" => self.pair_retries = value.parse().with_context(invalid)?,
            "base_url" => self.base_url = value.to_string(),
            "fetch_timeout_secs" => self.fetch_timeout_secs = value.parse().with_context(invalid)?,
            "output" => self.output = PathBuf::from(value),
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::new()
            .with_max_depth(self.max_depth)
            .with_outbound_limit(self.movies_limit)
            .with_inbound_limit(self.actors_limit)
            .with_concurrency(self.search_concurrency)
    }

    pub fn driver_config(&self, search: SearchConfig) -> DriverConfig {
        DriverConfig::new(search)
            .with_worker_budget(self.worker_budget)
            .with_retries(self.pair_retries)
    }

    pub fn imdb_config(&self) -> ImdbConfig {
        ImdbConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.fetch_timeout_secs))
    }

    pub fn roster_ids(&self) -> Vec<String> {
        self.roster.iter().map(|entry| entry.id.clone()).collect()
    }
}
