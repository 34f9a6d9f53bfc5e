use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "termbot.toml";

/// Process configuration, loaded once at startup from a TOML file.
/// A config file named on the command line must exist and parse;
/// anything wrong with it fails startup loudly. The default path is
/// allowed to be absent, in which case built-in defaults apply.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub analytics: AnalyticsSection,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Backing term file, columns: term, description, category,
    /// subcategory, lang.
    #[serde(default = "default_terms_file")]
    pub terms_file: PathBuf,
    /// Directory for the analytics log and backups.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UiConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Cap for global search results.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
    /// Cap for in-filter search results.
    #[serde(default = "default_max_filtered_results")]
    pub max_filtered_results: usize,
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsSection {
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_flush_timeout_ms")]
    pub flush_timeout_ms: u64,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AdminConfig {
    /// User IDs allowed to run privileged operations.
    #[serde(default)]
    pub user_ids: Vec<i64>,
}

fn default_terms_file() -> PathBuf {
    PathBuf::from("data/terms.csv")
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_page_size() -> usize {
    10
}
fn default_max_search_results() -> usize {
    5
}
fn default_max_filtered_results() -> usize {
    20
}
fn default_max_query_len() -> usize {
    200
}
fn default_batch_size() -> usize {
    10
}
fn default_flush_timeout_ms() -> u64 {
    1000
}
fn default_queue_capacity() -> usize {
    1000
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            terms_file: default_terms_file(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            page_size: default_page_size(),
            max_search_results: default_max_search_results(),
            max_filtered_results: default_max_filtered_results(),
            max_query_len: default_max_query_len(),
        }
    }
}

impl Default for AnalyticsSection {
    fn default() -> Self {
        AnalyticsSection {
            batch_size: default_batch_size(),
            flush_timeout_ms: default_flush_timeout_ms(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Config {
    pub fn load(path: &Path, explicit: bool) -> Result<Config> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) if !explicit => {
                log::info!(
                    "No config at {}, using built-in defaults",
                    path.display()
                );
                return Ok(Config::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read config {}", path.display()))
            }
        };
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Startup-time misconfiguration fails loudly rather than running
    /// degraded.
    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.ui.page_size > 0, "ui.page_size must be positive");
        anyhow::ensure!(
            self.ui.max_search_results > 0,
            "ui.max_search_results must be positive"
        );
        anyhow::ensure!(
            self.ui.max_filtered_results > 0,
            "ui.max_filtered_results must be positive"
        );
        anyhow::ensure!(
            self.analytics.queue_capacity > 0,
            "analytics.queue_capacity must be positive"
        );
        anyhow::ensure!(
            self.analytics.batch_size > 0,
            "analytics.batch_size must be positive"
        );
        Ok(())
    }
}
