//! Configuration for the hotel scraper.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::types::MAX_IMAGES;

/// Document store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string (path of the SQLite file)
    #[serde(default = "default_database_uri")]
    pub uri: String,
    /// Database name, used as the namespace of every collection
    #[serde(default = "default_database_name")]
    pub name: String,
}

fn default_database_uri() -> String {
    "data/hotels.sqlite".to_string()
}

fn default_database_name() -> String {
    "tripadvisor".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: default_database_uri(),
            name: default_database_name(),
        }
    }
}

/// Browser configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// Chrome executable override
    #[serde(default)]
    pub chrome_path: Option<String>,
    /// Pause inserted before every page interaction
    #[serde(default = "default_slow_mo_ms")]
    pub slow_mo_ms: u64,
    /// Navigation timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    #[serde(default = "default_window_height")]
    pub window_height: u32,
}

fn default_headless() -> bool {
    true
}

fn default_slow_mo_ms() -> u64 {
    250
}

fn default_timeout_secs() -> u64 {
    45
}

fn default_window_width() -> u32 {
    1920
}

fn default_window_height() -> u32 {
    1080
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            chrome_path: None,
            slow_mo_ms: default_slow_mo_ms(),
            timeout_secs: default_timeout_secs(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

/// Site and extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Pause after the home page loads, before touching the search form
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Pause after typing, while the type-ahead suggestions render
    #[serde(default = "default_typeahead_delay_ms")]
    pub typeahead_delay_ms: u64,
    /// Photos stored per hotel, at most `MAX_IMAGES`
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
}

fn default_base_url() -> String {
    crate::scraper::BASE_URL.to_string()
}

fn default_settle_delay_ms() -> u64 {
    2000
}

fn default_typeahead_delay_ms() -> u64 {
    3000
}

fn default_max_images() -> usize {
    MAX_IMAGES
}

fn default_image_timeout_secs() -> u64 {
    45
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            settle_delay_ms: default_settle_delay_ms(),
            typeahead_delay_ms: default_typeahead_delay_ms(),
            max_images: default_max_images(),
            image_timeout_secs: default_image_timeout_secs(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, zero for none
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    10_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: 0,
            multiplier: default_multiplier(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub browser: BrowserSettings,
    #[serde(default)]
    pub scrape: ScrapeSettings,
    #[serde(default)]
    pub retry: RetrySettings,
}

impl AppConfig {
    /// Load configuration from defaults, config file, `.env` and environment
    pub fn load() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        Self::load_from(
            config::Environment::with_prefix("HOTELS"),
            std::env::var("uri").ok(),
            std::env::var("databasename").ok(),
        )
    }

    /// Build the configuration on top of `env`.
    ///
    /// `uri` and `database_name` are the plain variables used by older
    /// deployments and win over everything else.
    pub fn load_from(
        env: config::Environment,
        uri: Option<String>,
        database_name: Option<String>,
    ) -> Result<Self> {
        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Add config file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables (HOTELS_DATABASE__URI, etc.)
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .set_override_option("database.uri", uri)?
            .set_override_option("database.name", database_name)?
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the record format cannot hold
    pub fn validate(&self) -> Result<()> {
        if self.scrape.max_images > MAX_IMAGES {
            bail!(
                "scrape.max_images is {}, at most {} images fit in a record",
                self.scrape.max_images,
                MAX_IMAGES
            );
        }
        Ok(())
    }
}
