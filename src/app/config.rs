use crate::core::models::bid::Currency;
use config::Config;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BIDDER_CODE: &str = "AdCurrent";
pub const DEFAULT_BANNER_ENDPOINT: &str =
    "https://prebid-bidder.flux-adserver.com/api/v1/prebid/banner";
pub const DEFAULT_NATIVE_ENDPOINT: &str =
    "https://prebid-bidder.flux-adserver.com/api/v1/prebid/native";
pub const DEFAULT_COOKIE_SYNC_URL: &str =
    "https://prebid-bidder.flux-adserver.com/api/v1/cookie/gen";

fn default_bidder_code() -> String {
    DEFAULT_BIDDER_CODE.to_string()
}

fn default_banner_endpoint() -> String {
    DEFAULT_BANNER_ENDPOINT.to_string()
}

fn default_native_endpoint() -> String {
    DEFAULT_NATIVE_ENDPOINT.to_string()
}

fn default_currency() -> String {
    Currency::Jpy.to_string()
}

fn default_cookie_sync_url() -> String {
    DEFAULT_COOKIE_SYNC_URL.to_string()
}

/// Vendor facing settings for the adapter. Defaults match the
/// production flux endpoints so an empty config is usable
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(default)]
pub struct BidderSettings {
    #[serde(default = "default_bidder_code")]
    #[builder(setter(into))]
    pub code: String,
    #[serde(default = "default_banner_endpoint")]
    #[builder(setter(into))]
    pub banner_endpoint: String,
    #[serde(default = "default_native_endpoint")]
    #[builder(setter(into))]
    pub native_endpoint: String,
    /// Sent as `cur` when a bid doesn't name one
    #[serde(default = "default_currency")]
    #[builder(setter(into))]
    pub default_currency: String,
    /// Image pixel handed to the host for cookie syncing
    #[serde(default = "default_cookie_sync_url")]
    #[builder(setter(into))]
    pub cookie_sync_url: String,
}

impl Default for BidderSettings {
    fn default() -> Self {
        Self {
            code: default_bidder_code(),
            banner_endpoint: default_banner_endpoint(),
            native_endpoint: default_native_endpoint(),
            default_currency: default_currency(),
            cookie_sync_url: default_cookie_sync_url(),
        }
    }
}

impl BidderSettings {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.code.trim().is_empty() {
            anyhow::bail!("Bidder code must not be empty");
        }

        for (name, url) in [
            ("banner_endpoint", &self.banner_endpoint),
            ("native_endpoint", &self.native_endpoint),
            ("cookie_sync_url", &self.cookie_sync_url),
        ] {
            url::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", name, url, e))?;
        }

        self.default_currency.parse::<Currency>().map_err(|_| {
            anyhow::anyhow!(
                "Invalid default_currency: '{}'. Supported: {:?}",
                self.default_currency,
                Currency::ALL
            )
        })?;

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSink {
    #[serde(flatten)]
    pub dest: LogType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogType {
    Stderr {
        #[serde(default = "default_true")]
        color: bool,
        #[serde(default)]
        json: bool,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        json: bool,
        #[serde(default)]
        rotation: FileRotation,
        #[serde(default)]
        max_files: usize,
    },
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub sinks: Vec<LogSink>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            sinks: vec![LogSink {
                dest: LogType::Stderr {
                    color: true,
                    json: false,
                },
            }],
        }
    }
}

impl LoggingConfig {
    /// Validates the logging configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.sinks.is_empty() {
            anyhow::bail!("At least one logging sink must be configured");
        }

        self.level.parse::<tracing::Level>().map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: trace, debug, info, warn, error",
                self.level
            )
        })?;

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FluxConfig {
    #[serde(default)]
    pub bidder: BidderSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FluxConfig {
    pub fn load(path: &PathBuf) -> Result<FluxConfig, anyhow::Error> {
        let cfg = Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()?;

        let cfg: FluxConfig = cfg.try_deserialize()?;
        cfg.bidder.validate()?;

        Ok(cfg)
    }
}
