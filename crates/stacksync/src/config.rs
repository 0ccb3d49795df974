//! Runtime configuration.
//!
//! [`SyncConfig`] gathers the Delivery API connection settings and the
//! cadences of the background tasks. It deserializes from any serde format
//! with defaults for everything except the credentials, and can be read from
//! the `CONTENTSTACK_*` environment variables.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigError, Error};
use crate::types::DeliveryUrl;

/// Environment variable holding the stack API key.
pub const ENV_API_KEY: &str = "CONTENTSTACK_API_KEY";
/// Environment variable holding the delivery token.
pub const ENV_DELIVERY_TOKEN: &str = "CONTENTSTACK_DELIVERY_TOKEN";
/// Environment variable holding the publishing environment.
pub const ENV_ENVIRONMENT: &str = "CONTENTSTACK_ENVIRONMENT";
/// Environment variable holding the stack region.
pub const ENV_REGION: &str = "CONTENTSTACK_REGION";
/// Environment variable overriding the Delivery API base URL.
pub const ENV_BASE_URL: &str = "CONTENTSTACK_BASE_URL";

/// Delivery API credentials.
///
/// # Security
///
/// The delivery token is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use stacksync::DeliveryCredentials;
///
/// let creds = DeliveryCredentials::new("blt89c08d1b12ee2e55", "cs-token");
/// assert_eq!(creds.api_key(), "blt89c08d1b12ee2e55");
/// assert!(!format!("{:?}", creds).contains("cs-token"));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct DeliveryCredentials {
    api_key: String,
    delivery_token: String,
}

impl DeliveryCredentials {
    /// Create new credentials.
    pub fn new(api_key: impl Into<String>, delivery_token: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            delivery_token: delivery_token.into(),
        }
    }

    /// Returns the stack API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the delivery token.
    ///
    /// # Security
    ///
    /// Use this only when constructing requests. Never log or display this value.
    pub(crate) fn delivery_token(&self) -> &str {
        &self.delivery_token
    }
}

// Intentionally hide the token in Debug output
impl fmt::Debug for DeliveryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryCredentials")
            .field("api_key", &self.api_key)
            .field("delivery_token", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for the sync core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(flatten)]
    pub credentials: DeliveryCredentials,

    /// Publishing environment to read from.
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Stack region, used to pick the CDN host.
    #[serde(default = "default_region")]
    pub region: String,

    /// Explicit base URL, overriding the region.
    #[serde(default)]
    pub base_url: Option<DeliveryUrl>,

    /// Arm periodic change polling. Off unless explicitly enabled.
    #[serde(default)]
    pub auto_refresh_enabled: bool,

    /// Interval between change-detection cycles.
    #[serde(default = "default_poll_interval_ms", deserialize_with = "non_zero_ms")]
    pub poll_interval_ms: u64,

    /// Delay before the first change-detection cycle.
    #[serde(default = "default_initial_check_delay_ms")]
    pub initial_check_delay_ms: u64,

    /// Re-render every region on this cadence, independent of polling.
    #[serde(default = "default_true")]
    pub periodic_render_enabled: bool,

    /// Interval between periodic forced re-renders.
    #[serde(default = "default_render_interval_ms", deserialize_with = "non_zero_ms")]
    pub render_interval_ms: u64,

    /// Delay between a detected change and the resulting full reload.
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,

    /// Number of blog posts requested by the posts region.
    #[serde(default = "default_blog_post_limit")]
    pub blog_post_limit: u32,
}

fn non_zero_ms<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    if ms == 0 {
        return Err(serde::de::Error::custom("interval must be greater than zero"));
    }
    Ok(ms)
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_region() -> String {
    "us".to_string()
}

fn default_true() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    5_000
}

fn default_initial_check_delay_ms() -> u64 {
    2_000
}

fn default_render_interval_ms() -> u64 {
    15_000
}

fn default_reload_delay_ms() -> u64 {
    1_000
}

fn default_blog_post_limit() -> u32 {
    100
}

impl SyncConfig {
    /// Configuration with default cadences for the given credentials.
    pub fn new(credentials: DeliveryCredentials) -> Self {
        Self {
            credentials,
            environment: default_environment(),
            region: default_region(),
            base_url: None,
            auto_refresh_enabled: false,
            poll_interval_ms: default_poll_interval_ms(),
            initial_check_delay_ms: default_initial_check_delay_ms(),
            periodic_render_enabled: true,
            render_interval_ms: default_render_interval_ms(),
            reload_delay_ms: default_reload_delay_ms(),
            blog_post_limit: default_blog_post_limit(),
        }
    }

    /// Read the configuration from `CONTENTSTACK_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key or delivery token is missing, or the
    /// base URL override is invalid.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing { name: ENV_API_KEY })?;
        let delivery_token = get(ENV_DELIVERY_TOKEN).ok_or(ConfigError::Missing {
            name: ENV_DELIVERY_TOKEN,
        })?;

        let mut config = Self::new(DeliveryCredentials::new(api_key, delivery_token));
        if let Some(environment) = get(ENV_ENVIRONMENT) {
            config.environment = environment;
        }
        if let Some(region) = get(ENV_REGION) {
            config.region = region;
        }
        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = Some(DeliveryUrl::new(base_url)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the cadences the background tasks are armed with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroInterval`] for a zero poll or render interval.
    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "poll_interval_ms",
            }
            .into());
        }
        if self.render_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "render_interval_ms",
            }
            .into());
        }
        Ok(())
    }

    /// The Delivery API base URL: the explicit override, else the region default.
    pub fn delivery_url(&self) -> Result<DeliveryUrl, Error> {
        match &self.base_url {
            Some(url) => Ok(url.clone()),
            None => DeliveryUrl::for_region(&self.region),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn initial_check_delay(&self) -> Duration {
        Duration::from_millis(self.initial_check_delay_ms)
    }

    pub fn render_interval(&self) -> Duration {
        Duration::from_millis(self.render_interval_ms)
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(self.reload_delay_ms)
    }
}
