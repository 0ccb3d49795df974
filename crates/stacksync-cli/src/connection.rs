//! Delivery API connection arguments.

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use stacksync::config::{
    ENV_API_KEY, ENV_BASE_URL, ENV_DELIVERY_TOKEN, ENV_ENVIRONMENT, ENV_REGION,
};
use stacksync::{DeliveryCredentials, DeliveryUrl, SyncConfig};

#[derive(Args, Debug)]
pub struct ConnectionArgs {
    /// Stack API key
    #[arg(long, env = ENV_API_KEY, hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Delivery token
    #[arg(long, env = ENV_DELIVERY_TOKEN, hide_env_values = true, global = true)]
    pub delivery_token: Option<String>,

    /// Publishing environment
    #[arg(long, env = ENV_ENVIRONMENT, default_value = "development", global = true)]
    pub environment: String,

    /// Stack region (us, eu, azure-na, azure-eu, gcp-na)
    #[arg(long, env = ENV_REGION, default_value = "us", global = true)]
    pub region: String,

    /// Override the Delivery API base URL
    #[arg(long, env = ENV_BASE_URL, global = true)]
    pub base_url: Option<String>,
}

impl ConnectionArgs {
    /// Build a library configuration from the arguments.
    pub fn config(&self) -> Result<SyncConfig> {
        let api_key = self
            .api_key
            .clone()
            .filter(|v| !v.is_empty())
            .with_context(|| format!("Missing API key. Pass --api-key or set {ENV_API_KEY}."))?;
        let delivery_token = self
            .delivery_token
            .clone()
            .filter(|v| !v.is_empty())
            .with_context(|| {
                format!("Missing delivery token. Pass --delivery-token or set {ENV_DELIVERY_TOKEN}.")
            })?;

        let mut config = SyncConfig::new(DeliveryCredentials::new(api_key, delivery_token));
        config.environment = self.environment.clone();
        config.region = self.region.clone();
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(DeliveryUrl::new(base_url).context("Invalid base URL")?);
        }

        // Fail early on unknown regions rather than on the first request.
        let url = config.delivery_url().context("Invalid region")?;
        config.validate().context("Invalid configuration")?;
        debug!(base_url = %url, environment = %config.environment, "Resolved connection");
        Ok(config)
    }
}
