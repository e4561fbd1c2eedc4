pub mod http;
pub mod offline;
#[cfg(test)]
pub mod testing;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::activity::ActivityInput;
use crate::config::ProviderConfig;
use crate::provider::http::CarbonInterfaceProvider;
use crate::provider::offline::OfflineProvider;

/// Carbon mass in kilograms, as reported by a remote estimate.
pub type CarbonMassKg = f64;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("estimate provider is not configured")]
    NotConfigured,
    #[error("estimate request timed out")]
    Timeout,
    #[error("estimate request failed: {0}")]
    Transport(String),
    #[error("estimate service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed estimate payload: {0}")]
    Malformed(String),
}

/// A remote service that turns one activity into a carbon mass.
///
/// Implementations report every failure as an error. Deciding what to do instead is the
/// caller's job.
#[async_trait]
pub trait EstimateProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn estimate(&self, activity: &ActivityInput) -> Result<CarbonMassKg, ProviderError>;
}

/// Builds the provider described by `config`, falling back to the offline provider when
/// it is disabled or no API key can be found.
pub fn from_config(config: &ProviderConfig) -> anyhow::Result<Arc<dyn EstimateProvider>> {
    if !config.enabled {
        info!("estimate provider disabled, using local factors only");
        return Ok(Arc::new(OfflineProvider));
    }
    let Some(api_key) = config.resolved_api_key() else {
        info!(
            "no API key in config or ${}, using local factors only",
            config.api_key_env
        );
        return Ok(Arc::new(OfflineProvider));
    };
    let provider = CarbonInterfaceProvider::new(config, api_key)?;
    info!("estimates via {}", config.base_url);
    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_yields_offline_provider() {
        let config = ProviderConfig {
            enabled: false,
            api_key: "secret".to_string(),
            ..ProviderConfig::default()
        };
        let provider = from_config(&config).expect("provider");
        assert_eq!(provider.name(), "offline");
    }

    #[test]
    fn configured_key_yields_http_provider() {
        let config = ProviderConfig {
            api_key: "secret".to_string(),
            ..ProviderConfig::default()
        };
        let provider = from_config(&config).expect("provider");
        assert_eq!(provider.name(), "carbon-interface");
    }
}
