use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::activity::ActivityInput;
use crate::config::ProviderConfig;
use crate::provider::{CarbonMassKg, EstimateProvider, ProviderError};

const BODY_PREVIEW_CHARS: usize = 180;

#[derive(Debug, Deserialize)]
struct EstimateResponse {
    data: EstimateData,
}

#[derive(Debug, Deserialize)]
struct EstimateData {
    #[serde(default)]
    id: Option<String>,
    attributes: EstimateAttributes,
}

#[derive(Debug, Deserialize)]
struct EstimateAttributes {
    carbon_kg: f64,
}

/// Client for the Carbon Interface `/estimates` endpoint.
pub struct CarbonInterfaceProvider {
    client: Client,
    estimates_url: String,
    api_key: String,
}

impl CarbonInterfaceProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("household-emissions/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs.max(1)))
            .build()
            .context("failed to build estimate HTTP client")?;
        Ok(Self {
            client,
            estimates_url: format!("{}/estimates", config.base_url.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl EstimateProvider for CarbonInterfaceProvider {
    fn name(&self) -> &str {
        "carbon-interface"
    }

    async fn estimate(&self, activity: &ActivityInput) -> Result<CarbonMassKg, ProviderError> {
        let response = self
            .client
            .post(&self.estimates_url)
            .bearer_auth(&self.api_key)
            .json(activity)
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: preview,
            });
        }
        parse_carbon_kg(&body)
    }
}

fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(error.to_string())
    }
}

fn parse_carbon_kg(body: &str) -> Result<CarbonMassKg, ProviderError> {
    let parsed: EstimateResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Malformed(e.to_string()))?;
    let carbon_kg = parsed.data.attributes.carbon_kg;
    if !carbon_kg.is_finite() || carbon_kg < 0.0 {
        return Err(ProviderError::Malformed(format!(
            "carbon_kg out of range: {carbon_kg}"
        )));
    }
    debug!(
        "estimate {} = {carbon_kg} kg",
        parsed.data.id.as_deref().unwrap_or("-")
    );
    Ok(carbon_kg)
}
