use async_trait::async_trait;

use crate::activity::ActivityInput;
use crate::provider::{CarbonMassKg, EstimateProvider, ProviderError};

/// Provider used when no remote service is configured. Every call fails, so every
/// category is priced from the local factor tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl EstimateProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn estimate(&self, _activity: &ActivityInput) -> Result<CarbonMassKg, ProviderError> {
        Err(ProviderError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ElectricityActivity, EnergyUnit};

    #[test]
    fn never_answers() {
        let activity = ActivityInput::from(ElectricityActivity {
            electricity_unit: EnergyUnit::Kwh,
            electricity_value: 100.0,
            country: "US".to_string(),
            state: None,
        });
        let outcome = tokio_test::block_on(OfflineProvider.estimate(&activity));
        assert!(matches!(outcome, Err(ProviderError::NotConfigured)));
    }
}
