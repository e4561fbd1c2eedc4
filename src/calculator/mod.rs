//! Category calculators and the engine that runs them.
//!
//! Every sub-term that has a remote path asks the estimate provider first and prices the
//! activity from the local factor tables when that fails. Calculators never return errors.

pub mod energy;
pub mod household;
pub mod lifestyle;
pub mod transportation;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::activity::ActivityInput;
use crate::factors::EmissionFactors;
use crate::provider::EstimateProvider;
use crate::types::{CalculationRequest, CalculationResult, EmissionBreakdown};

/// Turns a validated request into a total and a four-category breakdown.
///
/// Holds no per-call state; the provider is shared across concurrent calls.
#[derive(Clone)]
pub struct EmissionsEngine {
    provider: Arc<dyn EstimateProvider>,
    factors: EmissionFactors,
}

impl EmissionsEngine {
    pub fn new(provider: Arc<dyn EstimateProvider>, factors: EmissionFactors) -> Self {
        Self { provider, factors }
    }

    pub fn factors(&self) -> &EmissionFactors {
        &self.factors
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn calculate(&self, request: &CalculationRequest) -> CalculationResult {
        let provider = self.provider.as_ref();
        let factors = &self.factors;

        let household = household::calculate(&request.profile, factors);
        let (energy, transportation, lifestyle) = tokio::join!(
            energy::calculate(
                provider,
                factors,
                request.electricity.as_ref(),
                request.fuel_combustion.as_ref(),
            ),
            transportation::calculate(
                provider,
                factors,
                request.vehicle.as_ref(),
                request.flights.as_ref(),
            ),
            lifestyle::calculate(provider, factors, &request.profile),
        );

        let result = aggregate(household, energy, transportation, lifestyle);
        info!(
            "estimated {:.1} kg CO2e (household {:.1}, energy {:.1}, transportation {:.1}, lifestyle {:.1})",
            result.total_emissions_kg, household, energy, transportation, lifestyle
        );
        result
    }
}

/// Sums the four category values as they are. No rounding or clamping.
pub fn aggregate(
    household: f64,
    energy: f64,
    transportation: f64,
    lifestyle: f64,
) -> CalculationResult {
    CalculationResult::from_breakdown(EmissionBreakdown {
        household,
        energy,
        transportation,
        lifestyle,
    })
}

/// Remote estimate for `activity`, or `fallback()` when the provider fails.
///
/// Degenerate activities are never sent and contribute 0. A provider answer that is not a
/// finite non-negative mass counts as a failure.
pub(crate) async fn remote_or_fallback<F>(
    provider: &dyn EstimateProvider,
    activity: ActivityInput,
    fallback: F,
) -> f64
where
    F: FnOnce() -> f64,
{
    let kind = activity.kind();
    if activity.is_degenerate() {
        debug!("{kind}: nothing to estimate, contributes 0");
        return 0.0;
    }
    match provider.estimate(&activity).await {
        Ok(kg) if kg.is_finite() && kg >= 0.0 => {
            debug!("{kind}: {kg} kg from {}", provider.name());
            kg
        }
        Ok(kg) => {
            let local = fallback();
            warn!(
                "{kind}: {} returned unusable mass {kg}, using local factors ({local} kg)",
                provider.name()
            );
            local
        }
        Err(error) => {
            let local = fallback();
            warn!(
                "{kind}: {} estimate failed, using local factors ({local} kg): {error}",
                provider.name()
            );
            local
        }
    }
}
