use tracing::debug;

use crate::activity::{ActivityInput, ElectricityActivity, FuelCombustionActivity};
use crate::calculator::remote_or_fallback;
use crate::factors::EmissionFactors;
use crate::provider::EstimateProvider;

/// Electricity plus fuel combustion. Either sub-term may be absent.
pub async fn calculate(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    electricity: Option<&ElectricityActivity>,
    fuel: Option<&FuelCombustionActivity>,
) -> f64 {
    let (electricity_kg, fuel_kg) = tokio::join!(
        electricity_term(provider, factors, electricity),
        fuel_term(provider, factors, fuel),
    );
    electricity_kg + fuel_kg
}

async fn electricity_term(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    electricity: Option<&ElectricityActivity>,
) -> f64 {
    let Some(electricity) = electricity else {
        return 0.0;
    };
    remote_or_fallback(provider, ActivityInput::from(electricity.clone()), || {
        electricity_fallback(factors, electricity)
    })
    .await
}

async fn fuel_term(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    fuel: Option<&FuelCombustionActivity>,
) -> f64 {
    let Some(fuel) = fuel else {
        return 0.0;
    };
    remote_or_fallback(provider, ActivityInput::from(fuel.clone()), || {
        fuel_fallback(factors, fuel)
    })
    .await
}

pub fn electricity_fallback(factors: &EmissionFactors, electricity: &ElectricityActivity) -> f64 {
    let kwh = electricity
        .electricity_unit
        .to_kwh(electricity.electricity_value);
    let factor = factors.electricity_factor(&electricity.country);
    let kg = kwh * factor;
    debug!("electricity: {kwh} kWh x {factor} = {kg} kg CO2e");
    kg
}

pub fn fuel_fallback(factors: &EmissionFactors, fuel: &FuelCombustionActivity) -> f64 {
    let factor = factors.fuel_factor(&fuel.fuel_source_type);
    let kg = fuel.fuel_source_value * factor;
    debug!(
        "fuel: {} {} of {} x {factor} = {kg} kg CO2e",
        fuel.fuel_source_value, fuel.fuel_source_unit, fuel.fuel_source_type
    );
    kg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityKind, EnergyUnit};
    use crate::provider::testing::ScriptedProvider;

    fn electricity(value: f64, unit: EnergyUnit, country: &str) -> ElectricityActivity {
        ElectricityActivity {
            electricity_unit: unit,
            electricity_value: value,
            country: country.to_string(),
            state: None,
        }
    }

    fn fuel(kind: &str, value: f64) -> FuelCombustionActivity {
        FuelCombustionActivity {
            fuel_source_type: kind.to_string(),
            fuel_source_unit: "btu".to_string(),
            fuel_source_value: value,
        }
    }

    #[tokio::test]
    async fn electricity_falls_back_to_country_factor() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            Some(&electricity(3500.0, EnergyUnit::Kwh, "DE")),
            None,
        )
        .await;
        assert!((kg - 1697.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn mwh_and_unknown_country_use_default_factor() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            Some(&electricity(2.0, EnergyUnit::Mwh, "NZ")),
            None,
        )
        .await;
        assert!((kg - 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn remote_answers_win_and_terms_add_up() {
        let provider = ScriptedProvider::answering(&[
            (ActivityKind::Electricity, 321.0),
            (ActivityKind::FuelCombustion, 79.0),
        ]);
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            Some(&electricity(3500.0, EnergyUnit::Kwh, "DE")),
            Some(&fuel("ng", 100.0)),
        )
        .await;
        assert_eq!(kg, 400.0);
    }

    #[tokio::test]
    async fn absent_and_zero_inputs_contribute_nothing() {
        let provider = ScriptedProvider::answering(&[(ActivityKind::FuelCombustion, 79.0)]);
        let factors = EmissionFactors::default();
        assert_eq!(calculate(&provider, &factors, None, None).await, 0.0);
        assert_eq!(
            calculate(&provider, &factors, None, Some(&fuel("ng", 0.0))).await,
            0.0
        );
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn fallback_is_monotonic_in_quantity() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let mut previous = 0.0;
        for value in [0.0, 1.0, 10.0, 250.0, 5000.0] {
            let kg = calculate(
                &provider,
                &factors,
                Some(&electricity(value, EnergyUnit::Kwh, "US")),
                Some(&fuel("wood", value)),
            )
            .await;
            assert!(kg >= previous);
            previous = kg;
        }
    }

    #[test]
    fn fuel_fallback_uses_source_table() {
        let factors = EmissionFactors::default();
        assert!((fuel_fallback(&factors, &fuel("dfo", 100.0)) - 26.5).abs() < 1e-9);
        assert!((fuel_fallback(&factors, &fuel("unknown", 100.0)) - 20.0).abs() < 1e-9);
    }
}
