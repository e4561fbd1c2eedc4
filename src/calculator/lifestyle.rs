use tracing::debug;

use crate::activity::{
    ActivityInput, DistanceUnit, ShippingActivity, TransportMethod, WeightUnit,
};
use crate::calculator::remote_or_fallback;
use crate::factors::EmissionFactors;
use crate::provider::EstimateProvider;
use crate::types::{HouseholdProfile, ShoppingFrequency};

/// Diet, always local, plus shopping priced as a year of truck-shipped packages.
pub async fn calculate(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    profile: &HouseholdProfile,
) -> f64 {
    let diet_kg = factors.diet_factor(profile.diet_type);
    debug!("diet: {} = {diet_kg} kg CO2e", profile.diet_type);

    let frequency = profile.shopping_frequency;
    let shipping = shopping_activity(factors, frequency);
    let shopping_kg = remote_or_fallback(provider, shipping, || {
        let kg = factors.shopping_fallback(frequency);
        debug!(
            "shopping: {} packages ({frequency}) = {kg} kg CO2e",
            factors.packages_per_year(frequency)
        );
        kg
    })
    .await;

    diet_kg + shopping_kg
}

/// The shipping activity implied by a shopping frequency.
pub fn shopping_activity(factors: &EmissionFactors, frequency: ShoppingFrequency) -> ActivityInput {
    let packages = factors.packages_per_year(frequency);
    ActivityInput::from(ShippingActivity {
        weight_value: packages * factors.shopping.kg_per_package,
        weight_unit: WeightUnit::Kg,
        distance_value: packages * factors.shopping.km_per_package,
        distance_unit: DistanceUnit::Km,
        transport_method: TransportMethod::Truck,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;
    use crate::factors::ShoppingFallback;
    use crate::provider::testing::ScriptedProvider;
    use crate::types::DietType;

    fn profile(diet: DietType, frequency: ShoppingFrequency) -> HouseholdProfile {
        HouseholdProfile {
            household_size: 2,
            diet_type: diet,
            shopping_frequency: frequency,
        }
    }

    #[test]
    fn synthesizes_truck_shipment_from_package_count() {
        let factors = EmissionFactors::default();
        let ActivityInput::Shipping(shipping) =
            shopping_activity(&factors, ShoppingFrequency::Average)
        else {
            panic!("expected shipping activity");
        };
        assert_eq!(shipping.weight_value, 60.0);
        assert_eq!(shipping.distance_value, 6000.0);
        assert_eq!(shipping.weight_unit, WeightUnit::Kg);
        assert_eq!(shipping.transport_method, TransportMethod::Truck);
    }

    #[tokio::test]
    async fn lifestyle_is_never_below_diet_constant() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        for diet in DietType::ALL {
            for frequency in ShoppingFrequency::ALL {
                let kg = calculate(&provider, &factors, &profile(diet, frequency)).await;
                assert!(kg >= factors.diet_factor(diet));
            }
        }
    }

    #[tokio::test]
    async fn medium_meat_average_shopping_falls_back_to_2506() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            &profile(DietType::MediumMeat, ShoppingFrequency::Average),
        )
        .await;
        assert!((kg - 2506.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn flat_fallback_uses_per_frequency_constant() {
        let provider = ScriptedProvider::failing();
        let mut factors = EmissionFactors::default();
        factors.shopping.fallback = ShoppingFallback::Flat;
        let kg = calculate(
            &provider,
            &factors,
            &profile(DietType::Vegan, ShoppingFrequency::Frequent),
        )
        .await;
        assert_eq!(kg, 1500.0 + 1500.0);
    }

    #[tokio::test]
    async fn only_shopping_goes_to_the_provider() {
        let provider = ScriptedProvider::answering(&[(ActivityKind::Shipping, 42.0)]);
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            &profile(DietType::HighMeat, ShoppingFrequency::Minimal),
        )
        .await;
        assert_eq!(kg, 3300.0 + 42.0);
        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind(), ActivityKind::Shipping);
    }
}
