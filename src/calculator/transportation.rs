use tracing::debug;

use crate::activity::{ActivityInput, FlightActivity, VehicleActivity};
use crate::calculator::remote_or_fallback;
use crate::factors::{EmissionFactors, FlightBand};
use crate::provider::EstimateProvider;

/// Vehicle travel plus flights. Either sub-term may be absent.
pub async fn calculate(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    vehicle: Option<&VehicleActivity>,
    flights: Option<&FlightActivity>,
) -> f64 {
    let (vehicle_kg, flight_kg) = tokio::join!(
        vehicle_term(provider, factors, vehicle),
        flight_term(provider, factors, flights),
    );
    vehicle_kg + flight_kg
}

async fn vehicle_term(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    vehicle: Option<&VehicleActivity>,
) -> f64 {
    let Some(vehicle) = vehicle else {
        return 0.0;
    };
    remote_or_fallback(provider, ActivityInput::from(vehicle.clone()), || {
        vehicle_fallback(factors, vehicle)
    })
    .await
}

async fn flight_term(
    provider: &dyn EstimateProvider,
    factors: &EmissionFactors,
    flights: Option<&FlightActivity>,
) -> f64 {
    let Some(flights) = flights else {
        return 0.0;
    };
    remote_or_fallback(provider, ActivityInput::from(flights.clone()), || {
        flight_fallback(factors, flights)
    })
    .await
}

pub fn vehicle_fallback(factors: &EmissionFactors, vehicle: &VehicleActivity) -> f64 {
    let km = vehicle.distance_unit.to_km(vehicle.distance_value);
    let kg = km * factors.vehicle_kg_per_km;
    debug!(
        "vehicle: {km} km x {} = {kg} kg CO2e",
        factors.vehicle_kg_per_km
    );
    kg
}

/// Without route distances every trip is priced at the medium band.
pub fn flight_fallback(factors: &EmissionFactors, flights: &FlightActivity) -> f64 {
    let per_passenger = factors.flight_factor(FlightBand::Medium);
    let kg = f64::from(flights.passengers) * per_passenger;
    debug!(
        "flights: {} passengers x {per_passenger} = {kg} kg CO2e",
        flights.passengers
    );
    kg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityKind, DistanceUnit, FlightLeg};
    use crate::provider::testing::ScriptedProvider;

    fn vehicle(value: f64, unit: DistanceUnit) -> VehicleActivity {
        VehicleActivity {
            distance_unit: unit,
            distance_value: value,
            vehicle_model_id: "model".to_string(),
        }
    }

    fn flights(passengers: u32, legs: usize) -> FlightActivity {
        FlightActivity {
            passengers,
            legs: (0..legs)
                .map(|_| FlightLeg {
                    departure_airport: "CDG".to_string(),
                    destination_airport: "FCO".to_string(),
                    cabin_class: None,
                })
                .collect(),
            distance_unit: None,
        }
    }

    #[tokio::test]
    async fn vehicle_falls_back_to_flat_factor() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            Some(&vehicle(12_000.0, DistanceUnit::Km)),
            None,
        )
        .await;
        assert!((kg - 2304.0).abs() < 1e-9);

        let miles = calculate(
            &provider,
            &factors,
            Some(&vehicle(1000.0, DistanceUnit::Mi)),
            None,
        )
        .await;
        assert!((miles - 1609.0 * 0.192).abs() < 1e-9);
    }

    #[tokio::test]
    async fn flights_fall_back_to_medium_band_per_passenger() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let kg = calculate(&provider, &factors, None, Some(&flights(3, 2))).await;
        assert_eq!(kg, 1800.0);
    }

    #[tokio::test]
    async fn flight_without_legs_is_absent() {
        let provider = ScriptedProvider::answering(&[(ActivityKind::Flight, 900.0)]);
        let factors = EmissionFactors::default();
        let kg = calculate(&provider, &factors, None, Some(&flights(2, 0))).await;
        assert_eq!(kg, 0.0);
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn remote_vehicle_estimate_is_used_when_available() {
        let provider = ScriptedProvider::answering(&[(ActivityKind::Vehicle, 1875.25)]);
        let factors = EmissionFactors::default();
        let kg = calculate(
            &provider,
            &factors,
            Some(&vehicle(12_000.0, DistanceUnit::Km)),
            Some(&flights(1, 1)),
        )
        .await;
        assert_eq!(kg, 1875.25 + 600.0);
    }

    #[tokio::test]
    async fn fallback_is_monotonic_in_distance_and_passengers() {
        let provider = ScriptedProvider::failing();
        let factors = EmissionFactors::default();
        let mut previous = 0.0;
        for step in 1..=6u32 {
            let kg = calculate(
                &provider,
                &factors,
                Some(&vehicle(f64::from(step) * 500.0, DistanceUnit::Km)),
                Some(&flights(step, 1)),
            )
            .await;
            assert!(kg >= previous);
            previous = kg;
        }
    }
}
