//! Request checks applied before a request reaches the engine.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::types::CalculationRequest;

pub const MIN_HOUSEHOLD_SIZE: u32 = 1;
pub const MAX_HOUSEHOLD_SIZE: u32 = 20;
pub const MAX_ELECTRICITY_VALUE: f64 = 1_000_000.0;
pub const MAX_VEHICLE_DISTANCE: f64 = 100_000.0;
pub const MAX_PASSENGERS: u32 = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Error)]
#[error("invalid request: {}", render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Default)]
struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    fn range(&mut self, field: &str, value: f64, max: Option<f64>) {
        if !value.is_finite() {
            self.push(field, "must be a finite number");
        } else if value < 0.0 {
            self.push(field, "must be >= 0");
        } else if let Some(max) = max {
            if value > max {
                self.push(field, format!("must be <= {max}"));
            }
        }
    }

    fn not_blank(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    fn code(&mut self, field: &str, value: &str, len: usize) {
        let valid = value.len() == len && value.chars().all(|c| c.is_ascii_uppercase());
        if !valid {
            self.push(field, format!("must be {len} uppercase letters"));
        }
    }
}

/// Collects every problem in `request` rather than stopping at the first.
pub fn validate_request(request: &CalculationRequest) -> Result<(), ValidationError> {
    let mut issues = Issues::default();

    let size = request.profile.household_size;
    if !(MIN_HOUSEHOLD_SIZE..=MAX_HOUSEHOLD_SIZE).contains(&size) {
        issues.push(
            "householdSize",
            format!("must be between {MIN_HOUSEHOLD_SIZE} and {MAX_HOUSEHOLD_SIZE}"),
        );
    }

    if let Some(electricity) = &request.electricity {
        issues.range(
            "electricity.electricity_value",
            electricity.electricity_value,
            Some(MAX_ELECTRICITY_VALUE),
        );
        issues.code("electricity.country", &electricity.country, 2);
    }

    if let Some(vehicle) = &request.vehicle {
        issues.range(
            "vehicle.distance_value",
            vehicle.distance_value,
            Some(MAX_VEHICLE_DISTANCE),
        );
        issues.not_blank("vehicle.vehicle_model_id", &vehicle.vehicle_model_id);
    }

    if let Some(flights) = &request.flights {
        if !(1..=MAX_PASSENGERS).contains(&flights.passengers) {
            issues.push(
                "flights.passengers",
                format!("must be between 1 and {MAX_PASSENGERS}"),
            );
        }
        if flights.legs.is_empty() {
            issues.push("flights.legs", "at least one leg is required");
        }
        for (idx, leg) in flights.legs.iter().enumerate() {
            issues.code(
                &format!("flights.legs[{idx}].departure_airport"),
                &leg.departure_airport,
                3,
            );
            issues.code(
                &format!("flights.legs[{idx}].destination_airport"),
                &leg.destination_airport,
                3,
            );
        }
    }

    if let Some(shipping) = &request.shipping {
        issues.range("shipping.weight_value", shipping.weight_value, None);
        issues.range("shipping.distance_value", shipping.distance_value, None);
    }

    if let Some(fuel) = &request.fuel_combustion {
        issues.not_blank("fuelCombustion.fuel_source_type", &fuel.fuel_source_type);
        issues.not_blank("fuelCombustion.fuel_source_unit", &fuel.fuel_source_unit);
        issues.range(
            "fuelCombustion.fuel_source_value",
            fuel.fuel_source_value,
            None,
        );
    }

    if issues.0.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues: issues.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{
        DistanceUnit, ElectricityActivity, EnergyUnit, FlightActivity, FlightLeg,
        FuelCombustionActivity, VehicleActivity,
    };
    use crate::types::{DietType, HouseholdProfile, ShoppingFrequency};

    fn base(size: u32) -> CalculationRequest {
        CalculationRequest::new(HouseholdProfile {
            household_size: size,
            diet_type: DietType::Vegetarian,
            shopping_frequency: ShoppingFrequency::Minimal,
        })
    }

    fn fields(error: ValidationError) -> Vec<String> {
        error.issues.into_iter().map(|i| i.field).collect()
    }

    #[test]
    fn accepts_a_complete_valid_request() {
        let request = base(3)
            .with_electricity(ElectricityActivity {
                electricity_unit: EnergyUnit::Kwh,
                electricity_value: 3500.0,
                country: "DE".to_string(),
                state: None,
            })
            .with_vehicle(VehicleActivity {
                distance_unit: DistanceUnit::Km,
                distance_value: 12_000.0,
                vehicle_model_id: "model".to_string(),
            })
            .with_flights(FlightActivity {
                passengers: 2,
                legs: vec![FlightLeg {
                    departure_airport: "SFO".to_string(),
                    destination_airport: "YYZ".to_string(),
                    cabin_class: None,
                }],
                distance_unit: None,
            });
        assert!(validate_request(&request).is_ok());
    }

    #[test]
    fn rejects_household_size_out_of_range() {
        assert!(validate_request(&base(0)).is_err());
        assert!(validate_request(&base(21)).is_err());
        assert!(validate_request(&base(20)).is_ok());
    }

    #[test]
    fn collects_all_issues() {
        let request = base(0)
            .with_electricity(ElectricityActivity {
                electricity_unit: EnergyUnit::Kwh,
                electricity_value: f64::NAN,
                country: "de".to_string(),
                state: None,
            })
            .with_flights(FlightActivity {
                passengers: 0,
                legs: vec![FlightLeg {
                    departure_airport: "SF".to_string(),
                    destination_airport: "YYZ".to_string(),
                    cabin_class: None,
                }],
                distance_unit: None,
            })
            .with_fuel_combustion(FuelCombustionActivity {
                fuel_source_type: " ".to_string(),
                fuel_source_unit: "btu".to_string(),
                fuel_source_value: -1.0,
            });
        let error = validate_request(&request).expect_err("should fail");
        assert_eq!(
            fields(error),
            vec![
                "householdSize",
                "electricity.electricity_value",
                "electricity.country",
                "flights.passengers",
                "flights.legs[0].departure_airport",
                "fuelCombustion.fuel_source_type",
                "fuelCombustion.fuel_source_value",
            ]
        );
    }

    #[test]
    fn error_message_lists_fields() {
        let error = validate_request(&base(25)).expect_err("should fail");
        assert_eq!(
            error.to_string(),
            "invalid request: householdSize: must be between 1 and 20"
        );
    }
}
