use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::activity::{
    ElectricityActivity, FlightActivity, FuelCombustionActivity, ShippingActivity,
    VehicleActivity,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum DietType {
    Vegan,
    Vegetarian,
    LowMeat,
    MediumMeat,
    HighMeat,
}

impl DietType {
    pub const ALL: [DietType; 5] = [
        DietType::Vegan,
        DietType::Vegetarian,
        DietType::LowMeat,
        DietType::MediumMeat,
        DietType::HighMeat,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Vegan => "vegan",
            Self::Vegetarian => "vegetarian",
            Self::LowMeat => "low-meat",
            Self::MediumMeat => "medium-meat",
            Self::HighMeat => "high-meat",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingFrequency {
    Minimal,
    Average,
    Frequent,
}

impl ShoppingFrequency {
    pub const ALL: [ShoppingFrequency; 3] = [
        ShoppingFrequency::Minimal,
        ShoppingFrequency::Average,
        ShoppingFrequency::Frequent,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Average => "average",
            Self::Frequent => "frequent",
        }
    }
}

impl Display for DietType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl Display for ShoppingFrequency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown diet type: {0}")]
pub struct DietParseError(pub String);

#[derive(Debug, Error)]
#[error("unknown shopping frequency: {0}")]
pub struct ShoppingParseError(pub String);

impl FromStr for DietType {
    type Err = DietParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "vegan" => Ok(Self::Vegan),
            "vegetarian" => Ok(Self::Vegetarian),
            "low-meat" => Ok(Self::LowMeat),
            "medium-meat" => Ok(Self::MediumMeat),
            "high-meat" => Ok(Self::HighMeat),
            _ => Err(DietParseError(s.to_string())),
        }
    }
}

impl FromStr for ShoppingFrequency {
    type Err = ShoppingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "average" => Ok(Self::Average),
            "frequent" => Ok(Self::Frequent),
            _ => Err(ShoppingParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdProfile {
    pub household_size: u32,
    pub diet_type: DietType,
    pub shopping_frequency: ShoppingFrequency,
}

/// Everything the engine needs for one estimate. Optional activities that are absent
/// contribute nothing to their category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    #[serde(flatten)]
    pub profile: HouseholdProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity: Option<ElectricityActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_combustion: Option<FuelCombustionActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flights: Option<FlightActivity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingActivity>,
}

impl CalculationRequest {
    pub fn new(profile: HouseholdProfile) -> Self {
        Self {
            profile,
            electricity: None,
            fuel_combustion: None,
            vehicle: None,
            flights: None,
            shipping: None,
        }
    }

    pub fn with_electricity(mut self, electricity: ElectricityActivity) -> Self {
        self.electricity = Some(electricity);
        self
    }

    pub fn with_fuel_combustion(mut self, fuel: FuelCombustionActivity) -> Self {
        self.fuel_combustion = Some(fuel);
        self
    }

    pub fn with_vehicle(mut self, vehicle: VehicleActivity) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    pub fn with_flights(mut self, flights: FlightActivity) -> Self {
        self.flights = Some(flights);
        self
    }

    pub fn with_shipping(mut self, shipping: ShippingActivity) -> Self {
        self.shipping = Some(shipping);
        self
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EmissionBreakdown {
    pub household: f64,
    pub energy: f64,
    pub transportation: f64,
    pub lifestyle: f64,
}

impl EmissionBreakdown {
    pub fn total(&self) -> f64 {
        self.household + self.energy + self.transportation + self.lifestyle
    }

    pub fn categories(&self) -> [(Category, f64); 4] {
        [
            (Category::Household, self.household),
            (Category::Energy, self.energy),
            (Category::Transportation, self.transportation),
            (Category::Lifestyle, self.lifestyle),
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Household,
    Energy,
    Transportation,
    Lifestyle,
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Household => "Household",
            Self::Energy => "Energy",
            Self::Transportation => "Transportation",
            Self::Lifestyle => "Lifestyle",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub total_emissions_kg: f64,
    pub breakdown: EmissionBreakdown,
}

impl CalculationResult {
    pub fn from_breakdown(breakdown: EmissionBreakdown) -> Self {
        Self {
            total_emissions_kg: breakdown.total(),
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_uses_camel_case_wire_names() {
        let payload = json!({
            "householdSize": 3,
            "dietType": "medium-meat",
            "shoppingFrequency": "average",
            "fuelCombustion": {
                "type": "fuel_combustion",
                "fuel_source_type": "ng",
                "fuel_source_unit": "thousand_cubic_feet",
                "fuel_source_value": 12.0
            }
        });
        let request: CalculationRequest = serde_json::from_value(payload).expect("deserialize");
        assert_eq!(request.profile.household_size, 3);
        assert_eq!(request.profile.diet_type, DietType::MediumMeat);
        assert_eq!(request.profile.shopping_frequency, ShoppingFrequency::Average);
        assert!(request.electricity.is_none());
        assert_eq!(
            request.fuel_combustion.map(|f| f.fuel_source_value),
            Some(12.0)
        );
    }

    #[test]
    fn rejects_unknown_diet_at_deserialization() {
        let payload = json!({
            "householdSize": 1,
            "dietType": "carnivore",
            "shoppingFrequency": "average"
        });
        assert!(serde_json::from_value::<CalculationRequest>(payload).is_err());
    }

    #[test]
    fn parses_diet_and_shopping_from_cli_strings() {
        assert_eq!("low_meat".parse::<DietType>().unwrap(), DietType::LowMeat);
        assert_eq!(
            "Frequent".parse::<ShoppingFrequency>().unwrap(),
            ShoppingFrequency::Frequent
        );
        assert!("sometimes".parse::<ShoppingFrequency>().is_err());
    }

    #[test]
    fn result_total_is_unrounded_sum() {
        let breakdown = EmissionBreakdown {
            household: 1500.0,
            energy: 1697.5,
            transportation: 2304.0000000000005,
            lifestyle: 2506.0,
        };
        let result = CalculationResult::from_breakdown(breakdown);
        assert_eq!(
            result.total_emissions_kg,
            1500.0 + 1697.5 + 2304.0000000000005 + 2506.0
        );
        let value = serde_json::to_value(result).expect("serialize");
        assert!(value.get("totalEmissionsKg").is_some());
        assert!(value["breakdown"].get("transportation").is_some());
    }
}
