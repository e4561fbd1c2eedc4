pub mod units;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use units::{DistanceUnit, EnergyUnit, WeightUnit};

/// A single unit-tagged activity, in the shape the remote estimate service accepts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityInput {
    Electricity(ElectricityActivity),
    FuelCombustion(FuelCombustionActivity),
    Vehicle(VehicleActivity),
    Flight(FlightActivity),
    Shipping(ShippingActivity),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Electricity,
    FuelCombustion,
    Vehicle,
    Flight,
    Shipping,
}

impl ActivityKind {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Electricity => "electricity",
            Self::FuelCombustion => "fuel_combustion",
            Self::Vehicle => "vehicle",
            Self::Flight => "flight",
            Self::Shipping => "shipping",
        }
    }
}

impl Display for ActivityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricityActivity {
    pub electricity_unit: EnergyUnit,
    pub electricity_value: f64,
    /// Two-letter country code, upper case on the wire.
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelCombustionActivity {
    pub fuel_source_type: String,
    pub fuel_source_unit: String,
    pub fuel_source_value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VehicleActivity {
    pub distance_unit: DistanceUnit,
    pub distance_value: f64,
    pub vehicle_model_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightActivity {
    pub passengers: u32,
    pub legs: Vec<FlightLeg>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_unit: Option<DistanceUnit>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightLeg {
    pub departure_airport: String,
    pub destination_airport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabin_class: Option<CabinClass>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    Premium,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingActivity {
    pub weight_value: f64,
    pub weight_unit: WeightUnit,
    pub distance_value: f64,
    pub distance_unit: DistanceUnit,
    pub transport_method: TransportMethod,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportMethod {
    Ship,
    Train,
    Truck,
    Plane,
}

impl ActivityInput {
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::Electricity(_) => ActivityKind::Electricity,
            Self::FuelCombustion(_) => ActivityKind::FuelCombustion,
            Self::Vehicle(_) => ActivityKind::Vehicle,
            Self::Flight(_) => ActivityKind::Flight,
            Self::Shipping(_) => ActivityKind::Shipping,
        }
    }

    /// Magnitude in the canonical unit of the activity. A non-positive value means the
    /// activity carries nothing worth estimating.
    pub fn magnitude(&self) -> f64 {
        match self {
            Self::Electricity(e) => e.electricity_unit.to_kwh(e.electricity_value),
            Self::FuelCombustion(f) => f.fuel_source_value,
            Self::Vehicle(v) => v.distance_unit.to_km(v.distance_value),
            Self::Flight(f) => {
                if f.legs.is_empty() {
                    0.0
                } else {
                    f64::from(f.passengers)
                }
            }
            Self::Shipping(s) => s.weight_value * s.distance_value,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        let magnitude = self.magnitude();
        !(magnitude.is_finite() && magnitude > 0.0)
    }
}

impl From<ElectricityActivity> for ActivityInput {
    fn from(value: ElectricityActivity) -> Self {
        Self::Electricity(value)
    }
}

impl From<FuelCombustionActivity> for ActivityInput {
    fn from(value: FuelCombustionActivity) -> Self {
        Self::FuelCombustion(value)
    }
}

impl From<VehicleActivity> for ActivityInput {
    fn from(value: VehicleActivity) -> Self {
        Self::Vehicle(value)
    }
}

impl From<FlightActivity> for ActivityInput {
    fn from(value: FlightActivity) -> Self {
        Self::Flight(value)
    }
}

impl From<ShippingActivity> for ActivityInput {
    fn from(value: ShippingActivity) -> Self {
        Self::Shipping(value)
    }
}
