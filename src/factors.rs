//! Emission factor tables used by the local fallback formulas.
//!
//! Defaults are compile-time constants. A `[factors]` section in the config file replaces
//! any of them without touching calculator code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{DietType, ShoppingFrequency};

pub const HOUSEHOLD_KG_PER_PERSON: f64 = 500.0;
pub const DEFAULT_ELECTRICITY_KG_PER_KWH: f64 = 0.5;
pub const DEFAULT_FUEL_KG_PER_UNIT: f64 = 0.2;
pub const VEHICLE_KG_PER_KM: f64 = 0.192;

const ELECTRICITY_KG_PER_KWH: [(&str, f64); 6] = [
    ("de", 0.485),
    ("us", 0.417),
    ("gb", 0.233),
    ("fr", 0.056),
    ("es", 0.234),
    ("it", 0.312),
];

// Keyed by the estimate service's fuel_source_type codes.
const FUEL_KG_PER_UNIT: [(&str, f64); 4] = [
    ("ng", 0.184),
    ("dfo", 0.265),
    ("bit", 0.340),
    ("lpg", 0.214),
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmissionFactors {
    #[serde(default = "default_household_kg_per_person")]
    pub household_kg_per_person: f64,
    #[serde(default)]
    pub electricity: ElectricityFactors,
    #[serde(default)]
    pub fuel: FuelFactors,
    #[serde(default = "default_vehicle_kg_per_km")]
    pub vehicle_kg_per_km: f64,
    #[serde(default)]
    pub flight: FlightFactors,
    #[serde(default)]
    pub diet: DietFactors,
    #[serde(default)]
    pub shopping: ShoppingFactors,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElectricityFactors {
    #[serde(default = "default_electricity_by_country")]
    pub by_country: BTreeMap<String, f64>,
    #[serde(default = "default_electricity_factor")]
    pub default: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelFactors {
    #[serde(default = "default_fuel_by_source")]
    pub by_source: BTreeMap<String, f64>,
    #[serde(default = "default_fuel_factor")]
    pub default: f64,
}

/// Per-passenger kg CO2e for one trip, by distance band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightFactors {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlightBand {
    Short,
    Medium,
    Long,
}

/// Annual kg CO2e per diet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct DietFactors {
    pub vegan: f64,
    pub vegetarian: f64,
    pub low_meat: f64,
    pub medium_meat: f64,
    pub high_meat: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ShoppingFactors {
    #[serde(default)]
    pub packages: PerFrequency,
    #[serde(default = "default_kg_per_package")]
    pub kg_per_package: f64,
    #[serde(default = "default_km_per_package")]
    pub km_per_package: f64,
    #[serde(default = "default_kg_co2_per_kg")]
    pub kg_co2_per_kg: f64,
    #[serde(default)]
    pub fallback: ShoppingFallback,
    #[serde(default)]
    pub flat: FlatShopping,
}

/// Packages received per year, by shopping frequency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerFrequency {
    pub minimal: f64,
    pub average: f64,
    pub frequent: f64,
}

/// Annual kg CO2e per shopping frequency for the flat fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlatShopping {
    pub minimal: f64,
    pub average: f64,
    pub frequent: f64,
}

/// Which local formula prices shopping when the remote estimate is unavailable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShoppingFallback {
    /// packages x kg per package x kg CO2e per kg
    #[default]
    Shipped,
    /// Fixed annual constant per frequency.
    Flat,
}

impl EmissionFactors {
    /// Factor for a country code, case-insensitive. Unknown countries get the default.
    pub fn electricity_factor(&self, country: &str) -> f64 {
        let key = country.trim().to_ascii_lowercase();
        self.electricity
            .by_country
            .get(&key)
            .copied()
            .unwrap_or(self.electricity.default)
    }

    /// Factor for a fuel source type. Unknown fuels get the default.
    pub fn fuel_factor(&self, fuel_source_type: &str) -> f64 {
        let key = fuel_source_type.trim().to_ascii_lowercase();
        self.fuel
            .by_source
            .get(&key)
            .copied()
            .unwrap_or(self.fuel.default)
    }

    pub fn flight_factor(&self, band: FlightBand) -> f64 {
        match band {
            FlightBand::Short => self.flight.short,
            FlightBand::Medium => self.flight.medium,
            FlightBand::Long => self.flight.long,
        }
    }

    pub fn diet_factor(&self, diet: DietType) -> f64 {
        match diet {
            DietType::Vegan => self.diet.vegan,
            DietType::Vegetarian => self.diet.vegetarian,
            DietType::LowMeat => self.diet.low_meat,
            DietType::MediumMeat => self.diet.medium_meat,
            DietType::HighMeat => self.diet.high_meat,
        }
    }

    pub fn packages_per_year(&self, frequency: ShoppingFrequency) -> f64 {
        self.shopping.packages.get(frequency)
    }

    pub fn shopping_fallback(&self, frequency: ShoppingFrequency) -> f64 {
        match self.shopping.fallback {
            ShoppingFallback::Shipped => {
                self.packages_per_year(frequency)
                    * self.shopping.kg_per_package
                    * self.shopping.kg_co2_per_kg
            }
            ShoppingFallback::Flat => self.shopping.flat.get(frequency),
        }
    }
}

impl PerFrequency {
    pub fn get(&self, frequency: ShoppingFrequency) -> f64 {
        match frequency {
            ShoppingFrequency::Minimal => self.minimal,
            ShoppingFrequency::Average => self.average,
            ShoppingFrequency::Frequent => self.frequent,
        }
    }
}

impl FlatShopping {
    pub fn get(&self, frequency: ShoppingFrequency) -> f64 {
        match frequency {
            ShoppingFrequency::Minimal => self.minimal,
            ShoppingFrequency::Average => self.average,
            ShoppingFrequency::Frequent => self.frequent,
        }
    }
}

impl Default for EmissionFactors {
    fn default() -> Self {
        Self {
            household_kg_per_person: HOUSEHOLD_KG_PER_PERSON,
            electricity: ElectricityFactors::default(),
            fuel: FuelFactors::default(),
            vehicle_kg_per_km: VEHICLE_KG_PER_KM,
            flight: FlightFactors::default(),
            diet: DietFactors::default(),
            shopping: ShoppingFactors::default(),
        }
    }
}

impl Default for ElectricityFactors {
    fn default() -> Self {
        Self {
            by_country: default_electricity_by_country(),
            default: DEFAULT_ELECTRICITY_KG_PER_KWH,
        }
    }
}

impl Default for FuelFactors {
    fn default() -> Self {
        Self {
            by_source: default_fuel_by_source(),
            default: DEFAULT_FUEL_KG_PER_UNIT,
        }
    }
}

impl Default for FlightFactors {
    fn default() -> Self {
        Self {
            short: 250.0,
            medium: 600.0,
            long: 1200.0,
        }
    }
}

impl Default for DietFactors {
    fn default() -> Self {
        Self {
            vegan: 1500.0,
            vegetarian: 1700.0,
            low_meat: 2000.0,
            medium_meat: 2500.0,
            high_meat: 3300.0,
        }
    }
}

impl Default for ShoppingFactors {
    fn default() -> Self {
        Self {
            packages: PerFrequency::default(),
            kg_per_package: default_kg_per_package(),
            km_per_package: default_km_per_package(),
            kg_co2_per_kg: default_kg_co2_per_kg(),
            fallback: ShoppingFallback::default(),
            flat: FlatShopping::default(),
        }
    }
}

impl Default for PerFrequency {
    fn default() -> Self {
        Self {
            minimal: 10.0,
            average: 30.0,
            frequent: 60.0,
        }
    }
}

fn default_household_kg_per_person() -> f64 {
    HOUSEHOLD_KG_PER_PERSON
}

fn default_vehicle_kg_per_km() -> f64 {
    VEHICLE_KG_PER_KM
}

fn default_electricity_factor() -> f64 {
    DEFAULT_ELECTRICITY_KG_PER_KWH
}

fn default_fuel_factor() -> f64 {
    DEFAULT_FUEL_KG_PER_UNIT
}

fn default_electricity_by_country() -> BTreeMap<String, f64> {
    ELECTRICITY_KG_PER_KWH
        .iter()
        .map(|(code, factor)| (code.to_string(), *factor))
        .collect()
}

fn default_fuel_by_source() -> BTreeMap<String, f64> {
    FUEL_KG_PER_UNIT
        .iter()
        .map(|(code, factor)| (code.to_string(), *factor))
        .collect()
}

fn default_kg_per_package() -> f64 {
    2.0
}

fn default_km_per_package() -> f64 {
    200.0
}

fn default_kg_co2_per_kg() -> f64 {
    0.1
}

impl Default for FlatShopping {
    fn default() -> Self {
        Self {
            minimal: 300.0,
            average: 800.0,
            frequent: 1500.0,
        }
    }
}
