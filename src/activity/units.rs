use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const KWH_PER_MWH: f64 = 1000.0;
pub const KM_PER_MILE: f64 = 1.609;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EnergyUnit {
    Kwh,
    Mwh,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Km,
    Mi,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeightUnit {
    G,
    Kg,
    Lb,
    Mt,
}

impl EnergyUnit {
    /// Re-expresses `value` in kWh. Range is not checked.
    pub fn to_kwh(self, value: f64) -> f64 {
        match self {
            Self::Kwh => value,
            Self::Mwh => value * KWH_PER_MWH,
        }
    }
}

impl DistanceUnit {
    /// Re-expresses `value` in km. Range is not checked.
    pub fn to_km(self, value: f64) -> f64 {
        match self {
            Self::Km => value,
            Self::Mi => value * KM_PER_MILE,
        }
    }
}

impl Display for EnergyUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kwh => write!(f, "kWh"),
            Self::Mwh => write!(f, "MWh"),
        }
    }
}

impl Display for DistanceUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Km => write!(f, "km"),
            Self::Mi => write!(f, "mi"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown unit: {0}")]
pub struct UnitParseError(pub String);

impl FromStr for EnergyUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kwh" => Ok(Self::Kwh),
            "mwh" => Ok(Self::Mwh),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}

impl FromStr for DistanceUnit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" => Ok(Self::Km),
            "mi" | "miles" => Ok(Self::Mi),
            _ => Err(UnitParseError(s.to_string())),
        }
    }
}
