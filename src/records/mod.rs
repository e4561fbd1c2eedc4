pub mod migrations;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CalculationRequest, EmissionBreakdown};

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// A persisted calculation: the request that produced it and its result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmissionRecord {
    pub id: i64,
    #[serde(flatten)]
    pub request: CalculationRequest,
    pub total_emissions_kg: f64,
    pub breakdown: EmissionBreakdown,
    pub created_at: DateTime<Utc>,
}
