use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::records::migrations::BASE_MIGRATION;
use crate::records::EmissionRecord;
use crate::types::{
    CalculationRequest, CalculationResult, EmissionBreakdown, HouseholdProfile,
};

const RECORD_COLUMNS: &str = "id, household_size, electricity_json, vehicle_json, flights_json, \
     shipping_json, fuel_combustion_json, diet_type, shopping_frequency, total_emissions_kg, \
     household_kg, energy_kg, transportation_kg, lifestyle_kg, created_at";

pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(BASE_MIGRATION)?;
        Ok(())
    }

    pub fn insert(
        &self,
        request: &CalculationRequest,
        result: &CalculationResult,
    ) -> Result<EmissionRecord> {
        let created_at = Utc::now();
        let profile = &request.profile;
        self.conn.execute(
            r#"
INSERT INTO emission_records(
    household_size, electricity_json, vehicle_json, flights_json, shipping_json,
    fuel_combustion_json, diet_type, shopping_frequency, total_emissions_kg,
    household_kg, energy_kg, transportation_kg, lifestyle_kg, created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
"#,
            params![
                profile.household_size,
                to_json_column(&request.electricity)?,
                to_json_column(&request.vehicle)?,
                to_json_column(&request.flights)?,
                to_json_column(&request.shipping)?,
                to_json_column(&request.fuel_combustion)?,
                profile.diet_type.as_slug(),
                profile.shopping_frequency.as_slug(),
                result.total_emissions_kg,
                result.breakdown.household,
                result.breakdown.energy,
                result.breakdown.transportation,
                result.breakdown.lifestyle,
                created_at.to_rfc3339()
            ],
        )?;
        Ok(EmissionRecord {
            id: self.conn.last_insert_rowid(),
            request: request.clone(),
            total_emissions_kg: result.total_emissions_kg,
            breakdown: result.breakdown,
            created_at,
        })
    }

    /// Newest first.
    pub fn latest(&self, limit: usize) -> Result<Vec<EmissionRecord>> {
        let sql = format!(
            "SELECT {RECORD_COLUMNS} FROM emission_records ORDER BY id DESC LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![sql_limit(limit)], row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get(&self, id: i64) -> Result<Option<EmissionRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM emission_records WHERE id = ?1");
        let record = self
            .conn
            .query_row(&sql, params![id], row_to_record)
            .optional()?;
        Ok(record)
    }
}

/// SQLite reads a negative LIMIT as unbounded, so saturate instead of wrapping.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn to_json_column<T: Serialize>(value: &Option<T>) -> Result<Option<String>> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(Into::into)
}

fn from_json_column<T: DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|json| {
        serde_json::from_str(&json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

fn parse_column<T>(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmissionRecord> {
    let created_at_raw: String = row.get(14)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(14, rusqlite::types::Type::Text, Box::new(e))
        })?;
    let profile = HouseholdProfile {
        household_size: row.get(1)?,
        diet_type: parse_column(row, 7)?,
        shopping_frequency: parse_column(row, 8)?,
    };
    Ok(EmissionRecord {
        id: row.get(0)?,
        request: CalculationRequest {
            profile,
            electricity: from_json_column(row, 2)?,
            vehicle: from_json_column(row, 3)?,
            flights: from_json_column(row, 4)?,
            shipping: from_json_column(row, 5)?,
            fuel_combustion: from_json_column(row, 6)?,
        },
        total_emissions_kg: row.get(9)?,
        breakdown: EmissionBreakdown {
            household: row.get(10)?,
            energy: row.get(11)?,
            transportation: row.get(12)?,
            lifestyle: row.get(13)?,
        },
        created_at,
    })
}
