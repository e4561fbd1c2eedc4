pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS emission_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    household_size INTEGER NOT NULL,
    electricity_json TEXT,
    vehicle_json TEXT,
    flights_json TEXT,
    shipping_json TEXT,
    fuel_combustion_json TEXT,
    diet_type TEXT NOT NULL,
    shopping_frequency TEXT NOT NULL,
    total_emissions_kg REAL NOT NULL,
    household_kg REAL NOT NULL,
    energy_kg REAL NOT NULL,
    transportation_kg REAL NOT NULL,
    lifestyle_kg REAL NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_emission_records_created
    ON emission_records(created_at DESC);
"#;
