use anyhow::Result;

use crate::output::breakdown_rows;
use crate::records::EmissionRecord;
use crate::types::CalculationResult;

pub fn result_to_csv(result: &CalculationResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["category", "kg_co2e", "share_pct"])?;
    for (category, kg, share) in breakdown_rows(&result.breakdown) {
        writer.write_record([
            category.to_lowercase(),
            format!("{kg:.2}"),
            format!("{share:.1}"),
        ])?;
    }
    writer.write_record([
        "total".to_string(),
        format!("{:.2}", result.total_emissions_kg),
        "100.0".to_string(),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn history_to_csv(records: &[EmissionRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "created_at",
        "household_size",
        "diet_type",
        "shopping_frequency",
        "household_kg",
        "energy_kg",
        "transportation_kg",
        "lifestyle_kg",
        "total_kg",
    ])?;
    for record in records {
        let profile = &record.request.profile;
        writer.write_record([
            record.id.to_string(),
            record.created_at.to_rfc3339(),
            profile.household_size.to_string(),
            profile.diet_type.to_string(),
            profile.shopping_frequency.to_string(),
            format!("{:.2}", record.breakdown.household),
            format!("{:.2}", record.breakdown.energy),
            format!("{:.2}", record.breakdown.transportation),
            format!("{:.2}", record.breakdown.lifestyle),
            format!("{:.2}", record.total_emissions_kg),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}
