use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::output::{breakdown_rows, tonnes};
use crate::records::EmissionRecord;
use crate::types::CalculationResult;

pub fn render_result_table(result: &CalculationResult) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Category", "kg CO2e", "Share"]);
    for (category, kg, share) in breakdown_rows(&result.breakdown) {
        table.add_row(vec![
            Cell::new(category),
            Cell::new(format!("{kg:.1}")).set_alignment(CellAlignment::Right),
            Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total"),
        Cell::new(format!("{:.1}", result.total_emissions_kg)).set_alignment(CellAlignment::Right),
        Cell::new(format!("{:.2} t", tonnes(result.total_emissions_kg)))
            .set_alignment(CellAlignment::Right),
    ]);
    table.to_string()
}

pub fn render_history_table(records: &[EmissionRecord]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "ID",
        "Created",
        "Size",
        "Diet",
        "Shopping",
        "Total (t CO2e)",
    ]);
    for record in records {
        let profile = &record.request.profile;
        table.add_row(vec![
            record.id.to_string(),
            record.created_at.format("%Y-%m-%d %H:%M").to_string(),
            profile.household_size.to_string(),
            profile.diet_type.to_string(),
            profile.shopping_frequency.to_string(),
            format!("{:.2}", tonnes(record.total_emissions_kg)),
        ]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::aggregate;

    #[test]
    fn result_table_lists_every_category() {
        let rendered = render_result_table(&aggregate(1500.0, 1697.5, 2304.0, 2506.0));
        for label in ["Household", "Energy", "Transportation", "Lifestyle", "Total"] {
            assert!(rendered.contains(label), "missing {label}");
        }
        assert!(rendered.contains("8007.5"));
    }
}
