use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{CellAlignment, ContentArrangement, Table};

use crate::commands::RunSummary;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

pub fn print_summary(summary: &RunSummary) {
    println!("Source: {}", summary.source.display());
    println!("Table: {}", summary.table);
    println!("Duplicates file: {}", summary.duplicates_file.display());
    let mut table = Table::new();
    table.set_header(vec!["Stage", "Rows"]);
    apply_table_style(&mut table);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    table.add_row(vec!["Extracted".to_string(), summary.extracted.to_string()]);
    table.add_row(vec![
        "Duplicates removed".to_string(),
        summary.duplicates.to_string(),
    ]);
    table.add_row(vec!["Survivors".to_string(), summary.survivors.to_string()]);
    table.add_row(vec![
        "Loaded".to_string(),
        summary
            .loaded
            .map_or_else(|| "- (dry run)".to_string(), |rows| rows.to_string()),
    ]);
    println!("{table}");
}
