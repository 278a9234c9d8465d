use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use listing_cli::pipeline::CleaningOutcome;

pub fn print_summary(outcome: &CleaningOutcome) {
    println!("Input: {}", outcome.input_artifact);
    println!("Output: {}", outcome.artifact);
    println!("{}", summary_table(outcome));
}

fn summary_table(outcome: &CleaningOutcome) -> Table {
    let summary = &outcome.summary;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![header_cell("Stage"), header_cell("Rows")]);
    table.add_row(vec![Cell::new("Loaded"), count_cell(summary.rows_in, None)]);
    table.add_row(vec![
        Cell::new("Dropped (price)"),
        count_cell(summary.dropped_by_price, Some(Color::Yellow)),
    ]);
    table.add_row(vec![
        Cell::new("Dropped (geography)"),
        count_cell(summary.dropped_by_geo, Some(Color::Yellow)),
    ]);
    table.add_row(vec![
        Cell::new("Published")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(summary.rows_out, None).add_attribute(Attribute::Bold),
    ]);
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, highlight: Option<Color>) -> Cell {
    let cell = Cell::new(count).set_alignment(CellAlignment::Right);
    match highlight {
        Some(color) if count > 0 => cell.fg(color),
        _ => cell,
    }
}
