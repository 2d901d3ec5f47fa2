use std::collections::BTreeSet;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use scrub_model::CleaningResult;

use crate::commands::CleanOutcome;

pub fn print_summary(outcome: &CleanOutcome) {
    let result = &outcome.result;
    println!("Input: {}", outcome.input.display());
    match &outcome.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    if let Some(path) = &outcome.summary_json {
        println!("Summary JSON: {}", path.display());
    }
    println!("{}", overview_table(result));
    if let Some(table) = column_table(result) {
        println!("{table}");
    }
    if !result.warnings().is_empty() {
        println!("Warnings:");
        for warning in result.warnings() {
            println!("- {warning}");
        }
    }
    if !result.errors().is_empty() {
        eprintln!("Errors:");
        for error in result.errors() {
            eprintln!("- {error}");
        }
    }
}

fn overview_table(result: &CleaningResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Rows"), Cell::new(result.rows())]);
    table.add_row(vec![Cell::new("Columns"), Cell::new(result.columns())]);
    table.add_row(vec![
        Cell::new("Duration"),
        Cell::new(result.duration_display()),
    ]);
    table.add_row(vec![
        Cell::new("Duplicates removed"),
        count_cell(result.duplicates_removed(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Columns renamed"),
        count_cell(result.columns_renamed(), Color::Blue),
    ]);
    table.add_row(vec![
        Cell::new("Text columns cleaned"),
        count_cell(result.text_columns_cleaned(), Color::Blue),
    ]);
    table.add_row(vec![
        Cell::new("Outliers handled"),
        count_cell(result.outliers_handled(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Outlier rows removed"),
        count_cell(result.outlier_rows_removed(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Missing values filled"),
        count_cell(result.missing_filled(), Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Standardized"),
        names_cell(result.columns_standardized()),
    ]);
    table.add_row(vec![
        Cell::new("Left as text"),
        names_cell(result.columns_unconverted()),
    ]);
    table.add_row(vec![
        Cell::new("Status")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        status_cell(result),
    ]);
    table
}

/// Per-column outlier and missing-value counts; `None` when nothing changed.
fn column_table(result: &CleaningResult) -> Option<Table> {
    let columns: BTreeSet<&String> = result
        .outliers_by_column()
        .keys()
        .chain(result.missing_by_column().keys())
        .collect();
    if columns.is_empty() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Outliers"),
        header_cell("Missing filled"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for column in columns {
        let outliers = result.outliers_by_column().get(column).copied();
        let missing = result.missing_by_column().get(column).copied();
        table.add_row(vec![
            Cell::new(column)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_count_cell(outliers),
            optional_count_cell(missing),
        ]);
    }
    Some(table)
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn optional_count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn names_cell(names: &[String]) -> Cell {
    if names.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(names.join(", "))
    }
}

fn status_cell(result: &CleaningResult) -> Cell {
    if result.success() {
        Cell::new("OK").fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        Cell::new(format!("FAILED ({} errors)", result.errors().len()))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use scrub_model::{ResultBuilder, StageSummary};

    use super::*;

    fn sample_result() -> CleaningResult {
        let mut summary = StageSummary::new();
        summary.duplicates_removed = 2;
        summary.record_outliers("price", 3);
        summary.record_missing("city", 1);
        summary.columns_standardized = vec!["signup_date".to_string(), "price".to_string()];
        ResultBuilder::new(summary).shape(98, 4).build()
    }

    #[test]
    fn test_overview_lists_counts() {
        let rendered = overview_table(&sample_result()).to_string();
        assert!(rendered.contains("Duplicates removed"));
        assert!(rendered.contains("signup_date, price"));
        assert!(rendered.contains("OK"));
    }

    #[test]
    fn test_column_table_merges_breakdowns() {
        let rendered = column_table(&sample_result()).unwrap().to_string();
        assert!(rendered.contains("price"));
        assert!(rendered.contains("city"));
    }

    #[test]
    fn test_no_column_table_when_nothing_changed() {
        let result = ResultBuilder::new(StageSummary::new()).shape(1, 1).build();
        assert!(column_table(&result).is_none());
    }

    #[test]
    fn test_failed_status() {
        let result = ResultBuilder::new(StageSummary::new())
            .error("formats: table has no columns")
            .build();
        assert!(overview_table(&result).to_string().contains("FAILED (1 errors)"));
    }
}
