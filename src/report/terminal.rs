use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table as ComfyTable};

use crate::processor::Summary;
use crate::table::{Row, Table};

/// Print the first and last `n` rows of the updated table.
pub fn render_preview(table: &Table, n: usize) {
    let rows = &table.rows;
    let tail_start = rows.len().saturating_sub(n);

    println!("\n--- Updated table (first {} rows) ---", n);
    println!("{}", build_table(table, &rows[..n.min(rows.len())]));
    println!("\n--- Updated table (last {} rows) ---", n);
    println!("{}", build_table(table, &rows[tail_start..]));
}

/// Print the run summary; a single line when `quiet`.
pub fn render_summary(summary: &Summary, quiet: bool) {
    if quiet {
        println!(
            "Total: {}  Updated: {}  Skipped: {}  Failed: {}",
            summary.total,
            summary.updated.to_string().green(),
            summary.skipped.to_string().yellow(),
            summary.failed.to_string().red(),
        );
        return;
    }

    println!();
    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<49} │", "SUMMARY".bold());
    println!(" │  {:<49} │", format!("Total rows      : {:>4}", summary.total));
    println!(
        " │  {:<49} │",
        format!("{}  Updated      : {:>4}", "✓".green(), summary.updated)
    );
    println!(
        " │  {:<49} │",
        format!("{}  Skipped      : {:>4}", "–".yellow(), summary.skipped)
    );
    println!(
        " │  {:<49} │",
        format!("{}  Failed       : {:>4}", "✗".red(), summary.failed)
    );
    println!(" └────────────────────────────────────────────────────┘");
}

fn build_table(table: &Table, rows: &[Row]) -> ComfyTable {
    let mut out = ComfyTable::new();
    out.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            table
                .headers()
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
        );

    for row in rows {
        out.add_row(table.cells(row).into_iter().map(|cell| {
            let c = Cell::new(cell);
            if cell.starts_with("Error:") {
                c.fg(Color::Red)
            } else {
                c
            }
        }));
    }

    out
}
