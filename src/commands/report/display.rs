//! Rendering of footprint reports

use anyhow::Result;
use colored::Colorize;
use footprint::{human_size, Ratio, SchemaReport, SchemaTotals, TableRecord};
use serde::Serialize;

/// Efficiency below this is highlighted in the text report
const LOW_EFFICIENCY: u64 = 50;

// ============================================================================
// Text
// ============================================================================

/// Summary line for one schema
pub fn schema_line(report: &SchemaReport) -> String {
    let totals = &report.totals;
    format!(
        "======== Database: {:<23}  szDB: {:>5}  szFS: {:>5}  eff: {:>3}  ovhd: {:>3}",
        report.name,
        human_size(totals.declared_size),
        human_size(totals.disk_size),
        totals.efficiency(),
        totals.overhead()
    )
}

/// Detail line for one table
pub fn table_line(table: &TableRecord) -> String {
    format!(
        "  table: {:<16}  #rows: {:>8}  szDB: {:>5}  szFS: {:>5}  eff: {:>3}  ovhd: {:>3}",
        table.meta.name,
        table.meta.row_count,
        human_size(table.declared_size),
        human_size(table.disk_size),
        table.efficiency(),
        table.overhead()
    )
}

/// All lines of the text report, schemas first then their tables
#[cfg(test)]
pub fn text_lines(reports: &[SchemaReport]) -> Vec<String> {
    let mut lines = Vec::new();
    for report in reports {
        lines.push(schema_line(report));
        lines.extend(report.tables.iter().map(table_line));
    }
    lines
}

/// Print the text report to stdout
pub fn print_text(reports: &[SchemaReport]) {
    for report in reports {
        println!("{}", schema_line(report).bold());
        for table in &report.tables {
            let line = table_line(table);
            if is_low(table.efficiency()) {
                println!("{}", line.yellow());
            } else {
                println!("{line}");
            }
        }
    }
}

fn is_low(ratio: Ratio) -> bool {
    ratio.value().is_some_and(|p| p < LOW_EFFICIENCY)
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct SchemaJson<'a> {
    schema: &'a str,
    #[serde(flatten)]
    totals: &'a SchemaTotals,
    efficiency: Ratio,
    overhead: Ratio,
    tables: Vec<TableJson<'a>>,
}

#[derive(Serialize)]
struct TableJson<'a> {
    #[serde(flatten)]
    record: &'a TableRecord,
    efficiency: Ratio,
    overhead: Ratio,
}

/// Render reports as pretty JSON, ratios as integers or `null`
pub fn to_json(reports: &[SchemaReport]) -> Result<String> {
    let view: Vec<SchemaJson<'_>> = reports
        .iter()
        .map(|r| SchemaJson {
            schema: &r.name,
            totals: &r.totals,
            efficiency: r.totals.efficiency(),
            overhead: r.totals.overhead(),
            tables: r
                .tables
                .iter()
                .map(|t| TableJson {
                    record: t,
                    efficiency: t.efficiency(),
                    overhead: t.overhead(),
                })
                .collect(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&view)?)
}

// ============================================================================
// Tests
// ============================================================================
