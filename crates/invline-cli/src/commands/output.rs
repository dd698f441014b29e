//! Rendering document results as JSON, CSV or text.

use chrono::NaiveDateTime;
use serde::Serialize;

use invline_core::invoice::{DocumentResult, ErpRecord, HeaderRecord};
use invline_core::models::invoice::PackingRow;

/// Output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    file: &'a str,
    supplier: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<&'a str>,
    header: HeaderRecord,
    items: Vec<ErpRecord>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    packing: Vec<PackingRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

/// Render the header and items of one document.
pub fn format_result(
    result: &DocumentResult,
    format: OutputFormat,
    processed_at: NaiveDateTime,
    timestamp_format: &str,
) -> anyhow::Result<String> {
    let header = result.header_record(processed_at, timestamp_format);

    match format {
        OutputFormat::Json => {
            let report = Report {
                file: &result.name,
                supplier: result.supplier.key(),
                backend: result.backend.as_deref(),
                header,
                items: result.records(),
                packing: result.packing.clone(),
                warnings: result.warnings.clone(),
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Csv => format_items_csv(&result.records()),
        OutputFormat::Text => Ok(format_text(result, &header)),
    }
}

/// Item sheet: fixed ERP column order.
pub fn format_items_csv(records: &[ErpRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(ErpRecord::COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Header sheet: one row.
pub fn format_header_csv(header: &HeaderRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(HeaderRecord::COLUMNS)?;
    wtr.write_record(header.to_row())?;

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

/// Packing list rows. CSV always carries the header line.
pub fn format_packing(rows: &[PackingRow], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(PackingRow::COLUMNS)?;
            for row in rows {
                wtr.write_record(row.to_row())?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = format!("Packing list ({} rows)\n\n", rows.len());
            for row in rows {
                output.push_str(&format!(
                    "  {:<20} {:<12} {:>6}\n",
                    row.parcel, row.material, row.quantity
                ));
            }
            Ok(output)
        }
    }
}

/// Items of many documents in one sheet, source file first.
pub fn format_combined_csv(results: &[DocumentResult]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut columns = vec!["Source File"];
    columns.extend(ErpRecord::COLUMNS);
    wtr.write_record(&columns)?;

    for result in results {
        for record in result.records() {
            let mut row = vec![result.name.clone()];
            row.extend(record.to_row());
            wtr.write_record(&row)?;
        }
    }

    Ok(String::from_utf8(wtr.into_inner()?)?)
}

fn format_text(result: &DocumentResult, header: &HeaderRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Supplier: {}\n", header.supplier));
    output.push_str(&format!(
        "Invoice: {}\n",
        header.invoice_number.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Date: {}\n", header.invoice_date.as_deref().unwrap_or("-")));
    output.push_str(&format!("Currency: {}\n", header.currency.as_deref().unwrap_or("-")));
    output.push('\n');

    output.push_str(&format!("Items ({}):\n", result.items.len()));
    for item in &result.items {
        output.push_str(&format!(
            "  {:<20} {:>6} {:<4} {:>10} {:>12}\n",
            item.item,
            item.qty,
            item.uom.as_deref().unwrap_or(""),
            item.unit_price,
            item.amount
        ));
    }

    if !result.items.is_empty() {
        match result.total_amount() {
            Some(total) => output.push_str(&format!("\nTotal: {}\n", total)),
            None => output.push_str("\nTotal: overflow\n"),
        }
    }

    if !result.packing.is_empty() {
        output.push_str(&format!("\nPacking list ({} rows)\n", result.packing.len()));
    }

    for warning in &result.warnings {
        output.push_str(&format!("\nWarning: {}\n", warning));
    }

    output
}
