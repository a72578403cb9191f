//! Rendering of extraction results.

use rust_decimal::Decimal;

use billscan_core::models::bill::{BillData, BillResponse, ExtractionResult, LineItem};
use billscan_core::models::config::OutputConfig;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per page item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(result, output),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_json(result: &ExtractionResult, output: &OutputConfig) -> anyhow::Result<String> {
    let value = if output.envelope {
        serde_json::to_value(BillResponse::success(result))?
    } else {
        serde_json::to_value(BillData::from(result))?
    };

    Ok(if output.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    })
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "page_no",
        "item_name",
        "item_quantity",
        "item_rate",
        "item_amount",
    ])?;

    for page in &result.pages {
        for item in &page.items {
            wtr.write_record([
                &page.page_no.to_string(),
                &item.name,
                &optional(item.quantity),
                &optional(item.rate),
                &item.amount.to_string(),
            ])?;
        }
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn optional(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    for page in &result.pages {
        output.push_str(&format!("Page {} ({} items)\n", page.page_no, page.items.len()));
        for item in &page.items {
            output.push_str(&format!("  {}\n", describe(item)));
        }
        output.push('\n');
    }

    output.push_str(&format!("Unique items:  {}\n", result.item_count()));
    output.push_str(&format!("Derived total: {:.2}\n", result.final_total));

    if result.totals.is_empty() {
        output.push_str("No totals found in text\n");
    } else {
        output.push_str("Totals in text:\n");
        for (keyword, value) in result.totals.iter() {
            let difference = value - result.final_total;
            let sign = if difference.is_sign_negative() { "-" } else { "+" };
            output.push_str(&format!(
                "  {:<16} {:>12.2}  (difference {}{:.2})\n",
                keyword,
                value,
                sign,
                difference.abs()
            ));
        }
    }

    output
}

fn describe(item: &LineItem) -> String {
    match (item.quantity, item.rate) {
        (Some(q), Some(r)) => format!("{:<32} {} x {} = {}", item.name, q, r, item.amount),
        (None, Some(r)) => format!("{:<32} @ {} = {}", item.name, r, item.amount),
        (Some(q), None) => format!("{:<32} {} x ? = {}", item.name, q, item.amount),
        (None, None) => format!("{:<32} {}", item.name, item.amount),
    }
}
