//! Plain-text rendering of the view model for the terminal front end.

use crate::core::view_model::{AppViewModel, ResultRow};
use crate::domain::model::HealthReport;

fn table(headers: &[&str], row: &[&str]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .zip(row)
        .map(|(h, c)| h.chars().count().max(c.chars().count()))
        .collect();

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    format!("{}\n{}\n{}", line(headers), rule, line(row))
}

pub fn render_result_row(row: &ResultRow) -> String {
    table(&ResultRow::HEADERS, &row.cells())
}

/// Lookup section: field hint, error text, or the one-row result table.
pub fn render_lookup(view: &AppViewModel) -> String {
    let mut out = Vec::new();
    if let Some(hint) = &view.postal_code_hint {
        out.push(format!("Postal code: {}", hint));
    }
    if let Some(error) = &view.lookup_error {
        out.push(format!("Error: {}", error));
    }
    if let Some(row) = &view.result_row {
        out.push(render_result_row(row));
    }
    out.join("\n")
}

/// Single status line for an upload in progress.
pub fn render_upload_progress(view: &AppViewModel) -> Option<String> {
    view.upload_elapsed.as_ref().map(|elapsed| {
        format!(
            "Elapsed: {} - processing, this can take up to 9 minutes",
            elapsed
        )
    })
}

pub fn render_upload(view: &AppViewModel) -> String {
    let mut out = Vec::new();
    if let Some(line) = render_upload_progress(view) {
        out.push(line);
    }
    if let Some(error) = &view.upload_error {
        out.push(format!("Error: {}", error));
    }
    if let Some(success) = &view.upload_success {
        out.push(success.clone());
    }
    out.join("\n")
}

pub fn render_health(report: &HealthReport) -> String {
    let mut out = format!(
        "Status: {}\nDatabase: {}\nRecords: {}",
        report.status, report.database, report.total_records
    );
    if let Some(stats) = &report.statistics {
        if let Ok(pretty) = serde_json::to_string_pretty(stats) {
            out.push_str("\nStatistics:\n");
            out.push_str(&pretty);
        }
    }
    out
}
