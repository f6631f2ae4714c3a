//! CSV rendering.
//!
//! Amounts are written as plain two-decimal numbers so the file stays
//! machine-readable.

use sgbooks_shared::types::round_money;

use super::error::ExportError;
use super::layout::{Cell, ReportTable, RowStyle};

/// Renders a table as CSV: title lines, a header row, then data rows.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn render(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record([table.company_name.as_str()])?;
    writer.write_record([table.title.as_str()])?;
    writer.write_record([table.subtitle.as_str()])?;
    writer.write_record(table.columns.iter().map(|c| c.header.as_str()))?;

    for row in table.rows.iter().filter(|r| r.style != RowStyle::Blank) {
        writer.write_record(row.cells.iter().map(|cell| match cell {
            Cell::Text(text) => text.clone(),
            Cell::Amount(amount) => format!("{:.2}", round_money(*amount)),
            Cell::Empty => String::new(),
        }))?;
    }

    for note in &table.notes {
        writer.write_record([note.as_str()])?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
