//! Excel (xlsx) rendering.

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};

use super::error::ExportError;
use super::layout::{Cell, ReportTable, RowStyle};

/// Number format for money cells.
pub const AMOUNT_FORMAT: &str = "#,##0.00";

/// Row index of the column header line.
pub const HEADER_ROW: u32 = 4;

/// Excel forbids these characters in sheet names.
const INVALID_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Builds a valid worksheet name (max 31 characters) from a title.
#[must_use]
pub fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !INVALID_SHEET_CHARS.contains(c))
        .take(31)
        .collect();
    let trimmed = cleaned.trim().trim_matches('\'');
    if trimmed.is_empty() {
        "Report".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Renders a table as a single-sheet workbook.
///
/// Rows 0-2 hold company, title and subtitle; the column header is at
/// [`HEADER_ROW`]; data follows. Amounts are stored as numbers with a
/// two-decimal format.
///
/// # Errors
///
/// Returns an error if the workbook cannot be built.
pub fn render(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(14);
    let bold = Format::new().set_bold();
    let header_format = Format::new()
        .set_bold()
        .set_border_bottom(FormatBorder::Thin);
    let header_numeric = header_format.clone().set_align(FormatAlign::Right);
    let amount = Format::new()
        .set_num_format(AMOUNT_FORMAT)
        .set_align(FormatAlign::Right);
    let amount_bold = amount.clone().set_bold();
    let amount_total = amount_bold.clone().set_border_top(FormatBorder::Thin);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&table.title))?;

    worksheet.write_string_with_format(0, 0, &table.company_name, &bold)?;
    worksheet.write_string_with_format(1, 0, &table.title, &title_format)?;
    worksheet.write_string(2, 0, &table.subtitle)?;

    for (index, column) in table.columns.iter().enumerate() {
        let col = column_index(index);
        let format = if column.numeric {
            &header_numeric
        } else {
            &header_format
        };
        worksheet.write_string_with_format(HEADER_ROW, col, &column.header, format)?;
        worksheet.set_column_width(col, f64::from(u16::try_from(column.width).unwrap_or(60)))?;
    }

    let mut row = HEADER_ROW + 1;
    for table_row in &table.rows {
        for (index, cell) in table_row.cells.iter().enumerate() {
            let col = column_index(index);
            match cell {
                Cell::Text(text) if table_row.style.is_bold() => {
                    worksheet.write_string_with_format(row, col, text, &bold)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                Cell::Amount(value) => {
                    let format = match table_row.style {
                        RowStyle::Total => &amount_total,
                        RowStyle::Subtotal | RowStyle::Header => &amount_bold,
                        RowStyle::Line | RowStyle::Blank => &amount,
                    };
                    worksheet.write_number_with_format(
                        row,
                        col,
                        value.to_f64().unwrap_or_default(),
                        format,
                    )?;
                }
                Cell::Empty => {}
            }
        }
        row += 1;
    }

    row += 1;
    for note in &table.notes {
        worksheet.write_string(row, 0, note)?;
        row += 1;
    }

    Ok(workbook.save_to_buffer()?)
}

fn column_index(index: usize) -> u16 {
    u16::try_from(index).unwrap_or(u16::MAX)
}
