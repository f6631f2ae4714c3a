//! PDF rendering.
//!
//! Uses the built-in Courier fonts so every character is 6pt wide at 10pt;
//! column positions and right alignment are plain integer arithmetic.
//! Amount columns widen to fit their widest value or header, and are never
//! cut; only text columns truncate. Tables wider than a portrait page switch
//! to landscape.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use sgbooks_shared::types::format_amount;

use super::error::ExportError;
use super::layout::{Cell, ReportTable, RowStyle};

const PORTRAIT: (i64, i64) = (595, 842);
const MARGIN: i64 = 40;
const FONT_SIZE: i64 = 10;
const CHAR_WIDTH: i64 = 6;
const LEADING: i64 = 14;
const COLUMN_GAP: usize = 1;
const BOTTOM: i64 = 60;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

struct PageLayout {
    width: i64,
    height: i64,
    /// Left x of each column.
    offsets: Vec<i64>,
    /// Rendered width of each column in characters.
    widths: Vec<usize>,
}

impl PageLayout {
    fn for_table(table: &ReportTable) -> Self {
        let widths = column_widths(table);
        let total_chars: usize = widths.iter().map(|w| w + COLUMN_GAP).sum();
        let needed = to_points(total_chars) + 2 * MARGIN;
        let (width, height) = if needed > PORTRAIT.0 {
            (PORTRAIT.1, PORTRAIT.0)
        } else {
            PORTRAIT
        };

        let mut offsets = Vec::with_capacity(widths.len());
        let mut x = MARGIN;
        for width in &widths {
            offsets.push(x);
            x += to_points(width + COLUMN_GAP);
        }

        Self {
            width,
            height,
            offsets,
            widths,
        }
    }
}

/// Character width of each column: the declared width, widened for amount
/// columns to their longest formatted amount or header.
fn column_widths(table: &ReportTable) -> Vec<usize> {
    table
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            if !column.numeric {
                return column.width;
            }
            table
                .rows
                .iter()
                .filter_map(|row| match row.cells.get(index) {
                    Some(Cell::Amount(amount)) => Some(format_amount(*amount).chars().count()),
                    _ => None,
                })
                .chain([column.width, column.header.chars().count()])
                .max()
                .unwrap_or(column.width)
        })
        .collect()
}

fn to_points(chars: usize) -> i64 {
    i64::try_from(chars).unwrap_or(i64::MAX / CHAR_WIDTH) * CHAR_WIDTH
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, value: &str) {
    let printable: String = value
        .chars()
        .map(|c| if c.is_ascii() { c } else { '?' })
        .collect();
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)],
    ));
    ops.push(Operation::new(
        "Td",
        vec![Object::Integer(x), Object::Integer(y)],
    ));
    ops.push(Operation::new("Tj", vec![Object::string_literal(printable)]));
    ops.push(Operation::new("ET", vec![]));
}

fn rule(ops: &mut Vec<Operation>, x1: i64, x2: i64, y: i64) {
    ops.push(Operation::new("m", vec![Object::Integer(x1), Object::Integer(y)]));
    ops.push(Operation::new("l", vec![Object::Integer(x2), Object::Integer(y)]));
    ops.push(Operation::new("S", vec![]));
}

fn truncate(value: &str, width: usize) -> String {
    value.chars().take(width).collect()
}

/// Starts a page with the report heading and column headers; returns the
/// operations and the y of the first data row.
fn start_page(table: &ReportTable, layout: &PageLayout) -> (Vec<Operation>, i64) {
    let mut ops = Vec::new();
    let mut y = layout.height - MARGIN;

    text(&mut ops, BOLD, 12, MARGIN, y, &table.company_name);
    y -= 18;
    text(&mut ops, BOLD, 14, MARGIN, y, &table.title);
    y -= 16;
    text(&mut ops, REGULAR, FONT_SIZE, MARGIN, y, &table.subtitle);
    y -= LEADING * 2;

    for ((column, x), width) in table.columns.iter().zip(&layout.offsets).zip(&layout.widths) {
        let header = truncate(&column.header, *width);
        let x = if column.numeric {
            x + to_points(width - header.chars().count())
        } else {
            *x
        };
        text(&mut ops, BOLD, FONT_SIZE, x, y, &header);
    }
    rule(&mut ops, MARGIN, layout.width - MARGIN, y - 4);
    y -= LEADING + 2;

    (ops, y)
}

/// Renders a table as a PDF document.
///
/// # Errors
///
/// Returns an error if content encoding or serialization fails.
pub fn render(table: &ReportTable) -> Result<Vec<u8>, ExportError> {
    let layout = PageLayout::for_table(table);

    let mut pages: Vec<Vec<Operation>> = Vec::new();
    let (mut ops, mut y) = start_page(table, &layout);

    for row in &table.rows {
        if y < BOTTOM {
            pages.push(ops);
            (ops, y) = start_page(table, &layout);
        }

        let font = if row.style.is_bold() { BOLD } else { REGULAR };
        for ((cell, x), width) in row.cells.iter().zip(&layout.offsets).zip(&layout.widths) {
            match cell {
                Cell::Text(value) => {
                    let value = truncate(value, *width);
                    text(&mut ops, font, FONT_SIZE, *x, y, &value);
                }
                Cell::Amount(amount) => {
                    let value = format_amount(*amount);
                    let shift = to_points(width.saturating_sub(value.chars().count()));
                    text(&mut ops, font, FONT_SIZE, x + shift, y, &value);
                    if row.style == RowStyle::Total {
                        rule(&mut ops, *x, x + to_points(*width), y + LEADING - 3);
                    }
                }
                Cell::Empty => {}
            }
        }
        y -= LEADING;
    }

    if !table.notes.is_empty() {
        if y < BOTTOM + LEADING {
            pages.push(ops);
            (ops, y) = start_page(table, &layout);
        }
        y -= LEADING;
        for note in &table.notes {
            text(&mut ops, REGULAR, FONT_SIZE, MARGIN, y, note);
            y -= LEADING;
        }
    }
    pages.push(ops);

    let page_count = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        let footer = format!("Page {} of {page_count}", index + 1);
        let x = layout.width - MARGIN - to_points(footer.len());
        text(page, REGULAR, 8, x, MARGIN / 2, &footer);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids = Vec::with_capacity(page_count);
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(i64::try_from(page_count).unwrap_or(i64::MAX)),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(layout.width),
            Object::Integer(layout.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
