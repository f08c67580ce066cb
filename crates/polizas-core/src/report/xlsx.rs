//! Spreadsheet rendering with `rust_xlsxwriter`.

use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use super::{Cell, HEADER_ROW, ReportLayout, ReportRequest, ReportShape};
use crate::error::AppError;

const TABLE_COLUMN_WIDTH: f64 = 20.0;
const SERIES_COLUMN_WIDTH: f64 = 15.0;
const TITLE_FONT_SIZE: f64 = 16.0;

/// Excel limits sheet names to 31 characters.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Converts a report title into a valid worksheet name.
///
/// Characters Excel rejects (`[]:*?/\`) become spaces; leading and trailing
/// apostrophes are removed; an empty result falls back to `Report`.
pub fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
            other => other,
        })
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();

    if cleaned.is_empty() {
        "Report".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Renders a request as a single-sheet workbook.
pub fn render_xlsx(
    request: &ReportRequest,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, AppError> {
    let layout = ReportLayout::build(request, generated_at);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name(&request.title))?;

    let (plain, title, header) = formats(layout.shape);
    let width = match layout.shape {
        ReportShape::Table => TABLE_COLUMN_WIDTH,
        ReportShape::Series => SERIES_COLUMN_WIDTH,
    };

    for col in 0..layout.column_count() {
        let col = column_index(col)?;
        worksheet.set_column_width(col, width)?;
        if layout.shape == ReportShape::Table {
            worksheet.set_column_format(col, &plain)?;
        }
    }

    for (row_idx, row) in layout.rows.iter().enumerate() {
        let format = match row_idx {
            0 => &title,
            HEADER_ROW => &header,
            _ => &plain,
        };
        let row_num = u32::try_from(row_idx)
            .map_err(|_| AppError::RenderError("Too many rows for a worksheet".to_string()))?;
        for (col_idx, cell) in row.iter().enumerate() {
            write_cell(worksheet, row_num, column_index(col_idx)?, cell, format)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

/// Plain, title and header formats for the given shape.
fn formats(shape: ReportShape) -> (Format, Format, Format) {
    let base = match shape {
        ReportShape::Table => Format::new().set_align(FormatAlign::Center),
        ReportShape::Series => Format::new(),
    };
    let title = base.clone().set_bold().set_font_size(TITLE_FONT_SIZE);
    let header = base.clone().set_bold();
    (base, title, header)
}

fn column_index(col: usize) -> Result<u16, AppError> {
    u16::try_from(col)
        .map_err(|_| AppError::RenderError("Too many columns for a worksheet".to_string()))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
) -> Result<(), AppError> {
    match cell {
        Cell::Text(text) => {
            worksheet.write_string_with_format(row, col, text, format)?;
        }
        Cell::Number(n) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        Cell::Empty => {}
    }
    Ok(())
}
