//! PDF rendering with `printpdf`.
//!
//! Rendering happens in two passes. [`layout_pdf`] places every text run on
//! a page using estimated Helvetica metrics (points, origin at the top-left
//! corner); [`render_pdf`] then draws the placed runs with the built-in
//! Helvetica fonts. Keeping placement separate makes pagination testable
//! without parsing PDF output.

use chrono::{DateTime, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::{CATEGORY_HEADER, ReportData, ReportRequest, format_number, generated_line};
use crate::error::AppError;

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const MARGIN: f32 = 50.0;

const TITLE_FONT_SIZE: f32 = 16.0;
const BODY_FONT_SIZE: f32 = 12.0;
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Horizontal padding subtracted from table columns before wrapping.
const CELL_PADDING: f32 = 10.0;
/// Vertical gap after each table row.
const ROW_GAP: f32 = 10.0;
/// Minimum advance after the table header row.
const HEADER_ADVANCE: f32 = 30.0;

/// Column width and minimum row advance for the series layout.
const SERIES_COLUMN_WIDTH: f32 = 150.0;
const SERIES_ROW_ADVANCE: f32 = 20.0;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// A text run placed on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedText {
    pub text: String,
    /// Left edge, in points from the left page border.
    pub x: f32,
    /// Top edge, in points from the top page border.
    pub y: f32,
    pub size: f32,
    pub bold: bool,
}

/// All text runs of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfPage {
    pub items: Vec<PlacedText>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Column geometry for one grid.
struct Grid {
    /// `(x, width)` of each column's text box.
    columns: Vec<(f32, f32)>,
    align: Align,
    min_advance: f32,
}

/// Accumulates pages while tracking the vertical cursor.
struct PageWriter {
    pages: Vec<PdfPage>,
    y: f32,
}

impl PageWriter {
    fn new() -> Self {
        Self {
            pages: vec![PdfPage::default()],
            y: MARGIN,
        }
    }

    fn push(&mut self, item: PlacedText) {
        if let Some(page) = self.pages.last_mut() {
            page.items.push(item);
        }
    }

    fn new_page(&mut self) {
        self.pages.push(PdfPage::default());
        self.y = MARGIN;
    }

    /// Writes text centered between the margins, wrapping as needed, and
    /// advances past it plus an empty line.
    fn centered_paragraph(&mut self, text: &str, size: f32, bold: bool) {
        for line in wrap_text(text, PAGE_WIDTH - 2.0 * MARGIN, size) {
            let width = text_width(&line, size);
            self.push(PlacedText {
                text: line,
                x: ((PAGE_WIDTH - width) / 2.0).max(MARGIN),
                y: self.y,
                size,
                bold,
            });
            self.y += line_height(size);
        }
        self.y += line_height(size);
    }

    /// Writes one grid row. A new page is started first when the row would
    /// cross the bottom margin, unless the page has no rows yet.
    fn row(&mut self, grid: &Grid, cells: &[String], bold: bool) -> f32 {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(&grid.columns)
            .map(|(cell, (_, width))| wrap_text(cell, *width, BODY_FONT_SIZE))
            .collect();
        let height = wrapped
            .iter()
            .map(|lines| lines.len() as f32 * line_height(BODY_FONT_SIZE))
            .fold(line_height(BODY_FONT_SIZE), f32::max);

        if self.y + height > PAGE_HEIGHT - MARGIN && self.y > MARGIN {
            self.new_page();
        }

        for (lines, (x, width)) in wrapped.iter().zip(&grid.columns) {
            for (i, line) in lines.iter().enumerate() {
                let offset = match grid.align {
                    Align::Left => 0.0,
                    Align::Center => ((width - text_width(line, BODY_FONT_SIZE)) / 2.0).max(0.0),
                };
                self.push(PlacedText {
                    text: line.clone(),
                    x: x + offset,
                    y: self.y + i as f32 * line_height(BODY_FONT_SIZE),
                    size: BODY_FONT_SIZE,
                    bold,
                });
            }
        }

        height
    }
}

/// Places every text run of the report.
pub fn layout_pdf(request: &ReportRequest, generated_at: DateTime<Utc>) -> Vec<PdfPage> {
    let mut writer = PageWriter::new();
    writer.centered_paragraph(&request.title.to_uppercase(), TITLE_FONT_SIZE, true);
    writer.centered_paragraph(&generated_line(generated_at), BODY_FONT_SIZE, false);

    let (header, rows) = table_rows(request);
    let grid = grid_for(request, &header, &rows);

    let header_height = writer.row(&grid, &header, true);
    writer.y += (header_height + ROW_GAP).max(HEADER_ADVANCE);

    for row in &rows {
        let height = writer.row(&grid, row, false);
        writer.y += (height + ROW_GAP).max(grid.min_advance);
    }

    writer.pages
}

/// Renders the report as an A4 PDF document.
pub fn render_pdf(
    request: &ReportRequest,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, AppError> {
    let pages = layout_pdf(request, generated_at);

    let page_w = Mm(PAGE_WIDTH * PT_TO_MM);
    let page_h = Mm(PAGE_HEIGHT * PT_TO_MM);
    let (doc, first_page, first_layer) =
        PdfDocument::new(&request.title, page_w, page_h, "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_idx, layer_idx) = doc.add_page(page_w, page_h, "Layer 1");
            doc.get_page(page_idx).get_layer(layer_idx)
        };

        for item in &page.items {
            let font = if item.bold { &bold } else { &regular };
            // printpdf places the baseline from the bottom-left corner.
            let baseline = PAGE_HEIGHT - item.y - item.size;
            layer.use_text(
                item.text.as_str(),
                item.size,
                Mm(item.x * PT_TO_MM),
                Mm(baseline * PT_TO_MM),
                font,
            );
        }
    }

    let bytes = doc.save_to_bytes()?;
    Ok(bytes)
}

/// Header and body rows as printed in the PDF.
///
/// The series shape is transposed relative to the spreadsheet: one column
/// per series and one row per label.
fn table_rows(request: &ReportRequest) -> (Vec<String>, Vec<Vec<String>>) {
    match &request.data {
        ReportData::Table(rows) => (request.labels.clone(), rows.clone()),
        ReportData::Series(series) => {
            let mut header = vec![CATEGORY_HEADER.to_string()];
            header.extend(series.iter().map(|s| s.name.clone()));

            let rows = request
                .labels
                .iter()
                .enumerate()
                .map(|(i, label)| {
                    let mut row = vec![label.clone()];
                    row.extend(series.iter().map(|s| {
                        s.values
                            .get(i)
                            .copied()
                            .flatten()
                            .map(format_number)
                            .unwrap_or_default()
                    }));
                    row
                })
                .collect();
            (header, rows)
        }
    }
}

fn grid_for(request: &ReportRequest, header: &[String], rows: &[Vec<String>]) -> Grid {
    let count = rows
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
        .max(1);

    match request.data {
        ReportData::Table(_) => {
            let column_width = (PAGE_WIDTH - 2.0 * MARGIN) / count as f32;
            Grid {
                columns: (0..count)
                    .map(|i| (MARGIN + i as f32 * column_width, column_width - CELL_PADDING))
                    .collect(),
                align: Align::Center,
                min_advance: 0.0,
            }
        }
        ReportData::Series(_) => Grid {
            columns: (0..count)
                .map(|i| (MARGIN + i as f32 * SERIES_COLUMN_WIDTH, SERIES_COLUMN_WIDTH))
                .collect(),
            align: Align::Left,
            min_advance: SERIES_ROW_ADVANCE,
        },
    }
}

fn line_height(size: f32) -> f32 {
    size * LINE_HEIGHT_FACTOR
}

/// Helvetica advance widths for printable ASCII, in 1/1000 em.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Width used for characters outside printable ASCII.
const DEFAULT_WIDTH: u16 = 556;

fn char_width(c: char, size: f32) -> f32 {
    let units = match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    };
    f32::from(units) * size / 1000.0
}

/// Estimated width of `text` at `size` points.
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, size)).sum()
}

/// Greedy word wrap. Words wider than `max_width` are split by character.
/// Always returns at least one line.
pub(crate) fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            for c in word.chars() {
                let overflows = text_width(&current, size) + char_width(c, size) > max_width;
                if !current.is_empty() && overflows {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(c);
            }
        }
        lines.push(current);
    }

    lines
}
