//! Report requests and their rendering to spreadsheet and PDF documents.
//!
//! A [`ReportRequest`] carries either literal table rows or named numeric
//! series aligned to shared category labels. [`ReportLayout`] arranges a
//! request into the row grid both output formats start from:
//!
//! | Row | Table shape | Series shape |
//! |-----|-------------|--------------|
//! | 1 | uppercased title | uppercased title |
//! | 2 | generation line | generation line |
//! | 3 | blank | blank |
//! | 4 | labels | `Category`, labels... |
//! | 5.. | table rows verbatim | series name, values... |
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use polizas_core::report::{ReportData, ReportFormat, ReportRequest, Series, render};
//!
//! let request = ReportRequest::new(
//!     "premiums",
//!     "Primas por Compañía",
//!     vec!["Compañía1".to_string(), "Compañía2".to_string()],
//!     ReportData::Series(vec![Series::new("Prima", vec![Some(1500.0), Some(900.0)])]),
//! );
//! let bytes = render(&request, ReportFormat::Xlsx, Utc::now()).unwrap();
//! assert_eq!(&bytes[..2], b"PK");
//! ```

mod pdf;
mod xlsx;

pub use pdf::{PdfPage, PlacedText, layout_pdf, render_pdf};
pub use xlsx::{render_xlsx, sheet_name};

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// Section tag selecting the table shape.
pub const TABLE_SECTION: &str = "table";

/// First cell of the series-shape header row.
pub const CATEGORY_HEADER: &str = "Category";

/// Zero-based index of the header row in a [`ReportLayout`].
pub const HEADER_ROW: usize = 3;

/// Output document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Pdf,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Pdf => "pdf",
        }
    }
}

/// One named numeric sequence, aligned by position to the report labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Report payload: literal rows, or series aligned to the labels.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportData {
    Table(Vec<Vec<String>>),
    Series(Vec<Series>),
}

/// Transient description of a document to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub section: String,
    pub title: String,
    pub labels: Vec<String>,
    pub data: ReportData,
}

impl ReportRequest {
    pub fn new(
        section: impl Into<String>,
        title: impl Into<String>,
        labels: Vec<String>,
        data: ReportData,
    ) -> Self {
        Self {
            section: section.into(),
            title: title.into(),
            labels,
            data,
        }
    }

    /// Attachment file name, e.g. `reporte-table.pdf`.
    pub fn file_name(&self, format: ReportFormat) -> String {
        let section: String = self
            .section
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("reporte-{}.{}", section, format.extension())
    }
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// Which layout rule produced a [`ReportLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportShape {
    Table,
    Series,
}

/// Row grid shared by the renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    pub shape: ReportShape,
    pub rows: Vec<Vec<Cell>>,
}

impl ReportLayout {
    pub fn build(request: &ReportRequest, generated_at: DateTime<Utc>) -> Self {
        let mut rows = vec![
            vec![Cell::Text(request.title.to_uppercase())],
            vec![Cell::Text(generated_line(generated_at))],
            Vec::new(),
        ];

        let shape = match &request.data {
            ReportData::Table(table) => {
                rows.push(request.labels.iter().map(|l| Cell::Text(l.clone())).collect());
                rows.extend(
                    table
                        .iter()
                        .map(|row| row.iter().map(|c| Cell::Text(c.clone())).collect()),
                );
                ReportShape::Table
            }
            ReportData::Series(series) => {
                let mut header = vec![Cell::from(CATEGORY_HEADER)];
                header.extend(request.labels.iter().map(|l| Cell::Text(l.clone())));
                rows.push(header);
                rows.extend(series.iter().map(|s| {
                    let mut row = vec![Cell::Text(s.name.clone())];
                    row.extend(s.values.iter().map(|v| match v {
                        Some(n) => Cell::Number(*n),
                        None => Cell::Empty,
                    }));
                    row
                }));
                ReportShape::Series
            }
        };

        Self { shape, rows }
    }

    /// Widest row, in cells.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Renders a request to the given format.
pub fn render(
    request: &ReportRequest,
    format: ReportFormat,
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, AppError> {
    match format {
        ReportFormat::Xlsx => render_xlsx(request, generated_at),
        ReportFormat::Pdf => render_pdf(request, generated_at),
    }
}

pub(crate) fn generated_line(generated_at: DateTime<Utc>) -> String {
    format!("Generated on {}", generated_at.format("%d/%m/%Y %H:%M UTC"))
}

/// Formats a value the way chart data prints: integers without a
/// fractional part.
pub(crate) fn format_number(n: f64) -> String {
    format!("{}", n)
}
