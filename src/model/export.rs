//! Export encoder
//!
//! Turns the filtered+sorted rows into a downloadable artifact. Column
//! labels (in display order) are the external field names. Each format
//! carries its own encoder; a host-supplied [`ExportHandler`] replaces the
//! built-in encoders entirely.

use super::column::ColumnDescriptor;
use super::value::{Row, Value};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("export handler failed: {0}")]
    Handler(String),
}

/// Export formats offered by the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    /// Spreadsheet export, encoded as structured JSON
    Excel,
    /// Document export, encoded as an aligned plain-text table
    Pdf,
}

impl ExportFormat {
    pub fn all() -> [ExportFormat; 3] {
        [ExportFormat::Csv, ExportFormat::Excel, ExportFormat::Pdf]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
            ExportFormat::Pdf => "PDF",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "json",
            ExportFormat::Pdf => "txt",
        }
    }

    pub fn encode(&self, columns: &[ColumnDescriptor], rows: &[&Row]) -> Result<String, ExportError> {
        match self {
            ExportFormat::Csv => Ok(encode_csv(columns, rows)),
            ExportFormat::Excel => encode_json(columns, rows),
            ExportFormat::Pdf => Ok(encode_text(columns, rows)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Header row of labels, then one line per row. Text values are quoted
/// (embedded quotes doubled), other values are written as-is.
pub fn encode_csv(columns: &[ColumnDescriptor], rows: &[&Row]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| c.label.as_str())
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| match row.get(&c.key) {
                Value::Text(s) => format!("\"{}\"", s.replace('"', "\"\"")),
                other => other.to_string(),
            })
            .collect();
        lines.push(fields.join(","));
    }
    lines.join("\n")
}

/// Pretty JSON array of objects keyed by label, fields in column order
pub fn encode_json(columns: &[ColumnDescriptor], rows: &[&Row]) -> Result<String, ExportError> {
    let records: Vec<serde_json::Map<String, serde_json::Value>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| (c.label.clone(), serde_json::Value::from(row.get(&c.key))))
                .collect()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Plain-text table with padded columns, using each column's cell format
pub fn encode_text(columns: &[ColumnDescriptor], rows: &[&Row]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| c.render_cell(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].width())
                .chain(std::iter::once(c.label.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pad = |text: &str, width: usize| format!("{}{}", text, " ".repeat(width - text.width()));

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&c.label, *w))
        .collect();
    lines.push(header.join(" | ").trim_end().to_string());
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in &cells {
        let padded: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        lines.push(padded.join(" | ").trim_end().to_string());
    }
    lines.join("\n")
}

/// An encoded export ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub contents: String,
    pub row_count: usize,
}

/// What a custom export handler receives
pub struct ExportRequest<'a> {
    pub format: ExportFormat,
    pub columns: &'a [ColumnDescriptor],
    pub rows: Vec<&'a Row>,
    /// True when `rows` is the user's selection rather than the whole view
    pub selection_only: bool,
}

/// Host-supplied export strategy that replaces the built-in encoders
pub trait ExportHandler {
    fn export(&mut self, request: &ExportRequest<'_>) -> Result<(), ExportError>;
}

/// Runs of characters that cannot appear in a slug
static NON_SLUG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Lowercase, hyphen-separated form of a name, safe for file names
pub fn slugify(name: &str) -> String {
    NON_SLUG_REGEX
        .replace_all(&name.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// `data.<ext>` for the default path
pub fn default_file_name(format: ExportFormat) -> String {
    format!("data.{}", format.extension())
}

/// `<prefix>-<slug>.<ext>` for named artifacts, falling back to `<prefix>.<ext>`
pub fn named_file_name(prefix: &str, name: &str, extension: &str) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("{}.{}", prefix, extension)
    } else {
        format!("{}-{}.{}", prefix, slug, extension)
    }
}
