//! Column descriptors
//!
//! A descriptor says how one row field is labeled, sorted, filtered and
//! rendered. Descriptors come from the host (schema sidecar or inference)
//! and are only ever permuted by the table, never created or destroyed.

use super::value::{Row, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Placeholder shown for null cells
pub const NULL_PLACEHOLDER: &str = "-";

/// Text alignment within a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Filter kinds a column can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    Text,
    Select,
    Number,
    Range,
    Date,
}

impl FilterType {
    pub fn name(&self) -> &'static str {
        match self {
            FilterType::Text => "text",
            FilterType::Select => "select",
            FilterType::Number => "number",
            FilterType::Range => "range",
            FilterType::Date => "date",
        }
    }
}

/// Cell rendering policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "digits")]
pub enum CellFormat {
    /// Null renders as a dash, everything else by string conversion
    #[default]
    Default,
    /// Numbers with a fixed number of decimals
    Fixed(u8),
    /// Fractions rendered as a percentage
    Percent,
    /// Booleans rendered as Yes/No
    YesNo,
    Uppercase,
}

impl CellFormat {
    pub fn render(&self, value: &Value) -> String {
        if value.is_null() {
            return NULL_PLACEHOLDER.to_string();
        }
        match self {
            CellFormat::Default => value.to_string(),
            CellFormat::Fixed(digits) => match value {
                Value::Number(n) => format!("{:.*}", *digits as usize, n),
                other => other.to_string(),
            },
            CellFormat::Percent => match value {
                Value::Number(n) => format!("{:.1}%", n * 100.0),
                other => other.to_string(),
            },
            CellFormat::YesNo => match value {
                Value::Bool(true) => "Yes".to_string(),
                Value::Bool(false) => "No".to_string(),
                other => other.to_string(),
            },
            CellFormat::Uppercase => value.to_string().to_uppercase(),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub width: Option<u16>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub filterable: bool,
    #[serde(default)]
    pub filter_type: Option<FilterType>,
    /// Choices offered by a select filter; derived from the data when absent
    #[serde(default)]
    pub filter_options: Option<Vec<String>>,
    #[serde(default)]
    pub format: CellFormat,
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            width: None,
            align: Align::Left,
            filterable: false,
            filter_type: None,
            filter_options: None,
            format: CellFormat::Default,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn filter(mut self, filter_type: FilterType) -> Self {
        self.filterable = true;
        self.filter_type = Some(filter_type);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn format(mut self, format: CellFormat) -> Self {
        self.format = format;
        self
    }

    /// Render this column's cell for a row
    pub fn render_cell(&self, row: &Row) -> String {
        self.format.render(row.get(&self.key))
    }

    /// Options for a select filter: explicit ones, or the distinct
    /// non-null values present in the rows.
    pub fn select_options(&self, rows: &[Row]) -> Vec<Value> {
        if let Some(ref options) = self.filter_options {
            return options.iter().map(|o| Value::infer(o)).collect();
        }
        let mut seen: BTreeSet<String> = BTreeSet::new();
        let mut options = Vec::new();
        for row in rows {
            let value = row.get(&self.key);
            if value.is_null() {
                continue;
            }
            if seen.insert(value.to_string()) {
                options.push(value.clone());
            }
        }
        options.sort_by(|a, b| a.compare(b));
        options
    }
}

/// Distinct values at or below this count make a text column a select filter
const SELECT_CARDINALITY: usize = 8;

/// Build descriptors for raw keys by looking at the data.
///
/// Every inferred column is sortable and filterable; numeric columns get a
/// number filter and right alignment, low-cardinality text columns a select
/// filter, everything else a text filter.
pub fn infer_columns(keys: &[String], rows: &[Row]) -> Vec<ColumnDescriptor> {
    keys.iter()
        .map(|key| {
            let present: Vec<&Value> = rows
                .iter()
                .map(|r| r.get(key))
                .filter(|v| !v.is_null())
                .collect();

            let numeric = !present.is_empty()
                && present.iter().all(|v| matches!(v, Value::Number(_)));
            let boolean =
                !present.is_empty() && present.iter().all(|v| matches!(v, Value::Bool(_)));
            let distinct: BTreeSet<String> = present.iter().map(|v| v.to_string()).collect();

            let column = ColumnDescriptor::new(key.clone(), humanize(key)).sortable();
            if numeric {
                column.filter(FilterType::Number).align(Align::Right)
            } else if boolean {
                column
                    .filter(FilterType::Select)
                    .format(CellFormat::YesNo)
                    .align(Align::Center)
            } else if !distinct.is_empty() && distinct.len() <= SELECT_CARDINALITY {
                column.filter(FilterType::Select)
            } else {
                column.filter(FilterType::Text)
            }
        })
        .collect()
}

/// Turn a field key like `first_name` into a label like `First Name`
pub fn humanize(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
