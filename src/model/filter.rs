//! Row filter engine
//!
//! A row survives when it matches the search term (if any) AND every active
//! per-column filter entry. Evaluation never fails; rows that cannot be
//! compared are simply excluded.

use super::column::FilterType;
use super::value::{Row, Value};
use std::collections::BTreeMap;

/// Operators for text filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextOperator {
    Contains,
    #[default]
    Equals,
}

/// Operators for number filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberOperator {
    #[default]
    Equals,
    GreaterThan,
    LessThan,
}

impl NumberOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            NumberOperator::Equals => "=",
            NumberOperator::GreaterThan => ">",
            NumberOperator::LessThan => "<",
        }
    }
}

/// One typed per-column constraint
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEntry {
    Text {
        value: String,
        operator: TextOperator,
    },
    Select {
        values: Vec<Value>,
    },
    /// Raw input text; coerced to a number at evaluation time
    Number {
        value: String,
        operator: NumberOperator,
    },
    Range {
        min: f64,
        max: f64,
    },
    /// Recognised but never evaluated
    Date {
        value: String,
    },
}

impl FilterEntry {
    pub fn filter_type(&self) -> FilterType {
        match self {
            FilterEntry::Text { .. } => FilterType::Text,
            FilterEntry::Select { .. } => FilterType::Select,
            FilterEntry::Number { .. } => FilterType::Number,
            FilterEntry::Range { .. } => FilterType::Range,
            FilterEntry::Date { .. } => FilterType::Date,
        }
    }

    /// Entries with an empty value behave as if absent
    pub fn is_active(&self) -> bool {
        match self {
            FilterEntry::Text { value, .. } => !value.is_empty(),
            FilterEntry::Select { values } => !values.is_empty(),
            FilterEntry::Number { value, .. } => !value.is_empty(),
            FilterEntry::Range { .. } => true,
            FilterEntry::Date { value } => !value.is_empty(),
        }
    }

    /// Whether a single cell satisfies this entry
    pub fn matches(&self, cell: &Value) -> bool {
        match self {
            FilterEntry::Text { value, operator } => {
                let Some(text) = cell.as_search_text() else {
                    return false;
                };
                let text = text.to_lowercase();
                let needle = value.to_lowercase();
                match operator {
                    TextOperator::Contains => text.contains(&needle),
                    TextOperator::Equals => text == needle,
                }
            }
            FilterEntry::Select { values } => values.contains(cell),
            FilterEntry::Number { value, operator } => {
                let n = cell.to_number();
                let target = Value::Text(value.clone()).to_number();
                match operator {
                    NumberOperator::GreaterThan => n > target,
                    NumberOperator::LessThan => n < target,
                    NumberOperator::Equals => n == target,
                }
            }
            FilterEntry::Range { min, max } => {
                let n = cell.to_number();
                *min <= n && n <= *max
            }
            FilterEntry::Date { .. } => true,
        }
    }

    /// Short human description, e.g. `> 10` or `contains "ann"`
    pub fn describe(&self) -> String {
        match self {
            FilterEntry::Text { value, operator } => match operator {
                TextOperator::Contains => format!("contains \"{}\"", value),
                TextOperator::Equals => format!("= \"{}\"", value),
            },
            FilterEntry::Select { values } => {
                let names: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("in [{}]", names.join(", "))
            }
            FilterEntry::Number { value, operator } => format!("{} {}", operator.symbol(), value),
            FilterEntry::Range { min, max } => format!("{}..{}", min, max),
            FilterEntry::Date { value } => format!("date {} (unsupported)", value),
        }
    }
}

/// Active filter entries keyed by column key
pub type Filters = BTreeMap<String, FilterEntry>;

/// Case-insensitive match of the search term against any displayed column
pub fn matches_search(row: &Row, columns: &[String], term: &str) -> bool {
    let term = term.to_lowercase();
    columns
        .iter()
        .filter_map(|key| row.get(key).as_search_text())
        .any(|text| text.to_lowercase().contains(&term))
}

/// Whether a row passes the search term and all active filters
pub fn row_matches(row: &Row, columns: &[String], search: Option<&str>, filters: &Filters) -> bool {
    if let Some(term) = search {
        if !term.is_empty() && !matches_search(row, columns, term) {
            return false;
        }
    }

    filters
        .iter()
        .filter(|(_, entry)| entry.is_active())
        .all(|(key, entry)| entry.matches(row.get(key)))
}

/// Indices of the rows that survive filtering, in source order.
///
/// The search term only looks at `columns`; fields the table does not show
/// never make a row match.
pub fn apply_filters(
    rows: &[Row],
    columns: &[String],
    search: Option<&str>,
    filters: &Filters,
) -> Vec<usize> {
    if filters.values().any(|e| e.is_active() && e.filter_type() == FilterType::Date) {
        log::warn!("date filters are not evaluated; the entry is ignored");
    }

    rows.iter()
        .enumerate()
        .filter(|(_, row)| row_matches(row, columns, search, filters))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Vec<Row> {
        vec![
            Row::new().with("name", "Alice").with("age", 30.0).with("team", "red"),
            Row::new().with("name", "Bob").with("age", 25.0).with("team", "blue"),
            Row::new().with("name", "alicia").with("age", "n/a").with("team", "red"),
            Row::new().with("age", 41.0).with("team", "green"),
        ]
    }

    fn keys() -> Vec<String> {
        vec!["name".to_string(), "age".to_string(), "team".to_string()]
    }

    fn text(value: &str, operator: TextOperator) -> FilterEntry {
        FilterEntry::Text {
            value: value.to_string(),
            operator,
        }
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_columns() {
        let rows = people();
        assert_eq!(apply_filters(&rows, &keys(), Some("ALI"), &Filters::new()), vec![0, 2]);
        assert_eq!(apply_filters(&rows, &keys(), Some("green"), &Filters::new()), vec![3]);
        assert_eq!(apply_filters(&rows, &keys(), Some("25"), &Filters::new()), vec![1]);
    }

    #[test]
    fn test_search_ignores_fields_without_a_column() {
        let rows = vec![
            Row::new().with("name", "Alice").with("secret", "needle"),
            Row::new().with("name", "needle in name"),
        ];
        let columns = vec!["name".to_string()];
        assert_eq!(apply_filters(&rows, &columns, Some("needle"), &Filters::new()), vec![1]);
        assert!(!matches_search(&rows[0], &columns, "needle"));
    }

    #[test]
    fn test_empty_search_is_skipped() {
        let rows = people();
        assert_eq!(apply_filters(&rows, &keys(), Some(""), &Filters::new()).len(), 4);
        assert_eq!(apply_filters(&rows, &keys(), None, &Filters::new()).len(), 4);
    }

    #[test]
    fn test_text_filter_operators() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert("name".into(), text("ali", TextOperator::Contains));
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![0, 2]);

        filters.insert("name".into(), text("alice", TextOperator::Equals));
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![0]);
    }

    #[test]
    fn test_null_never_matches_text_filter() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert("name".into(), text("-", TextOperator::Contains));
        assert!(apply_filters(&rows, &keys(), None, &filters).is_empty());
    }

    #[test]
    fn test_select_filter_membership() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert(
            "team".into(),
            FilterEntry::Select {
                values: vec![Value::from("red"), Value::from("green")],
            },
        );
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![0, 2, 3]);
    }

    #[test]
    fn test_number_filter_excludes_unparseable_cells() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert(
            "age".into(),
            FilterEntry::Number {
                value: "26".into(),
                operator: NumberOperator::GreaterThan,
            },
        );
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![0, 3]);

        filters.insert(
            "age".into(),
            FilterEntry::Number {
                value: "26".into(),
                operator: NumberOperator::LessThan,
            },
        );
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![1]);

        filters.insert(
            "age".into(),
            FilterEntry::Number {
                value: "30".into(),
                operator: NumberOperator::Equals,
            },
        );
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![0]);
    }

    #[test]
    fn test_unparseable_filter_value_excludes_everything() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert(
            "age".into(),
            FilterEntry::Number {
                value: "abc".into(),
                operator: NumberOperator::Equals,
            },
        );
        assert!(apply_filters(&rows, &keys(), None, &filters).is_empty());
    }

    #[test]
    fn test_range_filter_is_inclusive() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert("age".into(), FilterEntry::Range { min: 25.0, max: 30.0 });
        assert_eq!(apply_filters(&rows, &keys(), None, &filters), vec![0, 1]);
    }

    #[test]
    fn test_date_filter_is_a_no_op() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert(
            "name".into(),
            FilterEntry::Date {
                value: "2024-01-01".into(),
            },
        );
        assert_eq!(apply_filters(&rows, &keys(), None, &filters).len(), rows.len());
    }

    #[test]
    fn test_empty_entries_have_no_effect() {
        let rows = people();
        let baseline = apply_filters(&rows, &keys(), Some("a"), &Filters::new());

        let mut filters = Filters::new();
        filters.insert("name".into(), text("", TextOperator::Contains));
        filters.insert("team".into(), FilterEntry::Select { values: vec![] });
        filters.insert(
            "age".into(),
            FilterEntry::Number {
                value: String::new(),
                operator: NumberOperator::GreaterThan,
            },
        );
        assert_eq!(apply_filters(&rows, &keys(), Some("a"), &filters), baseline);
    }

    #[test]
    fn test_adding_a_constraint_never_grows_the_result() {
        let rows = people();
        let mut filters = Filters::new();
        filters.insert("team".into(), FilterEntry::Select { values: vec![Value::from("red")] });
        let before = apply_filters(&rows, &keys(), None, &filters);

        let constraints = vec![
            ("name".to_string(), text("ali", TextOperator::Contains)),
            ("age".to_string(), FilterEntry::Range { min: 0.0, max: 100.0 }),
            (
                "age".to_string(),
                FilterEntry::Number {
                    value: "20".into(),
                    operator: NumberOperator::GreaterThan,
                },
            ),
        ];
        for (key, entry) in constraints {
            let mut narrowed = filters.clone();
            narrowed.insert(key, entry);
            let after = apply_filters(&rows, &keys(), None, &narrowed);
            assert!(after.iter().all(|i| before.contains(i)));
        }
    }
}
