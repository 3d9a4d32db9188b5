//! Dataset loading
//!
//! Reads row files (CSV, JSON, YAML) and optional column schema sidecars.

use crate::model::column::{infer_columns, ColumnDescriptor};
use crate::model::{Dataset, Row, TableView, Value};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("failed to parse JSON {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse YAML {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("{} must contain an array of objects", path.display())]
    Shape { path: PathBuf },
    #[error("unsupported file type: {}", path.display())]
    Unsupported { path: PathBuf },
}

/// Supported input file kinds, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Yaml,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<FileKind> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(FileKind::Csv),
            "json" => Some(FileKind::Json),
            "yaml" | "yml" => Some(FileKind::Yaml),
            _ => None,
        }
    }
}

/// Raw rows plus the field keys in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedRows {
    pub keys: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parse CSV: the header row defines the keys, cells are typed by inference
pub fn parse_csv<R: Read>(reader: R) -> Result<LoadedRows, csv::Error> {
    let mut reader = csv::Reader::from_reader(reader);

    let keys: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row = Row::new();
        for (key, cell) in keys.iter().zip(record.iter()) {
            row.insert(key.clone(), Value::infer(cell));
        }
        rows.push(row);
    }

    Ok(LoadedRows { keys, rows })
}

/// Turn an array of objects into rows. Returns None for any other shape.
pub fn parse_records(document: serde_json::Value) -> Option<LoadedRows> {
    let serde_json::Value::Array(items) = document else {
        return None;
    };

    let mut loaded = LoadedRows::default();
    for item in items {
        let serde_json::Value::Object(fields) = item else {
            return None;
        };
        let mut row = Row::new();
        for (key, value) in fields {
            if !loaded.keys.contains(&key) {
                loaded.keys.push(key.clone());
            }
            row.insert(key, Value::from(value));
        }
        loaded.rows.push(row);
    }
    Some(loaded)
}

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a structured (JSON or YAML) document into a generic value
fn read_document(path: &Path, kind: FileKind) -> Result<serde_json::Value, LoadError> {
    let contents = read_file(path)?;
    match kind {
        FileKind::Yaml => serde_yaml::from_str(&contents).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        _ => serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load rows from a CSV, JSON or YAML file
pub fn load_rows(path: &Path) -> Result<LoadedRows, LoadError> {
    let kind = FileKind::from_path(path).ok_or_else(|| LoadError::Unsupported {
        path: path.to_path_buf(),
    })?;

    match kind {
        FileKind::Csv => {
            let file = fs::File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_csv(file).map_err(|source| LoadError::Csv {
                path: path.to_path_buf(),
                source,
            })
        }
        FileKind::Json | FileKind::Yaml => {
            let document = read_document(path, kind)?;
            parse_records(document).ok_or_else(|| LoadError::Shape {
                path: path.to_path_buf(),
            })
        }
    }
}

/// Load column descriptors from a JSON or YAML schema file
pub fn load_schema(path: &Path) -> Result<Vec<ColumnDescriptor>, LoadError> {
    let contents = read_file(path)?;
    match FileKind::from_path(path) {
        Some(FileKind::Json) => serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some(FileKind::Yaml) => serde_yaml::from_str(&contents).map_err(|source| LoadError::Yaml {
            path: path.to_path_buf(),
            source,
        }),
        _ => Err(LoadError::Unsupported {
            path: path.to_path_buf(),
        }),
    }
}

/// Name shown on a dataset's tab
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Columns for loaded rows: the schema when given, otherwise inferred
pub fn columns_for(loaded: &LoadedRows, schema: Option<&[ColumnDescriptor]>) -> Vec<ColumnDescriptor> {
    match schema {
        Some(columns) => columns.to_vec(),
        None => infer_columns(&loaded.keys, &loaded.rows),
    }
}

/// Load a file into a ready-to-view dataset
pub fn load_dataset(
    path: &Path,
    schema: Option<&[ColumnDescriptor]>,
    page_size: usize,
) -> Result<Dataset, LoadError> {
    let loaded = load_rows(path)?;
    let columns = columns_for(&loaded, schema);
    log::info!(
        "loaded {} rows, {} columns from {}",
        loaded.rows.len(),
        columns.len(),
        path.display()
    );
    let table = TableView::new(columns, loaded.rows, page_size);
    Ok(Dataset::new(dataset_name(path), Some(path.to_path_buf()), table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterType;
    use std::io::Write;

    #[test]
    fn test_parse_csv_infers_types() {
        let data = "name,age,active\nAlice,30,true\nBob,,false\n";
        let loaded = parse_csv(data.as_bytes()).unwrap();

        assert_eq!(loaded.keys, vec!["name", "age", "active"]);
        assert_eq!(loaded.rows.len(), 2);
        assert_eq!(loaded.rows[0].get("age"), &Value::Number(30.0));
        assert_eq!(loaded.rows[0].get("active"), &Value::Bool(true));
        assert!(loaded.rows[1].get("age").is_null());
    }

    #[test]
    fn test_parse_csv_headers_only() {
        let loaded = parse_csv("a,b\n".as_bytes()).unwrap();
        assert_eq!(loaded.keys, vec!["a", "b"]);
        assert!(loaded.rows.is_empty());
    }

    #[test]
    fn test_parse_records_keeps_first_seen_key_order() {
        let doc = serde_json::json!([
            {"zeta": 1, "alpha": "x"},
            {"alpha": "y", "mid": null}
        ]);
        let loaded = parse_records(doc).unwrap();
        assert_eq!(loaded.keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(loaded.rows[1].get("alpha"), &Value::from("y"));
        assert!(loaded.rows[1].get("zeta").is_null());
    }

    #[test]
    fn test_parse_records_rejects_other_shapes() {
        assert!(parse_records(serde_json::json!({"a": 1})).is_none());
        assert!(parse_records(serde_json::json!([1, 2])).is_none());
    }

    #[test]
    fn test_load_yaml_dataset_with_inferred_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("team members.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "- name: Ann\n  score: 3\n- name: Bo\n  score: 5").unwrap();

        let dataset = load_dataset(&path, None, 10).unwrap();
        assert_eq!(dataset.name, "team members");
        assert_eq!(dataset.table.total_count(), 2);
        assert_eq!(dataset.table.column_keys(), vec!["name", "score"]);
        assert_eq!(
            dataset.table.column("score").and_then(|c| c.filter_type),
            Some(FilterType::Number)
        );
    }

    #[test]
    fn test_schema_overrides_inference() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("items.csv");
        fs::write(&data, "sku,price\nA1,9.5\n").unwrap();
        let schema = dir.path().join("schema.json");
        fs::write(
            &schema,
            r#"[{"key": "price", "label": "Price", "sortable": true}]"#,
        )
        .unwrap();

        let columns = load_schema(&schema).unwrap();
        let dataset = load_dataset(&data, Some(&columns), 10).unwrap();
        assert_eq!(dataset.table.column_keys(), vec!["price"]);
        assert_eq!(dataset.table.columns()[0].label, "Price");
    }

    #[test]
    fn test_unsupported_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "hello").unwrap();
        assert!(matches!(load_rows(&txt), Err(LoadError::Unsupported { .. })));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(load_rows(&missing), Err(LoadError::Io { .. })));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{\"not\": \"an array\"}").unwrap();
        assert!(matches!(load_rows(&bad), Err(LoadError::Shape { .. })));
    }
}
