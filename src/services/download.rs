//! Artifact writer
//!
//! Saves artifacts produced by the built-in encoders into the export
//! directory, named per the configured naming scheme.

use crate::config::ExportNaming;
use crate::model::export::named_file_name;
use crate::model::{Artifact, ExportError};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// File name for an artifact under the given naming scheme
pub fn artifact_file_name(artifact: &Artifact, naming: ExportNaming, dataset: &str) -> String {
    match naming {
        ExportNaming::Plain => artifact.file_name.clone(),
        ExportNaming::Dataset => named_file_name("data", dataset, artifact.format.extension()),
    }
}

/// Write an artifact into `dir`, creating it if needed. Existing files
/// with the same name are overwritten.
pub fn write_artifact(
    dir: &Path,
    artifact: &Artifact,
    naming: ExportNaming,
    dataset: &str,
) -> Result<PathBuf, ExportError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(artifact_file_name(artifact, naming, dataset));
    fs::write(&path, &artifact.contents)?;
    log::info!(
        "wrote {} ({} rows) to {}",
        artifact.format,
        artifact.row_count,
        path.display()
    );
    Ok(path)
}

/// Status line shown after a successful save
pub fn saved_message(path: &Path, row_count: usize) -> String {
    format!(
        "Exported {} rows to {} at {}",
        row_count,
        path.display(),
        Local::now().format("%H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExportFormat;

    fn artifact() -> Artifact {
        Artifact {
            file_name: "data.csv".to_string(),
            format: ExportFormat::Csv,
            contents: "a,b\n1,2".to_string(),
            row_count: 1,
        }
    }

    #[test]
    fn test_naming_schemes() {
        assert_eq!(artifact_file_name(&artifact(), ExportNaming::Plain, "Q3 Sales"), "data.csv");
        assert_eq!(
            artifact_file_name(&artifact(), ExportNaming::Dataset, "Q3 Sales"),
            "data-q3-sales.csv"
        );
    }

    #[test]
    fn test_write_artifact_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("out");
        let path = write_artifact(&target, &artifact(), ExportNaming::Plain, "x").unwrap();
        assert_eq!(path, target.join("data.csv"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,b\n1,2");
    }

    #[test]
    fn test_saved_message_mentions_path_and_count() {
        let message = saved_message(Path::new("/tmp/data.csv"), 12);
        assert!(message.starts_with("Exported 12 rows to /tmp/data.csv at "));
    }
}
