//! Output paths and CSV serialization

use crate::error::{Error, Result};
use crate::flatten::Table;
use crate::types::ExportKind;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Normalize a project or item name for use in a path
///
/// Lowercases and replaces every space with a hyphen; nothing else is changed.
///
/// # Examples
///
/// ```
/// use braintrust_export::writer::normalize_name;
///
/// assert_eq!(normalize_name("My Project 1"), "my-project-1");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

/// Directory holding every file exported for one project
pub fn project_dir(output_dir: &Path, project_name: &str) -> PathBuf {
    output_dir.join(normalize_name(project_name))
}

/// Full output path: `{output_dir}/{project}/{kind}_{item}.csv`
pub fn output_path(
    output_dir: &Path,
    project_name: &str,
    kind: ExportKind,
    item_name: &str,
) -> PathBuf {
    project_dir(output_dir, project_name).join(format!(
        "{}_{}.csv",
        kind.as_str(),
        normalize_name(item_name)
    ))
}

/// Write a table as CSV, replacing any existing file
///
/// The header row lists the column names; there is no index column. A table
/// without rows produces an empty file. A table with rows but no columns (every
/// key was excluded) gets one empty record per row and no header.
///
/// Returns the number of data rows written.
pub fn write_table(table: &Table, path: &Path) -> Result<usize> {
    let file = File::create(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    let mut buf = BufWriter::new(file);

    {
        let mut writer = csv::Writer::from_writer(&mut buf);
        if table.columns.is_empty() {
            for _ in &table.rows {
                writer.write_record([""])?;
            }
        } else {
            writer.write_record(&table.columns)?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
        }
        writer.flush().map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }

    buf.flush().map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(table.len())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn normalizes_case_and_spaces() {
        assert_eq!(normalize_name("My Project 1"), "my-project-1");
        assert_eq!(normalize_name("Demo"), "demo");
        assert_eq!(normalize_name("two  spaces"), "two--spaces");
        assert_eq!(normalize_name("Already-Hyphenated_Name"), "already-hyphenated_name");
    }

    #[test]
    fn builds_output_paths() {
        let base = Path::new("/exports");
        assert_eq!(project_dir(base, "My Project 1"), PathBuf::from("/exports/my-project-1"));
        assert_eq!(
            output_path(base, "Demo", ExportKind::Experiment, "Run A"),
            PathBuf::from("/exports/demo/experiment_run-a.csv")
        );
        assert_eq!(
            output_path(base, "My Project 1", ExportKind::Dataset, "Golden Set"),
            PathBuf::from("/exports/my-project-1/dataset_golden-set.csv")
        );
    }

    #[test]
    fn writes_header_and_rows_without_index() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("experiment_run-a.csv");

        let rows = write_table(&table(&["input", "output"], &[&["x", "y"]]), &path).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "input,output\nx,y\n");
    }

    #[test]
    fn quotes_cells_that_need_it() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");

        write_table(
            &table(&["text", "json"], &[&["a, b", r#"{"k":"v"}"#], &["line\nbreak", ""]]),
            &path,
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "text,json\n\"a, b\",\"{\"\"k\"\":\"\"v\"\"}\"\n\"line\nbreak\",\n"
        );
    }

    #[test]
    fn empty_table_writes_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dataset_empty.csv");

        let rows = write_table(&Table::default(), &path).unwrap();

        assert_eq!(rows, 0);
        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn rows_survive_when_every_column_is_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("experiment_bookkeeping.csv");
        let events: Vec<crate::types::Event> = vec![
            serde_json::from_value(serde_json::json!({"_xact_id": 1})).unwrap(),
            serde_json::from_value(serde_json::json!({"_xact_id": 2, "_pagination_key": "k"}))
                .unwrap(),
        ];
        let flattened = crate::flatten::flatten_events(&events, &crate::flatten::RESERVED_COLUMNS);
        assert!(flattened.columns.is_empty());

        let rows = write_table(&flattened, &path).unwrap();

        assert_eq!(rows, events.len());
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 2);
    }

    #[test]
    fn overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        fs::write(&path, "stale,content\n1,2\n3,4\n").unwrap();

        write_table(&table(&["a"], &[&["1"]]), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\n1\n");
    }

    #[test]
    fn missing_directory_is_a_write_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("out.csv");

        let err = write_table(&table(&["a"], &[&["1"]]), &path).unwrap_err();
        match err {
            Error::Write { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Write error, got {other:?}"),
        }
    }
}
