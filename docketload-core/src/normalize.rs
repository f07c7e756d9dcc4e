//! Row normalizer: CSV source → in-memory row set.
//!
//! Cells that hold a null marker become `None` before anything reaches the
//! store. Header order is kept as-is; matching it against a table contract
//! is the job of [`crate::tables::InsertStatement`].

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{Result, SourceError};

/// Cell values read as "absent". Blank and whitespace-only cells are
/// absent as well.
pub const NULL_MARKERS: &[&str] = &[
    "NaN", "nan", "-NaN", "-nan", "NA", "N/A", "n/a", "#N/A", "<NA>", "NULL", "null", "None",
];

pub fn is_null_marker(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || NULL_MARKERS.contains(&trimmed)
}

fn normalize_cell(raw: &str) -> Option<String> {
    if is_null_marker(raw) {
        None
    } else {
        Some(raw.to_owned())
    }
}

/// Loaded source: header plus rows of nullable cells, all rows padded to
/// header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of cells normalized to `None`
    pub fn null_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|cell| cell.is_none()).count())
            .sum()
    }
}

/// Read and normalize a CSV file.
pub fn read_csv(path: &Path) -> Result<RowSet> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            SourceError::not_found(path)
        } else {
            SourceError::io(path, err)
        }
    })?;
    read_csv_from(file, path)
}

/// Read and normalize CSV from any reader; `origin` is only used in errors.
pub fn read_csv_from<R: Read>(reader: R, origin: &Path) -> Result<RowSet> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|err| SourceError::csv(origin, err))?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_owned())
        .collect();

    if headers.is_empty() {
        debug!(path = %origin.display(), "source has no header");
        return Ok(RowSet::default());
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record.map_err(|err| SourceError::csv(origin, err))?;
        if record.len() > width {
            return Err(SourceError::RaggedRow {
                path: origin.to_path_buf(),
                row: idx + 1,
                found: record.len(),
                expected: width,
            });
        }

        let mut row: Vec<Option<String>> = record.iter().map(normalize_cell).collect();
        row.resize(width, None);
        rows.push(row);
    }

    debug!(path = %origin.display(), rows = rows.len(), columns = width, "normalized source");
    Ok(RowSet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn parse(input: &str) -> Result<RowSet> {
        read_csv_from(input.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn blank_and_nan_cells_become_none() {
        let rows = parse(
            "case_id,client_name,end_date\n\
             1000,Acme LLC,\n\
             1001,NaN,2024-05-01\n\
             1002,  ,null\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.rows()[0], vec![Some("1000".to_string()), Some("Acme LLC".to_string()), None]);
        assert_eq!(rows.rows()[1][1], None);
        assert_eq!(rows.rows()[1][2], Some("2024-05-01".to_string()));
        assert_eq!(rows.rows()[2], vec![Some("1002".to_string()), None, None]);
        assert_eq!(rows.null_cells(), 4);
    }

    #[test]
    fn quoted_values_keep_commas() {
        let rows = parse("task_id,task_description\n7,\"Draft motion, file brief\"\n").unwrap();
        assert_eq!(rows.rows()[0][1].as_deref(), Some("Draft motion, file brief"));
    }

    #[test]
    fn header_order_is_preserved() {
        let rows = parse("status, case_id ,lawyer\nClosed,1,Ann\n").unwrap();
        assert_eq!(rows.headers(), &["status", "case_id", "lawyer"]);
    }

    #[test]
    fn short_rows_are_padded_with_none() {
        let rows = parse("entry_id,lawyer,hours_logged\n1,Ann\n").unwrap();
        assert_eq!(rows.rows()[0], vec![Some("1".to_string()), Some("Ann".to_string()), None]);
    }

    #[test]
    fn long_rows_reject_the_file() {
        let err = parse("entry_id,lawyer\n1,Ann\n2,Bob,extra\n").unwrap_err();
        match err {
            SourceError::RaggedRow {
                row,
                found,
                expected,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(found, 3);
                assert_eq!(expected, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_only_source_is_empty() {
        let rows = parse("case_id,client_name\n").unwrap();
        assert!(rows.is_empty());
        assert_eq!(rows.headers().len(), 2);
    }

    #[test]
    fn zero_byte_source_is_empty() {
        let rows = parse("").unwrap();
        assert!(rows.is_empty());
        assert!(rows.headers().is_empty());
    }

    #[test]
    fn byte_order_mark_is_stripped_from_header() {
        let rows = parse("\u{feff}case_id,status\n1,Closed\n").unwrap();
        assert_eq!(rows.headers()[0], "case_id");
    }

    #[test]
    fn reads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "task_id,completed").unwrap();
        writeln!(file, "1,Yes").unwrap();
        writeln!(file, "2,No").unwrap();

        let rows = read_csv(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.rows()[1][1].as_deref(), Some("No"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = PathBuf::from("/definitely/not/here/cases.csv");
        let err = read_csv(&path).unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[test]
    fn null_markers_are_exact_matches() {
        assert!(is_null_marker(""));
        assert!(is_null_marker("   "));
        assert!(is_null_marker("NaN"));
        assert!(is_null_marker(" NULL "));
        assert!(!is_null_marker("Nancy"));
        assert!(!is_null_marker("0"));
        assert!(!is_null_marker("No"));
    }
}
