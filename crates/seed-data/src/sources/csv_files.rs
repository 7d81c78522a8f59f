//! CSV resource loading with columns bound by header name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::db::SeedError;

/// A parsed CSV resource.
#[derive(Debug)]
pub struct CsvTable {
    path: PathBuf,
    columns: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

impl CsvTable {
    /// Reads a CSV file with a header row.
    ///
    /// Rows may be shorter than the header; missing trailing cells read as
    /// absent.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SeedError::MissingResource(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        Self::from_reader(path, file)
    }

    /// Parses CSV data from any reader. `path` is only used in diagnostics.
    pub fn from_reader(path: &Path, reader: impl std::io::Read) -> Result<Self, SeedError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let columns: HashMap<String, usize> = reader
            .headers()?
            .iter()
            .enumerate()
            .filter(|(_, name)| !name.is_empty())
            .map(|(i, name)| (name.to_lowercase(), i))
            .collect();

        if columns.is_empty() {
            return Err(SeedError::InvalidResource {
                path: path.to_path_buf(),
                reason: "header row is empty".to_string(),
            });
        }

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            records,
        })
    }

    /// Fails unless every named column is present in the header.
    pub fn require_columns(&self, names: &[&str]) -> Result<(), SeedError> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| !self.columns.contains_key(*name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SeedError::InvalidResource {
                path: self.path.clone(),
                reason: format!("missing column(s): {}", missing.join(", ")),
            })
        }
    }

    /// Iterates data rows (header excluded).
    pub fn rows(&self) -> impl Iterator<Item = CsvRow<'_>> {
        self.records.iter().enumerate().map(|(i, record)| CsvRow {
            table: self,
            record,
            // Header is line 1.
            line: i + 2,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One data row of a [`CsvTable`].
#[derive(Debug, Clone, Copy)]
pub struct CsvRow<'a> {
    table: &'a CsvTable,
    record: &'a StringRecord,
    line: usize,
}

impl<'a> CsvRow<'a> {
    /// Returns the trimmed cell under `column`, or `None` when the column is
    /// unknown, the row is short, or the cell is empty.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = *self.table.columns.get(column)?;
        self.record.get(index).filter(|v| !v.is_empty())
    }

    /// Returns the named cells, or `None` if any of them is absent.
    pub fn required<const N: usize>(&self, columns: [&str; N]) -> Option<[&'a str; N]> {
        let mut values = [""; N];
        for (slot, column) in values.iter_mut().zip(columns) {
            *slot = self.get(column)?;
        }
        Some(values)
    }

    pub fn parse<T: std::str::FromStr>(&self, column: &str) -> Option<T> {
        self.get(column).and_then(|v| v.parse().ok())
    }

    /// 1-based line number in the file.
    pub fn line(&self) -> usize {
        self.line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str) -> CsvTable {
        CsvTable::from_reader(Path::new("test.csv"), data.as_bytes()).unwrap()
    }

    #[test]
    fn test_columns_bound_by_name() {
        let table = parse("iso2,name\nBD,Bangladesh\n");
        let row = table.rows().next().unwrap();

        assert_eq!(row.get("name"), Some("Bangladesh"));
        assert_eq!(row.get("iso2"), Some("BD"));
        assert_eq!(row.line(), 2);
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let a = parse("name,iso2\nNepal,NP\n");
        let b = parse("iso2,name\nNP,Nepal\n");

        let a = a.rows().next().unwrap().required(["iso2", "name"]);
        let b = b.rows().next().unwrap().required(["iso2", "name"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_and_empty_cells() {
        let table = parse("iso2,name,capital\nBD,Bangladesh\nIN,,New Delhi\n");
        let rows: Vec<_> = table.rows().collect();

        assert_eq!(rows[0].get("capital"), None);
        assert!(rows[0].required(["iso2", "name"]).is_some());
        assert!(rows[1].required(["iso2", "name"]).is_none());
    }

    #[test]
    fn test_headers_are_case_insensitive_and_trimmed() {
        let table = parse(" ISO2 , Name \nBD , Bangladesh\n");
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("iso2"), Some("BD"));
        assert_eq!(row.get("name"), Some("Bangladesh"));
    }

    #[test]
    fn test_require_columns() {
        let table = parse("iso2,name\n");
        assert!(table.require_columns(&["iso2"]).is_ok());
        assert!(matches!(
            table.require_columns(&["iso2", "iso3"]),
            Err(SeedError::InvalidResource { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = CsvTable::load_file("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, SeedError::MissingResource(_)));
    }
}
