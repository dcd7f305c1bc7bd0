use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::config::ColumnConfig;
use crate::error::RunError;

/// One record of the package table.
///
/// The three columns the updater cares about are lifted out; every other
/// cell is kept in `extra`, in file order, so rows round-trip unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub exempt_flag: String,
    pub package: String,
    pub license: String,
    extra: Vec<String>,
}

impl Row {
    pub fn new(exempt_flag: &str, package: &str, license: &str) -> Self {
        Self {
            exempt_flag: exempt_flag.to_string(),
            package: package.to_string(),
            license: license.to_string(),
            extra: Vec::new(),
        }
    }
}

/// Which header position holds each tracked column.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Flag,
    Package,
    License,
    Extra,
}

#[derive(Debug)]
pub struct Table {
    headers: Vec<String>,
    layout: Vec<Slot>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn read(path: &Path, columns: &ColumnConfig) -> Result<Table, RunError> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RunError::TableNotFound(path.to_path_buf()),
            _ => RunError::TableParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            },
        })?;

        Self::from_reader(file, columns).map_err(|reason| RunError::TableParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn from_reader<R: Read>(reader: R, columns: &ColumnConfig) -> Result<Table, String> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| e.to_string())?
            .iter()
            .map(str::to_string)
            .collect();

        let layout = layout_for(&headers, columns)?;

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| e.to_string())?;
            let mut row = Row::new("", "", "");
            for (slot, cell) in layout.iter().zip(record.iter()) {
                match slot {
                    Slot::Flag => row.exempt_flag = cell.to_string(),
                    Slot::Package => row.package = cell.to_string(),
                    Slot::License => row.license = cell.to_string(),
                    Slot::Extra => row.extra.push(cell.to_string()),
                }
            }
            rows.push(row);
        }

        Ok(Table { headers, layout, rows })
    }

    /// Replace the file at `path` in one step: write a sibling temp file, then rename.
    pub fn write(&self, path: &Path) -> Result<(), RunError> {
        let write_err = |reason: String| RunError::OutputWrite {
            path: path.to_path_buf(),
            reason,
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;

        {
            let mut wtr = csv::Writer::from_writer(tmp.as_file_mut());
            wtr.write_record(&self.headers)
                .map_err(|e| write_err(e.to_string()))?;
            for row in &self.rows {
                wtr.write_record(self.cells(row))
                    .map_err(|e| write_err(e.to_string()))?;
            }
            wtr.flush().map_err(|e| write_err(e.to_string()))?;
        }

        tmp.persist(path).map_err(|e| write_err(e.to_string()))?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Cells of `row` in header order.
    pub fn cells<'a>(&self, row: &'a Row) -> Vec<&'a str> {
        let mut extra = row.extra.iter();
        self.layout
            .iter()
            .map(|slot| match slot {
                Slot::Flag => row.exempt_flag.as_str(),
                Slot::Package => row.package.as_str(),
                Slot::License => row.license.as_str(),
                Slot::Extra => extra.next().map_or("", String::as_str),
            })
            .collect()
    }

    /// Rows as JSON objects keyed by header, in header order.
    pub fn to_json(&self) -> Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .headers
                    .iter()
                    .zip(self.cells(row))
                    .map(|(h, c)| (h.clone(), Value::String(c.to_string())))
                    .collect();
                Value::Object(obj)
            })
            .collect();
        Value::Array(rows)
    }
}

fn layout_for(headers: &[String], columns: &ColumnConfig) -> Result<Vec<Slot>, String> {
    for required in [&columns.flag, &columns.package, &columns.license] {
        if !headers.iter().any(|h| h == required) {
            return Err(format!("missing required column '{}'", required));
        }
    }

    Ok(headers
        .iter()
        .map(|h| {
            if *h == columns.flag {
                Slot::Flag
            } else if *h == columns.package {
                Slot::Package
            } else if *h == columns.license {
                Slot::License
            } else {
                Slot::Extra
            }
        })
        .collect())
}
