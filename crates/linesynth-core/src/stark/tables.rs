//! Flat ASCII Stark tables and the shared table cache.
//!
//! Files are whitespace-separated columns; `#` comments and blank lines are
//! skipped. Tables are parsed once per (line, file) and shared read-only.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::{StarkLine, StarkTableError};

/// Directories holding the unpacked hydrogen and helium table trees.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableRoots {
    #[serde(default)]
    pub hydrogen: Option<PathBuf>,
    #[serde(default)]
    pub helium: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    path: PathBuf,
    columns: Vec<Vec<f64>>,
}

impl RawTable {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column(&self, index: usize) -> Result<&[f64], StarkTableError> {
        self.columns
            .get(index)
            .map(Vec::as_slice)
            .ok_or_else(|| StarkTableError::MissingColumn {
                path: self.path.clone(),
                column: index,
                available: self.columns.len(),
            })
    }
}

pub fn parse_table(path: &Path, source: &str) -> Result<RawTable, StarkTableError> {
    let mut columns: Vec<Vec<f64>> = Vec::new();

    for (line_index, raw_line) in source.lines().enumerate() {
        let line = raw_line.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let value = parse_number(token).ok_or_else(|| StarkTableError::Format {
                path: path.to_path_buf(),
                line: line_index + 1,
                message: format!("'{token}' is not a number"),
            })?;
            row.push(value);
        }

        if columns.is_empty() {
            columns = vec![Vec::new(); row.len()];
        } else if row.len() != columns.len() {
            return Err(StarkTableError::Format {
                path: path.to_path_buf(),
                line: line_index + 1,
                message: format!("expected {} columns, found {}", columns.len(), row.len()),
            });
        }
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    if columns.is_empty() {
        return Err(StarkTableError::Format {
            path: path.to_path_buf(),
            line: 0,
            message: "table contains no data rows".to_string(),
        });
    }

    Ok(RawTable {
        path: path.to_path_buf(),
        columns,
    })
}

/// Fortran-style `D` exponents appear in some published tables.
fn parse_number(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "e").parse::<f64>().ok())
}

type CacheKey = (StarkLine, PathBuf);

/// Populate-on-first-use cache of parsed tables. Shared between synthesizers
/// through an `Arc`; entries stay until invalidated.
#[derive(Debug, Default)]
pub struct StarkTableCache {
    tables: RwLock<HashMap<CacheKey, Arc<RawTable>>>,
}

impl StarkTableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, line: StarkLine, path: &Path) -> Result<Arc<RawTable>, StarkTableError> {
        let key = (line, path.to_path_buf());
        {
            let tables = self
                .tables
                .read()
                .map_err(|_| StarkTableError::CachePoisoned)?;
            if let Some(table) = tables.get(&key) {
                return Ok(Arc::clone(table));
            }
        }

        if !path.is_file() {
            return Err(StarkTableError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let source = fs::read_to_string(path).map_err(|source| StarkTableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Arc::new(parse_table(path, &source)?);
        tracing::debug!(
            line = %line,
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded Stark table"
        );

        let mut tables = self
            .tables
            .write()
            .map_err(|_| StarkTableError::CachePoisoned)?;
        Ok(Arc::clone(tables.entry(key).or_insert(table)))
    }

    pub fn contains(&self, line: StarkLine, path: &Path) -> bool {
        self.tables
            .read()
            .map(|tables| tables.contains_key(&(line, path.to_path_buf())))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.tables.read().map(|tables| tables.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn invalidate(&self) -> Result<(), StarkTableError> {
        self.tables
            .write()
            .map_err(|_| StarkTableError::CachePoisoned)?
            .clear();
        Ok(())
    }

    pub fn invalidate_line(&self, line: StarkLine) -> Result<(), StarkTableError> {
        self.tables
            .write()
            .map_err(|_| StarkTableError::CachePoisoned)?
            .retain(|(cached_line, _), _| *cached_line != line);
        Ok(())
    }
}
