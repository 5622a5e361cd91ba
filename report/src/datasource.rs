//! FILENAME: report/src/datasource.rs
//! Data source boundary.
//!
//! The engine consumes this capability; it never implements a real
//! database driver. Implementations are expected to acquire and release
//! their connection per operation (open, run, close) rather than holding
//! one across the lifetime of a report instance, so repeated preview and
//! generate calls cannot leak connections.

use engine::{Row, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("unknown table: {0}")]
    UnknownTable(String),
}

/// One column of a described table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// The capability surface a report needs from tabular storage.
pub trait DataSource {
    /// Runs a query with named parameters and returns its rows.
    fn execute_query(
        &self,
        query: &str,
        parameters: &HashMap<String, Value>,
    ) -> Result<Vec<Row>, DataSourceError>;

    /// Lists the table names visible to this source.
    fn list_tables(&self) -> Result<Vec<String>, DataSourceError>;

    /// Describes one table's columns.
    fn describe_table(&self, name: &str) -> Result<Vec<ColumnInfo>, DataSourceError>;

    /// True when the source can currently be reached.
    fn test_connection(&self) -> bool;
}

// ============================================================================
// CONNECTION DESCRIPTORS
// ============================================================================

/// The database driver a connection descriptor targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Sqlite,
    Mysql,
    Postgres,
}

impl DriverKind {
    /// Appends the driver's row-limiting clause to a query, unless the
    /// query already carries one. All supported drivers spell it the
    /// same way.
    pub fn apply_row_limit(&self, query: &str, limit: usize) -> String {
        if query.to_uppercase().contains("LIMIT") {
            query.to_string()
        } else {
            format!("{} LIMIT {}", query.trim_end().trim_end_matches(';'), limit)
        }
    }
}

/// How to reach a database: driver kind plus host credentials or a file
/// path. Stored and managed by the caller; the engine only carries it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    pub driver: DriverKind,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// For file-backed drivers.
    pub file_path: Option<String>,
}

impl ConnectionDescriptor {
    pub fn sqlite_file(path: impl Into<String>) -> Self {
        ConnectionDescriptor {
            driver: DriverKind::Sqlite,
            host: None,
            port: None,
            database: None,
            username: None,
            password: None,
            file_path: Some(path.into()),
        }
    }
}

// ============================================================================
// IN-MEMORY SOURCE
// ============================================================================

/// A data source over named in-memory tables. Queries are not parsed:
/// the source returns the rows of its default table, honoring only a
/// trailing `LIMIT n`. Intended for previews, tests, and fixtures.
pub struct MemoryDataSource {
    tables: Vec<(String, Vec<Row>)>,
    default_table: usize,
}

impl MemoryDataSource {
    /// A source with a single table of rows.
    pub fn with_rows(rows: Vec<Row>) -> Self {
        MemoryDataSource {
            tables: vec![("data".to_string(), rows)],
            default_table: 0,
        }
    }

    pub fn new() -> Self {
        MemoryDataSource {
            tables: Vec::new(),
            default_table: 0,
        }
    }

    /// Adds a named table; the first added table answers queries.
    pub fn add_table(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.tables.push((name.into(), rows));
    }
}

impl Default for MemoryDataSource {
    fn default() -> Self {
        MemoryDataSource::new()
    }
}

impl DataSource for MemoryDataSource {
    fn execute_query(
        &self,
        query: &str,
        _parameters: &HashMap<String, Value>,
    ) -> Result<Vec<Row>, DataSourceError> {
        let rows = self
            .tables
            .get(self.default_table)
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();

        // Honor a trailing LIMIT clause the way a SQL engine would.
        let limit = query
            .rsplit_once("LIMIT")
            .and_then(|(_, n)| n.trim().trim_end_matches(';').parse::<usize>().ok());

        Ok(match limit {
            Some(n) => rows.into_iter().take(n).collect(),
            None => rows,
        })
    }

    fn list_tables(&self) -> Result<Vec<String>, DataSourceError> {
        Ok(self.tables.iter().map(|(name, _)| name.clone()).collect())
    }

    fn describe_table(&self, name: &str) -> Result<Vec<ColumnInfo>, DataSourceError> {
        let (_, rows) = self
            .tables
            .iter()
            .find(|(table, _)| table == name)
            .ok_or_else(|| DataSourceError::UnknownTable(name.to_string()))?;

        let mut columns: Vec<ColumnInfo> = Vec::new();
        if let Some(first) = rows.first() {
            let mut names: Vec<&String> = first.keys().collect();
            names.sort();
            for column in names {
                let data_type = match first.get(column) {
                    Some(Value::Number(_)) => "number",
                    Some(Value::Boolean(_)) => "boolean",
                    _ => "text",
                };
                columns.push(ColumnInfo {
                    name: column.clone(),
                    data_type: data_type.to_string(),
                    nullable: true,
                });
            }
        }
        Ok(columns)
    }

    fn test_connection(&self) -> bool {
        true
    }
}

/// A source whose every query fails. Useful for exercising the
/// degraded paths (empty preview, surfaced generate errors).
pub struct FailingDataSource;

impl DataSource for FailingDataSource {
    fn execute_query(
        &self,
        _query: &str,
        _parameters: &HashMap<String, Value>,
    ) -> Result<Vec<Row>, DataSourceError> {
        Err(DataSourceError::Connection("unreachable".to_string()))
    }

    fn list_tables(&self) -> Result<Vec<String>, DataSourceError> {
        Err(DataSourceError::Connection("unreachable".to_string()))
    }

    fn describe_table(&self, _name: &str) -> Result<Vec<ColumnInfo>, DataSourceError> {
        Err(DataSourceError::Connection("unreachable".to_string()))
    }

    fn test_connection(&self) -> bool {
        false
    }
}
