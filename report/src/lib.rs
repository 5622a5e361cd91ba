//! FILENAME: report/src/lib.rs
//! Report facade.
//!
//! Ties the pipeline together for one report instance: parse the
//! template, bind parameters and data (directly or through a data
//! source), validate, preview, and generate output in any supported
//! format.
//!
//! One instance per concurrent render: `generate` binds query results
//! onto the instance on first use, so a single instance is not meant to
//! be shared across threads. Separate instances share no mutable state,
//! even when built from the same template source.

mod builder;
mod datasource;
mod error;
mod report;

pub use builder::ReportBuilder;
pub use datasource::{
    ColumnInfo, ConnectionDescriptor, DataSource, DataSourceError, DriverKind, FailingDataSource,
    MemoryDataSource,
};
pub use error::ReportError;
pub use report::{Report, ReportInfo, Validation};

// The facade's vocabulary, re-exported so callers need only this crate.
pub use engine::{Row, Value};
pub use model::Template;
pub use render::OutputFormat;
