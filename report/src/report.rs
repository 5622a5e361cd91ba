//! FILENAME: report/src/report.rs
//! The Report facade: one parsed template plus its bindings.
//!
//! Validation and rendering are independent: a report that validates
//! with issues can still be generated, and a generation failure is an
//! error value, never a partial output file.

use crate::datasource::{DataSource, DriverKind};
use crate::error::ReportError;
use engine::context::{PAGE_COUNT, PAGE_NUMBER};
use engine::{Row, Value};
use model::{Field, Group, ParameterSpec, ResetScope, Template, Variable};
use parser::{extract_field_refs, extract_variable_refs};
use render::{renderer_for, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// Validation outcome: hard issues and soft warnings, collected as data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Validation {
    pub valid: bool,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

/// Report metadata for callers (web or CLI layers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportInfo {
    pub name: String,
    pub page_width: u32,
    pub page_height: u32,
    pub has_query: bool,
    pub fields: Vec<Field>,
    pub variables: Vec<Variable>,
    pub groups: Vec<Group>,
    pub bands: Vec<String>,
    pub parameters: Vec<ParameterSpec>,
}

/// One report instance: an immutable template plus per-instance
/// bindings (parameters, rows, a data source).
///
/// `generate` caches query results on the instance, so use one instance
/// per concurrent render. Instances share no state with each other.
pub struct Report {
    template: Template,
    data: Option<Vec<Row>>,
    parameters: HashMap<String, Value>,
    data_source: Option<Box<dyn DataSource>>,
    driver: DriverKind,
}

impl Report {
    /// Parses template source text into a report instance.
    pub fn from_source(source: &str) -> Result<Self, ReportError> {
        let template = jrxml::parse(source)?;
        log::info!(
            "parsed template '{}': {} fields, {} bands",
            template.name,
            template.fields.len(),
            template.bands.len()
        );
        Ok(Report::from_template(template))
    }

    /// Wraps an already-parsed template.
    pub fn from_template(template: Template) -> Self {
        Report {
            template,
            data: None,
            parameters: HashMap::new(),
            data_source: None,
            driver: DriverKind::Sqlite,
        }
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Binds parameter values; replaces any previously set parameters.
    pub fn set_parameters(&mut self, parameters: HashMap<String, Value>) {
        self.parameters = parameters;
    }

    /// Binds row data directly, bypassing any data source.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        log::info!("data bound directly: {} rows", rows.len());
        self.data = Some(rows);
    }

    /// Binds row data from a JSON array of objects.
    pub fn set_data_json(&mut self, json: &str) -> Result<(), ReportError> {
        let rows: Vec<Row> =
            serde_json::from_str(json).map_err(|e| ReportError::InvalidData(e.to_string()))?;
        self.set_data(rows);
        Ok(())
    }

    /// Attaches the data source used to run the template's query.
    pub fn set_data_source(&mut self, source: Box<dyn DataSource>) {
        self.data_source = Some(source);
    }

    /// Records the driver kind, used when building row-limited preview
    /// queries. All supported drivers spell the clause identically, so
    /// this only matters for future drivers that do not.
    pub fn set_driver(&mut self, driver: DriverKind) {
        self.driver = driver;
    }

    // ========================================================================
    // VALIDATE
    // ========================================================================

    /// Checks the template against its own declarations and this
    /// instance's bindings. Never fails; the outcome is data.
    pub fn validate(&self) -> Validation {
        let mut issues = Vec::new();
        let mut warnings = Vec::new();

        if self.template.fields.is_empty() {
            warnings.push("No fields defined in report".to_string());
        }

        if self.template.query.is_none() && self.data.is_none() {
            issues.push("No query defined and no data provided".to_string());
        }

        if !self.template.has_detail() {
            warnings.push("No detail band defined".to_string());
        }

        // Every $F{...} and $V{...} in every band element must name a
        // declared field or variable.
        for band in self.template.bands.values() {
            for element in &band.elements {
                let Some(expression) = element.expression() else {
                    continue;
                };
                for field_ref in extract_field_refs(expression) {
                    if self.template.field(&field_ref).is_none() {
                        issues.push(format!("Referenced field '{}' not defined", field_ref));
                    }
                }
                for var_ref in extract_variable_refs(expression) {
                    if var_ref == PAGE_NUMBER || var_ref == PAGE_COUNT {
                        continue;
                    }
                    if self.template.variable(&var_ref).is_none() {
                        issues.push(format!("Referenced variable '{}' not defined", var_ref));
                    }
                }
            }
        }

        // A reset scope naming a group must name a declared group.
        for variable in &self.template.variables {
            if let ResetScope::Group(group) = &variable.reset {
                if self.template.group(group).is_none() {
                    issues.push(format!(
                        "Variable '{}' resets on unknown group '{}'",
                        variable.name, group
                    ));
                }
            }
        }

        Validation {
            valid: issues.is_empty(),
            issues,
            warnings,
        }
    }

    // ========================================================================
    // PREVIEW
    // ========================================================================

    /// Returns at most `limit` rows: bound data when present, otherwise
    /// a row-limited run of the template query. Any data source failure
    /// degrades to an empty preview so an editing UI never breaks.
    pub fn preview(&self, limit: usize) -> Vec<Row> {
        if let Some(data) = &self.data {
            return data.iter().take(limit).cloned().collect();
        }

        let (Some(source), Some(query)) = (&self.data_source, &self.template.query) else {
            return Vec::new();
        };

        let parameters = engine::resolve_parameters(&self.template, &self.parameters);
        let limited = self.driver.apply_row_limit(query, limit);
        match source.execute_query(&limited, &parameters) {
            Ok(rows) => rows.into_iter().take(limit).collect(),
            Err(e) => {
                log::warn!("preview query failed: {}", e);
                Vec::new()
            }
        }
    }

    // ========================================================================
    // GENERATE
    // ========================================================================

    /// Generates the report in the given format. Binds data through the
    /// data source first when unbound and a query exists.
    pub fn generate(&mut self, format: OutputFormat) -> Result<Vec<u8>, ReportError> {
        self.bind_query_data()?;

        let rows = self.data.as_deref().unwrap_or(&[]);
        let bytes = renderer_for(format).render(&self.template, rows, &self.parameters)?;
        log::info!(
            "generated {} output: {} bytes from {} rows",
            format,
            bytes.len(),
            rows.len()
        );
        Ok(bytes)
    }

    /// Generates using a format name ("html", "pdf", "csv", "xlsx",
    /// "excel"); an unknown name surfaces as a render error.
    pub fn generate_as(&mut self, format_name: &str) -> Result<Vec<u8>, ReportError> {
        let format = OutputFormat::from_str(format_name)?;
        self.generate(format)
    }

    /// Generates and writes to a file.
    pub fn save(&mut self, path: impl AsRef<Path>, format: OutputFormat) -> Result<(), ReportError> {
        let bytes = self.generate(format)?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!("report saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Runs the template query and caches its rows on this instance.
    /// A no-op when data is already bound or no query/source exists.
    fn bind_query_data(&mut self) -> Result<(), ReportError> {
        if self.data.is_some() {
            return Ok(());
        }
        let (Some(source), Some(query)) = (&self.data_source, &self.template.query) else {
            return Ok(());
        };

        let parameters = engine::resolve_parameters(&self.template, &self.parameters);
        let rows = source.execute_query(query, &parameters)?;
        log::info!("query returned {} rows", rows.len());
        self.data = Some(rows);
        Ok(())
    }

    // ========================================================================
    // INFO
    // ========================================================================

    /// Report metadata for display layers.
    pub fn info(&self) -> ReportInfo {
        ReportInfo {
            name: self.template.name.clone(),
            page_width: self.template.page.width,
            page_height: self.template.page.height,
            has_query: self.template.query.is_some(),
            fields: self.template.fields.clone(),
            variables: self.template.variables.clone(),
            groups: self.template.groups.clone(),
            bands: self
                .template
                .bands
                .keys()
                .map(|kind| kind.as_str().to_string())
                .collect(),
            parameters: self.template.parameters.clone(),
        }
    }
}
