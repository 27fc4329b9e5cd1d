use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::{
    config::CatalogConfig,
    iter::TableIter,
    transport::{CatalogTransport, CreateTableRequest},
};
use crate::{
    common::error::{CatalogError, Result, require_non_empty},
    table::{filter::TableFilter, schema::TableSchema, table_def::Table},
};

/// Optional settings for [`Tables::create_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Table comment; empty when not given.
    pub comment: String,

    /// Return the existing table instead of failing when the name is taken.
    pub if_not_exists: bool,

    /// Retention period in days.
    pub lifecycle: Option<u32>,

    pub schema_name: Option<String>,
}

impl CreateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_owned();
        self
    }

    pub fn if_not_exists(mut self, if_not_exists: bool) -> Self {
        self.if_not_exists = if_not_exists;
        self
    }

    pub fn lifecycle(mut self, days: u32) -> Self {
        self.lifecycle = Some(days);
        self
    }

    pub fn schema_name(mut self, schema_name: &str) -> Self {
        self.schema_name = Some(schema_name.to_owned());
        self
    }
}

/// Client for the tables of a project-scoped catalog.
///
/// Every operation is a blocking round trip through the transport. The client
/// holds no per-table state; it is cheap to clone and can be shared between
/// threads. Concurrent requests are not deduplicated, so two racing creates of
/// the same name are arbitrated by the catalog itself.
#[derive(Clone)]
pub struct Tables {
    config: CatalogConfig,
    transport: Arc<dyn CatalogTransport>,
}

impl Tables {
    pub fn new(config: CatalogConfig, transport: Arc<dyn CatalogTransport>) -> Self {
        Self { config, transport }
    }

    /// The project unqualified operations run against.
    pub fn project(&self) -> &str {
        &self.config.project
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Creates a table with no comment.
    pub fn create(&self, project: &str, name: &str, schema: &TableSchema) -> Result<Table> {
        self.create_with(project, name, schema, CreateOptions::default())
    }

    /// Creates a table.
    ///
    /// Arguments are validated before any request is sent. Creating a table
    /// outside the bound project fails with [`CatalogError::CrossProject`]
    /// unless the transport supports it. A taken name fails with
    /// [`CatalogError::AlreadyExists`] unless `if_not_exists` is set, in
    /// which case the existing table is returned.
    #[instrument(
        name = "catalog::tables::create",
        level = "trace",
        skip(self, schema, options)
    )]
    pub fn create_with(
        &self,
        project: &str,
        name: &str,
        schema: &TableSchema,
        options: CreateOptions,
    ) -> Result<Table> {
        require_non_empty("project", project)?;
        require_non_empty("table name", name)?;

        if schema.columns().is_empty() {
            return Err(CatalogError::Validation(format!(
                "Table {name} must define at least one column"
            )));
        }
        if options.lifecycle == Some(0) {
            return Err(CatalogError::Validation(
                "lifecycle must be at least one day".to_string(),
            ));
        }
        if project != self.config.project && !self.transport.supports_cross_project_create() {
            return Err(CatalogError::CrossProject {
                project: project.to_owned(),
                name: name.to_owned(),
                bound: self.config.project.clone(),
            });
        }

        let request = CreateTableRequest {
            project: project.to_owned(),
            name: name.to_owned(),
            schema: schema.clone(),
            comment: options.comment,
            if_not_exists: options.if_not_exists,
            lifecycle: options.lifecycle,
            schema_name: options.schema_name,
        };

        debug!(%schema, "creating table");
        match self.transport.create_table(&request) {
            Ok(meta) => Ok(Table::resolved(meta, self.transport.clone())),
            Err(err) => match err.into_catalog_error(project, name) {
                CatalogError::AlreadyExists { .. } if request.if_not_exists => {
                    warn!("table already exists, returning existing table");
                    Ok(Table::unresolved(project, name, self.transport.clone()))
                }
                err => Err(err),
            },
        }
    }

    /// Returns a handle to a table in the bound project.
    ///
    /// No request is made; the table's existence is only checked when its
    /// metadata is first accessed.
    pub fn get(&self, name: &str) -> Table {
        self.get_in(&self.config.project, name)
    }

    /// Returns a handle to a table in `project`.
    pub fn get_in(&self, project: &str, name: &str) -> Table {
        Table::unresolved(project, name, self.transport.clone())
    }

    /// Checks whether a table exists in the bound project.
    pub fn exists(&self, name: &str) -> Result<bool> {
        self.exists_in(&self.config.project, name)
    }

    /// Checks whether a table exists in `project`.
    ///
    /// A missing table is `Ok(false)`; any other failure, including a
    /// missing project, is returned as is.
    #[instrument(name = "catalog::tables::exists", level = "trace", skip(self))]
    pub fn exists_in(&self, project: &str, name: &str) -> Result<bool> {
        require_non_empty("project", project)?;
        require_non_empty("table name", name)?;

        match self.transport.get_table(project, name) {
            Ok(_) => Ok(true),
            Err(err) => match err.into_catalog_error(project, name) {
                err if err.is_table_not_found() => Ok(false),
                err => Err(err),
            },
        }
    }

    /// Drops a table from the bound project.
    ///
    /// Dropping a table that does not exist fails with
    /// [`CatalogError::NotFound`]; see [`Tables::delete_with`].
    pub fn delete(&self, name: &str) -> Result<()> {
        self.delete_in(&self.config.project, name)
    }

    /// Drops a table, treating a missing table as success when `if_exists`
    /// is set.
    pub fn delete_with(&self, name: &str, if_exists: bool) -> Result<()> {
        match self.delete(name) {
            Err(err) if if_exists && err.is_table_not_found() => {
                debug!(table = name, "table already absent");
                Ok(())
            }
            res => res,
        }
    }

    /// Drops a table from `project`.
    #[instrument(name = "catalog::tables::delete", level = "trace", skip(self))]
    pub fn delete_in(&self, project: &str, name: &str) -> Result<()> {
        require_non_empty("project", project)?;
        require_non_empty("table name", name)?;

        self.transport
            .delete_table(project, name)
            .map_err(|err| err.into_catalog_error(project, name))
    }

    /// Replaces the comment of a table in the bound project.
    #[instrument(name = "catalog::tables::set_comment", level = "trace", skip(self))]
    pub fn set_comment(&self, name: &str, comment: &str) -> Result<()> {
        require_non_empty("table name", name)?;

        let project = &self.config.project;
        self.transport
            .update_comment(project, name, comment)
            .map_err(|err| err.into_catalog_error(project, name))
    }

    /// Lists every table in the bound project.
    pub fn iter(&self) -> TableIter {
        self.iter_filtered(TableFilter::default())
    }

    /// Lists the tables in the bound project that match `filter`.
    ///
    /// Every call starts a fresh listing from the first matching table.
    pub fn iter_filtered(&self, filter: TableFilter) -> TableIter {
        TableIter::new(
            &self.config.project,
            filter,
            self.config.page_size,
            self.transport.clone(),
        )
    }
}

impl std::fmt::Debug for Tables {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tables")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
