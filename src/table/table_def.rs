use std::{sync::Arc, time::SystemTime};

use tracing::debug;

use super::schema::TableSchema;
use crate::{
    catalog::transport::CatalogTransport,
    common::error::{Result, require_non_empty},
};

/// Full metadata of a catalog table, as reported by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMeta {
    pub name: String,
    pub project: String,
    /// Table comment, empty when none was given.
    pub comment: String,
    pub schema: TableSchema,
    pub owner: String,
    pub schema_name: Option<String>,
    /// Retention period in days; `None` keeps data forever.
    pub lifecycle: Option<u32>,
    pub created_at: SystemTime,
    pub last_modified: SystemTime,
}

impl TableMeta {
    /// Creates metadata for a freshly created table.
    pub fn new(project: &str, name: &str, schema: TableSchema) -> Self {
        let now = SystemTime::now();
        Self {
            name: name.to_owned(),
            project: project.to_owned(),
            comment: String::new(),
            schema,
            owner: String::new(),
            schema_name: None,
            lifecycle: None,
            created_at: now,
            last_modified: now,
        }
    }
}

/// A handle to one table in the catalog.
///
/// The name and project are always known. Everything else is fetched from
/// the catalog the first time it is needed and cached for the life of the
/// handle. The handle is a snapshot: it does not follow later changes to the
/// remote table unless [`Table::reload`] is called.
pub struct Table {
    name: String,
    project: String,
    /// Cached metadata; `None` until the handle is resolved.
    meta: Option<Box<TableMeta>>,
    transport: Arc<dyn CatalogTransport>,
}

impl Table {
    pub(crate) fn unresolved(
        project: &str,
        name: &str,
        transport: Arc<dyn CatalogTransport>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            project: project.to_owned(),
            meta: None,
            transport,
        }
    }

    pub(crate) fn resolved(meta: TableMeta, transport: Arc<dyn CatalogTransport>) -> Self {
        Self {
            name: meta.name.clone(),
            project: meta.project.clone(),
            meta: Some(Box::new(meta)),
            transport,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Whether the metadata has already been fetched.
    pub fn is_resolved(&self) -> bool {
        self.meta.is_some()
    }

    /// Fetches the table's metadata unless it is already cached.
    ///
    /// On failure the handle stays unresolved, so a later call retries.
    pub fn resolve(&mut self) -> Result<&TableMeta> {
        let meta = match self.meta.take() {
            Some(meta) => meta,
            None => Box::new(self.fetch()?),
        };
        let meta: &TableMeta = self.meta.insert(meta);
        Ok(meta)
    }

    /// Discards cached metadata and fetches it again.
    ///
    /// If the fetch fails, the previously cached metadata is kept.
    pub fn reload(&mut self) -> Result<&TableMeta> {
        let meta = self.fetch()?;
        let meta: &TableMeta = self.meta.insert(Box::new(meta));
        Ok(meta)
    }

    pub fn meta(&mut self) -> Result<&TableMeta> {
        self.resolve()
    }

    pub fn comment(&mut self) -> Result<&str> {
        Ok(&self.resolve()?.comment)
    }

    pub fn schema(&mut self) -> Result<&TableSchema> {
        Ok(&self.resolve()?.schema)
    }

    pub fn owner(&mut self) -> Result<&str> {
        Ok(&self.resolve()?.owner)
    }

    pub fn lifecycle(&mut self) -> Result<Option<u32>> {
        Ok(self.resolve()?.lifecycle)
    }

    pub fn created_at(&mut self) -> Result<SystemTime> {
        Ok(self.resolve()?.created_at)
    }

    pub fn last_modified(&mut self) -> Result<SystemTime> {
        Ok(self.resolve()?.last_modified)
    }

    fn fetch(&self) -> Result<TableMeta> {
        require_non_empty("project", &self.project)?;
        require_non_empty("table name", &self.name)?;

        debug!(project = %self.project, table = %self.name, "fetching table metadata");
        self.transport
            .get_table(&self.project, &self.name)
            .map_err(|err| err.into_catalog_error(&self.project, &self.name))
    }
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("project", &self.project)
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::{
            memory::MemoryCatalog,
            transport::{CatalogTransport, CreateTableRequest},
        },
        common::error::CatalogError,
        core::types::ColumnType,
        table::column_def::Column,
    };

    fn catalog_with_table() -> Arc<MemoryCatalog> {
        let catalog = Arc::new(MemoryCatalog::new().with_project("prj"));
        let schema = TableSchema::new()
            .with_column(Column::new("c1", ColumnType::Bigint))
            .unwrap();
        catalog
            .create_table(&CreateTableRequest {
                project: "prj".to_string(),
                name: "t1".to_string(),
                schema,
                comment: "first".to_string(),
                if_not_exists: false,
                lifecycle: Some(7),
                schema_name: None,
            })
            .unwrap();
        catalog
    }

    #[test]
    fn test_resolves_once() {
        let catalog = catalog_with_table();
        let mut table = Table::unresolved("prj", "t1", catalog.clone());
        assert!(!table.is_resolved());
        assert_eq!(catalog.get_requests(), 0);

        assert_eq!(table.comment().unwrap(), "first");
        assert_eq!(table.schema().unwrap().columns().len(), 1);
        assert_eq!(table.lifecycle().unwrap(), Some(7));
        assert!(table.is_resolved());
        assert_eq!(catalog.get_requests(), 1);
    }

    #[test]
    fn test_missing_table_stays_unresolved() {
        let catalog = Arc::new(MemoryCatalog::new().with_project("prj"));
        let mut table = Table::unresolved("prj", "missing", catalog.clone());

        assert!(table.schema().unwrap_err().is_not_found());
        assert!(!table.is_resolved());

        // A failed resolution is retried rather than cached.
        assert!(table.comment().unwrap_err().is_not_found());
        assert_eq!(catalog.get_requests(), 2);
    }

    #[test]
    fn test_reload_picks_up_remote_changes() {
        let catalog = catalog_with_table();
        let mut table = Table::unresolved("prj", "t1", catalog.clone());
        assert_eq!(table.comment().unwrap(), "first");

        catalog.update_comment("prj", "t1", "second").unwrap();
        assert_eq!(table.comment().unwrap(), "first");

        table.reload().unwrap();
        assert_eq!(table.comment().unwrap(), "second");
    }

    #[test]
    fn test_reload_failure_keeps_cached_meta() {
        let catalog = catalog_with_table();
        let mut table = Table::unresolved("prj", "t1", catalog.clone());
        table.resolve().unwrap();

        catalog.delete_table("prj", "t1").unwrap();
        assert!(matches!(
            table.reload(),
            Err(CatalogError::NotFound { .. })
        ));
        assert!(table.is_resolved());
        assert_eq!(table.comment().unwrap(), "first");
    }

    #[test]
    fn test_empty_name_rejected_without_request() {
        let catalog = catalog_with_table();

        let mut table = Table::unresolved("prj", "", catalog.clone());
        assert!(matches!(table.schema(), Err(CatalogError::Validation(_))));
        assert!(!table.is_resolved());

        let mut table = Table::unresolved("", "t1", catalog.clone());
        assert!(matches!(table.reload(), Err(CatalogError::Validation(_))));
        assert_eq!(catalog.get_requests(), 0);
    }

    #[test]
    fn test_debug_omits_transport() {
        let catalog = catalog_with_table();
        let table = Table::unresolved("prj", "t1", catalog);
        assert_eq!(
            format!("{table:?}"),
            r#"Table { project: "prj", name: "t1", resolved: false, .. }"#
        );
    }
}
