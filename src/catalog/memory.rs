use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
    time::SystemTime,
};

use tracing::trace;

use super::transport::{
    CatalogTransport, CreateTableRequest, ListTablesRequest, NO_SUCH_PROJECT, TablePage,
    TableSummary, TransportError,
};
use crate::table::table_def::TableMeta;

/// Owner recorded on tables when none was configured.
pub const DEFAULT_OWNER: &str = "catalog_admin";

#[derive(Debug)]
struct MemoryState {
    /// Tables keyed by project, then by name.
    projects: BTreeMap<String, BTreeMap<String, TableMeta>>,
    owner: String,
}

/// An in-process catalog service.
///
/// Behaves like the remote catalog as far as the client can observe: projects
/// must exist before tables are created in them, names are unique per
/// project, and listings are paginated with an opaque marker. It backs the
/// test suite and the `tablecat` shell.
#[derive(Debug)]
pub struct MemoryCatalog {
    state: Mutex<MemoryState>,
    cross_project_create: bool,
    get_requests: AtomicUsize,
    list_requests: AtomicUsize,
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                projects: BTreeMap::new(),
                owner: DEFAULT_OWNER.to_string(),
            }),
            cross_project_create: false,
            get_requests: AtomicUsize::new(0),
            list_requests: AtomicUsize::new(0),
        }
    }

    /// Registers a project.
    pub fn with_project(self, project: &str) -> Self {
        self.add_project(project);
        self
    }

    /// Accepts table creation in any registered project, not just the
    /// client's bound one.
    pub fn allow_cross_project_create(mut self) -> Self {
        self.cross_project_create = true;
        self
    }

    pub fn add_project(&self, project: &str) {
        self.lock()
            .projects
            .entry(project.to_owned())
            .or_default();
    }

    /// Sets the owner recorded on tables created from now on.
    pub fn set_owner(&self, owner: &str) {
        self.lock().owner = owner.to_owned();
    }

    /// Number of single-table metadata fetches served so far.
    pub fn get_requests(&self) -> usize {
        self.get_requests.load(Ordering::Relaxed)
    }

    /// Number of listing pages served so far.
    pub fn list_requests(&self) -> usize {
        self.list_requests.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn no_such_project(project: &str) -> TransportError {
    TransportError::new(404, format!("Project {project} does not exist")).with_code(NO_SUCH_PROJECT)
}

fn no_such_table(project: &str, name: &str) -> TransportError {
    TransportError::not_found(format!("Table {project}.{name} does not exist"))
}

impl MemoryState {
    fn project(&self, project: &str) -> Result<&BTreeMap<String, TableMeta>, TransportError> {
        self.projects
            .get(project)
            .ok_or_else(|| no_such_project(project))
    }

    fn project_mut(
        &mut self,
        project: &str,
    ) -> Result<&mut BTreeMap<String, TableMeta>, TransportError> {
        self.projects
            .get_mut(project)
            .ok_or_else(|| no_such_project(project))
    }
}

impl CatalogTransport for MemoryCatalog {
    fn create_table(&self, request: &CreateTableRequest) -> Result<TableMeta, TransportError> {
        let mut state = self.lock();
        let owner = state.owner.clone();
        let tables = state.project_mut(&request.project)?;

        if let Some(existing) = tables.get(&request.name) {
            if request.if_not_exists {
                return Ok(existing.clone());
            }
            return Err(TransportError::already_exists(format!(
                "Table {}.{} already exists",
                request.project, request.name
            )));
        }

        let mut meta = TableMeta::new(&request.project, &request.name, request.schema.clone());
        meta.comment = request.comment.clone();
        meta.owner = owner;
        meta.lifecycle = request.lifecycle;
        meta.schema_name = request.schema_name.clone();

        trace!(project = %request.project, table = %request.name, "memory catalog: create");
        tables.insert(request.name.clone(), meta.clone());
        Ok(meta)
    }

    fn get_table(&self, project: &str, name: &str) -> Result<TableMeta, TransportError> {
        self.get_requests.fetch_add(1, Ordering::Relaxed);
        self.lock()
            .project(project)?
            .get(name)
            .cloned()
            .ok_or_else(|| no_such_table(project, name))
    }

    fn delete_table(&self, project: &str, name: &str) -> Result<(), TransportError> {
        trace!(project, table = name, "memory catalog: delete");
        self.lock()
            .project_mut(project)?
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| no_such_table(project, name))
    }

    fn update_comment(
        &self,
        project: &str,
        name: &str,
        comment: &str,
    ) -> Result<(), TransportError> {
        let mut state = self.lock();
        let meta = state
            .project_mut(project)?
            .get_mut(name)
            .ok_or_else(|| no_such_table(project, name))?;
        meta.comment = comment.to_owned();
        meta.last_modified = SystemTime::now();
        Ok(())
    }

    fn list_tables(&self, request: &ListTablesRequest) -> Result<TablePage, TransportError> {
        self.list_requests.fetch_add(1, Ordering::Relaxed);

        if request.max_items == 0 {
            return Err(TransportError::new(400, "max_items must be positive"));
        }

        let state = self.lock();
        let tables = state.project(&request.project)?;

        let lower = match &request.marker {
            Some(marker) => Bound::Excluded(marker.as_str()),
            None => Bound::Unbounded,
        };

        let mut matching = tables
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(_, meta)| meta)
            .filter(|meta| {
                request
                    .filter
                    .matches(&meta.name, &meta.owner, meta.schema_name.as_deref())
            });

        let page: Vec<TableSummary> = matching
            .by_ref()
            .take(request.max_items)
            .map(|meta| TableSummary {
                name: meta.name.clone(),
                owner: meta.owner.clone(),
                schema_name: meta.schema_name.clone(),
            })
            .collect();

        let marker = match matching.next() {
            Some(_) => page.last().map(|summary| summary.name.clone()),
            None => None,
        };

        Ok(TablePage {
            tables: page,
            marker,
        })
    }

    fn supports_cross_project_create(&self) -> bool {
        self.cross_project_create
    }
}
