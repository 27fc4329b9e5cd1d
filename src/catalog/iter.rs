use std::{collections::HashSet, iter::FusedIterator, sync::Arc};

use tracing::{debug, warn};

use super::transport::{CatalogTransport, ListTablesRequest, TableSummary};
use crate::{
    common::error::Result,
    table::{filter::TableFilter, table_def::Table},
};

/// A lazy, paginated listing of the tables in one project.
///
/// Pages are fetched only when the iterator runs past the end of the
/// current one, so a caller that stops early never pays for the rest of the
/// listing. Each yielded [`Table`] has its name set; the remaining metadata
/// resolves on first access.
///
/// Listings are not isolated: tables created or dropped while iterating
/// may or may not show up.
///
/// A failed page fetch is yielded once as an error and ends the iteration.
/// So does a continuation marker the catalog has already handed out.
pub struct TableIter {
    project: String,
    filter: TableFilter,
    page_size: usize,
    transport: Arc<dyn CatalogTransport>,

    /// Remaining entries of the current page.
    page: std::vec::IntoIter<TableSummary>,
    /// Marker for the next page.
    marker: Option<String>,
    /// Every marker received so far.
    seen_markers: HashSet<String>,
    /// Set once the last page has been fetched or a fetch failed.
    done: bool,
}

impl TableIter {
    pub(crate) fn new(
        project: &str,
        filter: TableFilter,
        page_size: usize,
        transport: Arc<dyn CatalogTransport>,
    ) -> Self {
        Self {
            project: project.to_owned(),
            filter,
            page_size,
            transport,
            page: Vec::new().into_iter(),
            marker: None,
            seen_markers: HashSet::new(),
            done: false,
        }
    }

    fn fetch_page(&mut self) -> Result<()> {
        let request = ListTablesRequest {
            project: self.project.clone(),
            filter: self.filter.clone(),
            marker: self.marker.take(),
            max_items: self.page_size,
        };

        debug!(
            project = %self.project,
            marker = ?request.marker,
            "fetching table page"
        );

        let page = self
            .transport
            .list_tables(&request)
            .map_err(|err| err.into_list_error(&self.project))?;

        match page.marker {
            Some(marker) if !self.seen_markers.insert(marker.clone()) => {
                warn!(
                    project = %self.project,
                    %marker,
                    "catalog repeated a listing marker, ending listing"
                );
                self.done = true;
            }
            marker => {
                self.done = marker.is_none();
                self.marker = marker;
            }
        }

        self.page = page.tables.into_iter();
        Ok(())
    }
}

impl Iterator for TableIter {
    type Item = Result<Table>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(summary) = self.page.next() {
                if summary.name.is_empty() {
                    warn!(project = %self.project, "skipping unnamed table in listing");
                    continue;
                }
                return Some(Ok(Table::unresolved(
                    &self.project,
                    &summary.name,
                    self.transport.clone(),
                )));
            }

            if self.done {
                return None;
            }

            if let Err(err) = self.fetch_page() {
                self.done = true;
                return Some(Err(err));
            }
        }
    }
}

impl FusedIterator for TableIter {}

impl std::fmt::Debug for TableIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableIter")
            .field("project", &self.project)
            .field("filter", &self.filter)
            .field("page_size", &self.page_size)
            .field("marker", &self.marker)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}
