//! A client for a remote, project-scoped table catalog.
//!
//! [`Tables`] creates, fetches, checks and drops tables in the project it is
//! bound to, and lists them lazily through [`TableIter`]. Requests go through
//! a [`CatalogTransport`]; [`MemoryCatalog`] is an in-process implementation.
//!
//! ```
//! use std::sync::Arc;
//!
//! use table_catalog::{CatalogConfig, Column, ColumnType, MemoryCatalog, TableSchema, Tables};
//!
//! # fn main() -> table_catalog::Result<()> {
//! let catalog = Arc::new(MemoryCatalog::new().with_project("analytics"));
//! let tables = Tables::new(CatalogConfig::new("analytics")?, catalog);
//!
//! let schema = TableSchema::new()
//!     .with_column(Column::new("c1", ColumnType::Bigint))?
//!     .with_partition_column(Column::new("p1", ColumnType::Bigint))?;
//! tables.create("analytics", "t1", &schema)?;
//!
//! let mut table = tables.get("t1");
//! assert_eq!(table.schema()?.column("c1")?.comment(), "");
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod common;
pub mod core;
pub mod table;

pub use catalog::{
    config::CatalogConfig,
    iter::TableIter,
    memory::MemoryCatalog,
    tables::{CreateOptions, Tables},
    transport::{
        CatalogTransport, CreateTableRequest, ListTablesRequest, TablePage, TableSummary,
        TransportError,
    },
};
pub use common::error::{CatalogError, ObjectKind, Result};
pub use crate::core::types::ColumnType;
pub use table::{Column, Table, TableFilter, TableMeta, TableSchema};
