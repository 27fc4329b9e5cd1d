//! Client-side model of catalog tables: columns, schemas, filters and
//! table handles.

pub mod column_def;
pub mod filter;
pub mod schema;
pub mod table_def;

pub use column_def::Column;
pub use filter::TableFilter;
pub use schema::TableSchema;
pub use table_def::{Table, TableMeta};
