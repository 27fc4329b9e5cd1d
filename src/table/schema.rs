use super::column_def::Column;
use crate::common::error::{CatalogError, ObjectKind, Result, require_non_empty};

/// The structure of a catalog table.
///
/// A schema holds two ordered column lists: data columns, in physical order,
/// and partition columns. Names are unique across both lists. Every mutation
/// is validated immediately, so a `TableSchema` value is always well formed.
///
/// A schema read back from the catalog is an owned copy. Changing it has no
/// effect on the remote table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSchema {
    columns: Vec<Column>,
    partition_columns: Vec<Column>,
}

impl TableSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a data column.
    ///
    /// Fails if the name is empty or already used by a data or partition
    /// column.
    pub fn add_column(&mut self, column: Column) -> Result<()> {
        self.check_new_name(&column.name)?;
        self.columns.push(column);
        Ok(())
    }

    /// Appends a partition column.
    ///
    /// Fails if the name is empty or already used by a data or partition
    /// column.
    pub fn add_partition_column(&mut self, column: Column) -> Result<()> {
        self.check_new_name(&column.name)?;
        self.partition_columns.push(column);
        Ok(())
    }

    /// Chaining form of [`TableSchema::add_column`].
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        self.add_column(column)?;
        Ok(self)
    }

    /// Chaining form of [`TableSchema::add_partition_column`].
    pub fn with_partition_column(mut self, column: Column) -> Result<Self> {
        self.add_partition_column(column)?;
        Ok(self)
    }

    /// Data columns in physical order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Partition columns in declaration order.
    pub fn partition_columns(&self) -> &[Column] {
        &self.partition_columns
    }

    /// Looks up a data column by exact name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|col| col.name == name)
            .ok_or_else(|| CatalogError::NotFound {
                kind: ObjectKind::Column,
                name: name.to_owned(),
            })
    }

    /// Looks up a partition column by exact name.
    pub fn partition_column(&self, name: &str) -> Result<&Column> {
        self.partition_columns
            .iter()
            .find(|col| col.name == name)
            .ok_or_else(|| CatalogError::NotFound {
                kind: ObjectKind::PartitionColumn,
                name: name.to_owned(),
            })
    }

    /// Finds the position of a data column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// Whether `name` is used by any column, data or partition.
    pub fn contains(&self, name: &str) -> bool {
        self.columns
            .iter()
            .chain(&self.partition_columns)
            .any(|col| col.name == name)
    }

    pub fn is_partition_column(&self, name: &str) -> bool {
        self.partition_columns.iter().any(|col| col.name == name)
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partition_columns.is_empty()
    }

    fn check_new_name(&self, name: &str) -> Result<()> {
        require_non_empty("column name", name)?;

        if self.is_partition_column(name) {
            return Err(CatalogError::Validation(format!(
                "Column {name} is already defined as a partition column"
            )));
        }
        if self.column_index(name).is_some() {
            return Err(CatalogError::Validation(format!(
                "Column {name} is already defined"
            )));
        }

        Ok(())
    }
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl std::fmt::Display for TableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", join_columns(&self.columns))?;
        if self.is_partitioned() {
            write!(
                f,
                " PARTITIONED BY ({})",
                join_columns(&self.partition_columns)
            )?;
        }
        Ok(())
    }
}
