use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the catalog client.
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

/// What kind of catalog object a [`CatalogError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ObjectKind {
    Table,
    Column,
    #[strum(serialize = "partition column")]
    PartitionColumn,
    Project,
}

/// Errors raised by the catalog client.
///
/// Validation and cross-project errors are detected locally, before any
/// request is sent. The remaining kinds are translated from transport
/// failures. Nothing here is retried by the client.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    /// Malformed schema or an empty required argument.
    #[error("Validation error: {0}")]
    #[diagnostic(code(catalog::validation))]
    Validation(String),

    /// Creation was requested in a project other than the bound one.
    #[error("Cannot create table {name} in project {project}: client is bound to {bound}")]
    #[diagnostic(
        code(catalog::cross_project),
        help("create the table through a client bound to the target project")
    )]
    CrossProject {
        project: String,
        name: String,
        bound: String,
    },

    #[error("Table {project}.{name} already exists")]
    #[diagnostic(
        code(catalog::already_exists),
        help("pass `if_not_exists` to reuse the existing table")
    )]
    AlreadyExists { project: String, name: String },

    #[error("{kind} not found: {name}")]
    #[diagnostic(code(catalog::not_found))]
    NotFound { kind: ObjectKind, name: String },

    /// Any other failure reported by the transport.
    #[error("Catalog request failed ({status}): {message}")]
    #[diagnostic(code(catalog::transport))]
    Transport {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

impl CatalogError {
    pub(crate) fn table_not_found(project: &str, name: &str) -> Self {
        Self::NotFound {
            kind: ObjectKind::Table,
            name: format!("{project}.{name}"),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the error reports a missing table, as opposed to a missing
    /// project or column.
    pub fn is_table_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound {
                kind: ObjectKind::Table,
                ..
            }
        )
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Ensures a required string argument is not empty.
pub(crate) fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CatalogError::Validation(format!("{what} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CatalogError::table_not_found("prj", "t1");
        assert_eq!(err.to_string(), "table not found: prj.t1");
        assert!(err.is_not_found());
        assert!(err.is_table_not_found());
        assert!(!err.is_already_exists());
    }

    #[test]
    fn test_partition_column_kind_display() {
        let err = CatalogError::NotFound {
            kind: ObjectKind::PartitionColumn,
            name: "p9".to_string(),
        };
        assert_eq!(err.to_string(), "partition column not found: p9");
        assert!(err.is_not_found());
        assert!(!err.is_table_not_found());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("name", "t1").is_ok());
        assert!(matches!(
            require_non_empty("name", ""),
            Err(CatalogError::Validation(msg)) if msg == "name must not be empty"
        ));
    }
}
