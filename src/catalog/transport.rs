use thiserror::Error;

use crate::{
    common::error::{CatalogError, ObjectKind},
    table::{filter::TableFilter, schema::TableSchema, table_def::TableMeta},
};

/// Error code reported when a table does not exist.
pub const NO_SUCH_OBJECT: &str = "NoSuchObject";
/// Error code reported when the target project does not exist.
pub const NO_SUCH_PROJECT: &str = "NoSuchProject";
/// Error code reported when a table name is already taken.
pub const OBJECT_ALREADY_EXISTS: &str = "ObjectAlreadyExists";

/// A failed catalog request, as reported by the transport.
///
/// Mirrors an HTTP error response: a status, an optional service error
/// code and a message. The client translates it into a [`CatalogError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status} {}: {message}", .code.as_deref().unwrap_or("Error"))]
pub struct TransportError {
    pub status: u16,
    pub code: Option<String>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_owned());
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(404, message).with_code(NO_SUCH_OBJECT)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(409, message).with_code(OBJECT_ALREADY_EXISTS)
    }

    /// Maps the failure of a request about `project.name` onto the client's
    /// error taxonomy.
    pub(crate) fn into_catalog_error(self, project: &str, name: &str) -> CatalogError {
        match (self.status, self.code.as_deref()) {
            (_, Some(NO_SUCH_PROJECT)) => CatalogError::NotFound {
                kind: ObjectKind::Project,
                name: project.to_owned(),
            },
            (404, _) | (_, Some(NO_SUCH_OBJECT)) => CatalogError::table_not_found(project, name),
            (409, _) | (_, Some(OBJECT_ALREADY_EXISTS)) => CatalogError::AlreadyExists {
                project: project.to_owned(),
                name: name.to_owned(),
            },
            _ => self.into_transport_error(),
        }
    }

    /// Maps the failure of a listing in `project`. A listing targets no
    /// table, so a missing object can only be the project.
    pub(crate) fn into_list_error(self, project: &str) -> CatalogError {
        match (self.status, self.code.as_deref()) {
            (404, _) | (_, Some(NO_SUCH_PROJECT | NO_SUCH_OBJECT)) => CatalogError::NotFound {
                kind: ObjectKind::Project,
                name: project.to_owned(),
            },
            _ => self.into_transport_error(),
        }
    }

    fn into_transport_error(self) -> CatalogError {
        CatalogError::Transport {
            status: self.status,
            code: self.code,
            message: self.message,
        }
    }
}

/// Payload of a table creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableRequest {
    pub project: String,
    pub name: String,
    pub schema: TableSchema,
    pub comment: String,
    pub if_not_exists: bool,
    pub lifecycle: Option<u32>,
    pub schema_name: Option<String>,
}

/// One page request of a table listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTablesRequest {
    pub project: String,
    pub filter: TableFilter,
    /// Continuation marker from the previous page, `None` for the first.
    pub marker: Option<String>,
    pub max_items: usize,
}

/// The listing attributes of one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub owner: String,
    pub schema_name: Option<String>,
}

/// One page of a table listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablePage {
    pub tables: Vec<TableSummary>,
    /// Opaque continuation marker; `None` on the last page.
    pub marker: Option<String>,
}

/// The request/response boundary the catalog client runs on.
///
/// Implementations own everything below the logical operation: signing,
/// retries, framing and session handling. They must be safe to share between
/// threads, since one client may issue requests from many callers at once.
pub trait CatalogTransport: Send + Sync {
    /// Creates a table and returns its metadata as stored by the catalog.
    fn create_table(&self, request: &CreateTableRequest) -> Result<TableMeta, TransportError>;

    /// Fetches the full metadata of one table.
    fn get_table(&self, project: &str, name: &str) -> Result<TableMeta, TransportError>;

    fn delete_table(&self, project: &str, name: &str) -> Result<(), TransportError>;

    fn update_comment(&self, project: &str, name: &str, comment: &str)
    -> Result<(), TransportError>;

    /// Fetches one page of tables matching the request's filter.
    fn list_tables(&self, request: &ListTablesRequest) -> Result<TablePage, TransportError>;

    /// Whether the service accepts creation in projects other than the
    /// client's bound project.
    fn supports_cross_project_create(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_not_found() {
        let err = TransportError::not_found("gone").into_catalog_error("prj", "t1");
        assert!(matches!(
            err,
            CatalogError::NotFound { kind: ObjectKind::Table, ref name } if name == "prj.t1"
        ));

        let err = TransportError::new(404, "gone").into_catalog_error("prj", "t1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_translate_missing_project() {
        let err = TransportError::new(404, "no project")
            .with_code(NO_SUCH_PROJECT)
            .into_catalog_error("other", "t1");
        assert!(matches!(
            err,
            CatalogError::NotFound { kind: ObjectKind::Project, ref name } if name == "other"
        ));
    }

    #[test]
    fn test_translate_list_failure() {
        for err in [
            TransportError::new(404, "gone"),
            TransportError::not_found("gone"),
            TransportError::new(404, "gone").with_code(NO_SUCH_PROJECT),
        ] {
            assert!(matches!(
                err.into_list_error("prj"),
                CatalogError::NotFound { kind: ObjectKind::Project, ref name } if name == "prj"
            ));
        }

        let err = TransportError::new(503, "busy").into_list_error("prj");
        assert!(matches!(err, CatalogError::Transport { status: 503, .. }));
    }

    #[test]
    fn test_translate_conflict() {
        let err = TransportError::already_exists("taken").into_catalog_error("prj", "t1");
        assert!(err.is_already_exists());
    }

    #[test]
    fn test_other_failures_pass_through() {
        let err = TransportError::new(403, "denied")
            .with_code("AccessDenied")
            .into_catalog_error("prj", "t1");
        match err {
            CatalogError::Transport {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 403);
                assert_eq!(code.as_deref(), Some("AccessDenied"));
                assert_eq!(message, "denied");
            }
            other => panic!("Expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransportError::not_found("gone").to_string(),
            "404 NoSuchObject: gone"
        );
        assert_eq!(TransportError::new(500, "boom").to_string(), "500 Error: boom");
    }
}
