use crate::{
    common::error::{Result, require_non_empty},
    core::types::ColumnType,
};

/// Definition of a single column in a table schema.
///
/// The comment is never absent: a column built without one carries an empty
/// string, which is also what the catalog reports back for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// The column name.
    pub(crate) name: String,

    /// The catalog type of values in this column.
    pub(crate) column_type: ColumnType,

    pub(crate) comment: String,
}

impl Column {
    /// Creates a new column with an empty comment.
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_owned(),
            column_type,
            comment: String::new(),
        }
    }

    /// Creates a new column with a comment.
    pub fn with_comment(name: &str, column_type: ColumnType, comment: &str) -> Self {
        Self {
            name: name.to_owned(),
            column_type,
            comment: comment.to_owned(),
        }
    }

    /// Creates a column from a type name such as `"bigint"`.
    pub fn parse(name: &str, type_name: &str) -> Result<Self> {
        require_non_empty("column name", name)?;
        Ok(Self::new(name, ColumnType::parse(type_name)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.column_type)?;
        if !self.comment.is_empty() {
            write!(f, " COMMENT '{}'", self.comment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::CatalogError;

    #[test]
    fn test_comment_defaults_to_empty() {
        let col = Column::new("c1", ColumnType::Bigint);
        assert_eq!(col.comment(), "");
        assert_eq!(col.to_string(), "c1 BIGINT");
    }

    #[test]
    fn test_display_with_comment() {
        let col = Column::with_comment("_c2", ColumnType::String, "_comment here");
        assert_eq!(col.to_string(), "_c2 STRING COMMENT '_comment here'");
    }

    #[test]
    fn test_parse_column() {
        let col = Column::parse("p1", "bigint").unwrap();
        assert_eq!(col.name(), "p1");
        assert_eq!(col.column_type(), ColumnType::Bigint);

        assert!(matches!(
            Column::parse("p1", "nope"),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            Column::parse("", "bigint"),
            Err(CatalogError::Validation(_))
        ));
    }
}
