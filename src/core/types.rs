use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::common::error::{CatalogError, Result};

/// Primitive column types understood by the catalog.
///
/// The set is closed: a type name the catalog does not know is rejected when
/// the column is built, never passed through to the remote service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ColumnType {
    /// 8-bit signed integer.
    Tinyint,
    /// 16-bit signed integer.
    Smallint,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Bigint,
    Float,
    Double,
    Decimal,
    Boolean,
    String,
    Varchar,
    Char,
    Binary,
    /// Calendar date without a time component.
    Date,
    /// Date and time with millisecond precision.
    Datetime,
    /// Date and time with nanosecond precision.
    Timestamp,
}

impl ColumnType {
    /// Parses a catalog type name, case-insensitively.
    ///
    /// Unlike [`FromStr`], failure is reported as a
    /// [`CatalogError::Validation`] so callers building schemas get the same
    /// error kind as any other schema defect.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name.trim())
            .map_err(|_| CatalogError::Validation(format!("Unknown column type: {name}")))
    }

    /// Returns the canonical upper-case type name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether values of this type are whole numbers.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ColumnType::Tinyint | ColumnType::Smallint | ColumnType::Int | ColumnType::Bigint
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(ColumnType::parse("bigint").unwrap(), ColumnType::Bigint);
        assert_eq!(ColumnType::parse("BIGINT").unwrap(), ColumnType::Bigint);
        assert_eq!(ColumnType::parse(" Boolean ").unwrap(), ColumnType::Boolean);
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let err = ColumnType::parse("int128").unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for ty in ColumnType::iter() {
            assert_eq!(ColumnType::parse(&ty.to_string()).unwrap(), ty);
            assert_eq!(ty.as_str(), ty.to_string());
        }
    }

    #[test]
    fn test_is_integer() {
        assert!(ColumnType::Bigint.is_integer());
        assert!(ColumnType::Tinyint.is_integer());
        assert!(!ColumnType::Double.is_integer());
        assert!(!ColumnType::String.is_integer());
    }
}
