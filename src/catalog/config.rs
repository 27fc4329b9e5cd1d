use crate::common::error::{CatalogError, Result, require_non_empty};

/// Environment variable naming the bound project.
pub const PROJECT_ENV: &str = "TABLECAT_PROJECT";
/// Environment variable overriding the listing page size.
pub const PAGE_SIZE_ENV: &str = "TABLECAT_PAGE_SIZE";

/// Number of tables requested per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Settings carried by one catalog client.
///
/// Each client owns its configuration, so clients bound to different
/// projects can live side by side in one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Project that unqualified operations run against.
    pub(crate) project: String,

    /// Tables requested per listing page.
    pub(crate) page_size: usize,
}

impl CatalogConfig {
    pub fn new(project: &str) -> Result<Self> {
        require_non_empty("project", project)?;
        Ok(Self {
            project: project.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(CatalogError::Validation(
                "page size must be positive".to_string(),
            ));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Reads the configuration from `TABLECAT_PROJECT` and
    /// `TABLECAT_PAGE_SIZE`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let project = lookup(PROJECT_ENV).ok_or_else(|| {
            CatalogError::Validation(format!("{PROJECT_ENV} is not set"))
        })?;
        let config = Self::new(&project)?;

        match lookup(PAGE_SIZE_ENV) {
            Some(raw) => {
                let page_size = raw.trim().parse::<usize>().map_err(|e| {
                    CatalogError::Validation(format!("Invalid {PAGE_SIZE_ENV} '{raw}': {e}"))
                })?;
                config.with_page_size(page_size)
            }
            None => Ok(config),
        }
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CatalogConfig::new("prj").unwrap();
        assert_eq!(config.project(), "prj");
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_rejects_empty_project_and_zero_page_size() {
        assert!(matches!(
            CatalogConfig::new(""),
            Err(CatalogError::Validation(_))
        ));
        assert!(matches!(
            CatalogConfig::new("prj").unwrap().with_page_size(0),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn test_from_lookup() {
        let config =
            CatalogConfig::from_lookup(lookup(&[(PROJECT_ENV, "prj"), (PAGE_SIZE_ENV, "25")]))
                .unwrap();
        assert_eq!(config.project(), "prj");
        assert_eq!(config.page_size(), 25);

        let config = CatalogConfig::from_lookup(lookup(&[(PROJECT_ENV, "prj")])).unwrap();
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(CatalogConfig::from_lookup(lookup(&[])).is_err());
        assert!(
            CatalogConfig::from_lookup(lookup(&[(PROJECT_ENV, "prj"), (PAGE_SIZE_ENV, "ten")]))
                .is_err()
        );
    }
}
