/// Narrows a table enumeration.
///
/// Each field is optional; an unset field does not constrain the listing.
/// A filter holds no cursor state and can be reused across enumerations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableFilter {
    /// Table name prefix (case-sensitive).
    pub name: Option<String>,

    /// Exact owner of the table.
    pub owner: Option<String>,

    /// Exact schema (sub-namespace) the table belongs to.
    pub schema_name: Option<String>,
}

impl TableFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, prefix: impl Into<String>) -> Self {
        self.name = Some(prefix.into());
        self
    }

    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn schema_name(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Whether no field is set.
    pub fn is_unconstrained(&self) -> bool {
        self.name.is_none() && self.owner.is_none() && self.schema_name.is_none()
    }

    /// Evaluates the filter against one table's listing attributes.
    pub fn matches(&self, name: &str, owner: &str, schema_name: Option<&str>) -> bool {
        if self
            .name
            .as_deref()
            .is_some_and(|prefix| !name.starts_with(prefix))
        {
            return false;
        }

        if self.owner.as_deref().is_some_and(|expected| expected != owner) {
            return false;
        }

        match &self.schema_name {
            Some(expected) => schema_name == Some(expected.as_str()),
            None => true,
        }
    }
}
