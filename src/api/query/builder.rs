//! QueryBuilder for fluent SOQL construction
//!
//! `Query` is the reusable value; `QueryBuilder` assembles one fluently.

use super::filters::Filter;

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sobject: String,
    pub select: Vec<String>,
    pub filter: Option<Filter>,
    pub limit: Option<u32>,
}

impl Query {
    pub fn new(sobject: impl Into<String>) -> Self {
        Self {
            sobject: sobject.into(),
            select: vec!["Id".to_string()],
            filter: None,
            limit: None,
        }
    }

    /// Render the query as SOQL text
    pub fn to_soql(&self) -> String {
        let mut soql = format!("SELECT {} FROM {}", self.select.join(", "), self.sobject);

        if let Some(filter) = &self.filter {
            soql.push_str(" WHERE ");
            soql.push_str(&filter.to_soql_string());
        }

        if let Some(limit) = self.limit {
            soql.push_str(&format!(" LIMIT {}", limit));
        }

        soql
    }
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new(sobject: impl Into<String>) -> Self {
        Self {
            query: Query::new(sobject),
        }
    }

    /// Select specific fields
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.query.select = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add filter condition
    pub fn filter(mut self, filter: Filter) -> Self {
        self.query.filter = Some(filter);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub fn build(self) -> Query {
        self.query
    }

    pub fn to_soql(self) -> String {
        self.query.to_soql()
    }
}

// Convenience methods for common patterns
impl QueryBuilder {
    /// `SELECT Id, Name FROM <sobject>`, the shape every name lookup uses
    pub fn id_and_name(sobject: impl Into<String>) -> Self {
        Self::new(sobject).select(&["Id", "Name"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_query_builder() {
        let query = QueryBuilder::new("Account")
            .select(&["Id", "Name"])
            .filter(Filter::eq("Name", "Acme"))
            .limit(10)
            .build();

        assert_eq!(query.sobject, "Account");
        assert_eq!(query.select, vec!["Id".to_string(), "Name".to_string()]);
        assert_eq!(
            query.to_soql(),
            "SELECT Id, Name FROM Account WHERE Name = 'Acme' LIMIT 10"
        );
    }

    #[test]
    fn test_default_select_is_id() {
        assert_eq!(QueryBuilder::new("Contact").to_soql(), "SELECT Id FROM Contact");
    }

    #[test]
    fn test_record_type_lookup_shape() {
        let soql = QueryBuilder::id_and_name("RecordType")
            .filter(Filter::and(vec![
                Filter::eq("SobjectType", "Lead"),
                Filter::eq("IsActive", true),
                Filter::is_in("Name", ["Retail"]),
            ]))
            .to_soql();

        assert_eq!(
            soql,
            "SELECT Id, Name FROM RecordType WHERE SobjectType = 'Lead' AND IsActive = true AND Name IN ('Retail')"
        );
    }
}
