//! SOQL filter building
//!
//! Provides type-safe WHERE clause construction. String values are always
//! quoted and escaped, so sheet text can be used directly as a filter value.

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, FilterValue),
    In(String, Vec<FilterValue>),
    And(Vec<Filter>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    String(String),
    Boolean(bool),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    pub fn is_in<I, V>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    /// Convert filter to a SOQL condition
    pub fn to_soql_string(&self) -> String {
        match self {
            Filter::Eq(field, value) => format!("{} = {}", field, value.to_soql_string()),
            Filter::In(field, values) => {
                let values: Vec<String> = values.iter().map(|v| v.to_soql_string()).collect();
                format!("{} IN ({})", field, values.join(", "))
            }

            Filter::And(filters) => join_filters(filters, " AND "),
        }
    }
}

fn join_filters(filters: &[Filter], separator: &str) -> String {
    filters
        .iter()
        .map(|f| match f {
            Filter::And(_) => format!("({})", f.to_soql_string()),
            _ => f.to_soql_string(),
        })
        .collect::<Vec<_>>()
        .join(separator)
}

impl FilterValue {
    pub fn to_soql_string(&self) -> String {
        match self {
            FilterValue::String(s) => format!("'{}'", escape_literal(s)),
            FilterValue::Boolean(b) => b.to_string(),
        }
    }
}

/// Escape a string for use inside a single-quoted SOQL literal
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\u{0008}' => escaped.push_str("\\b"),
            '\u{000C}' => escaped.push_str("\\f"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<&String> for FilterValue {
    fn from(value: &String) -> Self {
        FilterValue::String(value.clone())
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Boolean(value)
    }
}
