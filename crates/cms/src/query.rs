//! Query model for the item store.
//!
//! Filters build the same condition trees the store's REST API expects
//! (`_eq`, `_icontains`, `_and`, ...); [`Query`] serializes the whole thing
//! into request query parameters.

use serde_json::{Value, json};

/// A filter tree over collection fields.
#[derive(Debug, Clone)]
pub enum Filter {
    /// Field equals value.
    Eq(String, Value),
    /// Field does not equal value.
    Neq(String, Value),
    /// Field contains the string, case-insensitively.
    IContains(String, String),
    /// Field is one of the values.
    In(String, Vec<Value>),
    /// Field is greater than or equal to value.
    Gte(String, Value),
    /// Field is less than or equal to value.
    Lte(String, Value),
    /// Field is null.
    Null(String),
    /// All branches must match.
    And(Vec<Filter>),
    /// At least one branch must match.
    Or(Vec<Filter>),
}

impl Filter {
    /// `field == value`
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq(field.into(), value.into())
    }

    /// `field != value`
    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Neq(field.into(), value.into())
    }

    /// Case-insensitive substring match.
    pub fn icontains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::IContains(field.into(), value.into())
    }

    /// `field IN values`
    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> Self {
        Self::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    /// `field >= value`
    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Gte(field.into(), value.into())
    }

    /// `field <= value`
    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Lte(field.into(), value.into())
    }

    /// `field IS NULL`
    pub fn null(field: impl Into<String>) -> Self {
        Self::Null(field.into())
    }

    /// Conjunction of branches.
    #[must_use]
    pub fn and(branches: Vec<Self>) -> Self {
        Self::And(branches)
    }

    /// Disjunction of branches.
    #[must_use]
    pub fn or(branches: Vec<Self>) -> Self {
        Self::Or(branches)
    }

    /// Serialize to the store's filter JSON.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Eq(field, value) => json!({ field: { "_eq": value } }),
            Self::Neq(field, value) => json!({ field: { "_neq": value } }),
            Self::IContains(field, value) => json!({ field: { "_icontains": value } }),
            Self::In(field, values) => json!({ field: { "_in": values } }),
            Self::Gte(field, value) => json!({ field: { "_gte": value } }),
            Self::Lte(field, value) => json!({ field: { "_lte": value } }),
            Self::Null(field) => json!({ field: { "_null": true } }),
            Self::And(branches) => {
                json!({ "_and": branches.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
            Self::Or(branches) => {
                json!({ "_or": branches.iter().map(Self::to_value).collect::<Vec<_>>() })
            }
        }
    }
}

/// One list/count request against a collection.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filter: Option<Filter>,
    fields: Vec<String>,
    sort: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
    search: Option<String>,
    with_counts: bool,
}

impl Query {
    /// Create an empty query (no filter, store-default paging).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter tree.
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Project only the given fields.
    #[must_use]
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// Sort key; prefix with `-` for descending.
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Maximum number of rows.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Row offset.
    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Full-text search term.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Request `total_count`/`filter_count` metadata alongside the rows.
    #[must_use]
    pub const fn with_counts(mut self) -> Self {
        self.with_counts = true;
        self
    }

    /// Serialize to request query parameters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(filter) = &self.filter {
            params.push(("filter".to_string(), filter.to_value().to_string()));
        }
        if !self.fields.is_empty() {
            params.push(("fields".to_string(), self.fields.join(",")));
        }
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.clone()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if self.with_counts {
            params.push(("meta".to_string(), "total_count,filter_count".to_string()));
        }

        params
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_filter_shape() {
        let f = Filter::eq("status", "open");
        assert_eq!(f.to_value(), json!({ "status": { "_eq": "open" } }));
    }

    #[test]
    fn test_nested_and_or() {
        let f = Filter::and(vec![
            Filter::eq("is_deleted", false),
            Filter::or(vec![
                Filter::eq("nim_ketua", "123"),
                Filter::eq("nim_anggota1", "123"),
            ]),
        ]);

        assert_eq!(
            f.to_value(),
            json!({
                "_and": [
                    { "is_deleted": { "_eq": false } },
                    { "_or": [
                        { "nim_ketua": { "_eq": "123" } },
                        { "nim_anggota1": { "_eq": "123" } },
                    ] },
                ]
            })
        );
    }

    #[test]
    fn test_query_params() {
        let q = Query::new()
            .filter(Filter::eq("status", "open"))
            .sort("-date_created")
            .limit(10)
            .offset(20)
            .with_counts();

        let params = q.to_params();
        assert!(params.contains(&("sort".to_string(), "-date_created".to_string())));
        assert!(params.contains(&("limit".to_string(), "10".to_string())));
        assert!(params.contains(&("offset".to_string(), "20".to_string())));
        assert!(
            params.contains(&("meta".to_string(), "total_count,filter_count".to_string()))
        );
        let filter = &params.iter().find(|(k, _)| k == "filter").unwrap().1;
        assert_eq!(
            serde_json::from_str::<Value>(filter).unwrap(),
            json!({ "status": { "_eq": "open" } })
        );
    }

    #[test]
    fn test_in_filter_values() {
        let f = Filter::is_in("status", vec!["open", "coming-soon"]);
        assert_eq!(
            f.to_value(),
            json!({ "status": { "_in": ["open", "coming-soon"] } })
        );
    }
}
