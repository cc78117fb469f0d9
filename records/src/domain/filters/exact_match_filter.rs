use std::collections::BTreeMap;

use serde_json::Value;

use super::{RecordFilter, WhereClause};

/// Field -> value equality filters. Ordered so the generated `where` list is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExactMatchFilter {
    fields: BTreeMap<String, Value>,
}

impl ExactMatchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl RecordFilter for ExactMatchFilter {
    fn as_where_clauses(&self) -> Vec<WhereClause> {
        self.fields
            .iter()
            .map(|(field, value)| WhereClause::exact(field.clone(), value.clone()))
            .collect()
    }
}
