mod exact_match_filter;
mod fetch_params;
mod paging_info;

pub use exact_match_filter::ExactMatchFilter;
pub use fetch_params::FetchParams;
pub use paging_info::PagingInfo;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait RecordFilter {
    fn as_where_clauses(&self) -> Vec<WhereClause>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    ExactMatch,
}

/// One condition of a `where` list: `{fieldName, operator, values}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereClause {
    pub field_name: String,
    pub operator: FilterOperator,
    pub values: Vec<Value>,
}

impl WhereClause {
    pub fn exact(field_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field_name: field_name.into(),
            operator: FilterOperator::ExactMatch,
            values: vec![value.into()],
        }
    }
}
