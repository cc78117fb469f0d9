use serde::{Deserialize, Serialize};

use super::{PagingInfo, RecordFilter, WhereClause};

/// Body of a `fetchRecords` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchParams {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub paging_info: Option<PagingInfo>,
    #[serde(rename = "where", skip_serializing_if = "Vec::is_empty", default)]
    pub where_clauses: Vec<WhereClause>,
}

impl FetchParams {
    /// No paging, no filters: the whole table.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn paged(page: u32, limit: u32) -> Self {
        Self {
            paging_info: Some(PagingInfo::page(page, limit)),
            where_clauses: Vec::new(),
        }
    }

    pub fn with_filter(mut self, filter: &impl RecordFilter) -> Self {
        self.where_clauses.extend(filter.as_where_clauses());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExactMatchFilter;
    use serde_json::json;

    #[test]
    fn serializes_paging_and_where() {
        let params = FetchParams::paged(2, 20)
            .with_filter(&ExactMatchFilter::new().with("status", "in-progress"));

        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "pagingInfo": {"limit": 20, "offset": 20},
                "where": [{
                    "fieldName": "status",
                    "operator": "ExactMatch",
                    "values": ["in-progress"]
                }]
            })
        );
    }

    #[test]
    fn empty_params_serialize_to_empty_object() {
        assert_eq!(serde_json::to_value(FetchParams::all()).unwrap(), json!({}));
    }
}
