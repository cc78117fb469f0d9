use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u32,
    pub offset: u32,
}

impl PagingInfo {
    /// Paging for a 1-based page number. Page 0 is treated as page 1.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            limit,
            offset: page.max(1).saturating_sub(1).saturating_mul(limit),
        }
    }
}
