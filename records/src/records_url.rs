use crate::{RecordId, Table};

#[derive(Debug, Clone)]
pub struct RecordsURL(String);

impl AsRef<str> for RecordsURL {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl RecordsURL {
    pub fn new(base: &str) -> Self {
        Self(base.trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn records(&self, table: Table) -> Self {
        self.append_path(&format!("tables/{}/records", table))
    }

    pub fn query(&self, table: Table) -> Self {
        self.records(table).append_path("query")
    }

    pub fn record(&self, table: Table, id: RecordId) -> Self {
        self.records(table).append_path(&id.to_string())
    }
}
