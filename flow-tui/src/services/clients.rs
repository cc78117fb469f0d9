use records::{ExactMatchFilter, Record, RecordId, RecordsError};

use super::RecordService;
use crate::types::Client;

#[derive(Clone)]
pub struct ClientService {
    records: RecordService,
}

fn client_record(name: &str) -> Record {
    let mut record = Record::new();
    record.insert("Name".into(), name.trim().into());
    record
}

impl ClientService {
    pub fn new(records: RecordService) -> Self {
        Self { records }
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<Vec<Client>, RecordsError> {
        let rows = self
            .records
            .list(&ExactMatchFilter::new(), page, limit)
            .await?;
        Ok(rows.iter().filter_map(Client::from_record).collect())
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<Option<Client>, RecordsError> {
        let row = self.records.get_by_id(id).await?;
        Ok(row.as_ref().and_then(Client::from_record))
    }

    pub async fn create(&self, name: &str) -> Result<Option<Client>, RecordsError> {
        let row = self.records.create(client_record(name)).await?;
        Ok(row.as_ref().and_then(Client::from_record))
    }

    pub async fn update(&self, id: RecordId, name: &str) -> Result<Option<Client>, RecordsError> {
        let row = self.records.update(id, client_record(name)).await?;
        Ok(row.as_ref().and_then(Client::from_record))
    }

    pub async fn delete(&self, id: RecordId) -> Result<bool, RecordsError> {
        self.records.delete(id).await
    }

    pub async fn count(&self) -> Result<usize, RecordsError> {
        Ok(self.records.list_all(&ExactMatchFilter::new()).await?.len())
    }

    /// Find the client with exactly this name, creating it when missing.
    pub async fn ensure_exists(&self, name: &str) -> Result<Option<Client>, RecordsError> {
        let name = name.trim();
        let existing = self
            .records
            .list_all(&ExactMatchFilter::new().with("Name", name))
            .await?;
        if let Some(client) = existing.iter().find_map(Client::from_record) {
            return Ok(Some(client));
        }

        tracing::info!(client = name, "creating client");
        self.create(name).await
    }
}
