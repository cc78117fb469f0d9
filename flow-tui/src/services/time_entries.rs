use records::{ExactMatchFilter, RecordId, RecordsError};

use super::RecordService;
use crate::types::TimeEntry;

#[derive(Clone)]
pub struct TimeEntryService {
    records: RecordService,
}

impl TimeEntryService {
    pub fn new(records: RecordService) -> Self {
        Self { records }
    }

    pub async fn list(&self, page: u32, limit: u32) -> Result<Vec<TimeEntry>, RecordsError> {
        let rows = self
            .records
            .list(&ExactMatchFilter::new(), page, limit)
            .await?;
        Ok(rows.iter().filter_map(TimeEntry::from_record).collect())
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<Option<TimeEntry>, RecordsError> {
        let row = self.records.get_by_id(id).await?;
        Ok(row.as_ref().and_then(TimeEntry::from_record))
    }

    pub async fn create(&self, entry: &TimeEntry) -> Result<Option<TimeEntry>, RecordsError> {
        let row = self.records.create(entry.to_record()).await?;
        Ok(row.as_ref().and_then(TimeEntry::from_record))
    }

    pub async fn delete(&self, id: RecordId) -> Result<bool, RecordsError> {
        self.records.delete(id).await
    }

    /// Sum of all tracked durations, in hours.
    pub async fn tracked_hours(&self) -> Result<f64, RecordsError> {
        let rows = self.records.list_all(&ExactMatchFilter::new()).await?;
        let minutes: i64 = rows
            .iter()
            .filter_map(TimeEntry::from_record)
            .map(|e| e.duration_minutes)
            .sum();
        Ok(minutes as f64 / 60.0)
    }
}
