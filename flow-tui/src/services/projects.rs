use records::{ExactMatchFilter, RecordId, RecordsError};

use super::RecordService;
use crate::types::{Project, ProjectDraft, ProjectStats, Status};

#[derive(Clone)]
pub struct ProjectService {
    records: RecordService,
}

impl ProjectService {
    pub fn new(records: RecordService) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &RecordService {
        &self.records
    }

    pub async fn list(
        &self,
        filters: &ExactMatchFilter,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Project>, RecordsError> {
        let rows = self.records.list(filters, page, limit).await?;
        Ok(rows.iter().filter_map(Project::from_record).collect())
    }

    pub async fn list_all(&self) -> Result<Vec<Project>, RecordsError> {
        let rows = self.records.list_all(&ExactMatchFilter::new()).await?;
        Ok(rows.iter().filter_map(Project::from_record).collect())
    }

    pub async fn get_by_id(&self, id: RecordId) -> Result<Option<Project>, RecordsError> {
        let row = self.records.get_by_id(id).await?;
        Ok(row.as_ref().and_then(Project::from_record))
    }

    pub async fn create(&self, draft: &ProjectDraft) -> Result<Option<Project>, RecordsError> {
        let row = self.records.create(draft.to_record()).await?;
        Ok(row.as_ref().and_then(Project::from_record))
    }

    pub async fn update(
        &self,
        id: RecordId,
        draft: &ProjectDraft,
    ) -> Result<Option<Project>, RecordsError> {
        let row = self.records.update(id, draft.to_record()).await?;
        Ok(row.as_ref().and_then(Project::from_record))
    }

    pub async fn delete(&self, id: RecordId) -> Result<bool, RecordsError> {
        self.records.delete(id).await
    }

    /// Total project count and how many are in progress.
    pub async fn stats(&self) -> Result<ProjectStats, RecordsError> {
        let total = self.records.list_all(&ExactMatchFilter::new()).await?.len();
        let active = self
            .records
            .list_all(&ExactMatchFilter::new().with("status", Status::InProgress.to_string()))
            .await?
            .len();
        Ok(ProjectStats { total, active })
    }
}
