use records::{ExactMatchFilter, Record, RecordId, RecordsError};

use super::RecordService;
use crate::types::ProjectLink;

/// Tags and team members: named rows pointing at a project.
#[derive(Clone)]
pub struct ProjectLinkService {
    records: RecordService,
}

impl ProjectLinkService {
    pub fn new(records: RecordService) -> Self {
        Self { records }
    }

    pub async fn list_by_project(
        &self,
        project_id: RecordId,
    ) -> Result<Vec<ProjectLink>, RecordsError> {
        let rows = self
            .records
            .list_all(&ExactMatchFilter::new().with("project", project_id))
            .await?;
        Ok(rows.iter().filter_map(ProjectLink::from_record).collect())
    }

    pub async fn create(
        &self,
        name: &str,
        project_id: RecordId,
    ) -> Result<Option<ProjectLink>, RecordsError> {
        let mut record = Record::new();
        record.insert("Name".into(), name.into());
        record.insert("project".into(), project_id.into());
        let row = self.records.create(record).await?;
        Ok(row.as_ref().and_then(ProjectLink::from_record))
    }

    /// Make the project's links exactly `names`, keeping rows that already match.
    #[tracing::instrument(skip(self, names), fields(table = %self.records.table()))]
    pub async fn replace_for_project(
        &self,
        project_id: RecordId,
        names: &[String],
    ) -> Result<(), RecordsError> {
        let existing = self.list_by_project(project_id).await?;

        let stale: Vec<RecordId> = existing
            .iter()
            .filter(|link| !names.contains(&link.name))
            .map(|link| link.id)
            .collect();
        self.records.delete_many(&stale).await?;

        for name in names {
            if !existing.iter().any(|link| &link.name == name) {
                self.create(name, project_id).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::services::Services;
    use records::{MemoryRecordApi, Table};
    use std::sync::Arc;

    #[tokio::test]
    async fn replace_keeps_matching_rows_and_drops_the_rest() {
        let api = MemoryRecordApi::new();
        let services = Services::new(Arc::new(api.clone()));
        services.tags.create("web", 1).await.unwrap();
        services.tags.create("legacy", 1).await.unwrap();
        services.tags.create("other-project", 2).await.unwrap();

        services
            .tags
            .replace_for_project(1, &["web".to_string(), "design".to_string()])
            .await
            .unwrap();

        let mut names: Vec<_> = services
            .tags
            .list_by_project(1)
            .await
            .unwrap()
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect();
        names.sort();
        assert_eq!(names, vec![(1, "web".to_string()), (4, "design".to_string())]);
        assert_eq!(api.rows(Table::Tag).len(), 3);
    }
}
