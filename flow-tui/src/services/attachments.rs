use records::{ExactMatchFilter, Record, RecordExt, RecordId, RecordsError};

use super::RecordService;
use crate::types::{Attachment, NewAttachment};

#[derive(Clone)]
pub struct AttachmentService {
    records: RecordService,
}

impl AttachmentService {
    pub fn new(records: RecordService) -> Self {
        Self { records }
    }

    pub async fn list_by_project(
        &self,
        project_id: RecordId,
    ) -> Result<Vec<Attachment>, RecordsError> {
        let rows = self
            .records
            .list_all(&ExactMatchFilter::new().with("project", project_id))
            .await?;
        Ok(rows.iter().map(Attachment::from_record).collect())
    }

    /// Store a staged file's metadata against a project.
    pub async fn upload(
        &self,
        file: &NewAttachment,
        project_id: RecordId,
    ) -> Result<Option<Attachment>, RecordsError> {
        let mut record = Record::new();
        record.insert("Name".into(), file.name.clone().into());
        record.insert("type".into(), file.content_type.clone().into());
        record.insert("size".into(), file.size.into());
        record.insert("url".into(), file.file_url().into());
        record.insert("project".into(), project_id.into());

        let row = self.records.create(record).await?;
        Ok(row.as_ref().filter(|r| r.id().is_some()).map(Attachment::from_record))
    }

    pub async fn delete(&self, id: RecordId) -> Result<bool, RecordsError> {
        self.records.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::services::Services;
    use crate::types::NewAttachment;
    use records::MemoryRecordApi;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[tokio::test]
    async fn uploads_are_listed_per_project() {
        let services = Services::new(Arc::new(MemoryRecordApi::new()));
        let file = NewAttachment {
            name: "brief.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size: 2048,
            path: PathBuf::from("/tmp/brief.pdf"),
        };

        let stored = services.attachments.upload(&file, 7).await.unwrap().unwrap();
        services.attachments.upload(&file, 8).await.unwrap();

        assert_eq!(stored.url, "file:///tmp/brief.pdf");
        let listed = services.attachments.list_by_project(7).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].size, 2048);
        assert_eq!(listed[0].content_type, "application/pdf");
    }
}
