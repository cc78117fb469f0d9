//! Thin wrappers over the record API, one per table.
//!
//! Every wrapper narrows outgoing records to the fields its table accepts and
//! leaves error handling to the caller.

use records::{
    ExactMatchFilter, FetchParams, Record, RecordId, RecordsError, Table, ID_FIELD,
};

use crate::api::SharedApi;

mod attachments;
mod clients;
mod links;
mod projects;
mod time_entries;

pub use attachments::AttachmentService;
pub use clients::ClientService;
pub use links::ProjectLinkService;
pub use projects::ProjectService;
pub use time_entries::TimeEntryService;

/// Fields every table accepts.
pub const BASE_FIELDS: [&str; 3] = ["Name", "Tags", "Owner"];

/// Table-specific writable fields, on top of [`BASE_FIELDS`].
pub fn updateable_fields(table: Table) -> &'static [&'static str] {
    match table {
        Table::Project => &[
            "description",
            "startDate",
            "endDate",
            "manager",
            "priority",
            "status",
            "budget",
            "client",
        ],
        Table::Client => &[],
        Table::TimeEntry => &[
            "task",
            "description",
            "startTime",
            "endTime",
            "duration",
            "project",
        ],
        Table::Attachment => &["type", "size", "url", "project"],
        Table::Tag | Table::TeamMember => &["project"],
    }
}

/// Generic CRUD against one table.
#[derive(Clone)]
pub struct RecordService {
    api: SharedApi,
    table: Table,
}

impl RecordService {
    pub fn new(api: SharedApi, table: Table) -> Self {
        Self { api, table }
    }

    pub fn table(&self) -> Table {
        self.table
    }

    pub fn allows(&self, field: &str) -> bool {
        BASE_FIELDS.contains(&field) || updateable_fields(self.table).contains(&field)
    }

    /// Drop every field the table does not accept.
    pub fn filter_fields(&self, record: Record) -> Record {
        record
            .into_iter()
            .filter(|(field, _)| self.allows(field))
            .collect()
    }

    #[tracing::instrument(skip(self, filters), fields(table = %self.table))]
    pub async fn list(
        &self,
        filters: &ExactMatchFilter,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Record>, RecordsError> {
        let params = FetchParams::paged(page, limit).with_filter(filters);
        self.api.fetch_records(self.table, &params).await
    }

    /// Unpaged fetch, for aggregates.
    #[tracing::instrument(skip(self, filters), fields(table = %self.table))]
    pub async fn list_all(&self, filters: &ExactMatchFilter) -> Result<Vec<Record>, RecordsError> {
        let params = FetchParams::all().with_filter(filters);
        self.api.fetch_records(self.table, &params).await
    }

    #[tracing::instrument(skip(self), fields(table = %self.table))]
    pub async fn get_by_id(&self, id: RecordId) -> Result<Option<Record>, RecordsError> {
        self.api.get_record_by_id(self.table, id).await
    }

    #[tracing::instrument(skip(self, record), fields(table = %self.table))]
    pub async fn create(&self, record: Record) -> Result<Option<Record>, RecordsError> {
        let record = self.filter_fields(record);
        let results = self.api.create_records(self.table, vec![record]).await?;
        first_result(results)
    }

    #[tracing::instrument(skip(self, record), fields(table = %self.table))]
    pub async fn update(&self, id: RecordId, record: Record) -> Result<Option<Record>, RecordsError> {
        let mut record = self.filter_fields(record);
        record.insert(ID_FIELD.to_string(), id.into());
        let results = self.api.update_records(self.table, vec![record]).await?;
        first_result(results)
    }

    #[tracing::instrument(skip(self), fields(table = %self.table))]
    pub async fn delete(&self, id: RecordId) -> Result<bool, RecordsError> {
        self.delete_many(&[id]).await
    }

    pub async fn delete_many(&self, ids: &[RecordId]) -> Result<bool, RecordsError> {
        if ids.is_empty() {
            return Ok(true);
        }
        self.api.delete_records(self.table, ids).await
    }
}

fn first_result(results: Vec<records::MutationResult>) -> Result<Option<Record>, RecordsError> {
    match results.into_iter().next() {
        Some(result) if result.success => Ok(result.data),
        Some(result) => match result.message {
            Some(message) => Err(RecordsError::Rejected(message)),
            None => Ok(None),
        },
        None => Ok(None),
    }
}

/// One service per table, sharing one API handle.
#[derive(Clone)]
pub struct Services {
    pub projects: ProjectService,
    pub clients: ClientService,
    pub time_entries: TimeEntryService,
    pub attachments: AttachmentService,
    pub tags: ProjectLinkService,
    pub team_members: ProjectLinkService,
}

impl Services {
    pub fn new(api: SharedApi) -> Self {
        Self {
            projects: ProjectService::new(RecordService::new(api.clone(), Table::Project)),
            clients: ClientService::new(RecordService::new(api.clone(), Table::Client)),
            time_entries: TimeEntryService::new(RecordService::new(
                api.clone(),
                Table::TimeEntry,
            )),
            attachments: AttachmentService::new(RecordService::new(
                api.clone(),
                Table::Attachment,
            )),
            tags: ProjectLinkService::new(RecordService::new(api.clone(), Table::Tag)),
            team_members: ProjectLinkService::new(RecordService::new(api, Table::TeamMember)),
        }
    }
}
