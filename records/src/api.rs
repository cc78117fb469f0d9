use async_trait::async_trait;

use crate::{FetchParams, MutationResult, Record, RecordId, RecordsError, Table, UserProfile};

/// The generic remote record API: CRUD against named tables.
#[async_trait]
pub trait RecordApi: Send + Sync + 'static {
    async fn fetch_records(
        &self,
        table: Table,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordsError>;

    async fn get_record_by_id(
        &self,
        table: Table,
        id: RecordId,
    ) -> Result<Option<Record>, RecordsError>;

    async fn create_records(
        &self,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError>;

    /// Every record must carry its `Id`.
    async fn update_records(
        &self,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError>;

    async fn delete_records(&self, table: Table, ids: &[RecordId]) -> Result<bool, RecordsError>;

    /// Session check. `None` when the API answers but nobody is signed in.
    async fn current_user(&self) -> Result<Option<UserProfile>, RecordsError>;
}
