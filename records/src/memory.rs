use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::{
    values_match, FetchParams, FilterOperator, MutationResult, Record, RecordApi, RecordExt,
    RecordId, RecordsError, Table, UserProfile, ID_FIELD,
};

#[derive(Debug, Default)]
struct TableRows {
    next_id: RecordId,
    rows: Vec<Record>,
}

/// In-process stand-in for the record API. Backs `dev` mode and tests.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordApi {
    tables: Arc<Mutex<HashMap<Table, TableRows>>>,
    unavailable: Arc<AtomicBool>,
    signed_out: Arc<AtomicBool>,
}

impl MemoryRecordApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a request error until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with [`RecordsError::Unauthorized`].
    pub fn set_signed_out(&self, signed_out: bool) {
        self.signed_out.store(signed_out, Ordering::SeqCst);
    }

    /// Insert rows directly, assigning ids. Returns the stored rows.
    pub fn seed(&self, table: Table, rows: impl IntoIterator<Item = Record>) -> Vec<Record> {
        let mut tables = self.lock();
        let entry = tables.entry(table).or_default();
        rows.into_iter()
            .map(|row| insert_row(entry, row))
            .collect()
    }

    /// Snapshot of a table's rows, in insertion order.
    pub fn rows(&self, table: Table) -> Vec<Record> {
        self.lock()
            .get(&table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Table, TableRows>> {
        // A poisoned lock only means a test panicked mid-write; the data is still usable.
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self) -> Result<(), RecordsError> {
        if self.signed_out.load(Ordering::SeqCst) {
            return Err(RecordsError::Unauthorized);
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RecordsError::Request(
                "record API unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

fn insert_row(table: &mut TableRows, mut row: Record) -> Record {
    table.next_id += 1;
    row.insert(ID_FIELD.to_string(), Value::from(table.next_id));
    if let Ok(now) = OffsetDateTime::now_utc().format(&Rfc3339) {
        row.entry("CreatedOn".to_string())
            .or_insert_with(|| Value::String(now));
    }
    table.rows.push(row.clone());
    row
}

fn matches_params(row: &Record, params: &FetchParams) -> bool {
    params.where_clauses.iter().all(|clause| match clause.operator {
        FilterOperator::ExactMatch => {
            let stored = row.get(&clause.field_name).unwrap_or(&Value::Null);
            clause.values.iter().any(|wanted| values_match(stored, wanted))
        }
    })
}

#[async_trait]
impl RecordApi for MemoryRecordApi {
    async fn fetch_records(
        &self,
        table: Table,
        params: &FetchParams,
    ) -> Result<Vec<Record>, RecordsError> {
        self.check()?;
        let tables = self.lock();
        let Some(rows) = tables.get(&table) else {
            return Ok(Vec::new());
        };

        let matching = rows.rows.iter().filter(|row| matches_params(row, params));
        let records = match params.paging_info {
            Some(paging) => matching
                .skip(paging.offset as usize)
                .take(paging.limit as usize)
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };
        Ok(records)
    }

    async fn get_record_by_id(
        &self,
        table: Table,
        id: RecordId,
    ) -> Result<Option<Record>, RecordsError> {
        self.check()?;
        Ok(self
            .lock()
            .get(&table)
            .and_then(|t| t.rows.iter().find(|row| row.id() == Some(id)).cloned()))
    }

    async fn create_records(
        &self,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError> {
        self.check()?;
        let mut tables = self.lock();
        let entry = tables.entry(table).or_default();
        Ok(records
            .into_iter()
            .map(|row| MutationResult::ok(insert_row(entry, row)))
            .collect())
    }

    async fn update_records(
        &self,
        table: Table,
        records: Vec<Record>,
    ) -> Result<Vec<MutationResult>, RecordsError> {
        self.check()?;
        let mut tables = self.lock();
        let entry = tables.entry(table).or_default();

        Ok(records
            .into_iter()
            .map(|update| {
                let Some(id) = update.id() else {
                    return MutationResult::failed("Id is required for update");
                };
                match entry.rows.iter_mut().find(|row| row.id() == Some(id)) {
                    Some(row) => {
                        for (field, value) in update {
                            row.insert(field, value);
                        }
                        MutationResult::ok(row.clone())
                    }
                    None => MutationResult::failed(format!("Record {} not found", id)),
                }
            })
            .collect())
    }

    async fn delete_records(&self, table: Table, ids: &[RecordId]) -> Result<bool, RecordsError> {
        self.check()?;
        let mut tables = self.lock();
        let Some(entry) = tables.get_mut(&table) else {
            return Ok(false);
        };

        let before = entry.rows.len();
        entry
            .rows
            .retain(|row| row.id().map_or(true, |id| !ids.contains(&id)));
        Ok(before - entry.rows.len() == ids.len())
    }

    async fn current_user(&self) -> Result<Option<UserProfile>, RecordsError> {
        self.check()?;
        Ok(Some(UserProfile {
            user_id: Some(1),
            first_name: "Dev".to_string(),
            last_name: "User".to_string(),
            email_address: "dev@localhost".to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExactMatchFilter;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let api = MemoryRecordApi::new();
        let results = api
            .create_records(
                Table::Client,
                vec![record(json!({"Name": "Acme"})), record(json!({"Name": "Globex"}))],
            )
            .await
            .unwrap();

        let ids: Vec<_> = results
            .iter()
            .map(|r| r.data.as_ref().and_then(|d| d.id()))
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[tokio::test]
    async fn fetch_applies_filters_then_paging() {
        let api = MemoryRecordApi::new();
        api.seed(
            Table::Project,
            (0..5).map(|i| {
                record(json!({
                    "Name": format!("P{i}"),
                    "status": if i % 2 == 0 { "in-progress" } else { "pending" }
                }))
            }),
        );

        let params = FetchParams::paged(2, 2)
            .with_filter(&ExactMatchFilter::new().with("status", "in-progress"));
        let rows = api.fetch_records(Table::Project, &params).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].str_field("Name"), Some("P4"));
    }

    #[tokio::test]
    async fn update_merges_fields_and_reports_missing_rows() {
        let api = MemoryRecordApi::new();
        api.seed(Table::Tag, [record(json!({"Name": "rust", "project": 1}))]);

        let results = api
            .update_records(
                Table::Tag,
                vec![
                    record(json!({"Id": 1, "Name": "systems"})),
                    record(json!({"Id": 42, "Name": "ghost"})),
                ],
            )
            .await
            .unwrap();

        assert!(results[0].success);
        assert!(!results[1].success);
        let row = api.get_record_by_id(Table::Tag, 1).await.unwrap().unwrap();
        assert_eq!(row.str_field("Name"), Some("systems"));
        assert_eq!(row.i64_field("project"), Some(1));
    }

    #[tokio::test]
    async fn delete_reports_whether_every_id_existed() {
        let api = MemoryRecordApi::new();
        api.seed(Table::TimeEntry, [record(json!({"task": "a"}))]);

        assert!(!api.delete_records(Table::TimeEntry, &[1, 2]).await.unwrap());
        assert!(api.rows(Table::TimeEntry).is_empty());
    }

    #[tokio::test]
    async fn unavailable_and_signed_out_fail_calls() {
        let api = MemoryRecordApi::new();
        api.set_unavailable(true);
        assert!(matches!(
            api.fetch_records(Table::Client, &FetchParams::all()).await,
            Err(RecordsError::Request(_))
        ));

        api.set_unavailable(false);
        api.set_signed_out(true);
        assert!(api.current_user().await.unwrap_err().is_unauthorized());
    }
}
