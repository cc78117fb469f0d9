//! Background requests. Each takes its own clone of the services so it can
//! run detached from the event loop.

use records::{RecordId, RecordsError};
use thiserror::Error;

use crate::app::{FormMode, FormSubmission};
use crate::services::Services;
use crate::types::{Attachment, DashboardStats, Project};

pub(super) async fn load_dashboard(services: &Services) -> Result<DashboardStats, RecordsError> {
    let projects = services.projects.stats().await?;
    let hours_tracked = services.time_entries.tracked_hours().await?;
    let total_clients = services.clients.count().await?;
    Ok(DashboardStats {
        active_projects: projects.active,
        total_projects: projects.total,
        hours_tracked,
        total_clients,
    })
}

/// Team members and attachments of one project, for the edit form.
pub(super) async fn load_project_details(
    services: &Services,
    project_id: RecordId,
) -> Result<(Vec<String>, Vec<Attachment>), RecordsError> {
    let members = services.team_members.list_by_project(project_id).await?;
    let attachments = services.attachments.list_by_project(project_id).await?;
    Ok((
        members.into_iter().map(|link| link.name).collect(),
        attachments,
    ))
}

/// A project save that stopped part way.
///
/// `project_id` is set once the project row exists, and `uploaded` holds the
/// files stored before the failure, in submission order.
#[derive(Debug, Error)]
#[error("{source}")]
pub(super) struct SaveFailure {
    pub project_id: Option<RecordId>,
    pub uploaded: Vec<Attachment>,
    pub source: RecordsError,
}

impl SaveFailure {
    fn before_save(source: RecordsError) -> Self {
        Self {
            project_id: None,
            uploaded: Vec::new(),
            source,
        }
    }
}

/// Store a submitted project form: the client, the project row, its tag and
/// team member links, then every staged file.
#[tracing::instrument(skip(services, submission), fields(mode = ?submission.mode))]
pub(super) async fn save_project(
    services: &Services,
    submission: &FormSubmission,
) -> Result<Project, SaveFailure> {
    let draft = &submission.draft;
    services
        .clients
        .ensure_exists(&draft.client)
        .await
        .map_err(SaveFailure::before_save)?;

    let saved = match submission.mode {
        FormMode::Create => services.projects.create(draft).await,
        FormMode::Edit(id) => services.projects.update(id, draft).await,
    }
    .map_err(SaveFailure::before_save)?;
    let mut project = saved.ok_or_else(|| {
        SaveFailure::before_save(RecordsError::Rejected("Project was not saved".to_string()))
    })?;

    let mut uploaded = Vec::new();
    if let Err(source) = save_links_and_uploads(services, submission, project.id, &mut uploaded).await
    {
        tracing::warn!(project = project.id, uploaded = uploaded.len(), "project saved partially");
        return Err(SaveFailure {
            project_id: Some(project.id),
            uploaded,
            source,
        });
    }
    project.attachments = uploaded;
    project.team_members = draft.team_members.clone();

    tracing::info!(
        project = project.id,
        uploads = submission.uploads.len(),
        "project saved"
    );
    Ok(project)
}

async fn save_links_and_uploads(
    services: &Services,
    submission: &FormSubmission,
    project_id: RecordId,
    uploaded: &mut Vec<Attachment>,
) -> Result<(), RecordsError> {
    let draft = &submission.draft;
    services
        .tags
        .replace_for_project(project_id, &draft.tags)
        .await?;
    services
        .team_members
        .replace_for_project(project_id, &draft.team_members)
        .await?;

    for file in &submission.uploads {
        let attachment = services
            .attachments
            .upload(file, project_id)
            .await?
            .ok_or_else(|| RecordsError::Rejected(format!("{} was not stored", file.name)))?;
        uploaded.push(attachment);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewAttachment, Priority, ProjectDraft, Status};
    use crate::app::{FormOutcome, PreviewRegistry, ProjectForm, TextInput};
    use async_trait::async_trait;
    use records::{
        FetchParams, MemoryRecordApi, MutationResult, Record, RecordApi, RecordExt, Table,
        UserProfile,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use time::macros::date;

    /// Memory tables whose tag writes fail while `failing` is set.
    #[derive(Clone)]
    struct FlakyTags {
        inner: MemoryRecordApi,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl RecordApi for FlakyTags {
        async fn fetch_records(
            &self,
            table: Table,
            params: &FetchParams,
        ) -> Result<Vec<Record>, RecordsError> {
            self.inner.fetch_records(table, params).await
        }

        async fn get_record_by_id(
            &self,
            table: Table,
            id: RecordId,
        ) -> Result<Option<Record>, RecordsError> {
            self.inner.get_record_by_id(table, id).await
        }

        async fn create_records(
            &self,
            table: Table,
            records: Vec<Record>,
        ) -> Result<Vec<MutationResult>, RecordsError> {
            if table == Table::Tag && self.failing.load(Ordering::SeqCst) {
                return Err(RecordsError::Request("tag table down".to_string()));
            }
            self.inner.create_records(table, records).await
        }

        async fn update_records(
            &self,
            table: Table,
            records: Vec<Record>,
        ) -> Result<Vec<MutationResult>, RecordsError> {
            self.inner.update_records(table, records).await
        }

        async fn delete_records(
            &self,
            table: Table,
            ids: &[RecordId],
        ) -> Result<bool, RecordsError> {
            self.inner.delete_records(table, ids).await
        }

        async fn current_user(&self) -> Result<Option<UserProfile>, RecordsError> {
            self.inner.current_user().await
        }
    }

    fn submitted(form: &mut ProjectForm) -> FormSubmission {
        match form.submit() {
            Some(FormOutcome::Submit(submission)) => submission,
            other => panic!("expected a submission, got {:?}", other),
        }
    }

    fn submission(mode: FormMode, client: &str) -> FormSubmission {
        FormSubmission {
            mode,
            draft: ProjectDraft {
                name: "Website Redesign".to_string(),
                client: client.to_string(),
                description: "New marketing site".to_string(),
                start_date: date!(2026 - 03 - 02),
                end_date: Some(date!(2026 - 06 - 30)),
                manager: "Ada".to_string(),
                team_members: vec!["Ada".to_string(), "Grace".to_string()],
                priority: Priority::High,
                status: Status::InProgress,
                budget: 5000.0,
                tags: vec!["web".to_string()],
            },
            uploads: vec![NewAttachment {
                name: "brief.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                size: 2048,
                path: "/tmp/brief.pdf".into(),
            }],
        }
    }

    #[tokio::test]
    async fn saving_a_new_project_creates_client_links_and_attachments() {
        let api = MemoryRecordApi::new();
        let services = Services::new(Arc::new(api.clone()));

        let project = save_project(&services, &submission(FormMode::Create, "Acme"))
            .await
            .unwrap();

        assert_eq!(project.name, "Website Redesign");
        assert_eq!(project.attachments.len(), 1);
        assert_eq!(project.attachments[0].url, "file:///tmp/brief.pdf");

        let clients = api.rows(Table::Client);
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].str_field("Name"), Some("Acme"));
        assert_eq!(api.rows(Table::Tag).len(), 1);
        assert_eq!(api.rows(Table::TeamMember).len(), 2);
    }

    #[tokio::test]
    async fn editing_keeps_existing_client_and_replaces_links() {
        let api = MemoryRecordApi::new();
        let services = Services::new(Arc::new(api.clone()));
        let created = save_project(&services, &submission(FormMode::Create, "Acme"))
            .await
            .unwrap();

        let mut edit = submission(FormMode::Edit(created.id), "Acme");
        edit.draft.team_members = vec!["Grace".to_string()];
        edit.uploads.clear();
        save_project(&services, &edit).await.unwrap();

        assert_eq!(api.rows(Table::Client).len(), 1);
        assert_eq!(api.rows(Table::Project).len(), 1);
        let (members, attachments) = load_project_details(&services, created.id)
            .await
            .unwrap();
        assert_eq!(members, vec!["Grace"]);
        assert_eq!(attachments.len(), 1);
    }

    #[tokio::test]
    async fn failed_save_propagates_the_error() {
        let api = MemoryRecordApi::new();
        api.set_unavailable(true);
        let services = Services::new(Arc::new(api));

        let err = save_project(&services, &submission(FormMode::Create, "Acme"))
            .await
            .unwrap_err();
        assert!(matches!(err.source, RecordsError::Request(_)));
        assert_eq!(err.project_id, None);
    }

    #[tokio::test]
    async fn retry_after_a_failed_link_write_updates_the_same_project() {
        let api = MemoryRecordApi::new();
        let failing = Arc::new(AtomicBool::new(true));
        let services = Services::new(Arc::new(FlakyTags {
            inner: api.clone(),
            failing: failing.clone(),
        }));

        let mut form = ProjectForm::create(PreviewRegistry::new(), date!(2026 - 03 - 02));
        form.name = TextInput::from_str("Brand Refresh");
        form.client = TextInput::from_str("Umbrella");
        form.manager = TextInput::from_str("Ada");
        form.budget = TextInput::from_str("5000");
        form.tag_input = TextInput::from_str("web");
        form.add_tag();

        let failure = save_project(&services, &submitted(&mut form))
            .await
            .unwrap_err();
        assert!(matches!(failure.source, RecordsError::Request(_)));
        let id = failure.project_id.expect("project row was stored");
        form.record_partial_save(id, failure.uploaded);

        failing.store(false, Ordering::SeqCst);
        let saved = save_project(&services, &submitted(&mut form))
            .await
            .unwrap();

        assert_eq!(saved.id, id);
        assert_eq!(api.rows(Table::Project).len(), 1);
        assert_eq!(api.rows(Table::Tag).len(), 1);
    }

    #[tokio::test]
    async fn untouched_edit_keeps_the_stored_team() {
        let api = MemoryRecordApi::new();
        let services = Services::new(Arc::new(api.clone()));
        let created = save_project(&services, &submission(FormMode::Create, "Acme"))
            .await
            .unwrap();

        let listed = services.projects.list_all().await.unwrap();
        let project = listed.iter().find(|p| p.id == created.id).unwrap();
        let mut form = ProjectForm::edit(project, PreviewRegistry::new());
        assert!(form.submit().is_none());

        let (members, attachments) = load_project_details(&services, created.id)
            .await
            .unwrap();
        form.apply_details(members, attachments);
        save_project(&services, &submitted(&mut form)).await.unwrap();

        let (members, _) = load_project_details(&services, created.id)
            .await
            .unwrap();
        assert_eq!(members, vec!["Ada", "Grace"]);
    }

    #[tokio::test]
    async fn dashboard_counts_seeded_data() {
        let services = Services::new(Arc::new(crate::api::dev_backend::seeded()));
        let stats = load_dashboard(&services).await.unwrap();

        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.active_projects, 1);
        assert_eq!(stats.total_clients, 3);
        assert!(stats.hours_tracked > 0.0);
    }
}
