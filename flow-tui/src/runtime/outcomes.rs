use records::RecordsError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::tasks::SaveFailure;
use crate::api::SharedApi;
use crate::app::MountId;
use crate::types::{Attachment, Client, DashboardStats, Me, Project, TimeEntry};

/// Who is waiting for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Origin {
    /// Applies whatever is on screen.
    Global,
    /// Only applies while this mount is still current.
    Mount(MountId),
}

/// A finished background request, sent back to the event loop.
pub(super) struct Outcome {
    pub origin: Origin,
    pub kind: OutcomeKind,
}

pub(super) enum OutcomeKind {
    Dashboard(Result<DashboardStats, RecordsError>),
    Projects(Result<Vec<Project>, RecordsError>),
    ProjectOptions(Result<Vec<Project>, RecordsError>),
    Clients(Result<Vec<Client>, RecordsError>),
    TimeEntries(Result<Vec<TimeEntry>, RecordsError>),
    ProjectDetails(Result<(Vec<String>, Vec<Attachment>), RecordsError>),
    ProjectSaved(Result<Project, SaveFailure>),
    ProjectDeleted(Result<bool, RecordsError>),
    ClientCreated(Result<Option<Client>, RecordsError>),
    ClientDeleted(Result<bool, RecordsError>),
    TimeEntrySaved(Result<Option<TimeEntry>, RecordsError>),
    TimeEntryDeleted(Result<bool, RecordsError>),
    SignedIn {
        token: String,
        api: SharedApi,
        result: Result<Option<Me>, RecordsError>,
    },
}

impl OutcomeKind {
    pub fn name(&self) -> &'static str {
        match self {
            OutcomeKind::Dashboard(_) => "dashboard",
            OutcomeKind::Projects(_) => "projects",
            OutcomeKind::ProjectOptions(_) => "project_options",
            OutcomeKind::Clients(_) => "clients",
            OutcomeKind::TimeEntries(_) => "time_entries",
            OutcomeKind::ProjectDetails(_) => "project_details",
            OutcomeKind::ProjectSaved(_) => "project_saved",
            OutcomeKind::ProjectDeleted(_) => "project_deleted",
            OutcomeKind::ClientCreated(_) => "client_created",
            OutcomeKind::ClientDeleted(_) => "client_deleted",
            OutcomeKind::TimeEntrySaved(_) => "time_entry_saved",
            OutcomeKind::TimeEntryDeleted(_) => "time_entry_deleted",
            OutcomeKind::SignedIn { .. } => "signed_in",
        }
    }
}

pub(super) type OutcomeTx = UnboundedSender<Outcome>;
pub(super) type OutcomeRx = UnboundedReceiver<Outcome>;

pub(super) fn channel() -> (OutcomeTx, OutcomeRx) {
    mpsc::unbounded_channel()
}
