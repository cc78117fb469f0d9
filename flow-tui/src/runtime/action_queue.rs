use crate::app::{FormSubmission, View};
use crate::auth::Route;
use records::RecordId;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone)]
pub(super) enum Action {
    Navigate(Route),
    /// Fetch the data of `View` for its current mount.
    Reload(View),
    SignIn {
        token: String,
    },
    SignOut,
    StartTimer,
    PauseTimer,
    StopTimer,
    ResetTimer,
    Tick,
    NewProject,
    EditProject(RecordId),
    SubmitProject(FormSubmission),
    CancelProjectForm,
    DeleteProject(RecordId),
    CreateClient(String),
    DeleteClient(RecordId),
    DeleteTimeEntry(RecordId),
    ToggleTheme,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
