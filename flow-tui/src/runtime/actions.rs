use std::future::Future;

use records::{ExactMatchFilter, RecordsError};
use time::OffsetDateTime;

use crate::api::{Backend, SharedApi};
use crate::app::{App, FormOutcome, MountKey, TimerError, View};
use crate::auth::is_auth_error;
use crate::services::Services;
use crate::session_store::SessionStore;
use crate::types::Me;

use super::action_queue::{self, Action, ActionRx, ActionTx};
use super::outcomes::{self, Origin, Outcome, OutcomeKind, OutcomeRx, OutcomeTx};
use super::tasks;
use super::ticker::{Ticker, TICK_PERIOD};

/// Receiving ends of the runtime's queues, polled by the event loop.
pub struct Channels {
    pub(super) actions: ActionRx,
    pub(super) outcomes: OutcomeRx,
}

/// Owns the record services and everything that outlives a single key press:
/// the queues, the session file and the timer's ticker.
pub struct Runtime {
    backend: Backend,
    services: Services,
    sessions: SessionStore,
    action_tx: ActionTx,
    outcome_tx: OutcomeTx,
    ticker: Option<Ticker>,
}

impl Runtime {
    pub fn new(backend: Backend, sessions: SessionStore, api: SharedApi) -> (Self, Channels) {
        let (action_tx, actions) = action_queue::channel();
        let (outcome_tx, outcomes) = outcomes::channel();
        (
            Self {
                backend,
                services: Services::new(api),
                sessions,
                action_tx,
                outcome_tx,
                ticker: None,
            },
            Channels { actions, outcomes },
        )
    }

    pub(super) fn action_tx(&self) -> &ActionTx {
        &self.action_tx
    }

    pub(super) fn enqueue(&self, action: Action) {
        let _ = self.action_tx.send(action);
    }

    fn spawn<F>(&self, origin: Origin, task: F)
    where
        F: Future<Output = OutcomeKind> + Send + 'static,
    {
        let outcome_tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let kind = task.await;
            let _ = outcome_tx.send(Outcome { origin, kind });
        });
    }

    fn start_ticker(&mut self) {
        if self.ticker.is_none() {
            self.ticker = Some(Ticker::start(self.action_tx.clone(), TICK_PERIOD));
        }
    }

    fn stop_ticker(&mut self) {
        self.ticker = None;
    }

    pub(super) fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Stop background work owned by the runtime.
    pub fn shutdown(&mut self) {
        self.stop_ticker();
    }

    pub(super) fn run_action(&mut self, action: Action, app: &mut App) {
        match action {
            Action::Navigate(route) => {
                let landed = app.navigate(route);
                self.reload(app, landed.view());
            }
            Action::Reload(view) => self.reload(app, view),
            Action::SignIn { token } => self.sign_in(app, token),
            Action::SignOut => self.sign_out(app),
            Action::StartTimer => match app.timer.start() {
                Ok(()) => {
                    self.start_ticker();
                    app.notify_info("Timer started");
                }
                Err(err @ TimerError::InvalidFields(_)) => app.notify_error(err.to_string()),
                Err(err) => app.notify_info(err.to_string()),
            },
            Action::PauseTimer => {
                if let Err(err) = app.timer.pause() {
                    app.notify_info(err.to_string());
                }
                self.stop_ticker();
            }
            Action::StopTimer => self.stop_timer(app),
            Action::ResetTimer => {
                if app.timer.is_saving() {
                    app.notify_info(TimerError::Saving.to_string());
                    return;
                }
                self.stop_ticker();
                app.timer.reset();
                app.notify_info("Timer reset");
            }
            Action::Tick => app.timer.tick(),
            Action::NewProject => {
                app.open_create_form();
            }
            Action::EditProject(id) => {
                let Some(project) = app.projects.list.items.iter().find(|p| p.id == id).cloned()
                else {
                    return;
                };
                let mount = app.open_edit_form(&project);
                let services = self.services.clone();
                self.spawn(Origin::Mount(mount), async move {
                    OutcomeKind::ProjectDetails(tasks::load_project_details(&services, id).await)
                });
            }
            Action::SubmitProject(submission) => {
                let Some(mount) = app.mounts.current(MountKey::Form) else {
                    return;
                };
                if let Some(form) = app.form.as_mut() {
                    form.submitting = true;
                }
                let services = self.services.clone();
                self.spawn(Origin::Mount(mount), async move {
                    OutcomeKind::ProjectSaved(tasks::save_project(&services, &submission).await)
                });
            }
            Action::CancelProjectForm => app.close_form(),
            Action::DeleteProject(id) => {
                app.projects.pending_delete = None;
                let services = self.services.clone();
                self.spawn_for_view(app, View::Projects, async move {
                    OutcomeKind::ProjectDeleted(services.projects.delete(id).await)
                });
            }
            Action::CreateClient(name) => {
                app.clients.new_client = None;
                let services = self.services.clone();
                self.spawn_for_view(app, View::Clients, async move {
                    OutcomeKind::ClientCreated(services.clients.create(&name).await)
                });
            }
            Action::DeleteClient(id) => {
                app.clients.pending_delete = None;
                let services = self.services.clone();
                self.spawn_for_view(app, View::Clients, async move {
                    OutcomeKind::ClientDeleted(services.clients.delete(id).await)
                });
            }
            Action::DeleteTimeEntry(id) => {
                app.time.pending_delete = None;
                let services = self.services.clone();
                self.spawn_for_view(app, View::Time, async move {
                    OutcomeKind::TimeEntryDeleted(services.time_entries.delete(id).await)
                });
            }
            Action::ToggleTheme => {
                if let Err(e) = app.toggle_theme() {
                    tracing::error!(error = ?e, "failed to save theme");
                    app.notify_error(format!("Could not save theme: {}", e));
                }
            }
        }
    }

    /// Run `task` for the current mount of `view`; nothing happens when the
    /// view is not on screen.
    fn spawn_for_view<F>(&self, app: &App, view: View, task: F)
    where
        F: Future<Output = OutcomeKind> + Send + 'static,
    {
        if let Some(mount) = app.mounts.current(MountKey::View(view)) {
            self.spawn(Origin::Mount(mount), task);
        }
    }

    fn reload(&self, app: &mut App, view: View) {
        let Some(mount) = app.mounts.current(MountKey::View(view)) else {
            return;
        };
        let origin = Origin::Mount(mount);
        let limit = app.page_size();
        let services = self.services.clone();

        match view {
            View::Dashboard => {
                app.dashboard.loading = true;
                self.spawn(origin, async move {
                    OutcomeKind::Dashboard(tasks::load_dashboard(&services).await)
                });
            }
            View::Projects => {
                app.projects.list.loading = true;
                let page = app.projects.list.page;
                self.spawn(origin, async move {
                    OutcomeKind::Projects(
                        services
                            .projects
                            .list(&ExactMatchFilter::new(), page, limit)
                            .await,
                    )
                });
            }
            View::Clients => {
                app.clients.list.loading = true;
                let page = app.clients.list.page;
                let options = services.clone();
                self.spawn(origin, async move {
                    OutcomeKind::Clients(services.clients.list(page, limit).await)
                });
                self.spawn(origin, async move {
                    OutcomeKind::ProjectOptions(options.projects.list_all().await)
                });
            }
            View::Time => {
                app.time.entries.loading = true;
                let page = app.time.entries.page;
                let options = services.clone();
                self.spawn(origin, async move {
                    OutcomeKind::TimeEntries(services.time_entries.list(page, limit).await)
                });
                self.spawn(origin, async move {
                    OutcomeKind::ProjectOptions(options.projects.list_all().await)
                });
            }
            View::Login => {}
        }
    }

    fn sign_in(&mut self, app: &mut App, token: String) {
        let token = token.trim().to_string();
        if token.is_empty() {
            app.notify_error("Enter an API session token");
            return;
        }
        let api = match self.backend.connect(Some(&token)) {
            Ok(api) => api,
            Err(e) => {
                tracing::error!(error = ?e, "cannot build API client");
                app.notify_error(format!("Sign-in failed: {}", e));
                return;
            }
        };
        app.login.submitting = true;
        self.spawn(Origin::Global, async move {
            let result = api.current_user().await.map(|user| user.map(Me::from));
            OutcomeKind::SignedIn { token, api, result }
        });
    }

    fn sign_out(&mut self, app: &mut App) {
        self.stop_ticker();
        app.timer.reset();
        if let Err(e) = self.sessions.clear() {
            tracing::warn!(error = ?e, "failed to remove session file");
        }
        match self.backend.connect(None) {
            Ok(api) => self.services = Services::new(api),
            Err(e) => tracing::warn!(error = ?e, "cannot rebuild signed-out client"),
        }
        app.sign_out();
        app.notify_info("Signed out");
    }

    fn stop_timer(&mut self, app: &mut App) {
        match app.timer.stop(OffsetDateTime::now_utc()) {
            Ok(entry) => {
                self.stop_ticker();
                let services = self.services.clone();
                self.spawn(Origin::Global, async move {
                    OutcomeKind::TimeEntrySaved(services.time_entries.create(&entry).await)
                });
            }
            Err(err @ TimerError::InvalidFields(_)) => app.notify_error(err.to_string()),
            Err(err) => app.notify_info(err.to_string()),
        }
    }

    /// Log a failed request and tell the user. Auth failures send them to
    /// the login screen.
    fn report_error(&mut self, app: &mut App, context: &str, err: &RecordsError) {
        tracing::error!(error = ?err, "{}", context);
        if is_auth_error(err) {
            app.require_login();
            app.notify_error("Session expired, please sign in again");
        } else {
            app.notify_error(format!("{}: {}", context, err));
        }
    }

    pub(super) fn apply_outcome(&mut self, outcome: Outcome, app: &mut App) {
        if let Origin::Mount(mount) = outcome.origin {
            if !app.mounts.is_live(mount) {
                tracing::debug!(outcome = outcome.kind.name(), "dropping result for unmounted view");
                return;
            }
        }

        match outcome.kind {
            OutcomeKind::Dashboard(result) => {
                app.dashboard.loading = false;
                match result {
                    Ok(stats) => app.dashboard.stats = Some(stats),
                    Err(e) => self.report_error(app, "Failed to load dashboard", &e),
                }
            }
            OutcomeKind::Projects(result) => match result {
                Ok(projects) => app.projects.list.set_items(projects),
                Err(e) => {
                    app.projects.list.loading = false;
                    self.report_error(app, "Failed to load projects", &e);
                }
            },
            OutcomeKind::ProjectOptions(result) => match result {
                Ok(projects) => app.time.project_options = projects,
                Err(e) => self.report_error(app, "Failed to load projects", &e),
            },
            OutcomeKind::Clients(result) => match result {
                Ok(clients) => app.clients.list.set_items(clients),
                Err(e) => {
                    app.clients.list.loading = false;
                    self.report_error(app, "Failed to load clients", &e);
                }
            },
            OutcomeKind::TimeEntries(result) => match result {
                Ok(entries) => app.time.entries.set_items(entries),
                Err(e) => {
                    app.time.entries.loading = false;
                    self.report_error(app, "Failed to load time entries", &e);
                }
            },
            OutcomeKind::ProjectDetails(result) => match result {
                Ok((members, attachments)) => {
                    if let Some(form) = app.form.as_mut() {
                        form.apply_details(members, attachments);
                    }
                }
                Err(e) => self.report_error(
                    app,
                    "Failed to load project details; reopen the form to retry",
                    &e,
                ),
            },
            OutcomeKind::ProjectSaved(result) => match result {
                Ok(project) => {
                    app.close_form();
                    app.notify_success(format!("Saved project {}", project.name));
                    self.reload(app, View::Projects);
                }
                Err(failure) => {
                    if let Some(form) = app.form.as_mut() {
                        form.submitting = false;
                        if let Some(id) = failure.project_id {
                            form.record_partial_save(id, failure.uploaded);
                        }
                    }
                    self.report_error(app, "Failed to save project", &failure.source);
                }
            },
            OutcomeKind::ProjectDeleted(result) => {
                self.deleted(app, View::Projects, "project", result)
            }
            OutcomeKind::ClientCreated(result) => match result {
                Ok(Some(client)) => {
                    app.notify_success(format!("Added client {}", client.name));
                    self.reload(app, View::Clients);
                }
                Ok(None) => app.notify_error("Client was not created"),
                Err(e) => self.report_error(app, "Failed to create client", &e),
            },
            OutcomeKind::ClientDeleted(result) => {
                self.deleted(app, View::Clients, "client", result)
            }
            OutcomeKind::TimeEntrySaved(result) => match result {
                Ok(Some(entry)) => {
                    app.timer.save_succeeded();
                    app.notify_success(format!(
                        "Logged {} min on {}",
                        entry.duration_minutes, entry.project_name
                    ));
                    self.reload(app, View::Time);
                }
                Ok(None) => {
                    app.timer.save_failed();
                    app.notify_error("Time entry was not saved; stop again to retry");
                }
                Err(e) => {
                    app.timer.save_failed();
                    self.report_error(app, "Failed to save time entry", &e);
                }
            },
            OutcomeKind::TimeEntryDeleted(result) => {
                self.deleted(app, View::Time, "time entry", result)
            }
            OutcomeKind::SignedIn { token, api, result } => {
                app.login.submitting = false;
                match result {
                    Ok(Some(user)) => {
                        if let Err(e) = self.sessions.save(&token) {
                            tracing::warn!(error = ?e, "failed to store session");
                        }
                        self.services = Services::new(api);
                        let landed = app.sign_in_succeeded(user);
                        self.reload(app, landed.view());
                    }
                    Ok(None) => {
                        tracing::warn!("session check returned no user");
                        app.notify_error("Sign-in failed: token was not accepted");
                    }
                    Err(e) => {
                        tracing::error!(error = ?e, "sign-in failed");
                        app.notify_error(format!("Sign-in failed: {}", e));
                    }
                }
            }
        }
    }

    fn deleted(
        &mut self,
        app: &mut App,
        view: View,
        what: &str,
        result: Result<bool, RecordsError>,
    ) {
        match result {
            Ok(true) => {
                app.notify_success(format!("Deleted {}", what));
                self.reload(app, view);
            }
            Ok(false) => app.notify_error(format!("Failed to delete {}", what)),
            Err(e) => self.report_error(app, &format!("Failed to delete {}", what), &e),
        }
    }

    /// Turn a form's result into the matching action.
    pub(super) fn form_outcome(&self, outcome: FormOutcome) {
        match outcome {
            FormOutcome::Submit(submission) => self.enqueue(Action::SubmitProject(submission)),
            FormOutcome::Cancel => self.enqueue(Action::CancelProjectForm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{SelectedProject, TextInput, TimerState};
    use crate::auth::Route;
    use crate::config::FlowConfig;
    use crate::types::{Project, TimeEntry};

    struct Harness {
        _dir: tempfile::TempDir,
        runtime: Runtime,
        channels: Channels,
        app: App,
        api: records::MemoryRecordApi,
    }

    fn harness() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let backend = Backend::dev();
        let api = match &backend {
            Backend::Dev(api) => api.clone(),
            Backend::Remote { .. } => unreachable!(),
        };
        let sessions = SessionStore::new(dir.path().join("session"));
        let shared = backend.connect(Some("dev")).unwrap();
        let (runtime, channels) = Runtime::new(backend, sessions, shared);
        let mut app = App::new(FlowConfig::default(), dir.path().join("config.toml"));
        app.set_user(Some(Me {
            id: Some(1),
            name: "Dev User".to_string(),
            email: "dev@localhost".to_string(),
        }));
        Harness {
            _dir: dir,
            runtime,
            channels,
            app,
            api,
        }
    }

    impl Harness {
        async fn next_outcome(&mut self) {
            let outcome = self.channels.outcomes.recv().await.unwrap();
            self.runtime.apply_outcome(outcome, &mut self.app);
        }

        fn fill_timer(&mut self) {
            self.app.timer.project = Some(SelectedProject {
                id: 1,
                name: "Website Redesign".to_string(),
                client: "Acme Corp".to_string(),
            });
            self.app.timer.task = TextInput::from_str("Homepage");
            self.app.timer.description = TextInput::from_str("Layout work");
        }
    }

    #[tokio::test]
    async fn results_for_a_left_view_are_dropped() {
        let mut h = harness();
        h.app.navigate(Route::Projects);
        h.runtime.run_action(Action::Reload(View::Projects), &mut h.app);
        assert!(h.app.projects.list.loading);

        h.app.navigate(Route::Clients);
        h.next_outcome().await;

        assert!(h.app.projects.list.items.is_empty());
    }

    #[tokio::test]
    async fn results_for_the_current_mount_are_applied() {
        let mut h = harness();
        h.runtime
            .run_action(Action::Navigate(Route::Projects), &mut h.app);
        h.next_outcome().await;

        assert_eq!(h.app.projects.list.items.len(), 3);
        assert!(!h.app.projects.list.loading);
    }

    #[tokio::test]
    async fn clients_view_loads_projects_for_grouping() {
        let mut h = harness();
        h.runtime
            .run_action(Action::Navigate(Route::Clients), &mut h.app);
        h.next_outcome().await;
        h.next_outcome().await;

        assert_eq!(h.app.clients.list.items.len(), 3);
        let acme: Vec<&str> = h
            .app
            .client_projects("Acme Corp")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(acme, ["Website Redesign"]);
    }

    #[tokio::test]
    async fn starting_with_blank_fields_keeps_timer_idle_and_ticker_off() {
        let mut h = harness();
        h.runtime.run_action(Action::StartTimer, &mut h.app);

        assert_eq!(h.app.timer.state(), TimerState::Idle);
        assert!(!h.runtime.is_ticking());
        assert!(h.app.timer.errors.any());
    }

    #[tokio::test]
    async fn pause_and_stop_cancel_the_ticker() {
        let mut h = harness();
        h.fill_timer();
        h.runtime.run_action(Action::StartTimer, &mut h.app);
        assert!(h.runtime.is_ticking());

        h.runtime.run_action(Action::PauseTimer, &mut h.app);
        assert!(!h.runtime.is_ticking());

        h.runtime.run_action(Action::StartTimer, &mut h.app);
        h.runtime.run_action(Action::StopTimer, &mut h.app);
        assert!(!h.runtime.is_ticking());
        h.next_outcome().await;
        assert_eq!(h.app.timer.state(), TimerState::Idle);
    }

    #[tokio::test]
    async fn failed_stop_keeps_timer_until_retry_succeeds() {
        let mut h = harness();
        h.fill_timer();
        h.runtime.run_action(Action::StartTimer, &mut h.app);
        for _ in 0..90 {
            h.runtime.run_action(Action::Tick, &mut h.app);
        }

        h.api.set_unavailable(true);
        h.runtime.run_action(Action::StopTimer, &mut h.app);
        h.next_outcome().await;

        assert_eq!(h.app.timer.state(), TimerState::Stopped);
        assert_eq!(h.app.timer.elapsed_seconds(), 90);
        assert_eq!(h.app.timer.description.value, "Layout work");
        assert!(h.app.notifications.latest().is_some());

        h.api.set_unavailable(false);
        h.runtime.run_action(Action::StopTimer, &mut h.app);
        h.next_outcome().await;

        assert_eq!(h.app.timer.state(), TimerState::Idle);
        assert_eq!(h.app.timer.elapsed_seconds(), 0);
        let stored: Vec<TimeEntry> = h
            .api
            .rows(records::Table::TimeEntry)
            .iter()
            .filter_map(TimeEntry::from_record)
            .filter(|e| e.task == "Homepage" && e.duration_minutes == 2)
            .collect();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn expired_session_redirects_to_login() {
        let mut h = harness();
        h.runtime
            .run_action(Action::Navigate(Route::Clients), &mut h.app);
        h.api.set_signed_out(true);
        h.next_outcome().await;

        assert_eq!(h.app.current_view, View::Login);
        assert_eq!(h.app.route.path(), "/login?redirect=%2Fclients");
        assert!(!h.app.auth.is_authenticated());
    }

    #[tokio::test]
    async fn saved_project_closes_the_form() {
        let mut h = harness();
        h.runtime
            .run_action(Action::Navigate(Route::Projects), &mut h.app);
        h.next_outcome().await;

        h.runtime.run_action(Action::NewProject, &mut h.app);
        let form = h.app.form.as_mut().unwrap();
        form.name = TextInput::from_str("Brand Refresh");
        form.client = TextInput::from_str("Umbrella");
        form.manager = TextInput::from_str("Ada");
        form.budget = TextInput::from_str("5000");
        let outcome = form.submit().unwrap();
        h.runtime.form_outcome(outcome);
        let action = h.channels.actions.recv().await.unwrap();
        h.runtime.run_action(action, &mut h.app);
        h.next_outcome().await;

        assert!(h.app.form.is_none());
        let projects: Vec<Project> = h
            .api
            .rows(records::Table::Project)
            .iter()
            .filter_map(Project::from_record)
            .collect();
        assert!(projects.iter().any(|p| p.name == "Brand Refresh"));
    }

    #[tokio::test]
    async fn sign_in_stores_session_and_follows_redirect() {
        let mut h = harness();
        h.app.set_user(None);
        h.app.navigate(Route::Time);
        assert_eq!(h.app.current_view, View::Login);

        h.runtime.run_action(
            Action::SignIn {
                token: " dev-token ".to_string(),
            },
            &mut h.app,
        );
        h.next_outcome().await;

        assert_eq!(h.app.current_view, View::Time);
        assert_eq!(
            h.runtime.sessions.load().unwrap().as_deref(),
            Some("dev-token")
        );
    }
}
