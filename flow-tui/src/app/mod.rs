use crate::auth::{AuthState, Route};
use crate::config::FlowConfig;
use crate::time_utils::today;
use crate::types::{Me, Project, TimeEntry};
use anyhow::Result;
use std::path::PathBuf;
use std::time::Instant;

mod attachments;
mod date_input;
mod mounts;
mod navigation;
mod notifications;
mod project_form;
mod state;
mod theme;
mod timer;

pub use attachments::{content_type_for, human_size, PreviewRegistry, StagedAttachment};
pub use date_input::{DateInput, DatePart};
pub use mounts::{MountId, MountKey, MountTracker};
pub use notifications::{Notice, NoticeLevel, Notifications};
pub use project_form::{
    FieldErrors, FormField, FormMode, FormOutcome, FormSubmission, ProjectForm,
};
pub use state::{
    ClientsState, DashboardState, ListState, LoginState, ProjectPicker, ProjectsState, TextInput,
    TimeFocus, TimeState, View,
};
pub use theme::Theme;
pub use timer::{SelectedProject, TimerError, TimerFieldErrors, TimerState, TimerWidget};

pub struct App {
    pub running: bool,
    pub current_view: View,
    pub route: Route,
    /// Last protected route shown before being sent to the login screen.
    pub previous_route: Option<Route>,
    pub auth: AuthState,
    pub theme: Theme,
    pub dev_mode: bool,

    pub dashboard: DashboardState,
    pub projects: ProjectsState,
    pub clients: ClientsState,
    pub time: TimeState,
    pub timer: TimerWidget,
    pub login: LoginState,

    /// Open project create/edit overlay.
    pub form: Option<ProjectForm>,
    pub previews: PreviewRegistry,

    pub notifications: Notifications,
    pub mounts: MountTracker,
    pub throbber_state: throbber_widgets_tui::ThrobberState,

    config: FlowConfig,
    config_path: PathBuf,
}

impl App {
    pub fn new(config: FlowConfig, config_path: PathBuf) -> Self {
        Self {
            running: true,
            current_view: View::Login,
            route: Route::Login { redirect: None },
            previous_route: None,
            auth: AuthState::default(),
            theme: config.theme,
            dev_mode: false,
            dashboard: DashboardState::default(),
            projects: ProjectsState::default(),
            clients: ClientsState::default(),
            time: TimeState::default(),
            timer: TimerWidget::new(),
            login: LoginState::default(),
            form: None,
            previews: PreviewRegistry::new(),
            notifications: Notifications::default(),
            mounts: MountTracker::default(),
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
            config,
            config_path,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn page_size(&self) -> u32 {
        self.config.page_size
    }

    pub fn set_user(&mut self, user: Option<Me>) {
        self.auth.user = user;
    }

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notifications.push(level, message, Instant::now());
    }

    pub fn notify_info(&mut self, message: impl Into<String>) {
        self.notify(NoticeLevel::Info, message);
    }

    pub fn notify_success(&mut self, message: impl Into<String>) {
        self.notify(NoticeLevel::Success, message);
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notify(NoticeLevel::Error, message);
    }

    /// Switch theme and write it back to the config file.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.theme = self.theme.toggled();
        self.config.theme = self.theme;
        FlowConfig::save_theme(&self.config_path, self.theme)?;
        tracing::info!(theme = %self.theme, "theme changed");
        Ok(self.theme)
    }

    /// Housekeeping between frames.
    pub fn on_frame(&mut self, now: Instant) {
        self.notifications.prune(now);
        if self.is_loading() {
            self.throbber_state.calc_next();
        }
    }

    pub fn is_loading(&self) -> bool {
        self.dashboard.loading
            || self.projects.list.loading
            || self.clients.list.loading
            || self.time.entries.loading
            || self.login.submitting
            || self.timer.is_saving()
            || self.form.as_ref().is_some_and(|f| f.submitting)
    }

    /// True while keystrokes go to a text field rather than to shortcuts.
    pub fn is_typing(&self) -> bool {
        if self.form.is_some() || self.time.picker.is_some() || self.clients.new_client.is_some()
        {
            return true;
        }
        match self.current_view {
            View::Login => true,
            View::Time => self.time.focus.is_text() && self.timer.is_editable(),
            _ => false,
        }
    }

    pub fn open_create_form(&mut self) -> MountId {
        self.form = Some(ProjectForm::create(self.previews.clone(), today()));
        self.mounts.mount(MountKey::Form)
    }

    pub fn open_edit_form(&mut self, project: &Project) -> MountId {
        self.form = Some(ProjectForm::edit(project, self.previews.clone()));
        self.mounts.mount(MountKey::Form)
    }

    /// Tear the form down, releasing whatever it still had staged.
    pub fn close_form(&mut self) {
        if let Some(form) = self.form.take() {
            tracing::debug!(staged = form.staged.len(), "project form closed");
        }
        self.mounts.unmount(MountKey::Form);
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.list.selected_item()
    }

    /// Loaded projects whose client field names `client`.
    pub fn client_projects(&self, client: &str) -> Vec<&Project> {
        self.time
            .project_options
            .iter()
            .filter(|p| p.client == client)
            .collect()
    }

    /// Client of a time entry. Stored entries only link the project, so the
    /// name comes from the loaded project list when the row has none.
    pub fn entry_client<'a>(&'a self, entry: &'a TimeEntry) -> &'a str {
        if !entry.client.is_empty() {
            return &entry.client;
        }
        entry
            .project_id
            .and_then(|id| self.time.project_options.iter().find(|p| p.id == id))
            .map_or("", |p| p.client.as_str())
    }
}
