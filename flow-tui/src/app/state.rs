use records::RecordId;

use crate::types::{Client, DashboardStats, Project, TimeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Projects,
    Time,
    Clients,
    Login,
}

impl View {
    pub const TABS: [View; 4] = [View::Dashboard, View::Projects, View::Time, View::Clients];

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Projects => "Projects",
            View::Time => "Time",
            View::Clients => "Clients",
            View::Login => "Sign in",
        }
    }
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(s: &str) -> Self {
        Self {
            value: s.to_string(),
            cursor: s.len(),
        }
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }
    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }

    /// Returns the string split at the cursor: (before, after).
    pub fn split_at_cursor(&self) -> (&str, &str) {
        (&self.value[..self.cursor], &self.value[self.cursor..])
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        let mut p = pos;
        loop {
            p -= 1;
            if self.value.is_char_boundary(p) {
                return p;
            }
        }
    }

    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p <= self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

/// List selection plus paging, shared by the list views.
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub page: u32,
    pub loading: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            page: 1,
            loading: false,
        }
    }
}

impl<T> ListState<T> {
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
        self.loading = false;
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
        self.selected = 0;
    }

    /// Returns false when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        self.selected = 0;
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub stats: Option<DashboardStats>,
    pub loading: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectsState {
    pub list: ListState<Project>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Default)]
pub struct ClientsState {
    pub list: ListState<Client>,
    /// Some(_) while typing a new client's name.
    pub new_client: Option<TextInput>,
    pub pending_delete: Option<RecordId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeFocus {
    #[default]
    Project,
    Task,
    Description,
    Entries,
}

impl TimeFocus {
    pub fn next(self) -> Self {
        match self {
            TimeFocus::Project => TimeFocus::Task,
            TimeFocus::Task => TimeFocus::Description,
            TimeFocus::Description => TimeFocus::Entries,
            TimeFocus::Entries => TimeFocus::Project,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            TimeFocus::Project => TimeFocus::Entries,
            TimeFocus::Task => TimeFocus::Project,
            TimeFocus::Description => TimeFocus::Task,
            TimeFocus::Entries => TimeFocus::Description,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(self, TimeFocus::Task | TimeFocus::Description)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimeState {
    pub entries: ListState<TimeEntry>,
    pub focus: TimeFocus,
    /// Projects offered by the picker.
    pub project_options: Vec<Project>,
    pub picker: Option<ProjectPicker>,
    pub pending_delete: Option<RecordId>,
}

/// Fuzzy project picker overlay of the time view.
#[derive(Debug, Clone, Default)]
pub struct ProjectPicker {
    pub query: TextInput,
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub token: TextInput,
    pub submitting: bool,
}
