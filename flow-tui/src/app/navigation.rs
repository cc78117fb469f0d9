use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::*;
use crate::auth::post_login_target;

impl App {
    /// Show `route`, or the login screen when it is protected and nobody is
    /// signed in. Returns the route actually shown.
    pub fn navigate(&mut self, route: Route) -> Route {
        let target = if route.is_protected() && !self.auth.is_authenticated() {
            tracing::debug!(path = %route.path(), "route requires sign-in");
            self.previous_route = Some(route.clone());
            route.login_redirect()
        } else {
            route
        };

        let view = target.view();
        if view != self.current_view {
            self.mounts.unmount(MountKey::View(self.current_view));
        }
        self.mounts.mount(MountKey::View(view));
        self.current_view = view;
        self.route = target.clone();
        target
    }

    pub fn navigate_to(&mut self, view: View) -> Route {
        self.navigate(Route::from_view(view))
    }

    /// Mark the user signed in and leave the login screen.
    pub fn sign_in_succeeded(&mut self, user: Me) -> Route {
        tracing::info!(user = %user.name, "signed in");
        self.auth.user = Some(user);
        self.login = LoginState::default();

        let redirect = match &self.route {
            Route::Login { redirect } => redirect.clone(),
            _ => None,
        };
        let target = post_login_target(redirect.as_deref(), self.previous_route.as_ref());
        self.previous_route = None;
        self.navigate(target)
    }

    /// The session is gone: forget the user and go to the login screen,
    /// remembering where we were.
    pub fn require_login(&mut self) -> Route {
        self.auth.user = None;
        self.close_form();
        let current = self.route.clone();
        self.navigate(current)
    }

    pub fn sign_out(&mut self) -> Route {
        tracing::info!("signed out");
        self.auth.user = None;
        self.close_form();
        self.previous_route = None;
        self.navigate(Route::Login { redirect: None })
    }

    /// Tab key number (1-based) to view.
    pub fn tab_view(number: u32) -> Option<View> {
        View::TABS.get(number.checked_sub(1)? as usize).copied()
    }

    pub fn time_focus_next(&mut self) {
        self.time.focus = self.time.focus.next();
    }

    pub fn time_focus_previous(&mut self) {
        self.time.focus = self.time.focus.previous();
    }

    /// Text field of the timer with focus, if it may be edited now.
    pub fn timer_input(&mut self) -> Option<&mut TextInput> {
        if !self.timer.is_editable() {
            return None;
        }
        match self.time.focus {
            TimeFocus::Task => Some(&mut self.timer.task),
            TimeFocus::Description => Some(&mut self.timer.description),
            _ => None,
        }
    }

    pub fn timer_input_char(&mut self, c: char) {
        if let Some(input) = self.timer_input() {
            input.insert(c);
            self.timer.revalidate();
        }
    }

    pub fn timer_input_backspace(&mut self) {
        if let Some(input) = self.timer_input() {
            input.backspace();
            self.timer.revalidate();
        }
    }

    pub fn open_project_picker(&mut self) {
        if !self.timer.is_editable() {
            self.notify_info("Stop or reset the timer to change project");
            return;
        }
        self.time.picker = Some(ProjectPicker::default());
    }

    pub fn close_project_picker(&mut self) {
        self.time.picker = None;
    }

    /// Picker candidates, best fuzzy match first.
    pub fn picker_matches(&self) -> Vec<&Project> {
        let query = self
            .time
            .picker
            .as_ref()
            .map(|p| p.query.value.as_str())
            .unwrap_or_default();
        if query.is_empty() {
            return self.time.project_options.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(&Project, i64)> = self
            .time
            .project_options
            .iter()
            .filter_map(|project| {
                matcher
                    .fuzzy_match(&project.name, query)
                    .map(|score| (project, score))
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(p, _)| p).collect()
    }

    pub fn picker_input_char(&mut self, c: char) {
        if let Some(picker) = self.time.picker.as_mut() {
            picker.query.insert(c);
            picker.selected = 0;
        }
    }

    pub fn picker_backspace(&mut self) {
        if let Some(picker) = self.time.picker.as_mut() {
            picker.query.backspace();
            picker.selected = 0;
        }
    }

    pub fn picker_move(&mut self, down: bool) {
        let count = self.picker_matches().len();
        if let Some(picker) = self.time.picker.as_mut() {
            picker.selected = if down {
                (picker.selected + 1).min(count.saturating_sub(1))
            } else {
                picker.selected.saturating_sub(1)
            };
        }
    }

    /// Use the highlighted match as the timer's project.
    pub fn confirm_project_picker(&mut self) {
        let selected = self.time.picker.as_ref().map(|p| p.selected).unwrap_or(0);
        let choice = self
            .picker_matches()
            .get(selected)
            .map(|project| SelectedProject::from(*project));
        if let Some(choice) = choice {
            self.timer.project = Some(choice);
            self.timer.revalidate();
            self.time.focus = TimeFocus::Task;
        }
        self.time.picker = None;
    }
}
