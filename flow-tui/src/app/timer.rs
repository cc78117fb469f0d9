use records::RecordId;
use thiserror::Error;
use time::OffsetDateTime;

use super::TextInput;
use crate::types::{Project, TimeEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Stopped with an entry that has not been stored yet.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerFieldErrors {
    pub project: bool,
    pub task: bool,
    pub description: bool,
}

impl TimerFieldErrors {
    pub fn any(&self) -> bool {
        self.project || self.task || self.description
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("Select a project and fill in task and description")]
    InvalidFields(TimerFieldErrors),
    #[error("Timer is already running")]
    AlreadyRunning,
    #[error("Timer has an unsaved entry; stop again to retry or reset it")]
    Unsaved,
    #[error("Timer is not running")]
    NotRunning,
    #[error("Entry is being saved")]
    Saving,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectedProject {
    pub id: RecordId,
    pub name: String,
    pub client: String,
}

impl From<&Project> for SelectedProject {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            client: project.client.clone(),
        }
    }
}

/// Stopwatch for tracking one stretch of work.
///
/// Elapsed time only grows through [`TimerWidget::tick`], which the runtime
/// calls once per second while running. Stopping hands out a [`TimeEntry`];
/// the widget only resets once that entry is reported stored.
#[derive(Debug, Clone)]
pub struct TimerWidget {
    state: TimerState,
    elapsed_seconds: u64,
    saving: bool,
    pub project: Option<SelectedProject>,
    pub task: TextInput,
    pub description: TextInput,
    pub errors: TimerFieldErrors,
}

impl Default for TimerWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerWidget {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_seconds: 0,
            saving: false,
            project: None,
            task: TextInput::new(),
            description: TextInput::new(),
            errors: TimerFieldErrors::default(),
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Fields can only change while nothing is being tracked.
    pub fn is_editable(&self) -> bool {
        self.state == TimerState::Idle
    }

    fn field_errors(&self) -> TimerFieldErrors {
        TimerFieldErrors {
            project: self.project.is_none(),
            task: self.task.is_blank(),
            description: self.description.is_blank(),
        }
    }

    /// Clear the error of every field that is now filled in.
    pub fn revalidate(&mut self) {
        let current = self.field_errors();
        self.errors.project &= current.project;
        self.errors.task &= current.task;
        self.errors.description &= current.description;
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        match self.state {
            TimerState::Running => return Err(TimerError::AlreadyRunning),
            TimerState::Stopped => return Err(TimerError::Unsaved),
            TimerState::Idle | TimerState::Paused => {}
        }

        let errors = self.field_errors();
        self.errors = errors;
        if errors.any() {
            tracing::debug!(?errors, "timer start refused");
            return Err(TimerError::InvalidFields(errors));
        }

        self.state = TimerState::Running;
        tracing::debug!(elapsed = self.elapsed_seconds, "timer running");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.state != TimerState::Running {
            return Err(TimerError::NotRunning);
        }
        self.state = TimerState::Paused;
        tracing::debug!(elapsed = self.elapsed_seconds, "timer paused");
        Ok(())
    }

    pub fn tick(&mut self) {
        if self.state == TimerState::Running {
            self.elapsed_seconds += 1;
        }
    }

    /// Stop tracking and build the entry to store. Works again after a failed save.
    pub fn stop(&mut self, now: OffsetDateTime) -> Result<TimeEntry, TimerError> {
        if self.saving {
            return Err(TimerError::Saving);
        }
        if self.state == TimerState::Idle {
            return Err(TimerError::NotRunning);
        }
        let Some(project) = self.project.as_ref() else {
            self.errors.project = true;
            return Err(TimerError::InvalidFields(self.errors));
        };

        let entry = TimeEntry::from_elapsed(
            Some(project.id),
            &project.name,
            &project.client,
            self.task.trimmed(),
            self.description.trimmed(),
            self.elapsed_seconds,
            now,
        );
        self.state = TimerState::Stopped;
        self.saving = true;
        tracing::info!(
            elapsed = self.elapsed_seconds,
            duration = entry.duration_minutes,
            "timer stopped"
        );
        Ok(entry)
    }

    /// The stopped entry was stored: back to a blank, idle timer.
    pub fn save_succeeded(&mut self) {
        self.reset();
    }

    /// The stopped entry was not stored: keep everything for a retry.
    pub fn save_failed(&mut self) {
        self.saving = false;
    }

    /// Throw away the current tracking session.
    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.elapsed_seconds = 0;
        self.saving = false;
        self.project = None;
        self.task.clear();
        self.description.clear();
        self.errors = TimerFieldErrors::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn filled() -> TimerWidget {
        let mut timer = TimerWidget::new();
        timer.project = Some(SelectedProject {
            id: 4,
            name: "Website Redesign".to_string(),
            client: "Acme".to_string(),
        });
        timer.task = TextInput::from_str("Homepage");
        timer.description = TextInput::from_str("Layout work");
        timer
    }

    fn ticks(timer: &mut TimerWidget, n: u64) {
        for _ in 0..n {
            timer.tick();
        }
    }

    #[test]
    fn start_with_empty_fields_flags_exactly_those_fields() {
        let cases = [
            (true, true, true),
            (false, true, true),
            (true, false, true),
            (true, true, false),
            (false, false, false),
        ];
        for (has_project, has_task, has_description) in cases {
            let mut timer = filled();
            if !has_project {
                timer.project = None;
            }
            if !has_task {
                timer.task = TextInput::from_str("   ");
            }
            if !has_description {
                timer.description.clear();
            }

            let expected = TimerFieldErrors {
                project: !has_project,
                task: !has_task,
                description: !has_description,
            };
            let result = timer.start();
            if expected.any() {
                assert_eq!(result, Err(TimerError::InvalidFields(expected)));
                assert_eq!(timer.state(), TimerState::Idle);
            } else {
                assert_eq!(result, Ok(()));
                assert_eq!(timer.state(), TimerState::Running);
            }
            assert_eq!(timer.errors, expected);
        }
    }

    #[test]
    fn ticks_only_count_while_running() {
        let mut timer = filled();
        ticks(&mut timer, 5);
        assert_eq!(timer.elapsed_seconds(), 0);

        timer.start().unwrap();
        ticks(&mut timer, 30);
        timer.pause().unwrap();
        ticks(&mut timer, 100);
        timer.start().unwrap();
        ticks(&mut timer, 31);
        assert_eq!(timer.elapsed_seconds(), 61);

        let entry = timer.stop(datetime!(2026-03-02 10:00:00 UTC)).unwrap();
        assert_eq!(entry.duration_minutes, 2);
    }

    #[test]
    fn duration_is_ceiling_of_running_minutes() {
        for (first, second) in [(0, 1), (30, 30), (59, 2), (600, 0), (7, 3593)] {
            let mut timer = filled();
            timer.start().unwrap();
            ticks(&mut timer, first);
            timer.pause().unwrap();
            timer.start().unwrap();
            ticks(&mut timer, second);

            let entry = timer.stop(datetime!(2026-03-02 10:00:00 UTC)).unwrap();
            let total = (first + second) as i64;
            assert_eq!(entry.duration_minutes, (total + 59) / 60);
        }
    }

    #[test]
    fn ninety_seconds_on_website_redesign() {
        let mut timer = filled();
        timer.start().unwrap();
        ticks(&mut timer, 90);

        let stop_time = datetime!(2026-03-02 10:00:00 UTC);
        let entry = timer.stop(stop_time).unwrap();

        assert_eq!(entry.project_name, "Website Redesign");
        assert_eq!(entry.task, "Homepage");
        assert_eq!(entry.description, "Layout work");
        assert_eq!(entry.duration_minutes, 2);
        assert_eq!(entry.end_time, stop_time);
        assert_eq!(entry.start_time, stop_time - time::Duration::seconds(90));
    }

    #[test]
    fn failed_save_keeps_elapsed_and_fields_until_retry_succeeds() {
        let mut timer = filled();
        timer.start().unwrap();
        ticks(&mut timer, 42);
        let now = datetime!(2026-03-02 10:00:00 UTC);

        timer.stop(now).unwrap();
        assert_eq!(timer.stop(now), Err(TimerError::Saving));
        timer.save_failed();

        assert_eq!(timer.state(), TimerState::Stopped);
        assert_eq!(timer.elapsed_seconds(), 42);
        assert_eq!(timer.task.value, "Homepage");
        assert_eq!(timer.start(), Err(TimerError::Unsaved));

        let retry = timer.stop(now).unwrap();
        assert_eq!(retry.duration_minutes, 1);
        timer.save_succeeded();

        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.elapsed_seconds(), 0);
        assert!(timer.project.is_none());
        assert!(timer.task.value.is_empty());
    }

    #[test]
    fn cannot_pause_or_stop_an_idle_timer() {
        let mut timer = filled();
        assert_eq!(timer.pause(), Err(TimerError::NotRunning));
        assert!(timer.stop(datetime!(2026-03-02 10:00:00 UTC)).is_err());
        assert_eq!(timer.state(), TimerState::Idle);
    }

    #[test]
    fn revalidate_clears_errors_of_filled_fields_only() {
        let mut timer = TimerWidget::new();
        assert!(timer.start().is_err());
        timer.task = TextInput::from_str("Homepage");
        timer.revalidate();
        assert_eq!(
            timer.errors,
            TimerFieldErrors {
                project: true,
                task: false,
                description: true
            }
        );
    }
}
