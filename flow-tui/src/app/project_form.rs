use records::RecordId;
use std::path::Path;
use strum::IntoEnumIterator;
use time::Date;

use super::attachments::{PreviewRegistry, StageError, StagedAttachment};
use super::date_input::DateInput;
use super::TextInput;
use crate::types::{Attachment, NewAttachment, Priority, Project, ProjectDraft, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Client,
    Manager,
    Description,
    StartDate,
    EndDate,
    Priority,
    Status,
    Budget,
    Tags,
    TeamMembers,
    Attachments,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 13] = [
        FormField::Name,
        FormField::Client,
        FormField::Manager,
        FormField::Description,
        FormField::StartDate,
        FormField::EndDate,
        FormField::Priority,
        FormField::Status,
        FormField::Budget,
        FormField::Tags,
        FormField::TeamMembers,
        FormField::Attachments,
        FormField::Submit,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name *",
            FormField::Client => "Client *",
            FormField::Manager => "Manager *",
            FormField::Description => "Description",
            FormField::StartDate => "Start date *",
            FormField::EndDate => "End date",
            FormField::Priority => "Priority",
            FormField::Status => "Status",
            FormField::Budget => "Budget (USD) *",
            FormField::Tags => "Tags",
            FormField::TeamMembers => "Team",
            FormField::Attachments => "Attachments",
            FormField::Submit => "Save",
        }
    }
}

/// Which required fields failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldErrors {
    pub name: bool,
    pub client: bool,
    pub manager: bool,
    pub start_date: bool,
    pub budget: bool,
}

impl FieldErrors {
    pub fn any(&self) -> bool {
        self.name || self.client || self.manager || self.start_date || self.budget
    }

    pub fn has(&self, field: FormField) -> bool {
        match field {
            FormField::Name => self.name,
            FormField::Client => self.client,
            FormField::Manager => self.manager,
            FormField::StartDate => self.start_date,
            FormField::Budget => self.budget,
            _ => false,
        }
    }

    pub fn message(field: FormField) -> &'static str {
        match field {
            FormField::Name => "Project name is required",
            FormField::Client => "Client name is required",
            FormField::Manager => "Project manager is required",
            FormField::StartDate => "Start date is required",
            FormField::Budget => "Valid budget amount is required",
            _ => "",
        }
    }
}

/// A validated form, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSubmission {
    pub mode: FormMode,
    pub draft: ProjectDraft,
    pub uploads: Vec<NewAttachment>,
}

/// What the form asks its owner to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    Submit(FormSubmission),
    Cancel,
}

/// Budget must be a finite number.
pub fn parse_budget(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|b| b.is_finite())
}

/// Project create/edit form. Dropping it releases every staged preview.
#[derive(Debug)]
pub struct ProjectForm {
    pub mode: FormMode,
    pub focused: FormField,
    pub name: TextInput,
    pub client: TextInput,
    pub manager: TextInput,
    pub description: TextInput,
    pub budget: TextInput,
    pub start_date: DateInput,
    pub end_date: DateInput,
    pub priority: Priority,
    pub status: Status,
    pub tag_input: TextInput,
    pub tags: Vec<String>,
    pub member_input: TextInput,
    pub team_members: Vec<String>,
    pub attachment_input: TextInput,
    pub existing_attachments: Vec<Attachment>,
    pub staged: Vec<StagedAttachment>,
    pub errors: FieldErrors,
    pub submitting: bool,
    /// False until an edited project's team members and files have arrived.
    details_loaded: bool,
    previews: PreviewRegistry,
}

impl ProjectForm {
    pub fn create(previews: PreviewRegistry, today: Date) -> Self {
        let mut end_date = DateInput::new(None);
        end_date.set_min(Some(today));
        Self {
            mode: FormMode::Create,
            focused: FormField::Name,
            name: TextInput::new(),
            client: TextInput::new(),
            manager: TextInput::new(),
            description: TextInput::new(),
            budget: TextInput::new(),
            start_date: DateInput::new(Some(today)),
            end_date,
            priority: Priority::default(),
            status: Status::default(),
            tag_input: TextInput::new(),
            tags: Vec::new(),
            member_input: TextInput::new(),
            team_members: Vec::new(),
            attachment_input: TextInput::new(),
            existing_attachments: Vec::new(),
            staged: Vec::new(),
            errors: FieldErrors::default(),
            submitting: false,
            details_loaded: true,
            previews,
        }
    }

    /// Pre-filled from a stored project; submits an update of that project.
    pub fn edit(project: &Project, previews: PreviewRegistry) -> Self {
        let mut end_date = DateInput::new(project.end_date);
        end_date.set_min(project.start_date);
        Self {
            mode: FormMode::Edit(project.id),
            focused: FormField::Name,
            name: TextInput::from_str(&project.name),
            client: TextInput::from_str(&project.client),
            manager: TextInput::from_str(&project.manager),
            description: TextInput::from_str(&project.description),
            budget: TextInput::from_str(&project.budget.to_string()),
            start_date: DateInput::new(project.start_date),
            end_date,
            priority: project.priority,
            status: project.status,
            tag_input: TextInput::new(),
            tags: project.tags.clone(),
            member_input: TextInput::new(),
            team_members: project.team_members.clone(),
            attachment_input: TextInput::new(),
            existing_attachments: project.attachments.clone(),
            staged: Vec::new(),
            errors: FieldErrors::default(),
            submitting: false,
            details_loaded: false,
            previews,
        }
    }

    /// Fill in the linked rows that the project list does not carry.
    pub fn apply_details(&mut self, team_members: Vec<String>, attachments: Vec<Attachment>) {
        for member in team_members {
            push_unique(&mut self.team_members, member.trim());
        }
        self.existing_attachments = attachments;
        self.details_loaded = true;
    }

    /// Editing a project whose team members have not been loaded yet. Saving
    /// now would replace the stored team with an empty one.
    pub fn details_pending(&self) -> bool {
        !self.details_loaded
    }

    /// The project row was stored but a later step failed. The next submit
    /// updates that row, and files already uploaded are no longer staged.
    pub fn record_partial_save(&mut self, project_id: RecordId, uploaded: Vec<Attachment>) {
        self.mode = FormMode::Edit(project_id);
        let done = uploaded.len().min(self.staged.len());
        self.staged.drain(..done);
        self.existing_attachments.extend(uploaded);
        self.details_loaded = true;
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => " New Project ",
            FormMode::Edit(_) => " Edit Project ",
        }
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
    }

    /// The text input behind the focused field, if it is a text field.
    pub fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FormField::Name => Some(&mut self.name),
            FormField::Client => Some(&mut self.client),
            FormField::Manager => Some(&mut self.manager),
            FormField::Description => Some(&mut self.description),
            FormField::Budget => Some(&mut self.budget),
            FormField::Tags => Some(&mut self.tag_input),
            FormField::TeamMembers => Some(&mut self.member_input),
            FormField::Attachments => Some(&mut self.attachment_input),
            _ => None,
        }
    }

    pub fn focused_date(&mut self) -> Option<&mut DateInput> {
        match self.focused {
            FormField::StartDate => Some(&mut self.start_date),
            FormField::EndDate => Some(&mut self.end_date),
            _ => None,
        }
    }

    pub fn input_char(&mut self, c: char, today: Date) {
        if let Some(input) = self.focused_input() {
            input.insert(c);
        } else if let Some(date) = self.focused_date() {
            date.input_digit(c, today);
        }
        self.field_changed();
    }

    pub fn backspace(&mut self) {
        if let Some(input) = self.focused_input() {
            input.backspace();
        } else if let Some(date) = self.focused_date() {
            date.backspace();
        }
        self.field_changed();
    }

    /// Up/down: step dates, cycle priority and status.
    pub fn step(&mut self, delta: i32, today: Date) {
        match self.focused {
            FormField::Priority => self.priority = cycle(self.priority, delta),
            FormField::Status => self.status = cycle(self.status, delta),
            _ => {
                if let Some(date) = self.focused_date() {
                    date.step(delta, today);
                }
            }
        }
        self.field_changed();
    }

    /// Keep the end date's lower bound on the start date and clear errors of
    /// fields that became valid.
    pub fn field_changed(&mut self) {
        self.end_date.set_min(self.start_date.value());

        let current = self.check();
        self.errors.name &= current.name;
        self.errors.client &= current.client;
        self.errors.manager &= current.manager;
        self.errors.start_date &= current.start_date;
        self.errors.budget &= current.budget;
    }

    fn check(&self) -> FieldErrors {
        FieldErrors {
            name: self.name.is_blank(),
            client: self.client.is_blank(),
            manager: self.manager.is_blank(),
            start_date: self.start_date.value().is_none(),
            budget: parse_budget(&self.budget.value).is_none(),
        }
    }

    pub fn validate(&mut self) -> FieldErrors {
        self.errors = self.check();
        self.errors
    }

    /// Add the typed tag. Returns false for blanks and exact duplicates.
    pub fn add_tag(&mut self) -> bool {
        let added = push_unique(&mut self.tags, self.tag_input.trimmed());
        self.tag_input.clear();
        added
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    pub fn add_team_member(&mut self) -> bool {
        let added = push_unique(&mut self.team_members, self.member_input.trimmed());
        self.member_input.clear();
        added
    }

    pub fn remove_team_member(&mut self, index: usize) -> Option<String> {
        (index < self.team_members.len()).then(|| self.team_members.remove(index))
    }

    /// Stage the file named in the attachment input.
    pub fn stage_attachment(&mut self) -> Result<(), StageError> {
        let raw = self.attachment_input.trimmed().to_string();
        if raw.is_empty() {
            return Ok(());
        }
        let staged = StagedAttachment::stage(Path::new(&raw), &self.previews)?;
        self.staged.push(staged);
        self.attachment_input.clear();
        Ok(())
    }

    /// Unstage a file, releasing its preview.
    pub fn remove_attachment(&mut self, index: usize) -> bool {
        if index >= self.staged.len() {
            return false;
        }
        self.staged.remove(index);
        true
    }

    /// Remove the newest entry of the focused list field.
    pub fn remove_last(&mut self) {
        match self.focused {
            FormField::Tags => {
                self.tags.pop();
            }
            FormField::TeamMembers => {
                self.team_members.pop();
            }
            FormField::Attachments => {
                if !self.staged.is_empty() {
                    self.remove_attachment(self.staged.len() - 1);
                }
            }
            _ => {}
        }
    }

    /// Validate and, when everything required is present, hand out the submission.
    pub fn submit(&mut self) -> Option<FormOutcome> {
        if self.details_pending() {
            tracing::debug!("project details still loading");
            return None;
        }
        if self.validate().any() {
            tracing::debug!(errors = ?self.errors, "project form invalid");
            return None;
        }
        let start_date = self.start_date.value()?;
        let budget = parse_budget(&self.budget.value)?;

        let draft = ProjectDraft {
            name: self.name.trimmed().to_string(),
            client: self.client.trimmed().to_string(),
            description: self.description.trimmed().to_string(),
            start_date,
            end_date: self.end_date.value().filter(|end| *end >= start_date),
            manager: self.manager.trimmed().to_string(),
            team_members: self.team_members.clone(),
            priority: self.priority,
            status: self.status,
            budget,
            tags: self.tags.clone(),
        };
        Some(FormOutcome::Submit(FormSubmission {
            mode: self.mode,
            draft,
            uploads: self.staged.iter().map(|s| s.file.clone()).collect(),
        }))
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    if value.is_empty() || list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

fn cycle<T: IntoEnumIterator + PartialEq + Copy>(current: T, delta: i32) -> T {
    let all: Vec<T> = T::iter().collect();
    let len = all.len() as i32;
    let index = all.iter().position(|v| *v == current).unwrap_or(0) as i32;
    all[(index + delta).rem_euclid(len) as usize]
}
