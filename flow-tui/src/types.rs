use records::{Record, RecordExt, RecordId, UserProfile};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime};

use crate::time_utils::{format_date, parse_date};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Priority {
    #[strum(serialize = "low")]
    Low,
    #[default]
    #[strum(serialize = "medium")]
    Medium,
    #[strum(serialize = "high")]
    High,
    #[strum(serialize = "urgent")]
    Urgent,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Status {
    #[default]
    #[strum(serialize = "pending")]
    Pending,
    #[strum(serialize = "in-progress")]
    InProgress,
    #[strum(serialize = "completed")]
    Completed,
    #[strum(serialize = "on-hold")]
    OnHold,
}

/// A file attached to a project.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub id: Option<RecordId>,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub url: String,
}

/// A local file chosen for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttachment {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub path: std::path::PathBuf,
}

impl NewAttachment {
    pub fn file_url(&self) -> String {
        format!("file://{}", self.path.display())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: RecordId,
    pub name: String,
    pub client: String,
    pub description: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub manager: String,
    pub team_members: Vec<String>,
    pub priority: Priority,
    pub status: Status,
    pub budget: f64,
    pub tags: Vec<String>,
    pub attachments: Vec<Attachment>,
}

/// Everything the project form submits. Ids are assigned by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub client: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub manager: String,
    pub team_members: Vec<String>,
    pub priority: Priority,
    pub status: Status,
    pub budget: f64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: RecordId,
    pub name: String,
}

/// A tracked stretch of work. Immutable once stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEntry {
    pub id: Option<RecordId>,
    pub project_id: Option<RecordId>,
    pub project_name: String,
    pub client: String,
    pub task: String,
    pub description: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub duration_minutes: i64,
}

/// Name linked to a project: a row of the tag or team member table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLink {
    pub id: RecordId,
    pub name: String,
    pub project_id: RecordId,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardStats {
    pub active_projects: usize,
    pub total_projects: usize,
    pub hours_tracked: f64,
    pub total_clients: usize,
}

/// The signed-in user, as shown in the header.
#[derive(Debug, Clone, PartialEq)]
pub struct Me {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl From<UserProfile> for Me {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.user_id,
            name: profile.display_name(),
            email: profile.email_address,
        }
    }
}

pub(crate) fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn string_field(record: &Record, name: &str) -> String {
    record.str_field(name).unwrap_or_default().to_string()
}

fn instant_field(record: &Record, name: &str) -> Option<OffsetDateTime> {
    record
        .str_field(name)
        .and_then(|raw| OffsetDateTime::parse(raw, &Rfc3339).ok())
}

impl Project {
    /// Reads a `project2` row. Rows without an `Id` are skipped by callers.
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.id()?,
            name: string_field(record, "Name"),
            client: string_field(record, "client"),
            description: string_field(record, "description"),
            start_date: record.str_field("startDate").and_then(parse_date),
            end_date: record.str_field("endDate").and_then(parse_date),
            manager: string_field(record, "manager"),
            team_members: Vec::new(),
            priority: record
                .str_field("priority")
                .and_then(|p| p.parse().ok())
                .unwrap_or_default(),
            status: record
                .str_field("status")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            budget: record.f64_field("budget").unwrap_or(0.0),
            tags: split_list(record.str_field("Tags")),
            attachments: Vec::new(),
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::InProgress
    }
}

impl ProjectDraft {
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("Name".into(), self.name.clone().into());
        record.insert("client".into(), self.client.clone().into());
        record.insert("description".into(), self.description.clone().into());
        record.insert("startDate".into(), format_date(self.start_date).into());
        record.insert(
            "endDate".into(),
            self.end_date
                .map(format_date)
                .map(Into::into)
                .unwrap_or(serde_json::Value::Null),
        );
        record.insert("manager".into(), self.manager.clone().into());
        record.insert("priority".into(), self.priority.to_string().into());
        record.insert("status".into(), self.status.to_string().into());
        record.insert("budget".into(), self.budget.into());
        record.insert("Tags".into(), self.tags.join(",").into());
        record
    }
}

impl Client {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.id()?,
            name: string_field(record, "Name"),
        })
    }
}

impl TimeEntry {
    /// Builds an entry that ended at `end_time` after `elapsed_seconds` of tracking.
    pub fn from_elapsed(
        project_id: Option<RecordId>,
        project_name: &str,
        client: &str,
        task: &str,
        description: &str,
        elapsed_seconds: u64,
        end_time: OffsetDateTime,
    ) -> Self {
        let start_time = end_time - time::Duration::seconds(elapsed_seconds as i64);
        Self {
            id: None,
            project_id,
            project_name: project_name.to_string(),
            client: client.to_string(),
            task: task.to_string(),
            description: description.to_string(),
            start_time,
            end_time,
            duration_minutes: duration_minutes(elapsed_seconds),
        }
    }

    pub fn from_record(record: &Record) -> Option<Self> {
        let start_time = instant_field(record, "startTime")?;
        let end_time = instant_field(record, "endTime").unwrap_or(start_time);
        let name = string_field(record, "Name");
        let task = string_field(record, "task");
        // Name is stored as "<project> - <task>".
        let project_name = name
            .strip_suffix(&format!(" - {}", task))
            .unwrap_or(&name)
            .to_string();

        Some(Self {
            id: record.id(),
            project_id: record.i64_field("project"),
            project_name,
            client: string_field(record, "client"),
            task,
            description: string_field(record, "description"),
            start_time,
            end_time,
            duration_minutes: record.i64_field("duration").unwrap_or(0),
        })
    }

    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(
            "Name".into(),
            format!("{} - {}", self.project_name, self.task).into(),
        );
        record.insert(
            "project".into(),
            self.project_id
                .map(Into::into)
                .unwrap_or(serde_json::Value::Null),
        );
        record.insert("task".into(), self.task.clone().into());
        record.insert("description".into(), self.description.clone().into());
        record.insert(
            "startTime".into(),
            self.start_time.format(&Rfc3339).unwrap_or_default().into(),
        );
        record.insert(
            "endTime".into(),
            self.end_time.format(&Rfc3339).unwrap_or_default().into(),
        );
        record.insert("duration".into(), self.duration_minutes.into());
        record
    }
}

/// Whole minutes, rounded up.
pub fn duration_minutes(elapsed_seconds: u64) -> i64 {
    elapsed_seconds.div_ceil(60) as i64
}

impl Attachment {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id(),
            name: string_field(record, "Name"),
            content_type: string_field(record, "type"),
            size: record.i64_field("size").unwrap_or(0).max(0) as u64,
            url: string_field(record, "url"),
        }
    }
}

impl ProjectLink {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.id()?,
            name: string_field(record, "Name"),
            project_id: record.i64_field("project")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::{date, datetime};

    #[test]
    fn duration_rounds_up_to_whole_minutes() {
        assert_eq!(duration_minutes(0), 0);
        assert_eq!(duration_minutes(1), 1);
        assert_eq!(duration_minutes(60), 1);
        assert_eq!(duration_minutes(61), 2);
        assert_eq!(duration_minutes(90), 2);
    }

    #[test]
    fn entry_from_elapsed_ends_at_stop_time() {
        let stop = datetime!(2026-03-02 10:00:00 UTC);
        let entry = TimeEntry::from_elapsed(
            Some(4),
            "Website Redesign",
            "Acme",
            "Homepage",
            "Layout work",
            90,
            stop,
        );
        assert_eq!(entry.start_time, datetime!(2026-03-02 09:58:30 UTC));
        assert_eq!(entry.end_time, stop);
        assert_eq!(entry.duration_minutes, 2);
    }

    #[test]
    fn time_entry_record_uses_api_field_names() {
        let entry = TimeEntry::from_elapsed(
            Some(4),
            "Website Redesign",
            "",
            "Homepage",
            "Layout work",
            120,
            datetime!(2026-03-02 10:00:00 UTC),
        );
        let record = entry.to_record();
        assert_eq!(record["Name"], "Website Redesign - Homepage");
        assert_eq!(record["project"], 4);
        assert_eq!(record["duration"], 2);
        assert_eq!(record["startTime"], "2026-03-02T09:58:00Z");

        let back = TimeEntry::from_record(&record).unwrap();
        assert_eq!(back.project_name, "Website Redesign");
    }

    #[test]
    fn project_reads_loose_record_values() {
        let record = json!({
            "Id": 3,
            "Name": "Website Redesign",
            "client": "Acme",
            "startDate": "2026-01-05",
            "endDate": "",
            "priority": "urgent",
            "status": "in-progress",
            "budget": "5000",
            "Tags": "web, design,,"
        })
        .as_object()
        .cloned()
        .unwrap();

        let project = Project::from_record(&record).unwrap();
        assert_eq!(project.start_date, Some(date!(2026 - 01 - 05)));
        assert_eq!(project.end_date, None);
        assert_eq!(project.priority, Priority::Urgent);
        assert!(project.is_active());
        assert_eq!(project.budget, 5000.0);
        assert_eq!(project.tags, vec!["web", "design"]);
    }

    #[test]
    fn status_labels_match_stored_values() {
        assert_eq!(Status::OnHold.to_string(), "on-hold");
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert!("done".parse::<Status>().is_err());
    }
}
