use records::{MemoryRecordApi, Record, RecordExt, Table};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};

use crate::time_utils::{format_date, today};
use crate::types::TimeEntry;

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

/// In-memory tables with a few clients, projects and a week of tracked time.
pub fn seeded() -> MemoryRecordApi {
    let api = MemoryRecordApi::new();
    let today = today();

    api.seed(
        Table::Client,
        ["Acme Corp", "Globex", "Initech"]
            .into_iter()
            .map(|name| record(json!({ "Name": name }))),
    );

    let projects = api.seed(
        Table::Project,
        [
            (
                "Website Redesign",
                "Acme Corp",
                "Ada Lovelace",
                "in-progress",
                "high",
                12000.0,
                "web,design",
            ),
            (
                "Mobile App",
                "Globex",
                "Grace Hopper",
                "pending",
                "medium",
                30000.0,
                "mobile",
            ),
            (
                "Data Migration",
                "Initech",
                "Alan Turing",
                "on-hold",
                "urgent",
                8000.0,
                "",
            ),
        ]
        .into_iter()
        .map(|(name, client, manager, status, priority, budget, tags)| {
            record(json!({
                "Name": name,
                "client": client,
                "description": format!("{} for {}", name, client),
                "startDate": format_date(today - Duration::days(30)),
                "endDate": format_date(today + Duration::days(60)),
                "manager": manager,
                "status": status,
                "priority": priority,
                "budget": budget,
                "Tags": tags,
            }))
        }),
    );

    let project_id = |idx: usize| projects.get(idx).and_then(|p| p.id());

    api.seed(
        Table::Tag,
        [(0, "web"), (0, "design"), (1, "mobile")]
            .into_iter()
            .map(|(idx, name)| record(json!({ "Name": name, "project": project_id(idx) }))),
    );
    api.seed(
        Table::TeamMember,
        [(0, "Ada Lovelace"), (0, "Charles Babbage"), (1, "Grace Hopper")]
            .into_iter()
            .map(|(idx, name)| record(json!({ "Name": name, "project": project_id(idx) }))),
    );

    let now = OffsetDateTime::now_utc();
    let entries = [
        (0, "Homepage", "Layout work", 1, 95 * 60),
        (0, "Navigation", "Menu states", 2, 50 * 60),
        (1, "Onboarding", "Wireframes", 3, 130 * 60),
    ];
    api.seed(
        Table::TimeEntry,
        entries
            .into_iter()
            .map(|(idx, task, description, days_ago, seconds)| {
                let name = projects
                    .get(idx)
                    .and_then(|p| p.str_field("Name"))
                    .unwrap_or_default();
                TimeEntry::from_elapsed(
                    project_id(idx),
                    name,
                    "",
                    task,
                    description,
                    seconds,
                    now - Duration::days(days_ago),
                )
                .to_record()
            }),
    );

    api
}
