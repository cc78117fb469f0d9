use super::*;
use crate::time_utils::format_date;
use crate::types::{Priority, Project, Status};
use ratatui::widgets::{Cell, Row, Table, TableState, Wrap};

pub fn render_projects(frame: &mut Frame, app: &App, body: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(5),    // Project table
            Constraint::Length(7), // Selected project details
            Constraint::Length(2), // Controls
        ])
        .split(body);

    let list = &app.projects.list;
    let title = format!("Projects · page {}", list.page);

    if list.items.is_empty() {
        let text = if list.loading {
            "Loading projects..."
        } else {
            "No projects on this page. Press a to create one."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, palette.dim()))
                .alignment(Alignment::Center)
                .block(panel(title, palette, app.form.is_none())),
            chunks[0],
        );
    } else {
        let header = Row::new(["Name", "Client", "Status", "Priority", "Start", "End", "Budget"])
            .style(palette.dim());
        let rows: Vec<Row> = list.items.iter().map(|p| project_row(p, palette)).collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(16),
                Constraint::Min(12),
                Constraint::Length(12),
                Constraint::Length(9),
                Constraint::Length(11),
                Constraint::Length(11),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(palette.selected())
        .highlight_symbol("▶ ")
        .block(panel(title, palette, app.form.is_none()));

        let mut state = TableState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(table, chunks[0], &mut state);
    }

    render_details(frame, chunks[1], app.selected_project(), palette);

    render_hints(
        frame,
        chunks[2],
        palette,
        &[
            ("j/k", "Move"),
            ("a", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("n/p", "Page"),
            ("r", "Reload"),
        ],
    );
}

fn project_row<'a>(project: &'a Project, palette: &Palette) -> Row<'a> {
    Row::new(vec![
        Cell::from(project.name.as_str()),
        Cell::from(project.client.as_str()),
        Cell::from(Span::styled(project.status.to_string(), status_style(project.status, palette))),
        Cell::from(Span::styled(
            project.priority.to_string(),
            priority_style(project.priority, palette),
        )),
        Cell::from(project.start_date.map(format_date).unwrap_or_default()),
        Cell::from(project.end_date.map(format_date).unwrap_or_default()),
        Cell::from(format!("{:.2}", project.budget)),
    ])
    .style(palette.text())
}

fn status_style(status: Status, palette: &Palette) -> Style {
    match status {
        Status::Completed => Style::default().fg(palette.success),
        Status::InProgress => palette.accent(),
        Status::OnHold => palette.dim(),
        Status::Pending => palette.text(),
    }
}

fn priority_style(priority: Priority, palette: &Palette) -> Style {
    match priority {
        Priority::Urgent => palette.error().add_modifier(Modifier::BOLD),
        Priority::High => palette.error(),
        Priority::Medium => palette.text(),
        Priority::Low => palette.dim(),
    }
}

fn render_details(frame: &mut Frame, area: Rect, project: Option<&Project>, palette: &Palette) {
    let Some(project) = project else {
        frame.render_widget(panel("Details", palette, false), area);
        return;
    };

    let manager = if project.manager.is_empty() {
        "-".to_string()
    } else {
        project.manager.clone()
    };
    let tags = if project.tags.is_empty() {
        "-".to_string()
    } else {
        project.tags.join(", ")
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Manager: ", palette.dim()),
            Span::styled(manager, palette.text()),
            Span::styled("   Tags: ", palette.dim()),
            Span::styled(tags, palette.accent()),
        ]),
        Line::from(Span::styled(project.description.clone(), palette.text())),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(project.name.clone(), palette, false)),
        area,
    );
}
