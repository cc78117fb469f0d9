use super::*;
use crate::app::{TextInput, TimeFocus, TimerState};
use crate::time_utils::{format_clock, format_elapsed, format_minutes};
use crate::types::TimeEntry;
use ratatui::widgets::ListState;

pub fn render_time_view(frame: &mut Frame, app: &App, body: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5),  // Stopwatch
            Constraint::Length(3),  // Project
            Constraint::Length(3),  // Task
            Constraint::Length(3),  // Description
            Constraint::Min(3),     // Entries
            Constraint::Length(2),  // Controls
        ])
        .split(body);

    render_stopwatch(frame, chunks[0], app, palette);
    render_fields(frame, &chunks[1..4], app, palette);
    render_entries(frame, chunks[4], app, palette);

    let hints: &[(&str, &str)] = match app.time.focus {
        TimeFocus::Entries => &[
            ("Tab", "Next field"),
            ("j/k", "Move"),
            ("d", "Delete"),
            ("n/p", "Page"),
            ("Ctrl+S", "Start"),
            ("Ctrl+X", "Stop"),
        ],
        _ => &[
            ("Tab", "Next field"),
            ("Ctrl+S", "Start"),
            ("Ctrl+P", "Pause"),
            ("Ctrl+X", "Stop & save"),
            ("Ctrl+R", "Reset"),
        ],
    };
    render_hints(frame, chunks[5], palette, hints);
}

fn render_stopwatch(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let timer = &app.timer;
    let (label, style) = match timer.state() {
        TimerState::Idle => ("Idle", palette.dim()),
        TimerState::Running => ("Running", Style::default().fg(palette.success)),
        TimerState::Paused => ("Paused", palette.accent()),
        TimerState::Stopped if timer.is_saving() => ("Saving...", palette.accent()),
        TimerState::Stopped => ("Not saved", palette.error()),
    };

    let lines = vec![
        Line::from(Span::styled(
            format_elapsed(timer.elapsed_seconds()),
            palette.text().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, style)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(panel("Timer", palette, timer.is_running())),
        area,
    );
}

fn render_fields(frame: &mut Frame, areas: &[Rect], app: &App, palette: &Palette) {
    let timer = &app.timer;
    let focus = app.time.focus;
    let editable = timer.is_editable();

    let project = match &timer.project {
        Some(p) if p.client.is_empty() => p.name.clone(),
        Some(p) => format!("{}: {}", p.client, p.name),
        None if focus == TimeFocus::Project && editable => "Press Enter to pick a project".to_string(),
        None => "No project".to_string(),
    };
    render_field(
        frame,
        areas[0],
        "Project",
        project,
        focus == TimeFocus::Project,
        timer.errors.project.then_some("Select a project"),
        palette,
    );

    for (area, title, input, field, error) in [
        (
            areas[1],
            "Task",
            &timer.task,
            TimeFocus::Task,
            timer.errors.task.then_some("Task is required"),
        ),
        (
            areas[2],
            "Description",
            &timer.description,
            TimeFocus::Description,
            timer.errors.description.then_some("Description is required"),
        ),
    ] {
        let focused = focus == field;
        render_field(
            frame,
            area,
            title,
            text_value(input, focused && editable),
            focused,
            error,
            palette,
        );
    }
}

fn text_value(input: &TextInput, editing: bool) -> String {
    utils::input_text(input, editing, "")
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    focused: bool,
    error: Option<&str>,
    palette: &Palette,
) {
    let mut block = panel(title, palette, focused);
    if let Some(message) = error {
        block = block
            .border_style(palette.error())
            .title_bottom(Span::styled(format!(" {} ", message), palette.error()));
    }
    frame.render_widget(Paragraph::new(value).style(palette.text()).block(block), area);
}

fn render_entries(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let entries = &app.time.entries;
    let focused = app.time.focus == TimeFocus::Entries;
    let title = format!("Time entries · page {}", entries.page);

    if entries.items.is_empty() {
        let text = if entries.loading {
            "Loading time entries..."
        } else {
            "No time entries yet"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, palette.dim()))
                .alignment(Alignment::Center)
                .block(panel(title, palette, focused)),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = entries
        .items
        .iter()
        .map(|e| ListItem::new(entry_line(app, e, palette)))
        .collect();
    let list = List::new(items)
        .highlight_style(palette.selected())
        .highlight_symbol(if focused { "▶ " } else { "  " })
        .block(panel(title, palette, focused));
    let mut state = ListState::default().with_selected(focused.then_some(entries.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn entry_line<'a>(app: &'a App, entry: &'a TimeEntry, palette: &Palette) -> Line<'a> {
    let client = app.entry_client(entry);
    Line::from(vec![
        Span::styled(format_clock(entry.start_time), palette.dim()),
        Span::styled(
            format!("  {:>8}  ", format_minutes(entry.duration_minutes)),
            palette.accent(),
        ),
        Span::styled(entry.project_name.as_str(), palette.text().add_modifier(Modifier::BOLD)),
        Span::styled(
            if client.is_empty() { String::new() } else { format!(" · {}", client) },
            palette.dim(),
        ),
        Span::styled(format!("  {}", entry.task), palette.text()),
        Span::styled(format!("  {}", entry.description), palette.dim()),
    ])
}

pub fn render_project_picker(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(picker) = &app.time.picker else {
        return;
    };
    let area = clear_popup(frame, 60, 18, palette);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Matches
            Constraint::Length(1), // Controls
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(utils::input_text(&picker.query, true, ""))
            .style(palette.text())
            .block(panel("Search", palette, true)),
        chunks[0],
    );

    let matches = app.picker_matches();
    let title = if picker.query.value.is_empty() {
        format!("Projects ({})", app.time.project_options.len())
    } else {
        format!(
            "Projects ({}/{})",
            matches.len(),
            app.time.project_options.len()
        )
    };
    let items: Vec<ListItem> = matches
        .iter()
        .map(|p| {
            let label = if p.client.is_empty() {
                p.name.clone()
            } else {
                format!("{}: {}", p.client, p.name)
            };
            ListItem::new(label).style(palette.text())
        })
        .collect();
    let list = List::new(items)
        .highlight_style(palette.selected())
        .highlight_symbol("▶ ")
        .block(panel(title, palette, false));
    let mut state = ListState::default().with_selected(Some(picker.selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    frame.render_widget(
        Paragraph::new(Line::from(utils::key_hints(
            palette,
            &[("↑/↓", "Move"), ("Enter", "Select"), ("Esc", "Cancel")],
        )))
        .alignment(Alignment::Center),
        chunks[2],
    );
}
