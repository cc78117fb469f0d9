use super::*;
use ratatui::widgets::ListState;

pub fn render_clients(frame: &mut Frame, app: &App, body: Rect, palette: &Palette) {
    let adding = app.clients.new_client.is_some();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(if adding { 3 } else { 0 }), // New client input
            Constraint::Min(3),                              // Client list
            Constraint::Length(2),                           // Controls
        ])
        .split(body);

    if let Some(input) = &app.clients.new_client {
        frame.render_widget(
            Paragraph::new(utils::input_text(input, true, ""))
                .style(palette.text())
                .block(panel("New client", palette, true)),
            chunks[0],
        );
    }

    let list = &app.clients.list;
    let title = format!("Clients · page {}", list.page);
    if list.items.is_empty() {
        let text = if list.loading {
            "Loading clients..."
        } else {
            "No clients yet. Press a to add one."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, palette.dim()))
                .alignment(Alignment::Center)
                .block(panel(title, palette, !adding)),
            chunks[1],
        );
    } else {
        let items: Vec<ListItem> = list
            .items
            .iter()
            .map(|c| client_item(app, &c.name, palette))
            .collect();
        let widget = List::new(items)
            .highlight_style(palette.selected())
            .highlight_symbol("▶ ")
            .block(panel(title, palette, !adding));
        let mut state = ListState::default().with_selected(Some(list.selected));
        frame.render_stateful_widget(widget, chunks[1], &mut state);
    }

    let hints: &[(&str, &str)] = if adding {
        &[("Enter", "Create"), ("Esc", "Cancel")]
    } else {
        &[
            ("j/k", "Move"),
            ("a", "Add"),
            ("d", "Delete"),
            ("n/p", "Page"),
            ("r", "Reload"),
        ]
    };
    render_hints(frame, chunks[2], palette, hints);
}

fn client_item<'a>(app: &'a App, name: &'a str, palette: &Palette) -> ListItem<'a> {
    let projects = app.client_projects(name);
    let summary = match projects.len() {
        0 => Line::from(Span::styled("    No active projects", palette.dim())),
        n => Line::from(vec![
            Span::styled(
                format!("    {} {}  ", n, if n == 1 { "Project" } else { "Projects" }),
                palette.accent(),
            ),
            Span::styled(
                projects
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                palette.dim(),
            ),
        ]),
    };
    ListItem::new(vec![
        Line::from(Span::styled(name, palette.text().add_modifier(Modifier::BOLD))),
        summary,
    ])
}
