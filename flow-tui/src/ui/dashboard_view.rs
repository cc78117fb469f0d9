use super::*;
use crate::types::DashboardStats;

pub fn render_dashboard(frame: &mut Frame, app: &App, body: Rect, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Greeting
            Constraint::Length(5), // Stat cards
            Constraint::Min(0),
            Constraint::Length(2), // Controls
        ])
        .split(body);

    let greeting = match &app.auth.user {
        Some(user) => format!("Welcome back, {}", user.name),
        None => "Welcome".to_string(),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(greeting, palette.text().add_modifier(Modifier::BOLD))),
        chunks[0],
    );

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[1]);

    match &app.dashboard.stats {
        Some(stats) => {
            for (i, (label, value)) in stat_cards(stats).into_iter().enumerate() {
                render_card(frame, cards[i], label, &value, palette);
            }
        }
        None => {
            let text = if app.dashboard.loading {
                "Loading statistics..."
            } else {
                "No statistics yet. Press r to load."
            };
            frame.render_widget(
                Paragraph::new(Span::styled(text, palette.dim())).alignment(Alignment::Center),
                chunks[1],
            );
        }
    }

    render_hints(
        frame,
        chunks[3],
        palette,
        &[
            ("1-4", "Switch view"),
            ("r", "Reload"),
            ("t", "Theme"),
            ("L", "Sign out"),
            ("q", "Quit"),
        ],
    );
}

fn stat_cards(stats: &DashboardStats) -> [(&'static str, String); 4] {
    [
        ("Active projects", stats.active_projects.to_string()),
        ("Total projects", stats.total_projects.to_string()),
        ("Hours tracked", format!("{:.1}", stats.hours_tracked)),
        ("Total clients", stats.total_clients.to_string()),
    ]
}

fn render_card(frame: &mut Frame, area: Rect, label: &str, value: &str, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(value.to_string(), palette.selected())),
        Line::from(Span::styled(label.to_string(), palette.dim())),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(palette.border(false)),
            ),
        area,
    );
}
