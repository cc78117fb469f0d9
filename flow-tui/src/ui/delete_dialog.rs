use super::*;
use crate::time_utils::{format_clock, format_minutes};

/// What the open confirmation would delete: kind and a one-line summary.
fn pending_target(app: &App) -> Option<(&'static str, String)> {
    match app.current_view {
        View::Projects => {
            let id = app.projects.pending_delete?;
            let name = app
                .projects
                .list
                .items
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("#{}", id));
            Some(("Project", name))
        }
        View::Clients => {
            let id = app.clients.pending_delete?;
            let name = app
                .clients
                .list
                .items
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("#{}", id));
            Some(("Client", name))
        }
        View::Time => {
            let id = app.time.pending_delete?;
            let summary = app
                .time
                .entries
                .items
                .iter()
                .find(|e| e.id == Some(id))
                .map(|e| {
                    format!(
                        "{}  ·  {}  ·  {}",
                        e.project_name,
                        format_clock(e.start_time),
                        format_minutes(e.duration_minutes)
                    )
                })
                .unwrap_or_else(|| format!("#{}", id));
            Some(("Time Entry", summary))
        }
        View::Dashboard | View::Login => None,
    }
}

pub fn render_pending_delete(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some((kind, label)) = pending_target(app) else {
        return;
    };

    let area = clear_popup(frame, 56, 9, palette);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(label, palette.text())),
        Line::from(Span::styled("This cannot be undone.", palette.dim())),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", palette.error()),
            Span::raw("    "),
            Span::styled("[n] No", palette.text()),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.error())
                .title(Span::styled(format!(" Delete {}? ", kind), palette.error()))
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowConfig;
    use crate::types::Client;
    use records::RecordId;

    #[test]
    fn names_the_client_being_deleted() {
        let mut app = App::new(
            FlowConfig::default(),
            std::env::temp_dir().join("flow-tui-dialog-tests").join("config.toml"),
        );
        app.current_view = View::Clients;
        let id: RecordId = 7;
        app.clients.list.set_items(vec![Client {
            id,
            name: "Acme".to_string(),
        }]);
        assert!(pending_target(&app).is_none());

        app.clients.pending_delete = Some(id);
        assert_eq!(pending_target(&app), Some(("Client", "Acme".to_string())));
    }
}
