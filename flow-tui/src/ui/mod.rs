use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Tabs},
    Frame,
};

mod clients_view;
mod dashboard_view;
mod delete_dialog;
mod login_view;
mod project_form_view;
mod projects_view;
pub(super) mod theme;
mod time_view;
pub(super) mod utils;

use theme::Palette;

const APP_TITLE: &str = " FreelanceFlow";

pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.theme);
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.bg)),
        frame.area(),
    );

    let notice_height = app.notifications.items().len() as u16;
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(notice_height),
            Constraint::Min(0),
        ])
        .split(frame.area());

    render_header(frame, root[0], app, &palette);
    render_notifications(frame, root[1], app, &palette);

    let body = root[2];
    match app.current_view {
        View::Dashboard => dashboard_view::render_dashboard(frame, app, body, &palette),
        View::Projects => projects_view::render_projects(frame, app, body, &palette),
        View::Time => time_view::render_time_view(frame, app, body, &palette),
        View::Clients => clients_view::render_clients(frame, app, body, &palette),
        View::Login => login_view::render_login(frame, app, body, &palette),
    }

    // Overlays, topmost last
    if app.form.is_some() {
        project_form_view::render_project_form(frame, app, &palette);
    } else if app.time.picker.is_some() && app.current_view == View::Time {
        time_view::render_project_picker(frame, app, &palette);
    }
    delete_dialog::render_pending_delete(frame, app, &palette);
}

fn render_header(frame: &mut Frame, area: Rect, app: &mut App, palette: &Palette) {
    let user = app
        .auth
        .user
        .as_ref()
        .map(|u| format!(" {} ", u.name))
        .unwrap_or_default();
    let dev = if app.dev_mode { " DEV " } else { "" };
    let right_width = (user.chars().count() + dev.len() + 9) as u16;

    let title_width = 1 + APP_TITLE.len() as u16 + 2;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(title_width),
            Constraint::Min(10),
            Constraint::Length(right_width),
        ])
        .split(area);

    // Throbber spins while anything is loading, full symbol otherwise
    let throbber_area = Rect {
        x: cols[0].x + 1,
        y: cols[0].y,
        width: 1,
        height: 1,
    };
    let label_area = Rect {
        x: throbber_area.x + 1,
        y: cols[0].y,
        width: cols[0].width.saturating_sub(2),
        height: 1,
    };
    let throbber = throbber_widgets_tui::Throbber::default()
        .style(palette.accent())
        .throbber_style(palette.accent())
        .throbber_set(throbber_widgets_tui::BRAILLE_SIX)
        .use_type(if app.is_loading() {
            throbber_widgets_tui::WhichUse::Spin
        } else {
            throbber_widgets_tui::WhichUse::Full
        });
    frame.render_stateful_widget(throbber, throbber_area, &mut app.throbber_state);
    frame.render_widget(
        Paragraph::new(Span::styled(
            APP_TITLE,
            palette.accent().add_modifier(Modifier::BOLD),
        )),
        label_area,
    );

    if app.auth.is_authenticated() {
        let titles: Vec<Line> = View::TABS
            .iter()
            .enumerate()
            .map(|(i, v)| Line::from(format!("{} {}", i + 1, v.title())))
            .collect();
        let selected = View::TABS.iter().position(|v| *v == app.current_view);
        let tabs = Tabs::new(titles)
            .select(selected)
            .style(palette.dim())
            .highlight_style(palette.selected())
            .divider(Span::styled("|", palette.dim()));
        frame.render_widget(tabs, cols[1]);
    }

    let mut right = vec![Span::styled(user, palette.text())];
    if app.dev_mode {
        right.push(Span::styled(
            dev,
            Style::default()
                .fg(palette.bg)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ));
    }
    right.push(Span::styled(format!(" {} ", app.theme), palette.dim()));
    frame.render_widget(
        Paragraph::new(Line::from(right)).alignment(Alignment::Right),
        cols[2],
    );
}

fn render_notifications(frame: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    if area.height == 0 {
        return;
    }
    let items: Vec<ListItem> = app
        .notifications
        .items()
        .iter()
        .rev()
        .map(|n| {
            ListItem::new(Line::from(vec![
                Span::styled(" ● ", palette.notice(n.level)),
                Span::styled(n.message.clone(), palette.text()),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items), area);
}

/// Bordered block with a padded title, the frame every view body uses.
fn panel<'a>(title: impl Into<String>, palette: &Palette, focused: bool) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(Span::styled(
            format!(" {} ", title.into()),
            if focused {
                palette.selected()
            } else {
                palette.text()
            },
        ))
        .padding(Padding::horizontal(1))
}

/// Single line of key hints pinned to the bottom of a view.
fn render_hints(frame: &mut Frame, area: Rect, palette: &Palette, hints: &[(&str, &str)]) {
    let line = Line::from(utils::key_hints(palette, hints));
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP).border_style(palette.dim())),
        area,
    );
}

fn clear_popup(frame: &mut Frame, width: u16, height: u16, palette: &Palette) -> Rect {
    let area = utils::centered_rect(width, height, frame.area());
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(palette.bg)), area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FlowConfig;
    use crate::types::{DashboardStats, Me};
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(
            FlowConfig::default(),
            std::env::temp_dir().join("flow-tui-ui-tests").join("config.toml"),
        )
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn signed_in() -> App {
        let mut app = app();
        app.set_user(Some(Me {
            id: Some(1),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }));
        app.current_view = View::Dashboard;
        app
    }

    #[test]
    fn login_screen_masks_the_token() {
        let mut app = app();
        app.login.token = crate::app::TextInput::from_str("secret");
        let text = screen(&mut app);
        assert!(text.contains("Sign in"));
        assert!(!text.contains("secret"));
        assert!(text.contains("••••••"));
    }

    #[test]
    fn dashboard_shows_stat_cards_and_tabs() {
        let mut app = signed_in();
        app.dashboard.stats = Some(DashboardStats {
            active_projects: 3,
            total_projects: 7,
            hours_tracked: 12.5,
            total_clients: 4,
        });
        let text = screen(&mut app);
        assert!(text.contains("1 Dashboard"));
        assert!(text.contains("Active projects"));
        assert!(text.contains("12.5"));
        assert!(text.contains("Ada"));
    }

    #[test]
    fn notices_and_form_overlay_render() {
        let mut app = signed_in();
        app.current_view = View::Projects;
        app.notify_error("Could not save");
        app.open_create_form();
        let text = screen(&mut app);
        assert!(text.contains("Could not save"));
        assert!(text.contains("New Project"));
    }
}
