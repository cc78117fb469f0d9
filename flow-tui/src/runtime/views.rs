use crate::app::{App, FormOutcome, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action_queue::{Action, ActionTx};

mod clients;
mod dashboard;
mod login;
mod project_form;
mod projects;
mod time;

fn enqueue_action(action_tx: &ActionTx, action: Action) {
    let _ = action_tx.send(action);
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Route a key press. The project form answers with a [`FormOutcome`] when it
/// is submitted or dismissed.
pub(super) fn handle_key(
    key: KeyEvent,
    app: &mut App,
    action_tx: &ActionTx,
) -> Option<FormOutcome> {
    if is_ctrl(&key, 'c') {
        app.quit();
        return None;
    }
    if app.form.is_some() {
        return project_form::handle_project_form_key(key, app);
    }

    if !app.is_typing() {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                app.quit();
                return None;
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                enqueue_action(action_tx, Action::ToggleTheme);
                return None;
            }
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(view) = c.to_digit(10).and_then(App::tab_view) {
                    enqueue_action(action_tx, Action::Navigate(crate::auth::Route::from_view(view)));
                }
                return None;
            }
            KeyCode::Char('x') if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.notifications.dismiss();
                return None;
            }
            KeyCode::Char('L') if app.auth.is_authenticated() => {
                enqueue_action(action_tx, Action::SignOut);
                return None;
            }
            _ => {}
        }
    }

    match app.current_view {
        View::Dashboard => dashboard::handle_dashboard_key(key, action_tx),
        View::Projects => projects::handle_projects_key(key, app, action_tx),
        View::Time => time::handle_time_key(key, app, action_tx),
        View::Clients => clients::handle_clients_key(key, app, action_tx),
        View::Login => login::handle_login_key(key, app, action_tx),
    }
    None
}

#[cfg(test)]
mod tests {
    use super::super::action_queue::channel;
    use super::*;
    use crate::config::FlowConfig;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char(c))
        }
    }

    fn app() -> App {
        App::new(
            FlowConfig::default(),
            std::env::temp_dir().join("flow-tui-view-tests").join("config.toml"),
        )
    }

    #[test]
    fn number_keys_switch_tabs_outside_text_fields() {
        let (tx, mut rx) = channel();
        let mut app = app();
        app.current_view = View::Dashboard;

        handle_key(key(KeyCode::Char('3')), &mut app, &tx);
        assert!(matches!(
            rx.try_recv(),
            Ok(Action::Navigate(crate::auth::Route::Time))
        ));
    }

    #[test]
    fn login_screen_types_instead_of_quitting() {
        let (tx, _rx) = channel();
        let mut app = app();
        handle_key(key(KeyCode::Char('q')), &mut app, &tx);

        assert!(app.running);
        assert_eq!(app.login.token.value, "q");
    }

    #[test]
    fn timer_shortcuts_enqueue_actions() {
        let (tx, mut rx) = channel();
        let mut app = app();
        app.current_view = View::Time;

        handle_key(ctrl('s'), &mut app, &tx);
        handle_key(ctrl('p'), &mut app, &tx);
        handle_key(ctrl('x'), &mut app, &tx);
        assert!(matches!(rx.try_recv(), Ok(Action::StartTimer)));
        assert!(matches!(rx.try_recv(), Ok(Action::PauseTimer)));
        assert!(matches!(rx.try_recv(), Ok(Action::StopTimer)));
    }

    #[test]
    fn escape_in_form_cancels() {
        let (tx, _rx) = channel();
        let mut app = app();
        app.open_create_form();

        let outcome = handle_key(key(KeyCode::Esc), &mut app, &tx);
        assert_eq!(outcome, Some(FormOutcome::Cancel));
    }
}
