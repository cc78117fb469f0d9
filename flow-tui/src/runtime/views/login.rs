use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_login_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.login.submitting {
        return;
    }
    match key.code {
        KeyCode::Enter => {
            enqueue_action(
                action_tx,
                Action::SignIn {
                    token: app.login.token.value.clone(),
                },
            );
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.token.clear();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.login.token.insert(c);
        }
        KeyCode::Backspace => app.login.token.backspace(),
        KeyCode::Left => app.login.token.move_left(),
        KeyCode::Right => app.login.token.move_right(),
        KeyCode::Home => app.login.token.home(),
        KeyCode::End => app.login.token.end(),
        _ => {}
    }
}
