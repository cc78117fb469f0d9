use crate::app::{App, TextInput, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_clients_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if let Some(input) = app.clients.new_client.as_mut() {
        match key.code {
            KeyCode::Enter => {
                if input.is_blank() {
                    app.notify_error("Client name is required");
                } else {
                    let name = input.trimmed().to_string();
                    enqueue_action(action_tx, Action::CreateClient(name));
                }
            }
            KeyCode::Esc => app.clients.new_client = None,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            _ => {}
        }
        return;
    }

    if let Some(id) = app.clients.pending_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                enqueue_action(action_tx, Action::DeleteClient(id));
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.clients.pending_delete = None;
            }
            _ => {}
        }
        return;
    }

    let list = &mut app.clients.list;
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => list.select_next(),
        KeyCode::Up | KeyCode::Char('k') => list.select_previous(),
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.clients.new_client = Some(TextInput::new());
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.clients.pending_delete = list.selected_item().map(|c| c.id);
        }
        KeyCode::Char('n') => {
            list.next_page();
            enqueue_action(action_tx, Action::Reload(View::Clients));
        }
        KeyCode::Char('p') => {
            if list.previous_page() {
                enqueue_action(action_tx, Action::Reload(View::Clients));
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::Reload(View::Clients));
        }
        _ => {}
    }
}
