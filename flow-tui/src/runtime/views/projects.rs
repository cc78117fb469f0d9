use crate::app::{App, View};
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_projects_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if let Some(id) = app.projects.pending_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                enqueue_action(action_tx, Action::DeleteProject(id));
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.projects.pending_delete = None;
            }
            _ => {}
        }
        return;
    }

    let list = &mut app.projects.list;
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => list.select_next(),
        KeyCode::Up | KeyCode::Char('k') => list.select_previous(),
        KeyCode::Char('a') | KeyCode::Char('A') => enqueue_action(action_tx, Action::NewProject),
        KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
            if let Some(project) = list.selected_item() {
                enqueue_action(action_tx, Action::EditProject(project.id));
            }
        }
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
            app.projects.pending_delete = list.selected_item().map(|p| p.id);
        }
        KeyCode::Char('n') => {
            list.next_page();
            enqueue_action(action_tx, Action::Reload(View::Projects));
        }
        KeyCode::Char('p') => {
            if list.previous_page() {
                enqueue_action(action_tx, Action::Reload(View::Projects));
            }
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            enqueue_action(action_tx, Action::Reload(View::Projects));
        }
        _ => {}
    }
}
