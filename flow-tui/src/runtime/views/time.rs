use crate::app::{App, TimeFocus, View};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::super::action_queue::{Action, ActionTx};
use super::{enqueue_action, is_ctrl};

pub(super) fn handle_time_key(key: KeyEvent, app: &mut App, action_tx: &ActionTx) {
    if app.time.picker.is_some() {
        handle_picker_key(key, app);
        return;
    }

    if let Some(id) = app.time.pending_delete {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                enqueue_action(action_tx, Action::DeleteTimeEntry(id));
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.time.pending_delete = None;
            }
            _ => {}
        }
        return;
    }

    // Timer controls work from every field.
    if is_ctrl(&key, 's') {
        enqueue_action(action_tx, Action::StartTimer);
        return;
    }
    if is_ctrl(&key, 'p') {
        enqueue_action(action_tx, Action::PauseTimer);
        return;
    }
    if is_ctrl(&key, 'x') {
        enqueue_action(action_tx, Action::StopTimer);
        return;
    }
    if is_ctrl(&key, 'r') {
        enqueue_action(action_tx, Action::ResetTimer);
        return;
    }

    match key.code {
        KeyCode::Tab => {
            app.time_focus_next();
            return;
        }
        KeyCode::BackTab => {
            app.time_focus_previous();
            return;
        }
        _ => {}
    }

    match app.time.focus {
        TimeFocus::Project => {
            if key.code == KeyCode::Enter {
                app.open_project_picker();
            }
        }
        TimeFocus::Task | TimeFocus::Description => match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.timer_input_char(c);
            }
            KeyCode::Backspace => app.timer_input_backspace(),
            KeyCode::Left => {
                if let Some(input) = app.timer_input() {
                    input.move_left();
                }
            }
            KeyCode::Right => {
                if let Some(input) = app.timer_input() {
                    input.move_right();
                }
            }
            KeyCode::Enter => app.time_focus_next(),
            KeyCode::Esc => app.time.focus = TimeFocus::Entries,
            _ => {}
        },
        TimeFocus::Entries => {
            let entries = &mut app.time.entries;
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => entries.select_next(),
                KeyCode::Up | KeyCode::Char('k') => entries.select_previous(),
                KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                    app.time.pending_delete = entries.selected_item().and_then(|e| e.id);
                }
                KeyCode::Char('n') => {
                    entries.next_page();
                    enqueue_action(action_tx, Action::Reload(View::Time));
                }
                KeyCode::Char('p') => {
                    if entries.previous_page() {
                        enqueue_action(action_tx, Action::Reload(View::Time));
                    }
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    enqueue_action(action_tx, Action::Reload(View::Time));
                }
                _ => {}
            }
        }
    }
}

fn handle_picker_key(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.close_project_picker(),
        KeyCode::Enter => app.confirm_project_picker(),
        KeyCode::Down => app.picker_move(true),
        KeyCode::Up => app.picker_move(false),
        KeyCode::Backspace => app.picker_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.picker_input_char(c);
        }
        _ => {}
    }
}
