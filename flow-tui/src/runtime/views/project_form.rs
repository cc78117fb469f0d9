use crate::app::{App, FormField, FormOutcome};
use crate::time_utils::today;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::is_ctrl;

pub(super) fn handle_project_form_key(key: KeyEvent, app: &mut App) -> Option<FormOutcome> {
    let Some(form) = app.form.as_mut() else {
        return None;
    };
    if key.code == KeyCode::Esc {
        return Some(FormOutcome::Cancel);
    }
    if form.submitting {
        return None;
    }

    if is_ctrl(&key, 's') {
        return submit(app);
    }
    if is_ctrl(&key, 'x') {
        form.remove_last();
        return None;
    }

    let today = today();
    match key.code {
        KeyCode::Tab => form.focus_next(),
        KeyCode::BackTab => form.focus_previous(),
        KeyCode::Up => form.step(1, today),
        KeyCode::Down => form.step(-1, today),
        KeyCode::Left => match form.focused {
            FormField::Priority | FormField::Status => form.step(-1, today),
            _ => {
                if let Some(date) = form.focused_date() {
                    date.previous_part();
                } else if let Some(input) = form.focused_input() {
                    input.move_left();
                }
            }
        },
        KeyCode::Right => match form.focused {
            FormField::Priority | FormField::Status => form.step(1, today),
            _ => {
                if let Some(date) = form.focused_date() {
                    date.next_part();
                } else if let Some(input) = form.focused_input() {
                    input.move_right();
                }
            }
        },
        KeyCode::Enter => match form.focused {
            FormField::Tags => {
                form.add_tag();
            }
            FormField::TeamMembers => {
                form.add_team_member();
            }
            FormField::Attachments => {
                if let Err(e) = form.stage_attachment() {
                    tracing::warn!(error = %e, "attachment not staged");
                    app.notify_error(e.to_string());
                }
            }
            FormField::Submit => return submit(app),
            _ => form.focus_next(),
        },
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.input_char(c, today);
        }
        _ => {}
    }
    None
}

fn submit(app: &mut App) -> Option<FormOutcome> {
    if app.form.as_ref()?.details_pending() {
        app.notify_info("Project details are still loading");
        return None;
    }
    let outcome = app.form.as_mut()?.submit();
    if outcome.is_none() {
        app.notify_error("Fix the highlighted fields before saving");
    }
    outcome
}
