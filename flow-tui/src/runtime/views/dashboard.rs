use crate::app::View;
use crossterm::event::{KeyCode, KeyEvent};

use super::super::action_queue::{Action, ActionTx};
use super::enqueue_action;

pub(super) fn handle_dashboard_key(key: KeyEvent, action_tx: &ActionTx) {
    if let KeyCode::Char('r') | KeyCode::Char('R') = key.code {
        enqueue_action(action_tx, Action::Reload(View::Dashboard));
    }
}
