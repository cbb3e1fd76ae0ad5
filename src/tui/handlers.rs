use crate::flow::FlowState;
use crate::selection::ViewMode;
use crate::tui::action::Action;
use crate::tui::state::{AppState, InputMode};
use chrono::{Duration, Local};
use crossterm::event::{KeyCode, KeyEvent};
use std::time::Instant;

/// Translate one keypress into state changes and, possibly, a network action.
///
/// Modal states are handled first: while a confirmation or warning is open it
/// owns the keyboard, and it ignores everything inside the arm window so the
/// keypress that opened it cannot answer it.
pub fn handle_key(state: &mut AppState, key: KeyEvent, now: Instant) -> Option<Action> {
    if !state.flow.is_idle() {
        return handle_modal_key(state, key, now);
    }

    match state.mode {
        InputMode::Creating => handle_creating_key(state, key, now),
        InputMode::Normal => handle_normal_key(state, key, now),
    }
}

fn handle_modal_key(state: &mut AppState, key: KeyEvent, now: Instant) -> Option<Action> {
    if !state.flow.keys_armed(now) {
        return None;
    }
    match state.flow.state() {
        FlowState::ConfirmingDelete { .. } => match key.code {
            KeyCode::Enter => {
                let id = state.flow.confirm_delete()?;
                state.message = "Deleting...".to_string();
                Some(Action::Delete {
                    id,
                    day: state.selection.selected_day,
                })
            }
            KeyCode::Esc => {
                state.flow.cancel();
                state.message.clear();
                None
            }
            _ => None,
        },
        FlowState::WarningEmptyInput => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                state.flow.acknowledge_warning();
                None
            }
            _ => None,
        },
        FlowState::Idle => None,
    }
}

fn handle_creating_key(state: &mut AppState, key: KeyEvent, now: Instant) -> Option<Action> {
    match key.code {
        KeyCode::Enter => {
            let title = state.input_buffer.trim().to_string();
            if title.is_empty() {
                // Warn locally; no network call for blank titles.
                state.flow.warn_empty_input(now);
                return None;
            }
            state.mode = InputMode::Normal;
            state.reset_input();
            state.message = "Adding...".to_string();
            Some(Action::Add {
                day: state.selection.selected_day,
                title,
            })
        }
        KeyCode::Esc => {
            state.mode = InputMode::Normal;
            state.reset_input();
            None
        }
        KeyCode::Char(c) => {
            state.enter_char(c);
            None
        }
        KeyCode::Backspace => {
            state.delete_char();
            None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            None
        }
        _ => None,
    }
}

fn handle_normal_key(state: &mut AppState, key: KeyEvent, now: Instant) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),

        KeyCode::Char('a') => {
            state.mode = InputMode::Creating;
            state.reset_input();
            state.message = "New todo...".to_string();
            None
        }

        KeyCode::Char('r') => Some(load_month(state)),

        KeyCode::Char('t') => {
            state.selection.go_to_today(Local::now().date_naive());
            Some(load_month(state))
        }

        KeyCode::Char('n') | KeyCode::Char(']') => {
            match state.selection.view_mode {
                ViewMode::Year => state.selection.next_year(),
                ViewMode::Month => state.selection.next_month(),
            }
            Some(load_month(state))
        }
        KeyCode::Char('p') | KeyCode::Char('[') => {
            match state.selection.view_mode {
                ViewMode::Year => state.selection.previous_year(),
                ViewMode::Month => state.selection.previous_month(),
            }
            Some(load_month(state))
        }

        // In year view, Enter drops back into the month grid.
        KeyCode::Enter => {
            if state.selection.view_mode == ViewMode::Year {
                state.selection.change_panel(state.selection.panel_month, ViewMode::Month);
                Some(load_month(state))
            } else {
                None
            }
        }

        KeyCode::Char('v') | KeyCode::Char('y') => {
            let mode = match state.selection.view_mode {
                ViewMode::Month => ViewMode::Year,
                ViewMode::Year => ViewMode::Month,
            };
            state.selection.change_panel(state.selection.panel_month, mode);
            Some(load_month(state))
        }

        // Day-cell navigation; selecting a day refreshes it.
        KeyCode::Left => Some(shift_selected_day(state, Duration::days(-1))),
        KeyCode::Right => Some(shift_selected_day(state, Duration::days(1))),
        KeyCode::Up => Some(shift_selected_day(state, Duration::days(-7))),
        KeyCode::Down => Some(shift_selected_day(state, Duration::days(7))),

        KeyCode::Char('j') => {
            state.next_todo();
            None
        }
        KeyCode::Char('k') => {
            state.previous_todo();
            None
        }

        KeyCode::Char(' ') => {
            let id = state.get_selected_todo().map(|t| t.id)?;
            Some(Action::Toggle {
                id,
                day: state.selection.selected_day,
            })
        }

        KeyCode::Char('i') => {
            let id = state.get_selected_todo().map(|t| t.id)?;
            Some(Action::CycleImportance {
                id,
                day: state.selection.selected_day,
            })
        }

        KeyCode::Char('d') => {
            if let Some(todo) = state.get_selected_todo() {
                let id = todo.id;
                state.flow.request_delete(id, now);
            }
            None
        }

        _ => None,
    }
}

fn load_month(state: &AppState) -> Action {
    Action::LoadMonth {
        anchor: state.selection.panel_month,
        selected: state.selection.selected_day,
    }
}

fn shift_selected_day(state: &mut AppState, delta: Duration) -> Action {
    let day = state.selection.selected_day + delta;
    state.selection.select_day(day);
    Action::LoadDay(day)
}
