use crate::config::Theme;
use crate::flow::InteractionFlow;
use crate::model::{day_key, Todo};
use crate::selection::CalendarSelection;
use crate::tui::action::AppEvent;
use chrono::NaiveDate;
use ratatui::widgets::ListState;
use std::collections::HashSet;

#[derive(PartialEq, Clone, Copy)]
pub enum InputMode {
    Normal,
    Creating,
}

pub struct AppState {
    // Data snapshots, fed exclusively by AppEvents.
    pub day_todos: Vec<Todo>,
    pub dot_days: HashSet<String>,

    // UI State
    pub selection: CalendarSelection,
    pub flow: InteractionFlow,
    pub theme: Theme,
    pub list_state: ListState,
    pub mode: InputMode,
    pub message: String,
    pub loading: bool,

    // Input Buffer
    pub input_buffer: String,
    pub cursor_position: usize,
}

impl AppState {
    pub fn new(today: NaiveDate, theme: Theme) -> Self {
        Self {
            day_todos: vec![],
            dot_days: HashSet::new(),
            selection: CalendarSelection::new(today),
            flow: InteractionFlow::new(),
            theme,
            list_state: ListState::default(),
            mode: InputMode::Normal,
            message: "Loading...".to_string(),
            loading: true,
            input_buffer: String::new(),
            cursor_position: 0,
        }
    }

    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Status(s) => {
                self.message = s;
                self.loading = false;
            }
            AppEvent::Error(s) => {
                self.message = format!("Error: {}", s);
                self.loading = false;
            }
            AppEvent::DayLoaded { day, todos } => {
                // A snapshot for a day the user has since left is stale.
                if day == self.selection.selected_day {
                    self.day_todos = todos;
                    self.clamp_list_selection();
                    self.loading = false;
                }
            }
            AppEvent::DotDays(days) => {
                self.dot_days = days;
                self.loading = false;
            }
        }
    }

    pub fn has_dot(&self, day: NaiveDate) -> bool {
        self.dot_days.contains(&day_key(day))
    }

    pub fn get_selected_todo(&self) -> Option<&Todo> {
        self.list_state.selected().and_then(|idx| self.day_todos.get(idx))
    }

    fn clamp_list_selection(&mut self) {
        let len = self.day_todos.len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(len - 1)));
        }
    }

    // --- LIST NAVIGATION ---
    pub fn next_todo(&mut self) {
        if self.day_todos.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.day_todos.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_todo(&mut self) {
        if self.day_todos.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.day_todos.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    // --- INPUT HELPERS ---
    pub fn move_cursor_left(&mut self) {
        let moved = self.cursor_position.saturating_sub(1);
        self.cursor_position = self.clamp_cursor(moved);
    }

    pub fn move_cursor_right(&mut self) {
        let moved = self.cursor_position.saturating_add(1);
        self.cursor_position = self.clamp_cursor(moved);
    }

    pub fn enter_char(&mut self, new_char: char) {
        let byte_idx = self
            .input_buffer
            .char_indices()
            .map(|(i, _)| i)
            .nth(self.cursor_position)
            .unwrap_or(self.input_buffer.len());
        self.input_buffer.insert(byte_idx, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position != 0 {
            let current_index = self.cursor_position;
            let before = self.input_buffer.chars().take(current_index - 1);
            let after = self.input_buffer.chars().skip(current_index);
            self.input_buffer = before.chain(after).collect();
            self.move_cursor_left();
        }
    }

    pub fn reset_input(&mut self) {
        self.input_buffer.clear();
        self.cursor_position = 0;
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.clamp(0, self.input_buffer.chars().count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Importance;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn todo(id: i64, date: &str) -> Todo {
        Todo {
            id,
            title: format!("todo {}", id),
            description: String::new(),
            date: d(date),
            completed: false,
            priority: 0,
            importance: Importance::Low,
        }
    }

    #[test]
    fn test_day_snapshot_for_other_day_is_ignored() {
        let mut state = AppState::new(d("2024-03-15"), Theme::Light);
        state.apply_event(AppEvent::DayLoaded {
            day: d("2024-03-10"),
            todos: vec![todo(1, "2024-03-10")],
        });
        assert!(state.day_todos.is_empty());

        state.apply_event(AppEvent::DayLoaded {
            day: d("2024-03-15"),
            todos: vec![todo(2, "2024-03-15")],
        });
        assert_eq!(state.day_todos.len(), 1);
    }

    #[test]
    fn test_dot_presence_follows_snapshot() {
        let mut state = AppState::new(d("2024-03-15"), Theme::Light);
        assert!(!state.has_dot(d("2024-03-20")));

        let mut days = HashSet::new();
        days.insert("2024-03-20".to_string());
        state.apply_event(AppEvent::DotDays(days));

        assert!(state.has_dot(d("2024-03-20")));
        assert!(!state.has_dot(d("2024-03-21")));
    }

    #[test]
    fn test_list_selection_clamped_after_shrink() {
        let mut state = AppState::new(d("2024-03-15"), Theme::Light);
        state.apply_event(AppEvent::DayLoaded {
            day: d("2024-03-15"),
            todos: vec![todo(1, "2024-03-15"), todo(2, "2024-03-15"), todo(3, "2024-03-15")],
        });
        state.list_state.select(Some(2));

        state.apply_event(AppEvent::DayLoaded {
            day: d("2024-03-15"),
            todos: vec![todo(1, "2024-03-15")],
        });
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_navigation_wraps_and_survives_empty_list() {
        let mut state = AppState::new(d("2024-03-15"), Theme::Light);
        state.next_todo();
        state.previous_todo();
        assert_eq!(state.list_state.selected(), None);

        state.day_todos = vec![todo(1, "2024-03-15"), todo(2, "2024-03-15")];
        state.next_todo();
        assert_eq!(state.list_state.selected(), Some(0));
        state.next_todo();
        assert_eq!(state.list_state.selected(), Some(1));
        state.next_todo();
        assert_eq!(state.list_state.selected(), Some(0));
    }

    #[test]
    fn test_status_event_ends_loading() {
        let mut state = AppState::new(d("2024-03-15"), Theme::Light);
        assert!(state.loading);

        // A status-only outcome (e.g. cycling an id that is not cached under
        // the selected day) must not leave the list stuck on "Loading...".
        state.apply_event(AppEvent::Status("Nothing to cycle.".to_string()));
        assert!(!state.loading);
        assert_eq!(state.message, "Nothing to cycle.");
    }

    #[test]
    fn test_cursor_clamping() {
        let mut state = AppState::new(d("2024-03-15"), Theme::Light);
        state.input_buffer = "abc".to_string();
        state.cursor_position = 0;

        for _ in 0..5 {
            state.move_cursor_right();
        }
        assert_eq!(state.cursor_position, 3);

        for _ in 0..5 {
            state.move_cursor_left();
        }
        assert_eq!(state.cursor_position, 0);
    }
}
