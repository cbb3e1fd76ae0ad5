use crate::model::{day_key, Importance, Todo};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Per-session cache of todos, keyed by day.
///
/// The backend is authoritative; this copy may be stale until the next fetch.
/// Order within a day follows backend response order.
#[derive(Debug, Clone, Default)]
pub struct TodoStore {
    days: HashMap<String, Vec<Todo>>,
}

impl TodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full replace: drops every cached day and regroups `todos` by date.
    /// Used when a whole month window is (re)fetched.
    pub fn replace_all(&mut self, todos: Vec<Todo>) {
        self.days.clear();
        for todo in todos {
            self.days.entry(todo.day_key()).or_default().push(todo);
        }
    }

    /// Replace a single day's sequence, leaving the rest of the cache alone.
    pub fn replace_day(&mut self, day: NaiveDate, todos: Vec<Todo>) {
        if todos.is_empty() {
            self.days.remove(&day_key(day));
        } else {
            self.days.insert(day_key(day), todos);
        }
    }

    /// Append a freshly created todo to its day, keyed by the todo's own date.
    pub fn append(&mut self, todo: Todo) {
        self.days.entry(todo.day_key()).or_default().push(todo);
    }

    /// Apply a toggle result. Placement is derived from the *returned* todo's
    /// date, not the day the caller acted on, so a server-side re-date cannot
    /// leave the item filed under the wrong day.
    pub fn apply_toggled(&mut self, updated: Todo) {
        let key = updated.day_key();
        if let Some(list) = self.days.get_mut(&key) {
            if let Some(slot) = list.iter_mut().find(|t| t.id == updated.id) {
                *slot = updated;
                return;
            }
        }
        // Re-dated server-side: drop the stale copy wherever it was cached.
        for list in self.days.values_mut() {
            list.retain(|t| t.id != updated.id);
        }
        self.days.retain(|_, list| !list.is_empty());
        self.days.entry(key).or_default().push(updated);
    }

    /// Importance of `id` as cached under `day`. The lookup is deliberately
    /// not global: cycling importance only works for the selected day.
    pub fn importance_of(&self, day: NaiveDate, id: i64) -> Option<Importance> {
        self.days
            .get(&day_key(day))?
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.importance)
    }

    /// Patch the cached copy after the backend accepted a new importance.
    pub fn patch_importance(&mut self, day: NaiveDate, id: i64, importance: Importance) -> bool {
        if let Some(list) = self.days.get_mut(&day_key(day)) {
            if let Some(todo) = list.iter_mut().find(|t| t.id == id) {
                todo.importance = importance;
                return true;
            }
        }
        false
    }

    pub fn remove(&mut self, day: NaiveDate, id: i64) {
        if let Some(list) = self.days.get_mut(&day_key(day)) {
            list.retain(|t| t.id != id);
            if list.is_empty() {
                self.days.remove(&day_key(day));
            }
        }
    }

    pub fn todos_for(&self, day: NaiveDate) -> &[Todo] {
        self.days.get(&day_key(day)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the calendar should show a presence dot for `day`.
    pub fn has_todos(&self, day: NaiveDate) -> bool {
        !self.todos_for(day).is_empty()
    }

    /// Day-keys of every non-empty cached day.
    pub fn days_with_todos(&self) -> Vec<String> {
        self.days
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.days.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn todo(id: i64, title: &str, date: &str) -> Todo {
        Todo {
            id,
            title: title.to_string(),
            description: String::new(),
            date: d(date),
            completed: false,
            priority: 0,
            importance: Importance::Low,
        }
    }

    #[test]
    fn test_replace_all_groups_by_day_and_drops_stale_days() {
        let mut store = TodoStore::new();
        store.replace_day(d("2024-02-28"), vec![todo(1, "Old", "2024-02-28")]);

        store.replace_all(vec![
            todo(2, "A", "2024-03-15"),
            todo(3, "B", "2024-03-15"),
            todo(4, "C", "2024-03-20"),
        ]);

        assert_eq!(store.todos_for(d("2024-03-15")).len(), 2);
        assert_eq!(store.todos_for(d("2024-03-20")).len(), 1);
        // Day outside the new window is gone, not merged.
        assert!(!store.has_todos(d("2024-02-28")));
    }

    #[test]
    fn test_presence_dot_follows_cache_content() {
        let mut store = TodoStore::new();
        assert!(!store.has_todos(d("2024-03-15")));

        store.append(todo(1, "Buy milk", "2024-03-15"));
        assert!(store.has_todos(d("2024-03-15")));

        store.remove(d("2024-03-15"), 1);
        assert!(!store.has_todos(d("2024-03-15")));
    }

    #[test]
    fn test_apply_toggled_replaces_in_place() {
        let mut store = TodoStore::new();
        store.append(todo(1, "A", "2024-03-15"));
        store.append(todo(2, "B", "2024-03-15"));

        let mut updated = todo(1, "A", "2024-03-15");
        updated.completed = true;
        store.apply_toggled(updated);

        let list = store.todos_for(d("2024-03-15"));
        assert_eq!(list.len(), 2);
        assert!(list[0].completed);
        assert!(!list[1].completed);
    }

    #[test]
    fn test_apply_toggled_relocates_redated_todo() {
        let mut store = TodoStore::new();
        store.append(todo(1, "A", "2024-03-15"));

        let mut updated = todo(1, "A", "2024-03-16");
        updated.completed = true;
        store.apply_toggled(updated);

        assert!(!store.has_todos(d("2024-03-15")));
        assert_eq!(store.todos_for(d("2024-03-16"))[0].id, 1);
    }

    #[test]
    fn test_importance_lookup_is_per_day_not_global() {
        let mut store = TodoStore::new();
        store.append(todo(1, "Elsewhere", "2024-03-10"));

        // The todo exists, but not under the queried day.
        assert_eq!(store.importance_of(d("2024-03-15"), 1), None);
        assert_eq!(store.importance_of(d("2024-03-10"), 1), Some(Importance::Low));
    }

    #[test]
    fn test_patch_importance_touches_only_the_target() {
        let mut store = TodoStore::new();
        store.append(todo(1, "low one", "2024-03-15"));
        let mut high = todo(2, "high one", "2024-03-15");
        high.importance = Importance::High;
        store.append(high);

        assert!(store.patch_importance(d("2024-03-15"), 1, Importance::Middle));

        let list = store.todos_for(d("2024-03-15"));
        assert_eq!(list[0].importance, Importance::Middle);
        assert_eq!(list[1].importance, Importance::High);
    }

    #[test]
    fn test_replace_day_with_empty_clears_entry() {
        let mut store = TodoStore::new();
        store.append(todo(1, "A", "2024-03-15"));
        store.replace_day(d("2024-03-15"), vec![]);
        assert!(!store.has_todos(d("2024-03-15")));
        assert!(store.days_with_todos().is_empty());
    }
}
