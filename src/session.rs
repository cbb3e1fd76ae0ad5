use crate::client::{ClientResult, TodoClient};
use crate::model::{day_key, month_bounds, Importance, Todo};
use crate::store::TodoStore;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 256;

/// Result of an add attempt. An empty (trimmed) or overlong title is rejected
/// locally and never reaches the network.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    EmptyTitle,
    TitleTooLong,
    Added(Todo),
}

/// The todo cache plus the remote client that keeps it in sync.
///
/// Mutations are applied to the cache only after the backend confirms, so a
/// failed call leaves local state at its pre-call value with nothing to roll
/// back. Concurrent refreshes are last-response-wins; acceptable for a
/// single-user, single-tab session.
pub struct TodoSession {
    client: TodoClient,
    store: TodoStore,
    // Uploaded-image URL per day, held client-side only until the next add.
    pending_uploads: HashMap<String, String>,
}

impl TodoSession {
    pub fn new(client: TodoClient) -> Self {
        Self {
            client,
            store: TodoStore::new(),
            pending_uploads: HashMap::new(),
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Fetch the whole month containing `anchor` and replace the entire
    /// cache with the grouped result. Days outside the window are dropped.
    pub async fn refresh_month(&mut self, anchor: NaiveDate) -> ClientResult<()> {
        let (first, last) = month_bounds(anchor);
        let todos = self.client.list_range(first, last).await?;
        self.store.replace_all(todos);
        Ok(())
    }

    /// Refetch a single day, replacing only that day's entry.
    pub async fn refresh_day(&mut self, day: NaiveDate) -> ClientResult<()> {
        let todos = self.client.list_day(day).await?;
        self.store.replace_day(day, todos);
        Ok(())
    }

    /// Validate and create. The backend-assigned todo is appended to its
    /// day's sequence. The day's pending upload is dropped without being
    /// sent; the create request never carries it.
    pub async fn add(&mut self, day: NaiveDate, title: &str) -> ClientResult<AddOutcome> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(AddOutcome::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Ok(AddOutcome::TitleTooLong);
        }
        let todo = self.client.create(title, day).await?;
        self.pending_uploads.remove(&day_key(day));
        self.store.append(todo.clone());
        Ok(AddOutcome::Added(todo))
    }

    /// Delete, then resynchronize the selected day from the backend rather
    /// than removing the item pre-emptively.
    pub async fn delete(&mut self, id: i64, selected_day: NaiveDate) -> ClientResult<()> {
        self.client.remove(id).await?;
        self.refresh_day(selected_day).await
    }

    /// Toggle server-side, then file the returned record under the day the
    /// backend says it belongs to.
    pub async fn toggle_completed(&mut self, id: i64) -> ClientResult<Todo> {
        let updated = self.client.toggle_completed(id).await?;
        self.store.apply_toggled(updated.clone());
        Ok(updated)
    }

    /// Advance importance one step (low -> middle -> high -> low).
    ///
    /// The current value is looked up under `selected_day` only; an id cached
    /// under some other day cannot be cycled through this path. That case is
    /// logged and swallowed, returning `Ok(None)`.
    pub async fn cycle_importance(
        &mut self,
        id: i64,
        selected_day: NaiveDate,
    ) -> ClientResult<Option<Importance>> {
        let Some(current) = self.store.importance_of(selected_day, id) else {
            log::warn!(
                "cycle_importance: todo {} not cached under {}, ignoring",
                id,
                day_key(selected_day)
            );
            return Ok(None);
        };
        let next = current.next();
        self.client.set_importance(id, next).await?;
        self.store.patch_importance(selected_day, id, next);
        Ok(Some(next))
    }

    /// Upload a file and remember its URL for `day` until the next add.
    /// The association is held client-side only and never reaches the
    /// backend.
    pub async fn upload_attachment(
        &mut self,
        day: NaiveDate,
        filename: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<String> {
        let url = self.client.upload(filename, bytes).await?;
        self.pending_uploads.insert(day_key(day), url.clone());
        Ok(url)
    }

    pub fn pending_upload(&self, day: NaiveDate) -> Option<&str> {
        self.pending_uploads.get(&day_key(day)).map(String::as_str)
    }
}
