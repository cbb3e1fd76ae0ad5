use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Three-level priority cycled by repeated user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    #[default]
    Low,
    Middle,
    High,
}

impl Importance {
    /// low -> middle -> high -> low
    pub fn next(self) -> Self {
        match self {
            Importance::Low => Importance::Middle,
            Importance::Middle => Importance::High,
            Importance::High => Importance::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Importance::Low => "low",
            Importance::Middle => "middle",
            Importance::High => "high",
        }
    }
}

/// A single task record as exchanged with the backend.
///
/// `id` is assigned by the backend only; `date` never changes on this side
/// (there is no reschedule operation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub importance: Importance,
}

impl Todo {
    pub fn day_key(&self) -> String {
        day_key(self.date)
    }
}

/// The store's partition key: the calendar date as `YYYY-MM-DD`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// First and last day of the month containing `anchor`, inclusive.
pub fn month_bounds(anchor: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = anchor.with_day(1).unwrap();
    let last = first + Months::new(1) - chrono::Duration::days(1);
    (first, last)
}
