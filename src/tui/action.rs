use crate::model::Todo;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Requests sent from the UI loop to the network worker.
#[derive(Debug)]
pub enum Action {
    LoadMonth { anchor: NaiveDate, selected: NaiveDate },
    LoadDay(NaiveDate),
    Add { day: NaiveDate, title: String },
    Delete { id: i64, day: NaiveDate },
    Toggle { id: i64, day: NaiveDate },
    CycleImportance { id: i64, day: NaiveDate },
    Quit,
}

/// Notifications flowing back to the UI. Every cache mutation is announced
/// through these; the views never reach into the session directly.
#[derive(Debug)]
pub enum AppEvent {
    /// Fresh snapshot of one day's sequence.
    DayLoaded { day: NaiveDate, todos: Vec<Todo> },
    /// Day-keys that currently have at least one todo (drives the dots).
    DotDays(HashSet<String>),
    Status(String),
    Error(String),
}
