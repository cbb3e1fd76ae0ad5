use crate::model::month_bounds;
use chrono::{Datelike, Months, NaiveDate};

/// The calendar widget's paging granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Month,
    Year,
}

/// Which month is paged into view and which day is selected.
///
/// The selected day's month need not equal the panel month: clicking a day
/// and paging the panel are independent, except for the arrow-button paging
/// below which re-anchors the selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarSelection {
    pub panel_month: NaiveDate,
    pub selected_day: NaiveDate,
    pub view_mode: ViewMode,
}

impl CalendarSelection {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            panel_month: today,
            selected_day: today,
            view_mode: ViewMode::Month,
        }
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = day;
    }

    /// Month/year tab change in the widget: moves the panel without touching
    /// the selected day.
    pub fn change_panel(&mut self, anchor: NaiveDate, mode: ViewMode) {
        self.panel_month = anchor;
        self.view_mode = mode;
    }

    pub fn go_to_today(&mut self, today: NaiveDate) {
        self.panel_month = today;
        self.selected_day = today;
        self.view_mode = ViewMode::Month;
    }

    /// Arrow-button paging. The selection is forced onto the new panel
    /// anchor, collapsing whatever day-of-month was selected before.
    pub fn next_month(&mut self) {
        self.panel_month = self.panel_month + Months::new(1);
        self.selected_day = self.panel_month;
    }

    pub fn previous_month(&mut self) {
        self.panel_month = self.panel_month - Months::new(1);
        self.selected_day = self.panel_month;
    }

    pub fn next_year(&mut self) {
        self.panel_month = self.panel_month + Months::new(12);
        self.selected_day = self.panel_month;
    }

    pub fn previous_year(&mut self) {
        self.panel_month = self.panel_month - Months::new(12);
        self.selected_day = self.panel_month;
    }

    /// Inclusive first/last day of the visible month.
    pub fn month_range(&self) -> (NaiveDate, NaiveDate) {
        month_bounds(self.panel_month)
    }

    pub fn panel_year(&self) -> i32 {
        self.panel_month.year()
    }
}
