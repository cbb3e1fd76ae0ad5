use crate::config::Theme;
use crate::flow::FlowState;
use crate::model::Importance;
use crate::selection::ViewMode;
use crate::tui::state::{AppState, InputMode};
use chrono::{Datelike, Local, NaiveDate};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Wrap,
        calendar::{CalendarEventStore, Monthly},
    },
};

/// Resolved colors for the active theme.
struct Palette {
    text: Color,
    dim: Color,
    accent: Color,
    dot: Color,
    danger: Color,
    warn: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                text: Color::Black,
                dim: Color::DarkGray,
                accent: Color::Blue,
                dot: Color::Magenta,
                danger: Color::Red,
                warn: Color::Yellow,
            },
            Theme::Dark => Palette {
                text: Color::White,
                dim: Color::DarkGray,
                accent: Color::Cyan,
                dot: Color::Magenta,
                danger: Color::LightRed,
                warn: Color::Yellow,
            },
        }
    }
}

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let palette = Palette::for_theme(state.theme);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    match state.selection.view_mode {
        ViewMode::Month => {
            let h_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(26), Constraint::Min(0)])
                .split(v_chunks[0]);
            draw_month_panel(f, state, &palette, h_chunks[0]);
            draw_todo_list(f, state, &palette, h_chunks[1]);
        }
        ViewMode::Year => {
            let h_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(v_chunks[0]);
            draw_year_panel(f, state, &palette, h_chunks[0]);
            draw_todo_list(f, state, &palette, h_chunks[1]);
        }
    }

    draw_footer(f, state, &palette, v_chunks[1]);
    draw_flow_popup(f, state, &palette);
}

/// The calendar widget works with `time` dates; the rest of the app uses
/// chrono. chrono reaches years the `time` crate cannot represent, so dates
/// past either end saturate instead of panicking.
fn to_time_date(d: NaiveDate) -> time::Date {
    let converted = time::Month::try_from(d.month() as u8)
        .ok()
        .and_then(|month| time::Date::from_calendar_date(d.year(), month, d.day() as u8).ok());
    match converted {
        Some(date) => date,
        None if d.year() < 0 => time::Date::MIN,
        None => time::Date::MAX,
    }
}

fn event_store(state: &AppState, palette: &Palette, anchor: NaiveDate) -> CalendarEventStore {
    let today = Local::now().date_naive();
    let mut events = CalendarEventStore::default();
    if today.year() == anchor.year() && today.month() == anchor.month() {
        events.add(
            to_time_date(today),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::UNDERLINED),
        );
    }

    let mut day = anchor.with_day(1).unwrap();
    while day.month() == anchor.month() {
        if state.has_dot(day) {
            events.add(
                to_time_date(day),
                Style::default()
                    .fg(palette.dot)
                    .add_modifier(Modifier::BOLD),
            );
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    let selected = state.selection.selected_day;
    if selected.year() == anchor.year() && selected.month() == anchor.month() {
        events.add(
            to_time_date(selected),
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .add_modifier(Modifier::BOLD),
        );
    }
    events
}

fn draw_month_panel(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let anchor = state.selection.panel_month;
    let calendar = Monthly::new(to_time_date(anchor), event_store(state, palette, anchor))
        .show_month_header(Style::default().add_modifier(Modifier::BOLD))
        .show_weekdays_header(Style::default().fg(palette.dim))
        .default_style(Style::default().fg(palette.text));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Calendar ")
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(calendar, inner);
}

fn draw_year_panel(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let year = state.selection.panel_year();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", year))
        .border_style(Style::default().fg(palette.accent));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(inner);

    for (row_idx, row) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); 3])
            .split(*row);
        for (col_idx, col) in cols.iter().enumerate() {
            let month = (row_idx * 3 + col_idx + 1) as u32;
            let anchor = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
            let header = if month == state.selection.panel_month.month() {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.dim)
            };
            let calendar = Monthly::new(to_time_date(anchor), event_store(state, palette, anchor))
                .show_month_header(header)
                .default_style(Style::default().fg(palette.text));
            f.render_widget(calendar, *col);
        }
    }
}

fn draw_todo_list(f: &mut Frame, state: &mut AppState, palette: &Palette, area: Rect) {
    let items: Vec<ListItem> = state
        .day_todos
        .iter()
        .map(|t| {
            let style = match t.importance {
                Importance::High => Style::default().fg(palette.danger),
                Importance::Middle => Style::default().fg(palette.warn),
                Importance::Low => Style::default().fg(palette.text),
            };
            let style = if t.completed {
                style.add_modifier(Modifier::CROSSED_OUT).fg(palette.dim)
            } else {
                style
            };
            let checkbox = if t.completed { "[x]" } else { "[ ]" };
            let line = format!("{} {} ({})", checkbox, t.title, t.importance.as_str());
            ListItem::new(Line::from(vec![Span::styled(line, style)]))
        })
        .collect();

    let title = if state.loading {
        " Todos (Loading...) ".to_string()
    } else {
        format!(
            " {} ({}) ",
            state.selection.selected_day.format("%Y-%m-%d"),
            state.day_todos.len()
        )
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(palette.accent),
        );
    f.render_stateful_widget(list, area, &mut state.list_state);
}

fn draw_footer(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    match state.mode {
        InputMode::Creating => {
            let input = Paragraph::new(format!("> {}", state.input_buffer))
                .style(Style::default().fg(palette.warn))
                .block(Block::default().borders(Borders::ALL).title(" New Todo "));
            f.render_widget(input, area);
            let cursor_x = area.x + 3 + state.cursor_position as u16;
            let cursor_y = area.y + 1;
            f.set_cursor_position((cursor_x, cursor_y));
        }
        InputMode::Normal => {
            let f_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            let status = Paragraph::new(state.message.clone())
                .style(Style::default().fg(palette.accent))
                .block(
                    Block::default()
                        .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                        .title(" Status "),
                );
            let help = Paragraph::new(
                "a:Add | Space:Done | i:Importance | d:Del | n/p:Month | v:Year | t:Today | q:Quit",
            )
            .style(Style::default().fg(palette.dim))
            .alignment(Alignment::Right)
            .block(
                Block::default()
                    .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                    .title(" Keys "),
            );
            f.render_widget(status, f_chunks[0]);
            f.render_widget(help, f_chunks[1]);
        }
    }
}

fn draw_flow_popup(f: &mut Frame, state: &AppState, palette: &Palette) {
    match state.flow.state() {
        FlowState::Idle => {}
        FlowState::ConfirmingDelete { todo_id } => {
            let title = state
                .day_todos
                .iter()
                .find(|t| t.id == todo_id)
                .map(|t| t.title.clone())
                .unwrap_or_else(|| format!("#{}", todo_id));
            let text = format!(
                "Delete \"{}\"?\n\nEnter: confirm    Esc: cancel",
                title
            );
            render_popup(f, palette.danger, " Confirm ", &text);
        }
        FlowState::WarningEmptyInput => {
            render_popup(
                f,
                palette.warn,
                " Warning ",
                "The title cannot be empty.\n\nEnter: ok",
            );
        }
    }
}

fn render_popup(f: &mut Frame, border: Color, title: &str, text: &str) {
    let area = centered_rect(40, 20, f.area());
    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(border)),
        );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

/// Helper function to create a centered rect using up certain percentages of the available rect.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
