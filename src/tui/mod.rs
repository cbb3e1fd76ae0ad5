pub mod action;
pub mod handlers;
pub mod state;
pub mod view;

use crate::client::TodoClient;
use crate::config::Config;
use crate::session::{AddOutcome, TodoSession};

use action::{Action, AppEvent};
use state::AppState;
use view::draw;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration, time::Instant};
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: taskmate [OPTIONS]");
        println!();
        println!("Configuration is read from:");
        println!(
            "  {}",
            Config::get_path_string().unwrap_or_else(|_| "[unknown]".to_string())
        );
        return Ok(());
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("taskmate_panic.log")
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    // Missing config is fine; every field has a usable default.
    let config = Config::load().unwrap_or_default();
    let today = Local::now().date_naive();

    // --- TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(today, config.theme);

    let (action_tx, mut action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- NETWORK WORKER ---
    // Owns the session. The UI only ever sees snapshots carried by AppEvents.
    let base_url = config.base_url.clone();
    tokio::spawn(async move {
        let mut session = TodoSession::new(TodoClient::new(&base_url));

        let _ = event_tx
            .send(AppEvent::Status("Loading...".to_string()))
            .await;
        refresh_month(&mut session, &event_tx, today, today).await;

        while let Some(action) = action_rx.recv().await {
            match action {
                Action::Quit => break,

                Action::LoadMonth { anchor, selected } => {
                    refresh_month(&mut session, &event_tx, anchor, selected).await;
                }

                Action::LoadDay(day) => {
                    match session.refresh_day(day).await {
                        Ok(()) => send_day(&session, &event_tx, day).await,
                        Err(e) => {
                            log::error!("day refresh failed: {}", e);
                            let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                        }
                    }
                    send_dots(&session, &event_tx).await;
                }

                Action::Add { day, title } => match session.add(day, &title).await {
                    Ok(AddOutcome::Added(_)) => {
                        let _ = event_tx.send(AppEvent::Status("Added.".to_string())).await;
                        send_day(&session, &event_tx, day).await;
                        send_dots(&session, &event_tx).await;
                    }
                    Ok(AddOutcome::EmptyTitle) => {
                        // The UI rejects blank titles before sending; kept as
                        // a second line of defense.
                        let _ = event_tx
                            .send(AppEvent::Status("Title cannot be empty.".to_string()))
                            .await;
                    }
                    Ok(AddOutcome::TitleTooLong) => {
                        let _ = event_tx
                            .send(AppEvent::Status(format!(
                                "Title is limited to {} characters.",
                                crate::session::MAX_TITLE_LEN
                            )))
                            .await;
                    }
                    Err(e) => {
                        log::error!("add failed: {}", e);
                        let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                    }
                },

                Action::Delete { id, day } => match session.delete(id, day).await {
                    Ok(()) => {
                        let _ = event_tx
                            .send(AppEvent::Status("Deleted.".to_string()))
                            .await;
                        send_day(&session, &event_tx, day).await;
                        send_dots(&session, &event_tx).await;
                    }
                    Err(e) => {
                        log::error!("delete failed: {}", e);
                        let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                    }
                },

                Action::Toggle { id, day } => match session.toggle_completed(id).await {
                    Ok(_) => {
                        let _ = event_tx.send(AppEvent::Status("Saved.".to_string())).await;
                        send_day(&session, &event_tx, day).await;
                        send_dots(&session, &event_tx).await;
                    }
                    Err(e) => {
                        log::error!("toggle failed: {}", e);
                        let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                    }
                },

                Action::CycleImportance { id, day } => {
                    match session.cycle_importance(id, day).await {
                        Ok(Some(next)) => {
                            let _ = event_tx
                                .send(AppEvent::Status(format!("Importance: {}", next.as_str())))
                                .await;
                            send_day(&session, &event_tx, day).await;
                        }
                        Ok(None) => {
                            let _ = event_tx
                                .send(AppEvent::Status("Nothing to cycle.".to_string()))
                                .await;
                        }
                        Err(e) => {
                            log::error!("importance cycle failed: {}", e);
                            let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
                        }
                    }
                }
            }
        }
    });

    // --- UI LOOP ---
    loop {
        terminal.draw(|f| draw(f, &mut app_state))?;

        if let Ok(event) = event_rx.try_recv() {
            app_state.apply_event(event);
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollDown => app_state.next_todo(),
                    MouseEventKind::ScrollUp => app_state.previous_todo(),
                    _ => {}
                },
                Event::Key(key) => {
                    if let Some(action) = handlers::handle_key(&mut app_state, key, Instant::now())
                    {
                        let quitting = matches!(action, Action::Quit);
                        app_state.loading = !quitting;
                        let _ = action_tx.send(action).await;
                        if quitting {
                            break;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

async fn refresh_month(
    session: &mut TodoSession,
    event_tx: &mpsc::Sender<AppEvent>,
    anchor: NaiveDate,
    selected: NaiveDate,
) {
    match session.refresh_month(anchor).await {
        Ok(()) => {
            let _ = event_tx.send(AppEvent::Status("Ready.".to_string())).await;
            send_day(session, event_tx, selected).await;
            send_dots(session, event_tx).await;
        }
        Err(e) => {
            log::error!("month refresh failed: {}", e);
            let _ = event_tx.send(AppEvent::Error(e.to_string())).await;
        }
    }
}

async fn send_day(session: &TodoSession, event_tx: &mpsc::Sender<AppEvent>, day: NaiveDate) {
    let todos = session.store().todos_for(day).to_vec();
    let _ = event_tx.send(AppEvent::DayLoaded { day, todos }).await;
}

async fn send_dots(session: &TodoSession, event_tx: &mpsc::Sender<AppEvent>) {
    let days = session.store().days_with_todos().into_iter().collect();
    let _ = event_tx.send(AppEvent::DotDays(days)).await;
}
