mod help;
mod state;

use crate::cli::{build_config, Cli};
use crate::lifecycle::{SubmitStatus, View, EMPTY_TEXT, LOADING_TEXT};
use crate::model::AppEvent;
use crate::orchestrator::{self, UiCommand};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use help::draw_help;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::{Focus, FormField, UiState};
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

pub async fn run(args: Cli) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel::<AppEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();
    let cfg = build_config(&args);
    info!(url = %cfg.movies_url(), shape = cfg.shape.as_str(), "starting tui");

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_state = UiState {
        store_url: cfg.movies_url(),
        shape: cfg.shape,
        ..Default::default()
    };
    let ui_handle = std::thread::spawn(move || run_threaded(ui_state, event_rx, cmd_tx));

    let res = orchestrator::run_controller(&cfg, args.fetch_on_launch, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut state: UiState,
    mut event_rx: UnboundedReceiver<AppEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend).context("create terminal") {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            let _ = cmd_tx.send(UiCommand::Quit);
            return Err(e);
        }
    };
    terminal.clear().ok();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        // Drain events without blocking to keep UI responsive.
        if !drain_events(&mut state, &mut event_rx) {
            debug!("controller stopped, leaving tui");
            let _ = cmd_tx.send(UiCommand::Quit);
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, k) {
                    KeyAction::None => {}
                    KeyAction::Send(cmd) => {
                        let _ = cmd_tx.send(cmd);
                    }
                    KeyAction::Quit => {
                        let _ = cmd_tx.send(UiCommand::Quit);
                        break Ok(());
                    }
                }
            }
        }
    };

    restore_terminal();
    res
}

fn restore_terminal() {
    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
}

/// Outcome of a single key press.
#[derive(Debug)]
enum KeyAction {
    None,
    Send(UiCommand),
    Quit,
}

fn handle_key(state: &mut UiState, k: KeyEvent) -> KeyAction {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }

    match state.focus {
        Focus::List => handle_list_key(state, k),
        Focus::Form => handle_form_key(state, k),
    }
}

fn handle_list_key(state: &mut UiState, k: KeyEvent) -> KeyAction {
    match k.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('f') | KeyCode::Char('r') => {
            state.tab = 0;
            KeyAction::Send(UiCommand::Refresh)
        }
        KeyCode::Char('a') | KeyCode::Char('i') => {
            state.tab = 0;
            state.focus = Focus::Form;
            KeyAction::None
        }
        KeyCode::Tab => {
            state.tab = (state.tab + 1) % 2;
            KeyAction::None
        }
        KeyCode::Char('?') => {
            state.tab = 1;
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

fn handle_form_key(state: &mut UiState, k: KeyEvent) -> KeyAction {
    match (k.modifiers, k.code) {
        (m, KeyCode::Char('s')) if m.contains(KeyModifiers::CONTROL) => submit_form(state),
        (_, KeyCode::Esc) => {
            state.focus = Focus::List;
            KeyAction::None
        }
        (_, KeyCode::Tab) | (_, KeyCode::Down) => {
            state.form.next_field();
            KeyAction::None
        }
        (_, KeyCode::BackTab) | (_, KeyCode::Up) => {
            state.form.prev_field();
            KeyAction::None
        }
        (_, KeyCode::Enter) => {
            if state.form.on_last_field() {
                submit_form(state)
            } else {
                state.form.next_field();
                KeyAction::None
            }
        }
        (_, KeyCode::Backspace) => {
            state.form.backspace();
            KeyAction::None
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
            state.form.push_char(c);
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Validate the form and hand the movie to the controller. The form is
/// cleared once a request is sent, whatever the outcome.
fn submit_form(state: &mut UiState) -> KeyAction {
    match state.form.validate() {
        Ok(movie) => {
            debug!(title = %movie.title, "submitting movie");
            state.form.reset();
            state.info.clear();
            KeyAction::Send(UiCommand::Submit(movie))
        }
        Err(msg) => {
            state.info = msg;
            KeyAction::None
        }
    }
}

/// Apply every pending event. Returns false once the controller has dropped its sender.
fn drain_events(state: &mut UiState, event_rx: &mut UnboundedReceiver<AppEvent>) -> bool {
    loop {
        match event_rx.try_recv() {
            Ok(ev) => apply_event(state, ev),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

fn apply_event(state: &mut UiState, ev: AppEvent) {
    match &ev {
        AppEvent::Info(msg) => state.info = msg.clone(),
        // The form was already cleared, so say what to re-enter.
        AppEvent::SubmitFailed { title, .. } => {
            state.info = format!("\"{title}\" was not saved; re-enter it to retry.")
        }
        _ => {}
    }
    state.app = std::mem::take(&mut state.app).apply(&ev);
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)].as_ref())
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Movies"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("movies-tui"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_movies(chunks[1], f, state),
        _ => draw_help(chunks[1], f, &state.store_url),
    }
}

fn draw_movies(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)].as_ref())
        .split(area);

    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(main[0]);

    draw_form(row[0], f, state);
    draw_content(row[1], f, state);
    draw_status(main[1], f, state);
}

fn draw_form(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let editing = state.focus == Focus::Form;
    let mut lines = Vec::new();
    for field in FormField::ALL {
        let active = editing && state.form.field == field;
        let label_style = if active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        let mut value = state.form.value(field).to_string();
        if active {
            value.push('▏');
        }
        lines.push(Line::from(vec![Span::raw("  "), Span::raw(value)]));
        lines.push(Line::from(""));
    }
    if editing {
        lines.push(Line::from(Span::styled(
            "enter: next/submit  ctrl-s: submit  esc: back",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("a", Style::default().fg(Color::Magenta)),
            Span::raw(" to add a movie"),
        ]));
    }

    let border = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Add Movie"),
        );
    f.render_widget(p, area);
}

fn draw_content(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let lines: Vec<Line<'static>> = match state.app.view() {
        View::Loading => vec![Line::from(LOADING_TEXT)],
        View::Error(msg) => vec![Line::from(Span::styled(
            msg.to_string(),
            Style::default().fg(Color::Red),
        ))],
        View::Empty => vec![Line::from(EMPTY_TEXT)],
        View::Movies(movies) => {
            let mut lines = Vec::with_capacity(movies.len() * 3);
            for m in movies {
                lines.push(Line::from(vec![
                    Span::styled(
                        m.title.clone(),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(m.release_date.clone(), Style::default().fg(Color::Gray)),
                ]));
                for l in m.opening_text.lines() {
                    lines.push(Line::from(l.trim_end().to_string()));
                }
                lines.push(Line::from(""));
            }
            lines
        }
    };

    let title = match state.app.movies().len() {
        0 => "Movies · f to fetch".to_string(),
        n => format!("Movies ({n}) · f to fetch"),
    };
    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Store: ", Style::default().fg(Color::Gray)),
        Span::raw(state.store_url.clone()),
        Span::styled(
            format!(" ({})", state.shape.as_str()),
            Style::default().fg(Color::DarkGray),
        ),
    ])];

    let submit = state.app.submit_status();
    if let Some(msg) = submit.to_message() {
        let color = match submit {
            SubmitStatus::Failed { .. } => Color::Red,
            SubmitStatus::Accepted { .. } => Color::Green,
            _ => Color::Yellow,
        };
        lines.push(Line::from(Span::styled(msg, Style::default().fg(color))));
    }
    if !state.info.is_empty() {
        lines.push(Line::from(state.info.clone()));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(p, area);
}
