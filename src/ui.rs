//! Interactive terminal control panel.

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{io::Stdout, sync::Arc, time::Duration};
use tokio::sync::mpsc;

use crate::{
    api::RecordAction,
    config::PanelConfig,
    panel::{Panel, PanelView},
    service::Pollers,
    stats::DiskStatsView,
};

const REDRAW_EVERY: Duration = Duration::from_millis(250);
const KEY_POLL: Duration = Duration::from_millis(100);
const MAX_DAYS_DIGITS: usize = 6;

/// Input state owned by the terminal frontend.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UiState {
    pub days_input: String,
    pub editing_days: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Record(RecordAction),
    Delete(String),
    Quit,
}

/// Maps a key press to a panel command, updating the days field in place.
pub fn handle_key(state: &mut UiState, key: KeyEvent) -> Option<UiCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if state.editing_days {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if state.days_input.len() < MAX_DAYS_DIGITS {
                    state.days_input.push(c);
                }
                None
            }
            KeyCode::Backspace => {
                state.days_input.pop();
                None
            }
            KeyCode::Enter => {
                state.editing_days = false;
                Some(UiCommand::Delete(state.days_input.clone()))
            }
            KeyCode::Esc => {
                state.editing_days = false;
                None
            }
            _ => None,
        }
    } else {
        match key.code {
            KeyCode::Char('r') => Some(UiCommand::Record(RecordAction::Start)),
            KeyCode::Char('s') => Some(UiCommand::Record(RecordAction::Stop)),
            KeyCode::Char('d') => {
                state.editing_days = true;
                None
            }
            KeyCode::Enter => Some(UiCommand::Delete(state.days_input.clone())),
            KeyCode::Char('q') | KeyCode::Esc => Some(UiCommand::Quit),
            _ => None,
        }
    }
}

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        execute!(std::io::stdout(), EnterAlternateScreen).context("enter alternate screen")?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the control panel until the user quits.
pub async fn run(panel: Arc<Panel>, config: PanelConfig) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut terminal: Terminal<CrosstermBackend<Stdout>> =
        Terminal::new(CrosstermBackend::new(std::io::stdout())).context("open terminal")?;
    terminal.clear()?;

    let pollers = Pollers::spawn(panel.clone(), &config);
    let mut keys = spawn_key_reader();
    let mut redraw = tokio::time::interval(REDRAW_EVERY);
    let mut state = UiState::default();

    tracing::info!(panel = %config.panel_name, url = %config.base_url, "terminal panel started");

    let result = loop {
        if let Err(err) = draw_panel(&mut terminal, &panel, &state, &config) {
            break Err(err);
        }

        tokio::select! {
            key = keys.recv() => {
                let Some(key) = key else {
                    break Ok(());
                };
                match handle_key(&mut state, key) {
                    Some(UiCommand::Quit) => break Ok(()),
                    Some(UiCommand::Record(action)) => {
                        let panel = panel.clone();
                        tokio::spawn(async move {
                            let _ = panel.send_action(action).await;
                        });
                    }
                    Some(UiCommand::Delete(days)) => {
                        let panel = panel.clone();
                        tokio::spawn(async move {
                            let _ = panel.send_delete_command(&days).await;
                        });
                    }
                    None => {}
                }
            }
            _ = redraw.tick() => {}
        }
    };

    pollers.shutdown().await?;
    tracing::info!(panel = %config.panel_name, "terminal panel stopped");
    result
}

/// Key events are read on a plain thread; crossterm's reader is blocking.
fn spawn_key_reader() -> mpsc::Receiver<KeyEvent> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || loop {
        match event::poll(KEY_POLL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.blocking_send(key).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(error = %err, "terminal input failed");
                    break;
                }
            },
            Ok(false) => {
                if tx.is_closed() {
                    break;
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "terminal input failed");
                break;
            }
        }
    });
    rx
}

fn draw_panel<B: Backend>(
    terminal: &mut Terminal<B>,
    panel: &Panel,
    state: &UiState,
    config: &PanelConfig,
) -> Result<()> {
    let view = panel.snapshot();
    let controls = Controls {
        record_enabled: panel.record_enabled(),
        delete_enabled: panel.delete_enabled(),
    };
    terminal
        .draw(|f| render(f, &view, state, controls, config))
        .context("draw panel")?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Controls {
    record_enabled: bool,
    delete_enabled: bool,
}

fn render(f: &mut Frame, view: &PanelView, state: &UiState, controls: Controls, config: &PanelConfig) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} - {} ", config.panel_name, config.base_url));
    let inner = outer.inner(f.size());
    f.render_widget(outer, f.size());

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // recording
            Constraint::Length(5), // cleanup
            Constraint::Min(6),    // disk statistics
            Constraint::Length(1), // key help
        ])
        .split(inner);

    render_recording(f, sections[0], view, controls);
    render_cleanup(f, sections[1], view, state, controls);
    render_disk(f, sections[2], &view.disk_stats);
    render_help(f, sections[3], state);
}

fn label(text: &str) -> Span<'static> {
    Span::styled(
        format!("{text:<18}"),
        Style::default().add_modifier(Modifier::BOLD),
    )
}

fn control_span(name: &str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(format!("[{name}]"), Style::default().fg(Color::Green))
    } else {
        Span::styled(format!("[{name}...]"), Style::default().fg(Color::DarkGray))
    }
}

fn render_recording(f: &mut Frame, area: Rect, view: &PanelView, controls: Controls) {
    let indicator_style = if view.recording_indicator.ends_with("Recording") {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let lines = vec![
        Line::from(vec![
            control_span("r: start", controls.record_enabled),
            Span::raw(" "),
            control_span("s: stop", controls.record_enabled),
        ]),
        Line::from(vec![label("Command:"), Span::raw(view.recording_status.clone())]),
        Line::from(vec![
            label("Recorder:"),
            Span::styled(view.recording_indicator.clone(), indicator_style),
        ]),
        Line::from(vec![label("Server uptime:"), Span::raw(view.server_uptime.clone())]),
        Line::from(vec![label("Recording uptime:"), Span::raw(view.recording_uptime.clone())]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title(" Recording ")),
        area,
    );
}

fn render_cleanup(f: &mut Frame, area: Rect, view: &PanelView, state: &UiState, controls: Controls) {
    let input_style = if state.editing_days {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default()
    };
    let cursor = if state.editing_days { "_" } else { "" };
    let lines = vec![
        Line::from(vec![
            label("Older than days:"),
            Span::styled(format!("{}{}", state.days_input, cursor), input_style),
            Span::raw("  "),
            control_span("Enter: delete", controls.delete_enabled),
        ]),
        Line::from(vec![label("Cleanup:"), Span::raw(view.cleanup_status.clone())]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title(" Cleanup ")),
        area,
    );
}

fn render_disk(f: &mut Frame, area: Rect, disk: &DiskStatsView) {
    let lines: Vec<Line> = match disk {
        DiskStatsView::Table(rows) => rows
            .iter()
            .map(|row| {
                Line::from(vec![
                    label(&format!("{}:", row.label)),
                    Span::raw(row.value.clone()),
                ])
            })
            .collect(),
        DiskStatsView::Error(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        DiskStatsView::Pending => vec![Line::from("Loading...")],
    };
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::TOP).title(" Disk ")),
        area,
    );
}

fn render_help(f: &mut Frame, area: Rect, state: &UiState) {
    let help = if state.editing_days {
        "digits: edit  Backspace: erase  Enter: delete  Esc: done"
    } else {
        "r: start  s: stop  d: edit days  Enter: delete  q: quit"
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))),
        area,
    );
}
