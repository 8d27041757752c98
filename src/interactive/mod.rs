use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, poll},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::ingest::TailEvent;
use crate::query::QueryEngine;
use crate::store::EntryStore;

mod constants;
pub mod ui;


use self::constants::*;
use self::ui::{
    app_state::{AppState, Mode},
    commands::Command,
    events::Message,
    render_model::RenderModel,
    renderer::Renderer,
};

/// One full view derivation: evaluate the current query, clamp the cursor
/// against the fresh result length, and build the render model. This is the
/// whole read path of a render pass and runs to completion with nothing
/// suspending in between.
pub fn refresh_view(
    state: &mut AppState,
    engine: &mut QueryEngine,
    store: &EntryStore,
) -> RenderModel {
    let eval = engine.evaluate(&state.query, store);
    state.sync_results(eval.entries.len(), eval.valid);
    RenderModel::build(state, &eval.entries)
}

/// Session controller: owns the store, the query engine, and the view
/// state, and serializes both event sources (tailed lines, keystrokes)
/// through one loop. Producers only enqueue; every event is applied to
/// completion before the next is dequeued.
pub struct InteractiveViewer {
    store: EntryStore,
    engine: QueryEngine,
    state: AppState,
    renderer: Renderer,
    tail_rx: Receiver<TailEvent>,
    tail_stopped: bool,
    message_timer: Option<Instant>,
}

impl InteractiveViewer {
    pub fn new(tail_rx: Receiver<TailEvent>) -> Self {
        Self {
            store: EntryStore::new(),
            engine: QueryEngine::new(),
            state: AppState::new(),
            renderer: Renderer::new(),
            tail_rx,
            tail_stopped: false,
            message_timer: None,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = self.setup_terminal()?;
        let result = self.run_app(&mut terminal);
        self.cleanup_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn cleanup_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_app(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            self.drain_tail_events();

            if let Some(timer) = self.message_timer
                && timer.elapsed() >= Duration::from_millis(MESSAGE_CLEAR_DELAY_MS)
            {
                self.message_timer = None;
                self.state.message = None;
            }

            let model = refresh_view(&mut self.state, &mut self.engine, &self.store);
            terminal.draw(|f| {
                self.renderer.render(f, &model);
            })?;

            if poll(Duration::from_millis(EVENT_POLL_INTERVAL_MS))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                let should_quit = self.handle_key(key);
                if should_quit {
                    break;
                }
            }
        }
        Ok(())
    }

    /// Applies pending line batches to the store. Bounded per pass so a
    /// large backfill stays interleaved with input handling.
    fn drain_tail_events(&mut self) {
        for _ in 0..MAX_TAIL_BATCHES_PER_PASS {
            match self.tail_rx.try_recv() {
                Ok(TailEvent::Lines(batch)) => {
                    for line in batch {
                        self.store.append(line);
                    }
                }
                Ok(TailEvent::SourceError(msg)) => {
                    // Reported once; ingestion stops but the loop lives on.
                    if !self.tail_stopped {
                        self.tail_stopped = true;
                        warn!("log source error: {msg}");
                        self.state.message = Some(format!("source error: {msg}"));
                        self.message_timer = None;
                    }
                }
                Err(_) => break,
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C quits unconditionally from either mode.
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let Some(message) = self.route_key(key) else {
            return false;
        };
        let command = self.state.update(message);
        self.execute_command(command)
    }

    fn route_key(&self, key: KeyEvent) -> Option<Message> {
        if key.code == KeyCode::Char('y') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Message::ExportRequested);
        }

        match self.state.mode {
            Mode::Navigation => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Message::CursorUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::CursorDown),
                KeyCode::Char('g') => Some(Message::JumpToTop),
                KeyCode::Char('G') => Some(Message::JumpToBottom),
                KeyCode::Char('/') | KeyCode::Char('i') => Some(Message::EnterSearch),
                _ => None,
            },
            Mode::Search => match key.code {
                KeyCode::Esc => Some(Message::LeaveSearch),
                KeyCode::Enter => Some(Message::ConfirmQuery),
                KeyCode::Backspace => Some(Message::QueryBackspace),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(Message::QueryChar(c))
                }
                _ => None,
            },
        }
    }

    /// Returns true when the command asks to quit.
    fn execute_command(&mut self, command: Command) -> bool {
        match command {
            Command::None => {}
            Command::ExportFiltered => {
                let text = self.filtered_text();
                let count = if text.is_empty() { 0 } else { text.lines().count() };
                match copy_to_clipboard(&text) {
                    Ok(()) => {
                        self.state.message = Some(format!("✓ Copied {count} lines"));
                        self.message_timer = Some(Instant::now());
                    }
                    Err(e) => {
                        // Clipboard loss never touches query or cursor state.
                        warn!("clipboard export failed: {e}");
                        self.state.message = Some(format!("Failed to copy: {e}"));
                        self.message_timer = Some(Instant::now());
                    }
                }
            }
            Command::ShowMessage(msg) => {
                self.state.message = Some(msg);
                self.message_timer = Some(Instant::now());
            }
            Command::ClearMessage => {
                self.state.message = None;
                self.message_timer = None;
            }
            Command::Quit => return true,
        }
        false
    }

    /// Concatenates the currently filtered lines for the clipboard sink.
    fn filtered_text(&mut self) -> String {
        let eval = self.engine.evaluate(&self.state.query, &self.store);
        eval.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        pipe_to_command("pbcopy", &[], text)
    }

    #[cfg(target_os = "linux")]
    {
        pipe_to_command("xclip", &["-selection", "clipboard"], text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = text;
        Err(anyhow::anyhow!("Clipboard not supported on this platform"))
    }
}

#[cfg(any(target_os = "macos", target_os = "linux"))]
fn pipe_to_command(program: &str, args: &[&str], text: &str) -> Result<()> {
    use std::io::Write;
    use std::process::{Command as Process, Stdio};

    let mut child = Process::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("Failed to spawn {program}"))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .with_context(|| format!("Failed to write to {program}"))?;
    }

    let status = child
        .wait()
        .with_context(|| format!("Failed to wait for {program}"))?;
    if !status.success() {
        anyhow::bail!("{program} exited with {status}");
    }
    Ok(())
}
