//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background task events and a periodic tick.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::{handle_input, handle_mouse};
use super::render::render;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Result of handling a key press.
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit and restore the terminal.
    Quit,
}

/// Raw mode, alternate screen and mouse capture, undone on drop.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e.into());
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        );
        let _ = self.terminal.show_cursor();
    }
}

/// Run the TUI until the user quits or a termination signal arrives.
///
/// Starts the first page load and the notification channel, then loops:
/// draw if dirty, drain queued task events, and wait on signals, terminal
/// input, task events and the tick. Background tasks are cancelled on exit.
///
/// A panic hook restores the terminal before the default hook prints.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut guard = TerminalGuard::new()?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    app.load_page(0, &event_tx);
    app.connect_notifications(&event_tx);

    let result = loop {
        if app.needs_redraw {
            if let Err(e) = guard.terminal.draw(|f| render(f, app)) {
                break Err(e.into());
            }
            app.needs_redraw = false;
        }

        // Drain queued task results so typing never starves them.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event, &event_tx);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break Ok(());
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break Ok(());
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break Ok(()),
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_status(format!("Error: {}", e)),
                        }
                    }
                    Some(Ok(Event::Mouse(mouse))) => handle_mouse(app, mouse, &event_tx),
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Terminal event stream error");
                    }
                    None => {
                        tracing::info!("Terminal event stream closed");
                        break Ok(());
                    }
                }
            }

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event, &event_tx);
            }

            _ = tick_interval.tick() => {
                if app.clear_expired_status() {
                    app.needs_redraw = true;
                }
                if app.tick_spinner() {
                    app.needs_redraw = true;
                }
            }
        }
    };

    app.shutdown();
    drop(guard);
    result
}
