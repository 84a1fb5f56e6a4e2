//! Input handling for the TUI.
//!
//! Overlays capture the keyboard first (help, then the question dialog,
//! then the notification log); everything else goes through the global
//! keybinding lookup.

use crate::app::{App, AppEvent};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use crate::util::validate_article_url;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseEvent, MouseEventKind};
use tokio::sync::mpsc;

use super::Action;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: isize = 3;

pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }
    if app.question.is_open() {
        return Ok(handle_question_input(app, code, modifiers, event_tx));
    }
    if app.show_notifications {
        let action = app
            .keybindings
            .action_for_key(code, modifiers, KbContext::Notifications);
        match action {
            Some(KbAction::Back) => {
                app.show_notifications = false;
                return Ok(Action::Continue);
            }
            Some(KbAction::ScrollDown) => {
                app.notifications_scroll = app.notifications_scroll.saturating_add(1);
                return Ok(Action::Continue);
            }
            Some(KbAction::ScrollUp) => {
                app.notifications_scroll = app.notifications_scroll.saturating_sub(1);
                return Ok(Action::Continue);
            }
            other => return Ok(handle_feed_action(app, other, event_tx)),
        }
    }

    let action = app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Global);
    Ok(handle_feed_action(app, action, event_tx))
}

/// Captures all keys: j/k/Up/Down scroll, Esc/q/? dismiss.
fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.show_help = false;
            app.help_scroll_offset = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.help_scroll_offset = app.help_scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
    Action::Continue
}

/// The dialog owns the keyboard: bound keys act, other characters are typed.
fn handle_question_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match app
        .keybindings
        .action_for_key(code, modifiers, KbContext::Question)
    {
        Some(KbAction::SubmitQuestion) => {
            // Blank, closed and already-pending submits are skipped quietly.
            let _ = app.submit_question(event_tx);
        }
        Some(KbAction::ClearQuestion) => app.question.clear_question(),
        Some(KbAction::InsertNewline) => app.question.push_char('\n'),
        Some(KbAction::Back) => app.close_question(),
        _ => match code {
            KeyCode::Char(c)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                app.question.push_char(c);
            }
            KeyCode::Backspace => app.question.pop_char(),
            KeyCode::Down => app.answer_scroll = app.answer_scroll.saturating_add(1),
            KeyCode::Up => app.answer_scroll = app.answer_scroll.saturating_sub(1),
            KeyCode::PageDown => app.answer_scroll = app.answer_scroll.saturating_add(10),
            KeyCode::PageUp => app.answer_scroll = app.answer_scroll.saturating_sub(10),
            _ => {}
        },
    }
    Action::Continue
}

fn handle_feed_action(
    app: &mut App,
    action: Option<KbAction>,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match action {
        Some(KbAction::Quit) => return Action::Quit,
        Some(KbAction::NavDown) => app.select_next(event_tx),
        Some(KbAction::NavUp) => app.select_prev(event_tx),
        Some(KbAction::ScrollDown) => app.scroll_feed(1, event_tx),
        Some(KbAction::ScrollUp) => app.scroll_feed(-1, event_tx),
        Some(KbAction::PageDown) => {
            let half = app.half_page();
            app.scroll_feed(half, event_tx);
        }
        Some(KbAction::PageUp) => {
            let half = app.half_page();
            app.scroll_feed(-half, event_tx);
        }
        Some(KbAction::Top) => app.scroll_to_top(),
        Some(KbAction::Bottom) => app.scroll_to_bottom(event_tx),
        Some(KbAction::ToggleExpand) => {
            app.toggle_expand_selected();
        }
        Some(KbAction::AskQuestion) => {
            if !app.open_question() {
                app.set_status("No article selected");
            }
        }
        Some(KbAction::OpenInBrowser) => open_selected_in_browser(app),
        Some(KbAction::Refresh) => {
            app.refresh(event_tx);
            app.set_status("Refreshing...");
        }
        Some(KbAction::LoadMore) => {
            if app.load_more(event_tx).is_none() {
                app.set_status("Already loading");
            }
        }
        Some(KbAction::ToggleNotifications) => {
            app.show_notifications = !app.show_notifications;
            app.notifications_scroll = 0;
        }
        Some(KbAction::Reconnect) => {
            if app.reconnect_notifications(event_tx) {
                app.set_status("Reconnecting notifications...");
            } else {
                app.set_status(format!("Notifications already {}", app.channel_state));
            }
        }
        Some(KbAction::CycleTheme) => {
            let name = app.cycle_theme();
            app.set_status(format!("Theme: {}", name));
        }
        Some(KbAction::ShowHelp) => {
            app.show_help = true;
            app.help_scroll_offset = 0;
        }
        Some(KbAction::Back) => {
            app.show_notifications = false;
        }
        Some(KbAction::SubmitQuestion)
        | Some(KbAction::ClearQuestion)
        | Some(KbAction::InsertNewline)
        | None => {}
    }
    Action::Continue
}

/// Hand the selected article's link to the system browser after screening it.
fn open_selected_in_browser(app: &mut App) {
    let Some(article) = app.selected_article() else {
        return;
    };
    if article.url.trim().is_empty() {
        app.set_status("Article has no URL");
        return;
    }
    match validate_article_url(&article.url) {
        Err(e) => {
            tracing::warn!(url = %article.url, error = %e, "Refusing to open article URL");
            app.set_status(format!("Cannot open link: {}", e));
        }
        Ok(url) => {
            let host = url.host_str().unwrap_or_default().to_string();
            match open::that(url.as_str()) {
                Ok(()) => app.set_status(format!("Opening {}...", host)),
                Err(e) => app.set_status(format!("Failed to open browser: {}", e)),
            }
        }
    }
}

/// Mouse wheel scrolls whatever is on top.
pub(super) fn handle_mouse(app: &mut App, event: MouseEvent, event_tx: &mpsc::Sender<AppEvent>) {
    let delta = match event.kind {
        MouseEventKind::ScrollDown => WHEEL_LINES,
        MouseEventKind::ScrollUp => -WHEEL_LINES,
        _ => return,
    };
    app.needs_redraw = true;

    if app.show_help {
        app.help_scroll_offset = app.help_scroll_offset.saturating_add_signed(delta);
    } else if app.question.is_open() {
        app.answer_scroll = app.answer_scroll.saturating_add_signed(delta);
    } else if app.show_notifications {
        app.notifications_scroll = app.notifications_scroll.saturating_add_signed(delta);
    } else {
        app.scroll_feed(delta, event_tx);
    }
}
