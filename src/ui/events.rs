//! Background event processing.
//!
//! Applies `AppEvent`s from spawned tasks to the application state and
//! reports outcomes in the status bar.

use crate::app::{App, AppEvent};
use crate::feed::PageOutcome;
use crate::util::sanitize_inline;
use tokio::sync::mpsc;

/// Handle one event from a background task.
pub fn handle_app_event(app: &mut App, event: AppEvent, event_tx: &mpsc::Sender<AppEvent>) {
    app.needs_redraw = true;
    match event {
        AppEvent::PageLoaded { request, result } => {
            match app.on_page_loaded(request, result) {
                PageOutcome::Replaced { count } => {
                    tracing::info!(count, "Loaded first page");
                }
                PageOutcome::Appended { added, duplicates } => {
                    tracing::info!(page = request.page, added, duplicates, "Appended page");
                    if added == 0 {
                        app.set_status(format!("No new articles on page {}", request.page));
                    }
                }
                PageOutcome::Failed { message } => {
                    tracing::warn!(page = request.page, error = %message, "Page load failed");
                    app.set_status(format!("Failed to load articles: {}", message));
                }
                PageOutcome::Stale => {}
            }
        }
        AppEvent::AnswerReceived { request, result } => {
            if app.on_answer(&request, result) {
                tracing::debug!(article_id = %request.article_id, "Answer shown");
            }
        }
        AppEvent::Notification(received) => {
            let title = sanitize_inline(&received.notification.article.title);
            let message = sanitize_inline(&received.notification.message);
            app.on_notification(received, event_tx);
            if message.is_empty() {
                app.set_status(format!("새 기사: {}", title));
            } else {
                app.set_status(format!("{}: {}", message, title));
            }
        }
        AppEvent::ChannelStatus { epoch, state } => {
            let closed_reason = match &state {
                crate::notify::ChannelState::Closed { reason } => Some(reason.clone()),
                _ => None,
            };
            if app.on_channel_status(epoch, state) {
                if let Some(reason) = closed_reason {
                    app.set_status(format!("Notifications disconnected: {}", reason));
                }
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.on_task_panicked(task);
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}
