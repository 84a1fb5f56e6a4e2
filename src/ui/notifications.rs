//! Notification log overlay, newest first.

use crate::api::ReceivedNotification;
use crate::app::App;
use crate::util::{sanitize_inline, truncate_to_width};
use chrono::{DateTime, Local, Utc};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;

pub const NO_NOTIFICATIONS_TEXT: &str = "아직 받은 알림이 없습니다.";

/// Second-row indent, aligned under the title.
const INDENT: usize = 15;

/// Age of a notification relative to `now`, e.g. "3m" or "2h".
pub fn format_age(received_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - received_at).num_seconds();
    if diff < 60 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    format!("{}d", diff / 86400)
}

/// Two rows per notification: time and title, then message and tags.
fn entry_lines(
    app: &App,
    entry: &ReceivedNotification,
    now: DateTime<Utc>,
    width: usize,
) -> [Line<'static>; 2] {
    let n = &entry.notification;
    let time = format!(
        "{} {:>4}",
        entry.received_at.with_timezone(&Local).format("%H:%M:%S"),
        format_age(entry.received_at, now)
    );
    let title = sanitize_inline(&n.article.title);
    let title_room = width.saturating_sub(time.len() + 2);

    let mut meta = sanitize_inline(&n.message);
    let tag = sanitize_inline(&n.article.tag);
    if !tag.is_empty() {
        if !meta.is_empty() {
            meta.push_str(" · ");
        }
        meta.push_str(&tag);
    }

    [
        Line::from(vec![
            Span::styled(time, app.style("notification_meta")),
            Span::raw("  "),
            Span::styled(
                truncate_to_width(&title, title_room).into_owned(),
                app.style("notification_title"),
            ),
        ]),
        Line::from(Span::styled(
            format!("{:indent$}{}", "", truncate_to_width(&meta, width.saturating_sub(INDENT)), indent = INDENT),
            app.style("notification_meta"),
        )),
    ]
}

pub fn render(f: &mut Frame, app: &mut App) {
    let overlay = centered_rect(70, 70, f.area());
    if overlay.width < 20 || overlay.height < 5 {
        return;
    }
    f.render_widget(Clear, overlay);

    let inner_width = overlay.width.saturating_sub(2) as usize;
    let inner_height = overlay.height.saturating_sub(2) as usize;

    let lines: Vec<Line<'static>> = if app.notifications.is_empty() {
        vec![Line::from(Span::styled(
            NO_NOTIFICATIONS_TEXT,
            app.style("notification_meta"),
        ))]
    } else {
        let now = Utc::now();
        app.notifications
            .iter()
            .flat_map(|entry| entry_lines(app, entry, now, inner_width))
            .collect()
    };

    let max_scroll = lines.len().saturating_sub(inner_height);
    app.notifications_scroll = app.notifications_scroll.min(max_scroll);

    let title = format!(" 알림 ({}) · {} ", app.notifications.len(), app.channel_state);
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("overlay_border"))
                .title(Span::styled(title, app.style("overlay_title"))),
        )
        .scroll((app.notifications_scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, overlay);
}
