//! Render dispatch: header, feed and status bar, then any open overlay.

use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::notify::ChannelState;
use crate::util::{display_width, sanitize_inline, truncate_to_width};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{dialog, feed, help, notifications, status};

pub const HEADER_TITLE: &str = "Deep-Report";
pub const HEADER_SUBTITLE: &str = "인공지능 분야의 최신 소식과 트렌드를 한눈에 확인하세요";

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 10;

const HEADER_HEIGHT: u16 = 3;

pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    feed::render(f, app, chunks[1]);
    status::render(f, app, chunks[2]);

    if app.show_notifications {
        notifications::render(f, app);
    }
    if app.question.is_open() {
        dialog::render(f, app);
    }
    if app.show_help {
        help::render(f, app);
    }
}

/// Channel indicator text and style role.
fn channel_badge(app: &App) -> (String, &'static str) {
    match &app.channel_state {
        ChannelState::Connecting => ("◌ 연결 중".to_string(), "channel_pending"),
        ChannelState::Live => ("● 실시간 업데이트".to_string(), "channel_live"),
        ChannelState::Closed { reason } => {
            let retry = app
                .keybindings
                .key_hint(Context::Global, Action::Reconnect)
                .map(|k| format!(" [{}] 재연결", k))
                .unwrap_or_default();
            (
                format!("✕ 연결 끊김: {}{}", sanitize_inline(reason), retry),
                "channel_closed",
            )
        }
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;
    let (badge, badge_role) = channel_badge(app);
    let count = if app.notifications.is_empty() {
        String::new()
    } else {
        format!("  알림 {}", app.notifications.len())
    };

    let right_room = width.saturating_sub(display_width(HEADER_TITLE) + 2);
    let right = truncate_to_width(&format!("{}{}", badge, count), right_room).into_owned();
    let pad = width.saturating_sub(display_width(HEADER_TITLE) + display_width(&right));

    let title_line = Line::from(vec![
        Span::styled(HEADER_TITLE, app.style("header_title")),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, app.style(badge_role)),
    ]);
    let subtitle_line = Line::from(Span::styled(
        truncate_to_width(HEADER_SUBTITLE, width).into_owned(),
        app.style("header_subtitle"),
    ));

    let header = Paragraph::new(vec![title_line, subtitle_line]).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(app.style("card_border")),
    );
    f.render_widget(header, area);
}
