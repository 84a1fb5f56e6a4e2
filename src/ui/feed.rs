//! Article feed: a vertical stack of cards scrolled as one document.
//!
//! Layout and drawing are split so the card geometry can be measured (and
//! fed back to the scroll monitor) without a terminal.

use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::util::{sanitize_inline, strip_control_chars, truncate_to_width, wrap_to_width, ELLIPSIS};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

pub const EXPAND_LABEL: &str = "전체 내용 보기";
pub const COLLAPSE_LABEL: &str = "내용 접기";
pub const ASK_LABEL: &str = "질문하기";
pub const VIEW_ORIGINAL_LABEL: &str = "원본 보기";
pub const LOADING_MORE_TEXT: &str = "더 많은 기사를 불러오는 중...";
pub const EMPTY_FEED_TEXT: &str = "표시할 기사가 없습니다.";

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Gutter drawn left of every card row: marker plus one space.
const GUTTER_WIDTH: usize = 2;

/// The whole feed laid out at one width.
pub struct FeedLayout {
    pub lines: Vec<Line<'static>>,
    /// `[start, end)` rows of each card, in store order.
    pub card_spans: Vec<(usize, usize)>,
}

pub fn spinner_glyph(frame: usize) -> &'static str {
    SPINNER[frame % SPINNER.len()]
}

/// Lay out every card and the trailing loading/empty/error rows.
pub fn layout_feed(app: &App, width: u16) -> FeedLayout {
    let inner = (width as usize).saturating_sub(GUTTER_WIDTH).max(1);
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut card_spans = Vec::with_capacity(app.store.len());

    let expand_hint = hint(app, Action::ToggleExpand);
    let ask_hint = hint(app, Action::AskQuestion);
    let open_hint = hint(app, Action::OpenInBrowser);

    for (index, article) in app.store.articles().iter().enumerate() {
        let selected = index == app.selected;
        let gutter = if selected {
            Span::styled("▌ ", app.style("card_border_selected"))
        } else {
            Span::styled("│ ", app.style("card_border"))
        };
        let start = lines.len();
        let mut push = |spans: Vec<Span<'static>>| {
            let mut row = Vec::with_capacity(spans.len() + 1);
            row.push(gutter.clone());
            row.extend(spans);
            lines.push(Line::from(row));
        };

        // Tags
        let tags: Vec<Span<'static>> = article
            .tags()
            .flat_map(|tag| {
                [
                    Span::styled(format!(" {} ", sanitize_inline(tag)), app.style("card_tag")),
                    Span::raw(" "),
                ]
            })
            .collect();
        if !tags.is_empty() {
            push(tags);
        }

        // Title
        for row in wrap_to_width(&sanitize_inline(&article.title), inner) {
            push(vec![Span::styled(row, app.style("card_title"))]);
        }

        // Body
        let expanded = app.expansion.is_expanded(&article.id);
        if expanded {
            let body = strip_control_chars(&article.content);
            for row in wrap_to_width(body.trim(), inner) {
                push(vec![Span::styled(row, app.style("card_body"))]);
            }
        } else {
            let flat = sanitize_inline(&article.content);
            if !flat.is_empty() {
                push(clamped_body(app, &flat, inner));
            }
        }

        // Expand / collapse affordance
        let (arrow, label) = if expanded {
            ("▴", COLLAPSE_LABEL)
        } else {
            ("▾", EXPAND_LABEL)
        };
        push(vec![Span::styled(
            format!("{} {}{}", arrow, label, expand_hint),
            app.style("card_action"),
        )]);

        // Footer: source and actions
        let mut footer = Vec::with_capacity(3);
        if let Some(host) = article.source_host() {
            footer.push(Span::styled(
                format!("출처: {}", sanitize_inline(&host)),
                app.style("card_source"),
            ));
            footer.push(Span::raw("   "));
        }
        footer.push(Span::styled(
            format!("{}{}  {}{}", ASK_LABEL, ask_hint, VIEW_ORIGINAL_LABEL, open_hint),
            app.style("card_action"),
        ));
        push(footer);

        card_spans.push((start, lines.len()));
        lines.push(Line::from(""));
    }

    if app.pagination.is_loading() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", spinner_glyph(app.spinner_frame)),
                app.style("spinner"),
            ),
            Span::raw(LOADING_MORE_TEXT),
        ]));
    } else if let Some(error) = app.pagination.error() {
        lines.push(Line::from(Span::styled(
            sanitize_inline(error),
            app.style("status_error"),
        )));
    } else if app.store.is_empty() {
        lines.push(Line::from(Span::styled(EMPTY_FEED_TEXT, app.style("card_source"))));
    }

    FeedLayout { lines, card_spans }
}

fn hint(app: &App, action: Action) -> String {
    app.keybindings
        .key_hint(Context::Global, action)
        .map(|k| format!(" [{}]", k))
        .unwrap_or_default()
}

/// One body row clamped to `width`, with a dimmed ellipsis when cut.
fn clamped_body(app: &App, text: &str, width: usize) -> Vec<Span<'static>> {
    match truncate_to_width(text, width) {
        Cow::Borrowed(fits) => vec![Span::styled(fits.to_string(), app.style("card_body"))],
        Cow::Owned(cut) => {
            let head = cut.strip_suffix(ELLIPSIS).unwrap_or(cut.as_str()).to_string();
            vec![
                Span::styled(head, app.style("card_body")),
                Span::styled(ELLIPSIS, app.style("card_fade")),
            ]
        }
    }
}

/// Draw the visible slice of the feed and report the geometry to the app.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 1 {
        return;
    }

    let layout = layout_feed(app, area.width);
    let viewport = area.height as usize;
    let content = layout.lines.len();
    app.update_layout(viewport, content, layout.card_spans);

    let offset = app.scroll.offset();
    let visible: Vec<Line<'static>> = layout
        .lines
        .into_iter()
        .skip(offset)
        .take(viewport)
        .collect();
    f.render_widget(Paragraph::new(visible), area);

    if app.scroll.show_indicator() {
        render_scroll_indicator(f, app, area);
    }
}

/// Position badge in the bottom-right corner of the feed.
fn render_scroll_indicator(f: &mut Frame, app: &App, area: Rect) {
    let text = format!(
        " 스크롤 위치: {}줄 ({}%) ",
        app.scroll.offset(),
        app.scroll.percent()
    );
    let width = (crate::util::display_width(&text) as u16).min(area.width);
    let badge = Rect {
        x: area.x + area.width - width,
        y: area.y + area.height - 1,
        width,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(text).style(app.style("scroll_indicator")),
        badge,
    );
}
