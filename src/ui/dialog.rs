//! Question dialog overlay.

use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::question::ActiveQuestion;
use crate::util::sanitize_inline;
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::feed::spinner_glyph;
use super::markdown::render_markdown;
use super::centered_rect;

pub const PROMPT_TEXT: &str = "이 기사에 대해 궁금한 점을 질문해보세요.";
pub const PLACEHOLDER_TEXT: &str = "질문을 입력하세요...";
pub const PENDING_TEXT: &str = "답변 생성 중...";
pub const SUBMIT_LABEL: &str = "질문하기";
pub const ANSWER_LABEL: &str = "답변:";

fn dialog_lines(app: &App, active: &ActiveQuestion) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            sanitize_inline(&active.article.title),
            app.style("overlay_title"),
        )),
        Line::from(PROMPT_TEXT),
        Line::from(""),
    ];

    if active.question.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("> ", app.style("input")),
            Span::styled(PLACEHOLDER_TEXT, app.style("input_placeholder")),
        ]));
    } else {
        let cursor = if active.pending { "" } else { "_" };
        let count = active.question.split('\n').count();
        for (i, row) in active.question.split('\n').enumerate() {
            let prefix = if i == 0 { "> " } else { "  " };
            let tail = if i + 1 == count { cursor } else { "" };
            lines.push(Line::from(Span::styled(
                format!("{}{}{}", prefix, row, tail),
                app.style("input"),
            )));
        }
    }
    lines.push(Line::from(""));

    if active.pending {
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", spinner_glyph(app.spinner_frame)), app.style("spinner")),
            Span::raw(PENDING_TEXT),
        ]));
    } else {
        let submit = app
            .keybindings
            .key_hint(Context::Question, Action::SubmitQuestion)
            .unwrap_or_default();
        let close = app
            .keybindings
            .key_hint(Context::Question, Action::Back)
            .unwrap_or_default();
        let newline = app
            .keybindings
            .key_hint(Context::Question, Action::InsertNewline)
            .map(|k| format!("  [{}] 줄바꿈", k))
            .unwrap_or_default();
        lines.push(Line::from(Span::styled(
            format!("[{}] {}{}  [{}] 닫기", submit, SUBMIT_LABEL, newline, close),
            app.style("card_action"),
        )));
    }

    if let Some(answer) = &active.answer {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(ANSWER_LABEL, app.style("answer_label"))));
        lines.extend(render_markdown(answer, &app.theme));
    }
    lines
}

pub fn render(f: &mut Frame, app: &mut App) {
    let Some(active) = app.question.active() else {
        return;
    };
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 8 {
        return;
    }
    f.render_widget(Clear, overlay);

    let lines = dialog_lines(app, active);
    // Wrapped height is not known here; clamp against the unwrapped count.
    let max_scroll = lines.len().saturating_sub(1);
    app.answer_scroll = app.answer_scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("overlay_border"))
                .title(Span::styled(format!(" {} ", SUBMIT_LABEL), app.style("overlay_title"))),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.answer_scroll.min(u16::MAX as usize) as u16, 0));
    f.render_widget(paragraph, overlay);
}
