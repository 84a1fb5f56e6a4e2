use crate::theme::StyleMap;
use crate::util::strip_control_chars;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

/// Convert a markdown answer to styled lines.
///
/// Covers what answers actually contain: paragraphs, headings, emphasis,
/// inline and block code, lists and links. Links keep their text and show
/// the target after it.
pub fn render_markdown(md: &str, theme: &StyleMap) -> Vec<Line<'static>> {
    let md = strip_control_chars(md);
    let parser = Parser::new(&md);
    let mut lines: Vec<Line<'static>> = Vec::with_capacity(md.lines().count());
    let mut current_spans: Vec<Span<'static>> = Vec::with_capacity(4);
    let mut in_code_block = false;
    let mut in_heading = false;
    let mut in_emphasis = false;
    let mut in_strong = false;
    let mut link_target: Option<String> = None;
    // One entry per open list: next ordinal for ordered lists, None for bullets.
    let mut lists: Vec<Option<u64>> = Vec::new();

    let flush = |spans: &mut Vec<Span<'static>>, lines: &mut Vec<Line<'static>>| {
        if !spans.is_empty() {
            lines.push(Line::from(std::mem::take(spans)));
        }
    };

    for event in parser {
        match event {
            Event::Start(Tag::Heading { .. }) => in_heading = true,
            Event::End(TagEnd::Heading(_)) => {
                flush(&mut current_spans, &mut lines);
                lines.push(Line::from(""));
                in_heading = false;
            }
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                flush(&mut current_spans, &mut lines);
                if lists.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                flush(&mut current_spans, &mut lines);
                in_code_block = false;
                lines.push(Line::from(""));
            }
            Event::Start(Tag::List(start)) => {
                flush(&mut current_spans, &mut lines);
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    lines.push(Line::from(""));
                }
            }
            Event::Start(Tag::Item) => {
                flush(&mut current_spans, &mut lines);
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                let marker = match lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}{}. ", indent, n);
                        *n += 1;
                        marker
                    }
                    _ => format!("{}• ", indent),
                };
                current_spans.push(Span::raw(marker));
            }
            Event::End(TagEnd::Item) => flush(&mut current_spans, &mut lines),
            Event::Start(Tag::Emphasis) => in_emphasis = true,
            Event::End(TagEnd::Emphasis) => in_emphasis = false,
            Event::Start(Tag::Strong) => in_strong = true,
            Event::End(TagEnd::Strong) => in_strong = false,
            Event::Start(Tag::Link { dest_url, .. }) => {
                link_target = Some(dest_url.into_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = link_target.take() {
                    current_spans.push(Span::styled(format!(" <{}>", url), theme.resolve("md_link")));
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                current_spans.push(Span::styled(
                    format!("[Image: {}]", dest_url),
                    theme.resolve("md_link"),
                ));
            }
            Event::Text(text) => {
                if in_code_block {
                    // Code blocks keep their own line structure.
                    for (i, line) in text.lines().enumerate() {
                        if i > 0 {
                            flush(&mut current_spans, &mut lines);
                        }
                        current_spans.push(Span::styled(format!("  {}", line), theme.resolve("md_code")));
                    }
                    flush(&mut current_spans, &mut lines);
                    continue;
                }
                let style = if in_heading {
                    theme.resolve("md_heading")
                } else if link_target.is_some() {
                    theme.resolve("md_link")
                } else if in_strong {
                    theme.resolve("md_strong")
                } else if in_emphasis {
                    theme.resolve("md_emphasis")
                } else {
                    Style::default()
                };
                current_spans.push(Span::styled(text.into_string(), style));
            }
            Event::Code(code) => {
                current_spans.push(Span::styled(format!("`{}`", code), theme.resolve("md_code")));
            }
            Event::SoftBreak => current_spans.push(Span::raw(" ")),
            Event::HardBreak => flush(&mut current_spans, &mut lines),
            _ => {}
        }
    }

    flush(&mut current_spans, &mut lines);

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}
