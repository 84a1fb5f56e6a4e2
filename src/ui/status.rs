use crate::app::App;
use crate::keybindings::{Action, Context};
use crate::util::{display_width, sanitize_inline, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Actions advertised in the idle status bar, with their short labels.
const HINTS: [(Action, &str); 7] = [
    (Action::NavDown, "next"),
    (Action::ToggleExpand, "expand"),
    (Action::AskQuestion, "ask"),
    (Action::OpenInBrowser, "open"),
    (Action::Refresh, "refresh"),
    (Action::ShowHelp, "help"),
    (Action::Quit, "quit"),
];

fn hint_text(app: &App) -> String {
    HINTS
        .iter()
        .filter_map(|&(action, label)| {
            app.keybindings
                .key_hint(Context::Global, action)
                .map(|key| format!("[{}]{}", key, label))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the status bar: transient message or key hints on the left,
/// feed counters on the right.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let right = format!(
        " {} articles · page {} ",
        app.store.len(),
        app.pagination.current_page()
    );

    let (left, left_style): (Cow<'_, str>, _) = if let Some((msg, _)) = &app.status_message {
        (Cow::Borrowed(msg.as_ref()), app.style("status_bar"))
    } else if let Some(error) = app.pagination.error() {
        (
            Cow::Owned(format!("Error: {}", sanitize_inline(error))),
            app.style("status_bar").patch(app.style("status_error")),
        )
    } else {
        (Cow::Owned(hint_text(app)), app.style("status_bar"))
    };

    let width = area.width as usize;
    let right_width = display_width(&right);
    let left_room = width.saturating_sub(right_width + 1);
    let left = truncate_to_width(&left, left_room).into_owned();
    let pad = width.saturating_sub(display_width(&left) + right_width);

    let line = Line::from(vec![
        Span::styled(left, left_style),
        Span::styled(" ".repeat(pad), app.style("status_bar")),
        Span::styled(right, app.style("status_bar")),
    ]);
    f.render_widget(Paragraph::new(line).style(app.style("status_bar")), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::keybindings::KeybindingRegistry;
    use crate::theme::ThemeVariant;
    use std::collections::HashMap;
    use std::time::Duration;

    #[test]
    fn test_hint_text_uses_live_bindings() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let mut keys = KeybindingRegistry::new();
        let overrides: HashMap<String, String> =
            [("quit".to_string(), "Ctrl+q".to_string())].into_iter().collect();
        keys.apply_overrides(&overrides);
        let app = App::new(api, ThemeVariant::Dark, keys, 5);

        let text = hint_text(&app);
        assert!(text.contains("[Ctrl+q]quit"));
        assert!(text.contains("[a]ask"));
    }
}
