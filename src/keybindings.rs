//! Keybinding registry: maps keys to actions per context, with config overrides.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

/// Every user-facing action a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    Top,
    Bottom,
    ToggleExpand,
    AskQuestion,
    OpenInBrowser,
    Refresh,
    LoadMore,
    ToggleNotifications,
    Reconnect,
    CycleTheme,
    ShowHelp,
    Back,
    SubmitQuestion,
    ClearQuestion,
    InsertNewline,
}

impl Action {
    /// Description for the help overlay.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::NavDown => "Next article",
            Self::NavUp => "Previous article",
            Self::ScrollDown => "Scroll down one line",
            Self::ScrollUp => "Scroll up one line",
            Self::PageDown => "Scroll down half a page",
            Self::PageUp => "Scroll up half a page",
            Self::Top => "Jump to top",
            Self::Bottom => "Jump to bottom",
            Self::ToggleExpand => "Expand / collapse summary",
            Self::AskQuestion => "Ask about this article",
            Self::OpenInBrowser => "Open original in browser",
            Self::Refresh => "Reload first page",
            Self::LoadMore => "Load next page",
            Self::ToggleNotifications => "Show / hide notifications",
            Self::Reconnect => "Reconnect notifications",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
            Self::Back => "Close panel",
            Self::SubmitQuestion => "Send question",
            Self::ClearQuestion => "Clear question",
            Self::InsertNewline => "Insert line break",
        }
    }
}

/// Dispatch context. Lookups fall back to `Global` except where a context
/// captures the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Notifications,
    Question,
}

impl Context {
    fn falls_back_to_global(self) -> bool {
        !matches!(self, Context::Global | Context::Question)
    }

    pub fn label(self) -> &'static str {
        match self {
            Context::Global => "Feed",
            Context::Notifications => "Notifications",
            Context::Question => "Question",
        }
    }
}

/// A key event: code plus modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Terminals report `Shift` alongside uppercase letters; the character
    /// already carries it.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) => Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT)),
            _ => self,
        }
    }
}

/// Parse a key string from config.
///
/// Accepts single characters (`"q"`, `"?"`), named keys (`"Enter"`, `"Esc"`,
/// `"PageDown"`, ...), `"Ctrl+x"` and `"F1"` through `"F12"`.
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+").or_else(|| s.strip_prefix("ctrl+")) {
        let mut chars = rest.trim().chars();
        let c = chars.next()?;
        return chars.next().is_none().then_some(KeySpec::ctrl(c));
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" => Some(KeyCode::PageUp),
        "pagedown" => Some(KeyCode::PageDown),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s.strip_prefix(['F', 'f']).and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then_some(KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    chars.next().is_none().then_some(KeySpec::char(c))
}

/// Render a key for the help overlay.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, name)
}

/// Parse an action name from config.
fn parse_action_name(name: &str) -> Option<Action> {
    let action = match name.to_lowercase().replace('-', "_").as_str() {
        "quit" => Action::Quit,
        "nav_down" | "next" => Action::NavDown,
        "nav_up" | "prev" | "previous" => Action::NavUp,
        "scroll_down" => Action::ScrollDown,
        "scroll_up" => Action::ScrollUp,
        "page_down" => Action::PageDown,
        "page_up" => Action::PageUp,
        "top" => Action::Top,
        "bottom" => Action::Bottom,
        "toggle_expand" | "expand" => Action::ToggleExpand,
        "ask_question" | "ask" => Action::AskQuestion,
        "open_in_browser" | "open" => Action::OpenInBrowser,
        "refresh" => Action::Refresh,
        "load_more" | "more" => Action::LoadMore,
        "toggle_notifications" | "notifications" => Action::ToggleNotifications,
        "reconnect" => Action::Reconnect,
        "cycle_theme" | "theme" => Action::CycleTheme,
        "show_help" | "help" => Action::ShowHelp,
        "back" => Action::Back,
        "submit_question" | "submit" => Action::SubmitQuestion,
        "clear_question" => Action::ClearQuestion,
        "insert_newline" | "newline" => Action::InsertNewline,
        _ => return None,
    };
    Some(action)
}

/// Default bindings, in help-overlay order.
const DEFAULT_BINDINGS: &[(Context, KeySpec, Action)] = &[
    (Context::Global, KeySpec::char('q'), Action::Quit),
    (Context::Global, KeySpec::char('j'), Action::NavDown),
    (Context::Global, KeySpec::plain(KeyCode::Down), Action::NavDown),
    (Context::Global, KeySpec::char('k'), Action::NavUp),
    (Context::Global, KeySpec::plain(KeyCode::Up), Action::NavUp),
    (Context::Global, KeySpec::ctrl('e'), Action::ScrollDown),
    (Context::Global, KeySpec::ctrl('y'), Action::ScrollUp),
    (Context::Global, KeySpec::ctrl('d'), Action::PageDown),
    (Context::Global, KeySpec::plain(KeyCode::PageDown), Action::PageDown),
    (Context::Global, KeySpec::ctrl('u'), Action::PageUp),
    (Context::Global, KeySpec::plain(KeyCode::PageUp), Action::PageUp),
    (Context::Global, KeySpec::char('g'), Action::Top),
    (Context::Global, KeySpec::plain(KeyCode::Home), Action::Top),
    (Context::Global, KeySpec::char('G'), Action::Bottom),
    (Context::Global, KeySpec::plain(KeyCode::End), Action::Bottom),
    (Context::Global, KeySpec::plain(KeyCode::Enter), Action::ToggleExpand),
    (Context::Global, KeySpec::char(' '), Action::ToggleExpand),
    (Context::Global, KeySpec::char('a'), Action::AskQuestion),
    (Context::Global, KeySpec::char('o'), Action::OpenInBrowser),
    (Context::Global, KeySpec::char('r'), Action::Refresh),
    (Context::Global, KeySpec::char('m'), Action::LoadMore),
    (Context::Global, KeySpec::char('n'), Action::ToggleNotifications),
    (Context::Global, KeySpec::char('N'), Action::Reconnect),
    (Context::Global, KeySpec::char('T'), Action::CycleTheme),
    (Context::Global, KeySpec::char('?'), Action::ShowHelp),
    (Context::Global, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Notifications, KeySpec::char('j'), Action::ScrollDown),
    (Context::Notifications, KeySpec::plain(KeyCode::Down), Action::ScrollDown),
    (Context::Notifications, KeySpec::char('k'), Action::ScrollUp),
    (Context::Notifications, KeySpec::plain(KeyCode::Up), Action::ScrollUp),
    (Context::Notifications, KeySpec::char('n'), Action::Back),
    (Context::Notifications, KeySpec::plain(KeyCode::Esc), Action::Back),
    (Context::Question, KeySpec::plain(KeyCode::Enter), Action::SubmitQuestion),
    (Context::Question, KeySpec::ctrl('u'), Action::ClearQuestion),
    (Context::Question, KeySpec::ctrl('j'), Action::InsertNewline),
    (Context::Question, KeySpec::plain(KeyCode::Esc), Action::Back),
];

/// Registry of bindings with O(1) lookup per `(Context, KeySpec)`.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::with_capacity(DEFAULT_BINDINGS.len()),
        };
        for &(context, key, action) in DEFAULT_BINDINGS {
            registry.bind(context, key, action);
        }
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        let key = key.normalized();
        if let Some(previous) = self.lookup.insert((context, key), action) {
            if previous != action {
                self.bindings
                    .retain(|(c, k, a)| !(*c == context && *k == key && *a == previous));
            }
        }
        self.bindings.push((context, key, action));
    }

    /// Apply overrides from the config `keybindings` table.
    ///
    /// Each entry replaces every default key of that action, in the same
    /// contexts. Returns warnings for unknown actions or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        // Sorted so conflicting overrides resolve the same way every run.
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        for (action_name, key_str) in entries {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };
            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (c, _, a) in &self.bindings {
                if *a == action && !contexts.contains(c) {
                    contexts.push(*c);
                }
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);
            for context in contexts {
                self.bind(context, key, action);
            }

            tracing::info!(action = %action_name, key = %key_str, "Applied keybinding override");
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then
    /// `Global` where the context allows it.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();
        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }
        if context.falls_back_to_global() {
            return self.lookup.get(&(Context::Global, key)).copied();
        }
        None
    }

    /// First key bound to `action` in `context`, for inline hints.
    pub fn key_hint(&self, context: Context, action: Action) -> Option<String> {
        self.bindings
            .iter()
            .find(|(c, _, a)| *c == context && *a == action)
            .map(|(_, k, _)| format_key(k))
    }

    /// All bindings as `(context, key, action, description)` for the help overlay.
    pub fn all_bindings(&self) -> Vec<(Context, String, Action, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), *action, action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lookup(reg: &KeybindingRegistry, code: KeyCode, ctx: Context) -> Option<Action> {
        reg.action_for_key(code, KeyModifiers::NONE, ctx)
    }

    #[test]
    fn test_default_feed_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeyCode::Char('q'), Context::Global), Some(Action::Quit));
        assert_eq!(lookup(&reg, KeyCode::Char('j'), Context::Global), Some(Action::NavDown));
        assert_eq!(lookup(&reg, KeyCode::Enter, Context::Global), Some(Action::ToggleExpand));
        assert_eq!(lookup(&reg, KeyCode::Char('a'), Context::Global), Some(Action::AskQuestion));
        assert_eq!(lookup(&reg, KeyCode::Char('r'), Context::Global), Some(Action::Refresh));
        assert_eq!(lookup(&reg, KeyCode::Char('m'), Context::Global), Some(Action::LoadMore));
    }

    #[test]
    fn test_ctrl_modifiers() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('d'), KeyModifiers::CONTROL, Context::Global),
            Some(Action::PageDown)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('u'), KeyModifiers::CONTROL, Context::Question),
            Some(Action::ClearQuestion)
        );
    }

    #[test]
    fn test_shift_is_ignored_for_characters() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            reg.action_for_key(KeyCode::Char('N'), KeyModifiers::SHIFT, Context::Global),
            Some(Action::Reconnect)
        );
        assert_eq!(
            reg.action_for_key(KeyCode::Char('?'), KeyModifiers::SHIFT, Context::Global),
            Some(Action::ShowHelp)
        );
    }

    #[test]
    fn test_notifications_context_falls_back() {
        let reg = KeybindingRegistry::new();
        assert_eq!(
            lookup(&reg, KeyCode::Char('j'), Context::Notifications),
            Some(Action::ScrollDown)
        );
        assert_eq!(
            lookup(&reg, KeyCode::Char('q'), Context::Notifications),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_question_context_captures_keys() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeyCode::Char('q'), Context::Question), None);
        assert_eq!(
            lookup(&reg, KeyCode::Enter, Context::Question),
            Some(Action::SubmitQuestion)
        );
        assert_eq!(lookup(&reg, KeyCode::Esc, Context::Question), Some(Action::Back));
        assert_eq!(
            reg.action_for_key(KeyCode::Char('j'), KeyModifiers::CONTROL, Context::Question),
            Some(Action::InsertNewline)
        );
    }

    #[test]
    fn test_unknown_key_returns_none() {
        let reg = KeybindingRegistry::new();
        assert_eq!(lookup(&reg, KeyCode::F(12), Context::Global), None);
    }

    #[test]
    fn test_apply_overrides_replaces_all_keys() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("refresh".to_string(), "F5".to_string())]);

        assert!(reg.apply_overrides(&overrides).is_empty());
        assert_eq!(lookup(&reg, KeyCode::Char('r'), Context::Global), None);
        assert_eq!(lookup(&reg, KeyCode::F(5), Context::Global), Some(Action::Refresh));
    }

    #[test]
    fn test_apply_overrides_keeps_contexts() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("back".to_string(), "Ctrl+g".to_string())]);
        reg.apply_overrides(&overrides);

        for ctx in [Context::Global, Context::Notifications, Context::Question] {
            assert_eq!(
                reg.action_for_key(KeyCode::Char('g'), KeyModifiers::CONTROL, ctx),
                Some(Action::Back),
                "{:?}",
                ctx
            );
            assert_eq!(lookup(&reg, KeyCode::Esc, ctx), None);
        }
    }

    #[test]
    fn test_apply_overrides_warnings() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([
            ("nonexistent".to_string(), "x".to_string()),
            ("quit".to_string(), "Ctrl+".to_string()),
        ]);
        let warnings = reg.apply_overrides(&overrides);
        assert_eq!(warnings.len(), 2);
        // Failed override leaves the default in place
        assert_eq!(lookup(&reg, KeyCode::Char('q'), Context::Global), Some(Action::Quit));
    }

    #[test]
    fn test_override_onto_taken_key_replaces_help_entry() {
        let mut reg = KeybindingRegistry::new();
        let overrides = HashMap::from([("refresh".to_string(), "m".to_string())]);
        reg.apply_overrides(&overrides);

        assert_eq!(lookup(&reg, KeyCode::Char('m'), Context::Global), Some(Action::Refresh));
        let m_entries: Vec<_> = reg
            .all_bindings()
            .into_iter()
            .filter(|(ctx, key, _, _)| *ctx == Context::Global && key == "m")
            .collect();
        assert_eq!(m_entries.len(), 1);
        assert_eq!(m_entries[0].2, Action::Refresh);
    }

    #[test]
    fn test_parse_key_string() {
        assert_eq!(parse_key_string("q"), Some(KeySpec::char('q')));
        assert_eq!(parse_key_string("Ctrl+d"), Some(KeySpec::ctrl('d')));
        assert_eq!(parse_key_string("enter"), Some(KeySpec::plain(KeyCode::Enter)));
        assert_eq!(parse_key_string("PageDown"), Some(KeySpec::plain(KeyCode::PageDown)));
        assert_eq!(parse_key_string("F5"), Some(KeySpec::plain(KeyCode::F(5))));
        assert_eq!(parse_key_string("F13"), None);
        assert_eq!(parse_key_string("abc"), None);
        assert_eq!(parse_key_string("가"), Some(KeySpec::char('가')));
    }

    #[test]
    fn test_key_hint() {
        let reg = KeybindingRegistry::new();
        assert_eq!(reg.key_hint(Context::Global, Action::AskQuestion).as_deref(), Some("a"));
        assert_eq!(reg.key_hint(Context::Global, Action::ToggleExpand).as_deref(), Some("Enter"));
        assert_eq!(reg.key_hint(Context::Question, Action::Quit), None);
    }

    #[test]
    fn test_all_bindings_have_descriptions() {
        let reg = KeybindingRegistry::new();
        let all = reg.all_bindings();
        assert_eq!(all.len(), DEFAULT_BINDINGS.len());
        assert!(all.iter().all(|(_, key, _, desc)| !key.is_empty() && !desc.is_empty()));
    }
}
