//! Theme system for the TUI.
//!
//! Semantic roles map to ratatui `Style` values. `ThemeVariant` picks the
//! Dark or Light palette and `StyleMap` resolves role names at render time.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name, case-insensitively.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

/// Every semantic UI role and its style.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Header --
    pub header_title: Style,
    pub header_subtitle: Style,
    pub channel_live: Style,
    pub channel_pending: Style,
    pub channel_closed: Style,

    // -- Article cards --
    pub card_border: Style,
    pub card_border_selected: Style,
    pub card_title: Style,
    pub card_body: Style,
    /// Dimmed ellipsis ending a clamped summary.
    pub card_fade: Style,
    pub card_tag: Style,
    pub card_action: Style,
    pub card_source: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub status_error: Style,
    pub scroll_indicator: Style,
    pub spinner: Style,

    // -- Overlays --
    pub overlay_border: Style,
    pub overlay_title: Style,
    pub input: Style,
    pub input_placeholder: Style,
    pub answer_label: Style,
    pub notification_title: Style,
    pub notification_meta: Style,
    pub help_key: Style,
    pub help_section: Style,

    // -- Markdown answers --
    pub md_heading: Style,
    pub md_code: Style,
    pub md_emphasis: Style,
    pub md_strong: Style,
    pub md_link: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().fg(Color::Gray),
            channel_live: Style::default().fg(Color::Green),
            channel_pending: Style::default().fg(Color::Yellow),
            channel_closed: Style::default().fg(Color::Red),

            card_border: Style::default().fg(Color::DarkGray),
            card_border_selected: Style::default().fg(Color::Cyan),
            card_title: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            card_body: Style::default(),
            card_fade: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
            card_tag: Style::default().fg(Color::Black).bg(Color::Cyan),
            card_action: Style::default().fg(Color::Cyan),
            card_source: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            status_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            scroll_indicator: Style::default().fg(Color::Black).bg(Color::Gray),
            spinner: Style::default().fg(Color::Yellow),

            overlay_border: Style::default().fg(Color::Cyan),
            overlay_title: Style::default().add_modifier(Modifier::BOLD),
            input: Style::default().fg(Color::White).bg(Color::Black),
            input_placeholder: Style::default().fg(Color::DarkGray),
            answer_label: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            notification_title: Style::default().add_modifier(Modifier::BOLD),
            notification_meta: Style::default().fg(Color::DarkGray),
            help_key: Style::default().fg(Color::Yellow),
            help_section: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),

            md_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            md_code: Style::default().fg(Color::Yellow),
            md_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            md_strong: Style::default().add_modifier(Modifier::BOLD),
            md_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    fn light() -> Self {
        Self {
            header_title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_subtitle: Style::default().fg(Color::DarkGray),
            channel_live: Style::default().fg(Color::Green),
            channel_pending: Style::default().fg(Color::Magenta),
            channel_closed: Style::default().fg(Color::Red),

            card_border: Style::default().fg(Color::Gray),
            card_border_selected: Style::default().fg(Color::Blue),
            card_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            card_body: Style::default().fg(Color::Black),
            card_fade: Style::default().fg(Color::Gray),
            card_tag: Style::default().fg(Color::White).bg(Color::Blue),
            card_action: Style::default().fg(Color::Blue),
            card_source: Style::default().fg(Color::DarkGray),

            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            scroll_indicator: Style::default().fg(Color::White).bg(Color::DarkGray),
            spinner: Style::default().fg(Color::Magenta),

            overlay_border: Style::default().fg(Color::Blue),
            overlay_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            input: Style::default().fg(Color::Black).bg(Color::White),
            input_placeholder: Style::default().fg(Color::Gray),
            answer_label: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            notification_title: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            notification_meta: Style::default().fg(Color::DarkGray),
            help_key: Style::default().fg(Color::Magenta),
            help_section: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),

            md_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            md_code: Style::default().fg(Color::DarkGray),
            md_emphasis: Style::default().add_modifier(Modifier::ITALIC),
            md_strong: Style::default().add_modifier(Modifier::BOLD),
            md_link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    /// Role name and style for every field, in declaration order.
    fn roles(&self) -> [(&'static str, Style); 31] {
        [
            ("header_title", self.header_title),
            ("header_subtitle", self.header_subtitle),
            ("channel_live", self.channel_live),
            ("channel_pending", self.channel_pending),
            ("channel_closed", self.channel_closed),
            ("card_border", self.card_border),
            ("card_border_selected", self.card_border_selected),
            ("card_title", self.card_title),
            ("card_body", self.card_body),
            ("card_fade", self.card_fade),
            ("card_tag", self.card_tag),
            ("card_action", self.card_action),
            ("card_source", self.card_source),
            ("status_bar", self.status_bar),
            ("status_error", self.status_error),
            ("scroll_indicator", self.scroll_indicator),
            ("spinner", self.spinner),
            ("overlay_border", self.overlay_border),
            ("overlay_title", self.overlay_title),
            ("input", self.input),
            ("input_placeholder", self.input_placeholder),
            ("answer_label", self.answer_label),
            ("notification_title", self.notification_title),
            ("notification_meta", self.notification_meta),
            ("help_key", self.help_key),
            ("help_section", self.help_section),
            ("md_heading", self.md_heading),
            ("md_code", self.md_code),
            ("md_emphasis", self.md_emphasis),
            ("md_strong", self.md_strong),
            ("md_link", self.md_link),
        ]
    }
}

/// Role-name lookup built from a `ColorPalette`.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        Self {
            map: p.roles().into_iter().collect(),
        }
    }

    /// Style for `role`, or `Style::default()` for unknown roles.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_from_str_name() {
        assert_eq!(ThemeVariant::from_str_name("dark"), Some(ThemeVariant::Dark));
        assert_eq!(ThemeVariant::from_str_name(" Light "), Some(ThemeVariant::Light));
        assert_eq!(ThemeVariant::from_str_name("neon"), None);
    }

    #[test]
    fn variant_cycles() {
        assert_eq!(ThemeVariant::Dark.next(), ThemeVariant::Light);
        assert_eq!(ThemeVariant::Light.next(), ThemeVariant::Dark);
    }

    #[test]
    fn light_palette_differs_from_dark() {
        let dark = ThemeVariant::Dark.palette();
        let light = ThemeVariant::Light.palette();
        assert_ne!(dark.card_border_selected, light.card_border_selected);
        assert_ne!(dark.status_bar, light.status_bar);
    }

    #[test]
    fn fade_is_dimmer_than_body() {
        let dark = ThemeVariant::Dark.palette();
        assert_eq!(dark.card_fade.fg, Some(Color::DarkGray));
        assert_ne!(dark.card_fade, dark.card_body);
    }

    #[test]
    fn style_map_resolves_known_roles() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.resolve("card_title"), palette.card_title);
        assert_eq!(sm.resolve("channel_closed"), palette.channel_closed);
        assert_eq!(sm.resolve("md_heading"), palette.md_heading);
    }

    #[test]
    fn role_names_are_unique() {
        let palette = ThemeVariant::Dark.palette();
        let sm = StyleMap::from_palette(&palette);
        assert_eq!(sm.map.len(), palette.roles().len());
    }

    #[test]
    fn style_map_returns_default_for_unknown() {
        let sm = StyleMap::from_palette(&ThemeVariant::Light.palette());
        assert_eq!(sm.resolve("nonexistent_role"), Style::default());
    }
}
