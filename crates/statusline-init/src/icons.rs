//! Glyph tables for statusline segment labels.

use statusline_core::{IconStyle, StatuslineConfig};

/// Label glyph for each segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSet {
    pub directory: &'static str,
    pub git: &'static str,
    pub model: &'static str,
    pub context: &'static str,
    pub cost: &'static str,
    pub tokens: &'static str,
    pub session: &'static str,
}

pub const EMOJI_ICONS: IconSet = IconSet {
    directory: "📁",
    git: "🌿",
    model: "🤖",
    context: "🧠",
    cost: "💵",
    tokens: "📊",
    session: "⌛",
};

/// Requires a Nerd Font (JetBrains Mono Nerd Font tested).
pub const NERD_FONT_ICONS: IconSet = IconSet {
    directory: "\u{f024b}",
    git: "\u{f02a2}",
    model: "\u{f1907}",
    context: "\u{f0fb6}",
    cost: "\u{f0219}",
    tokens: "\u{f1a99}",
    session: "\u{f13ab}",
};

pub const UNICODE_ICONS: IconSet = IconSet {
    directory: "▸",
    git: "⎇",
    model: "◆",
    context: "◉",
    cost: "$",
    tokens: "≡",
    session: "◷",
};

pub const ASCII_ICONS: IconSet = IconSet {
    directory: "[DIR]",
    git: "[GIT]",
    model: "[MDL]",
    context: "[CTX]",
    cost: "[$]",
    tokens: "[TOK]",
    session: "[TIME]",
};

/// Plain-text labels used when neither an icon style nor emojis are chosen.
pub const TEXT_LABELS: IconSet = IconSet {
    directory: "dir:",
    git: "git:",
    model: "model:",
    context: "ctx:",
    cost: "cost:",
    tokens: "tokens:",
    session: "session:",
};

/// Icon set for a style.
pub fn icon_set(style: IconStyle) -> IconSet {
    match style {
        IconStyle::Emoji => EMOJI_ICONS,
        IconStyle::NerdFont => NERD_FONT_ICONS,
        IconStyle::Unicode => UNICODE_ICONS,
        IconStyle::Ascii => ASCII_ICONS,
    }
}

/// Labels for a configuration.
///
/// An explicit icon style wins; otherwise `custom_emojis` picks emoji over
/// plain text.
pub fn labels_for(config: &StatuslineConfig) -> IconSet {
    match config.icon_style {
        Some(style) => icon_set(style),
        None if config.custom_emojis => EMOJI_ICONS,
        None => TEXT_LABELS,
    }
}
