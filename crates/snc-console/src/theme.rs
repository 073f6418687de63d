use crate::notice::NoticeKind;
use ratatui::style::{Color, Modifier, Style};

#[derive(Clone, Copy)]
pub struct ConsoleTheme {
    pub bg: Color,
    pub surface: Color,
    pub border: Color,
    pub title: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub ok: Color,
    pub warn: Color,
    pub critical: Color,
}

pub fn console_theme() -> ConsoleTheme {
    ConsoleTheme {
        bg: Color::Rgb(11, 18, 32),
        surface: Color::Rgb(17, 26, 46),
        border: Color::Rgb(71, 85, 105),
        title: Color::Rgb(191, 219, 254),
        text: Color::Rgb(226, 232, 240),
        muted: Color::Rgb(148, 163, 184),
        accent: Color::Rgb(56, 189, 248),
        ok: Color::Rgb(34, 197, 94),
        warn: Color::Rgb(245, 158, 11),
        critical: Color::Rgb(239, 68, 68),
    }
}

pub fn header_style(theme: ConsoleTheme) -> Style {
    Style::default()
        .fg(theme.title)
        .add_modifier(Modifier::BOLD)
}

pub fn selected_style(theme: ConsoleTheme) -> Style {
    Style::default()
        .bg(theme.border)
        .fg(theme.text)
        .add_modifier(Modifier::BOLD)
}

pub fn zebra_row_style(index: usize) -> Style {
    let bg = if index % 2 == 0 {
        Color::Rgb(13, 21, 37)
    } else {
        Color::Rgb(17, 26, 46)
    };
    Style::default().bg(bg)
}

pub fn notice_color(kind: NoticeKind, theme: ConsoleTheme) -> Color {
    match kind {
        NoticeKind::Success => theme.ok,
        NoticeKind::Error => theme.critical,
    }
}

pub fn run_state_color(is_running: Option<bool>, theme: ConsoleTheme) -> Color {
    match is_running {
        Some(true) => theme.ok,
        Some(false) => theme.warn,
        None => theme.muted,
    }
}

pub fn change_color(change: f64, theme: ConsoleTheme) -> Color {
    if change >= 0.0 {
        theme.ok
    } else {
        theme.critical
    }
}

pub fn trade_side_color(side: &str, theme: ConsoleTheme) -> Color {
    match side.to_ascii_lowercase().as_str() {
        "buy" => theme.ok,
        "sell" => theme.warn,
        _ => theme.muted,
    }
}
