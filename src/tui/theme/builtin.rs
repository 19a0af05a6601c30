//! Built-in theme.

use ratatui::style::Color;

use super::Theme;
use crate::visualizer::Rgb;

/// Ember: orange to amber bars on the terminal's own background.
pub fn default() -> Theme {
    Theme {
        name: "Ember".to_string(),

        bar_low: Rgb(214, 64, 38),
        bar_high: Rgb(255, 200, 60),

        pad_idle: Color::Rgb(120, 72, 48),
        pad_playing: Color::Rgb(255, 170, 60),
        pad_ripple: Color::Rgb(230, 110, 50),
        pad_focus: Color::Rgb(255, 220, 140),
        pad_inert: Color::DarkGray,

        volume: Color::Rgb(240, 130, 50),
        speed: Color::Rgb(250, 180, 70),

        status_fg: Color::White,
        status_bg: Color::Rgb(48, 30, 24),
        status_accent: Color::Rgb(255, 170, 60),
        status_warn: Color::Rgb(240, 80, 60),

        border: Color::Rgb(150, 90, 60),
        title: Color::Rgb(255, 200, 120),
    }
}
