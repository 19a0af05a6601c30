//! Theme system: warm color scheme for pads, gauges and the spectrum.

pub mod builtin;
pub mod config;

use ratatui::style::Color;

use crate::config::ThemeOverrides;
use crate::visualizer::Rgb;

/// A complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Spectrum gradient, quiet to loud
    pub bar_low: Rgb,
    pub bar_high: Rgb,

    // Pads
    pub pad_idle: Color,
    pub pad_playing: Color,
    pub pad_ripple: Color,
    pub pad_focus: Color,
    pub pad_inert: Color,

    // Gauges
    pub volume: Color,
    pub speed: Color,

    // Status bar
    pub status_fg: Color,
    pub status_bg: Color,
    pub status_accent: Color,
    pub status_warn: Color,

    // Borders & chrome
    pub border: Color,
    pub title: Color,
}

/// The default theme with any config overrides applied.
pub fn load_theme(overrides: &ThemeOverrides) -> Theme {
    config::apply_overrides(builtin::default(), overrides)
}
