//! Theme overrides from the `theme:` section of the config file.

use ratatui::style::Color;
use tracing::warn;

use super::Theme;
use crate::config::ThemeOverrides;
use crate::visualizer::Rgb;

/// Parse a color string: "#RRGGBB" hex or named color.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Color::Rgb(r, g, b));
        }
        return None;
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        "white" => Some(Color::White),
        "reset" => Some(Color::Reset),
        _ => None,
    }
}

/// Spectrum colors are blended, so they need concrete RGB values.
fn parse_rgb(s: &str) -> Option<Rgb> {
    match parse_color(s)? {
        Color::Rgb(r, g, b) => Some(Rgb(r, g, b)),
        _ => None,
    }
}

/// Apply overrides on top of `base`. Unparsable values keep the base color.
pub fn apply_overrides(base: Theme, o: &ThemeOverrides) -> Theme {
    let color_or = |field: &str, opt: &Option<String>, fallback: Color| -> Color {
        match opt.as_deref() {
            None => fallback,
            Some(s) => parse_color(s).unwrap_or_else(|| {
                warn!(field, value = s, "ignoring unrecognized theme color");
                fallback
            }),
        }
    };
    let rgb_or = |field: &str, opt: &Option<String>, fallback: Rgb| -> Rgb {
        match opt.as_deref() {
            None => fallback,
            Some(s) => parse_rgb(s).unwrap_or_else(|| {
                warn!(field, value = s, "spectrum colors must be #RRGGBB");
                fallback
            }),
        }
    };

    Theme {
        bar_low: rgb_or("bar_low", &o.bar_low, base.bar_low),
        bar_high: rgb_or("bar_high", &o.bar_high, base.bar_high),
        pad_idle: color_or("pad_idle", &o.pad_idle, base.pad_idle),
        pad_playing: color_or("pad_playing", &o.pad_playing, base.pad_playing),
        pad_ripple: color_or("pad_ripple", &o.pad_ripple, base.pad_ripple),
        pad_focus: color_or("pad_focus", &o.pad_focus, base.pad_focus),
        border: color_or("border", &o.border, base.border),
        title: color_or("title", &o.title, base.title),
        status_fg: color_or("status_fg", &o.status_fg, base.status_fg),
        status_bg: color_or("status_bg", &o.status_bg, base.status_bg),
        ..base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::theme::builtin;

    #[test]
    fn parse_hex_color() {
        assert_eq!(parse_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("#c0caf5"), Some(Color::Rgb(192, 202, 245)));
        assert_eq!(parse_color(" #00ff00 "), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn parse_named_colors() {
        assert_eq!(parse_color("cyan"), Some(Color::Cyan));
        assert_eq!(parse_color("White"), Some(Color::White));
        assert_eq!(parse_color("DarkGray"), Some(Color::DarkGray));
    }

    #[test]
    fn parse_invalid_color_returns_none() {
        assert_eq!(parse_color("#xyz"), None);
        assert_eq!(parse_color("rainbow"), None);
        assert_eq!(parse_color("#12345"), None);
    }

    #[test]
    fn overrides_replace_only_named_fields() {
        let o = ThemeOverrides {
            bar_low: Some("#102030".into()),
            pad_playing: Some("yellow".into()),
            ..Default::default()
        };
        let theme = apply_overrides(builtin::default(), &o);
        let d = builtin::default();
        assert_eq!(theme.bar_low, Rgb(16, 32, 48));
        assert_eq!(theme.bar_high, d.bar_high);
        assert_eq!(theme.pad_playing, Color::Yellow);
        assert_eq!(theme.pad_idle, d.pad_idle);
        assert_eq!(theme.name, d.name);
    }

    #[test]
    fn named_bar_color_keeps_default() {
        let o = ThemeOverrides {
            bar_high: Some("red".into()),
            ..Default::default()
        };
        let theme = apply_overrides(builtin::default(), &o);
        assert_eq!(theme.bar_high, builtin::default().bar_high);
    }

    #[test]
    fn invalid_value_keeps_default() {
        let o = ThemeOverrides {
            border: Some("#nothex".into()),
            ..Default::default()
        };
        let theme = apply_overrides(builtin::default(), &o);
        assert_eq!(theme.border, builtin::default().border);
    }
}
