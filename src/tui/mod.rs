//! TUI interface: spectrum, pad row, control gauges and status bar.
//!
//! The App struct holds all TUI state and drives the event loop. Audio runs
//! on its own thread; everything else (input, timers, redraws) happens here.

pub mod keybindings;
pub mod layout;
pub mod spectrum;
pub mod status;
pub mod theme;

pub use keybindings::{map_key, map_mouse, Action};
pub use layout::PadFocus;
pub use status::{AudioStatus, StatusInfo};
pub use theme::Theme;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Gauge, Paragraph};
use ratatui::Frame;
use tracing::debug;

use crate::instrument::controls::{SPEED_MAX, SPEED_MIN, SPEED_STEP, VOLUME_STEP};
use crate::instrument::{Instrument, PadVisual};
use crate::timer::PeriodicTask;
use crate::visualizer::Visualizer;
use spectrum::SpectrumView;

/// Redraw period, about 60 frames per second.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Main application state.
pub struct App {
    pub instrument: Instrument,
    pub theme: Theme,
    pub focus: PadFocus,
    pub visualizer: Visualizer,
    pub should_quit: bool,
    pad_areas: Vec<Rect>,
    refresh: PeriodicTask,
}

impl App {
    pub fn new(instrument: Instrument, theme: Theme, now: Instant) -> Self {
        let focus = PadFocus::new(instrument.pads().len());
        let visualizer = Visualizer::new(theme.bar_low, theme.bar_high, now);
        Self {
            instrument,
            theme,
            focus,
            visualizer,
            should_quit: false,
            pad_areas: Vec::new(),
            refresh: PeriodicTask::new(FRAME_INTERVAL),
        }
    }

    /// Pad rectangles from the last draw, used for mouse hit testing.
    pub fn pad_areas(&self) -> &[Rect] {
        &self.pad_areas
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TriggerPad(i) => {
                self.instrument.trigger(i, now);
            }
            Action::TriggerFocused => {
                self.instrument.trigger(self.focus.index(), now);
            }
            Action::ClickPad(i) => {
                self.focus.set(i);
                self.instrument.trigger(i, now);
            }
            Action::FocusNext => self.focus.next(),
            Action::FocusPrev => self.focus.prev(),
            Action::VolumeUp => self.instrument.nudge_volume(VOLUME_STEP),
            Action::VolumeDown => self.instrument.nudge_volume(-VOLUME_STEP),
            Action::SpeedUp => self.instrument.nudge_speed(SPEED_STEP),
            Action::SpeedDown => self.instrument.nudge_speed(-SPEED_STEP),
            Action::ToggleMute => {
                self.instrument.toggle_mute();
            }
            Action::ToggleMetronome => {
                self.instrument.toggle_metronome(now);
            }
            Action::ReconnectAudio => self.instrument.reconnect(),
        }
    }

    pub fn handle_event(&mut self, event: CrosstermEvent, now: Instant) {
        let action = match event {
            CrosstermEvent::Key(key) => map_key(key),
            CrosstermEvent::Mouse(mouse) => map_mouse(mouse, &self.pad_areas),
            CrosstermEvent::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                None
            }
            _ => None,
        };
        if let Some(action) = action {
            self.handle_action(action, now);
        }
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame, now: Instant) {
        let regions = layout::regions(frame.area());
        self.draw_spectrum(frame, regions.spectrum, now);
        self.draw_pads(frame, regions.pads, now);
        self.draw_controls(frame, regions.controls);
        self.draw_status(frame, regions.status);
    }

    fn draw_spectrum(&mut self, frame: &mut Frame, area: Rect, now: Instant) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.border))
            .title(Span::styled(
                " thump ",
                Style::default()
                    .fg(self.theme.title)
                    .add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.visualizer.resize(inner.width, inner.height);
        let bars = self.visualizer.frame(self.instrument.analysis(), now).bars;
        frame.render_widget(SpectrumView::new(&bars), inner);
    }

    fn draw_pads(&mut self, frame: &mut Frame, area: Rect, now: Instant) {
        let theme = &self.theme;
        self.pad_areas = layout::pad_rects(area, self.instrument.pads().len());

        for (pad, &rect) in self.instrument.pads().iter().zip(&self.pad_areas) {
            let focused = pad.index() == self.focus.index();
            let (border, body) = if pad.is_inert() {
                (
                    Style::default().fg(theme.pad_inert),
                    Style::default().fg(theme.pad_inert),
                )
            } else {
                match pad.visual(now) {
                    PadVisual::Playing => (
                        Style::default()
                            .fg(theme.pad_playing)
                            .add_modifier(Modifier::BOLD),
                        Style::default()
                            .bg(theme.pad_playing)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD),
                    ),
                    PadVisual::Rippling => (
                        Style::default().fg(theme.pad_ripple),
                        Style::default().fg(theme.pad_ripple),
                    ),
                    PadVisual::Idle => (
                        Style::default().fg(if focused {
                            theme.pad_focus
                        } else {
                            theme.pad_idle
                        }),
                        Style::default().fg(theme.status_fg),
                    ),
                }
            };

            let block = Block::bordered()
                .border_type(if focused {
                    BorderType::Double
                } else {
                    BorderType::Rounded
                })
                .border_style(border)
                .title(format!(" {} ", pad.key().to_ascii_uppercase()));
            let label = if pad.is_inert() { "(empty)" } else { pad.label() };
            let paragraph = Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(body)
                .block(block);
            frame.render_widget(paragraph, rect);
        }
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let status = StatusInfo::from_instrument(&self.instrument);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(40),
                Constraint::Percentage(20),
            ])
            .split(area);

        let volume_color = if status.muted {
            theme.pad_inert
        } else {
            theme.volume
        };
        let volume = Gauge::default()
            .block(Block::bordered().title(" volume ↑↓ "))
            .gauge_style(Style::default().fg(volume_color))
            .ratio(status.volume.clamp(0.0, 1.0) as f64)
            .label(status.volume_display());
        frame.render_widget(volume, chunks[0]);

        let speed_ratio = ((status.speed - SPEED_MIN) / (SPEED_MAX - SPEED_MIN)).clamp(0.0, 1.0);
        let speed = Gauge::default()
            .block(Block::bordered().title(" speed ←→ "))
            .gauge_style(Style::default().fg(theme.speed))
            .ratio(speed_ratio as f64)
            .label(status.speed_display());
        frame.render_widget(speed, chunks[1]);

        let metronome_style = if status.metronome {
            Style::default()
                .fg(theme.status_accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.pad_inert)
        };
        let metronome = Paragraph::new(status.metronome_display())
            .alignment(Alignment::Center)
            .style(metronome_style)
            .block(Block::bordered().title(" b "));
        frame.render_widget(metronome, chunks[2]);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme;
        let status = StatusInfo::from_instrument(&self.instrument);

        let audio_indicator = match status.audio {
            AudioStatus::Failed(_) => Span::styled(
                format!(" {} ", status.audio_display(20)),
                Style::default()
                    .fg(theme.status_warn)
                    .add_modifier(Modifier::BOLD),
            ),
            _ => Span::styled(
                format!(" {} ", status.audio_display(20)),
                Style::default().fg(theme.status_accent),
            ),
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", status.volume_display()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "| {} | {} |",
                status.speed_display(),
                status.metronome_display()
            )),
            audio_indicator,
            Span::styled(
                " A-J:pads Tab:focus Enter:play m:mute r:reconnect q:quit ",
                Style::default().fg(theme.pad_inert),
            ),
        ]);

        let paragraph =
            Paragraph::new(line).style(Style::default().bg(theme.status_bg).fg(theme.status_fg));
        frame.render_widget(paragraph, area);
    }

    /// Run the TUI event loop until quit or `interrupted` is set.
    pub fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
        interrupted: &AtomicBool,
    ) -> io::Result<()> {
        self.refresh.start(Instant::now());
        let mut dirty = true;

        while !self.should_quit && !interrupted.load(Ordering::Relaxed) {
            let now = Instant::now();
            self.instrument.tick(now);

            if self.refresh.poll(now) || dirty {
                terminal
                    .draw(|frame| self.draw(frame, now))
                    .map_err(|e| io::Error::other(e.to_string()))?;
                dirty = false;
            }

            // Sleep in poll until the next frame or metronome click, whichever is first.
            let wake = [self.refresh.next_due(), self.instrument.metronome().next_click()]
                .into_iter()
                .flatten()
                .min();
            let timeout = wake
                .map(|due| due.saturating_duration_since(Instant::now()))
                .unwrap_or(FRAME_INTERVAL);

            if event::poll(timeout)? {
                loop {
                    let ev = event::read()?;
                    self.handle_event(ev, Instant::now());
                    dirty = true;
                    if !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }

        self.refresh.stop();
        Ok(())
    }
}
