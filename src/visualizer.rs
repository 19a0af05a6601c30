//! Spectrum visualizer model: turns analyser bytes into a fixed row of bars.
//!
//! The drawing surface is measured in terminal cells, but bar heights are
//! computed against a backing grid of [`SUBCELL_ROWS`] rows per cell so the
//! renderer can use eighth-block glyphs.

use std::time::Instant;

/// Number of bars drawn regardless of surface width.
pub const BAR_COUNT: usize = 64;
/// Vertical resolution of one terminal cell.
pub const SUBCELL_ROWS: u16 = 8;

const IDLE_BASE: f32 = 0.04;
const IDLE_SWING: f32 = 0.08;

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Linear blend; `t` is clamped to `0..=1`.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

/// One bar of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Normalized level, `0..=1`.
    pub level: f32,
    /// Height in backing rows, `0..=rows * SUBCELL_ROWS`.
    pub height: u16,
    pub color: Rgb,
}

/// Where a frame's levels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSource {
    /// Live analyser data.
    Spectrum,
    /// Placeholder animation while no analyser exists.
    Idle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub source: FrameSource,
    pub bars: Vec<Bar>,
}

/// Bar geometry and palette for the current surface.
#[derive(Debug, Clone)]
pub struct Visualizer {
    cols: u16,
    rows: u16,
    low: Rgb,
    high: Rgb,
    started: Instant,
}

impl Visualizer {
    pub fn new(low: Rgb, high: Rgb, now: Instant) -> Self {
        Self {
            cols: 0,
            rows: 0,
            low,
            high,
            started: now,
        }
    }

    /// Fit to a surface of `cols x rows` cells. Returns whether the size
    /// changed.
    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        if (cols, rows) == (self.cols, self.rows) {
            return false;
        }
        self.cols = cols;
        self.rows = rows;
        true
    }

    /// Backing grid in (columns, sub-rows).
    pub fn backing_size(&self) -> (u16, u16) {
        (self.cols, self.rows.saturating_mul(SUBCELL_ROWS))
    }

    /// Build one frame. `None` means no analyser exists yet and yields the
    /// idle animation.
    pub fn frame(&self, analysis: Option<&[u8]>, now: Instant) -> Frame {
        match analysis {
            Some(data) => Frame {
                source: FrameSource::Spectrum,
                bars: self.spectrum_bars(data),
            },
            None => Frame {
                source: FrameSource::Idle,
                bars: self.idle_bars(now),
            },
        }
    }

    fn spectrum_bars(&self, data: &[u8]) -> Vec<Bar> {
        let stride = (data.len() / BAR_COUNT).max(1);
        (0..BAR_COUNT)
            .map(|i| {
                let value = data.get(i * stride).copied().unwrap_or(0);
                self.bar(value as f32 / 255.0, self.high)
            })
            .collect()
    }

    fn idle_bars(&self, now: Instant) -> Vec<Bar> {
        let t = now.saturating_duration_since(self.started).as_secs_f32();
        (0..BAR_COUNT)
            .map(|i| {
                let wave = 0.5 + 0.5 * (i as f32 * 0.3 + t * 2.0).sin();
                self.bar(IDLE_BASE + IDLE_SWING * wave, self.low)
            })
            .collect()
    }

    fn bar(&self, level: f32, top: Rgb) -> Bar {
        let level = level.clamp(0.0, 1.0);
        let (_, height) = self.backing_size();
        Bar {
            level,
            height: (level * height as f32).round() as u16,
            color: self.low.lerp(top, level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const LOW: Rgb = Rgb(255, 120, 40);
    const HIGH: Rgb = Rgb(255, 220, 80);

    fn viz(cols: u16, rows: u16) -> Visualizer {
        let mut v = Visualizer::new(LOW, HIGH, Instant::now());
        v.resize(cols, rows);
        v
    }

    #[test]
    fn always_sixty_four_bars() {
        for (cols, rows) in [(10, 4), (200, 30), (0, 0)] {
            let v = viz(cols, rows);
            assert_eq!(v.frame(Some(&[0u8; 1024]), Instant::now()).bars.len(), BAR_COUNT);
            assert_eq!(v.frame(None, Instant::now()).bars.len(), BAR_COUNT);
        }
    }

    #[test]
    fn samples_bins_by_stride() {
        let v = viz(80, 10);
        let mut data = vec![0u8; 1024];
        data[16] = 255; // bar 1 with stride 16
        data[17] = 255; // skipped
        let frame = v.frame(Some(&data), Instant::now());
        assert_eq!(frame.source, FrameSource::Spectrum);
        assert_eq!(frame.bars[0].height, 0);
        assert_eq!(frame.bars[1].height, 80);
        assert_eq!(frame.bars[2].height, 0);
    }

    #[test]
    fn height_scales_with_surface() {
        let data = vec![128u8; 1024];
        let short = viz(80, 5).frame(Some(&data), Instant::now()).bars[0].height;
        let tall = viz(80, 20).frame(Some(&data), Instant::now()).bars[0].height;
        assert_eq!(short, 20);
        assert_eq!(tall, 80);
    }

    #[test]
    fn color_moves_toward_high_with_level() {
        let v = viz(80, 10);
        let mut data = vec![0u8; 1024];
        data[0] = 255;
        let frame = v.frame(Some(&data), Instant::now());
        assert_eq!(frame.bars[0].color, HIGH);
        assert_eq!(frame.bars[1].color, LOW);
    }

    #[test]
    fn short_data_pads_with_zero() {
        let v = viz(80, 10);
        let frame = v.frame(Some(&[255u8; 10]), Instant::now());
        assert_eq!(frame.bars[9].level, 1.0);
        assert_eq!(frame.bars[10].level, 0.0);
    }

    #[test]
    fn idle_is_low_and_moves() {
        let t0 = Instant::now();
        let mut v = Visualizer::new(LOW, HIGH, t0);
        v.resize(80, 10);
        let a = v.frame(None, t0);
        let b = v.frame(None, t0 + Duration::from_millis(500));
        assert_eq!(a.source, FrameSource::Idle);
        assert!(a.bars.iter().all(|bar| bar.level <= IDLE_BASE + IDLE_SWING + 1e-6));
        assert_ne!(a.bars, b.bars);
    }

    #[test]
    fn resize_reports_change() {
        let mut v = viz(80, 10);
        assert!(!v.resize(80, 10));
        assert!(v.resize(100, 10));
        assert_eq!(v.backing_size(), (100, 80));
    }
}
