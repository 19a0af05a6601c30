//! Layout: screen regions, pad hit testing and pad focus.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};

/// Screen regions, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub spectrum: Rect,
    pub pads: Rect,
    pub controls: Rect,
    pub status: Rect,
}

/// Pad row height including borders.
const PAD_HEIGHT: u16 = 5;
/// Control gauge row height.
const CONTROLS_HEIGHT: u16 = 3;

/// Split the full frame. The spectrum takes whatever is left.
pub fn regions(area: Rect) -> Regions {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                  // Spectrum
            Constraint::Length(PAD_HEIGHT),      // Pads
            Constraint::Length(CONTROLS_HEIGHT), // Volume / speed / metronome
            Constraint::Length(1),               // Status bar
        ])
        .split(area);
    Regions {
        spectrum: chunks[0],
        pads: chunks[1],
        controls: chunks[2],
        status: chunks[3],
    }
}

/// Split the pad row into `count` equal columns.
pub fn pad_rects(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }
    let constraints = vec![Constraint::Ratio(1, count as u32); count];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area)
        .to_vec()
}

/// Index of the pad containing the cell, if any.
pub fn pad_at(pads: &[Rect], column: u16, row: u16) -> Option<usize> {
    let pos = Position::new(column, row);
    pads.iter().position(|r| r.contains(pos))
}

/// Which pad has keyboard focus. Wraps in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadFocus {
    index: usize,
    count: usize,
}

impl PadFocus {
    pub fn new(count: usize) -> Self {
        Self { index: 0, count }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if self.count > 0 {
            self.index = (self.index + 1) % self.count;
        }
    }

    pub fn prev(&mut self) {
        if self.count > 0 {
            self.index = (self.index + self.count - 1) % self.count;
        }
    }

    /// Focus `index` if it exists.
    pub fn set(&mut self, index: usize) {
        if index < self.count {
            self.index = index;
        }
    }
}
