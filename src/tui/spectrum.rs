//! Spectrum widget: draws visualizer bars with eighth-block glyphs.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

use crate::visualizer::{Bar, SUBCELL_ROWS};

/// Partial cells, indexed by sub-rows filled (0 = empty).
const EIGHTHS: [&str; 9] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Bars spread evenly across the area, bottom-aligned.
pub struct SpectrumView<'a> {
    bars: &'a [Bar],
}

impl<'a> SpectrumView<'a> {
    pub fn new(bars: &'a [Bar]) -> Self {
        Self { bars }
    }
}

impl Widget for SpectrumView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.bars.is_empty() {
            return;
        }
        let count = self.bars.len();
        let width = area.width as usize;

        for (i, bar) in self.bars.iter().enumerate() {
            let x0 = i * width / count;
            let x1 = ((i + 1) * width / count).max(x0 + 1);
            // Leave a gap between bars when there is room for one.
            let x1 = if x1 - x0 >= 3 { x1 - 1 } else { x1 };
            let color = Color::Rgb(bar.color.0, bar.color.1, bar.color.2);

            for row in 0..area.height {
                let filled = bar
                    .height
                    .saturating_sub(row * SUBCELL_ROWS)
                    .min(SUBCELL_ROWS);
                let y = area.bottom() - 1 - row;
                for x in x0..x1.min(width) {
                    if let Some(cell) = buf.cell_mut((area.x + x as u16, y)) {
                        cell.set_symbol(EIGHTHS[filled as usize]).set_fg(color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visualizer::Rgb;

    fn bar(height: u16) -> Bar {
        Bar {
            level: 0.0,
            height,
            color: Rgb(255, 100, 0),
        }
    }

    fn column(buf: &Buffer, x: u16) -> String {
        (0..buf.area.height)
            .map(|y| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn draws_bottom_up_with_partial_top() {
        let area = Rect::new(0, 0, 2, 3);
        let mut buf = Buffer::empty(area);
        let bars = [bar(12), bar(0)];
        SpectrumView::new(&bars).render(area, &mut buf);
        assert_eq!(column(&buf, 0), " ▄█");
        assert_eq!(column(&buf, 1), "   ");
    }

    #[test]
    fn full_height_fills_column() {
        let area = Rect::new(0, 0, 1, 2);
        let mut buf = Buffer::empty(area);
        SpectrumView::new(&[bar(16)]).render(area, &mut buf);
        assert_eq!(column(&buf, 0), "██");
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 100, 0));
    }

    #[test]
    fn wide_bars_leave_a_gap() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        SpectrumView::new(&[bar(8), bar(8)]).render(area, &mut buf);
        let row: String = (0..8).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "███ ███ ");
    }

    #[test]
    fn empty_area_is_a_no_op() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        SpectrumView::new(&[bar(8)]).render(area, &mut buf);
    }
}
