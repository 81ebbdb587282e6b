//! Temperature sparkline widget for inline visualization

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for different temperature levels (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline widget showing the temperature curve over forecast slots
///
/// Values are normalized between the minimum and maximum of the series,
/// so sub-zero temperatures render as well as summer ones.
pub struct TemperatureSparkline<'a> {
    /// Temperatures for each forecast slot, chronological
    values: &'a [f64],
    /// Lowest value of the series, for normalization
    min: f64,
    /// Highest value of the series, for normalization
    max: f64,
    /// Style for the sparkline
    style: Style,
}

impl<'a> TemperatureSparkline<'a> {
    pub fn new(values: &'a [f64]) -> Self {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            values,
            min,
            max,
            style: Style::default().fg(Color::Cyan),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    fn value_to_block(&self, value: f64) -> char {
        let span = self.max - self.min;
        let normalized = if span.abs() < f64::EPSILON {
            // A flat series sits in the middle
            0.5
        } else {
            ((value - self.min) / span).clamp(0.0, 1.0)
        };
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for TemperatureSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, value) in self.values.iter().take(width).enumerate() {
            let block = self.value_to_block(*value);
            let x = area.x + i as u16;
            let y = area.y;

            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char(block).set_style(self.style);
            }
        }
    }
}
