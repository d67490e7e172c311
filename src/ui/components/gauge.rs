use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Bordered readout with a horizontal fill bar and an optional marker,
/// e.g. the trigger threshold on the soil moisture bar.
pub struct GaugeWidget<'a> {
    title: &'a str,
    value: Option<f64>,
    unit: &'a str,
    max: f64,
    color: Color,
    marker: Option<f64>,
    precision: usize,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str, value: Option<f64>, unit: &'a str) -> Self {
        Self {
            title,
            value,
            unit,
            max: 100.0,
            color: Theme::FG,
            marker: None,
            precision: 1,
        }
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = max;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn marker(mut self, at: f64) -> Self {
        self.marker = Some(at);
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    fn fill_ratio(&self, value: f64) -> f64 {
        if self.max <= 0.0 {
            return 0.0;
        }
        (value / self.max).clamp(0.0, 1.0)
    }

    fn cells(&self, value: f64, width: u16) -> u16 {
        (width as f64 * self.fill_ratio(value)) as u16
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(value) = self.value else {
            Paragraph::new(Line::from(Span::styled("N/A", Theme::dim()))).render(inner, buf);
            return;
        };

        let text = format!("{:.prec$}{}", value, self.unit, prec = self.precision);
        Paragraph::new(Line::from(Span::styled(text, Style::default().fg(self.color))))
            .render(inner, buf);

        if inner.height < 2 {
            return;
        }

        let y = inner.y + 1;
        let filled = self.cells(value, inner.width);
        for dx in 0..inner.width {
            let ch = if dx < filled { '█' } else { '░' };
            buf[(inner.x + dx, y)].set_char(ch).set_fg(self.color);
        }

        if let Some(at) = self.marker {
            let dx = self.cells(at, inner.width).min(inner.width - 1);
            buf[(inner.x + dx, y)]
                .set_char('│')
                .set_fg(Theme::TRIGGER_LINE);
        }
    }
}

/// Soil moisture (%) on a 0..field capacity bar, marked at the trigger threshold.
pub fn moisture_gauge(
    title: &str,
    value: Option<f64>,
    trigger: f64,
    field_capacity: f64,
) -> GaugeWidget<'_> {
    let color = value
        .map(|m| Theme::moisture_color(m, trigger, field_capacity))
        .unwrap_or(Theme::DIM);
    GaugeWidget::new(title, value, "%")
        .max(field_capacity.max(1.0))
        .color(color)
        .marker(trigger)
}

/// Recommended irrigation depth in mm.
pub fn depth_gauge(title: &str, value: Option<f64>, max: f64) -> GaugeWidget<'_> {
    GaugeWidget::new(title, value, " mm")
        .max(max.max(1.0))
        .color(Theme::SERIES_IRRIGATION)
        .precision(2)
}

/// Share of rows, e.g. irrigation days out of all days.
pub fn count_gauge(title: &str, count: usize, total: usize) -> GaugeWidget<'_> {
    GaugeWidget::new(title, Some(count as f64), "")
        .max(total.max(1) as f64)
        .color(Theme::HIGHLIGHT)
        .precision(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar_row(gauge: GaugeWidget<'_>) -> String {
        let area = Rect::new(0, 0, 12, 4);
        let mut buf = Buffer::empty(area);
        gauge.render(area, &mut buf);
        (1..11).map(|x| buf[(x, 2)].symbol().to_string()).collect()
    }

    #[test]
    fn moisture_color_follows_trigger() {
        assert_eq!(
            moisture_gauge("Moisture", Some(20.0), 26.6, 38.0).color,
            Theme::MOISTURE_DRY
        );
        assert_eq!(
            moisture_gauge("Moisture", Some(27.0), 26.6, 38.0).color,
            Theme::MOISTURE_OK
        );
        assert_eq!(moisture_gauge("Moisture", None, 26.6, 38.0).color, Theme::DIM);
    }

    #[test]
    fn fill_ratio_is_clamped() {
        let gauge = depth_gauge("Depth", Some(3.0), 10.0);
        assert!((gauge.fill_ratio(5.0) - 0.5).abs() < 1e-9);
        assert_eq!(gauge.fill_ratio(-1.0), 0.0);
        assert_eq!(gauge.fill_ratio(50.0), 1.0);
    }

    #[test]
    fn count_gauge_handles_empty_total() {
        let gauge = count_gauge("Days", 0, 0);
        assert_eq!(gauge.fill_ratio(0.0), 0.0);
    }

    #[test]
    fn bar_fills_proportionally() {
        // 10 inner cells, half full
        let row = bar_row(depth_gauge("Depth", Some(5.0), 10.0));
        assert_eq!(row, "█████░░░░░");
    }

    #[test]
    fn trigger_marker_is_drawn() {
        // Trigger at 70% of field capacity lands on cell 7
        let row = bar_row(moisture_gauge("Moisture", Some(10.0), 70.0, 100.0));
        assert_eq!(row.chars().nth(7), Some('│'));
    }

    #[test]
    fn too_small_area_renders_nothing() {
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        depth_gauge("Depth", Some(3.0), 10.0).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }
}
