use crate::logic::calculations::{series_points, x_bounds, y_bounds, Series};
use crate::logic::IrrigationSchedule;
use crate::ui::Theme;
use chrono::DateTime;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

/// Soil moisture, ET0, rain forecast and irrigation depth over time.
pub struct ChartScreen<'a> {
    pub schedule: Option<&'a IrrigationSchedule>,
}

impl<'a> ChartScreen<'a> {
    pub fn new(schedule: Option<&'a IrrigationSchedule>) -> Self {
        Self { schedule }
    }
}

impl Widget for ChartScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Title
                Constraint::Min(10),   // Chart
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Data Visualization", Theme::title()),
            Span::styled(
                " - Soil Moisture, ET0, Rain Forecast, and Irrigation Over Time",
                Theme::dim(),
            ),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        match self.schedule {
            Some(schedule) if !schedule.is_empty() => self.render_chart(schedule, chunks[1], buf),
            _ => {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border());
                Paragraph::new(Span::styled("No data to plot", Theme::dim()))
                    .block(block)
                    .render(chunks[1], buf);
            }
        }

        let nav = Line::from(vec![
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Schedule ", Theme::nav_label()),
            Span::styled("[s]", Theme::nav_key()),
            Span::styled("Parameters ", Theme::nav_label()),
            Span::styled("[e]", Theme::nav_key()),
            Span::styled("Export ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Back", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[2], buf);
    }
}

impl ChartScreen<'_> {
    fn render_chart(&self, schedule: &IrrigationSchedule, area: Rect, buf: &mut Buffer) {
        let rows = &schedule.rows;
        let trigger = schedule.parameters.trigger_threshold();

        let Some(x) = x_bounds(rows) else {
            return;
        };
        let y = y_bounds(rows, Some(trigger));

        let points: Vec<(Series, Vec<(f64, f64)>)> = Series::all()
            .iter()
            .map(|s| (*s, series_points(rows, *s)))
            .collect();
        let trigger_line = [(x[0], trigger), (x[1], trigger)];

        let mut datasets: Vec<Dataset> = points
            .iter()
            .map(|(series, data)| {
                Dataset::default()
                    .name(series.label())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Theme::series_color(*series)))
                    .data(data)
            })
            .collect();

        datasets.push(
            Dataset::default()
                .name("Trigger")
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Theme::TRIGGER_LINE))
                .data(&trigger_line),
        );

        let x_labels = vec![
            Span::styled(format_x_label(x[0]), Theme::dim()),
            Span::styled(format_x_label((x[0] + x[1]) / 2.0), Theme::dim()),
            Span::styled(format_x_label(x[1]), Theme::dim()),
        ];
        let y_labels = vec![
            Span::styled(format!("{:.0}", y[0]), Theme::dim()),
            Span::styled(format!("{:.0}", (y[0] + y[1]) / 2.0), Theme::dim()),
            Span::styled(format!("{:.0}", y[1]), Theme::dim()),
        ];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .x_axis(
                Axis::default()
                    .title("Date")
                    .style(Theme::dim())
                    .bounds(x)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title("Values")
                    .style(Theme::dim())
                    .bounds(y)
                    .labels(y_labels),
            );

        chart.render(area, buf);
    }
}

fn format_x_label(x: f64) -> String {
    DateTime::from_timestamp(x as i64, 0)
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
