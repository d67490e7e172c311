use crate::logic::IrrigationSchedule;
use crate::models::{ScheduleRow, ScheduleSummary};
use crate::ui::components::{count_gauge, depth_gauge, moisture_gauge, InputWidget};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};
use std::path::Path;

pub const MISSING_INPUT_PROMPT: &str =
    "Please provide your sensor and weather data file to proceed.";

pub struct ScheduleScreen<'a> {
    pub schedule: Option<&'a IrrigationSchedule>,
    pub input_path: Option<&'a Path>,
    pub selected_index: usize,
    pub status_message: Option<&'a str>,
    pub status_is_error: bool,
    pub open_prompt: Option<&'a str>,
}

impl<'a> ScheduleScreen<'a> {
    pub fn new(schedule: Option<&'a IrrigationSchedule>) -> Self {
        Self {
            schedule,
            input_path: None,
            selected_index: 0,
            status_message: None,
            status_is_error: false,
            open_prompt: None,
        }
    }

    pub fn with_input(mut self, path: Option<&'a Path>) -> Self {
        self.input_path = path;
        self
    }

    pub fn with_selection(mut self, index: usize) -> Self {
        self.selected_index = index;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>, is_error: bool) -> Self {
        self.status_message = status;
        self.status_is_error = is_error;
        self
    }

    /// Show the file prompt with its current contents.
    pub fn with_open_prompt(mut self, buffer: Option<&'a str>) -> Self {
        self.open_prompt = buffer;
        self
    }
}

impl Widget for ScheduleScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let prompt_height = if self.open_prompt.is_some() { 3 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),             // Header
                Constraint::Length(5),             // Gauges row
                Constraint::Min(6),                // Table
                Constraint::Length(prompt_height), // File prompt
                Constraint::Length(1),             // Status message
                Constraint::Length(1),             // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);

        match self.schedule {
            Some(schedule) => {
                let summary = schedule.summary();
                self.render_gauges(schedule, &summary, chunks[1], buf);
                self.render_table(&schedule.rows, chunks[2], buf);
            }
            None => self.render_missing_input(chunks[1].union(chunks[2]), buf),
        }

        if let Some(buffer) = self.open_prompt {
            InputWidget::new("Data file (.csv) - Enter to load, Esc to cancel", buffer)
                .focused(true)
                .render(chunks[3], buf);
        }

        self.render_status_message(chunks[4], buf);
        self.render_nav(chunks[5], buf);
    }
}

impl ScheduleScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                "T2 Smart Irrigation Scheduler",
                Theme::title(),
            ))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let source = self
            .input_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no data loaded".to_string());

        let info = Line::from(vec![
            Span::styled("Soil moisture + ET0 + rain forecast", Theme::dim()),
            Span::styled("  |  Data: ", Theme::dim()),
            Span::styled(source, Theme::normal()),
        ]);
        Paragraph::new(info).block(block).render(area, buf);
    }

    fn render_gauges(
        &self,
        schedule: &IrrigationSchedule,
        summary: &ScheduleSummary,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let gauge_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(area);

        let params = &schedule.parameters;
        let selected = schedule.rows.get(self.selected_index);

        let moisture = selected.map(|r| r.observation.soil_moisture);
        moisture_gauge(
            "Soil Moisture",
            moisture,
            params.trigger_threshold(),
            params.field_capacity_percent,
        )
        .render(gauge_chunks[0], buf);

        let max_depth = schedule
            .rows
            .iter()
            .map(|r| r.decision.irrigation_mm)
            .fold(0.0, f64::max);
        let depth = selected.map(|r| r.decision.irrigation_mm);
        depth_gauge("Irrigation", depth, max_depth).render(gauge_chunks[1], buf);

        count_gauge("Irrigation Days", summary.irrigation_days, summary.rows)
            .render(gauge_chunks[2], buf);

        let total_cap = summary.total_irrigation_mm.max(1.0);
        depth_gauge("Total Irrigation", Some(summary.total_irrigation_mm), total_cap)
            .render(gauge_chunks[3], buf);
    }

    fn render_table(&self, rows: &[ScheduleRow], area: Rect, buf: &mut Buffer) {
        let header_cells = [
            "timestamp",
            "soil_moisture",
            "ET0",
            "forecast_rain",
            "irrigate",
            "ETc",
            "irrigation_mm",
            "note",
        ]
        .iter()
        .map(|h| Cell::from(*h).style(Theme::header()));

        let header = Row::new(header_cells).height(1);

        let table_rows: Vec<Row> = rows
            .iter()
            .map(|row| {
                let obs = &row.observation;
                let d = &row.decision;

                let note = match d.skip_reason {
                    Some(reason) => reason.as_str(),
                    None if d.is_zero_depth_irrigation() => "Demand offset by rain",
                    None => "",
                };

                let cells = vec![
                    Cell::from(obs.timestamp.format("%Y-%m-%d %H:%M").to_string()),
                    Cell::from(format!("{:.1}", obs.soil_moisture)),
                    Cell::from(format!("{:.2}", obs.et0)),
                    Cell::from(format!("{:.2}", obs.forecast_rain)),
                    Cell::from(if d.irrigate { "Yes" } else { "No" })
                        .style(Theme::irrigate_style(d.irrigate)),
                    Cell::from(format!("{:.2}", d.etc)),
                    Cell::from(format!("{:.2}", d.irrigation_mm))
                        .style(Theme::irrigate_style(d.irrigation_mm > 0.0)),
                    Cell::from(note).style(Theme::dim()),
                ];

                Row::new(cells).style(Style::default())
            })
            .collect();

        let widths = [
            Constraint::Length(17),
            Constraint::Length(14),
            Constraint::Length(7),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Length(7),
            Constraint::Length(14),
            Constraint::Min(10),
        ];

        let table = Table::new(table_rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(format!("Irrigation Schedule ({} rows)", rows.len()))
                    .borders(Borders::ALL)
                    .border_style(Theme::border()),
            )
            .row_highlight_style(Theme::selected());

        let mut state = TableState::default();
        if !rows.is_empty() {
            state.select(Some(self.selected_index));
        }

        StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_missing_input(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("No Data")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = vec![
            Line::from(Span::styled(MISSING_INPUT_PROMPT, Theme::warning())),
            Line::from(vec![]),
            Line::from(vec![
                Span::styled("Press ", Theme::dim()),
                Span::styled("[o]", Theme::nav_key()),
                Span::styled(" to open a .csv file. Sample format:", Theme::dim()),
            ]),
            Line::from(vec![]),
            Line::from(Span::styled(
                "timestamp,soil_moisture,ET0,forecast_rain",
                Theme::highlight(),
            )),
            Line::from(Span::styled("2025-06-01 06:00,25,4.2,0.5", Theme::normal())),
            Line::from(Span::styled("2025-06-02 06:00,27,3.9,3.0", Theme::normal())),
            Line::from(Span::styled("2025-06-03 06:00,24,4.0,1.5", Theme::normal())),
        ];

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            let style = if self.status_is_error {
                Theme::error()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Schedule ", Theme::nav_label()),
            Span::styled("[2]", Theme::nav_key()),
            Span::styled("Chart ", Theme::nav_label()),
            Span::styled("[s]", Theme::nav_key()),
            Span::styled("Parameters ", Theme::nav_label()),
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Select ", Theme::nav_label()),
            Span::styled("[o]", Theme::nav_key()),
            Span::styled("Open ", Theme::nav_label()),
            Span::styled("[e]", Theme::nav_key()),
            Span::styled("Export ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasources::csv_file::read_observations;
    use crate::models::IrrigationParameters;

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        let mut out = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_prompt_without_data() {
        let area = Rect::new(0, 0, 100, 24);
        let mut buf = Buffer::empty(area);
        ScheduleScreen::new(None).render(area, &mut buf);
        assert!(buffer_text(&buf).contains("Please provide your sensor"));
    }

    #[test]
    fn renders_rows_and_notes() {
        let input = "timestamp,soil_moisture,ET0,forecast_rain
2025-06-01 06:00,25,4.2,0.5
2025-06-02 06:00,27,3.9,3.0
2025-06-03 06:00,24,1.0,1.5
";
        let obs = read_observations(input.as_bytes()).unwrap();
        let schedule = IrrigationSchedule::evaluate(&obs, &IrrigationParameters::default());

        let area = Rect::new(0, 0, 120, 24);
        let mut buf = Buffer::empty(area);
        ScheduleScreen::new(Some(&schedule)).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("2025-06-01 06:00"));
        assert!(text.contains("4.33"));
        assert!(text.contains("Soil moisture adequate"));
        assert!(text.contains("Demand offset by rain"));
    }
}
