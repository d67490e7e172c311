use crate::models::IrrigationParameters;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterField {
    FieldCapacity,
    CropCoefficient,
    RainThreshold,
}

impl ParameterField {
    pub fn all() -> &'static [ParameterField] {
        &[
            ParameterField::FieldCapacity,
            ParameterField::CropCoefficient,
            ParameterField::RainThreshold,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParameterField::FieldCapacity => "Field Capacity (FC) [%]",
            ParameterField::CropCoefficient => "Crop Coefficient (Kc)",
            ParameterField::RainThreshold => "Rain Threshold (mm)",
        }
    }

    /// Name used in configuration files and error messages.
    pub fn key(&self) -> &'static str {
        match self {
            ParameterField::FieldCapacity => "field_capacity_percent",
            ParameterField::CropCoefficient => "crop_coefficient",
            ParameterField::RainThreshold => "rain_threshold_mm",
        }
    }

    pub fn value(&self, params: &IrrigationParameters) -> f64 {
        match self {
            ParameterField::FieldCapacity => params.field_capacity_percent,
            ParameterField::CropCoefficient => params.crop_coefficient,
            ParameterField::RainThreshold => params.rain_threshold_mm,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ParameterField::FieldCapacity => ParameterField::CropCoefficient,
            ParameterField::CropCoefficient => ParameterField::RainThreshold,
            ParameterField::RainThreshold => ParameterField::FieldCapacity,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ParameterField::FieldCapacity => ParameterField::RainThreshold,
            ParameterField::CropCoefficient => ParameterField::FieldCapacity,
            ParameterField::RainThreshold => ParameterField::CropCoefficient,
        }
    }
}

pub struct ParametersScreen<'a> {
    pub parameters: &'a IrrigationParameters,
    pub focused_field: ParameterField,
    pub editing: bool,
    pub edit_buffer: String,
    pub status_message: Option<&'a str>,
    pub status_is_error: bool,
}

impl<'a> ParametersScreen<'a> {
    pub fn new(parameters: &'a IrrigationParameters) -> Self {
        Self {
            parameters,
            focused_field: ParameterField::FieldCapacity,
            editing: false,
            edit_buffer: String::new(),
            status_message: None,
            status_is_error: false,
        }
    }

    pub fn with_focus(mut self, field: ParameterField) -> Self {
        self.focused_field = field;
        self
    }

    pub fn editing(mut self, editing: bool, buffer: &str) -> Self {
        self.editing = editing;
        self.edit_buffer = buffer.to_string();
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>, is_error: bool) -> Self {
        self.status_message = status;
        self.status_is_error = is_error;
        self
    }
}

impl Widget for ParametersScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),  // Title
                Constraint::Length(14), // Form (3 fields + derived row)
                Constraint::Min(4),     // Help
                Constraint::Length(1),  // Status
                Constraint::Length(1),  // Nav
            ])
            .split(area);

        let title = Line::from(vec![
            Span::styled("Irrigation Parameters", Theme::title()),
            Span::styled(" - applied to every row", Theme::dim()),
        ]);
        Paragraph::new(title).render(chunks[0], buf);

        self.render_form(chunks[1], buf);
        self.render_help(chunks[2], buf);

        if let Some(msg) = self.status_message {
            let style = if self.status_is_error {
                Theme::error()
            } else {
                Theme::success()
            };
            Paragraph::new(Span::styled(msg, style)).render(chunks[3], buf);
        }

        let nav = Line::from(vec![
            Span::styled("[↑↓]", Theme::nav_key()),
            Span::styled("Navigate ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Edit/Apply ", Theme::nav_label()),
            Span::styled("[Esc]", Theme::nav_key()),
            Span::styled("Cancel/Back ", Theme::nav_label()),
            Span::styled("[Ctrl+S]", Theme::nav_key()),
            Span::styled("Save to config", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(chunks[4], buf);
    }
}

impl ParametersScreen<'_> {
    fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Parameters")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let field_height = 3;
        let mut constraints: Vec<Constraint> = ParameterField::all()
            .iter()
            .map(|_| Constraint::Length(field_height))
            .collect();
        constraints.push(Constraint::Length(field_height));

        let field_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in ParameterField::all().iter().enumerate() {
            let is_focused = *field == self.focused_field;

            let value = if is_focused && self.editing {
                format!("{}_", self.edit_buffer)
            } else {
                format!("{}", field.value(self.parameters))
            };

            let border_style = if is_focused {
                Theme::border_focused()
            } else {
                Theme::border()
            };

            let value_style = if is_focused && self.editing {
                Theme::highlight()
            } else if is_focused {
                Theme::selected()
            } else {
                Theme::normal()
            };

            let field_block = Block::default()
                .title(field.label())
                .borders(Borders::ALL)
                .border_style(border_style);

            let field_inner = field_block.inner(field_areas[i]);
            field_block.render(field_areas[i], buf);

            Paragraph::new(Span::styled(value, value_style)).render(field_inner, buf);
        }

        // Derived, read-only
        let derived_area = field_areas[ParameterField::all().len()];
        let derived_block = Block::default()
            .title("Trigger Threshold [%] (70% of FC)")
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let derived_inner = derived_block.inner(derived_area);
        derived_block.render(derived_area, buf);
        Paragraph::new(Span::styled(
            format!("{:.2}", self.parameters.trigger_threshold()),
            Theme::dim(),
        ))
        .render(derived_inner, buf);
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("About this parameter")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = match self.focused_field {
            ParameterField::FieldCapacity => {
                "Maximum soil moisture the soil can hold. Irrigation is considered when \
                 soil moisture falls below 70% of this value."
            }
            ParameterField::CropCoefficient => {
                "Multiplier converting reference evapotranspiration (ET0) into crop \
                 water demand (ETc = ET0 x Kc)."
            }
            ParameterField::RainThreshold => {
                "Forecast rain at or above this amount skips irrigation even when the \
                 soil is dry. Smaller forecasts are subtracted from the recommended depth."
            }
        };

        Paragraph::new(Span::styled(help_text, Theme::dim()))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_cycle_covers_all() {
        let mut field = ParameterField::FieldCapacity;
        for _ in 0..ParameterField::all().len() {
            field = field.next();
        }
        assert_eq!(field, ParameterField::FieldCapacity);
        assert_eq!(
            ParameterField::FieldCapacity.prev(),
            ParameterField::RainThreshold
        );
    }

    #[test]
    fn field_values_read_parameters() {
        let params = IrrigationParameters::new(40.0, 0.9, 3.0);
        assert_eq!(ParameterField::FieldCapacity.value(&params), 40.0);
        assert_eq!(ParameterField::CropCoefficient.value(&params), 0.9);
        assert_eq!(ParameterField::RainThreshold.value(&params), 3.0);
    }

    #[test]
    fn keys_match_config_names() {
        assert_eq!(ParameterField::FieldCapacity.key(), "field_capacity_percent");
        assert_eq!(ParameterField::RainThreshold.key(), "rain_threshold_mm");
    }
}
