use crate::logic::calculations::Series;
use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    // Base colors
    pub const FG: Color = Color::White;
    pub const DIM: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Green;
    pub const HIGHLIGHT: Color = Color::Cyan;

    // Status colors
    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    // Moisture relative to the trigger threshold
    pub const MOISTURE_DRY: Color = Color::Yellow;
    pub const MOISTURE_OK: Color = Color::Green;
    pub const MOISTURE_WET: Color = Color::LightBlue;

    // Chart series
    pub const SERIES_MOISTURE: Color = Color::LightBlue;
    pub const SERIES_ET0: Color = Color::Yellow;
    pub const SERIES_RAIN: Color = Color::Cyan;
    pub const SERIES_IRRIGATION: Color = Color::LightGreen;
    pub const TRIGGER_LINE: Color = Color::Red;

    // Styles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Self::FG).add_modifier(Modifier::BOLD)
    }

    pub fn normal() -> Style {
        Style::default().fg(Self::FG)
    }

    pub fn dim() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn highlight() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(Self::FG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    /// Below trigger is dry, above field capacity is wet.
    pub fn moisture_color(moisture: f64, trigger: f64, field_capacity: f64) -> Color {
        if moisture < trigger {
            Self::MOISTURE_DRY
        } else if moisture <= field_capacity {
            Self::MOISTURE_OK
        } else {
            Self::MOISTURE_WET
        }
    }

    pub fn irrigate_style(irrigate: bool) -> Style {
        if irrigate {
            Style::default()
                .fg(Self::SERIES_IRRIGATION)
                .add_modifier(Modifier::BOLD)
        } else {
            Self::dim()
        }
    }

    pub fn series_color(series: Series) -> Color {
        match series {
            Series::SoilMoisture => Self::SERIES_MOISTURE,
            Series::Et0 => Self::SERIES_ET0,
            Series::ForecastRain => Self::SERIES_RAIN,
            Series::IrrigationMm => Self::SERIES_IRRIGATION,
        }
    }

    pub fn nav_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_label() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moisture_bands() {
        assert_eq!(Theme::moisture_color(20.0, 26.6, 38.0), Theme::MOISTURE_DRY);
        assert_eq!(Theme::moisture_color(26.6, 26.6, 38.0), Theme::MOISTURE_OK);
        assert_eq!(Theme::moisture_color(40.0, 26.6, 38.0), Theme::MOISTURE_WET);
    }
}
